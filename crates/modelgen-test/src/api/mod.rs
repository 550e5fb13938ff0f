//! External types the generated models mirror. Each module is introspected
//! from source by `build.rs`.

pub mod basic;
pub mod custom;
pub mod everything;
pub mod nested;
