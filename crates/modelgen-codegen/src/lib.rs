//! Core of `modelgen`: discovers struct layouts from Rust source, resolves
//! mapping configurations and emits local mirror structs with conversions.

mod error;
mod format;
mod generate;
mod introspect;
mod mapping;
mod matcher;
mod model;
mod shape;

pub use error::{ConfigError, DiscoveryError, Error, FormatError, Result};
pub use format::format_tokens;
pub use generate::{
  forward_dispatch, generate, generate_body, reverse_dispatch, Dispatch, Generator, HEADER,
};
pub use introspect::{describe_struct, Introspector};
pub use mapping::{MappingBuilder, MappingConfig};
pub use matcher::{match_fields, needs_recursive_mapping};
pub use model::{FieldInfo, StructInfo};
pub use shape::{Shape, TypeExpr, ZeroValue, WELL_KNOWN};
