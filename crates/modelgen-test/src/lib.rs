pub mod api;
pub mod units;

/// Generated by `build.rs`.
pub mod models {
  pub mod basic {
    include!(concat!(env!("OUT_DIR"), "/basic.rs"));
  }

  pub mod custom {
    include!(concat!(env!("OUT_DIR"), "/custom.rs"));
  }

  pub mod nested {
    include!(concat!(env!("OUT_DIR"), "/nested.rs"));
  }

  pub mod everything {
    include!(concat!(env!("OUT_DIR"), "/everything.rs"));
  }

  pub mod standalone {
    include!(concat!(env!("OUT_DIR"), "/unit_user.rs"));
  }
}
