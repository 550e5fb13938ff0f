use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
  #[error("Failed to read `{}`: {source}", path.display())]
  Io {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("Failed to parse source: {0}")]
  Parse(String),
  #[error("Invalid namespace path `{0}`")]
  InvalidNamespace(String),
  #[error("Struct `{0}` not found")]
  NotFound(String),
  #[error("Field `{field}` of `{type_name}` has unsupported type `{ty}`")]
  UnsupportedField {
    type_name: String,
    field: String,
    ty: String,
  },
  #[error("Struct `{type_name}` is not supported: {reason}")]
  Unsupported {
    type_name: String,
    reason: &'static str,
  },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
  #[error("Unknown field `{field}` on `{type_name}`")]
  UnknownField { type_name: String, field: String },
  #[error("Field `{field}` on `{type_name}` is both omitted and renamed")]
  OmittedAndRenamed { type_name: String, field: String },
  #[error("Field `{field}` on `{type_name}` is both omitted and retyped")]
  OmittedAndRetyped { type_name: String, field: String },
  #[error("Field `{field}` on `{type_name}` cannot be retyped to `{ty}`")]
  IncompatibleRetype {
    type_name: String,
    field: String,
    ty: String,
  },
  #[error("Target field `{field}` on `{type_name}` is mapped more than once")]
  DuplicateTarget { type_name: String, field: String },
  #[error("`{0}` is not a valid identifier")]
  InvalidIdent(String),
  #[error("Invalid type `{ty}` for field `{field}`")]
  InvalidType { field: String, ty: String },
}

/// The emitted code did not parse. `raw` is the unformatted text.
#[derive(Debug, Clone, Error)]
#[error("Format error: {message}\nGenerated code:\n{raw}")]
pub struct FormatError {
  pub message: String,
  pub raw: String,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Discovery(#[from] DiscoveryError),
  #[error(transparent)]
  Config(#[from] ConfigError),
  #[error(transparent)]
  Format(#[from] FormatError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
