//! Emits the local struct and its `from_external` / `into_external`
//! conversions for mapping configurations.

mod field;
mod preamble;
mod unit;

pub use field::{forward_dispatch, reverse_dispatch, Dispatch};

use crate::error::FormatError;
use crate::format::format_tokens;
use crate::mapping::MappingConfig;
use preamble::Preamble;
use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use std::collections::BTreeSet;
use tracing::debug;
use unit::MappingUnit;

pub const HEADER: &str = "// @generated by modelgen. Do not edit.\n\n";

/// Generates one complete file (header, `use` items, struct, conversions).
pub fn generate(config: &MappingConfig) -> Result<String, FormatError> {
  let mut generator = Generator::new();
  generator.push(config);
  generator.finish()
}

/// Like [`generate`] without the header and `use` items, for composing
/// several units into one file.
pub fn generate_body(config: &MappingConfig) -> Result<String, FormatError> {
  let mut generator = Generator::new();
  generator.push(config);
  generator.finish_body()
}

/// One generation run. Tracks which target structs were already emitted so
/// a struct reachable from several mappings is defined once.
#[derive(Debug, Default)]
pub struct Generator {
  emitted: BTreeSet<String>,
  preamble: Preamble,
  items: TokenStream,
}

impl Generator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Emits one unit. Returns `false` without emitting anything when the
  /// target struct was already emitted in this run.
  pub fn push(&mut self, config: &MappingConfig) -> bool {
    let type_name = &config.target().type_name;
    if !self.emitted.insert(type_name.clone()) {
      debug!(type_name = type_name.as_str(), "skipping already emitted struct");
      return false;
    }

    debug!(
      type_name = type_name.as_str(),
      fields = config.target().fields.len(),
      "emitting mapping unit"
    );
    self.preamble.add(config);
    MappingUnit::new(config).to_tokens(&mut self.items);
    true
  }

  pub fn is_emitted(&self, type_name: &str) -> bool {
    self.emitted.contains(type_name)
  }

  pub fn finish(self) -> Result<String, FormatError> {
    let preamble = self.preamble;
    let items = self.items;
    let formatted = format_tokens(quote! {
      #preamble
      #items
    })?;
    Ok(format!("{}{}", HEADER, formatted))
  }

  pub fn finish_body(self) -> Result<String, FormatError> {
    format_tokens(self.items)
  }
}
