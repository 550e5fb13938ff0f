//! # modelgen
//!
//! Generates local mirror structs for types owned by another module or
//! crate, together with `from_external` / `into_external` conversions in
//! both directions.
//!
//! # Example
//! ```no_run
//!   use modelgen::{Introspector, ModelGen};
//!
//!   // build.rs
//!   let introspector = Introspector::from_file("crate::api", "src/api.rs").unwrap();
//!   let mut gen = ModelGen::new(introspector);
//!   gen.map("User").unwrap();
//!   gen
//!     .register("Account")
//!     .unwrap()
//!     .rename("id", "external_id")
//!     .omit("legacy_field")
//!     .build()
//!     .unwrap();
//!
//!   let out_dir = std::env::var("OUT_DIR").unwrap();
//!   std::fs::write(format!("{}/models.rs", out_dir), gen.generate().unwrap()).unwrap();
//! ```
//!
//! Nested record fields (`Author`, `Option<Author>`, `Vec<Post>`) are
//! converted through the generated struct of the element type. Unless
//! disabled with [`ModelGen::auto_nested`], element types that were not
//! registered are discovered through the same [`Introspector`] and
//! generated with a zero-config mapping.

pub use modelgen_codegen::{
  describe_struct, format_tokens, generate, generate_body, match_fields, needs_recursive_mapping,
  ConfigError, DiscoveryError, Dispatch, Error, FieldInfo, FormatError, Generator, Introspector,
  MappingBuilder, MappingConfig, Result, StructInfo, TypeExpr, HEADER,
};

use std::collections::BTreeSet;
use tracing::debug;

/// Batch front door: registers mappings against one introspected module and
/// generates them together.
pub struct ModelGen {
  introspector: Introspector,
  target_namespace: String,
  auto_nested: bool,
  configs: Vec<MappingConfig>,
}

/// The output of one unit from [`ModelGen::generate_units`].
#[derive(Debug)]
pub struct UnitOutput {
  pub type_name: String,
  pub result: Result<String>,
}

impl ModelGen {
  pub fn new(introspector: Introspector) -> Self {
    Self {
      introspector,
      target_namespace: String::new(),
      auto_nested: true,
      configs: Vec::new(),
    }
  }

  /// Namespace the generated structs live in. Informational only; the
  /// generated code never names it.
  pub fn target_namespace(&mut self, namespace_path: &str) -> &mut Self {
    self.target_namespace = namespace_path.trim().to_string();
    self
  }

  /// Enables or disables automatic discovery of nested element types.
  pub fn auto_nested(&mut self, enabled: bool) -> &mut Self {
    self.auto_nested = enabled;
    self
  }

  /// Registers a zero-config mapping for `type_name`.
  pub fn map(&mut self, type_name: &str) -> Result<&mut Self> {
    let info = self.introspector.introspect(type_name)?;
    let config = self.builder(info).build()?;
    self.configs.push(config);
    Ok(self)
  }

  /// Starts a configured mapping for `type_name`. Nothing is registered until
  /// [`Registration::build`] succeeds.
  pub fn register(&mut self, type_name: &str) -> Result<Registration<'_>> {
    let info = self.introspector.introspect(type_name)?;
    let builder = self.builder(info);
    Ok(Registration { gen: self, builder })
  }

  pub fn configs(&self) -> &[MappingConfig] {
    &self.configs
  }

  /// Generates every registered unit, followed by the nested units each one
  /// needs, into a single file. A struct is emitted at most once.
  pub fn generate(&self) -> Result<String> {
    let mut generator = Generator::new();
    for root in &self.configs {
      let nested = self.discover(root)?;
      generator.push(root);
      for config in &nested {
        generator.push(config);
      }
    }
    Ok(generator.finish()?)
  }

  /// Generates each unit into its own file. A failure affects only the unit
  /// it belongs to.
  pub fn generate_units(&self) -> Vec<UnitOutput> {
    let mut seen = BTreeSet::new();
    let mut units = Vec::new();
    for root in &self.configs {
      let type_name = root.target().type_name.clone();
      if !seen.insert(type_name.clone()) {
        continue;
      }
      match self.discover(root) {
        Ok(nested) => {
          units.push(unit(root));
          for config in &nested {
            if seen.insert(config.target().type_name.clone()) {
              units.push(unit(config));
            }
          }
        }
        Err(err) => units.push(UnitOutput {
          type_name,
          result: Err(err),
        }),
      }
    }
    units
  }

  fn builder(&self, info: StructInfo) -> MappingBuilder {
    MappingConfig::builder(info).target_namespace(&self.target_namespace)
  }

  /// Zero-config mappings for the nested element types reachable from
  /// `root` that are not registered, in discovery order.
  fn discover(&self, root: &MappingConfig) -> Result<Vec<MappingConfig>> {
    let mut discovered = Vec::new();
    if !self.auto_nested {
      return Ok(discovered);
    }

    let mut known: BTreeSet<String> = self
      .configs
      .iter()
      .map(|config| config.target().type_name.clone())
      .collect();
    known.insert(root.target().type_name.clone());

    let mut pending = nested_types(root);
    let mut index = 0;
    while index < pending.len() {
      let type_name = pending[index].clone();
      index += 1;
      if !known.insert(type_name.clone()) {
        continue;
      }
      debug!(
        root = root.target().type_name.as_str(),
        type_name = type_name.as_str(),
        "discovered nested struct"
      );
      let info = self.introspector.introspect(&type_name)?;
      let config = self.builder(info).build()?;
      pending.extend(nested_types(&config));
      discovered.push(config);
    }
    Ok(discovered)
  }
}

/// A mapping under construction. See [`ModelGen::register`].
pub struct Registration<'a> {
  gen: &'a mut ModelGen,
  builder: MappingBuilder,
}

impl<'a> Registration<'a> {
  pub fn rename(mut self, source_field: &str, target_field: &str) -> Self {
    self.builder = self.builder.rename(source_field, target_field);
    self
  }

  pub fn omit(mut self, source_field: &str) -> Self {
    self.builder = self.builder.omit(source_field);
    self
  }

  pub fn retype(mut self, source_field: &str, ty: &str) -> Self {
    self.builder = self.builder.retype(source_field, ty);
    self
  }

  pub fn build(self) -> Result<()> {
    let config = self.builder.build()?;
    self.gen.configs.push(config);
    Ok(())
  }
}

/// Local element type names of the fields that convert through another
/// generated struct.
fn nested_types(config: &MappingConfig) -> Vec<String> {
  config
    .source()
    .fields
    .iter()
    .filter_map(|source| {
      let target = config.target_field(source)?;
      if needs_recursive_mapping(source, target) {
        Some(target.shape().element.to_string())
      } else {
        None
      }
    })
    .collect()
}

fn unit(config: &MappingConfig) -> UnitOutput {
  UnitOutput {
    type_name: config.target().type_name.clone(),
    result: generate(config).map_err(Error::from),
  }
}
