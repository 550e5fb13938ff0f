use crate::error::ConfigError;
use crate::matcher::match_fields;
use crate::model::{FieldInfo, StructInfo};
use crate::shape::TypeExpr;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// The resolved plan for one generation unit. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingConfig {
  source: StructInfo,
  target: StructInfo,
  omit_fields: BTreeSet<String>,
  field_map: BTreeMap<String, String>,
  correspondence: BTreeMap<String, String>,
}

impl MappingConfig {
  /// Zero-config mapping: every field kept under its own name.
  pub fn identity(source: StructInfo) -> Self {
    derive(source, "", BTreeSet::new(), BTreeMap::new(), &BTreeMap::new())
  }

  pub fn builder(source: StructInfo) -> MappingBuilder {
    MappingBuilder::new(source)
  }

  pub fn source(&self) -> &StructInfo {
    &self.source
  }

  pub fn target(&self) -> &StructInfo {
    &self.target
  }

  pub fn omit_fields(&self) -> &BTreeSet<String> {
    &self.omit_fields
  }

  pub fn field_map(&self) -> &BTreeMap<String, String> {
    &self.field_map
  }

  pub fn is_omitted(&self, source_field: &str) -> bool {
    self.omit_fields.contains(source_field)
  }

  /// Target field name for a source field: the rename if present, else the
  /// source name. `None` when omitted.
  pub fn target_name<'a>(&'a self, source_field: &'a str) -> Option<&'a str> {
    if self.is_omitted(source_field) {
      return None;
    }
    Some(
      self
        .field_map
        .get(source_field)
        .map(String::as_str)
        .unwrap_or(source_field),
    )
  }

  /// The target field a source field maps to, if any.
  pub fn target_field(&self, source_field: &FieldInfo) -> Option<&FieldInfo> {
    let name = self.correspondence.get(&source_field.name)?;
    self.target.field(name)
  }
}

/// Assembles a [`MappingConfig`]. Invalid operations are recorded and
/// reported by [`MappingBuilder::build`].
#[derive(Debug)]
pub struct MappingBuilder {
  source: StructInfo,
  target_namespace: String,
  omit_fields: BTreeSet<String>,
  field_map: BTreeMap<String, String>,
  field_types: BTreeMap<String, TypeExpr>,
  errors: Vec<ConfigError>,
}

impl MappingBuilder {
  pub fn new(source: StructInfo) -> Self {
    Self {
      source,
      target_namespace: String::new(),
      omit_fields: BTreeSet::new(),
      field_map: BTreeMap::new(),
      field_types: BTreeMap::new(),
      errors: Vec::new(),
    }
  }

  pub fn target_namespace(mut self, namespace_path: &str) -> Self {
    self.target_namespace = namespace_path.trim().to_string();
    self
  }

  /// Maps `source_field` to `target_field` in the generated struct.
  pub fn rename(mut self, source_field: &str, target_field: &str) -> Self {
    if self.check_field(source_field) {
      if syn::parse_str::<syn::Ident>(target_field).is_err() {
        self.errors.push(ConfigError::InvalidIdent(target_field.to_string()));
      } else {
        self
          .field_map
          .insert(source_field.to_string(), target_field.to_string());
      }
    }
    self
  }

  /// Excludes `source_field` from the generated struct.
  pub fn omit(mut self, source_field: &str) -> Self {
    if self.check_field(source_field) {
      self.omit_fields.insert(source_field.to_string());
    }
    self
  }

  /// Declares the generated field's type instead of copying the source type.
  /// Conversions go through `Into` in both directions.
  pub fn retype(mut self, source_field: &str, ty: &str) -> Self {
    if self.check_field(source_field) {
      match TypeExpr::parse(ty) {
        Ok(ty) => {
          self.field_types.insert(source_field.to_string(), ty);
        }
        Err(_) => self.errors.push(ConfigError::InvalidType {
          field: source_field.to_string(),
          ty: ty.to_string(),
        }),
      }
    }
    self
  }

  pub fn build(self) -> Result<MappingConfig, ConfigError> {
    if let Some(err) = self.errors.into_iter().next() {
      return Err(err);
    }

    let type_name = &self.source.type_name;
    for field in &self.omit_fields {
      if self.field_map.contains_key(field) {
        return Err(ConfigError::OmittedAndRenamed {
          type_name: type_name.clone(),
          field: field.clone(),
        });
      }
      if self.field_types.contains_key(field) {
        return Err(ConfigError::OmittedAndRetyped {
          type_name: type_name.clone(),
          field: field.clone(),
        });
      }
    }

    for (field, ty) in &self.field_types {
      if let Some(source) = self.source.field(field) {
        if !retype_compatible(source, ty) {
          return Err(ConfigError::IncompatibleRetype {
            type_name: type_name.clone(),
            field: field.clone(),
            ty: ty.to_string(),
          });
        }
      }
    }

    let mut seen = BTreeSet::new();
    for field in &self.source.fields {
      if self.omit_fields.contains(&field.name) {
        continue;
      }
      let name = self.field_map.get(&field.name).unwrap_or(&field.name);
      if !seen.insert(name) {
        return Err(ConfigError::DuplicateTarget {
          type_name: type_name.clone(),
          field: name.clone(),
        });
      }
    }

    let config = derive(
      self.source,
      &self.target_namespace,
      self.omit_fields,
      self.field_map,
      &self.field_types,
    );
    debug!(
      type_name = config.source.type_name.as_str(),
      omitted = config.omit_fields.len(),
      renamed = config.field_map.len(),
      "built mapping config"
    );
    Ok(config)
  }

  fn check_field(&mut self, name: &str) -> bool {
    if self.source.field(name).is_some() {
      true
    } else {
      self.errors.push(ConfigError::UnknownField {
        type_name: self.source.type_name.clone(),
        field: name.to_string(),
      });
      false
    }
  }
}

fn derive(
  source: StructInfo,
  target_namespace: &str,
  omit_fields: BTreeSet<String>,
  field_map: BTreeMap<String, String>,
  field_types: &BTreeMap<String, TypeExpr>,
) -> MappingConfig {
  let fields = source
    .fields
    .iter()
    .filter(|f| !omit_fields.contains(&f.name))
    .map(|f| {
      let name = field_map.get(&f.name).unwrap_or(&f.name).clone();
      match field_types.get(&f.name) {
        Some(ty) => FieldInfo::new(name, ty.clone()),
        None => FieldInfo {
          name,
          ty: target_type(f, &source.namespace_path),
          is_pointer: f.is_pointer,
          is_sequence: f.is_sequence,
          is_nested: f.is_nested,
        },
      }
    })
    .collect();
  let target = StructInfo::new(target_namespace, source.type_name.clone(), fields);

  // Identity matches cover every field that is neither renamed nor omitted;
  // a renamed field's old name may coincide with another target field.
  let mut correspondence: BTreeMap<String, String> = match_fields(&source, &target)
    .into_iter()
    .filter(|(name, _)| !omit_fields.contains(name) && !field_map.contains_key(name))
    .collect();
  correspondence.extend(field_map.iter().map(|(k, v)| (k.clone(), v.clone())));

  MappingConfig {
    source,
    target,
    omit_fields,
    field_map,
    correspondence,
  }
}

/// A retype may change the element type only. Wrappers must line up, and a
/// nested source cannot be retyped to another record, since no conversion
/// between two unrelated records is generated.
fn retype_compatible(source: &FieldInfo, ty: &TypeExpr) -> bool {
  let from = source.shape();
  let to = ty.shape();
  from.pointer == to.pointer
    && from.sequence == to.sequence
    && from.element_optional == to.element_optional
    && from.boxed == to.boxed
    && !(source.is_nested && to.element.is_user_record())
}

/// The source type without the source namespace qualifier. Nested element
/// types name the local generated struct.
fn target_type(field: &FieldInfo, namespace_path: &str) -> TypeExpr {
  let ty = field.ty.strip_namespace(namespace_path);
  if field.is_nested {
    ty.map_element(TypeExpr::unqualified)
  } else {
    ty
  }
}
