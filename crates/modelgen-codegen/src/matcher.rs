//! Nominal field correspondence between two structures.

use crate::model::{FieldInfo, StructInfo};
use std::collections::{BTreeMap, BTreeSet};

/// Identity entries for every source field whose name exactly matches a
/// target field. Unmatched fields are simply absent.
pub fn match_fields(source: &StructInfo, target: &StructInfo) -> BTreeMap<String, String> {
  let target_fields: BTreeSet<&str> = target.fields.iter().map(|f| f.name.as_str()).collect();
  source
    .fields
    .iter()
    .filter(|f| target_fields.contains(f.name.as_str()))
    .map(|f| (f.name.clone(), f.name.clone()))
    .collect()
}

/// Both sides are nested records, so the field needs a conversion call
/// instead of a direct assignment.
pub fn needs_recursive_mapping(source_field: &FieldInfo, target_field: &FieldInfo) -> bool {
  source_field.is_nested && target_field.is_nested
}
