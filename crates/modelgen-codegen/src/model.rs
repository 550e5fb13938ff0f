use crate::shape::{Shape, TypeExpr};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

/// One struct field as discovered or derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
  pub name: String,
  pub ty: TypeExpr,
  pub is_pointer: bool,
  pub is_sequence: bool,
  /// The element type is a user-defined record and needs a conversion call.
  pub is_nested: bool,
}

impl FieldInfo {
  /// Builds a field and classifies its type.
  pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
    let shape = ty.shape();
    let is_pointer = shape.pointer;
    let is_sequence = shape.sequence;
    let is_nested = shape.element.is_user_record();
    Self {
      name: name.into(),
      ty,
      is_pointer,
      is_sequence,
      is_nested,
    }
  }

  pub fn shape(&self) -> Shape<'_> {
    self.ty.shape()
  }

  pub fn ident(&self) -> Ident {
    format_ident!("{}", self.name)
  }
}

/// One struct as discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructInfo {
  /// Last segment of `namespace_path`, e.g. `api`.
  pub qualified_namespace: String,
  /// Path the generated code imports the namespace through, e.g. `crate::api`.
  pub namespace_path: String,
  pub type_name: String,
  pub fields: Vec<FieldInfo>,
}

impl StructInfo {
  pub fn new(namespace_path: &str, type_name: impl Into<String>, fields: Vec<FieldInfo>) -> Self {
    let namespace_path = namespace_path.trim().to_string();
    let qualified_namespace = namespace_path
      .rsplit("::")
      .next()
      .map(str::trim)
      .unwrap_or_default()
      .to_string();
    Self {
      qualified_namespace,
      namespace_path,
      type_name: type_name.into(),
      fields,
    }
  }

  pub fn field(&self, name: &str) -> Option<&FieldInfo> {
    self.fields.iter().find(|f| f.name == name)
  }

  pub fn ident(&self) -> Ident {
    format_ident!("{}", self.type_name)
  }

  /// `api::User`, or just `User` when the namespace is empty.
  pub fn qualified_path(&self) -> TokenStream {
    let ident = self.ident();
    if self.qualified_namespace.is_empty() {
      quote!(#ident)
    } else {
      let namespace = format_ident!("{}", self.qualified_namespace);
      quote!(#namespace :: #ident)
    }
  }
}
