//! Discovery of struct shapes from Rust source.

use crate::error::DiscoveryError;
use crate::model::{FieldInfo, StructInfo};
use crate::shape::TypeExpr;
use std::path::Path;
use syn::{Fields, Item, ItemStruct};
use tracing::debug;

/// Describes the top-level structs of one source module.
pub struct Introspector {
  namespace_path: String,
  file: syn::File,
}

impl Introspector {
  /// `namespace_path` is how generated code reaches the module, e.g.
  /// `crate::api`.
  pub fn from_source(namespace_path: &str, source: &str) -> Result<Self, DiscoveryError> {
    validate_namespace(namespace_path)?;
    let file = syn::parse_file(source).map_err(|err| DiscoveryError::Parse(err.to_string()))?;
    Ok(Self {
      namespace_path: namespace_path.trim().to_string(),
      file,
    })
  }

  pub fn from_file(namespace_path: &str, path: impl AsRef<Path>) -> Result<Self, DiscoveryError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| DiscoveryError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_source(namespace_path, &source)
  }

  pub fn namespace_path(&self) -> &str {
    &self.namespace_path
  }

  /// Names of every top-level struct, in declaration order.
  pub fn struct_names(&self) -> Vec<String> {
    self
      .structs()
      .map(|item| item.ident.to_string())
      .collect()
  }

  pub fn introspect(&self, type_name: &str) -> Result<StructInfo, DiscoveryError> {
    let item = self
      .structs()
      .find(|item| item.ident == type_name)
      .ok_or_else(|| DiscoveryError::NotFound(type_name.to_string()))?;
    describe_struct(item, &self.namespace_path)
  }

  fn structs(&self) -> impl Iterator<Item = &ItemStruct> {
    self.file.items.iter().filter_map(|item| match item {
      Item::Struct(v) => Some(v),
      _ => None,
    })
  }
}

/// Describes an already parsed struct item.
pub fn describe_struct(item: &ItemStruct, namespace_path: &str) -> Result<StructInfo, DiscoveryError> {
  validate_namespace(namespace_path)?;
  let type_name = item.ident.to_string();

  if !item.generics.params.is_empty() {
    return Err(DiscoveryError::Unsupported {
      type_name,
      reason: "generic structs cannot be mapped",
    });
  }

  let fields = match item.fields {
    Fields::Named(ref fields) => fields
      .named
      .iter()
      .filter_map(|field| {
        field
          .ident
          .as_ref()
          .map(|ident| FieldInfo::new(ident.to_string(), TypeExpr::from_type(&field.ty)))
      })
      .collect::<Vec<_>>(),
    _ => {
      return Err(DiscoveryError::Unsupported {
        type_name,
        reason: "only structs with named fields are supported",
      })
    }
  };

  // A record the generator cannot reach through the supported wrappers would
  // be copied verbatim into a type that names the local struct.
  if let Some(field) = fields
    .iter()
    .find(|f| !f.is_nested && f.ty.contains_user_record())
  {
    return Err(DiscoveryError::UnsupportedField {
      type_name,
      field: field.name.clone(),
      ty: field.ty.to_string(),
    });
  }

  debug!(
    namespace = namespace_path,
    type_name = type_name.as_str(),
    fields = fields.len(),
    "introspected struct"
  );

  Ok(StructInfo::new(namespace_path, type_name, fields))
}

fn validate_namespace(namespace_path: &str) -> Result<(), DiscoveryError> {
  let trimmed = namespace_path.trim();
  if trimmed.is_empty() || syn::parse_str::<syn::Path>(trimmed).is_err() {
    return Err(DiscoveryError::InvalidNamespace(namespace_path.to_string()));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  const SOURCE: &str = r#"
    use chrono::{DateTime, Utc};

    /// Blog represents an external API blog model
    pub struct Blog {
      pub id: i64,
      pub title: String,
      pub author: Author,
      pub editor: Option<Box<Author>>,
      pub posts: Vec<Post>,
      pub published_at: DateTime<Utc>,
      pub r#type: String,
    }

    pub struct Author {
      pub name: String,
    }

    pub struct Post {
      pub title: String,
      pub tags: Vec<String>,
    }

    pub struct Pair(i32, i32);

    pub struct Page<T> {
      pub items: Vec<T>,
    }

    pub enum Kind {
      A,
    }
  "#;

  fn introspector() -> Introspector {
    Introspector::from_source("crate::api", SOURCE).unwrap()
  }

  #[test]
  fn test_struct_names() {
    assert_eq!(introspector().struct_names(), vec!["Blog", "Author", "Post", "Pair", "Page"]);
  }

  #[test]
  fn test_introspect() {
    let info = introspector().introspect("Blog").unwrap();
    assert_eq!(info.type_name, "Blog");
    assert_eq!(info.qualified_namespace, "api");
    assert_eq!(info.namespace_path, "crate::api");

    let names: Vec<_> = info.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
      names,
      vec!["id", "title", "author", "editor", "posts", "published_at", "r#type"]
    );

    let author = info.field("author").unwrap();
    assert!(author.is_nested && !author.is_pointer && !author.is_sequence);

    let editor = info.field("editor").unwrap();
    assert!(editor.is_nested && editor.is_pointer && editor.shape().boxed);

    let posts = info.field("posts").unwrap();
    assert!(posts.is_nested && posts.is_sequence);

    let published_at = info.field("published_at").unwrap();
    assert!(!published_at.is_nested);
    assert_eq!(published_at.ty.to_string(), "DateTime<Utc>");
  }

  #[test]
  fn test_not_found() {
    match introspector().introspect("Kind") {
      Err(DiscoveryError::NotFound(name)) => assert_eq!(name, "Kind"),
      other => panic!("unexpected: {:?}", other),
    }
  }

  #[test]
  fn test_unsupported() {
    assert!(matches!(
      introspector().introspect("Pair"),
      Err(DiscoveryError::Unsupported { .. })
    ));
    assert!(matches!(
      introspector().introspect("Page"),
      Err(DiscoveryError::Unsupported { .. })
    ));
  }

  #[test]
  fn test_unreachable_record_field() {
    let introspector = Introspector::from_source(
      "crate::api",
      r#"
        pub struct Feed {
          pub items: Vec<Option<Post>>,
          pub pages: Vec<Vec<Post>>,
        }

        pub struct Index {
          pub by_title: HashMap<String, Post>,
        }

        pub struct Post {
          pub title: String,
        }
      "#,
    )
    .unwrap();

    match introspector.introspect("Feed") {
      Err(DiscoveryError::UnsupportedField { type_name, field, ty }) => {
        assert_eq!(type_name, "Feed");
        assert_eq!(field, "pages");
        assert_eq!(ty, "Vec<Vec<Post>>");
      }
      other => panic!("unexpected: {:?}", other),
    }
    assert!(matches!(
      introspector.introspect("Index"),
      Err(DiscoveryError::UnsupportedField { .. })
    ));
  }

  #[test]
  fn test_sequence_of_optional_records() {
    let introspector = Introspector::from_source(
      "crate::api",
      "pub struct Feed { pub items: Vec<Option<Post>>, pub tags: Vec<Option<String>> }",
    )
    .unwrap();
    let info = introspector.introspect("Feed").unwrap();

    let items = info.field("items").unwrap();
    assert!(items.is_nested && items.is_sequence && !items.is_pointer);
    assert!(items.shape().element_optional);

    let tags = info.field("tags").unwrap();
    assert!(!tags.is_nested && tags.shape().element_optional);
  }

  #[test]
  fn test_invalid_input() {
    assert!(matches!(
      Introspector::from_source("crate::api", "pub struct {"),
      Err(DiscoveryError::Parse(_))
    ));
    assert!(matches!(
      Introspector::from_source("not a path", SOURCE),
      Err(DiscoveryError::InvalidNamespace(_))
    ));
    assert!(matches!(
      Introspector::from_file("crate::api", "/nonexistent/api.rs"),
      Err(DiscoveryError::Io { .. })
    ));
  }
}
