use crate::mapping::MappingConfig;
use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use std::collections::BTreeSet;

/// `use` items shared by every unit in one output file.
#[derive(Debug, Default)]
pub(crate) struct Preamble {
  namespaces: BTreeSet<String>,
  imports: BTreeSet<&'static str>,
}

impl Preamble {
  pub(crate) fn add(&mut self, config: &MappingConfig) {
    let namespace = &config.source().namespace_path;
    // A single-segment path is already in scope.
    if namespace.contains("::") {
      self.namespaces.insert(namespace.clone());
    }

    let fields = config.source().fields.iter().chain(&config.target().fields);
    for field in fields {
      field.ty.collect_imports(&mut self.imports);
    }
  }

  #[cfg(test)]
  pub(crate) fn imports(&self) -> impl Iterator<Item = &str> + '_ {
    self.imports.iter().copied()
  }
}

impl ToTokens for Preamble {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    for namespace in &self.namespaces {
      tokens.extend(use_item(namespace, false));
    }
    for import in &self.imports {
      tokens.extend(use_item(import, true));
    }
  }
}

fn use_item(path: &str, allow_unused: bool) -> TokenStream {
  match syn::parse_str::<syn::Path>(path) {
    Ok(path) if allow_unused => quote! {
      #[allow(unused_imports)]
      use #path;
    },
    Ok(path) => quote!(use #path;),
    Err(_) => {
      let message = format!("invalid namespace path `{}`", path);
      quote!(compile_error!(#message);)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{FieldInfo, StructInfo};
  use crate::shape::TypeExpr;

  fn config(namespace: &str, fields: &[(&str, &str)]) -> MappingConfig {
    let fields = fields
      .iter()
      .map(|(name, ty)| FieldInfo::new(*name, TypeExpr::parse(ty).unwrap()))
      .collect();
    MappingConfig::identity(StructInfo::new(namespace, "Event", fields))
  }

  #[test]
  fn test_collects_sorted_imports() {
    let mut preamble = Preamble::default();
    preamble.add(&config(
      "crate::api",
      &[
        ("at", "DateTime<Utc>"),
        ("ttl", "Option<Duration>"),
        ("date", "chrono::NaiveDate"),
      ],
    ));
    preamble.add(&config("crate::other", &[("ttl", "Duration")]));

    let imports: Vec<_> = preamble.imports().collect();
    assert_eq!(imports, vec!["chrono::DateTime", "chrono::Utc", "std::time::Duration"]);

    let expected: syn::File = syn::parse_quote! {
      use crate::api;
      use crate::other;
      #[allow(unused_imports)]
      use chrono::DateTime;
      #[allow(unused_imports)]
      use chrono::Utc;
      #[allow(unused_imports)]
      use std::time::Duration;
    };
    let actual: syn::File = syn::parse2(preamble.into_token_stream()).unwrap();
    assert_eq!(actual, expected);
  }

  #[test]
  fn test_single_segment_namespace() {
    let mut preamble = Preamble::default();
    preamble.add(&config("api", &[("id", "i64")]));
    assert!(preamble.into_token_stream().is_empty());
  }
}
