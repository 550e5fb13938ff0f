use super::field::{forward_dispatch, forward_value, reverse_dispatch, reverse_value, zero_value};
use crate::mapping::MappingConfig;
use proc_macro2::TokenStream;
use quote::{quote, ToTokens};

/// Struct definition plus both conversions for one mapping.
pub(crate) struct MappingUnit<'a> {
  config: &'a MappingConfig,
}

impl<'a> MappingUnit<'a> {
  pub(crate) fn new(config: &'a MappingConfig) -> Self {
    Self { config }
  }

  fn struct_tokens(&self) -> TokenStream {
    let source = self.config.source();
    let target = self.config.target();
    let ident = target.ident();
    let doc = format!(
      " Local mirror of `{}::{}`.",
      source.qualified_namespace, source.type_name
    );
    let fields = target.fields.iter().map(|field| {
      let name = field.ident();
      let ty = &field.ty;
      quote!(pub #name: #ty)
    });

    quote! {
      #[doc = #doc]
      #[derive(Debug, Clone, Default, PartialEq)]
      pub struct #ident {
        #(#fields),*
      }
    }
  }

  fn forward_tokens(&self) -> TokenStream {
    let namespace = &self.config.source().namespace_path;
    let assign_items: Vec<_> = self
      .config
      .source()
      .fields
      .iter()
      .filter_map(|source| {
        let target = self.config.target_field(source)?;
        let dispatch = forward_dispatch(source, target, namespace);
        let value = forward_value(dispatch, source, target);
        let name = target.ident();
        Some(quote!(#name: #value))
      })
      .collect();

    let bind = if assign_items.is_empty() {
      quote!(let _ = src?;)
    } else {
      quote!(let src = src?;)
    };
    let source_path = self.config.source().qualified_path();

    quote! {
      /// Maps an external value into the local struct. `None` maps to `None`.
      pub fn from_external(src: Option<#source_path>) -> Option<Self> {
        #bind
        Some(Self {
          #(#assign_items),*
        })
      }
    }
  }

  fn reverse_tokens(&self) -> TokenStream {
    let namespace = &self.config.source().namespace_path;
    let assign_items = self.config.source().fields.iter().map(|source| {
      let name = source.ident();
      let value = match self.config.target_field(source) {
        Some(target) => {
          let dispatch = reverse_dispatch(source, target, namespace);
          reverse_value(dispatch, source, target)
        }
        None => zero_value(source),
      };
      quote!(#name: #value)
    });
    let source_path = self.config.source().qualified_path();

    quote! {
      /// Maps the local struct back into the external type. Omitted fields
      /// are filled with zero values.
      pub fn into_external(self) -> #source_path {
        #source_path {
          #(#assign_items),*
        }
      }
    }
  }
}

impl<'a> ToTokens for MappingUnit<'a> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let ident = self.config.target().ident();
    let source_path = self.config.source().qualified_path();
    let struct_tokens = self.struct_tokens();
    let forward_tokens = self.forward_tokens();
    let reverse_tokens = self.reverse_tokens();

    tokens.extend(quote! {
      #struct_tokens

      impl #ident {
        #forward_tokens

        #reverse_tokens
      }

      impl std::convert::From<#source_path> for #ident {
        fn from(src: #source_path) -> Self {
          Self::from_external(Some(src)).unwrap_or_default()
        }
      }

      impl std::convert::From<#ident> for #source_path {
        fn from(local: #ident) -> Self {
          local.into_external()
        }
      }
    });
  }
}
