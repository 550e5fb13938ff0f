//! Structural type descriptors and the classification rules the generator
//! depends on.
//!
//! A [`TypeExpr`] is built once from a `syn::Type` by the introspector. The
//! wrappers the generator understands (`Option`, `Vec`, `Box`) become their
//! own variants; everything it never looks into is kept as [`TypeExpr::Opaque`]
//! text.

use proc_macro2::TokenStream;
use quote::{format_ident, quote, ToTokens};
use std::collections::BTreeSet;
use std::fmt;
use syn::{GenericArgument, Path, PathArguments, Type, TypePath};

const PRIMITIVES: &[&str] = &[
  "bool", "char", "str", "String", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32",
  "u64", "u128", "usize", "f32", "f64",
];

const STD_TYPES: &[&str] = &[
  "Option", "Vec", "Box", "Rc", "Arc", "Cow", "Cell", "RefCell", "PhantomData", "Result",
  "VecDeque",
];

/// Library types treated as primitives: never recursed into, imported by name
/// when referenced unqualified.
pub const WELL_KNOWN: &[(&str, &str)] = &[
  ("BTreeMap", "std::collections::BTreeMap"),
  ("BTreeSet", "std::collections::BTreeSet"),
  ("DateTime", "chrono::DateTime"),
  ("Decimal", "rust_decimal::Decimal"),
  ("Duration", "std::time::Duration"),
  ("FixedOffset", "chrono::FixedOffset"),
  ("HashMap", "std::collections::HashMap"),
  ("HashSet", "std::collections::HashSet"),
  ("NaiveDate", "chrono::NaiveDate"),
  ("NaiveDateTime", "chrono::NaiveDateTime"),
  ("NaiveTime", "chrono::NaiveTime"),
  ("Utc", "chrono::Utc"),
  ("Uuid", "uuid::Uuid"),
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
  /// `Option<T>`
  Optional(Box<TypeExpr>),
  /// `Vec<T>`
  Sequence(Box<TypeExpr>),
  /// `Box<T>`
  Boxed(Box<TypeExpr>),
  Named {
    segments: Vec<String>,
    args: Vec<TypeExpr>,
  },
  Opaque(String),
}

impl TypeExpr {
  pub fn from_type(ty: &Type) -> Self {
    match ty {
      Type::Paren(v) => Self::from_type(&v.elem),
      Type::Group(v) => Self::from_type(&v.elem),
      Type::Path(TypePath { qself: None, path }) if path.leading_colon.is_none() => {
        Self::from_path(path).unwrap_or_else(|| Self::opaque(ty))
      }
      _ => Self::opaque(ty),
    }
  }

  /// Parses a type written as text, e.g. `Vec<i64>`.
  pub fn parse(src: &str) -> syn::Result<Self> {
    syn::parse_str::<Type>(src).map(|ty| Self::from_type(&ty))
  }

  pub fn named(name: &str) -> Self {
    TypeExpr::Named {
      segments: vec![name.to_string()],
      args: Vec::new(),
    }
  }

  fn opaque(ty: &Type) -> Self {
    TypeExpr::Opaque(ty.to_token_stream().to_string())
  }

  fn from_path(path: &Path) -> Option<Self> {
    let segments: Vec<_> = path.segments.iter().collect();
    let (last, init) = segments.split_last()?;
    if init.iter().any(|s| !s.arguments.is_empty()) {
      return None;
    }

    let mut args = match last.arguments {
      PathArguments::None => Vec::new(),
      PathArguments::AngleBracketed(ref v) => v
        .args
        .iter()
        .map(|arg| match arg {
          GenericArgument::Type(ty) => Some(Self::from_type(ty)),
          _ => None,
        })
        .collect::<Option<Vec<_>>>()?,
      PathArguments::Parenthesized(_) => return None,
    };

    let std_prefix = init.is_empty()
      || ["std", "alloc", "core"].contains(&init[0].ident.to_string().as_str());
    if args.len() == 1 && std_prefix {
      let wrap: Option<fn(Box<TypeExpr>) -> TypeExpr> = match last.ident.to_string().as_str() {
        "Option" => Some(TypeExpr::Optional),
        "Vec" => Some(TypeExpr::Sequence),
        "Box" => Some(TypeExpr::Boxed),
        _ => None,
      };
      if let Some(wrap) = wrap {
        let inner = args.pop()?;
        return Some(wrap(Box::new(inner)));
      }
    }

    Some(TypeExpr::Named {
      segments: path.segments.iter().map(|s| s.ident.to_string()).collect(),
      args,
    })
  }

  /// Peels `Option`, then `Vec`, then the `Option` of a sequence element,
  /// then `Box`, each at most once.
  pub fn shape(&self) -> Shape<'_> {
    let mut shape = Shape {
      pointer: false,
      sequence: false,
      element_optional: false,
      boxed: false,
      element: self,
    };
    if let TypeExpr::Optional(inner) = shape.element {
      shape.pointer = true;
      shape.element = &**inner;
    }
    if let TypeExpr::Sequence(inner) = shape.element {
      shape.sequence = true;
      shape.element = &**inner;
      if let TypeExpr::Optional(inner) = shape.element {
        shape.element_optional = true;
        shape.element = &**inner;
      }
    }
    if let TypeExpr::Boxed(inner) = shape.element {
      shape.boxed = true;
      shape.element = &**inner;
    }
    shape
  }

  /// Rebuilds the type with its element (as found by [`TypeExpr::shape`])
  /// replaced.
  pub fn map_element<F>(&self, f: F) -> TypeExpr
  where
    F: FnOnce(&TypeExpr) -> TypeExpr,
  {
    // Stages: 0 outer `Option`, 1 `Vec`, 2 element `Option`, 3 `Box`.
    fn rebuild<F: FnOnce(&TypeExpr) -> TypeExpr>(ty: &TypeExpr, stage: u8, f: F) -> TypeExpr {
      match ty {
        TypeExpr::Optional(inner) if stage == 0 => TypeExpr::Optional(Box::new(rebuild(inner, 1, f))),
        TypeExpr::Sequence(inner) if stage <= 1 => TypeExpr::Sequence(Box::new(rebuild(inner, 2, f))),
        TypeExpr::Optional(inner) if stage == 2 => TypeExpr::Optional(Box::new(rebuild(inner, 3, f))),
        TypeExpr::Boxed(inner) if stage <= 3 => TypeExpr::Boxed(Box::new(rebuild(inner, 4, f))),
        other => f(other),
      }
    }
    rebuild(self, 0, f)
  }

  /// True for a path naming a user-defined record: not a primitive, not a
  /// standard wrapper and not a well-known library type.
  pub fn is_user_record(&self) -> bool {
    match self {
      TypeExpr::Named { segments, .. } => match segments.last() {
        Some(last) => {
          let last = last.as_str();
          !PRIMITIVES.contains(&last)
            && !STD_TYPES.contains(&last)
            && !WELL_KNOWN.iter().any(|(name, _)| *name == last)
        }
        None => false,
      },
      _ => false,
    }
  }

  /// True when a user-defined record appears anywhere in the type, including
  /// generic arguments and wrappers [`TypeExpr::shape`] does not peel.
  pub fn contains_user_record(&self) -> bool {
    match self {
      TypeExpr::Optional(inner) | TypeExpr::Sequence(inner) | TypeExpr::Boxed(inner) => {
        inner.contains_user_record()
      }
      TypeExpr::Named { args, .. } => {
        self.is_user_record() || args.iter().any(TypeExpr::contains_user_record)
      }
      TypeExpr::Opaque(_) => false,
    }
  }

  /// Drops a leading `namespace_path` (e.g. `crate::api`) or its last segment
  /// (`api`) from every path in the type.
  pub fn strip_namespace(&self, namespace_path: &str) -> TypeExpr {
    let full: Vec<&str> = namespace_path
      .split("::")
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .collect();
    self.strip_segments(&full)
  }

  fn strip_segments(&self, full: &[&str]) -> TypeExpr {
    match self {
      TypeExpr::Optional(inner) => TypeExpr::Optional(Box::new(inner.strip_segments(full))),
      TypeExpr::Sequence(inner) => TypeExpr::Sequence(Box::new(inner.strip_segments(full))),
      TypeExpr::Boxed(inner) => TypeExpr::Boxed(Box::new(inner.strip_segments(full))),
      TypeExpr::Named { segments, args } => {
        let starts_with = |prefix: &[&str]| {
          !prefix.is_empty()
            && segments.len() > prefix.len()
            && segments.iter().zip(prefix).all(|(a, b)| a == b)
        };
        let skip = if starts_with(full) {
          full.len()
        } else if full.len() > 1 && starts_with(&full[full.len() - 1..]) {
          1
        } else {
          0
        };
        TypeExpr::Named {
          segments: segments[skip..].to_vec(),
          args: args.iter().map(|arg| arg.strip_segments(full)).collect(),
        }
      }
      TypeExpr::Opaque(_) => self.clone(),
    }
  }

  /// Keeps only the last path segment, e.g. `crate::api::Author` becomes
  /// `Author`.
  pub fn unqualified(&self) -> TypeExpr {
    match self {
      TypeExpr::Named { segments, args } => TypeExpr::Named {
        segments: segments.last().cloned().into_iter().collect(),
        args: args.clone(),
      },
      other => other.clone(),
    }
  }

  /// Collects the import paths of well-known types referenced by a bare name.
  pub fn collect_imports(&self, imports: &mut BTreeSet<&'static str>) {
    match self {
      TypeExpr::Optional(inner) | TypeExpr::Sequence(inner) | TypeExpr::Boxed(inner) => {
        inner.collect_imports(imports)
      }
      TypeExpr::Named { segments, args } => {
        if let [name] = segments.as_slice() {
          if let Some((_, path)) = WELL_KNOWN.iter().find(|(known, _)| known == name) {
            imports.insert(*path);
          }
        }
        for arg in args {
          arg.collect_imports(imports);
        }
      }
      TypeExpr::Opaque(_) => {}
    }
  }

  pub fn zero_value(&self) -> ZeroValue {
    match self {
      TypeExpr::Optional(_) => ZeroValue::Absent,
      TypeExpr::Sequence(_) => ZeroValue::EmptySequence,
      TypeExpr::Named { .. } if self.is_user_record() => ZeroValue::Record,
      TypeExpr::Named { segments, .. } => match segments.last().map(String::as_str) {
        Some("String") => ZeroValue::Text,
        Some("bool") => ZeroValue::Boolean,
        Some("char") => ZeroValue::Char,
        Some("f32") | Some("f64") => ZeroValue::Float,
        Some(
          "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64" | "u128"
          | "usize",
        ) => ZeroValue::Integer,
        _ => ZeroValue::Default,
      },
      TypeExpr::Boxed(_) | TypeExpr::Opaque(_) => ZeroValue::Default,
    }
  }
}

impl fmt::Display for TypeExpr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TypeExpr::Optional(inner) => write!(f, "Option<{}>", inner),
      TypeExpr::Sequence(inner) => write!(f, "Vec<{}>", inner),
      TypeExpr::Boxed(inner) => write!(f, "Box<{}>", inner),
      TypeExpr::Named { segments, args } => {
        f.write_str(&segments.join("::"))?;
        if !args.is_empty() {
          let args: Vec<_> = args.iter().map(ToString::to_string).collect();
          write!(f, "<{}>", args.join(", "))?;
        }
        Ok(())
      }
      TypeExpr::Opaque(src) => f.write_str(src),
    }
  }
}

impl ToTokens for TypeExpr {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    match self {
      TypeExpr::Optional(inner) => tokens.extend(quote!(Option<#inner>)),
      TypeExpr::Sequence(inner) => tokens.extend(quote!(Vec<#inner>)),
      TypeExpr::Boxed(inner) => tokens.extend(quote!(Box<#inner>)),
      TypeExpr::Named { segments, args } => {
        let segments = segments.iter().map(|s| format_ident!("{}", s));
        tokens.extend(quote!(#(#segments)::*));
        if !args.is_empty() {
          tokens.extend(quote!(<#(#args),*>));
        }
      }
      // Opaque text always comes from a token stream, so it parses back.
      TypeExpr::Opaque(src) => {
        if let Ok(parsed) = src.parse::<TokenStream>() {
          tokens.extend(parsed);
        }
      }
    }
  }
}

/// Wrappers around a field's element type.
#[derive(Debug, Clone, Copy)]
pub struct Shape<'a> {
  pub pointer: bool,
  pub sequence: bool,
  /// Sequence elements are `Option`s, e.g. `Vec<Option<Post>>`.
  pub element_optional: bool,
  pub boxed: bool,
  pub element: &'a TypeExpr,
}

/// Placeholder written into an omitted field by the reverse conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroValue {
  Text,
  Integer,
  Float,
  Boolean,
  Char,
  Absent,
  EmptySequence,
  Record,
  Default,
}

impl ToTokens for ZeroValue {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    tokens.extend(match self {
      ZeroValue::Text => quote!(String::new()),
      ZeroValue::Integer => quote!(0),
      ZeroValue::Float => quote!(0.0),
      ZeroValue::Boolean => quote!(false),
      ZeroValue::Char => quote!('\0'),
      ZeroValue::Absent => quote!(None),
      ZeroValue::EmptySequence => quote!(Vec::new()),
      ZeroValue::Record | ZeroValue::Default => quote!(Default::default()),
    })
  }
}
