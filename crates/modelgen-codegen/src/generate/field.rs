//! Per-field value expressions for the two conversion directions.

use crate::matcher::needs_recursive_mapping;
use crate::model::FieldInfo;
use crate::shape::{Shape, TypeExpr};
use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use tracing::trace;

/// How a field's value crosses from one struct to the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
  /// Element-wise nested conversion of a sequence.
  NestedSequence,
  /// Element-wise `Into` of a sequence whose element type changed.
  CastSequence,
  /// Sequence moved as is.
  Sequence,
  /// Nested record behind `Option`, converted only when present.
  NestedPointer,
  /// Nested record held by value.
  NestedValue,
  /// Scalar whose type changed, converted with `Into`.
  Cast,
  /// Plain move.
  Direct,
}

/// Dispatch for the forward direction, in priority order.
pub fn forward_dispatch(source: &FieldInfo, target: &FieldInfo, namespace_path: &str) -> Dispatch {
  let recursive = needs_recursive_mapping(source, target);
  let retyped = source.ty.strip_namespace(namespace_path) != target.ty;

  let dispatch = if source.is_sequence && target.is_sequence {
    if recursive {
      Dispatch::NestedSequence
    } else if retyped {
      Dispatch::CastSequence
    } else {
      Dispatch::Sequence
    }
  } else if recursive {
    if source.is_pointer {
      Dispatch::NestedPointer
    } else {
      Dispatch::NestedValue
    }
  } else if retyped {
    Dispatch::Cast
  } else {
    Dispatch::Direct
  };
  trace!(field = source.name.as_str(), ?dispatch, "forward dispatch");
  dispatch
}

/// Dispatch for the reverse direction. Identical cleaned types short-circuit
/// to a plain move unless the field is a nested record.
pub fn reverse_dispatch(source: &FieldInfo, target: &FieldInfo, namespace_path: &str) -> Dispatch {
  let identical = source.ty.strip_namespace(namespace_path) == target.ty;
  let recursive = needs_recursive_mapping(source, target);

  let dispatch = if identical && !source.is_nested {
    Dispatch::Direct
  } else if source.is_sequence && target.is_sequence {
    if recursive {
      Dispatch::NestedSequence
    } else if identical {
      Dispatch::Sequence
    } else {
      Dispatch::CastSequence
    }
  } else if recursive {
    if target.is_pointer {
      Dispatch::NestedPointer
    } else {
      Dispatch::NestedValue
    }
  } else if identical {
    Dispatch::Direct
  } else {
    Dispatch::Cast
  };
  trace!(field = source.name.as_str(), ?dispatch, "reverse dispatch");
  dispatch
}

/// Value of a target field inside `from_external`, reading from `src`.
pub fn forward_value(dispatch: Dispatch, source: &FieldInfo, target: &FieldInfo) -> TokenStream {
  let ident = source.ident();
  let value = quote!(src.#ident);
  let from = source.shape();
  let to = target.shape();

  match dispatch {
    Dispatch::NestedSequence => {
      let convert = if from.element_optional {
        from_optional(quote!(item), from, to)
      } else {
        from_element(quote!(item), from, to)
      };
      map_sequence(&value, source.is_pointer, quote!(|item| #convert))
    }
    Dispatch::CastSequence => map_sequence(&value, source.is_pointer, cast_element(from)),
    Dispatch::NestedPointer => from_optional(value, from, to),
    Dispatch::NestedValue => from_element(value, from, to),
    Dispatch::Cast => {
      if source.is_pointer {
        quote!(#value.map(Into::into))
      } else {
        quote!(#value.into())
      }
    }
    Dispatch::Sequence | Dispatch::Direct => value,
  }
}

/// Value of a source field inside `into_external`, reading from `self`.
pub fn reverse_value(dispatch: Dispatch, source: &FieldInfo, target: &FieldInfo) -> TokenStream {
  let ident = target.ident();
  let value = quote!(self.#ident);
  let from = target.shape();
  let to = source.shape();

  match dispatch {
    Dispatch::NestedSequence => {
      let convert = if from.element_optional {
        into_optional(quote!(item), from, to)
      } else {
        into_element(quote!(item), from, to)
      };
      map_sequence(&value, target.is_pointer, quote!(|item| #convert))
    }
    Dispatch::CastSequence => map_sequence(&value, target.is_pointer, cast_element(from)),
    Dispatch::NestedPointer => into_optional(value, from, to),
    Dispatch::NestedValue => into_element(value, from, to),
    Dispatch::Cast => {
      if target.is_pointer {
        quote!(#value.map(Into::into))
      } else {
        quote!(#value.into())
      }
    }
    Dispatch::Sequence | Dispatch::Direct => value,
  }
}

/// Placeholder for an omitted field, chosen by its declared type.
pub fn zero_value(source: &FieldInfo) -> TokenStream {
  source.ty.zero_value().into_token_stream()
}

// `iter.map(f).collect()`, guarded by `Option::map` when the sequence may be absent.
fn map_sequence(value: &TokenStream, pointer: bool, f: TokenStream) -> TokenStream {
  if pointer {
    quote!(#value.map(|items| items.into_iter().map(#f).collect()))
  } else {
    quote!(#value.into_iter().map(#f).collect())
  }
}

// An absent nested result degrades to the element's default value.
fn from_element(input: TokenStream, from: Shape<'_>, to: Shape<'_>) -> TokenStream {
  let input = unbox(input, from.boxed);
  let path = type_path(to.element);
  rebox(quote!(#path::from_external(Some(#input)).unwrap_or_default()), to.boxed)
}

// Converts only when present; an absent nested result stays absent.
fn from_optional(input: TokenStream, from: Shape<'_>, to: Shape<'_>) -> TokenStream {
  let value = unbox(quote!(value), from.boxed);
  let path = type_path(to.element);
  let rebox = if to.boxed { quote!(.map(Box::new)) } else { quote!() };
  quote!(#input.and_then(|value| #path::from_external(Some(#value)))#rebox)
}

fn into_optional(input: TokenStream, from: Shape<'_>, to: Shape<'_>) -> TokenStream {
  let convert = into_element(quote!(value), from, to);
  quote!(#input.map(|value| #convert))
}

fn cast_element(from: Shape<'_>) -> TokenStream {
  if from.element_optional {
    quote!(|item| item.map(Into::into))
  } else {
    quote!(Into::into)
  }
}

fn into_element(input: TokenStream, from: Shape<'_>, to: Shape<'_>) -> TokenStream {
  let input = if from.boxed { quote!((*#input)) } else { input };
  rebox(quote!(#input.into_external()), to.boxed)
}

fn unbox(input: TokenStream, boxed: bool) -> TokenStream {
  if boxed {
    quote!(*#input)
  } else {
    input
  }
}

fn rebox(value: TokenStream, boxed: bool) -> TokenStream {
  if boxed {
    quote!(Box::new(#value))
  } else {
    value
  }
}

// Generic element types need the qualified-path form to call an associated fn.
fn type_path(ty: &TypeExpr) -> TokenStream {
  match ty {
    TypeExpr::Named { args, .. } if args.is_empty() => ty.to_token_stream(),
    _ => quote!(<#ty>),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use syn::Expr;

  const NS: &str = "crate::api";

  fn field(name: &str, ty: &str) -> FieldInfo {
    FieldInfo::new(name, TypeExpr::parse(ty).unwrap())
  }

  fn assert_expr(actual: TokenStream, expected: TokenStream) {
    let actual: Expr = syn::parse2(actual).unwrap();
    let expected: Expr = syn::parse2(expected).unwrap();
    assert_eq!(actual, expected);
  }

  #[test]
  fn test_forward_dispatch() {
    let cases = [
      ("Vec<Post>", "Vec<Post>", Dispatch::NestedSequence),
      ("Option<Vec<api::Post>>", "Option<Vec<Post>>", Dispatch::NestedSequence),
      ("Vec<i32>", "Vec<i64>", Dispatch::CastSequence),
      ("Vec<String>", "Vec<String>", Dispatch::Sequence),
      ("Option<Author>", "Option<Author>", Dispatch::NestedPointer),
      ("Author", "Author", Dispatch::NestedValue),
      ("i32", "i64", Dispatch::Cast),
      ("String", "String", Dispatch::Direct),
      ("DateTime<Utc>", "DateTime<Utc>", Dispatch::Direct),
    ];
    for (from, to, expected) in &cases {
      let dispatch = forward_dispatch(&field("f", from), &field("f", to), NS);
      assert_eq!(dispatch, *expected, "{} -> {}", from, to);
    }
  }

  #[test]
  fn test_reverse_dispatch() {
    let cases = [
      ("Vec<Post>", "Vec<Post>", Dispatch::NestedSequence),
      ("Vec<i32>", "Vec<i64>", Dispatch::CastSequence),
      ("Vec<String>", "Vec<String>", Dispatch::Direct),
      ("Option<api::Author>", "Option<Author>", Dispatch::NestedPointer),
      ("Author", "Author", Dispatch::NestedValue),
      ("i32", "i64", Dispatch::Cast),
      ("api::Code", "Code", Dispatch::NestedValue),
      ("u8", "u8", Dispatch::Direct),
    ];
    for (from, to, expected) in &cases {
      let dispatch = reverse_dispatch(&field("f", from), &field("f", to), NS);
      assert_eq!(dispatch, *expected, "{} -> {}", from, to);
    }
  }

  #[test]
  fn test_forward_nested_sequence() {
    let source = field("posts", "Vec<Post>");
    let target = field("posts", "Vec<Post>");
    assert_expr(
      forward_value(Dispatch::NestedSequence, &source, &target),
      quote!(src
        .posts
        .into_iter()
        .map(|item| Post::from_external(Some(item)).unwrap_or_default())
        .collect()),
    );

    let source = field("posts", "Option<Vec<Box<Post>>>");
    let target = field("posts", "Option<Vec<Box<Post>>>");
    assert_expr(
      forward_value(Dispatch::NestedSequence, &source, &target),
      quote!(src.posts.map(|items| items
        .into_iter()
        .map(|item| Box::new(Post::from_external(Some(*item)).unwrap_or_default()))
        .collect())),
    );
  }

  #[test]
  fn test_sequence_of_optional_records() {
    let source = field("items", "Vec<Option<api::Post>>");
    let target = field("items", "Vec<Option<Post>>");
    assert_eq!(forward_dispatch(&source, &target, NS), Dispatch::NestedSequence);
    assert_eq!(reverse_dispatch(&source, &target, NS), Dispatch::NestedSequence);
    assert_expr(
      forward_value(Dispatch::NestedSequence, &source, &target),
      quote!(src
        .items
        .into_iter()
        .map(|item| item.and_then(|value| Post::from_external(Some(value))))
        .collect()),
    );
    assert_expr(
      reverse_value(Dispatch::NestedSequence, &source, &target),
      quote!(self
        .items
        .into_iter()
        .map(|item| item.map(|value| value.into_external()))
        .collect()),
    );

    let source = field("items", "Option<Vec<Option<Box<Post>>>>");
    assert_expr(
      forward_value(Dispatch::NestedSequence, &source, &source),
      quote!(src.items.map(|items| items
        .into_iter()
        .map(|item| item.and_then(|value| Post::from_external(Some(*value))).map(Box::new))
        .collect())),
    );
    assert_expr(
      reverse_value(Dispatch::NestedSequence, &source, &source),
      quote!(self.items.map(|items| items
        .into_iter()
        .map(|item| item.map(|value| Box::new((*value).into_external())))
        .collect())),
    );

    let source = field("scores", "Vec<Option<i32>>");
    let target = field("scores", "Vec<Option<i64>>");
    assert_expr(
      forward_value(Dispatch::CastSequence, &source, &target),
      quote!(src.scores.into_iter().map(|item| item.map(Into::into)).collect()),
    );
  }

  #[test]
  fn test_forward_sequences() {
    let source = field("scores", "Option<Vec<i32>>");
    let target = field("scores", "Option<Vec<i64>>");
    assert_expr(
      forward_value(Dispatch::CastSequence, &source, &target),
      quote!(src.scores.map(|items| items.into_iter().map(Into::into).collect())),
    );

    let source = field("tags", "Vec<String>");
    assert_expr(forward_value(Dispatch::Sequence, &source, &source), quote!(src.tags));
  }

  #[test]
  fn test_forward_nested_pointer() {
    let source = field("author", "Option<api::Author>");
    let target = field("author", "Option<Author>");
    assert_expr(
      forward_value(Dispatch::NestedPointer, &source, &target),
      quote!(src.author.and_then(|value| Author::from_external(Some(value)))),
    );

    let source = field("parent", "Option<Box<Node>>");
    assert_expr(
      forward_value(Dispatch::NestedPointer, &source, &source),
      quote!(src
        .parent
        .and_then(|value| Node::from_external(Some(*value)))
        .map(Box::new)),
    );
  }

  #[test]
  fn test_forward_nested_value() {
    let source = field("author", "Author");
    assert_expr(
      forward_value(Dispatch::NestedValue, &source, &source),
      quote!(Author::from_external(Some(src.author)).unwrap_or_default()),
    );
  }

  #[test]
  fn test_forward_direct_and_cast() {
    let source = field("id", "i32");
    let target = field("id", "i64");
    assert_expr(forward_value(Dispatch::Direct, &source, &source), quote!(src.id));
    assert_expr(forward_value(Dispatch::Cast, &source, &target), quote!(src.id.into()));

    let source = field("id", "Option<i32>");
    let target = field("id", "Option<i64>");
    assert_expr(
      forward_value(Dispatch::Cast, &source, &target),
      quote!(src.id.map(Into::into)),
    );
  }

  #[test]
  fn test_reverse_values() {
    let source = field("posts", "Option<Vec<Post>>");
    let target = field("articles", "Option<Vec<Post>>");
    assert_expr(
      reverse_value(Dispatch::NestedSequence, &source, &target),
      quote!(self
        .articles
        .map(|items| items.into_iter().map(|item| item.into_external()).collect())),
    );

    let source = field("author", "Option<Box<Author>>");
    assert_expr(
      reverse_value(Dispatch::NestedPointer, &source, &source),
      quote!(self.author.map(|value| Box::new((*value).into_external()))),
    );

    let source = field("author", "Author");
    assert_expr(
      reverse_value(Dispatch::NestedValue, &source, &source),
      quote!(self.author.into_external()),
    );

    let source = field("id", "i32");
    let target = field("external_id", "i64");
    assert_expr(
      reverse_value(Dispatch::Direct, &source, &target),
      quote!(self.external_id),
    );
    assert_expr(
      reverse_value(Dispatch::Cast, &source, &target),
      quote!(self.external_id.into()),
    );
  }

  #[test]
  fn test_zero_values() {
    let cases = [
      ("String", quote!(String::new())),
      ("i64", quote!(0)),
      ("f64", quote!(0.0)),
      ("bool", quote!(false)),
      ("Option<Author>", quote!(None)),
      ("Vec<Post>", quote!(Vec::new())),
      ("Author", quote!(Default::default())),
    ];
    for (ty, expected) in cases.iter().cloned() {
      assert_expr(zero_value(&field("f", ty)), expected);
    }
  }
}
