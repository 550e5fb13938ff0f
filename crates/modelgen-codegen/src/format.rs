use crate::error::FormatError;
use proc_macro2::TokenStream;

/// Parses emitted tokens as a source file and pretty-prints them.
pub fn format_tokens(tokens: TokenStream) -> Result<String, FormatError> {
  let raw = tokens.to_string();
  match syn::parse_file(&raw) {
    Ok(file) => Ok(prettyplease::unparse(&file)),
    Err(err) => Err(FormatError {
      message: err.to_string(),
      raw,
    }),
  }
}
