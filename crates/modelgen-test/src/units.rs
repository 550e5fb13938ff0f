//! Local value types the generated models are retyped to.

/// An amount in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cents(pub i64);

impl From<i64> for Cents {
  fn from(value: i64) -> Self {
    Cents(value)
  }
}

impl From<Cents> for i64 {
  fn from(value: Cents) -> Self {
    value.0
  }
}
