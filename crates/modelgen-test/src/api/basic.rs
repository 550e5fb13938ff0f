#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
  pub id: i64,
  pub name: String,
  pub email: String,
  pub active: bool,
}
