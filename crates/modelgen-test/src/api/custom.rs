#[derive(Debug, Clone, Default, PartialEq)]
pub struct Account {
  pub id: i64,
  pub name: String,
  pub username: String,
  pub email: String,
  pub legacy_field: String,
  pub nickname: Option<String>,
  pub balance: i64,
  pub deposits: Vec<i64>,
}
