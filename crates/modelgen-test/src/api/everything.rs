use chrono::{DateTime, NaiveDate, Utc};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Organization {
  pub id: u64,
  pub name: String,
  pub r#type: String,
  pub parent: Option<Box<Organization>>,
  pub members: Vec<Member>,
  pub settings: Settings,
  pub created_at: Option<DateTime<Utc>>,
  pub timeout: Duration,
  pub ratio: f64,
  pub grade: char,
  pub labels: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Member {
  pub name: String,
  pub role: String,
  pub since: Option<NaiveDate>,
  pub reports: Vec<Box<Member>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
  pub theme: String,
  pub retries: u8,
  pub verbose: bool,
}
