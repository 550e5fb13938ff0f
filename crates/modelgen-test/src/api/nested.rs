use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Blog {
  pub id: i64,
  pub title: String,
  pub author: Author,
  pub editor: Option<Author>,
  pub posts: Vec<Post>,
  pub drafts: Option<Vec<Post>>,
  pub featured: Vec<Option<Post>>,
  pub tags: Vec<String>,
  pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Author {
  pub name: String,
  pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Post {
  pub title: String,
  pub body: String,
  pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comment {
  pub text: String,
  pub upvotes: u32,
}
