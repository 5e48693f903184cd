//! Forum topics and comments.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::user::User;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    #[serde(default)]
    pub author: Option<User>,
    pub views: u64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    #[serde(default)]
    pub comments_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicList {
    pub topics: Vec<Topic>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicCreate {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub author_id: i64,
    #[serde(default)]
    pub author: Option<User>,
    #[serde(default)]
    pub topic_id: Option<i64>,
    #[serde(default)]
    pub likes: u64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentCreate {
    pub content: String,
}
