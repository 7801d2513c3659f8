use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Topic {
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub username: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// A full article row with its computed comment count.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub article_id: i64,
    pub title: String,
    pub topic: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub votes: i64,
    pub article_img_url: String,
    pub comment_count: i64,
}

/// Article as listed by `GET /api/articles`, without its body.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ArticleSummary {
    pub author: String,
    pub title: String,
    pub article_id: i64,
    pub topic: String,
    pub created_at: DateTime<Utc>,
    pub votes: i64,
    pub article_img_url: String,
    pub comment_count: i64,
}

/// Article row as returned straight from a vote update.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ArticleRow {
    pub article_id: i64,
    pub title: String,
    pub topic: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub votes: i64,
    pub article_img_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub comment_id: i64,
    pub body: String,
    pub article_id: i64,
    pub author: String,
    pub votes: i64,
    pub created_at: DateTime<Utc>,
}
