use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::models::{Article, ArticleRow, ArticleSummary, Comment, Topic, User};

#[derive(Debug, Deserialize, Serialize)]
pub struct TopicsWrapper {
    pub topics: Vec<Topic>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UsersWrapper {
    pub users: Vec<User>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UserWrapper {
    pub user: User,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ArticlesWrapper {
    pub articles: Vec<ArticleSummary>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ArticleWrapper {
    pub article: Article,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdatedArticleWrapper {
    #[serde(rename = "updatedArticle")]
    pub updated_article: ArticleRow,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CommentsWrapper {
    pub comments: Vec<Comment>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NewCommentWrapper {
    #[serde(rename = "newComment")]
    pub new_comment: Comment,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdatedCommentWrapper {
    #[serde(rename = "updatedComment")]
    pub updated_comment: Comment,
}

/// The endpoint catalog is passed through untouched, key order included.
#[derive(Debug, Deserialize, Serialize)]
pub struct EndpointsWrapper {
    pub endpoints: Box<RawValue>,
}
