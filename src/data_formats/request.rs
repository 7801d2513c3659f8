use serde::{Deserialize, Serialize};

// ----------------- Article Request -----------------
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(default)]
pub struct NewArticleRequest {
    pub author: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub topic: Option<String>,
    pub article_img_url: Option<String>,
}

// ----------------- Comment Request -----------------
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(default)]
pub struct NewCommentRequest {
    pub username: Option<String>,
    pub body: Option<String>,
}

// ----------------- Vote Request -----------------

/// `inc_votes` absent and `inc_votes: 0` are different requests.
#[derive(Deserialize, Serialize, Debug, Default, Clone, Copy)]
#[serde(default)]
pub struct VoteRequest {
    pub inc_votes: Option<i64>,
}
