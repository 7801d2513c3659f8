use sqlx::{Sqlite, SqlitePool};

use crate::{data_formats::NewCommentRequest, errors::RequestError, models::Comment};

use super::article_helpers::MISSING_VOTE_INCREMENT;

const COMMENT_COLUMNS: &str = "comment_id, body, article_id, author, votes, created_at";

/// A comment whose required fields are known to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub username: String,
    pub body: String,
}

impl TryFrom<NewCommentRequest> for NewComment {
    type Error = RequestError;

    fn try_from(NewCommentRequest { username, body }: NewCommentRequest) -> Result<Self, Self::Error> {
        let body = body
            .filter(|body| !body.is_empty())
            .ok_or_else(|| RequestError::bad_request("missing field - body"))?;
        let username = username
            .filter(|username| !username.is_empty())
            .ok_or_else(|| RequestError::bad_request("missing field - username"))?;
        Ok(NewComment { username, body })
    }
}

pub async fn list_comments_for_article_in_db(
    pool: &SqlitePool,
    article_id: i64,
) -> Result<Vec<Comment>, RequestError> {
    let query = format!(
        "SELECT {} FROM comments WHERE article_id = ? ORDER BY created_at DESC",
        COMMENT_COLUMNS
    );
    let comments = sqlx::query_as::<Sqlite, Comment>(&query)
        .bind(article_id)
        .fetch_all(pool)
        .await?;
    Ok(comments)
}

pub async fn insert_comment_in_db(
    pool: &SqlitePool,
    article_id: i64,
    NewComment { username, body }: NewComment,
) -> Result<Comment, RequestError> {
    let query = format!(
        "INSERT INTO comments (body, author, article_id) VALUES (?, ?, ?) RETURNING {}",
        COMMENT_COLUMNS
    );
    let comment = sqlx::query_as::<Sqlite, Comment>(&query)
        .bind(body)
        .bind(username)
        .bind(article_id)
        .fetch_all(pool)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| RequestError::ServerError("comment insert returned no row".into()))?;
    tracing::info!(comment_id = comment.comment_id, article_id, "comment created");
    Ok(comment)
}

pub async fn delete_comment_in_db(pool: &SqlitePool, comment_id: i64) -> Result<(), RequestError> {
    let result = sqlx::query("DELETE FROM comments WHERE comment_id = ?")
        .bind(comment_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::not_found("Comment not found"));
    }
    tracing::info!(comment_id, "comment deleted");
    Ok(())
}

pub async fn update_comment_votes_in_db(
    pool: &SqlitePool,
    comment_id: i64,
    inc_votes: Option<i64>,
) -> Result<Option<Comment>, RequestError> {
    let inc_votes = inc_votes.ok_or_else(|| RequestError::bad_request(MISSING_VOTE_INCREMENT))?;
    let query = format!(
        "UPDATE comments SET votes = votes + ? WHERE comment_id = ? RETURNING {}",
        COMMENT_COLUMNS
    );
    let rows = sqlx::query_as::<Sqlite, Comment>(&query)
        .bind(inc_votes)
        .bind(comment_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().next())
}
