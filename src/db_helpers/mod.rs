use sqlx::SqlitePool;

use crate::errors::{RequestError, BAD_REQUEST};

mod article_helpers;
mod comment_helpers;
mod topic_helpers;
mod user_helpers;

pub use article_helpers::*;
pub use comment_helpers::*;
pub use topic_helpers::*;
pub use user_helpers::*;

/// Builds an `INSERT` whose column list depends on which fields were supplied.
///
/// Column names are `'static` so only literals written in this crate can reach
/// an identifier position; every value is bound.
struct InsertBuilder {
    table: &'static str,
    columns: Vec<&'static str>,
    params: Vec<Option<String>>,
}

impl InsertBuilder {
    fn new(table: &'static str) -> Self {
        Self {
            table,
            columns: vec![],
            params: vec![],
        }
    }

    /// Always inserts `column`; a `None` value is bound as NULL so the
    /// table's NOT NULL constraints get the final say.
    fn add_param(mut self, column: &'static str, param: Option<String>) -> Self {
        self.columns.push(column);
        self.params.push(param);
        self
    }

    /// Inserts `column` only when a value is present, leaving the column
    /// default in place otherwise.
    fn add_optional_param(self, column: &'static str, param: Option<String>) -> Self {
        match param {
            Some(value) => self.add_param(column, Some(value)),
            None => self,
        }
    }

    fn build(self, returning: &'static str) -> (String, Vec<Option<String>>) {
        let placeholders = vec!["?"; self.columns.len()].join(", ");
        let query = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            self.table,
            self.columns.join(", "),
            placeholders,
            returning
        );
        (query, self.params)
    }
}

// ----------------- Existence Checks -----------------

/// The (table, column) pairs an existence check may look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    TopicSlug,
    Username,
    ArticleId,
    CommentId,
}

impl Lookup {
    fn table(self) -> &'static str {
        match self {
            Lookup::TopicSlug => "topics",
            Lookup::Username => "users",
            Lookup::ArticleId => "articles",
            Lookup::CommentId => "comments",
        }
    }

    fn column(self) -> &'static str {
        match self {
            Lookup::TopicSlug => "slug",
            Lookup::Username => "username",
            Lookup::ArticleId => "article_id",
            Lookup::CommentId => "comment_id",
        }
    }

    pub fn not_found(self, value: &str) -> RequestError {
        RequestError::not_found(format!("{} '{}' not found", self.column(), value))
    }
}

pub async fn check_exists(
    pool: &SqlitePool,
    lookup: Lookup,
    value: &str,
) -> Result<(), RequestError> {
    if value.is_empty() {
        return Err(RequestError::bad_request(BAD_REQUEST));
    }
    let query = format!(
        "SELECT 1 FROM {} WHERE {} = ? LIMIT 1",
        lookup.table(),
        lookup.column()
    );
    let found = sqlx::query(&query).bind(value).fetch_optional(pool).await?;
    match found {
        Some(_) => Ok(()),
        None => Err(lookup.not_found(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_builder_skips_absent_optional_columns() {
        let (query, params) = InsertBuilder::new("articles")
            .add_param("title", Some("Hello".to_string()))
            .add_optional_param("article_img_url", None)
            .build("article_id");
        assert_eq!(
            query,
            "INSERT INTO articles (title) VALUES (?) RETURNING article_id"
        );
        assert_eq!(params, vec![Some("Hello".to_string())]);
    }

    #[test]
    fn insert_builder_binds_missing_required_values_as_null() {
        let (query, params) = InsertBuilder::new("comments")
            .add_param("author", Some("lurker".to_string()))
            .add_param("body", None)
            .add_optional_param("votes", Some("3".to_string()))
            .build("*");
        assert_eq!(
            query,
            "INSERT INTO comments (author, body, votes) VALUES (?, ?, ?) RETURNING *"
        );
        assert_eq!(
            params,
            vec![Some("lurker".to_string()), None, Some("3".to_string())]
        );
    }

    #[test]
    fn not_found_message_names_the_column() {
        let message = Lookup::TopicSlug.not_found("bananas").to_string();
        assert_eq!(message, "slug 'bananas' not found");
        let message = Lookup::ArticleId.not_found("999").to_string();
        assert_eq!(message, "article_id '999' not found");
    }
}
