use std::str::FromStr;

use sqlx::{Sqlite, SqlitePool};

use crate::data_formats::NewArticleRequest;
use crate::errors::RequestError;
use crate::models::{Article, ArticleRow, ArticleSummary};

use super::InsertBuilder;

pub const INVALID_SORT: &str = "Bad Request";
pub const MISSING_VOTE_INCREMENT: &str = "no vote increment provided";

const COMMENT_COUNTS: &str = r#"
            LEFT JOIN (SELECT article_id, COUNT(comment_id) AS comment_count
                       FROM   comments
                       GROUP  BY article_id) AS comment_counts
                   ON comment_counts.article_id = articles.article_id
"#;

const LIST_ARTICLES_QUERY: &str = r#"
            SELECT articles.author                                              AS "author",
                   articles.title                                               AS "title",
                   articles.article_id                                          AS "article_id",
                   articles.topic                                               AS "topic",
                   articles.created_at                                          AS "created_at",
                   articles.votes                                               AS "votes",
                   articles.article_img_url                                     AS "article_img_url",
                   CAST(COALESCE(comment_counts.comment_count, 0) AS INTEGER)   AS "comment_count"
            FROM   articles
"#;

const SINGLE_ARTICLE_QUERY: &str = r#"
            SELECT articles.article_id                                          AS "article_id",
                   articles.title                                               AS "title",
                   articles.topic                                               AS "topic",
                   articles.author                                              AS "author",
                   articles.body                                                AS "body",
                   articles.created_at                                          AS "created_at",
                   articles.votes                                               AS "votes",
                   articles.article_img_url                                     AS "article_img_url",
                   CAST(COALESCE(comment_counts.comment_count, 0) AS INTEGER)   AS "comment_count"
            FROM   articles
"#;

const ARTICLE_ROW_COLUMNS: &str =
    "article_id, title, topic, author, body, created_at, votes, article_img_url";

/// Columns `GET /api/articles` may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArticleSort {
    Author,
    Title,
    ArticleId,
    Topic,
    #[default]
    CreatedAt,
    Votes,
    ArticleImgUrl,
}

impl ArticleSort {
    pub fn column(self) -> &'static str {
        match self {
            ArticleSort::Author => "author",
            ArticleSort::Title => "title",
            ArticleSort::ArticleId => "article_id",
            ArticleSort::Topic => "topic",
            ArticleSort::CreatedAt => "created_at",
            ArticleSort::Votes => "votes",
            ArticleSort::ArticleImgUrl => "article_img_url",
        }
    }
}

impl FromStr for ArticleSort {
    type Err = RequestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "author" => Ok(ArticleSort::Author),
            "title" => Ok(ArticleSort::Title),
            "article_id" => Ok(ArticleSort::ArticleId),
            "topic" => Ok(ArticleSort::Topic),
            "created_at" => Ok(ArticleSort::CreatedAt),
            "votes" => Ok(ArticleSort::Votes),
            "article_img_url" => Ok(ArticleSort::ArticleImgUrl),
            _ => Err(RequestError::bad_request(INVALID_SORT)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = RequestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(RequestError::bad_request(INVALID_SORT)),
        }
    }
}

fn list_articles_query(sort: ArticleSort, order: SortOrder) -> String {
    format!(
        "{}{} WHERE (? IS NULL OR articles.topic = ?) ORDER BY articles.{} {}",
        LIST_ARTICLES_QUERY,
        COMMENT_COUNTS,
        sort.column(),
        order.keyword()
    )
}

// ----------------- Article Queries -----------------
pub async fn list_articles_in_db(
    pool: &SqlitePool,
    topic: Option<&str>,
    sort_by: Option<&str>,
    order: Option<&str>,
) -> Result<Vec<ArticleSummary>, RequestError> {
    let sort = sort_by
        .map(ArticleSort::from_str)
        .transpose()?
        .unwrap_or_default();
    let order = order.map(SortOrder::from_str).transpose()?.unwrap_or_default();

    let query = list_articles_query(sort, order);
    let articles = sqlx::query_as::<Sqlite, ArticleSummary>(&query)
        .bind(topic)
        .bind(topic)
        .fetch_all(pool)
        .await?;
    Ok(articles)
}

pub async fn get_article_by_id_in_db(
    pool: &SqlitePool,
    article_id: i64,
) -> Result<Option<Article>, RequestError> {
    let query = format!(
        "{}{} WHERE articles.article_id = ?",
        SINGLE_ARTICLE_QUERY, COMMENT_COUNTS
    );
    let article = sqlx::query_as::<Sqlite, Article>(&query)
        .bind(article_id)
        .fetch_optional(pool)
        .await?;
    Ok(article)
}

pub async fn update_article_votes_in_db(
    pool: &SqlitePool,
    article_id: i64,
    inc_votes: Option<i64>,
) -> Result<Option<ArticleRow>, RequestError> {
    let inc_votes = inc_votes.ok_or_else(|| RequestError::bad_request(MISSING_VOTE_INCREMENT))?;
    let query = format!(
        "UPDATE articles SET votes = votes + ? WHERE article_id = ? RETURNING {}",
        ARTICLE_ROW_COLUMNS
    );
    // fetch_all steps the statement to completion so the implicit transaction commits
    let rows = sqlx::query_as::<Sqlite, ArticleRow>(&query)
        .bind(inc_votes)
        .bind(article_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().next())
}

pub async fn insert_article_in_db(
    pool: &SqlitePool,
    NewArticleRequest {
        author,
        title,
        body,
        topic,
        article_img_url,
    }: NewArticleRequest,
) -> Result<Article, RequestError> {
    let (query, params) = InsertBuilder::new("articles")
        .add_param("author", author)
        .add_param("title", title)
        .add_param("body", body)
        .add_param("topic", topic)
        .add_optional_param("article_img_url", article_img_url)
        .build("article_id");

    let mut insert = sqlx::query_scalar::<Sqlite, i64>(&query);
    for param in params {
        insert = insert.bind(param);
    }
    let article_id = insert
        .fetch_all(pool)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| RequestError::ServerError("article insert returned no id".into()))?;
    tracing::info!(article_id, "article created");

    get_article_by_id_in_db(pool, article_id)
        .await?
        .ok_or_else(|| RequestError::ServerError(format!("article {article_id} vanished after insert")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_columns_parse_exactly() {
        assert_eq!("votes".parse::<ArticleSort>().ok(), Some(ArticleSort::Votes));
        assert_eq!(
            "article_img_url".parse::<ArticleSort>().ok(),
            Some(ArticleSort::ArticleImgUrl)
        );
        assert!("Votes".parse::<ArticleSort>().is_err());
        assert!("comment_count".parse::<ArticleSort>().is_err());
        assert!("votes; DROP TABLE articles".parse::<ArticleSort>().is_err());
    }

    #[test]
    fn sort_order_is_case_sensitive() {
        assert_eq!("asc".parse::<SortOrder>().ok(), Some(SortOrder::Asc));
        assert_eq!("desc".parse::<SortOrder>().ok(), Some(SortOrder::Desc));
        assert!("ASC".parse::<SortOrder>().is_err());
        assert!("".parse::<SortOrder>().is_err());
    }

    #[test]
    fn invalid_sort_reports_bad_request() {
        let error = "nonsense".parse::<ArticleSort>().unwrap_err();
        assert_eq!(error.to_string(), INVALID_SORT);
    }

    #[test]
    fn list_query_defaults_to_newest_first() {
        let query = list_articles_query(ArticleSort::default(), SortOrder::default());
        assert!(query.ends_with("ORDER BY articles.created_at DESC"));
        let query = list_articles_query(ArticleSort::Title, SortOrder::Asc);
        assert!(query.ends_with("ORDER BY articles.title ASC"));
    }
}
