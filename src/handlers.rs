use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};
use serde_json::value::RawValue;

use crate::{
    data_formats::*,
    db_helpers::{
        check_exists, delete_comment_in_db, get_article_by_id_in_db, get_user_by_username_in_db,
        insert_article_in_db, insert_comment_in_db, list_articles_in_db,
        list_comments_for_article_in_db, list_topics_in_db, list_users_in_db,
        update_article_votes_in_db, update_comment_votes_in_db, Lookup, NewComment,
    },
    errors::{RequestError, ROUTE_NOT_FOUND},
    extractors::{ApiJson, ApiJsonOrDefault, ApiPath, ApiQuery},
    AppState, JsonResponse,
};

type JsonResult<T> = Result<JsonResponse<T>, RequestError>;
type State = Extension<Arc<AppState>>;

fn ok<T>(body: T) -> JsonResult<T> {
    Ok((StatusCode::OK, Json(body)))
}

fn created<T>(body: T) -> JsonResult<T> {
    Ok((StatusCode::CREATED, Json(body)))
}

// ----------------- Helper Handlers -----------------
pub async fn not_found() -> RequestError {
    RequestError::not_found(ROUTE_NOT_FOUND)
}

pub async fn get_endpoints(Extension(state): State) -> JsonResult<EndpointsWrapper> {
    let path = &state.endpoints_path;
    let catalog = tokio::fs::read_to_string(path).await.map_err(|e| {
        RequestError::ServerError(format!("reading {}: {}", path.display(), e))
    })?;
    let endpoints = RawValue::from_string(catalog.trim().to_owned()).map_err(|e| {
        RequestError::ServerError(format!("parsing {}: {}", path.display(), e))
    })?;
    ok(EndpointsWrapper { endpoints })
}

// ----------------- Topic Handlers -----------------
pub async fn get_topics(Extension(state): State) -> JsonResult<TopicsWrapper> {
    let topics = list_topics_in_db(&state.pool).await?;
    ok(TopicsWrapper { topics })
}

// ----------------- User Handlers -----------------
pub async fn get_users(Extension(state): State) -> JsonResult<UsersWrapper> {
    let users = list_users_in_db(&state.pool).await?;
    ok(UsersWrapper { users })
}

pub async fn get_user(
    Extension(state): State,
    ApiPath(username): ApiPath<String>,
) -> JsonResult<UserWrapper> {
    let (user, ()) = tokio::try_join!(
        get_user_by_username_in_db(&state.pool, &username),
        check_exists(&state.pool, Lookup::Username, &username),
    )?;
    let user = user.ok_or_else(|| Lookup::Username.not_found(&username))?;
    ok(UserWrapper { user })
}

// ----------------- Article Handlers -----------------
pub async fn get_articles(
    Extension(state): State,
    ApiQuery(params): ApiQuery<ArticleQueryParams>,
) -> JsonResult<ArticlesWrapper> {
    let ArticleQueryParams {
        topic,
        sort_by,
        order,
    } = params;
    let list = list_articles_in_db(
        &state.pool,
        topic.as_deref(),
        sort_by.as_deref(),
        order.as_deref(),
    );
    let articles = match topic.as_deref() {
        Some(slug) => {
            let (articles, ()) =
                tokio::try_join!(list, check_exists(&state.pool, Lookup::TopicSlug, slug))?;
            articles
        }
        None => list.await?,
    };
    ok(ArticlesWrapper { articles })
}

pub async fn post_article(
    Extension(state): State,
    ApiJson(request): ApiJson<NewArticleRequest>,
) -> JsonResult<ArticleWrapper> {
    let author = request.author.as_deref().unwrap_or_default();
    let topic = request.topic.as_deref().unwrap_or_default();
    tokio::try_join!(
        check_exists(&state.pool, Lookup::Username, author),
        check_exists(&state.pool, Lookup::TopicSlug, topic),
    )?;
    let article = insert_article_in_db(&state.pool, request).await?;
    created(ArticleWrapper { article })
}

pub async fn get_article(
    Extension(state): State,
    ApiPath(article_id): ApiPath<i64>,
) -> JsonResult<ArticleWrapper> {
    let id = article_id.to_string();
    let (article, ()) = tokio::try_join!(
        get_article_by_id_in_db(&state.pool, article_id),
        check_exists(&state.pool, Lookup::ArticleId, &id),
    )?;
    let article = article.ok_or_else(|| Lookup::ArticleId.not_found(&id))?;
    ok(ArticleWrapper { article })
}

pub async fn patch_article(
    Extension(state): State,
    ApiPath(article_id): ApiPath<i64>,
    ApiJsonOrDefault(VoteRequest { inc_votes }): ApiJsonOrDefault<VoteRequest>,
) -> JsonResult<UpdatedArticleWrapper> {
    let id = article_id.to_string();
    let (updated_article, ()) = tokio::try_join!(
        update_article_votes_in_db(&state.pool, article_id, inc_votes),
        check_exists(&state.pool, Lookup::ArticleId, &id),
    )?;
    let updated_article = updated_article.ok_or_else(|| Lookup::ArticleId.not_found(&id))?;
    ok(UpdatedArticleWrapper { updated_article })
}

// ----------------- Comment Handlers -----------------
pub async fn get_article_comments(
    Extension(state): State,
    ApiPath(article_id): ApiPath<i64>,
) -> JsonResult<CommentsWrapper> {
    let id = article_id.to_string();
    let (comments, ()) = tokio::try_join!(
        list_comments_for_article_in_db(&state.pool, article_id),
        check_exists(&state.pool, Lookup::ArticleId, &id),
    )?;
    ok(CommentsWrapper { comments })
}

pub async fn post_article_comment(
    Extension(state): State,
    ApiPath(article_id): ApiPath<i64>,
    ApiJson(request): ApiJson<NewCommentRequest>,
) -> JsonResult<NewCommentWrapper> {
    let comment = NewComment::try_from(request)?;
    check_exists(&state.pool, Lookup::Username, &comment.username).await?;
    check_exists(&state.pool, Lookup::ArticleId, &article_id.to_string()).await?;
    let new_comment = insert_comment_in_db(&state.pool, article_id, comment).await?;
    created(NewCommentWrapper { new_comment })
}

pub async fn delete_comment(
    Extension(state): State,
    ApiPath(comment_id): ApiPath<i64>,
) -> Result<StatusCode, RequestError> {
    delete_comment_in_db(&state.pool, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn patch_comment(
    Extension(state): State,
    ApiPath(comment_id): ApiPath<i64>,
    ApiJsonOrDefault(VoteRequest { inc_votes }): ApiJsonOrDefault<VoteRequest>,
) -> JsonResult<UpdatedCommentWrapper> {
    let id = comment_id.to_string();
    let (updated_comment, ()) = tokio::try_join!(
        update_comment_votes_in_db(&state.pool, comment_id, inc_votes),
        check_exists(&state.pool, Lookup::CommentId, &id),
    )?;
    let updated_comment = updated_comment.ok_or_else(|| Lookup::CommentId.not_found(&id))?;
    ok(UpdatedCommentWrapper { updated_comment })
}
