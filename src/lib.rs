pub mod config;
mod data_formats;
mod db_helpers;
mod errors;
mod extractors;
mod handlers;
mod models;

use std::{net::TcpListener, path::PathBuf, str::FromStr, sync::Arc};

use anyhow::Context;
pub use anyhow::Result;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
pub use config::Config;
pub use data_formats::*;
pub use errors::{ErrorBody, RequestError};
use handlers::*;
pub use models::*;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub type JsonResponse<T> = (StatusCode, Json<T>);

/// Shared by every handler through an `Extension`.
pub struct AppState {
    pub pool: SqlitePool,
    pub endpoints_path: PathBuf,
}

pub async fn run_app(config: Config) -> Result<()> {
    let pool = init_db(&config.database_url, config.max_connections).await?;
    let state = AppState {
        pool,
        endpoints_path: config.endpoints_path,
    };
    let listener = TcpListener::bind(config.address)
        .with_context(|| format!("Could not bind to {}", config.address))?;
    tracing::info!(address = %config.address, "server started");
    serve(make_app(state), listener).await
}

pub async fn serve(app: Router, listener: TcpListener) -> Result<()> {
    axum::Server::from_tcp(listener)?
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

/// Every connection to a plain `sqlite::memory:` URL opens its own empty database.
fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

pub async fn init_db(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL {}", database_url))?
        .create_if_missing(true)
        .foreign_keys(true);
    let max_connections = if is_in_memory(database_url) && max_connections > 1 {
        tracing::warn!(
            requested = max_connections,
            "in-memory database is limited to a single connection"
        );
        1
    } else {
        max_connections
    };
    // In-memory databases live and die with their connection, so never recycle it.
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .with_context(|| format!("Could not open database {}", database_url))?;
    tracing::info!("running migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("migrations completed");
    Ok(pool)
}

pub fn make_app(state: AppState) -> Router {
    make_router()
        .layer(Extension(Arc::new(state)))
        .layer(TraceLayer::new_for_http())
}

pub fn make_router() -> Router {
    Router::new()
        .route("/api", get(get_endpoints).fallback(not_found))
        .route("/api/topics", get(get_topics).fallback(not_found))
        .route(
            "/api/articles",
            get(get_articles).post(post_article).fallback(not_found),
        )
        .route(
            "/api/articles/:article_id",
            get(get_article).patch(patch_article).fallback(not_found),
        )
        .route(
            "/api/articles/:article_id/comments",
            get(get_article_comments)
                .post(post_article_comment)
                .fallback(not_found),
        )
        .route(
            "/api/comments/:comment_id",
            delete(delete_comment).patch(patch_comment).fallback(not_found),
        )
        .route("/api/users", get(get_users).fallback(not_found))
        .route("/api/users/:username", get(get_user).fallback(not_found))
        .fallback(not_found)
}
