use sqlx::{Sqlite, SqlitePool};

use crate::{errors::RequestError, models::User};

pub async fn list_users_in_db(pool: &SqlitePool) -> Result<Vec<User>, RequestError> {
    let users = sqlx::query_as::<Sqlite, User>("SELECT username, name, avatar_url FROM users")
        .fetch_all(pool)
        .await?;
    Ok(users)
}

/// Absence is not an error here; callers pair this with an existence check.
pub async fn get_user_by_username_in_db(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, RequestError> {
    let user = sqlx::query_as::<Sqlite, User>(
        "SELECT username, name, avatar_url FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}
