use sqlx::{Sqlite, SqlitePool};

use crate::{errors::RequestError, models::Topic};

pub async fn list_topics_in_db(pool: &SqlitePool) -> Result<Vec<Topic>, RequestError> {
    let topics = sqlx::query_as::<Sqlite, Topic>("SELECT slug, description FROM topics")
        .fetch_all(pool)
        .await?;
    Ok(topics)
}
