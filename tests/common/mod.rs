#![allow(dead_code)]

use std::{net::TcpListener, path::PathBuf};

use nc_news::{init_db, make_app, serve, AppState};
use serde_json::Value;
use sqlx::{Executor, SqlitePool};

const SEED: &str = r#"
INSERT INTO topics (slug, description) VALUES
    ('mitch', 'The man, the Mitch, the legend'),
    ('cats', 'Not dogs'),
    ('paper', 'what books are made of');

INSERT INTO users (username, name, avatar_url) VALUES
    ('butter_bridge', 'jonny', 'https://www.healthytherapies.com/wp-content/uploads/2016/06/Lime3.jpg'),
    ('icellusedkars', 'sam', 'https://avatars2.githubusercontent.com/u/24604688?s=460&v=4'),
    ('rogersop', 'paul', 'https://avatars2.githubusercontent.com/u/24394918?s=400&v=4'),
    ('lurker', 'do_nothing', NULL);

INSERT INTO articles (article_id, title, topic, author, body, created_at, votes) VALUES
    (1, 'Living in the shadow of a great man', 'mitch', 'butter_bridge', 'I find this existence challenging', '2020-07-09 20:11:00', 100),
    (2, 'Sony Vaio; or, The Laptop', 'mitch', 'icellusedkars', 'Call me Mitchell.', '2020-10-16 05:03:00', 0),
    (3, 'Eight pug gifs that remind me of mitch', 'mitch', 'icellusedkars', 'some gifs', '2020-11-03 09:12:00', 0),
    (4, 'Student SUES Mitch!', 'mitch', 'rogersop', 'We all love Mitch and his wonderful, unique typing style.', '2020-05-06 01:14:00', 0),
    (5, 'UNCOVERED: catspiracy to bring down democracy', 'cats', 'rogersop', 'Bastet walks amongst us, and the cats are taking arms!', '2020-08-03 13:14:00', 0),
    (6, 'A', 'mitch', 'icellusedkars', 'Delicious tin of cat food', '2020-10-18 01:00:00', 0);

INSERT INTO comments (comment_id, body, article_id, author, votes, created_at) VALUES
    (1, 'Oh, I''ve got compassion running out of my nose, pal!', 1, 'butter_bridge', 16, '2020-04-06 12:17:00'),
    (2, 'The beautiful thing about treasure is that it exists.', 1, 'icellusedkars', 14, '2020-10-31 03:03:00'),
    (3, 'Replacing the quiet elegance of the dark suit and tie with the casual indifference of these muted earth tones', 1, 'icellusedkars', 100, '2020-03-01 01:13:00'),
    (4, ' I carry a log - yes. Is it funny to you? It is not to me.', 3, 'icellusedkars', -100, '2020-02-23 12:01:00'),
    (5, 'I hate streaming noses', 3, 'butter_bridge', 0, '2020-06-15 10:25:00'),
    (6, 'What do you see? I have no idea where this will lead us.', 5, 'icellusedkars', 0, '2020-11-03 21:00:00');
"#;

/// Comment rows per article in the seed above.
pub const COMMENT_COUNTS: [(i64, i64); 6] = [(1, 3), (2, 0), (3, 2), (4, 0), (5, 1), (6, 0)];

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub pool: SqlitePool,
}

pub async fn spawn_app() -> TestApp {
    let pool = init_db("sqlite::memory:", 1).await.unwrap();
    pool.execute(SEED).await.unwrap();

    let state = AppState {
        pool: pool.clone(),
        endpoints_path: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/endpoints.json")),
    };
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(serve(make_app(state), listener));

    TestApp {
        address,
        client: reqwest::Client::new(),
        pool,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str) -> (u16, Value) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        read(response).await
    }

    pub async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let response = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        read(response).await
    }

    pub async fn patch(&self, path: &str, body: Value) -> (u16, Value) {
        let response = self
            .client
            .patch(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        read(response).await
    }

    pub async fn delete(&self, path: &str) -> (u16, String) {
        let response = self.client.delete(self.url(path)).send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.text().await.unwrap())
    }
}

async fn read(response: reqwest::Response) -> (u16, Value) {
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.unwrap();
    (status, body)
}
