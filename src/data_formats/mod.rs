mod request;
mod wrapper;

pub use request::*;
pub use wrapper::*;

use serde::{Deserialize, Serialize};

/// Query string accepted by `GET /api/articles`.
///
/// Values are kept as raw strings; `sort_by` and `order` are checked against
/// their allow-lists by the article query builder.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ArticleQueryParams {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}
