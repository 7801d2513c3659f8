use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::JsonResponse;

pub const BAD_REQUEST: &str = "Bad request";
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";
pub const ROUTE_NOT_FOUND: &str = "Route not found";

// SQLite extended result codes that mean the client sent something unusable.
const SQLITE_MISMATCH: &str = "20";
const SQLITE_CONSTRAINT_CHECK: &str = "275";
const SQLITE_CONSTRAINT_FOREIGNKEY: &str = "787";
const SQLITE_CONSTRAINT_NOTNULL: &str = "1299";
const SQLITE_CONSTRAINT_DATATYPE: &str = "3091";

const BAD_INPUT_CODES: [&str; 5] = [
    SQLITE_MISMATCH,
    SQLITE_CONSTRAINT_CHECK,
    SQLITE_CONSTRAINT_FOREIGNKEY,
    SQLITE_CONSTRAINT_NOTNULL,
    SQLITE_CONSTRAINT_DATATYPE,
];

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    /// Path, query or body could not be decoded into the expected shape.
    #[error("malformed request: {0}")]
    Malformed(String),
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("internal error: {0}")]
    ServerError(String),
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub msg: String,
}

impl ErrorBody {
    pub fn new(msg: &str) -> ErrorBody {
        ErrorBody {
            msg: msg.to_string(),
        }
    }
}

impl RequestError {
    pub fn bad_request(message: &str) -> Self {
        Self::BadRequest(message.to_string())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn to_json_response(&self) -> JsonResponse<ErrorBody> {
        let (status_code, message) = self
            .storage_error()
            .or_else(|| self.application_error())
            .unwrap_or_else(|| self.internal_error());
        (status_code, Json(ErrorBody::new(message)))
    }

    fn storage_error(&self) -> Option<(StatusCode, &str)> {
        match self {
            RequestError::Malformed(reason) => {
                tracing::debug!(%reason, "rejected malformed request");
                Some((StatusCode::BAD_REQUEST, BAD_REQUEST))
            }
            RequestError::DatabaseError(sqlx::Error::Database(e)) => {
                let code = e.code()?;
                if !BAD_INPUT_CODES.contains(&&*code) {
                    return None;
                }
                tracing::debug!(%code, detail = e.message(), "constraint rejected input");
                Some((StatusCode::BAD_REQUEST, BAD_REQUEST))
            }
            _ => None,
        }
    }

    fn application_error(&self) -> Option<(StatusCode, &str)> {
        match self {
            RequestError::BadRequest(message) => Some((StatusCode::BAD_REQUEST, message.as_str())),
            RequestError::NotFound(message) => Some((StatusCode::NOT_FOUND, message.as_str())),
            _ => None,
        }
    }

    fn internal_error(&self) -> (StatusCode, &str) {
        tracing::error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> axum::response::Response {
        self.to_json_response().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(error: RequestError) -> (StatusCode, String) {
        let (status, Json(body)) = error.to_json_response();
        (status, body.msg)
    }

    #[test]
    fn application_errors_pass_through_verbatim() {
        assert_eq!(
            translate(RequestError::bad_request("missing field - body")),
            (StatusCode::BAD_REQUEST, "missing field - body".to_string())
        );
        assert_eq!(
            translate(RequestError::not_found("Comment not found")),
            (StatusCode::NOT_FOUND, "Comment not found".to_string())
        );
    }

    #[test]
    fn malformed_input_becomes_generic_bad_request() {
        assert_eq!(
            translate(RequestError::Malformed("invalid digit found in string".into())),
            (StatusCode::BAD_REQUEST, BAD_REQUEST.to_string())
        );
    }

    #[test]
    fn unclassified_failures_hide_their_detail() {
        assert_eq!(
            translate(RequestError::DatabaseError(sqlx::Error::RowNotFound)),
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR.to_string())
        );
        assert_eq!(
            translate(RequestError::ServerError("disk on fire".into())),
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR.to_string())
        );
    }
}
