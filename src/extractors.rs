//! Wrappers around axum's extractors that reject with [`RequestError`], so a
//! bad path segment, query string or body gets the same `{"msg": ...}` reply
//! as every other failure.

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, JsonRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::errors::RequestError;

pub struct ApiPath<T>(pub T);

pub struct ApiQuery<T>(pub T);

pub struct ApiJson<T>(pub T);

/// Like [`ApiJson`], but a request without a JSON body reads as `T::default()`
/// instead of being rejected, so the handler's own field checks decide the reply.
pub struct ApiJsonOrDefault<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rejection) => Err(RequestError::Malformed(rejection.body_text())),
        }
    }
}

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => Err(RequestError::Malformed(rejection.body_text())),
        }
    }
}

#[axum::async_trait]
impl<S, B, T> FromRequest<S, B> for ApiJson<T>
where
    Json<T>: FromRequest<S, B, Rejection = JsonRejection>,
    T: Send,
    S: Send + Sync,
    B: Send + 'static,
{
    type Rejection = RequestError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(RequestError::Malformed(rejection.body_text())),
        }
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_ascii_lowercase().contains("json"))
        .unwrap_or(false)
}

#[axum::async_trait]
impl<S, B, T> FromRequest<S, B> for ApiJsonOrDefault<T>
where
    Bytes: FromRequest<S, B, Rejection = BytesRejection>,
    T: DeserializeOwned + Default + Send,
    S: Send + Sync,
    B: Send + 'static,
{
    type Rejection = RequestError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        if !has_json_content_type(req.headers()) {
            return Ok(ApiJsonOrDefault(T::default()));
        }
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| RequestError::Malformed(rejection.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(ApiJsonOrDefault(T::default()));
        }
        serde_json::from_slice(&bytes)
            .map(ApiJsonOrDefault)
            .map_err(|e| RequestError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn json_content_types_are_recognised() {
        assert!(has_json_content_type(&headers_with("application/json")));
        assert!(has_json_content_type(&headers_with("application/json; charset=utf-8")));
        assert!(has_json_content_type(&headers_with("Application/JSON")));
        assert!(!has_json_content_type(&headers_with("text/plain")));
        assert!(!has_json_content_type(&HeaderMap::new()));
    }
}
