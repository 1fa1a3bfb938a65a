use crate::core::error::ApiError;
use axum::{
    http::Uri,
    response::{IntoResponse, Response},
};

pub async fn fallback_handler(uri: Uri) -> Response {
    ApiError::RouteNotFound(format!(
        "{} (see /health, /user/*, /alerts, /metrics)",
        uri.path()
    ))
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_fallback_is_not_found() {
        let response = fallback_handler(Uri::from_static("/announce")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
