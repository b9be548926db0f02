//! Error conversions
//!
//! HTTP rendering of [`AppError`] when the `axum` feature is on.

#[cfg(feature = "axum")]
use super::app_error::AppError;

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

/// エラーレスポンスの本文
///
/// レスポンスの extensions にも格納され、リクエストコンテキストの
/// ミドルウェアが `timestamp` を差し替えられるようにします。
#[cfg(feature = "axum")]
#[derive(Debug, Clone)]
pub struct ErrorEnvelope(pub crate::response::ApiResponse<serde_json::Value>);

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use crate::response::ApiResponse;
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = ApiResponse::new(
            self.code().to_string(),
            self.message().to_string(),
            serde_json::json!({}),
            chrono::Utc::now(),
        );

        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(ErrorEnvelope(body));
        response
    }
}

/// JSON ボディの拒否をエンベロープ形式のエラーに変換
///
/// 型が合わない本文は 422、それ以外（構文エラー、Content-Type 不一致など）は 400。
#[cfg(feature = "axum")]
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        use axum::extract::rejection::JsonRejection;

        let message = rejection.body_text();
        let error = match rejection {
            JsonRejection::JsonDataError(_) => AppError::unprocessable(message),
            _ => AppError::bad_request(message),
        };
        error.with_code("invalid_request_body")
    }
}

/// エラーレスポンスの `timestamp` を `at` に差し替える
///
/// [`AppError`] から作られていないレスポンスはそのまま返します。
#[cfg(feature = "axum")]
pub fn stamp_error_response(
    mut response: axum::response::Response,
    at: chrono::DateTime<chrono::Utc>,
) -> axum::response::Response {
    use axum::body::Body;
    use axum::http::header;

    let Some(ErrorEnvelope(mut body)) = response.extensions_mut().remove::<ErrorEnvelope>() else {
        return response;
    };

    body.timestamp = crate::response::format_timestamp(at);
    if let Ok(bytes) = serde_json::to_vec(&body) {
        response.headers_mut().remove(header::CONTENT_LENGTH);
        *response.body_mut() = Body::from(bytes);
    }
    response
}

#[cfg(all(test, feature = "axum"))]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use chrono::{TimeZone, Utc};

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_into_response_status_and_code() {
        let response = AppError::forbidden("CSRF token missing")
            .with_code("csrf_validation_failed")
            .into_response();
        assert_eq!(response.status().as_u16(), 403);

        let body = body_json(response).await;
        assert_eq!(body["code"], "csrf_validation_failed");
        assert_eq!(body["errors"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_json_rejection_uses_envelope() {
        use axum::Json;
        use axum::extract::FromRequest;
        use axum::http::{Request, header};

        let req = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from("{"))
            .unwrap();
        let rejection = Json::<serde_json::Value>::from_request(req, &())
            .await
            .unwrap_err();

        let error = AppError::from(rejection);
        assert_eq!(error.status_code(), 400);
        assert_eq!(error.code(), "invalid_request_body");
    }

    #[tokio::test]
    async fn test_stamp_error_response() {
        let at = Utc.with_ymd_and_hms(2024, 1, 31, 9, 15, 0).unwrap();
        let response = stamp_error_response(AppError::not_found("gone").into_response(), at);

        assert_eq!(response.status().as_u16(), 404);
        assert!(response.extensions().get::<ErrorEnvelope>().is_none());
        let body = body_json(response).await;
        assert_eq!(body["timestamp"], "2024-01-31T09:15:00Z");
        assert_eq!(body["message"], "gone");
    }

    #[tokio::test]
    async fn test_stamp_leaves_other_responses_alone() {
        let at = Utc.with_ymd_and_hms(2024, 1, 31, 9, 15, 0).unwrap();
        let response = stamp_error_response("plain".into_response(), at);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"plain");
    }
}
