//! Response Envelope
//!
//! Every endpoint answers with the same JSON shape:
//! `{ code, message, data, errors, timestamp }`.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// タイムスタンプの書式（UTC、秒精度）
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// 共通レスポンスエンベロープ
///
/// ## Examples
/// ```rust
/// use kernel::response::ApiResponse;
///
/// let body = ApiResponse::new("LOGOUT_SUCCESS", "Logged out", serde_json::json!({}), chrono::Utc::now());
/// assert!(body.errors.is_empty());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: Cow<'static, str>,
    pub message: Cow<'static, str>,
    pub data: T,
    pub errors: Vec<String>,
    pub timestamp: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(
        code: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
        data: T,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data,
            errors: Vec::new(),
            timestamp: format_timestamp(at),
        }
    }
}

/// `2024-01-31T09:15:00Z` 形式に整形
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 1, 31, 9, 15, 0).unwrap();
        assert_eq!(format_timestamp(at), "2024-01-31T09:15:00Z");
    }

    #[test]
    fn test_envelope_shape() {
        let at = Utc.with_ymd_and_hms(2024, 1, 31, 9, 15, 0).unwrap();
        let body = ApiResponse::new("AUTH_SUCCESS", "ok", serde_json::json!({ "id": 1 }), at);
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["code"], "AUTH_SUCCESS");
        assert_eq!(value["data"]["id"], 1);
        assert_eq!(value["errors"], serde_json::json!([]));
        assert_eq!(value["timestamp"], "2024-01-31T09:15:00Z");
    }
}
