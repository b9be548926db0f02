//! Signed Session Cookie
//!
//! The cookie value is `"{session_id}.{base64url(HMAC-SHA256(secret, session_id))}"`.
//! Values that are malformed or fail verification read as "no session".

use axum::http::HeaderMap;
use platform::cookie::{append_set_cookie, extract_cookie};
use platform::crypto::{from_base64url, hmac_sha256, to_base64url, verify_hmac_sha256};

use crate::application::config::AuthConfig;
use crate::application::session_marker::{MarkerChange, SessionMarker};
use crate::domain::value_object::session_id::SessionId;

pub fn encode(config: &AuthConfig, session_id: SessionId) -> String {
    let id = session_id.to_string();
    let signature = hmac_sha256(&config.session_secret, id.as_bytes());
    format!("{}.{}", id, to_base64url(&signature))
}

pub fn decode(config: &AuthConfig, value: &str) -> Option<SessionId> {
    let (id, signature) = value.split_once('.')?;
    let signature = from_base64url(signature).ok()?;

    if !verify_hmac_sha256(&config.session_secret, id.as_bytes(), &signature) {
        return None;
    }

    SessionId::parse(id)
}

/// Marker carried by the incoming request
///
/// A cookie that is present but fails to decode yields a rejected marker.
pub fn read_marker(headers: &HeaderMap, config: &AuthConfig) -> SessionMarker {
    let Some(value) = extract_cookie(headers, &config.session_cookie_name) else {
        return SessionMarker::incoming(None);
    };

    match decode(config, &value) {
        Some(session_id) => SessionMarker::incoming(Some(session_id)),
        None => SessionMarker::rejected(),
    }
}

/// Emit the `Set-Cookie` header for a changed marker
pub fn write_marker(headers: &mut HeaderMap, config: &AuthConfig, marker: &SessionMarker) {
    let cookie = config.session_cookie();
    match marker.change() {
        MarkerChange::Unchanged => {}
        MarkerChange::Issued(session_id) => {
            append_set_cookie(headers, &cookie.build_set_cookie(&encode(config, session_id)));
        }
        MarkerChange::Cleared => {
            append_set_cookie(headers, &cookie.build_delete_cookie());
        }
    }
}
