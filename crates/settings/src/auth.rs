//! Sign-in hand-off posted by the web app after login.
use serde::Deserialize;

use crate::{SettingsError, SettingsStore};

pub const AUTH_MESSAGE_TYPE: &str = "FORMSOLVE_AUTH";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub token: Option<String>,
    pub user: Option<AuthUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub email: Option<String>,
    #[serde(default)]
    pub subscription_active: bool,
}

/// Store the session carried by `payload` when it comes from an allowed origin.
///
/// Returns `Ok(false)` for messages that are not ours: unknown origin, another message type,
/// or a missing token or user. Malformed JSON is an error.
pub fn accept_auth_message(
    store: &SettingsStore,
    origin: &str,
    payload: &str,
) -> Result<bool, SettingsError> {
    let settings = store.load()?;
    if !settings.allowed_origins.iter().any(|o| o == origin) {
        log::debug!("ignoring auth message from {origin}");
        return Ok(false);
    }
    let message: AuthMessage = serde_json::from_str(payload)?;
    if message.kind != AUTH_MESSAGE_TYPE {
        return Ok(false);
    }
    let (Some(token), Some(user)) = (message.token.filter(|t| !t.is_empty()), message.user)
    else {
        return Ok(false);
    };
    store.sign_in(&token, user.email.as_deref(), user.subscription_active)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LOGIN: &str = r#"{"type":"FORMSOLVE_AUTH","token":"t-1","user":{"email":"x@y.z","subscriptionActive":true}}"#;

    fn store() -> (TempDir, SettingsStore) {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.toml"));
        (dir, store)
    }

    #[test]
    fn accepts_login_from_allowed_origin() {
        let (_dir, store) = store();
        assert!(accept_auth_message(&store, "http://localhost:3000", LOGIN).unwrap());
        let session = store.load().unwrap().session;
        assert_eq!(session.auth_token.as_deref(), Some("t-1"));
        assert_eq!(session.user_email.as_deref(), Some("x@y.z"));
        assert!(session.subscription_active);
    }

    #[test]
    fn ignores_unknown_origin_before_parsing() {
        let (_dir, store) = store();
        assert!(!accept_auth_message(&store, "https://evil.example", "not json").unwrap());
        assert!(!store.load().unwrap().session.is_signed_in());
    }

    #[test]
    fn ignores_other_types_and_incomplete_messages() {
        let (_dir, store) = store();
        let origin = "http://localhost:3000";
        let other = r#"{"type":"SOMETHING_ELSE","token":"t","user":{"email":"e"}}"#;
        let no_user = r#"{"type":"FORMSOLVE_AUTH","token":"t"}"#;
        let no_token = r#"{"type":"FORMSOLVE_AUTH","user":{"email":"e"}}"#;
        for payload in [other, no_user, no_token] {
            assert!(!accept_auth_message(&store, origin, payload).unwrap(), "{payload}");
        }
        assert!(!store.load().unwrap().session.is_signed_in());
    }

    #[test]
    fn malformed_payload_is_an_error() {
        let (_dir, store) = store();
        let err = accept_auth_message(&store, "http://localhost:3000", "{").unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }
}
