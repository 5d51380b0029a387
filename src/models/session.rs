use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

/// Profile fields the identity provider copies from the OAuth account
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserMetadata {
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Authenticated user as reported by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl User {
    /// Account email, falling back to the one in the OAuth profile
    pub fn display_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .filter(|e| !e.is_empty())
            .or(self.user_metadata.email.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix timestamp (seconds)
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

impl Session {
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
}

impl Display for OAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OAuthProvider::Google => write!(f, "google"),
        }
    }
}

/// Session change notification emitted by the identity provider
#[derive(Debug, Clone, PartialEq)]
pub enum AuthChange {
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut,
}

impl AuthChange {
    /// Session carried by the notification, if any
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthChange::SignedIn(session) | AuthChange::TokenRefreshed(session) => Some(session),
            AuthChange::SignedOut => None,
        }
    }
}

/// Authentication state seen by the views
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub session: Option<Session>,
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::loading()
    }
}

impl SessionState {
    /// State before the initial provider round-trip has settled
    pub fn loading() -> Self {
        Self {
            user: None,
            session: None,
            loading: true,
        }
    }

    /// Replaces the session (and derived user) without touching `loading`
    pub fn apply(&mut self, session: Option<Session>) {
        self.user = session.as_ref().map(|s| s.user.clone());
        self.session = session;
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at: Option<i64>) -> Session {
        Session {
            access_token: "token".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at,
            user: User {
                id: Uuid::nil(),
                email: None,
                user_metadata: UserMetadata {
                    email: Some("meta@example.com".to_string()),
                    ..Default::default()
                },
            },
        }
    }

    #[test]
    fn test_initial_state_is_loading() {
        let state = SessionState::default();
        assert!(state.loading);
        assert!(state.user.is_none());
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_apply_derives_user() {
        let mut state = SessionState::loading();
        state.apply(Some(session(None)));
        assert!(state.is_authenticated());
        assert!(state.loading);

        state.apply(None);
        assert!(state.user.is_none());
        assert!(state.session.is_none());
    }

    #[test]
    fn test_display_email_falls_back_to_metadata() {
        assert_eq!(session(None).user.display_email(), Some("meta@example.com"));
    }

    #[test]
    fn test_expiry() {
        assert!(session(Some(100)).is_expired(100));
        assert!(!session(Some(100)).is_expired(99));
        assert!(!session(None).is_expired(i64::MAX));
    }

    #[test]
    fn test_user_deserialization() {
        let json = r#"{
            "id": "8d0fd2b3-9ca7-4d9e-a95f-9e13dded323e",
            "aud": "authenticated",
            "email": "ada@example.com",
            "user_metadata": { "avatar_url": "https://img/a.png", "full_name": "Ada" }
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.display_email(), Some("ada@example.com"));
        assert_eq!(
            user.user_metadata.avatar_url.as_deref(),
            Some("https://img/a.png")
        );
    }
}
