use std::fmt::{self, Display};

use crate::models::SessionState;

#[derive(Debug, Clone, PartialEq)]
pub enum Avatar {
    Image(String),
    /// Uppercase first letter of the email, `U` when there is none
    Initial(char),
}

/// Navbar auth area
#[derive(Debug, Clone, PartialEq)]
pub enum AuthStatusView {
    /// Skeleton while the initial session is loading
    Loading,
    SignedOut,
    SignedIn {
        avatar: Avatar,
        email: Option<String>,
    },
}

impl From<&SessionState> for AuthStatusView {
    fn from(state: &SessionState) -> Self {
        if state.loading {
            return AuthStatusView::Loading;
        }

        let Some(user) = &state.user else {
            return AuthStatusView::SignedOut;
        };

        let email = user.display_email().map(str::to_string);
        let avatar = match user.user_metadata.avatar_url.as_deref() {
            Some(url) if !url.is_empty() => Avatar::Image(url.to_string()),
            _ => Avatar::Initial(
                email
                    .as_deref()
                    .and_then(|e| e.chars().next())
                    .map(|c| c.to_ascii_uppercase())
                    .unwrap_or('U'),
            ),
        };

        AuthStatusView::SignedIn { avatar, email }
    }
}

impl Display for AuthStatusView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthStatusView::Loading => write!(f, "…"),
            AuthStatusView::SignedOut => write!(f, "[Sign in with Google]"),
            AuthStatusView::SignedIn { avatar, email } => {
                match avatar {
                    Avatar::Image(_) => write!(f, "(•) ")?,
                    Avatar::Initial(c) => write!(f, "({}) ", c)?,
                }
                write!(f, "{} [Sign out]", email.as_deref().unwrap_or_default())
            }
        }
    }
}
