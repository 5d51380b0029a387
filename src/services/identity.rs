use reqwest::Url;
use tokio::sync::broadcast;

use crate::{
    error::AppResult,
    models::{AuthChange, OAuthProvider, Session},
};

/// Identity provider boundary consumed by the session bridge
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Current session, if any
    async fn get_session(&self) -> AppResult<Option<Session>>;

    /// Session change notifications; dropping the receiver unsubscribes
    fn subscribe(&self) -> broadcast::Receiver<AuthChange>;

    /// Starts an OAuth sign-in and returns the URL the user has to visit
    async fn sign_in_with_oauth(&self, provider: OAuthProvider, redirect_to: &str)
        -> AppResult<Url>;

    async fn sign_out(&self) -> AppResult<()>;
}
