//! Bridges identity-provider notifications into `SessionState`.
//!
//! One task owns the state. It subscribes to provider changes before asking for
//! the initial session, flips `loading` off exactly once when that first answer
//! settles, and applies every later change notification. A change that lands
//! while the initial fetch is still in flight is newer than whatever that fetch
//! returns, so the fetch's session is ignored in that case.

use std::sync::Arc;

use reqwest::Url;
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};

use crate::{
    error::AppResult,
    models::{AuthChange, OAuthProvider, SessionState},
    services::identity::IdentityProvider,
};

pub struct SessionBridge {
    identity: Arc<dyn IdentityProvider>,
    redirect_to: String,
    state: watch::Receiver<SessionState>,
    task: JoinHandle<()>,
}

impl SessionBridge {
    pub fn start(identity: Arc<dyn IdentityProvider>, redirect_to: impl Into<String>) -> Self {
        let (state_tx, state_rx) = watch::channel(SessionState::loading());
        let changes = identity.subscribe();
        let task = tokio::spawn(track_session(identity.clone(), changes, state_tx));

        Self {
            identity,
            redirect_to: redirect_to.into(),
            state: state_rx,
            task,
        }
    }

    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver for state changes; dropping it unsubscribes
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Asks the provider to start a Google sign-in; the resulting session arrives
    /// through the provider's change notifications
    pub async fn sign_in_with_google(&self) -> AppResult<Url> {
        self.identity
            .sign_in_with_oauth(OAuthProvider::Google, &self.redirect_to)
            .await
    }

    /// Asks the provider to sign out; local state follows its notification
    pub async fn sign_out(&self) -> AppResult<()> {
        self.identity.sign_out().await
    }
}

impl Drop for SessionBridge {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn track_session(
    identity: Arc<dyn IdentityProvider>,
    mut changes: broadcast::Receiver<AuthChange>,
    state: watch::Sender<SessionState>,
) {
    let initial = identity.get_session();
    tokio::pin!(initial);

    let mut settled = false;
    let mut subscribed = true;
    let mut changed_early = false;

    while !settled || subscribed {
        tokio::select! {
            result = &mut initial, if !settled => {
                settled = true;
                match result {
                    Ok(session) if !changed_early => {
                        tracing::info!(authenticated = session.is_some(), "Initial session loaded");
                        state.send_modify(|s| {
                            s.apply(session);
                            s.loading = false;
                        });
                    }
                    Ok(_) => {
                        tracing::debug!("Initial session superseded by a change notification");
                        state.send_modify(|s| s.loading = false);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Initial session fetch failed");
                        state.send_modify(|s| s.loading = false);
                    }
                }
            }
            change = changes.recv(), if subscribed => match change {
                Ok(change) => {
                    changed_early |= !settled;
                    tracing::info!(authenticated = change.session().is_some(), "Session changed");
                    state.send_modify(|s| s.apply(change.session().cloned()));
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Session notifications lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    subscribed = false;
                }
            },
        }
    }

    tracing::debug!("Session bridge stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        models::{Session, User, UserMetadata},
        services::identity::MockIdentityProvider,
    };
    use std::time::Duration;
    use tokio::sync::oneshot;
    use uuid::Uuid;

    fn session(email: &str) -> Session {
        Session {
            access_token: format!("token-{}", email),
            refresh_token: None,
            expires_at: None,
            user: User {
                id: Uuid::new_v4(),
                email: Some(email.to_string()),
                user_metadata: UserMetadata::default(),
            },
        }
    }

    /// Identity provider whose initial fetch resolves when the test says so
    struct ScriptedIdentity {
        events: broadcast::Sender<AuthChange>,
        initial: tokio::sync::Mutex<Option<oneshot::Receiver<AppResult<Option<Session>>>>>,
    }

    impl ScriptedIdentity {
        fn new() -> (Arc<Self>, oneshot::Sender<AppResult<Option<Session>>>) {
            let (tx, rx) = oneshot::channel();
            let (events, _) = broadcast::channel(8);
            let identity = Arc::new(Self {
                events,
                initial: tokio::sync::Mutex::new(Some(rx)),
            });
            (identity, tx)
        }
    }

    #[async_trait::async_trait]
    impl IdentityProvider for ScriptedIdentity {
        async fn get_session(&self) -> AppResult<Option<Session>> {
            let rx = self.initial.lock().await.take();
            match rx {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(AppError::Internal("dropped".to_string()))),
                None => Ok(None),
            }
        }

        fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
            self.events.subscribe()
        }

        async fn sign_in_with_oauth(
            &self,
            provider: OAuthProvider,
            redirect_to: &str,
        ) -> AppResult<Url> {
            Ok(Url::parse_with_params(
                "https://auth.test/authorize",
                &[("provider", provider.to_string().as_str()), ("redirect_to", redirect_to)],
            )
            .unwrap())
        }

        async fn sign_out(&self) -> AppResult<()> {
            let _ = self.events.send(AuthChange::SignedOut);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_loading_until_initial_fetch_settles() {
        let (identity, initial) = ScriptedIdentity::new();
        let bridge = SessionBridge::start(identity, "http://localhost:3000");

        let state = bridge.current();
        assert!(state.loading);
        assert!(state.user.is_none());

        let signed_in = session("ada@example.com");
        initial.send(Ok(Some(signed_in.clone()))).unwrap();

        let mut rx = bridge.subscribe();
        let state = rx.wait_for(|s| !s.loading).await.unwrap().clone();
        assert_eq!(state.user, Some(signed_in.user.clone()));
        assert_eq!(state.session, Some(signed_in));
    }

    #[tokio::test]
    async fn test_sign_out_clears_user_after_notification() {
        let (identity, initial) = ScriptedIdentity::new();
        let bridge = SessionBridge::start(identity, "http://localhost:3000");
        initial.send(Ok(Some(session("ada@example.com")))).unwrap();

        let mut rx = bridge.subscribe();
        rx.wait_for(|s| s.is_authenticated()).await.unwrap();

        tokio_test::assert_ok!(bridge.sign_out().await);
        let state = rx.wait_for(|s| !s.is_authenticated()).await.unwrap().clone();
        assert!(state.session.is_none());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_failed_initial_fetch_ends_anonymous() {
        let (identity, initial) = ScriptedIdentity::new();
        let bridge = SessionBridge::start(identity, "http://localhost:3000");
        initial
            .send(Err(AppError::ExternalApi("offline".to_string())))
            .unwrap();

        let mut rx = bridge.subscribe();
        let state = rx.wait_for(|s| !s.loading).await.unwrap().clone();
        assert!(state.user.is_none());
    }

    #[tokio::test]
    async fn test_early_change_wins_over_initial_answer() {
        let (identity, initial) = ScriptedIdentity::new();
        let bridge = SessionBridge::start(identity.clone(), "http://localhost:3000");
        let mut rx = bridge.subscribe();

        let fresh = session("new@example.com");
        identity
            .events
            .send(AuthChange::SignedIn(fresh.clone()))
            .unwrap();
        let state = rx.wait_for(|s| s.is_authenticated()).await.unwrap().clone();
        assert!(state.loading);

        initial.send(Ok(None)).unwrap();
        let state = rx.wait_for(|s| !s.loading).await.unwrap().clone();
        assert_eq!(state.user, Some(fresh.user));
    }

    #[tokio::test]
    async fn test_loading_flips_exactly_once() {
        let (identity, initial) = ScriptedIdentity::new();
        let bridge = SessionBridge::start(identity.clone(), "http://localhost:3000");
        let mut rx = bridge.subscribe();
        initial.send(Ok(None)).unwrap();
        rx.wait_for(|s| !s.loading).await.unwrap();

        identity
            .events
            .send(AuthChange::SignedIn(session("a@example.com")))
            .unwrap();
        identity.events.send(AuthChange::SignedOut).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(!bridge.current().loading);
        assert!(!bridge.current().is_authenticated());
    }

    #[tokio::test]
    async fn test_sign_in_does_not_mutate_state() {
        let (identity, _initial) = ScriptedIdentity::new();
        let bridge = SessionBridge::start(identity, "http://localhost:3000/app");

        let url = bridge.sign_in_with_google().await.unwrap();
        let params: std::collections::HashMap<String, String> =
            url.query_pairs().into_owned().collect();
        assert_eq!(params["provider"], "google");
        assert_eq!(params["redirect_to"], "http://localhost:3000/app");

        let state = bridge.current();
        assert!(state.loading);
        assert!(state.user.is_none());
    }

    #[tokio::test]
    async fn test_drop_releases_subscription() {
        let mut identity = MockIdentityProvider::new();
        let (events, _) = broadcast::channel::<AuthChange>(4);
        let subscriber = events.clone();
        identity
            .expect_subscribe()
            .times(1)
            .returning(move || subscriber.subscribe());
        identity.expect_get_session().returning(|| Ok(None));

        let bridge = SessionBridge::start(Arc::new(identity), "http://localhost:3000");
        let mut rx = bridge.subscribe();
        rx.wait_for(|s| !s.loading).await.unwrap();
        assert_eq!(events.receiver_count(), 1);

        drop(bridge);
        assert!(rx.changed().await.is_err());
        assert_eq!(events.receiver_count(), 0);
    }
}
