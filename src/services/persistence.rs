use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    config::Config,
    error::{AppError, AppResult, Feature},
    models::{NewUserMovie, SessionState, UserMovieRecord},
    services::providers::SupabaseStore,
};

/// Hosted table holding user-submitted movies
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieStore: Send + Sync {
    /// Insert one record
    async fn insert(&self, movie: &NewUserMovie) -> AppResult<()>;

    /// All records, newest first
    async fn list_recent(&self) -> AppResult<Vec<UserMovieRecord>>;
}

/// Persistence access that may be switched off by missing configuration
#[derive(Clone, Default)]
pub struct UserMovies {
    store: Option<Arc<dyn MovieStore>>,
}

impl UserMovies {
    pub fn new(store: Arc<dyn MovieStore>) -> Self {
        Self { store: Some(store) }
    }

    pub fn disabled() -> Self {
        Self { store: None }
    }

    /// Table access from configuration; requests run as the signed-in user when
    /// `session` carries one
    pub fn from_config(config: &Config, session: Option<watch::Receiver<SessionState>>) -> Self {
        match config.persistence_credentials() {
            Some((url, key)) => {
                let store = SupabaseStore::new(url.to_string(), key.to_string());
                let store = match session {
                    Some(session) => store.with_session(session),
                    None => store,
                };
                Self::new(Arc::new(store))
            }
            None => {
                tracing::warn!("Supabase credentials not set; saved movies disabled");
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    fn store(&self) -> AppResult<&Arc<dyn MovieStore>> {
        self.store
            .as_ref()
            .ok_or(AppError::NotConfigured(Feature::Persistence))
    }

    pub async fn insert(&self, movie: &NewUserMovie) -> AppResult<()> {
        self.store()?.insert(movie).await
    }

    pub async fn list_recent(&self) -> AppResult<Vec<UserMovieRecord>> {
        self.store()?.list_recent().await
    }
}
