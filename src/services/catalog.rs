use std::sync::Arc;

use crate::{
    config::Config,
    error::AppResult,
    models::{MovieSummary, TrendingWindow},
    services::providers::TmdbProvider,
};

/// Trait for movie catalog providers
///
/// Every call is a single read request; implementations must not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Search movies by title
    async fn search(&self, query: &str) -> AppResult<Vec<MovieSummary>>;

    /// Movies trending over the given window
    async fn trending(&self, window: TrendingWindow) -> AppResult<Vec<MovieSummary>>;

    /// Curated "featured" list
    async fn featured(&self) -> AppResult<Vec<MovieSummary>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Catalog access that may be switched off by missing configuration
///
/// A disabled catalog answers every call with an empty list and never touches
/// the network.
#[derive(Clone, Default)]
pub struct Catalog {
    provider: Option<Arc<dyn CatalogProvider>>,
}

impl Catalog {
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    pub fn disabled() -> Self {
        Self { provider: None }
    }

    /// Builds the TMDB-backed catalog, or a disabled one when no key is set
    pub fn from_config(config: &Config) -> Self {
        match config.catalog_key() {
            Some(key) => Self::new(Arc::new(TmdbProvider::new(
                key.to_string(),
                config.tmdb_api_url.clone(),
            ))),
            None => {
                tracing::warn!("TMDB_API_KEY not set; catalog features disabled");
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn search(&self, query: &str) -> AppResult<Vec<MovieSummary>> {
        match &self.provider {
            Some(provider) => provider.search(query).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn trending(&self, window: TrendingWindow) -> AppResult<Vec<MovieSummary>> {
        match &self.provider {
            Some(provider) => provider.trending(window).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn featured(&self) -> AppResult<Vec<MovieSummary>> {
        match &self.provider {
            Some(provider) => provider.featured().await,
            None => Ok(Vec::new()),
        }
    }
}
