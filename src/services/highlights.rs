use crate::{
    error::{AppResult, Feature},
    models::{MovieSummary, TrendingWindow},
    services::catalog::Catalog,
};

pub const TRENDING_ERROR_FALLBACK: &str = "Unable to load trending movies right now.";
pub const FEATURED_ERROR_FALLBACK: &str = "Unable to load featured movies right now.";

/// One independently loaded list on the landing or app page
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    pub movies: Vec<MovieSummary>,
    pub error: Option<String>,
}

impl Section {
    fn from_result(section: &str, result: AppResult<Vec<MovieSummary>>, fallback: &str) -> Self {
        match result {
            Ok(movies) => Self {
                movies,
                error: None,
            },
            Err(e) => {
                tracing::warn!(section, error = %e, "Highlight section failed");
                Self {
                    movies: Vec::new(),
                    error: Some(e.user_message(fallback)),
                }
            }
        }
    }
}

/// Trending and featured movies
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Highlights {
    pub trending: Section,
    pub featured: Section,
    pub disabled: Option<&'static str>,
}

impl Highlights {
    /// Loads both sections concurrently; one failing leaves the other intact
    pub async fn load(catalog: &Catalog, window: TrendingWindow) -> Self {
        if !catalog.is_enabled() {
            return Self {
                disabled: Some(Feature::Catalog.notice()),
                ..Default::default()
            };
        }

        let (trending, featured) = tokio::join!(catalog.trending(window), catalog.featured());

        let highlights = Self {
            trending: Section::from_result("trending", trending, TRENDING_ERROR_FALLBACK),
            featured: Section::from_result("featured", featured, FEATURED_ERROR_FALLBACK),
            disabled: None,
        };

        tracing::info!(
            %window,
            trending = highlights.trending.movies.len(),
            featured = highlights.featured.movies.len(),
            "Highlights loaded"
        );

        highlights
    }
}
