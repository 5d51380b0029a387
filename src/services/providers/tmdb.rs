/// TMDB (The Movie Database) catalog provider
///
/// Endpoints:
/// - Search: /search/movie
/// - Trending: /trending/movie/{day|week}
/// - Featured: /movie/popular
///
/// TMDB accepts either a v3 API key (query parameter) or a v4 read access token
/// (bearer header). Both are read from the same setting.
use crate::{
    error::AppResult,
    models::{MovieSummary, TmdbPage, TrendingWindow},
    services::{catalog::CatalogProvider, providers::ensure_success},
};
use reqwest::{Client as HttpClient, RequestBuilder};

const PROVIDER: &str = "tmdb";

#[derive(Debug, Clone, PartialEq)]
enum Credential {
    ApiKey(String),
    Bearer(String),
}

impl Credential {
    /// v4 read tokens are JWTs; everything else is treated as a v3 key
    fn from_key(key: String) -> Self {
        if key.starts_with("eyJ") && key.matches('.').count() == 2 {
            Credential::Bearer(key)
        } else {
            Credential::ApiKey(key)
        }
    }
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    credential: Credential,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            credential: Credential::from_key(api_key),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credential {
            Credential::ApiKey(key) => request.query(&[("api_key", key.as_str())]),
            Credential::Bearer(token) => request.bearer_auth(token),
        }
    }

    async fn fetch_page(&self, path: &str, query: &[(&str, &str)]) -> AppResult<Vec<MovieSummary>> {
        let url = format!("{}{}", self.api_url, path);

        let request = self
            .http_client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query);
        let response = self.authorize(request).send().await?;
        let response = ensure_success(PROVIDER, response).await?;

        let page: TmdbPage = response.json().await?;
        let movies: Vec<MovieSummary> = page.results.into_iter().map(MovieSummary::from).collect();

        tracing::debug!(
            path = %path,
            results = movies.len(),
            provider = PROVIDER,
            "Catalog request completed"
        );

        Ok(movies)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn search(&self, query: &str) -> AppResult<Vec<MovieSummary>> {
        self.fetch_page(
            "/search/movie",
            &[("query", query), ("include_adult", "false"), ("page", "1")],
        )
        .await
    }

    async fn trending(&self, window: TrendingWindow) -> AppResult<Vec<MovieSummary>> {
        self.fetch_page(&format!("/trending/movie/{}", window), &[])
            .await
    }

    async fn featured(&self) -> AppResult<Vec<MovieSummary>> {
        self.fetch_page("/movie/popular", &[("page", "1")]).await
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}
