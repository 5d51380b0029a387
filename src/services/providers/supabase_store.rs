/// Supabase table client (PostgREST)
///
/// Reads and writes the `movies` table through the project's REST endpoint. The anon
/// key always goes in the `apikey` header; the bearer token is the signed-in user's
/// access token when there is one, otherwise the anon key.
use crate::{
    error::AppResult,
    models::{NewUserMovie, SessionState, UserMovieRecord},
    services::{persistence::MovieStore, providers::ensure_success},
};
use reqwest::{Client as HttpClient, RequestBuilder};
use tokio::sync::watch;

const PROVIDER: &str = "supabase";
const MOVIES_TABLE: &str = "movies";

#[derive(Clone)]
pub struct SupabaseStore {
    http_client: HttpClient,
    api_url: String,
    api_key: String,
    session: Option<watch::Receiver<SessionState>>,
}

impl SupabaseStore {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            session: None,
        }
    }

    /// Authenticate table requests as whoever is signed in
    pub fn with_session(mut self, session: watch::Receiver<SessionState>) -> Self {
        self.session = Some(session);
        self
    }

    fn bearer_token(&self) -> String {
        self.session
            .as_ref()
            .and_then(|rx| rx.borrow().session.as_ref().map(|s| s.access_token.clone()))
            .unwrap_or_else(|| self.api_key.clone())
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.api_url, table)
    }

    fn with_keys(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(self.bearer_token())
    }
}

#[async_trait::async_trait]
impl MovieStore for SupabaseStore {
    async fn insert(&self, movie: &NewUserMovie) -> AppResult<()> {
        let request = self
            .http_client
            .post(self.table_url(MOVIES_TABLE))
            .header("Prefer", "return=minimal")
            .json(movie);

        let response = self.with_keys(request).send().await?;
        ensure_success(PROVIDER, response).await?;

        tracing::info!(table = MOVIES_TABLE, title = %movie.title, "Movie inserted");
        Ok(())
    }

    async fn list_recent(&self) -> AppResult<Vec<UserMovieRecord>> {
        let request = self
            .http_client
            .get(self.table_url(MOVIES_TABLE))
            .query(&[("select", "*"), ("order", "created_at.desc")]);

        let response = self.with_keys(request).send().await?;
        let response = ensure_success(PROVIDER, response).await?;
        let records: Vec<UserMovieRecord> = response.json().await?;

        tracing::debug!(table = MOVIES_TABLE, count = records.len(), "Movies listed");
        Ok(records)
    }
}
