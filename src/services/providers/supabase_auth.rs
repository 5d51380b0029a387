/// Supabase Auth (GoTrue) identity provider
///
/// API Flow:
/// 1. Sign-in: the user visits /auth/v1/authorize?provider=…&redirect_to=…
/// 2. The provider redirects back with the tokens in the URL fragment
/// 3. `complete_redirect` loads the user from /auth/v1/user and stores the session
///
/// Sessions live in memory only; expired ones are refreshed through
/// /auth/v1/token?grant_type=refresh_token on the next `get_session`.
use crate::{
    error::{AppError, AppResult},
    models::{AuthChange, OAuthProvider, Session, User},
    services::{identity::IdentityProvider, providers::ensure_success},
};
use chrono::Utc;
use reqwest::{Client as HttpClient, RequestBuilder, Url};
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};

const PROVIDER: &str = "supabase-auth";
const EVENT_CAPACITY: usize = 16;

/// Token grant response from /auth/v1/token
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: User,
}

impl TokenResponse {
    fn into_session(self, now: i64) -> Session {
        let expires_at = self
            .expires_at
            .or_else(|| self.expires_in.map(|secs| now + secs));

        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

/// Tokens carried in the OAuth redirect fragment
#[derive(Debug, PartialEq)]
struct RedirectTokens {
    access_token: String,
    refresh_token: Option<String>,
    expires_at: Option<i64>,
}

impl RedirectTokens {
    fn parse(callback: &Url, now: i64) -> AppResult<Self> {
        let fragment = callback.fragment().unwrap_or_default();
        let params: HashMap<String, String> = url_params(fragment);

        if let Some(description) = params
            .get("error_description")
            .or_else(|| params.get("error"))
        {
            return Err(AppError::ExternalApi(description.clone()));
        }

        let access_token = params
            .get("access_token")
            .filter(|t| !t.is_empty())
            .cloned()
            .ok_or_else(|| {
                AppError::ExternalApi("Sign-in redirect is missing an access token".to_string())
            })?;

        let expires_at = params
            .get("expires_at")
            .and_then(|v| v.parse().ok())
            .or_else(|| {
                params
                    .get("expires_in")
                    .and_then(|v| v.parse::<i64>().ok())
                    .map(|secs| now + secs)
            });

        Ok(Self {
            access_token,
            refresh_token: params.get("refresh_token").cloned(),
            expires_at,
        })
    }
}

/// Decodes `a=1&b=2` pairs the same way query strings are decoded
fn url_params(encoded: &str) -> HashMap<String, String> {
    Url::parse(&format!("http://localhost/?{}", encoded))
        .map(|url| url.query_pairs().into_owned().collect())
        .unwrap_or_default()
}

pub struct SupabaseAuth {
    http_client: HttpClient,
    api_url: String,
    api_key: String,
    session: RwLock<Option<Session>>,
    events: broadcast::Sender<AuthChange>,
}

impl SupabaseAuth {
    pub fn new(api_url: String, api_key: String) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            session: RwLock::new(None),
            events,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.api_url, path)
    }

    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("apikey", &self.api_key)
    }

    /// Broadcast a change; having no listeners is fine
    fn emit(&self, change: AuthChange) {
        if self.events.send(change).is_err() {
            tracing::debug!("No session listeners registered");
        }
    }

    fn authorize_url(&self, provider: OAuthProvider, redirect_to: &str) -> AppResult<Url> {
        Url::parse_with_params(
            &self.endpoint("/authorize"),
            &[
                ("provider", provider.to_string().as_str()),
                ("redirect_to", redirect_to),
            ],
        )
        .map_err(|e| AppError::Internal(format!("Invalid authorize URL: {}", e)))
    }

    /// Finishes an OAuth sign-in from the URL the provider redirected to
    pub async fn complete_redirect(&self, callback: &Url) -> AppResult<Session> {
        let tokens = RedirectTokens::parse(callback, Utc::now().timestamp())?;

        let request = self
            .http_client
            .get(self.endpoint("/user"))
            .bearer_auth(&tokens.access_token);
        let response = self.with_key(request).send().await?;
        let response = ensure_success(PROVIDER, response).await?;
        let user: User = response.json().await?;

        let session = Session {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_at: tokens.expires_at,
            user,
        };

        *self.session.write().await = Some(session.clone());
        tracing::info!(user_id = %session.user.id, "Signed in");
        self.emit(AuthChange::SignedIn(session.clone()));

        Ok(session)
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<Session> {
        let request = self
            .http_client
            .post(self.endpoint("/token"))
            .query(&[("grant_type", "refresh_token")])
            .json(&serde_json::json!({ "refresh_token": refresh_token }));

        let response = self.with_key(request).send().await?;
        let response = ensure_success(PROVIDER, response).await?;
        let token: TokenResponse = response.json().await?;
        Ok(token.into_session(Utc::now().timestamp()))
    }
}

#[async_trait::async_trait]
impl IdentityProvider for SupabaseAuth {
    async fn get_session(&self) -> AppResult<Option<Session>> {
        let current = self.session.read().await.clone();

        let Some(session) = current else {
            return Ok(None);
        };
        if !session.is_expired(Utc::now().timestamp()) {
            return Ok(Some(session));
        }

        let Some(refresh_token) = session.refresh_token.as_deref() else {
            tracing::info!(user_id = %session.user.id, "Session expired without refresh token");
            *self.session.write().await = None;
            self.emit(AuthChange::SignedOut);
            return Ok(None);
        };

        let refreshed = self.refresh(refresh_token).await?;
        *self.session.write().await = Some(refreshed.clone());
        tracing::debug!(user_id = %refreshed.user.id, "Session refreshed");
        self.emit(AuthChange::TokenRefreshed(refreshed.clone()));

        Ok(Some(refreshed))
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.events.subscribe()
    }

    async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
    ) -> AppResult<Url> {
        let url = self.authorize_url(provider, redirect_to)?;
        tracing::info!(%provider, redirect_to, "OAuth sign-in started");
        Ok(url)
    }

    async fn sign_out(&self) -> AppResult<()> {
        let previous = self.session.write().await.take();

        // The local session is gone either way; report a failed revoke afterwards.
        let result = match previous {
            Some(session) => {
                let request = self
                    .http_client
                    .post(self.endpoint("/logout"))
                    .bearer_auth(&session.access_token);
                match self.with_key(request).send().await {
                    Ok(response) => ensure_success(PROVIDER, response).await.map(|_| ()),
                    Err(e) => Err(e.into()),
                }
            }
            None => Ok(()),
        };

        tracing::info!("Signed out");
        self.emit(AuthChange::SignedOut);
        result
    }
}
