/// HTTP clients for the hosted services
///
/// Each client implements one of the trait seams in `services` (catalog, persistence,
/// identity) so the flows never see reqwest directly.
use crate::error::{AppError, AppResult};
use reqwest::Response;

pub mod supabase_auth;
pub mod supabase_store;
pub mod tmdb;

pub use supabase_auth::SupabaseAuth;
pub use supabase_store::SupabaseStore;
pub use tmdb::TmdbProvider;

/// Fields providers use for a human-readable error, in order of preference
const MESSAGE_FIELDS: [&str; 5] = ["status_message", "message", "msg", "error_description", "error"];

/// Pulls the provider's own error message out of a JSON error body
pub(crate) fn provider_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    MESSAGE_FIELDS.iter().find_map(|field| {
        value[*field]
            .as_str()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    })
}

/// Passes successful responses through; turns anything else into `ExternalApi`
pub(crate) async fn ensure_success(provider: &str, response: Response) -> AppResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(provider, %status, body = %body, "Provider returned error status");

    Err(AppError::ExternalApi(provider_message(&body).unwrap_or_else(
        || format!("{} returned status {}", provider, status),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tmdb_status_message() {
        let body = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;
        assert_eq!(
            provider_message(body).as_deref(),
            Some("Invalid API key: You must be granted a valid key.")
        );
    }

    #[test]
    fn test_postgrest_message() {
        let body = r#"{"code":"42501","details":null,"hint":null,"message":"new row violates row-level security policy"}"#;
        assert_eq!(
            provider_message(body).as_deref(),
            Some("new row violates row-level security policy")
        );
    }

    #[test]
    fn test_gotrue_messages() {
        assert_eq!(
            provider_message(r#"{"code":401,"msg":"Invalid token"}"#).as_deref(),
            Some("Invalid token")
        );
        assert_eq!(
            provider_message(r#"{"error":"invalid_grant","error_description":"Refresh Token Not Found"}"#)
                .as_deref(),
            Some("Refresh Token Not Found")
        );
    }

    #[test]
    fn test_non_json_or_blank_body() {
        assert_eq!(provider_message("<html>Bad Gateway</html>"), None);
        assert_eq!(provider_message(r#"{"message":"  "}"#), None);
    }
}
