use std::fmt;

/// Hosted services this client can run without
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Catalog,
    Persistence,
    Identity,
}

impl Feature {
    /// Inline notice shown in place of the disabled feature
    pub fn notice(&self) -> &'static str {
        match self {
            Feature::Catalog => {
                "Movie search is disabled. Set TMDB_API_KEY to enable searching the catalog."
            }
            Feature::Persistence => {
                "Supabase is not configured. Please set SUPABASE_URL and SUPABASE_KEY to enable saving."
            }
            Feature::Identity => {
                "Sign-in is unavailable. Set SUPABASE_URL and SUPABASE_KEY to enable authentication."
            }
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::Catalog => write!(f, "catalog"),
            Feature::Persistence => write!(f, "persistence"),
            Feature::Identity => write!(f, "identity"),
        }
    }
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Invalid input: {}", .0.join(" "))]
    Validation(Vec<String>),

    #[error("Not configured: {0}")]
    NotConfigured(Feature),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message to surface to the user, preferring whatever the provider said
    pub fn user_message(&self, fallback: &str) -> String {
        let message = match self {
            AppError::ExternalApi(msg) => msg.clone(),
            AppError::Validation(errors) => errors.join(" "),
            AppError::NotConfigured(feature) => feature.notice().to_string(),
            AppError::HttpClient(_) | AppError::Internal(_) => String::new(),
        };

        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_message_preferred() {
        let err = AppError::ExternalApi("Invalid API key".to_string());
        assert_eq!(err.user_message("fallback"), "Invalid API key");
    }

    #[test]
    fn test_blank_provider_message_falls_back() {
        let err = AppError::ExternalApi("  ".to_string());
        assert_eq!(err.user_message("fallback"), "fallback");
    }

    #[test]
    fn test_internal_uses_fallback() {
        let err = AppError::Internal("join error".to_string());
        assert_eq!(err.user_message("Try again."), "Try again.");
    }

    #[test]
    fn test_validation_messages_joined() {
        let err = AppError::Validation(vec![
            "Title is required.".to_string(),
            "Year is required.".to_string(),
        ]);
        assert_eq!(
            err.user_message("fallback"),
            "Title is required. Year is required."
        );
        assert_eq!(
            err.to_string(),
            "Invalid input: Title is required. Year is required."
        );
    }

    #[test]
    fn test_not_configured_uses_notice() {
        let err = AppError::NotConfigured(Feature::Persistence);
        assert!(err.user_message("fallback").contains("SUPABASE_URL"));
    }
}
