use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key (v3 key or v4 read access token)
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// TMDB image CDN base URL
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Supabase project URL
    #[serde(default)]
    pub supabase_url: Option<String>,

    /// Supabase anon key
    #[serde(default)]
    pub supabase_key: Option<String>,

    /// Where the identity provider sends the browser after OAuth sign-in
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Search input quiescence window in milliseconds
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// tracing filter used when RUST_LOG is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_site_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_search_debounce_ms() -> u64 {
    400
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            tmdb_api_url: default_tmdb_api_url(),
            tmdb_image_url: default_tmdb_image_url(),
            supabase_url: None,
            supabase_key: None,
            site_url: default_site_url(),
            search_debounce_ms: default_search_debounce_ms(),
            log_filter: default_log_filter(),
        }
    }
}

/// Treats unset and blank values the same way.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Catalog key, if one is configured
    pub fn catalog_key(&self) -> Option<&str> {
        present(&self.tmdb_api_key)
    }

    /// Supabase URL and key, only when both are configured
    pub fn persistence_credentials(&self) -> Option<(&str, &str)> {
        Some((present(&self.supabase_url)?, present(&self.supabase_key)?))
    }

    pub fn search_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.search_debounce_ms)
    }
}
