//! Presentation: pure view models built from flow state, plus plain-text
//! renderings used by the terminal front end.
//!
//! Nothing in here performs I/O or holds state of its own.

pub mod auth;
pub mod cards;
pub mod pages;
pub mod routes;

pub use auth::{AuthStatusView, Avatar};
pub use cards::{MovieCardView, UserMovieCardView};
pub use routes::Route;

/// Shown when a catalog record has no poster
pub const POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/342x513?text=No+Image";

/// Shown when a saved movie has no photo
pub const PHOTO_PLACEHOLDER: &str = "https://via.placeholder.com/342x200?text=No+Image";

/// Shown wherever a value is missing
pub const MISSING: &str = "—";

/// Poster URL on the TMDB image CDN, or the placeholder
pub fn poster_url(image_base: &str, poster_path: Option<&str>, size: &str) -> String {
    match poster_path.filter(|p| !p.is_empty()) {
        Some(path) => format!(
            "{}/{}/{}",
            image_base.trim_end_matches('/'),
            size,
            path.trim_start_matches('/')
        ),
        None => POSTER_PLACEHOLDER.to_string(),
    }
}
