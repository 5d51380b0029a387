use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Normalized catalog record handed to the flows and views
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
}

impl MovieSummary {
    /// Release year, taken from the first four characters of the release date
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .filter(|d| d.len() >= 4 && d.is_char_boundary(4))
            .map(|d| &d[..4])
    }

    /// Vote average rounded to one decimal place
    pub fn rating(&self) -> Option<f64> {
        self.vote_average
            .filter(|v| v.is_finite())
            .map(|v| (v * 10.0).round() / 10.0)
    }
}

/// Time window for the trending endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendingWindow {
    Day,
    #[default]
    Week,
}

impl Display for TrendingWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendingWindow::Day => write!(f, "day"),
            TrendingWindow::Week => write!(f, "week"),
        }
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Paged list envelope used by the search, trending and popular endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

/// Raw movie record as returned by TMDB
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    /// Trending results may mix in records that only carry `name`
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl From<TmdbMovie> for MovieSummary {
    fn from(movie: TmdbMovie) -> Self {
        let title = movie
            .title
            .or(movie.name)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "Untitled".to_string());

        MovieSummary {
            id: movie.id,
            title,
            poster_path: movie.poster_path.filter(|p| !p.is_empty()),
            release_date: movie.release_date.filter(|d| !d.is_empty()),
            vote_average: movie.vote_average,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(release_date: Option<&str>, vote_average: Option<f64>) -> MovieSummary {
        MovieSummary {
            id: 1,
            title: "Inception".to_string(),
            poster_path: None,
            release_date: release_date.map(str::to_string),
            vote_average,
        }
    }

    #[test]
    fn test_release_year() {
        assert_eq!(summary(Some("2010-07-15"), None).release_year(), Some("2010"));
        assert_eq!(summary(Some("20"), None).release_year(), None);
        assert_eq!(summary(None, None).release_year(), None);
    }

    #[test]
    fn test_rating_rounding() {
        assert_eq!(summary(None, Some(8.368)).rating(), Some(8.4));
        assert_eq!(summary(None, Some(f64::NAN)).rating(), None);
        assert_eq!(summary(None, None).rating(), None);
    }

    #[test]
    fn test_trending_window_display() {
        assert_eq!(TrendingWindow::Day.to_string(), "day");
        assert_eq!(TrendingWindow::default().to_string(), "week");
    }

    #[test]
    fn test_tmdb_page_deserialization() {
        let json = r#"{
            "page": 1,
            "results": [
                {
                    "id": 27205,
                    "title": "Inception",
                    "poster_path": "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg",
                    "release_date": "2010-07-15",
                    "vote_average": 8.368,
                    "adult": false
                },
                { "id": 99, "name": "Some Show", "release_date": "" }
            ],
            "total_pages": 1
        }"#;

        let page: TmdbPage = serde_json::from_str(json).unwrap();
        let movies: Vec<MovieSummary> = page.results.into_iter().map(Into::into).collect();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].title, "Inception");
        assert_eq!(
            movies[0].poster_path.as_deref(),
            Some("/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg")
        );
        assert_eq!(movies[1].title, "Some Show");
        assert_eq!(movies[1].release_date, None);
    }

    #[test]
    fn test_missing_title_becomes_untitled() {
        let movie: TmdbMovie = serde_json::from_str(r#"{"id": 5}"#).unwrap();
        assert_eq!(MovieSummary::from(movie).title, "Untitled");
    }
}
