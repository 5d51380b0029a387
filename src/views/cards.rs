use std::fmt::{self, Display};

use crate::models::{MovieSummary, UserMovieRecord};

use super::{poster_url, MISSING, PHOTO_PLACEHOLDER};

const POSTER_SIZE: &str = "w342";

/// Display-ready catalog movie
#[derive(Debug, Clone, PartialEq)]
pub struct MovieCardView {
    pub title: String,
    pub year: String,
    pub rating: String,
    pub poster_url: String,
}

impl MovieCardView {
    pub fn new(movie: &MovieSummary, image_base: &str) -> Self {
        Self {
            title: movie.title.clone(),
            year: movie.release_year().unwrap_or(MISSING).to_string(),
            rating: movie
                .rating()
                .map(|r| r.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            poster_url: poster_url(image_base, movie.poster_path.as_deref(), POSTER_SIZE),
        }
    }
}

impl Display for MovieCardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "★ {:<4} {} ({})", self.rating, self.title, self.year)
    }
}

/// Display-ready saved movie
#[derive(Debug, Clone, PartialEq)]
pub struct UserMovieCardView {
    pub title: String,
    pub year: String,
    pub image_url: String,
    pub description: Option<String>,
}

impl From<&UserMovieRecord> for UserMovieCardView {
    fn from(record: &UserMovieRecord) -> Self {
        let title = record
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or("Untitled")
            .to_string();

        Self {
            title,
            year: record
                .year
                .map(|y| y.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            image_url: record
                .photo_url
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| PHOTO_PLACEHOLDER.to_string()),
            description: record.description.clone().filter(|d| !d.is_empty()),
        }
    }
}

impl Display for UserMovieCardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.year)?;
        if let Some(description) = &self.description {
            write!(f, " - {}", description)?;
        }
        Ok(())
    }
}
