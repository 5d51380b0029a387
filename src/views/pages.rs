//! Plain-text page renderings for the terminal front end.

use crate::{
    services::{
        highlights::{Highlights, Section},
        search::SearchState,
        user_movies::{MovieFormFlow, MovieListState},
    },
    views::{MovieCardView, UserMovieCardView},
};

pub const HERO_EYEBROW: &str = "TRENDING MOVIES AT";
pub const HERO_TITLE: &str = "Movie AI";

fn push_section(out: &mut String, heading: &str, section: &Section, image_base: &str) {
    out.push_str(&format!("\n{}\n", heading));
    if let Some(error) = &section.error {
        out.push_str(&format!("  ! {}\n", error));
    } else if section.movies.is_empty() {
        out.push_str("  Nothing to show yet.\n");
    }
    for movie in &section.movies {
        out.push_str(&format!("  {}\n", MovieCardView::new(movie, image_base)));
    }
}

/// `/` landing page
pub fn render_landing(highlights: &Highlights, image_base: &str) -> String {
    let mut out = format!("{}\n{}\n", HERO_EYEBROW, HERO_TITLE);

    if let Some(notice) = highlights.disabled {
        out.push_str(&format!("\n{}\n", notice));
        return out;
    }

    push_section(&mut out, "Trending", &highlights.trending, image_base);
    push_section(&mut out, "Featured", &highlights.featured, image_base);
    out
}

/// Search results area of `/app`
pub fn render_search(state: &SearchState, image_base: &str) -> String {
    if let Some(notice) = state.disabled {
        return format!("{}\n", notice);
    }
    if state.loading {
        return format!("Searching for \"{}\"…\n", state.debounced);
    }
    if let Some(error) = &state.error {
        return format!("! {}\n", error);
    }
    if state.debounced.is_empty() {
        return "Type to search movies.\n".to_string();
    }
    if state.results.is_empty() {
        return format!("No results for \"{}\".\n", state.debounced);
    }

    state
        .results
        .iter()
        .map(|movie| format!("{}\n", MovieCardView::new(movie, image_base)))
        .collect()
}

/// "Your Saved Movies"
pub fn render_movie_list(state: &MovieListState) -> String {
    if let Some(notice) = state.disabled {
        return format!("{}\n", notice);
    }
    if state.loading {
        return "Loading your movies…\n".to_string();
    }
    if let Some(error) = &state.error {
        return format!("! {}\n", error);
    }
    if state.movies.is_empty() {
        return "No movies yet. Add one using the form above.\n".to_string();
    }

    state
        .movies
        .iter()
        .map(|record| format!("  {}\n", UserMovieCardView::from(record)))
        .collect()
}

/// Status line under the "Add a Movie" form
pub fn render_form_status(form: &MovieFormFlow) -> String {
    if let Some(notice) = form.disabled() {
        return format!("{}\n", notice);
    }
    match (&form.error, &form.success) {
        (Some(error), _) => format!("! {}\n", error),
        (None, Some(success)) => format!("{}\n", success),
        (None, None) if form.submitting => "Saving…\n".to_string(),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Feature,
        models::MovieSummary,
        services::{events::MovieEvents, persistence::UserMovies},
    };

    const IMAGES: &str = "https://image.tmdb.org/t/p";

    fn movie(title: &str) -> MovieSummary {
        MovieSummary {
            id: 1,
            title: title.to_string(),
            poster_path: None,
            release_date: Some("1999-03-30".to_string()),
            vote_average: Some(8.2),
        }
    }

    #[test]
    fn test_landing_sections_fail_independently() {
        let highlights = Highlights {
            trending: Section {
                movies: Vec::new(),
                error: Some("rate limited".to_string()),
            },
            featured: Section {
                movies: vec![movie("The Matrix")],
                error: None,
            },
            disabled: None,
        };

        let page = render_landing(&highlights, IMAGES);
        assert!(page.starts_with("TRENDING MOVIES AT\nMovie AI\n"));
        assert!(page.contains("! rate limited"));
        assert!(page.contains("The Matrix (1999)"));
    }

    #[test]
    fn test_search_states() {
        let mut state = SearchState::default();
        assert_eq!(render_search(&state, IMAGES), "Type to search movies.\n");

        state.debounced = "matrix".to_string();
        state.loading = true;
        assert_eq!(render_search(&state, IMAGES), "Searching for \"matrix\"…\n");

        state.loading = false;
        assert_eq!(render_search(&state, IMAGES), "No results for \"matrix\".\n");

        state.results = vec![movie("The Matrix")];
        assert_eq!(render_search(&state, IMAGES), "★ 8.2  The Matrix (1999)\n");

        state.disabled = Some(Feature::Catalog.notice());
        assert!(render_search(&state, IMAGES).contains("TMDB_API_KEY"));
    }

    #[test]
    fn test_movie_list_empty_state() {
        let state = MovieListState::default();
        assert_eq!(
            render_movie_list(&state),
            "No movies yet. Add one using the form above.\n"
        );
    }

    #[test]
    fn test_form_status_when_disabled() {
        let form = MovieFormFlow::new(UserMovies::disabled(), MovieEvents::new());
        assert!(render_form_status(&form).contains("SUPABASE_URL"));
    }
}
