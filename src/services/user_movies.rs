//! Saved-movie form and list.
//!
//! The form validates locally, issues one insert, and on success signals
//! `MovieEvents` so every list refreshes. The list replaces its contents with each
//! read; a read that was overtaken by a newer one is dropped.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use reqwest::Url;
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};

use crate::{
    error::{AppError, AppResult, Feature},
    models::{NewUserMovie, UserMovieRecord},
    services::{events::MovieEvents, persistence::UserMovies},
};

pub const MIN_YEAR: i32 = 1888;
pub const MAX_YEAR: i32 = 2100;

pub const SAVE_SUCCESS: &str = "Movie saved successfully!";
pub const SAVE_ERROR_FALLBACK: &str = "Unable to save the movie right now. Please try again.";
pub const LOAD_ERROR_FALLBACK: &str = "Unable to load your movies at the moment. Please try again.";

/// Raw form fields as typed by the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieForm {
    pub title: String,
    pub year: String,
    pub photo: String,
    pub description: String,
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl MovieForm {
    /// Checks every rule and reports all violations together
    pub fn validate(&self) -> AppResult<NewUserMovie> {
        let mut errors = Vec::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push("Title is required.".to_string());
        }

        let year = self.year.trim();
        let parsed_year = if year.is_empty() {
            errors.push("Year is required.".to_string());
            None
        } else {
            match year.parse::<i32>() {
                Ok(y) if (MIN_YEAR..=MAX_YEAR).contains(&y) => Some(y),
                _ => {
                    errors.push(format!(
                        "Year must be a valid number between {} and {}.",
                        MIN_YEAR, MAX_YEAR
                    ));
                    None
                }
            }
        };

        let photo_url = non_blank(&self.photo);
        if let Some(photo) = &photo_url {
            if Url::parse(photo).is_err() {
                errors.push("Photo must be a valid URL if provided.".to_string());
            }
        }

        match parsed_year {
            Some(year) if errors.is_empty() => Ok(NewUserMovie {
                title: title.to_string(),
                year,
                photo_url,
                description: non_blank(&self.description),
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The "Add a Movie" form
pub struct MovieFormFlow {
    pub form: MovieForm,
    pub submitting: bool,
    pub error: Option<String>,
    pub success: Option<String>,
    store: UserMovies,
    events: MovieEvents,
}

impl MovieFormFlow {
    pub fn new(store: UserMovies, events: MovieEvents) -> Self {
        Self {
            form: MovieForm::default(),
            submitting: false,
            error: None,
            success: None,
            store,
            events,
        }
    }

    /// Notice to show instead of enabling the form
    pub fn disabled(&self) -> Option<&'static str> {
        (!self.store.is_enabled()).then(|| Feature::Persistence.notice())
    }

    /// Validate, insert once, and signal listeners on success
    ///
    /// Fields are kept on failure so the user can correct them.
    pub async fn submit(&mut self) -> AppResult<()> {
        self.error = None;
        self.success = None;

        let result = self.save().await;
        match &result {
            Ok(()) => {
                self.success = Some(SAVE_SUCCESS.to_string());
                self.form.reset();
                let listeners = self.events.notify_changed();
                tracing::debug!(listeners, "Saved movies change signalled");
            }
            Err(e) => {
                self.error = Some(e.user_message(SAVE_ERROR_FALLBACK));
            }
        }
        result
    }

    async fn save(&mut self) -> AppResult<()> {
        if !self.store.is_enabled() {
            return Err(AppError::NotConfigured(Feature::Persistence));
        }

        let movie = self.form.validate()?;

        let in_flight = Submitting::start(&mut self.submitting);
        let result = self.store.insert(&movie).await;
        drop(in_flight);

        if let Err(e) = &result {
            tracing::warn!(title = %movie.title, error = %e, "Saving movie failed");
        }
        result
    }
}

/// Holds the form's in-flight flag; cleared when the insert settles or its
/// future is dropped
struct Submitting<'a>(&'a mut bool);

impl<'a> Submitting<'a> {
    fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for Submitting<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// What the saved-movies list renders
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovieListState {
    pub movies: Vec<UserMovieRecord>,
    pub loading: bool,
    pub error: Option<String>,
    pub disabled: Option<&'static str>,
}

impl MovieListState {
    pub fn is_empty(&self) -> bool {
        !self.loading && self.error.is_none() && self.movies.is_empty()
    }
}

/// The "Your Saved Movies" list
#[derive(Clone)]
pub struct MovieListFlow {
    store: UserMovies,
    state: Arc<watch::Sender<MovieListState>>,
    generation: Arc<AtomicU64>,
}

impl MovieListFlow {
    pub fn new(store: UserMovies) -> Self {
        let initial = MovieListState {
            disabled: (!store.is_enabled()).then(|| Feature::Persistence.notice()),
            ..Default::default()
        };
        let (state, _) = watch::channel(initial);

        Self {
            store,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn state(&self) -> MovieListState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MovieListState> {
        self.state.subscribe()
    }

    /// Reads the table once and replaces the list with the answer
    pub async fn refresh(&self) {
        if !self.store.is_enabled() {
            return;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.error = None;
            s.loading = true;
        });

        let result = self.store.list_recent().await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "Discarding superseded movie list");
            return;
        }

        match result {
            Ok(movies) => {
                tracing::debug!(count = movies.len(), "Saved movies loaded");
                self.state.send_modify(|s| {
                    s.movies = movies;
                    s.loading = false;
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "Loading saved movies failed");
                let message = e.user_message(LOAD_ERROR_FALLBACK);
                self.state.send_modify(|s| {
                    s.movies.clear();
                    s.error = Some(message);
                    s.loading = false;
                });
            }
        }
    }

    /// Refreshes once per change signal until the returned guard is dropped
    pub fn watch_changes(&self, events: &MovieEvents) -> ChangeListener {
        let list = self.clone();
        let mut changes = events.subscribe();

        let task = tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(_) => list.refresh().await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Collapsed queued change signals");
                        list.refresh().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        ChangeListener { task }
    }
}

/// Registration of a list on the change signal
pub struct ChangeListener {
    task: JoinHandle<()>,
}

impl Drop for ChangeListener {
    fn drop(&mut self) {
        self.task.abort();
    }
}
