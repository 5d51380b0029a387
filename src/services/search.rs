//! Debounced catalog search.
//!
//! Keystrokes go into a single owner task. Once input has been quiet for the
//! debounce window the trimmed query becomes the debounced query, the request
//! generation is bumped, and one catalog request is spawned for it. The request
//! reports back with the generation it was issued under; anything older than the
//! current generation is dropped on arrival. Requests are never aborted at the
//! transport level.

use std::time::Duration;

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{self, Instant},
};

use crate::{
    error::{AppResult, Feature},
    models::MovieSummary,
    services::catalog::Catalog,
};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);
pub const SEARCH_ERROR_FALLBACK: &str = "Unable to search movies right now. Please try again.";

/// Monotonic request generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Generation(u64);

impl Generation {
    pub const ZERO: Self = Self(0);

    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Everything the search view renders
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchState {
    /// Raw input, updated on every keystroke
    pub query: String,
    /// Last query that survived the debounce window
    pub debounced: String,
    pub results: Vec<MovieSummary>,
    pub loading: bool,
    pub error: Option<String>,
    /// Set when no catalog key is configured; the input stays inert
    pub disabled: Option<&'static str>,
}

struct Completion {
    generation: Generation,
    query: String,
    result: AppResult<Vec<MovieSummary>>,
}

/// Handle to a running search flow; dropping it tears the flow down
pub struct SearchFlow {
    input: mpsc::UnboundedSender<String>,
    state: watch::Receiver<SearchState>,
    task: JoinHandle<()>,
}

impl SearchFlow {
    pub fn spawn(catalog: Catalog, debounce: Duration) -> Self {
        let initial = SearchState {
            disabled: (!catalog.is_enabled()).then(|| Feature::Catalog.notice()),
            ..Default::default()
        };
        let (state_tx, state_rx) = watch::channel(initial);
        let (input_tx, input_rx) = mpsc::unbounded_channel();

        let worker = SearchWorker {
            catalog,
            debounce,
            state: state_tx,
            generation: Generation::ZERO,
        };
        let task = tokio::spawn(worker.run(input_rx));

        Self {
            input: input_tx,
            state: state_rx,
            task,
        }
    }

    /// Feed the raw input value after a keystroke
    pub fn set_query(&self, raw: impl Into<String>) {
        if self.input.send(raw.into()).is_err() {
            tracing::warn!("Search flow stopped; input dropped");
        }
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.clone()
    }
}

impl Drop for SearchFlow {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct SearchWorker {
    catalog: Catalog,
    debounce: Duration,
    state: watch::Sender<SearchState>,
    generation: Generation,
}

impl SearchWorker {
    async fn run(mut self, mut input: mpsc::UnboundedReceiver<String>) {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();
        let timer = time::sleep(self.debounce);
        tokio::pin!(timer);
        let mut pending: Option<String> = None;

        loop {
            tokio::select! {
                raw = input.recv() => match raw {
                    Some(raw) => {
                        self.state.send_modify(|s| s.query.clone_from(&raw));
                        pending = Some(raw);
                        timer.as_mut().reset(Instant::now() + self.debounce);
                    }
                    None => break,
                },
                () = &mut timer, if pending.is_some() => {
                    if let Some(raw) = pending.take() {
                        self.apply_debounced(&raw, &done_tx);
                    }
                }
                Some(done) = done_rx.recv() => self.settle(done),
            }
        }

        tracing::debug!("Search flow stopped");
    }

    fn apply_debounced(&mut self, raw: &str, done: &mpsc::UnboundedSender<Completion>) {
        let query = raw.trim().to_string();
        if query == self.state.borrow().debounced {
            return;
        }

        self.generation = self.generation.next();
        let generation = self.generation;
        let issue = self.catalog.is_enabled() && !query.is_empty();

        self.state.send_modify(|s| {
            s.debounced.clone_from(&query);
            s.error = None;
            s.loading = issue;
            if !issue {
                s.results.clear();
            }
        });

        if !issue {
            return;
        }

        tracing::debug!(generation = generation.value(), query = %query, "Issuing catalog search");

        let catalog = self.catalog.clone();
        let done = done.clone();
        tokio::spawn(async move {
            let result = catalog.search(&query).await;
            // The owner is gone after teardown; nothing left to update.
            let _ = done.send(Completion {
                generation,
                query,
                result,
            });
        });
    }

    fn settle(&mut self, done: Completion) {
        if done.generation != self.generation {
            tracing::debug!(
                generation = done.generation.value(),
                current = self.generation.value(),
                query = %done.query,
                "Discarding stale search response"
            );
            return;
        }

        match done.result {
            Ok(results) => {
                tracing::info!(query = %done.query, results = results.len(), "Search completed");
                self.state.send_modify(|s| {
                    s.results = results;
                    s.loading = false;
                });
            }
            Err(e) => {
                tracing::warn!(query = %done.query, error = %e, "Search failed");
                let message = e.user_message(SEARCH_ERROR_FALLBACK);
                self.state.send_modify(|s| {
                    s.error = Some(message);
                    s.results.clear();
                    s.loading = false;
                });
            }
        }
    }
}
