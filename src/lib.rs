//! MovieAI client core: catalog search with debounced, generation-checked
//! requests, a session bridge over the identity provider, and the saved-movies
//! form and list backed by a hosted table.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod views;

pub use config::Config;
pub use error::{AppError, AppResult, Feature};
