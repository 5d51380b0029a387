pub mod catalog;
pub mod events;
pub mod highlights;
pub mod identity;
pub mod persistence;
pub mod providers;
pub mod search;
pub mod session;
pub mod user_movies;

pub use catalog::{Catalog, CatalogProvider};
pub use events::{MovieEvents, MoviesChanged};
pub use highlights::{Highlights, Section};
pub use identity::IdentityProvider;
pub use persistence::{MovieStore, UserMovies};
pub use search::{SearchFlow, SearchState};
pub use session::SessionBridge;
pub use user_movies::{MovieForm, MovieFormFlow, MovieListFlow, MovieListState};
