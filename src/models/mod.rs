pub mod movie;
pub mod session;
pub mod user_movie;

pub use movie::{MovieSummary, TmdbMovie, TmdbPage, TrendingWindow};
pub use session::{AuthChange, OAuthProvider, Session, SessionState, User, UserMetadata};
pub use user_movie::{NewUserMovie, UserMovieRecord};
