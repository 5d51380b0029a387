use std::fmt::{self, Display};

/// The two navigable views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/` marketing landing page
    Landing,
    /// `/app` search application
    App,
    NotFound,
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "" => Route::Landing,
            "/app" => Route::App,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::App => "/app",
            Route::NotFound => "/404",
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
