use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 16;

/// Signal that the saved-movies table changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoviesChanged;

/// Explicit observer registry shared by the movie form and the movie list
#[derive(Debug, Clone)]
pub struct MovieEvents {
    tx: broadcast::Sender<MoviesChanged>,
}

impl Default for MovieEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl MovieEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Notify every current subscriber; returns how many were reached
    pub fn notify_changed(&self) -> usize {
        self.tx.send(MoviesChanged).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MoviesChanged> {
        self.tx.subscribe()
    }
}
