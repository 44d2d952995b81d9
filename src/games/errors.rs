use thiserror::Error;

/// Failures surfaced by guessing-game operations.
///
/// None of these are fatal; the shell turns each one into a user-facing line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The operation needs an active subject but the session is idle.
    #[error("no active game")]
    NoActiveGame,

    /// A guess was submitted with no text after trimming.
    #[error("guess text is empty")]
    EmptyGuess,

    /// The subject provider failed, timed out, or returned nothing usable.
    #[error("subject provider unavailable")]
    ProviderUnavailable,

    /// A subject request is already outstanding for this session.
    #[error("a subject request is already in flight")]
    RequestPending,

    /// A subject record violated its invariants (empty identifier or hint list).
    #[error("invalid subject: {0}")]
    InvalidSubject(String),

    /// The requested theme is disabled or was never registered.
    #[error("game theme '{0}' is not available")]
    ThemeUnavailable(&'static str),
}

/// Errors raised while loading a seed catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Wrapper around IO errors (missing or unreadable seed file).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapper around JSON decode errors.
    #[error("seed parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A seed entry decoded but failed validation.
    #[error("seed entry {index}: {source}")]
    Invalid { index: usize, source: GameError },

    /// The catalog decoded to zero subjects.
    #[error("catalog '{0}' contains no subjects")]
    Empty(String),
}
