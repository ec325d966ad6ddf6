//! Error types for tourgame.
//!
//! Every fallible operation returns `Result<T, TourError>` instead of
//! panicking. Core route functions never log or swallow these errors;
//! display and recovery belong to the caller.

use thiserror::Error;

/// Result type alias for tourgame operations.
pub type TourResult<T> = Result<T, TourError>;

/// Unified error type for all tourgame operations.
#[derive(Debug, Error)]
pub enum TourError {
    // ===== Route Engine Errors =====
    /// Not enough cities to build a tour.
    #[error("insufficient cities: need at least {required}, got {actual}")]
    InsufficientCities {
        /// Minimum number of cities required.
        required: usize,
        /// Number of cities supplied.
        actual: usize,
    },

    /// A tour references a city index outside the city list.
    #[error("invalid city reference: index {index} out of range for {len} cities")]
    InvalidCityReference {
        /// Offending index.
        index: usize,
        /// Length of the city list.
        len: usize,
    },

    /// Strategy identifier is not one of `greedy`, `nearest`, `2opt`, `random`.
    #[error("unknown strategy '{0}' (expected greedy, nearest, 2opt or random)")]
    UnknownStrategy(String),

    // ===== Session / Store Errors =====
    /// The session has no active (saved) game.
    #[error("no active game: save or load a game first")]
    GameNotSaved,

    /// Requested record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Record kind ("game", "run").
        kind: &'static str,
        /// Requested identifier.
        id: String,
    },

    /// Request is malformed.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Description of the problem.
        message: String,
    },

    /// Request lacks required fields.
    #[error("missing fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TourError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a not-found error for a record kind.
    #[must_use]
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Create an I/O error with a message (wraps in `std::io::Error`).
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(std::io::Error::other(message.into()))
    }

    /// Whether the caller sent something unusable (as opposed to an
    /// internal failure).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InsufficientCities { .. }
                | Self::InvalidCityReference { .. }
                | Self::UnknownStrategy(_)
                | Self::GameNotSaved
                | Self::InvalidRequest { .. }
                | Self::MissingFields(_)
        )
    }
}
