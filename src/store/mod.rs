//! Game and score persistence.
//!
//! The interactive session talks to persistence only through
//! [`GameBackend`]: save a layout, submit a scored route. [`JsonStore`] is
//! the file-backed implementation used by the CLI and the web server; it
//! also answers the read-side queries (listings, high scores, export).

mod json;
mod records;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TourError, TourResult};

pub use json::{JsonStore, DEFAULT_GAME_NAME, MIN_GAME_CITIES};
pub use records::{verify_distance, Database, Game, NewGame, Page, Run, RunSubmission};

/// Save-game and submit-run boundary.
pub trait GameBackend {
    /// Persist a new layout.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientCities` when the layout is too small, or a
    /// storage error.
    fn save_game(&self, request: NewGame) -> TourResult<Game>;

    /// Score and persist a route over a saved game.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown game, or a storage error.
    fn submit_run(&self, request: RunSubmission) -> TourResult<Run>;
}

impl<B: GameBackend + ?Sized> GameBackend for &B {
    fn save_game(&self, request: NewGame) -> TourResult<Game> {
        (**self).save_game(request)
    }

    fn submit_run(&self, request: RunSubmission) -> TourResult<Run> {
        (**self).submit_run(request)
    }
}

/// High-score ranking scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Every run competes.
    #[default]
    Global,
    /// Only each game's best run competes.
    PerGame,
}

impl Scope {
    /// Query-string form: `per_game` selects [`Scope::PerGame`], anything
    /// else (including nothing) is global.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("per_game") => Self::PerGame,
            _ => Self::Global,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::PerGame => write!(f, "per_game"),
        }
    }
}

impl FromStr for Scope {
    type Err = TourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(Self::Global),
            "per_game" => Ok(Self::PerGame),
            other => Err(TourError::invalid_request(format!(
                "unknown scope '{other}' (expected global or per_game)"
            ))),
        }
    }
}
