//! Single-file JSON database.
//!
//! Every operation takes the process-wide lock, reads the file, and for
//! mutations writes the whole database to `<path>.tmp` before renaming it
//! over the original. A missing or unparsable file reads as empty.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{info, warn};
use uuid::Uuid;

use super::records::{empty_meta, verify_distance, Database, Game, NewGame, Page, Run, RunSubmission};
use super::{GameBackend, Scope};
use crate::config::GameConfig;
use crate::error::{TourError, TourResult};

/// Games a layout needs before it can be saved.
pub const MIN_GAME_CITIES: usize = 3;

/// Default game name.
pub const DEFAULT_GAME_NAME: &str = "Untitled";

/// File-backed game and score store.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    lock: Mutex<()>,
    min_cities: usize,
    default_name: String,
}

impl JsonStore {
    /// Open (creating if absent) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns `Io` if a fresh database cannot be written.
    pub fn open(path: impl Into<PathBuf>) -> TourResult<Self> {
        let store = Self {
            path: path.into(),
            lock: Mutex::new(()),
            min_cities: MIN_GAME_CITIES,
            default_name: DEFAULT_GAME_NAME.to_string(),
        };
        if !store.path.exists() {
            let _guard = store.guard()?;
            store.write(&Database::default())?;
        }
        Ok(store)
    }

    /// Open the database named by `config.store`, with the game rules from
    /// `config.game`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::open`].
    pub fn from_config(config: &GameConfig) -> TourResult<Self> {
        let mut store = Self::open(&config.store.path)?;
        store.min_cities = config.game.min_cities;
        store.default_name.clone_from(&config.game.default_name);
        Ok(store)
    }

    /// Database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Page through saved games in creation order.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the database cannot be read.
    pub fn list_games(&self, limit: usize, offset: usize) -> TourResult<Page<Game>> {
        let db = self.read_db()?;
        let total = db.games.len();
        let items = db.games.into_iter().skip(offset).take(limit).collect();
        Ok(Page { total, items })
    }

    /// Fetch one game.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no game has `id`.
    pub fn get_game(&self, id: &str) -> TourResult<Game> {
        self.read_db()?
            .games
            .into_iter()
            .find(|g| g.id == id)
            .ok_or_else(|| TourError::not_found("game", id))
    }

    /// Runs in submission order, optionally filtered. Empty filters match
    /// everything.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the database cannot be read.
    pub fn list_runs(&self, game_id: Option<&str>, agent_type: Option<&str>) -> TourResult<Page<Run>> {
        let game_id = game_id.filter(|s| !s.is_empty());
        let agent_type = agent_type.filter(|s| !s.is_empty());

        let items: Vec<Run> = self
            .read_db()?
            .runs
            .into_iter()
            .filter(|r| game_id.map_or(true, |id| r.game_id == id))
            .filter(|r| agent_type.map_or(true, |agent| r.agent_type == agent))
            .collect();
        Ok(Page {
            total: items.len(),
            items,
        })
    }

    /// Ranked runs: most cities first, then shortest distance.
    ///
    /// `num_cities` is backfilled from the game for older records. With
    /// [`Scope::PerGame`] only the shortest run of each game is kept (first
    /// submitted wins ties).
    ///
    /// # Errors
    ///
    /// Returns `Io` if the database cannot be read.
    pub fn highscores(&self, scope: Scope, agent_type: Option<&str>, limit: usize) -> TourResult<Vec<Run>> {
        let db = self.read_db()?;
        let agent_type = agent_type.filter(|s| !s.is_empty());

        let mut runs: Vec<Run> = db
            .runs
            .iter()
            .filter(|r| agent_type.map_or(true, |agent| r.agent_type == agent))
            .cloned()
            .map(|mut run| {
                if run.num_cities == 0 {
                    run.num_cities = db.game(&run.game_id).map_or(0, Game::num_cities);
                }
                run
            })
            .collect();

        if scope == Scope::PerGame {
            runs = best_per_game(runs);
        }

        runs.sort_by(|a, b| {
            b.num_cities
                .cmp(&a.num_cities)
                .then_with(|| a.distance.total_cmp(&b.distance))
        });
        runs.truncate(limit);
        Ok(runs)
    }

    /// Snapshot of the whole database.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the database cannot be read.
    pub fn export(&self) -> TourResult<Database> {
        self.read_db()
    }

    fn guard(&self) -> TourResult<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| TourError::io("database lock poisoned"))
    }

    fn read_db(&self) -> TourResult<Database> {
        let _guard = self.guard()?;
        self.load()
    }

    /// Load, mutate and persist under one lock. Nothing is written when
    /// `mutate` fails.
    fn with_db<R>(&self, mutate: impl FnOnce(&mut Database) -> TourResult<R>) -> TourResult<R> {
        let _guard = self.guard()?;
        let mut db = self.load()?;
        let result = mutate(&mut db)?;
        self.write(&db)?;
        Ok(result)
    }

    fn load(&self) -> TourResult<Database> {
        if !self.path.exists() {
            return Ok(Database::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str(&content) {
            Ok(db) => Ok(db),
            Err(error) => {
                warn!(
                    event = "db_unreadable",
                    path = %self.path.display(),
                    error = %error,
                    "treating database as empty"
                );
                Ok(Database::default())
            }
        }
    }

    fn write(&self, db: &Database) -> TourResult<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let json = serde_json::to_string_pretty(db)?;
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl GameBackend for JsonStore {
    fn save_game(&self, request: NewGame) -> TourResult<Game> {
        if request.cities.len() < self.min_cities {
            return Err(TourError::InsufficientCities {
                required: self.min_cities,
                actual: request.cities.len(),
            });
        }

        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.default_name)
            .to_string();

        let game = Game {
            id: new_id(),
            name,
            cities: request.cities,
            meta: request.meta.filter(|m| !m.is_null()).unwrap_or_else(empty_meta),
            created_at: now_ms(),
        };

        self.with_db(|db| {
            db.games.push(game.clone());
            Ok(())
        })?;

        info!(
            event = "game_saved",
            game_id = %game.id,
            name = %game.name,
            cities = game.cities.len(),
        );
        Ok(game)
    }

    fn submit_run(&self, request: RunSubmission) -> TourResult<Run> {
        let run = self.with_db(|db| {
            let game = db
                .game(&request.game_id)
                .ok_or_else(|| TourError::not_found("game", &request.game_id))?;

            let verified = verify_distance(&game.cities, &request.route);
            let run = Run {
                id: new_id(),
                game_id: request.game_id.clone(),
                player_name: request.player_name.trim().to_string(),
                agent_type: request.agent_type.trim().to_string(),
                distance: verified.unwrap_or(request.distance),
                verified: verified.is_some(),
                route: request.route.clone(),
                num_cities: game.num_cities(),
                compute_time_ms: request.compute_time_ms,
                created_at: now_ms(),
            };
            db.runs.push(run.clone());
            Ok(run)
        })?;

        info!(
            event = "run_submitted",
            run_id = %run.id,
            game_id = %run.game_id,
            agent_type = %run.agent_type,
            distance = run.distance,
            verified = run.verified,
        );
        Ok(run)
    }
}

/// Keep the shortest run per game, in order of each game's first run.
fn best_per_game(runs: Vec<Run>) -> Vec<Run> {
    let mut best: Vec<Run> = Vec::new();
    for run in runs {
        match best.iter_mut().find(|b| b.game_id == run.game_id) {
            Some(current) if run.distance < current.distance => *current = run,
            Some(_) => {}
            None => best.push(run),
        }
    }
    best
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[allow(clippy::cast_possible_truncation)]
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}
