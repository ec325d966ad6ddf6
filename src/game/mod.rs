//! Interactive game session.
//!
//! Holds what the board shows: placed cities, the player's open path, and
//! the active saved game. Two phases:
//!
//! 1. *Layout*: no active game; clicks place cities.
//! 2. *Routing*: a saved game is active; clicks snap to the nearest city and
//!    extend the open path.
//!
//! Persistence goes through a [`GameBackend`]; the session itself does no
//! I/O.

use crate::config::GameRules;
use crate::error::{TourError, TourResult};
use crate::geometry::City;
use crate::heuristics::{HeuristicResult, HeuristicRunner, Strategy};
use crate::store::{Game, GameBackend, NewGame, Run, RunSubmission};
use crate::tour::path_length;

/// Agent tag for player-built routes.
pub const HUMAN_AGENT: &str = "human";

/// Label for the city placed at `index`: `A`..`Z`, then letter plus index
/// (`A26`, `B27`, ...).
#[must_use]
pub fn city_label(index: usize) -> String {
    let letter = char::from(b'A' + (index % 26) as u8);
    if index >= 26 {
        format!("{letter}{index}")
    } else {
        letter.to_string()
    }
}

/// Board state for one player.
#[derive(Debug, Clone, Default)]
pub struct GameSession {
    rules: GameRules,
    cities: Vec<City>,
    route: Vec<usize>,
    game: Option<Game>,
}

impl GameSession {
    /// Empty board with the given rules.
    #[must_use]
    pub fn new(rules: GameRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    /// Cities in placement order.
    #[must_use]
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Current open path (or the last bot tour).
    #[must_use]
    pub fn route(&self) -> &[usize] {
        &self.route
    }

    /// Active saved game, if any.
    #[must_use]
    pub fn active_game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    /// Place a city at the rounded click position.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` while a saved game is active; its layout is
    /// fixed.
    pub fn place_city(&mut self, x: f64, y: f64) -> TourResult<&City> {
        if self.game.is_some() {
            return Err(TourError::invalid_request(
                "layout is fixed while a saved game is active; clear the board first",
            ));
        }
        let city = City::new(city_label(self.cities.len()), x.round(), y.round());
        self.cities.push(city);
        Ok(&self.cities[self.cities.len() - 1])
    }

    /// Append the city nearest to the click, if one lies strictly inside the
    /// snap radius. Exact ties go to the lower index.
    ///
    /// # Errors
    ///
    /// Returns `GameNotSaved` during layout.
    pub fn pick_city(&mut self, x: f64, y: f64) -> TourResult<Option<usize>> {
        if self.game.is_none() {
            return Err(TourError::GameNotSaved);
        }

        let mut best = None;
        let mut best_dist = self.rules.snap_radius;
        for (i, city) in self.cities.iter().enumerate() {
            let d = city.distance_to_point(x, y);
            if d < best_dist {
                best = Some(i);
                best_dist = d;
            }
        }

        if let Some(index) = best {
            self.route.push(index);
        }
        Ok(best)
    }

    /// Drop the last city of the path.
    pub fn undo(&mut self) -> Option<usize> {
        self.route.pop()
    }

    /// Reset to an empty layout.
    pub fn clear(&mut self) {
        self.cities.clear();
        self.route.clear();
        self.game = None;
    }

    /// Length of the current path, without a return leg.
    #[must_use]
    pub fn route_distance(&self) -> f64 {
        path_length(&self.cities, &self.route)
    }

    /// Labels along the current path.
    #[must_use]
    pub fn route_labels(&self) -> Vec<String> {
        self.route.iter().map(|&i| self.cities[i].id.clone()).collect()
    }

    /// One-line status for the board.
    #[must_use]
    pub fn status_line(&self) -> String {
        if self.route.is_empty() {
            return "Route cleared. Click cities to build a path.".to_string();
        }
        format!(
            "Route: {}  |  Dist: {:.2}",
            self.route_labels().join(" → "),
            self.route_distance()
        )
    }

    /// Build the save request for the current layout.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientCities` below the configured minimum.
    pub fn save_request(&self, name: &str) -> TourResult<NewGame> {
        if self.cities.len() < self.rules.min_cities {
            return Err(TourError::InsufficientCities {
                required: self.rules.min_cities,
                actual: self.cities.len(),
            });
        }
        let name = match name.trim() {
            "" => self.rules.default_name.clone(),
            trimmed => trimmed.to_string(),
        };
        Ok(NewGame {
            name: Some(name),
            cities: self.cities.clone(),
            meta: None,
        })
    }

    /// Save the layout and switch to routing.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::save_request`] and backend errors; the board is
    /// unchanged on failure.
    pub fn save<B: GameBackend>(&mut self, backend: &B, name: &str) -> TourResult<&Game> {
        let game = backend.save_game(self.save_request(name)?)?;
        Ok(self.attach_game(game))
    }

    /// Make `game` the active game (after saving, or when loading a listed
    /// game) and start an empty path over its cities.
    pub fn attach_game(&mut self, game: Game) -> &Game {
        self.cities.clone_from(&game.cities);
        self.route.clear();
        self.game.insert(game)
    }

    /// Submission for the player's current path.
    ///
    /// # Errors
    ///
    /// Returns `GameNotSaved` without an active game and `InvalidRequest`
    /// for an empty path.
    pub fn human_submission(&self, player: &str) -> TourResult<RunSubmission> {
        let game = self.game.as_ref().ok_or(TourError::GameNotSaved)?;
        if self.route.is_empty() {
            return Err(TourError::invalid_request("route is empty"));
        }
        let player = match player.trim() {
            "" => self.rules.default_player.clone(),
            trimmed => trimmed.to_string(),
        };
        Ok(RunSubmission {
            game_id: game.id.clone(),
            player_name: player,
            agent_type: HUMAN_AGENT.to_string(),
            distance: self.route_distance(),
            route: self.route_labels(),
            compute_time_ms: 0,
        })
    }

    /// Submit the player's path and clear it.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::human_submission`] and backend errors; the path is
    /// kept on failure.
    pub fn finish<B: GameBackend>(&mut self, backend: &B, player: &str) -> TourResult<Run> {
        let run = backend.submit_run(self.human_submission(player)?)?;
        self.route.clear();
        Ok(run)
    }

    /// Run a bot over the active game, show its tour, and build the
    /// submission for it.
    ///
    /// # Errors
    ///
    /// Returns `GameNotSaved` without an active game, or the heuristic's
    /// error.
    pub fn run_bot(
        &mut self,
        runner: &mut HeuristicRunner,
        strategy: Strategy,
    ) -> TourResult<(HeuristicResult, RunSubmission)> {
        let game_id = self
            .game
            .as_ref()
            .map(|g| g.id.clone())
            .ok_or(TourError::GameNotSaved)?;

        let result = runner.run(strategy, &self.cities)?;
        self.route = result.route.as_slice().to_vec();

        let submission = RunSubmission {
            game_id,
            player_name: strategy.player_name(),
            agent_type: strategy.agent_type(),
            distance: result.distance,
            route: self.route_labels(),
            compute_time_ms: result.compute_time_ms(),
        };
        Ok((result, submission))
    }
}
