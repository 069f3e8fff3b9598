//! Per-play state and the per-frame update.
//!
//! `Session` owns the asteroid field outright; the typist refers to its target
//! by [`AsteroidId`] only. Everything observable by the host (sound cues, phase
//! changes) is queued as a [`GameEvent`] and drained by the driver after each
//! frame or keystroke.

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::asteroid::{Asteroid, AsteroidId};
use super::spawner::{SpawnContext, SpawnPlan, Spawner};
use super::typing::{KeyOutcome, Typist};
use super::words::{WordBank, WordMode};
use crate::{GameConfig, GameError};

pub const MENU_KEY: &str = "Escape";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum GamePhase {
    #[default]
    Menu,
    Playing,
    GameOver,
}

impl GamePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::GameOver => "gameOver",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    Started,
    Destroyed { word: String, points: u64 },
    LevelUp { level: u32 },
    LifeLost { lives: i32 },
    GameOver(Summary),
    ReturnedToMenu,
}

/// Final tally handed to the game-over screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summary {
    pub score: u64,
    pub level: u32,
}

impl Summary {
    pub fn rank_message(&self) -> &'static str {
        match self.level {
            0..=2 => "Keep practicing!",
            3..=4 => "Good job!",
            5..=7 => "Impressive!",
            _ => "You're a typing master!",
        }
    }
}

pub struct Session {
    config: GameConfig,
    pending_config: Option<GameConfig>,
    phase: GamePhase,
    score: u64,
    level: u32,
    lives: i32,
    asteroids: Vec<Asteroid>,
    typist: Typist,
    spawner: Spawner,
    words: WordBank,
    next_id: u64,
    width: f64,
    height: f64,
    rng: StdRng,
    events: Vec<GameEvent>,
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic session for tests and replays.
    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        Self {
            lives: config.initial_lives,
            config,
            pending_config: None,
            phase: GamePhase::Menu,
            score: 0,
            level: 1,
            asteroids: Vec::new(),
            typist: Typist::default(),
            spawner: Spawner::default(),
            words: WordBank::default(),
            next_id: 0,
            width: 0.0,
            height: 0.0,
            rng,
            events: Vec::new(),
        }
    }

    // --- accessors ---------------------------------------------------------

    pub fn phase(&self) -> GamePhase {
        self.phase
    }
    pub fn score(&self) -> u64 {
        self.score
    }
    pub fn level(&self) -> u32 {
        self.level
    }
    pub fn lives(&self) -> i32 {
        self.lives
    }
    pub fn current_word(&self) -> &str {
        self.typist.current_word()
    }
    pub fn target(&self) -> Option<AsteroidId> {
        self.typist.target()
    }
    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }
    pub fn asteroid(&self, id: AsteroidId) -> Option<&Asteroid> {
        self.asteroids.iter().find(|a| a.id == id)
    }
    /// Tuning of the current run.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
    pub fn has_pending_config(&self) -> bool {
        self.pending_config.is_some()
    }
    pub fn words(&self) -> &WordBank {
        &self.words
    }
    pub fn summary(&self) -> Summary {
        Summary {
            score: self.score,
            level: self.level,
        }
    }
    pub fn bounds(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Take everything queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // --- host controls -----------------------------------------------------

    /// New config applies from the next `start()`; a run in progress keeps
    /// its tuning.
    pub fn set_config(&mut self, config: GameConfig) {
        self.pending_config = Some(config);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn set_word_mode(&mut self, mode: WordMode) {
        self.words.set_mode(mode);
    }

    pub fn load_custom_text(&mut self, text: &str) -> Result<usize, GameError> {
        self.words.load_custom_text(text)
    }

    /// Enter Playing with a clean slate. Works from any phase.
    pub fn start(&mut self) {
        if let Some(config) = self.pending_config.take() {
            debug!("applying new tuning");
            self.config = config;
        }
        self.score = 0;
        self.level = 1;
        self.lives = self.config.initial_lives;
        self.typist.reset();
        self.asteroids.clear();
        self.spawner.reset();
        self.phase = GamePhase::Playing;
        info!(
            "session started ({} words, {}x{})",
            self.words.mode().as_str(),
            self.width,
            self.height
        );
        self.events.push(GameEvent::Started);
    }

    /// Abandon the run (or leave the game-over screen) for the menu.
    pub fn return_to_menu(&mut self) {
        if self.phase == GamePhase::Menu {
            return;
        }
        info!("back to menu at score {} level {}", self.score, self.level);
        self.phase = GamePhase::Menu;
        self.drop_target();
        self.events.push(GameEvent::ReturnedToMenu);
    }

    /// Place an asteroid directly. The spawner goes through here too.
    pub fn insert_asteroid(&mut self, word: &str, x: f64, y: f64, speed: f64) -> AsteroidId {
        let id = AsteroidId(self.next_id);
        self.next_id += 1;
        self.asteroids
            .push(Asteroid::new(id, x, y, word, speed, &mut self.rng));
        id
    }

    // --- input ---------------------------------------------------------------

    /// Feed one `KeyboardEvent.key` value. Only single letters and the menu
    /// key do anything, and only while playing.
    pub fn handle_key(&mut self, key: &str) -> KeyOutcome {
        if self.phase != GamePhase::Playing {
            return KeyOutcome::Ignored;
        }
        if key == MENU_KEY {
            self.return_to_menu();
            return KeyOutcome::Ignored;
        }
        let mut chars = key.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return KeyOutcome::Ignored;
        };

        let outcome = self.typist.press(c, &mut self.asteroids);
        match outcome {
            KeyOutcome::Acquired(id) => debug!("target {id:?} acquired"),
            KeyOutcome::Missed(id) => debug!("missed on {id:?}"),
            KeyOutcome::Completed(id) => self.destroy(id),
            KeyOutcome::Advanced(_) | KeyOutcome::Ignored => {}
        }
        outcome
    }

    fn destroy(&mut self, id: AsteroidId) {
        let Some(idx) = self.asteroids.iter().position(|a| a.id == id) else {
            return;
        };
        let asteroid = self.asteroids.remove(idx);
        let points = self.config.word_points(asteroid.len(), self.level);
        self.score += points;
        debug!("destroyed '{}' for {points}", asteroid.word);
        self.events.push(GameEvent::Destroyed {
            word: asteroid.word,
            points,
        });

        // one level per destruction, even if several thresholds were crossed
        if self.score > self.config.level_up_threshold(self.level) {
            self.level += 1;
            info!("level up: {}", self.level);
            self.events.push(GameEvent::LevelUp { level: self.level });
        }
    }

    // --- frame ---------------------------------------------------------------

    /// One animation frame: maybe spawn, move everything, and charge a life for
    /// each asteroid that fell past the bottom. No-op outside Playing.
    pub fn tick(&mut self, now_ms: f64) {
        if self.phase != GamePhase::Playing {
            return;
        }

        let ctx = SpawnContext {
            now_ms,
            level: self.level,
            active: self.asteroids.len(),
            surface_width: self.width,
        };
        if let Some(plan) = self
            .spawner
            .poll(ctx, &self.config, &self.words, &mut self.rng)
        {
            self.spawn(plan);
        }

        for i in (0..self.asteroids.len()).rev() {
            self.asteroids[i].update();
            if !self.asteroids[i].is_below(self.height) {
                continue;
            }
            let fallen = self.asteroids.remove(i);
            self.typist.forget(fallen.id);
            self.lives -= 1;
            debug!("'{}' got through, {} lives left", fallen.word, self.lives);
            self.events.push(GameEvent::LifeLost { lives: self.lives });
            if self.lives <= 0 {
                self.game_over();
                return;
            }
        }
    }

    /// Release the locked asteroid along with the typist's lock.
    fn drop_target(&mut self) {
        let locked = self.typist.target();
        if let Some(a) = self.asteroids.iter_mut().find(|a| Some(a.id) == locked) {
            a.release();
        }
        self.typist.reset();
    }

    fn spawn(&mut self, plan: SpawnPlan) -> AsteroidId {
        self.insert_asteroid(&plan.word, plan.x, plan.y, plan.speed)
    }

    fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.drop_target();
        let summary = self.summary();
        info!("game over: score {} level {}", summary.score, summary.level);
        self.events.push(GameEvent::GameOver(summary));
    }

    #[cfg(test)]
    pub(crate) fn set_lives(&mut self, lives: i32) {
        self.lives = lives;
    }

    #[cfg(test)]
    pub(crate) fn set_level(&mut self, level: u32) {
        self.level = level;
    }
}
