//! Gameplay tuning: spawn pacing, speed, scoring and level progression.
//!
//! Every number the game loop depends on lives here so a host can override it
//! (see `configure()` with the `serde_json` feature). Defaults reproduce the
//! classic pacing.

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Spawn interval at level 0, in milliseconds.
    pub base_spawn_interval_ms: f64,
    /// Interval reduction per level.
    pub spawn_interval_step_ms: f64,
    /// Floor for the spawn interval.
    pub min_spawn_interval_ms: f64,
    /// While fewer than `level + burst_headroom` asteroids are active the next
    /// spawn comes after half the interval.
    pub burst_headroom: usize,

    /// Highest built-in word table.
    pub max_word_level: u32,
    /// How many table levels below the current maximum can still be drawn.
    pub word_level_spread: u32,

    /// Fall speed in px/frame at level 0.
    pub base_speed: f64,
    pub speed_per_level: f64,
    pub speed_jitter_min: f64,
    pub speed_jitter_max: f64,

    /// Horizontal keep-out on each side of the surface.
    pub spawn_margin: f64,
    /// Starting y, above the visible area.
    pub spawn_y: f64,

    pub initial_lives: i32,
    pub points_per_letter: f64,
    /// Level `n` ends once the score exceeds `n * level_up_step`.
    pub level_up_step: u64,

    pub explosion_src: String,
    pub music_src: String,
    pub music_volume: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_spawn_interval_ms: 2000.0,
            spawn_interval_step_ms: 200.0,
            min_spawn_interval_ms: 300.0,
            burst_headroom: 3,
            max_word_level: 5,
            word_level_spread: 2,
            base_speed: 0.5,
            speed_per_level: 0.15,
            speed_jitter_min: 0.8,
            speed_jitter_max: 1.2,
            spawn_margin: 50.0,
            spawn_y: -50.0,
            initial_lives: 3,
            points_per_letter: 10.0,
            level_up_step: 300,
            explosion_src: "/explosion.mp3".to_string(),
            music_src: "/background.mp3".to_string(),
            music_volume: 0.3,
        }
    }
}

impl GameConfig {
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, crate::GameError> {
        serde_json::from_str(json).map_err(|e| crate::GameError::Config(e.to_string()))
    }

    pub fn spawn_interval_ms(&self, level: u32) -> f64 {
        (self.base_spawn_interval_ms - f64::from(level) * self.spawn_interval_step_ms)
            .max(self.min_spawn_interval_ms)
    }

    /// Inclusive range of word-table levels eligible at `level`.
    pub fn word_level_range(&self, level: u32) -> (u32, u32) {
        let max = level.div_ceil(2).clamp(1, self.max_word_level.max(1));
        let min = max.saturating_sub(self.word_level_spread).max(1);
        (min, max)
    }

    pub fn base_speed(&self, level: u32) -> f64 {
        self.base_speed + f64::from(level) * self.speed_per_level
    }

    /// Minimum active asteroid count below which spawns come twice as fast.
    pub fn burst_floor(&self, level: u32) -> usize {
        level as usize + self.burst_headroom
    }

    /// Points for destroying a word of `len` letters at `level`.
    pub fn word_points(&self, len: usize, level: u32) -> u64 {
        (len as f64 * self.points_per_letter * f64::from(level).sqrt()).floor() as u64
    }

    pub fn level_up_threshold(&self, level: u32) -> u64 {
        u64::from(level) * self.level_up_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_interval_shrinks_then_floors() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.spawn_interval_ms(1), 1800.0);
        assert_eq!(cfg.spawn_interval_ms(5), 1000.0);
        assert_eq!(cfg.spawn_interval_ms(8), 400.0);
        assert_eq!(cfg.spawn_interval_ms(9), 300.0);
        assert_eq!(cfg.spawn_interval_ms(40), 300.0);
        let mut prev = f64::MAX;
        for level in 1..30 {
            let cur = cfg.spawn_interval_ms(level);
            assert!(cur <= prev);
            assert!(cur >= 300.0);
            prev = cur;
        }
    }

    #[test]
    fn word_levels_track_half_the_player_level() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.word_level_range(1), (1, 1));
        assert_eq!(cfg.word_level_range(2), (1, 1));
        assert_eq!(cfg.word_level_range(3), (1, 2));
        assert_eq!(cfg.word_level_range(6), (1, 3));
        assert_eq!(cfg.word_level_range(7), (2, 4));
        assert_eq!(cfg.word_level_range(10), (3, 5));
        assert_eq!(cfg.word_level_range(99), (3, 5));
    }

    #[test]
    fn points_scale_with_length_and_sqrt_level() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.word_points(4, 1), 40);
        // 5 * 10 * sqrt(2) = 70.71..
        assert_eq!(cfg.word_points(5, 2), 70);
        // 12 * 10 * sqrt(3) = 207.84..
        assert_eq!(cfg.word_points(12, 3), 207);
    }

    #[test]
    fn speed_and_thresholds() {
        let cfg = GameConfig::default();
        assert!((cfg.base_speed(1) - 0.65).abs() < 1e-9);
        assert!((cfg.base_speed(4) - 1.1).abs() < 1e-9);
        assert_eq!(cfg.level_up_threshold(2), 600);
        assert_eq!(cfg.burst_floor(1), 4);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = GameConfig::from_json(r#"{"initial_lives": 5, "music_volume": 0.1}"#).unwrap();
        assert_eq!(cfg.initial_lives, 5);
        assert_eq!(cfg.level_up_step, 300);
        assert!(GameConfig::from_json("{not json").is_err());
    }
}
