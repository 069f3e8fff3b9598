// Spawn pacing: when to launch the next asteroid and what it carries.
use rand::Rng;

use super::words::WordBank;
use crate::GameConfig;

/// Everything the session needs to place a new asteroid.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnPlan {
    pub x: f64,
    pub y: f64,
    pub word: String,
    pub speed: f64,
}

/// Snapshot of session state the spawner reads.
#[derive(Clone, Copy, Debug)]
pub struct SpawnContext {
    pub now_ms: f64,
    pub level: u32,
    pub active: usize,
    pub surface_width: f64,
}

#[derive(Clone, Debug, Default)]
pub struct Spawner {
    last_spawn_ms: f64,
}

impl Spawner {
    pub fn reset(&mut self) {
        self.last_spawn_ms = 0.0;
    }

    pub fn last_spawn_ms(&self) -> f64 {
        self.last_spawn_ms
    }

    /// Emit a plan once the level's interval has elapsed.
    ///
    /// After a spawn, if the board (including the new asteroid) still holds
    /// fewer than `level + burst_headroom` asteroids, the clock is wound back by
    /// half an interval so the next one arrives sooner.
    pub fn poll<R: Rng + ?Sized>(
        &mut self,
        ctx: SpawnContext,
        cfg: &GameConfig,
        words: &WordBank,
        rng: &mut R,
    ) -> Option<SpawnPlan> {
        let interval = cfg.spawn_interval_ms(ctx.level);
        if ctx.now_ms - self.last_spawn_ms <= interval {
            return None;
        }

        let plan = plan_spawn(ctx, cfg, words, rng);
        self.last_spawn_ms = ctx.now_ms;
        if ctx.active + 1 < cfg.burst_floor(ctx.level) {
            self.last_spawn_ms -= interval / 2.0;
        }
        Some(plan)
    }
}

/// Roll word, position and speed for a new asteroid.
pub fn plan_spawn<R: Rng + ?Sized>(
    ctx: SpawnContext,
    cfg: &GameConfig,
    words: &WordBank,
    rng: &mut R,
) -> SpawnPlan {
    let (min_level, max_level) = cfg.word_level_range(ctx.level);
    let word_level = rng.gen_range(min_level..=max_level);
    let word = words.pick(word_level, rng);

    let span = (ctx.surface_width - 2.0 * cfg.spawn_margin).max(0.0);
    let x = cfg.spawn_margin + rng.r#gen::<f64>() * span;

    let jitter = cfg.speed_jitter_min
        + rng.r#gen::<f64>() * (cfg.speed_jitter_max - cfg.speed_jitter_min);
    let speed = cfg.base_speed(ctx.level) * jitter;

    SpawnPlan {
        x,
        y: cfg.spawn_y,
        word,
        speed,
    }
}
