//! Astro Typer core crate.
//!
//! Words fall on asteroids; type one to destroy it before it reaches the
//! bottom. The game model (`game::session` and friends) is plain Rust and runs
//! natively under `cargo test`; `game` also hosts the browser driver that the
//! `#[wasm_bindgen]` exports below delegate to. Menu and game-over screens are
//! left to the host page, which listens for `astro-typer:phase` events.

use wasm_bindgen::prelude::*;

mod error;
pub mod game;
mod logging;
mod tuning;

pub use error::GameError;
pub use game::asteroid::{Asteroid, AsteroidId};
pub use game::session::{GameEvent, GamePhase, MENU_KEY, Session, Summary};
pub use game::typing::KeyOutcome;
pub use game::words::{WORDS_BY_LEVEL, WordBank, WordMode, tokenize};
pub use tuning::GameConfig;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    logging::init(level);
}

// -----------------------------------------------------------------------------
// Host API
// -----------------------------------------------------------------------------

/// Start a fresh run (menu "start" button).
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    Ok(game::start()?)
}

/// Game-over "play again".
#[wasm_bindgen]
pub fn restart() -> Result<(), JsValue> {
    Ok(game::start()?)
}

#[wasm_bindgen]
pub fn return_to_menu() -> Result<(), JsValue> {
    Ok(game::return_to_menu()?)
}

/// Tokenize `text` into the custom word list and switch to custom mode.
/// Returns the number of words loaded; text without usable words is rejected.
#[wasm_bindgen]
pub fn load_custom_text(text: &str) -> Result<u32, JsValue> {
    let count = game::load_custom_text(text)?;
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

/// `"default"` or `"custom"`.
#[wasm_bindgen]
pub fn set_word_mode(mode: &str) -> Result<(), JsValue> {
    let mode = WordMode::parse(mode)
        .ok_or_else(|| JsValue::from_str(&format!("unknown word mode '{mode}'")))?;
    Ok(game::set_word_mode(mode)?)
}

#[wasm_bindgen]
pub fn word_mode() -> Result<String, JsValue> {
    Ok(game::word_mode()?.as_str().to_string())
}

#[wasm_bindgen]
pub fn set_muted(muted: bool) -> Result<(), JsValue> {
    Ok(game::set_muted(muted)?)
}

/// Flip the mute flag and return the new value.
#[wasm_bindgen]
pub fn toggle_mute() -> Result<bool, JsValue> {
    let muted = !game::is_muted()?;
    game::set_muted(muted)?;
    Ok(muted)
}

#[wasm_bindgen]
pub fn is_muted() -> Result<bool, JsValue> {
    Ok(game::is_muted()?)
}

/// `"menu"`, `"playing"` or `"gameOver"`.
#[wasm_bindgen]
pub fn phase() -> Result<String, JsValue> {
    Ok(game::phase()?.as_str().to_string())
}

#[wasm_bindgen]
pub fn final_score() -> Result<f64, JsValue> {
    Ok(game::summary()?.score as f64)
}

#[wasm_bindgen]
pub fn final_level() -> Result<u32, JsValue> {
    Ok(game::summary()?.level)
}

/// Override tuning from JSON; missing fields keep their defaults. Applies
/// from the next run.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    game::configure(GameConfig::from_json(json)?);
    Ok(())
}
