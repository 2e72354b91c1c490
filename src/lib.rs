//! Fire Heist core crate.
//!
//! A canvas endless runner: the runner dodges (or smashes) scrolling obstacles
//! with three energy-fuelled skills while a particle system renders impacts and
//! theme weather. The simulation (`game`, `world`, `skills`, `effects`) is plain
//! Rust and runs natively under `cargo test`; `web` is the browser shell.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod effects;
pub mod error;
pub mod game;
pub mod persona;
pub mod progression;
pub mod render;
pub mod settings;
pub mod skills;
pub mod surface;
pub mod theme;
pub mod world;

mod logging;
mod web;

pub use config::GameConfig;
pub use error::{FireHeistError, Result};
pub use game::GameState;
pub use skills::{Activation, SkillKind};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Browser entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> std::result::Result<(), JsValue> {
    web::start(GameConfig::default())?;
    Ok(())
}

/// Start with a JSON config; unspecified fields keep their defaults.
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> std::result::Result<(), JsValue> {
    let config = GameConfig::from_json(json)?;
    web::start(config)?;
    Ok(())
}

/// Returns true when the skill actually fired. Unknown names are logged and
/// return false.
#[wasm_bindgen]
pub fn activate_skill(name: &str) -> bool {
    match web::with_game(|game, now| game.activate_by_name(name, now)) {
        Some(Ok(outcome)) => outcome.is_activated(),
        Some(Err(e)) => {
            log::warn!("{e}");
            false
        }
        None => false,
    }
}

#[wasm_bindgen]
pub fn toggle_pause() {
    web::with_game(|game, _| game.toggle_pause());
}

#[wasm_bindgen]
pub fn restart_game() {
    web::with_game(|game, _| game.restart());
}
