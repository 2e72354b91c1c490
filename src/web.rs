//! Browser shell: canvas, keyboard, HUD overlay and the animation-frame loop.
//! The session lives in a thread-local so the exported functions and the
//! callbacks can reach it.

use std::cell::RefCell;
use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent, window};

use crate::config::GameConfig;
use crate::error::{FireHeistError, Result};
use crate::game::GameState;
use crate::logging;
use crate::settings::{self, LocalStore, SETTINGS_KEY, STATS_KEY, Settings, Stats};
use crate::skills::{SkillKind, SkillState};
use crate::surface::CanvasSurface;

const CANVAS_ID: &str = "fh-canvas";
const HUD_ID: &str = "fh-hud";

struct Shell {
    game: GameState,
    surface: CanvasSurface,
    store: Option<LocalStore>,
    stats: Stats,
}

impl Shell {
    fn tick(&mut self, now: f64) {
        self.game.frame(now);
        self.game.render(&mut self.surface, now);
        if let Some(run) = self.game.take_finished_run() {
            if self.stats.record_run(run.distance, &run.skill_uses) {
                info!("new best distance: {:.0}", run.distance);
            }
            if let Some(store) = self.store.as_mut() {
                if let Err(e) = settings::save(store, STATS_KEY, &self.stats) {
                    warn!("could not save stats: {e}");
                }
            }
        }
        update_hud(&self.game, &self.stats, now);
    }
}

thread_local! {
    static SHELL: RefCell<Option<Shell>> = const { RefCell::new(None) };
}

pub(crate) fn performance_now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Run `f` against the live session, if there is one.
pub(crate) fn with_game<R>(f: impl FnOnce(&mut GameState, f64) -> R) -> Option<R> {
    let now = performance_now();
    SHELL.with(|cell| cell.borrow_mut().as_mut().map(|shell| f(&mut shell.game, now)))
}

fn seed() -> u64 {
    #[cfg(feature = "rng")]
    {
        let mut buf = [0u8; 8];
        if getrandom::getrandom(&mut buf).is_ok() {
            return u64::from_le_bytes(buf);
        }
    }
    performance_now().to_bits() ^ 0x5eed_f12e
}

pub fn start(config: GameConfig) -> Result<()> {
    logging::init(config.level_filter());
    let win = window().ok_or(FireHeistError::NoWindow)?;
    let doc = win.document().ok_or(FireHeistError::Dom("document"))?;

    let canvas = ensure_canvas(&doc, &config)?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or(FireHeistError::Dom("2d context"))?
        .dyn_into()
        .map_err(|_| FireHeistError::Dom("2d context"))?;
    let surface = CanvasSurface::new(ctx, canvas.width() as f64, canvas.height() as f64);

    let store = match LocalStore::open() {
        Ok(store) => Some(store),
        Err(e) => {
            warn!("{e}; settings and stats will not persist");
            None
        }
    };
    let (prefs, stats): (Settings, Stats) = match store.as_ref() {
        Some(s) => (
            settings::load_or_default(s, SETTINGS_KEY),
            settings::load_or_default(s, STATS_KEY),
        ),
        None => Default::default(),
    };

    let game = GameState::new(config, prefs, stats.skill_uses.clone(), seed());
    ensure_hud(&doc)?;

    let shell = Shell {
        game,
        surface,
        store,
        stats,
    };
    let was_running = SHELL.with(|cell| cell.replace(Some(shell)).is_some());
    if !was_running {
        install_keys(&doc)?;
        start_loop();
    }
    Ok(())
}

fn ensure_canvas(doc: &Document, config: &GameConfig) -> Result<HtmlCanvasElement> {
    if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        return el.dyn_into().map_err(|_| FireHeistError::Dom("canvas"));
    }
    let canvas: HtmlCanvasElement = doc
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| FireHeistError::Dom("canvas"))?;
    canvas.set_id(CANVAS_ID);
    canvas.set_width(config.canvas_width);
    canvas.set_height(config.canvas_height);
    let body = doc.body().ok_or(FireHeistError::Dom("body"))?;
    body.append_child(&canvas)?;
    Ok(canvas)
}

fn ensure_hud(doc: &Document) -> Result<()> {
    if doc.get_element_by_id(HUD_ID).is_some() {
        return Ok(());
    }
    let body = doc.body().ok_or(FireHeistError::Dom("body"))?;
    let div = doc.create_element("div")?;
    div.set_id(HUD_ID);
    div.set_attribute("style", "position:fixed; top:10px; left:12px; font-family:'Fira Code', monospace; font-size:14px; padding:4px 8px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#ffd166; z-index:40; white-space:pre;").ok();
    body.append_child(&div)?;
    Ok(())
}

fn cooldown_label(state: Option<&SkillState>, now: f64) -> String {
    match state.map(|s| s.cooldown_remaining(now)) {
        Some(ms) if ms > 0.0 => format!("{:.1}s", ms / 1000.0),
        _ => "ready".to_string(),
    }
}

fn hud_text(game: &GameState, stats: &Stats, now: f64) -> String {
    let w = &game.world;
    let mut text = format!(
        "{}  Energy {:>3.0}  Distance {:.0}  Best {:.0}  Smashed {}",
        w.persona.persona().name,
        w.energy,
        w.distance,
        stats.best_distance,
        w.destroyed
    );
    for (key, kind) in [("A", SkillKind::FireAxe), ("S", SkillKind::TarzanSwing), ("D", SkillKind::GroundPound)] {
        text.push_str(&format!(
            "\n[{key}] {} LV{} {}",
            kind.name(),
            w.skill_uses.level(kind),
            cooldown_label(game.skills.state(kind), now)
        ));
    }
    text
}

fn update_hud(game: &GameState, stats: &Stats, now: f64) {
    let Some(el) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(HUD_ID))
    else {
        return;
    };
    el.set_text_content(Some(&hud_text(game, stats, now)));
}

fn install_keys(doc: &Document) -> Result<()> {
    let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
        let key = evt.key();
        with_game(|game, now| match key.as_str() {
            " " | "ArrowUp" | "w" => {
                game.jump();
            }
            "a" => {
                game.activate(SkillKind::FireAxe, now);
            }
            "s" => {
                game.activate(SkillKind::TarzanSwing, now);
            }
            "d" => {
                game.activate(SkillKind::GroundPound, now);
            }
            "p" | "Escape" => game.toggle_pause(),
            "r" => game.restart(),
            _ => {}
        });
        if key == " " || key == "ArrowUp" {
            evt.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn request_frame(cb: &FrameCallback) {
    if let (Some(w), Some(closure)) = (window(), cb.borrow().as_ref()) {
        let _ = w.request_animation_frame(closure.as_ref().unchecked_ref());
    }
}

fn start_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        SHELL.with(|cell| {
            if let Some(shell) = cell.borrow_mut().as_mut() {
                shell.tick(ts);
            }
        });
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::PersonaId;
    use crate::progression::SkillUses;

    #[test]
    fn hud_shows_persona_and_cooldowns() {
        let prefs = Settings {
            persona: PersonaId::Frost,
            ..Settings::default()
        };
        let mut game = GameState::new(GameConfig::default(), prefs, SkillUses::default(), 8);
        game.activate(SkillKind::FireAxe, 0.0);
        let text = hud_text(&game, &Stats::default(), 200.0);
        let mut lines = text.lines();
        assert!(lines.next().is_some_and(|l| l.starts_with("Frost  Energy")));
        assert_eq!(lines.next(), Some("[A] fire-axe LV1 1.0s"));
        assert_eq!(lines.next(), Some("[S] tarzan-swing LV1 ready"));
    }
}
