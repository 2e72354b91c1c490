// Browser-side tests: `wasm-pack test --headless --firefox`.
// Native builds skip this file entirely.
#![cfg(target_arch = "wasm32")]

use fire_heist::config::GameConfig;
use fire_heist::game::GameState;
use fire_heist::settings::Settings;
use fire_heist::skills::SkillKind;
use fire_heist::surface::{CanvasSurface, Surface};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

wasm_bindgen_test_configure!(run_in_browser);

fn canvas_context() -> CanvasRenderingContext2d {
    let doc = web_sys::window().unwrap().document().unwrap();
    let canvas: HtmlCanvasElement = doc.create_element("canvas").unwrap().dyn_into().unwrap();
    canvas.set_width(960);
    canvas.set_height(420);
    canvas.get_context("2d").unwrap().unwrap().dyn_into().unwrap()
}

#[wasm_bindgen_test]
fn canvas_frame_leaves_context_state_balanced() {
    let ctx = canvas_context();
    let mut surface = CanvasSurface::new(ctx.clone(), 960.0, 420.0);
    let mut game = GameState::new(GameConfig::default(), Settings::default(), Default::default(), 11);
    game.activate(SkillKind::FireAxe, 0.0);
    for i in 1..=30 {
        let now = i as f64 * 16.0;
        game.frame(now);
        game.render(&mut surface, now);
    }
    assert_eq!(surface.width(), 960.0);
    assert_eq!(ctx.global_alpha(), 1.0);
}

#[wasm_bindgen_test]
fn start_game_mounts_canvas_and_hud() {
    fire_heist::start_game().unwrap();
    let doc = web_sys::window().unwrap().document().unwrap();
    let canvas = doc.get_element_by_id("fh-canvas").expect("canvas mounted");
    assert!(doc.get_element_by_id("fh-hud").is_some());
    assert!(!fire_heist::activate_skill("moonwalk"));

    // a second start reuses the installed logger and the mounted elements
    fire_heist::start_game().unwrap();
    assert_eq!(doc.get_element_by_id("fh-canvas"), Some(canvas));
}
