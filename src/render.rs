//! Frame renderer. Layers, back to front: sky and ground, weather effects,
//! obstacles, the runner, active skills, impact effects, then the status
//! overlay. Nothing here mutates the game.

use crate::effects::Layer;
use crate::effects::renderers::draw_layer;
use crate::game::GameState;
use crate::surface::Surface;
use crate::theme::Palette;
use crate::world::{GameStatus, Obstacle, ObstacleKind, PLAYER_HEIGHT, World};

const SHAKE_PX: f64 = 6.0;

pub fn render(game: &GameState, s: &mut dyn Surface, now: f64) {
    let world = &game.world;
    let palette = world.theme.palette();

    draw_backdrop(s, world, &palette);

    s.save();
    let (dx, dy) = shake_offset(world, now);
    s.transform(dx, dy, 0.0);
    draw_layer(&world.effects, s, Layer::Background);
    for o in world.obstacles.iter().filter(|o| o.alive) {
        draw_obstacle(s, o, &palette);
    }
    draw_runner(s, world);
    game.skills.draw_all(world, s);
    draw_layer(&world.effects, s, Layer::Foreground);
    s.restore();

    draw_overlay(s, world);
}

/// Deterministic jitter from the clock so rendering stays read-only.
fn shake_offset(world: &World, now: f64) -> (f64, f64) {
    if now >= world.shake_until {
        return (0.0, 0.0);
    }
    let k = ((world.shake_until - now) / 400.0).min(1.0);
    (
        (now * 0.09).sin() * SHAKE_PX * k,
        (now * 0.13).cos() * SHAKE_PX * k,
    )
}

fn draw_backdrop(s: &mut dyn Surface, world: &World, palette: &Palette) {
    let (w, h) = (s.width(), s.height());
    let ground = world.ground_y();
    s.set_fill(palette.sky_top);
    s.fill_rect(0.0, 0.0, w, ground);
    s.save();
    s.set_alpha(0.6);
    s.glow(w * 0.5, ground, w * 0.6, palette.sky_bottom, "rgba(0,0,0,0)");
    s.restore();
    s.set_fill(palette.ground);
    s.fill_rect(0.0, ground, w, h - ground);
    s.set_stroke(palette.ground_line, 2.0);
    s.line(0.0, ground, w, ground);
}

fn draw_obstacle(s: &mut dyn Surface, o: &Obstacle, palette: &Palette) {
    let r = o.rect;
    s.set_fill(palette.obstacle);
    s.fill_rect(r.x, r.y, r.w, r.h);
    s.set_stroke(palette.ground_line, 1.5);
    s.stroke_rect(r.x, r.y, r.w, r.h);
    match o.kind {
        ObstacleKind::Crate => {
            s.line(r.x, r.y, r.right(), r.bottom());
            s.line(r.right(), r.y, r.x, r.bottom());
        }
        ObstacleKind::Barrier => {
            // hazard stripes
            s.set_stroke("#f2c230", 3.0);
            let mut y = r.y + 8.0;
            while y < r.bottom() {
                s.line(r.x, y + 6.0, r.right(), y);
                y += 14.0;
            }
        }
        ObstacleKind::VaultDoor => {
            let (cx, cy) = r.center();
            s.set_stroke("#c0c6cf", 3.0);
            s.stroke_circle(cx, cy, r.w * 0.3);
            s.line(cx - r.w * 0.2, cy, cx + r.w * 0.2, cy);
        }
    }
}

fn draw_runner(s: &mut dyn Surface, world: &World) {
    let p = &world.player;
    let persona = world.persona.persona();
    let (x, feet) = (p.x, p.y);
    let hip = feet - PLAYER_HEIGHT * 0.45;
    let neck = feet - PLAYER_HEIGHT * 0.8;
    let head_r = PLAYER_HEIGHT * 0.1;

    s.set_stroke(persona.body, 3.0);
    s.set_fill(persona.body);
    s.fill_circle(x, neck - head_r, head_r);
    s.line(x, neck, x, hip);

    if p.hanging {
        // arms straight up to the rope, legs together
        s.line(x, neck, x - 3.0, feet - PLAYER_HEIGHT);
        s.line(x, neck, x + 3.0, feet - PLAYER_HEIGHT);
        s.line(x, hip, x - 4.0, feet);
        s.line(x, hip, x + 4.0, feet);
    } else {
        let swing = if p.on_ground { p.stride.sin() } else { 0.6 };
        let leg = PLAYER_HEIGHT * 0.45;
        s.line(x, hip, x + swing * leg * 0.5, feet);
        s.line(x, hip, x - swing * leg * 0.5, feet);
        let arm = PLAYER_HEIGHT * 0.3;
        s.line(x, neck + 4.0, x - swing * arm * 0.6, neck + arm);
        s.line(x, neck + 4.0, x + swing * arm * 0.6, neck + arm);
    }

    s.set_fill(persona.accent);
    s.fill_rect(x - 5.0, neck - head_r * 2.0 - 2.0, 10.0, 3.0);
}

fn draw_overlay(s: &mut dyn Surface, world: &World) {
    let (title, hint) = match world.status {
        GameStatus::Running => return,
        GameStatus::Paused => ("PAUSED", "press P to resume"),
        GameStatus::Over => ("HEIST FOILED", "press R to run again"),
    };
    let (w, h) = (s.width(), s.height());
    s.save();
    s.set_alpha(0.45);
    s.set_fill("#000000");
    s.fill_rect(0.0, 0.0, w, h);
    s.set_alpha(1.0);
    s.set_fill("#ffd166");
    s.text(title, w / 2.0, h / 2.0 - 10.0, 36.0);
    s.set_fill("#e0e0e0");
    s.text(hint, w / 2.0, h / 2.0 + 24.0, 16.0);
    s.restore();
}
