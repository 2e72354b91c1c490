//! Effect renderers: read-only over the pools. Opacity (or size) follows each
//! particle's remaining life fraction.

use super::{EffectKind, Effects, Particle};
use crate::surface::Surface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    /// Weather, drawn behind the runner.
    Background,
    /// Everything the skills and impacts produce.
    Foreground,
}

impl Layer {
    fn contains(self, kind: EffectKind) -> bool {
        match self {
            Layer::Background => kind.is_background(),
            Layer::Foreground => !kind.is_background(),
        }
    }
}

/// Draw every pool of `layer` in declaration order.
pub fn draw_layer(effects: &Effects, s: &mut dyn Surface, layer: Layer) {
    for kind in EffectKind::ALL {
        if layer.contains(kind) {
            draw_kind(effects, s, kind);
        }
    }
}

pub fn draw_kind(effects: &Effects, s: &mut dyn Surface, kind: EffectKind) {
    let pool = effects.pool(kind);
    if pool.is_empty() {
        return;
    }
    s.save();
    for p in pool {
        match kind {
            EffectKind::Fog => draw_fog(s, p),
            EffectKind::Headlight => draw_headlight(s, p),
            EffectKind::Rain => draw_rain(s, p),
            EffectKind::Snow => draw_dot(s, p, 0.9),
            EffectKind::Wind => draw_wind(s, p),
            EffectKind::Rock => draw_rock(s, p),
            EffectKind::Trail => draw_trail(s, p),
            EffectKind::Smoke => draw_dot(s, p, 0.45),
            EffectKind::Ember => draw_ember(s, p),
            EffectKind::Dust => draw_dot(s, p, 0.35),
            EffectKind::Debris => draw_chunk(s, p),
            EffectKind::Shard => draw_shard(s, p),
            EffectKind::Shockwave => draw_ring(s, p),
            EffectKind::Spark => draw_dot(s, p, 1.0),
            EffectKind::Popup => draw_popup(s, p),
        }
    }
    s.restore();
}

fn draw_dot(s: &mut dyn Surface, p: &Particle, max_alpha: f64) {
    s.set_alpha(p.fraction() * max_alpha);
    s.set_fill(p.color);
    s.fill_circle(p.x, p.y, p.size);
}

fn draw_ember(s: &mut dyn Surface, p: &Particle) {
    let f = p.fraction();
    s.set_alpha(f);
    s.glow(p.x, p.y, p.size * (0.5 + f), p.color, "rgba(255,80,0,0)");
}

fn draw_trail(s: &mut dyn Surface, p: &Particle) {
    s.set_alpha(p.fraction() * 0.8);
    s.glow(p.x, p.y, p.size, p.color, "rgba(255,60,0,0)");
}

fn draw_chunk(s: &mut dyn Surface, p: &Particle) {
    s.set_alpha(p.fraction());
    s.set_fill(p.color);
    s.save();
    s.transform(p.x, p.y, p.rotation);
    s.fill_rect(-p.size / 2.0, -p.size / 2.0, p.size, p.size);
    s.restore();
}

fn draw_shard(s: &mut dyn Surface, p: &Particle) {
    s.set_alpha(p.fraction());
    s.set_fill(p.color);
    s.save();
    s.transform(p.x, p.y, p.rotation);
    let r = p.size;
    s.fill_polygon(&[(0.0, -r), (r * 0.6, r * 0.5), (-r * 0.5, r * 0.3)]);
    s.restore();
}

fn draw_ring(s: &mut dyn Surface, p: &Particle) {
    let f = p.fraction();
    s.set_alpha(f);
    s.set_stroke(p.color, 1.0 + 4.0 * f);
    s.stroke_circle(p.x, p.y, p.size);
}

fn draw_popup(s: &mut dyn Surface, p: &Particle) {
    let Some(label) = p.label.as_deref() else {
        return;
    };
    s.set_alpha(p.fraction());
    s.set_fill(p.color);
    s.text(label, p.x, p.y, p.size);
}

fn draw_rain(s: &mut dyn Surface, p: &Particle) {
    s.set_alpha(0.6 * p.fraction());
    s.set_stroke(p.color, p.size);
    s.line(p.x, p.y, p.x + p.vx * 1.5, p.y + p.vy * 1.5);
}

fn draw_wind(s: &mut dyn Surface, p: &Particle) {
    s.set_alpha(0.35 * p.fraction());
    s.set_stroke(p.color, 1.5);
    // size is the streak length
    s.line(p.x, p.y, p.x + p.size, p.y);
}

fn draw_rock(s: &mut dyn Surface, p: &Particle) {
    s.set_alpha(p.fraction());
    s.set_fill(p.color);
    s.save();
    s.transform(p.x, p.y, p.rotation);
    let r = p.size;
    s.fill_polygon(&[
        (-r, -r * 0.3),
        (-r * 0.3, -r),
        (r * 0.8, -r * 0.6),
        (r, r * 0.4),
        (0.0, r),
        (-r * 0.8, r * 0.6),
    ]);
    s.restore();
}

fn draw_fog(s: &mut dyn Surface, p: &Particle) {
    // rotation drives a slow breathing pulse
    let pulse = 0.18 + 0.07 * p.rotation.sin();
    s.set_alpha(pulse * p.fraction());
    s.glow(p.x, p.y, p.size, p.color, "rgba(208,216,208,0)");
}

fn draw_headlight(s: &mut dyn Surface, p: &Particle) {
    s.set_alpha(0.9);
    s.glow(p.x, p.y, p.size, p.color, "rgba(255,246,200,0)");
    s.set_fill("#ffffff");
    s.fill_circle(p.x, p.y, 4.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, RecordingSurface};

    #[test]
    fn spark_alpha_follows_life_fraction() {
        let mut fx = Effects::new(1);
        fx.push(
            EffectKind::Spark,
            Particle::new(1.0, 2.0, 0.0, 0.0, 2.0, "#fff").with_life(2.0),
        );
        fx.pool_mut(EffectKind::Spark)[0].life = 0.5;
        let mut s = RecordingSurface::new(100.0, 100.0);
        draw_kind(&fx, &mut s, EffectKind::Spark);
        assert_eq!(s.alphas(), vec![0.25]);
        assert_eq!(s.count(|op| matches!(op, DrawOp::Circle { filled: true, .. })), 1);
    }

    #[test]
    fn empty_pools_draw_nothing() {
        let fx = Effects::new(1);
        let mut s = RecordingSurface::new(100.0, 100.0);
        draw_layer(&fx, &mut s, Layer::Background);
        draw_layer(&fx, &mut s, Layer::Foreground);
        assert!(s.ops.is_empty());
    }

    #[test]
    fn popup_without_label_is_skipped() {
        let mut fx = Effects::new(1);
        fx.push(EffectKind::Popup, Particle::new(0.0, 0.0, 0.0, 0.0, 18.0, "#fff"));
        let mut s = RecordingSurface::new(100.0, 100.0);
        draw_kind(&fx, &mut s, EffectKind::Popup);
        assert_eq!(s.count(|op| matches!(op, DrawOp::Text { .. })), 0);
    }
}
