//! Per-kind physics rules. A rule steps one particle by one frame and returns
//! whether it survives; [`update_pool`] applies it with `retain_mut`, so the
//! step and the removal happen in the same pass.

use super::{EffectKind, Effects, FrameCtx, Particle};

/// Steps a particle one frame; `false` means remove it.
pub type Rule = fn(&mut Particle, &FrameCtx) -> bool;

pub const SPARK_GRAVITY: f64 = 0.25;
pub const DEBRIS_GRAVITY: f64 = 0.4;
pub const SHARD_GRAVITY: f64 = 0.5;
pub const ROCK_GRAVITY: f64 = 0.35;

pub fn rule_for(kind: EffectKind) -> Rule {
    match kind {
        EffectKind::Fog => step_fog,
        EffectKind::Headlight => step_headlight,
        EffectKind::Rain => step_rain,
        EffectKind::Snow => step_snow,
        EffectKind::Wind => step_wind,
        EffectKind::Rock => step_rock,
        EffectKind::Trail => step_trail,
        EffectKind::Smoke => step_smoke,
        EffectKind::Ember => step_ember,
        EffectKind::Dust => step_dust,
        EffectKind::Debris => step_debris,
        EffectKind::Shard => step_shard,
        EffectKind::Shockwave => step_shockwave,
        EffectKind::Spark => step_spark,
        EffectKind::Popup => step_popup,
    }
}

/// Step every particle in `pool`, dropping the expired ones. Returns the number removed.
pub fn update_pool(pool: &mut Vec<Particle>, rule: Rule, ctx: &FrameCtx) -> usize {
    let before = pool.len();
    pool.retain_mut(|p| rule(p, ctx));
    before - pool.len()
}

pub fn update_pools(effects: &mut Effects, ctx: &FrameCtx) {
    for kind in EffectKind::ALL {
        update_pool(effects.pool_mut(kind), rule_for(kind), ctx);
    }
}

fn step_spark(p: &mut Particle, ctx: &FrameCtx) -> bool {
    let f = ctx.step;
    p.integrate(f);
    p.vy += SPARK_GRAVITY * f;
    p.vx *= 0.98_f64.powf(f);
    p.decay(0.04 * f)
}

fn step_ember(p: &mut Particle, ctx: &FrameCtx) -> bool {
    let f = ctx.step;
    p.integrate(f);
    p.vy -= 0.03 * f;
    p.vx *= 0.99_f64.powf(f);
    p.decay(0.015 * f)
}

fn step_smoke(p: &mut Particle, ctx: &FrameCtx) -> bool {
    let f = ctx.step;
    p.integrate(f);
    let drag = 0.97_f64.powf(f);
    p.vx *= drag;
    p.vy *= drag;
    p.size += 0.35 * f;
    p.decay(0.02 * f)
}

fn step_dust(p: &mut Particle, ctx: &FrameCtx) -> bool {
    let f = ctx.step;
    p.integrate(f);
    p.vx *= 0.92_f64.powf(f);
    p.size += 0.2 * f;
    p.decay(0.025 * f)
}

fn step_debris(p: &mut Particle, ctx: &FrameCtx) -> bool {
    let f = ctx.step;
    p.integrate(f);
    p.vy += DEBRIS_GRAVITY * f;
    p.rotation += p.spin * f;
    if p.y > ctx.ground_y {
        p.y = ctx.ground_y;
        p.vy *= -0.35;
        p.vx *= 0.7;
    }
    p.decay(0.018 * f)
}

fn step_shard(p: &mut Particle, ctx: &FrameCtx) -> bool {
    let f = ctx.step;
    p.integrate(f);
    p.vy += SHARD_GRAVITY * f;
    p.rotation += p.spin * f;
    p.decay(0.03 * f) && p.y < ctx.height + 20.0
}

fn step_shockwave(p: &mut Particle, ctx: &FrameCtx) -> bool {
    // vx holds the ring's expansion rate
    p.size += p.vx * ctx.step;
    p.decay(0.05 * ctx.step)
}

fn step_trail(p: &mut Particle, ctx: &FrameCtx) -> bool {
    p.size *= 0.92_f64.powf(ctx.step);
    p.decay(0.08 * ctx.step)
}

fn step_popup(p: &mut Particle, ctx: &FrameCtx) -> bool {
    p.integrate(ctx.step);
    p.decay(0.02 * ctx.step)
}

fn step_rain(p: &mut Particle, ctx: &FrameCtx) -> bool {
    p.integrate(ctx.step);
    p.decay(0.002 * ctx.step) && p.y < ctx.ground_y
}

fn step_snow(p: &mut Particle, ctx: &FrameCtx) -> bool {
    let f = ctx.step;
    // rotation doubles as the sway phase
    p.rotation += p.spin * f;
    p.x += (p.vx + p.rotation.sin() * 0.6) * f;
    p.y += p.vy * f;
    p.decay(0.002 * f) && p.y < ctx.ground_y + 10.0
}

fn step_rock(p: &mut Particle, ctx: &FrameCtx) -> bool {
    let f = ctx.step;
    p.integrate(f);
    p.vy += ROCK_GRAVITY * f;
    p.rotation += p.spin * f;
    if p.y + p.size > ctx.ground_y {
        p.y = ctx.ground_y - p.size;
        p.vy *= -0.4;
    }
    p.decay(0.004 * f) && p.x + p.size > 0.0
}

fn step_fog(p: &mut Particle, ctx: &FrameCtx) -> bool {
    p.x += p.vx * ctx.step;
    p.rotation += 0.01 * ctx.step;
    p.decay(0.002 * ctx.step) && p.x + p.size > 0.0
}

fn step_headlight(p: &mut Particle, ctx: &FrameCtx) -> bool {
    p.x += p.vx * ctx.step;
    p.life > 0.0 && p.x + p.size > -50.0
}

fn step_wind(p: &mut Particle, ctx: &FrameCtx) -> bool {
    p.integrate(ctx.step);
    p.decay(0.03 * ctx.step) && p.x + p.size > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeatherTuning;
    use crate::theme::Theme;

    fn ctx() -> FrameCtx {
        FrameCtx {
            now: 0.0,
            theme: Theme::Inferno,
            playing: true,
            width: 960.0,
            height: 420.0,
            ground_y: 340.0,
            weather: WeatherTuning::default(),
            step: 1.0,
        }
    }

    #[test]
    fn spark_falls_and_fades() {
        let mut p = Particle::new(0.0, 0.0, 1.0, 0.0, 2.0, "#fff");
        assert!(step_spark(&mut p, &ctx()));
        assert_eq!(p.x, 1.0);
        assert_eq!(p.vy, SPARK_GRAVITY);
        assert!((p.life - 0.96).abs() < 1e-12);
    }

    #[test]
    fn removal_keeps_survivors_in_order() {
        let c = ctx();
        let mut pool: Vec<Particle> = (0..6)
            .map(|i| {
                // odd particles are one step from death
                let life = if i % 2 == 1 { 0.01 } else { 1.0 };
                Particle::new(i as f64, 0.0, 0.0, 0.0, 1.0, "#fff").with_life(life)
            })
            .collect();
        let removed = update_pool(&mut pool, rule_for(EffectKind::Spark), &c);
        assert_eq!(removed, 3);
        let xs: Vec<f64> = pool.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn double_rate_frames_age_particles_half_as_much() {
        let mut half = ctx();
        half.step = 0.5;
        let mut a = Particle::new(0.0, 0.0, 2.0, 0.0, 2.0, "#fff");
        let mut b = a.clone();
        step_ember(&mut a, &ctx());
        step_ember(&mut b, &half);
        step_ember(&mut b, &half);
        assert!((a.life - b.life).abs() < 1e-12);
        assert!((a.x - b.x).abs() < 0.02);
    }

    #[test]
    fn rain_stops_at_ground() {
        let c = ctx();
        let mut p = Particle::new(0.0, c.ground_y - 5.0, 0.0, 10.0, 1.0, "#9ab");
        assert!(!step_rain(&mut p, &c));
    }

    #[test]
    fn debris_bounces_instead_of_sinking() {
        let c = ctx();
        let mut p = Particle::new(0.0, c.ground_y - 1.0, 0.0, 6.0, 3.0, "#000");
        step_debris(&mut p, &c);
        assert_eq!(p.y, c.ground_y);
        assert!(p.vy < 0.0);
    }

    #[test]
    fn shockwave_grows() {
        let mut p = Particle::new(0.0, 0.0, 5.0, 0.0, 8.0, "#fff");
        step_shockwave(&mut p, &ctx());
        assert_eq!(p.size, 13.0);
    }
}
