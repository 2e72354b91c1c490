//! Effect emitters. Each one appends freshly built particles to its kind's
//! pool; counts and speeds that depend on a skill level scale linearly with it.
//! Directions and jitter come from the effects RNG, so a fixed seed replays
//! the same bursts.

use std::f64::consts::{PI, TAU};

use fastrand::Rng;

use super::{EffectKind, Effects, Particle, PhaseTrack, SHATTER_STAGES_MS, Shatter};
use crate::persona::DEFAULT_FLAMES;

pub type Flames = &'static [&'static str];

pub const POUND_BASE_COUNT: usize = 20;
pub const POUND_BASE_SPEED: f64 = 4.0;
pub const SPARK_DEFAULT_COUNT: usize = 14;
pub const SHARD_COUNT: usize = 12;

/// Particle count and launch speed of a level-scaled burst.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Burst {
    pub count: usize,
    pub speed: f64,
}

/// Ground pound scaling: +10 particles and +1 speed per level above 1.
pub fn pound_burst(level: u8) -> Burst {
    let step = level.max(1) as usize - 1;
    Burst {
        count: POUND_BASE_COUNT + 10 * step,
        speed: POUND_BASE_SPEED + step as f64,
    }
}

#[inline]
pub(crate) fn random_range(rng: &mut Rng, min: f64, max: f64) -> f64 {
    let range = max - min;
    if range < f64::EPSILON {
        return min;
    }
    min + rng.f64() * range
}

#[inline]
fn pick(rng: &mut Rng, palette: Flames) -> &'static str {
    match palette.len() {
        0 => DEFAULT_FLAMES[0],
        n => palette[rng.usize(..n)],
    }
}

impl Effects {
    pub fn emit_sparks(&mut self, x: f64, y: f64, count: Option<usize>, palette: Option<Flames>) {
        let palette = palette.unwrap_or(DEFAULT_FLAMES);
        for _ in 0..count.unwrap_or(SPARK_DEFAULT_COUNT) {
            let rng = self.rng();
            let angle = rng.f64() * TAU;
            let speed = random_range(rng, 2.0, 6.0);
            let size = random_range(rng, 1.5, 3.5);
            let color = pick(rng, palette);
            self.push(
                EffectKind::Spark,
                Particle::new(x, y, angle.cos() * speed, angle.sin() * speed, size, color),
            );
        }
    }

    pub fn emit_embers(&mut self, x: f64, y: f64, level: u8, palette: Option<Flames>) {
        let palette = palette.unwrap_or(DEFAULT_FLAMES);
        let count = 6 + 3 * (level.max(1) as usize - 1);
        for _ in 0..count {
            let rng = self.rng();
            let vx = random_range(rng, -1.0, 1.0);
            let vy = random_range(rng, -2.5, -0.5);
            let size = random_range(rng, 2.0, 4.0);
            let color = pick(rng, palette);
            self.push(EffectKind::Ember, Particle::new(x, y, vx, vy, size, color));
        }
    }

    pub fn emit_smoke(&mut self, x: f64, y: f64, count: usize) {
        for _ in 0..count {
            let rng = self.rng();
            let vx = random_range(rng, -0.6, 0.6);
            let vy = random_range(rng, -1.2, -0.3);
            let size = random_range(rng, 6.0, 12.0);
            self.push(EffectKind::Smoke, Particle::new(x, y, vx, vy, size, "#5a5a5a"));
        }
    }

    pub fn emit_debris(&mut self, x: f64, y: f64, color: &'static str, count: usize) {
        for _ in 0..count {
            let rng = self.rng();
            // upper half-plane: screen y grows downward
            let angle = -PI * rng.f64();
            let speed = random_range(rng, 3.0, 8.0);
            let size = random_range(rng, 3.0, 7.0);
            let spin = random_range(rng, -0.3, 0.3);
            self.push(
                EffectKind::Debris,
                Particle::new(x, y, angle.cos() * speed, angle.sin() * speed, size, color)
                    .with_spin(0.0, spin),
            );
        }
    }

    /// Ground-pound impact: a level-scaled debris fan, one shockwave ring and a
    /// dust skirt. Every debris particle leaves at exactly the burst speed.
    pub fn emit_ground_pound(&mut self, x: f64, y: f64, level: u8, palette: Option<Flames>) -> Burst {
        let palette = palette.unwrap_or(DEFAULT_FLAMES);
        let burst = pound_burst(level);
        for _ in 0..burst.count {
            let rng = self.rng();
            let angle = -PI * rng.f64();
            let size = random_range(rng, 2.5, 5.5);
            let spin = random_range(rng, -0.25, 0.25);
            let color = pick(rng, palette);
            self.push(
                EffectKind::Debris,
                Particle::new(
                    x,
                    y,
                    angle.cos() * burst.speed,
                    angle.sin() * burst.speed,
                    size,
                    color,
                )
                .with_spin(0.0, spin),
            );
        }
        let expansion = 6.0 + (level.max(1) - 1) as f64;
        self.push(
            EffectKind::Shockwave,
            Particle::new(x, y, expansion, 0.0, 8.0, "#ffd27a"),
        );
        self.emit_dust(x, y, 8);
        burst
    }

    pub fn emit_dust(&mut self, x: f64, y: f64, count: usize) {
        for _ in 0..count {
            let rng = self.rng();
            let vx = random_range(rng, -3.0, 3.0);
            let vy = random_range(rng, -0.8, 0.0);
            let size = random_range(rng, 4.0, 9.0);
            self.push(EffectKind::Dust, Particle::new(x, y, vx, vy, size, "#b59a7a"));
        }
    }

    /// Flame puff left behind a thrown axe.
    pub fn emit_axe_trail(&mut self, x: f64, y: f64, palette: Option<Flames>) {
        let palette = palette.unwrap_or(DEFAULT_FLAMES);
        let rng = self.rng();
        let size = random_range(rng, 6.0, 10.0);
        let jitter = random_range(rng, -3.0, 3.0);
        let color = pick(rng, palette);
        self.push(
            EffectKind::Trail,
            Particle::new(x, y + jitter, 0.0, 0.0, size, color),
        );
    }

    pub fn emit_popup(&mut self, x: f64, y: f64, text: impl Into<String>, color: &'static str) {
        let mut p = Particle::new(x, y, 0.0, -0.8, 18.0, color);
        p.label = Some(text.into());
        self.push(EffectKind::Popup, p);
    }

    /// Queue a three-stage shatter starting at `now`. Stages fire from
    /// [`Effects::update`] while the track is live.
    pub fn emit_shatter(&mut self, x: f64, y: f64, color: &'static str, now: f64) {
        self.shatters.push(Shatter {
            x,
            y,
            color,
            track: PhaseTrack::new(now, SHATTER_STAGES_MS),
        });
    }

    pub(crate) fn apply_shatter_stage(&mut self, x: f64, y: f64, color: &'static str, stage: usize) {
        match stage {
            0 => {
                self.push(
                    EffectKind::Shockwave,
                    Particle::new(x, y, 3.0, 0.0, 4.0, "#ffffff"),
                );
                self.emit_sparks(x, y, Some(6), None);
            }
            1 => {
                for _ in 0..SHARD_COUNT {
                    let rng = self.rng();
                    let angle = rng.f64() * TAU;
                    let speed = random_range(rng, 3.0, 7.0);
                    let size = random_range(rng, 4.0, 8.0);
                    let spin = random_range(rng, -0.4, 0.4);
                    let rot = rng.f64() * TAU;
                    self.push(
                        EffectKind::Shard,
                        Particle::new(x, y, angle.cos() * speed, angle.sin() * speed - 2.0, size, color)
                            .with_spin(rot, spin),
                    );
                }
            }
            2 => self.emit_dust(x, y, 6),
            _ => {}
        }
    }
}
