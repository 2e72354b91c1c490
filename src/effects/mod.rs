//! Particle effects: one pool of particles per effect kind plus the weather
//! deadlines and multi-stage effects that feed them.
//!
//! A frame runs in a fixed order: pending stages fire ([`phases`]), weather
//! buckets trigger or expire ([`weather`]), then every pool is stepped with its
//! kind's rule ([`updaters`]). [`renderers`] reads the pools afterwards and never
//! mutates them.
//!
//! Removal happens inside the same pass that steps a particle (`retain_mut`), so
//! an expired particle is never read again and never removed twice.

use fastrand::Rng;

use crate::config::WeatherTuning;
use crate::theme::{Theme, Weather};

pub mod emitters;
pub mod phases;
pub mod renderers;
pub mod updaters;
pub mod weather;

pub use phases::{PhaseTrack, SHATTER_STAGES_MS};
pub use renderers::Layer;

/// Every particle kind. Declaration order is the draw order: background
/// weather first, impact sparks and popups last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Fog,
    Headlight,
    Rain,
    Snow,
    Wind,
    Rock,
    Trail,
    Smoke,
    Ember,
    Dust,
    Debris,
    Shard,
    Shockwave,
    Spark,
    Popup,
}

impl EffectKind {
    pub const COUNT: usize = 15;

    pub const ALL: [EffectKind; EffectKind::COUNT] = [
        EffectKind::Fog,
        EffectKind::Headlight,
        EffectKind::Rain,
        EffectKind::Snow,
        EffectKind::Wind,
        EffectKind::Rock,
        EffectKind::Trail,
        EffectKind::Smoke,
        EffectKind::Ember,
        EffectKind::Dust,
        EffectKind::Debris,
        EffectKind::Shard,
        EffectKind::Shockwave,
        EffectKind::Spark,
        EffectKind::Popup,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Environmental kinds sit behind the runner and obstacles.
    pub fn is_background(self) -> bool {
        matches!(
            self,
            EffectKind::Fog
                | EffectKind::Headlight
                | EffectKind::Rain
                | EffectKind::Snow
                | EffectKind::Wind
                | EffectKind::Rock
        )
    }

    pub fn for_weather(weather: Weather) -> EffectKind {
        match weather {
            Weather::Rain => EffectKind::Rain,
            Weather::Snow => EffectKind::Snow,
            Weather::Rockslide => EffectKind::Rock,
            Weather::Fog => EffectKind::Fog,
            Weather::Headlights => EffectKind::Headlight,
            Weather::Wind => EffectKind::Wind,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Counts down to zero; never negative.
    pub life: f64,
    pub max_life: f64,
    pub size: f64,
    pub rotation: f64,
    pub spin: f64,
    pub color: &'static str,
    pub label: Option<String>,
}

impl Particle {
    pub fn new(x: f64, y: f64, vx: f64, vy: f64, size: f64, color: &'static str) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            life: 1.0,
            max_life: 1.0,
            size,
            rotation: 0.0,
            spin: 0.0,
            color,
            label: None,
        }
    }

    pub fn with_life(mut self, life: f64) -> Self {
        self.life = life;
        self.max_life = life;
        self
    }

    pub fn with_spin(mut self, rotation: f64, spin: f64) -> Self {
        self.rotation = rotation;
        self.spin = spin;
        self
    }

    /// Remaining life as a 0..=1 fraction, used for fade / shrink.
    pub fn fraction(&self) -> f64 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }

    /// Subtract `rate` from life, clamping at zero. Returns true while alive.
    pub fn decay(&mut self, rate: f64) -> bool {
        self.life = (self.life - rate).max(0.0);
        self.life > 0.0
    }

    /// Move by velocity over `step` 60 Hz frames.
    pub fn integrate(&mut self, step: f64) {
        self.x += self.vx * step;
        self.y += self.vy * step;
    }
}

/// Inputs an effects frame needs from the surrounding game.
#[derive(Clone, Copy, Debug)]
pub struct FrameCtx {
    pub now: f64,
    pub theme: Theme,
    /// Gameplay running (not paused, not over). Weather only triggers while true.
    pub playing: bool,
    pub width: f64,
    pub height: f64,
    pub ground_y: f64,
    pub weather: WeatherTuning,
    /// Frame length as a multiple of a 60 Hz frame; particle rules scale by it.
    pub step: f64,
}

/// A three-stage obstacle shatter driven by a [`PhaseTrack`].
#[derive(Clone, Debug)]
pub struct Shatter {
    pub x: f64,
    pub y: f64,
    pub color: &'static str,
    pub track: PhaseTrack,
}

pub struct Effects {
    pools: [Vec<Particle>; EffectKind::COUNT],
    /// Deadline per weather kind; `None` while the bucket is idle.
    weather_until: [Option<f64>; 6],
    shatters: Vec<Shatter>,
    rng: Rng,
}

impl Effects {
    pub fn new(seed: u64) -> Self {
        Self {
            pools: std::array::from_fn(|_| Vec::new()),
            weather_until: [None; 6],
            shatters: Vec::new(),
            rng: Rng::with_seed(seed),
        }
    }

    pub fn pool(&self, kind: EffectKind) -> &[Particle] {
        &self.pools[kind.index()]
    }

    pub fn pool_mut(&mut self, kind: EffectKind) -> &mut Vec<Particle> {
        &mut self.pools[kind.index()]
    }

    pub fn len(&self, kind: EffectKind) -> usize {
        self.pools[kind.index()].len()
    }

    pub fn total(&self) -> usize {
        self.pools.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn weather_deadline(&self, weather: Weather) -> Option<f64> {
        self.weather_until[weather.index()]
    }

    pub fn shatters(&self) -> &[Shatter] {
        &self.shatters
    }

    /// Kill every pending multi-stage effect. Later stages will not fire.
    pub fn cancel_pending(&mut self) {
        for s in &mut self.shatters {
            s.track.cancel();
        }
    }

    /// Advance all effects by one frame.
    pub fn update(&mut self, ctx: &FrameCtx) {
        self.fire_pending_stages(ctx.now);
        weather::update_weather(self, ctx);
        updaters::update_pools(self, ctx);
    }

    pub(crate) fn push(&mut self, kind: EffectKind, p: Particle) {
        self.pools[kind.index()].push(p);
    }

    pub(crate) fn rng(&mut self) -> &mut Rng {
        &mut self.rng
    }

    fn fire_pending_stages(&mut self, now: f64) {
        let mut shatters = std::mem::take(&mut self.shatters);
        for s in &mut shatters {
            while let Some(stage) = s.track.poll(now) {
                self.apply_shatter_stage(s.x, s.y, s.color, stage);
            }
        }
        shatters.retain(|s| !s.track.is_finished());
        self.shatters = shatters;
    }
}
