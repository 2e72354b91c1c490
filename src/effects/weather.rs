//! Theme-gated environmental effects.
//!
//! Each weather kind the current theme allows gets one Bernoulli trial per
//! running frame while its bucket is idle. A hit emits an onset burst and arms
//! a deadline `now + duration_ms`; while armed the bucket keeps trickling new
//! particles, and the first frame at or past the deadline clears the pool.
//! Kinds the theme does not allow are cleared and disarmed immediately.

use log::{debug, info};

use super::emitters::random_range;
use super::{EffectKind, Effects, FrameCtx, Particle};
use crate::theme::Weather;

pub fn update_weather(fx: &mut Effects, ctx: &FrameCtx) {
    for weather in Weather::ALL {
        let kind = EffectKind::for_weather(weather);
        let slot = weather.index();

        if !ctx.theme.allows(weather) {
            fx.weather_until[slot] = None;
            fx.pool_mut(kind).clear();
            continue;
        }

        match fx.weather_until[slot] {
            Some(deadline) if ctx.now >= deadline => {
                debug!("{weather:?} bucket expired at {:.0}ms", ctx.now);
                fx.weather_until[slot] = None;
                fx.pool_mut(kind).clear();
            }
            Some(_) => {
                if ctx.playing {
                    fx.trickle(weather, ctx);
                }
            }
            None => {
                if ctx.playing && fx.rng().f64() < ctx.weather.chance_per_frame {
                    fx.start_weather(weather, ctx);
                }
            }
        }
    }
}

impl Effects {
    /// Arm a weather bucket now, skipping the random trial. No-op when the
    /// theme does not allow the kind or it is already armed.
    pub fn start_weather(&mut self, weather: Weather, ctx: &FrameCtx) {
        if !ctx.theme.allows(weather) || self.weather_until[weather.index()].is_some() {
            return;
        }
        info!(
            "{weather:?} starts for {:.0}ms ({})",
            ctx.weather.duration_ms,
            ctx.theme.name()
        );
        self.weather_until[weather.index()] = Some(ctx.now + ctx.weather.duration_ms);
        match weather {
            Weather::Rain => self.emit_rain(ctx, 40),
            Weather::Snow => self.emit_snow(ctx, 25),
            Weather::Rockslide => self.emit_rocks(ctx, 6),
            Weather::Fog => self.emit_fog(ctx, 4),
            Weather::Headlights => self.emit_headlights(ctx),
            Weather::Wind => self.emit_wind(ctx, 8),
        }
    }

    fn trickle(&mut self, weather: Weather, ctx: &FrameCtx) {
        match weather {
            Weather::Rain => self.emit_rain(ctx, 3),
            Weather::Snow => {
                if self.rng().f64() < 0.6 {
                    self.emit_snow(ctx, 1);
                }
            }
            Weather::Rockslide => {
                if self.rng().f64() < 0.03 {
                    self.emit_rocks(ctx, 1);
                }
            }
            Weather::Fog => {
                if self.rng().f64() < 0.01 {
                    self.emit_fog(ctx, 1);
                }
            }
            Weather::Headlights => {
                if self.rng().f64() < 0.005 {
                    self.emit_headlights(ctx);
                }
            }
            Weather::Wind => {
                if self.rng().f64() < 0.15 {
                    self.emit_wind(ctx, 1);
                }
            }
        }
    }

    pub fn emit_rain(&mut self, ctx: &FrameCtx, count: usize) {
        for _ in 0..count {
            let rng = self.rng();
            let x = random_range(rng, 0.0, ctx.width + 100.0);
            let y = random_range(rng, -ctx.ground_y, 0.0);
            let vy = random_range(rng, 9.0, 13.0);
            self.push(EffectKind::Rain, Particle::new(x, y, -1.5, vy, 1.0, "#9ec9ff"));
        }
    }

    pub fn emit_snow(&mut self, ctx: &FrameCtx, count: usize) {
        for _ in 0..count {
            let rng = self.rng();
            let x = random_range(rng, 0.0, ctx.width);
            let vx = random_range(rng, -0.6, -0.2);
            let vy = random_range(rng, 0.8, 1.8);
            let size = random_range(rng, 1.5, 3.5);
            let phase = random_range(rng, 0.0, std::f64::consts::TAU);
            let sway = random_range(rng, 0.03, 0.08);
            self.push(
                EffectKind::Snow,
                Particle::new(x, -10.0, vx, vy, size, "#ffffff").with_spin(phase, sway),
            );
        }
    }

    pub fn emit_rocks(&mut self, ctx: &FrameCtx, count: usize) {
        for _ in 0..count {
            let rng = self.rng();
            let x = random_range(rng, ctx.width * 0.4, ctx.width + 40.0);
            let vx = random_range(rng, -4.0, -1.5);
            let vy = random_range(rng, 0.0, 2.0);
            let size = random_range(rng, 6.0, 14.0);
            let spin = random_range(rng, -0.15, 0.15);
            self.push(
                EffectKind::Rock,
                Particle::new(x, -30.0, vx, vy, size, "#6b4f3a").with_spin(0.0, spin),
            );
        }
    }

    pub fn emit_fog(&mut self, ctx: &FrameCtx, count: usize) {
        for _ in 0..count {
            let rng = self.rng();
            let size = random_range(rng, 80.0, 160.0);
            let x = random_range(rng, ctx.width * 0.5, ctx.width + size);
            let y = random_range(rng, ctx.ground_y - 140.0, ctx.ground_y - 40.0);
            let vx = random_range(rng, -1.2, -0.5);
            self.push(EffectKind::Fog, Particle::new(x, y, vx, 0.0, size, "#d0d8d0"));
        }
    }

    /// Oncoming car: two lamps side by side.
    pub fn emit_headlights(&mut self, ctx: &FrameCtx) {
        let y = ctx.ground_y - 18.0;
        for dx in [0.0, 34.0] {
            self.push(
                EffectKind::Headlight,
                Particle::new(ctx.width + 40.0 + dx, y, -9.0, 0.0, 26.0, "#fff6c8"),
            );
        }
    }

    pub fn emit_wind(&mut self, ctx: &FrameCtx, count: usize) {
        for _ in 0..count {
            let rng = self.rng();
            let y = random_range(rng, 40.0, ctx.ground_y - 20.0);
            let vx = random_range(rng, -12.0, -8.0);
            let len = random_range(rng, 30.0, 70.0);
            self.push(
                EffectKind::Wind,
                Particle::new(ctx.width + 20.0, y, vx, 0.0, len, "#ffffff"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeatherTuning;
    use crate::theme::Theme;

    fn ctx(theme: Theme, now: f64, chance: f64) -> FrameCtx {
        FrameCtx {
            now,
            theme,
            playing: true,
            width: 960.0,
            height: 420.0,
            ground_y: 340.0,
            weather: WeatherTuning {
                chance_per_frame: chance,
                duration_ms: 1_000.0,
            },
            step: 1.0,
        }
    }

    #[test]
    fn certain_trigger_arms_allowed_kinds_only() {
        let mut fx = Effects::new(3);
        update_weather(&mut fx, &ctx(Theme::Tundra, 0.0, 1.0));
        assert_eq!(fx.weather_deadline(Weather::Snow), Some(1_000.0));
        assert_eq!(fx.weather_deadline(Weather::Wind), Some(1_000.0));
        assert_eq!(fx.weather_deadline(Weather::Rain), None);
        assert!(fx.len(EffectKind::Snow) >= 25);
        assert_eq!(fx.len(EffectKind::Rain), 0);
    }

    #[test]
    fn zero_chance_never_triggers() {
        let mut fx = Effects::new(3);
        for f in 0..2_000 {
            update_weather(&mut fx, &ctx(Theme::Rainforest, f as f64 * 16.0, 0.0));
        }
        assert!(fx.is_empty());
    }

    #[test]
    fn paused_game_does_not_roll() {
        let mut fx = Effects::new(3);
        let mut c = ctx(Theme::Midnight, 0.0, 1.0);
        c.playing = false;
        update_weather(&mut fx, &c);
        assert_eq!(fx.weather_deadline(Weather::Headlights), None);
    }

    #[test]
    fn deadline_clears_bucket() {
        let mut fx = Effects::new(3);
        fx.start_weather(Weather::Rain, &ctx(Theme::Rainforest, 0.0, 0.0));
        assert!(fx.len(EffectKind::Rain) > 0);
        update_weather(&mut fx, &ctx(Theme::Rainforest, 999.0, 0.0));
        assert!(fx.len(EffectKind::Rain) > 0);
        update_weather(&mut fx, &ctx(Theme::Rainforest, 1_000.0, 0.0));
        assert_eq!(fx.len(EffectKind::Rain), 0);
        assert_eq!(fx.weather_deadline(Weather::Rain), None);
    }

    #[test]
    fn theme_switch_drops_foreign_weather() {
        let mut fx = Effects::new(3);
        fx.start_weather(Weather::Fog, &ctx(Theme::Bayou, 0.0, 0.0));
        assert!(fx.len(EffectKind::Fog) > 0);
        update_weather(&mut fx, &ctx(Theme::Dunes, 16.0, 0.0));
        assert_eq!(fx.len(EffectKind::Fog), 0);
        assert_eq!(fx.weather_deadline(Weather::Fog), None);
    }

    #[test]
    fn start_weather_ignores_disallowed() {
        let mut fx = Effects::new(3);
        fx.start_weather(Weather::Snow, &ctx(Theme::Inferno, 0.0, 0.0));
        assert!(fx.is_empty());
    }
}
