//! Tunable game constants. Every field has a default so a partial JSON blob
//! (or none at all) is enough to start a session.

use serde::Deserialize;

use crate::error::Result;

/// Per-weather trigger tuning: Bernoulli probability per frame and how long a
/// triggered bucket stays armed.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeatherTuning {
    pub chance_per_frame: f64,
    pub duration_ms: f64,
}

impl Default for WeatherTuning {
    fn default() -> Self {
        Self {
            chance_per_frame: 0.001,
            duration_ms: 6_000.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Y coordinate of the running surface (feet of the stick figure).
    pub ground_y: f64,
    /// Player gravity (px / frame^2 at 60 Hz).
    pub gravity: f64,
    pub jump_velocity: f64,
    pub base_speed: f64,
    pub max_speed: f64,
    /// Speed gained per 1000 px travelled.
    pub speed_ramp: f64,
    pub energy_max: f64,
    pub energy_regen_per_sec: f64,
    /// Horizontal gap range between obstacle spawns, in px.
    pub obstacle_gap: (f64, f64),
    pub weather: WeatherTuning,
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 960,
            canvas_height: 420,
            ground_y: 340.0,
            gravity: 0.6,
            jump_velocity: -12.5,
            base_speed: 6.0,
            max_speed: 14.0,
            speed_ramp: 0.12,
            energy_max: 100.0,
            energy_regen_per_sec: 6.0,
            obstacle_gap: (360.0, 720.0),
            weather: WeatherTuning::default(),
            log_level: "info".to_string(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = GameConfig::from_json(r#"{ "ground_y": 300.0, "weather": { "chance_per_frame": 0.5 } }"#)
            .unwrap();
        assert_eq!(cfg.ground_y, 300.0);
        assert_eq!(cfg.weather.chance_per_frame, 0.5);
        assert_eq!(cfg.weather.duration_ms, WeatherTuning::default().duration_ms);
        assert_eq!(cfg.canvas_width, 960);
    }

    #[test]
    fn bad_log_level_falls_back_to_info() {
        let cfg = GameConfig {
            log_level: "chatty".into(),
            ..GameConfig::default()
        };
        assert_eq!(cfg.level_filter(), log::LevelFilter::Info);
    }
}
