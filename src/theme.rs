//! Visual environments. A theme picks the backdrop palette and decides which
//! weather effects are allowed to spawn.

use serde::{Deserialize, Serialize};

/// Theme-gated environmental effect kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    Rain,
    Snow,
    Rockslide,
    Fog,
    Headlights,
    Wind,
}

impl Weather {
    pub const ALL: [Weather; 6] = [
        Weather::Rain,
        Weather::Snow,
        Weather::Rockslide,
        Weather::Fog,
        Weather::Headlights,
        Weather::Wind,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Inferno,
    Rainforest,
    Tundra,
    Canyon,
    Bayou,
    Midnight,
    Dunes,
}

pub struct Palette {
    pub sky_top: &'static str,
    pub sky_bottom: &'static str,
    pub ground: &'static str,
    pub ground_line: &'static str,
    pub obstacle: &'static str,
}

impl Theme {
    pub const ALL: [Theme; 7] = [
        Theme::Inferno,
        Theme::Rainforest,
        Theme::Tundra,
        Theme::Canyon,
        Theme::Bayou,
        Theme::Midnight,
        Theme::Dunes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Inferno => "inferno",
            Theme::Rainforest => "rainforest",
            Theme::Tundra => "tundra",
            Theme::Canyon => "canyon",
            Theme::Bayou => "bayou",
            Theme::Midnight => "midnight",
            Theme::Dunes => "dunes",
        }
    }

    /// Weather kinds this theme may spawn. Inferno has none.
    pub fn weather(self) -> &'static [Weather] {
        match self {
            Theme::Inferno => &[],
            Theme::Rainforest => &[Weather::Rain, Weather::Fog],
            Theme::Tundra => &[Weather::Snow, Weather::Wind],
            Theme::Canyon => &[Weather::Rockslide, Weather::Wind],
            Theme::Bayou => &[Weather::Fog, Weather::Rain],
            Theme::Midnight => &[Weather::Headlights],
            Theme::Dunes => &[Weather::Wind],
        }
    }

    pub fn allows(self, weather: Weather) -> bool {
        self.weather().contains(&weather)
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Inferno => Palette {
                sky_top: "#1a0505",
                sky_bottom: "#5c1a0b",
                ground: "#2b1208",
                ground_line: "#ff7b2e",
                obstacle: "#7a3b1e",
            },
            Theme::Rainforest => Palette {
                sky_top: "#0d1f17",
                sky_bottom: "#2f5a3c",
                ground: "#1d2b14",
                ground_line: "#7fbf5f",
                obstacle: "#4e3b24",
            },
            Theme::Tundra => Palette {
                sky_top: "#9fb7cf",
                sky_bottom: "#e4eef7",
                ground: "#d7e3ec",
                ground_line: "#ffffff",
                obstacle: "#5e6f82",
            },
            Theme::Canyon => Palette {
                sky_top: "#e08a4d",
                sky_bottom: "#f5c98b",
                ground: "#8a4a2a",
                ground_line: "#c76b3a",
                obstacle: "#5c2f1b",
            },
            Theme::Bayou => Palette {
                sky_top: "#1c2624",
                sky_bottom: "#4a5b4c",
                ground: "#28301f",
                ground_line: "#6d7f55",
                obstacle: "#3d3323",
            },
            Theme::Midnight => Palette {
                sky_top: "#05060f",
                sky_bottom: "#1b1e3a",
                ground: "#121212",
                ground_line: "#f7d94c",
                obstacle: "#393e5c",
            },
            Theme::Dunes => Palette {
                sky_top: "#f3b562",
                sky_bottom: "#fde3a7",
                ground: "#d9a35f",
                ground_line: "#f7cf8b",
                obstacle: "#8c5a2b",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_the_settings_json() {
        for t in Theme::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.name()));
        }
    }

    #[test]
    fn inferno_has_no_weather() {
        for w in Weather::ALL {
            assert!(!Theme::Inferno.allows(w));
        }
        assert!(Theme::Midnight.allows(Weather::Headlights));
        assert!(!Theme::Midnight.allows(Weather::Snow));
    }
}
