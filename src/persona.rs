// Playable characters: colours for the stick figure and the flame palette used
// by the skill effects.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaId {
    #[default]
    Blaze,
    Cinder,
    Frost,
    Volt,
}

pub struct Persona {
    pub id: PersonaId,
    pub name: &'static str,
    pub body: &'static str,
    pub accent: &'static str,
    /// Hot-to-cool colours for sparks and embers.
    pub flames: &'static [&'static str],
}

pub const PERSONAS: &[Persona] = &[
    Persona {
        id: PersonaId::Blaze,
        name: "Blaze",
        body: "#f4f1ea",
        accent: "#ff5a1f",
        flames: &["#fff3b0", "#ffc145", "#ff7b2e", "#e63b14"],
    },
    Persona {
        id: PersonaId::Cinder,
        name: "Cinder",
        body: "#d8d2c8",
        accent: "#b23a48",
        flames: &["#ffd6a5", "#ff9f68", "#d1495b", "#6d2e46"],
    },
    Persona {
        id: PersonaId::Frost,
        name: "Frost",
        body: "#e8f6ff",
        accent: "#4cc9f0",
        flames: &["#ffffff", "#bde0fe", "#4cc9f0", "#4361ee"],
    },
    Persona {
        id: PersonaId::Volt,
        name: "Volt",
        body: "#fdfdfd",
        accent: "#c8f902",
        flames: &["#fbffd1", "#e9ff70", "#c8f902", "#5f8d0b"],
    },
];

/// Fallback palette when a caller has none.
pub const DEFAULT_FLAMES: &[&str] = &["#fff3b0", "#ffc145", "#ff7b2e", "#e63b14"];

impl PersonaId {
    pub fn persona(self) -> &'static Persona {
        PERSONAS
            .iter()
            .find(|p| p.id == self)
            .unwrap_or(&PERSONAS[0])
    }
}
