//! Player settings and lifetime stats, each stored as one flat JSON blob under
//! a fixed key. No versioning: a blob that fails to parse is replaced by the
//! defaults.

use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{FireHeistError, Result};
use crate::persona::PersonaId;
use crate::progression::SkillUses;
use crate::theme::Theme;

pub const SETTINGS_KEY: &str = "fireHeist.settings";
pub const STATS_KEY: &str = "fireHeist.stats";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub persona: PersonaId,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub best_distance: f64,
    pub runs: u32,
    pub skill_uses: SkillUses,
}

impl Stats {
    /// Fold a finished run in. Returns true on a new best distance.
    pub fn record_run(&mut self, distance: f64, skill_uses: &SkillUses) -> bool {
        self.runs = self.runs.saturating_add(1);
        self.skill_uses = skill_uses.clone();
        if distance > self.best_distance {
            self.best_distance = distance;
            true
        } else {
            false
        }
    }
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// `window.localStorage`.
pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    pub fn open() -> Result<Self> {
        let win = web_sys::window().ok_or(FireHeistError::NoWindow)?;
        let storage = win
            .local_storage()?
            .ok_or_else(|| FireHeistError::Storage("localStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| FireHeistError::Storage(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| FireHeistError::Storage(format!("{e:?}")))
    }
}

/// Read and parse `key`. Missing keys, store errors and bad JSON all yield the
/// default value; the latter two are logged.
pub fn load_or_default<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            warn!("reading {key}: {e}; using defaults");
            return T::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!("{key} is not valid: {e}; using defaults");
        T::default()
    })
}

pub fn save<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}
