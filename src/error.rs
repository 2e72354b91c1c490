//! Crate error type. Gameplay guards (cooldown, energy, pause) never surface
//! here; only the browser / storage / config edges produce errors.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum FireHeistError {
    #[error("no browser window available")]
    NoWindow,

    #[error("missing DOM object: {0}")]
    Dom(&'static str),

    #[error("javascript error: {0}")]
    Js(String),

    #[error("storage unavailable: {0}")]
    Storage(String),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown skill '{0}'")]
    UnknownSkill(String),
}

pub type Result<T> = std::result::Result<T, FireHeistError>;

impl From<JsValue> for FireHeistError {
    fn from(value: JsValue) -> Self {
        FireHeistError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<FireHeistError> for JsValue {
    fn from(err: FireHeistError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
