use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors surfaced at the edges of the engine.
///
/// The per-frame core never fails; these only come out of parsing host input
/// and talking to the browser.
#[derive(Debug, Error)]
pub enum GardenError {
    #[error("invalid tree list: {0}")]
    InvalidTrees(#[from] serde_json::Error),

    #[error("could not parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(&'static str),

    #[error("browser call failed: {0}")]
    Js(String),
}

impl From<JsValue> for GardenError {
    fn from(value: JsValue) -> Self {
        GardenError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<GardenError> for JsValue {
    fn from(err: GardenError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
