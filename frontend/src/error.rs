use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("JavaScript error: {0}")]
    Js(String),
    #[error("Invalid site configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("No global window available")]
    NoWindow,
    #[error("Window has no document")]
    NoDocument,
}

impl From<JsValue> for SiteError {
    fn from(value: JsValue) -> Self {
        SiteError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}
