use serde::Deserialize;
use web_sys::Document;

use crate::error::SiteError;

/// Id of the optional inline JSON block that overrides the defaults.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Login-gated application page. CTAs pointing here open the login modal
    /// instead, and a successful login redirects here.
    pub application_url: String,
    pub header_offset: f64,
    pub login_delay_ms: u32,
    pub counter_duration_ms: f64,
    pub counter_threshold: f64,
    pub error_fade_ms: u32,
    pub min_password_length: usize,
    pub selectors: Selectors,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Selectors {
    pub modal_overlay: String,
    pub modal_close: String,
    pub cta: String,
    pub login_form: String,
    pub form_group: String,
    pub submit: String,
    pub password_toggle: String,
    pub anchor: String,
    pub counter: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            application_url: "loan-application.html".to_string(),
            header_offset: 80.0,
            login_delay_ms: 1_500,
            counter_duration_ms: 2_000.0,
            counter_threshold: 0.1,
            error_fade_ms: 300,
            min_password_length: 8,
            selectors: Selectors::default(),
        }
    }
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            modal_overlay: ".modal-overlay".to_string(),
            modal_close: ".modal-close".to_string(),
            cta: ".hero-cta, .nav-cta, .btn-primary".to_string(),
            login_form: "#loginForm".to_string(),
            form_group: ".form-group".to_string(),
            submit: "button[type=\"submit\"]".to_string(),
            password_toggle: ".password-toggle".to_string(),
            anchor: "a[href^=\"#\"]".to_string(),
            counter: ".stat-card .text-4xl".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, SiteError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads overrides from `<script type="application/json" id="site-config">`.
    /// A page without that block gets the defaults.
    pub fn from_document(document: &Document) -> Result<Self, SiteError> {
        match document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|element| element.text_content())
        {
            Some(raw) if !raw.trim().is_empty() => Self::from_json(&raw),
            _ => Ok(Self::default()),
        }
    }
}
