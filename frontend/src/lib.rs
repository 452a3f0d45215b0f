use std::cell::RefCell;

use gloo_events::EventListener;
use wasm_bindgen::prelude::*;
use web_sys::Document;

pub mod config;
pub mod error;
pub mod site;
pub mod auth {
    pub mod form_errors;
    pub mod login;
    pub mod validation;
}
pub mod interactions {
    pub mod counter;
    pub mod cta;
    pub mod modal;
    pub mod password_toggle;
    pub mod smooth_scroll;
}
pub mod utils {
    pub mod dom;
}

pub use config::SiteConfig;
pub use error::SiteError;
pub use site::{init, init_within, SiteBindings, SiteHandles};

thread_local! {
    // live for the whole page
    static BINDINGS: RefCell<Option<SiteBindings>> = const { RefCell::new(None) };
}

/// Document state while the parser is still running.
const READY_STATE_LOADING: &str = "loading";

fn boot(document: &Document) {
    let config = SiteConfig::from_document(document).unwrap_or_else(|e| {
        log::warn!("{}, using defaults", e);
        SiteConfig::default()
    });
    match init(document, &config) {
        Ok(bindings) => BINDINGS.with(|slot| *slot.borrow_mut() = Some(bindings)),
        Err(e) => log::error!("Failed to wire site interactions: {}", e),
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    wasm_logger::init(wasm_logger::Config::default());

    let document = match utils::dom::document() {
        Ok(document) => document,
        Err(e) => {
            log::error!("Cannot start site interactions: {}", e);
            return;
        }
    };
    if document.ready_state() == READY_STATE_LOADING {
        let target = document.clone();
        EventListener::once(&target, "DOMContentLoaded", move |_| boot(&document)).forget();
    } else {
        boot(&document);
    }
}
