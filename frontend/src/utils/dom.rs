use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, NodeList, Window};

use crate::error::SiteError;

pub fn window() -> Result<Window, SiteError> {
    web_sys::window().ok_or(SiteError::NoWindow)
}

pub fn document() -> Result<Document, SiteError> {
    window()?.document().ok_or(SiteError::NoDocument)
}

fn collect<T: JsCast>(nodes: NodeList) -> Vec<T> {
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

/// Every element under `root` matching `selector` that is a `T`.
pub fn select_all<T: JsCast>(root: &Element, selector: &str) -> Result<Vec<T>, SiteError> {
    Ok(collect(root.query_selector_all(selector)?))
}

pub fn select_one<T: JsCast>(root: &Element, selector: &str) -> Result<Option<T>, SiteError> {
    Ok(root
        .query_selector(selector)?
        .and_then(|element| element.dyn_into::<T>().ok()))
}

pub fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = element.style().set_property(property, value) {
        log::warn!("Failed to set {} to {}: {:?}", property, value, e);
    }
}

/// Runs `callback` once on the next animation frame.
pub fn request_frame(callback: impl FnOnce(f64) + 'static) -> Result<i32, SiteError> {
    let callback = Closure::once_into_js(callback);
    Ok(window()?.request_animation_frame(callback.unchecked_ref())?)
}

pub fn navigate(href: &str) {
    let result = window().and_then(|w| w.location().set_href(href).map_err(SiteError::from));
    if let Err(e) = result {
        log::warn!("Failed to navigate to {}: {}", href, e);
    }
}
