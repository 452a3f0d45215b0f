use gloo_events::{EventListener, EventListenerOptions};
use web_sys::{Document, HtmlElement, ScrollBehavior, ScrollToOptions};

use crate::error::SiteError;
use crate::utils::dom::window;

/// Element id targeted by an in-page link, `None` for the bare `#`.
pub fn fragment_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Document offset that leaves the target's top `header_offset` below the
/// viewport top, given its current viewport-relative top.
pub fn scroll_offset(rect_top: f64, page_y_offset: f64, header_offset: f64) -> f64 {
    rect_top + page_y_offset - header_offset
}

fn scroll_to_fragment(document: &Document, id: &str, header_offset: f64) -> Result<(), SiteError> {
    let Some(target) = document.get_element_by_id(id) else {
        log::debug!("No element with id {}, ignoring anchor", id);
        return Ok(());
    };
    let window = window()?;
    let top = scroll_offset(
        target.get_bounding_client_rect().top(),
        window.page_y_offset()?,
        header_offset,
    );
    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
    Ok(())
}

pub fn bind_anchors(
    document: &Document,
    anchors: &[HtmlElement],
    header_offset: f64,
) -> Vec<EventListener> {
    anchors
        .iter()
        .map(|anchor| {
            let element = anchor.clone();
            let document = document.clone();
            EventListener::new_with_options(
                anchor,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    event.prevent_default();
                    let Some(href) = element.get_attribute("href") else {
                        return;
                    };
                    if let Some(id) = fragment_id(&href) {
                        if let Err(e) = scroll_to_fragment(&document, id, header_offset) {
                            log::warn!("Failed to scroll to #{}: {}", id, e);
                        }
                    }
                },
            )
        })
        .collect()
}
