use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, EventTarget, HtmlElement, Node};

use crate::config::SiteConfig;
use crate::error::SiteError;
use crate::utils::dom::{select_one, set_style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open,
}

impl ModalState {
    pub fn from_display(display: &str) -> Self {
        if display.trim() == "flex" {
            ModalState::Open
        } else {
            ModalState::Closed
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ModalState::Closed => ModalState::Open,
            ModalState::Open => ModalState::Closed,
        }
    }

    pub fn display(self) -> &'static str {
        match self {
            ModalState::Open => "flex",
            ModalState::Closed => "none",
        }
    }

    /// Page scroll is locked exactly while the modal is open.
    pub fn body_overflow(self) -> &'static str {
        match self {
            ModalState::Open => "hidden",
            ModalState::Closed => "auto",
        }
    }
}

/// The login overlay. Its open/closed state lives in the overlay's inline
/// `display` style, nowhere else.
#[derive(Clone)]
pub struct Modal {
    overlay: HtmlElement,
    close: Option<HtmlElement>,
    body: Option<HtmlElement>,
}

impl Modal {
    pub fn resolve(
        document: &Document,
        root: &Element,
        config: &SiteConfig,
    ) -> Result<Option<Self>, SiteError> {
        let Some(overlay) = select_one::<HtmlElement>(root, &config.selectors.modal_overlay)? else {
            return Ok(None);
        };
        let close = select_one::<HtmlElement>(root, &config.selectors.modal_close)?;
        Ok(Some(Self {
            overlay,
            close,
            body: document.body(),
        }))
    }

    pub fn overlay(&self) -> &HtmlElement {
        &self.overlay
    }

    pub fn state(&self) -> ModalState {
        let display = self
            .overlay
            .style()
            .get_property_value("display")
            .unwrap_or_default();
        ModalState::from_display(&display)
    }

    pub fn toggle(&self) -> ModalState {
        let next = self.state().toggled();
        set_style(&self.overlay, "display", next.display());
        if let Some(body) = &self.body {
            set_style(body, "overflow", next.body_overflow());
        }
        next
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.overlay.contains(Some(node))
    }

    /// Closes on clicks that land on the overlay backdrop itself (not inside
    /// the dialog) and on the close control.
    pub fn bind(&self) -> Vec<EventListener> {
        let mut listeners = Vec::new();

        let modal = self.clone();
        let backdrop: EventTarget = self.overlay.clone().unchecked_into();
        listeners.push(EventListener::new(&self.overlay, "click", move |event| {
            if event.target().as_ref() == Some(&backdrop) {
                modal.toggle();
            }
        }));

        match &self.close {
            Some(close) => {
                let modal = self.clone();
                listeners.push(EventListener::new(close, "click", move |_| {
                    modal.toggle();
                }));
            }
            None => log::debug!("Modal has no close control"),
        }
        listeners
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_restores_state() {
        for start in [ModalState::Closed, ModalState::Open] {
            assert_eq!(start.toggled().toggled(), start);
        }
    }

    #[test]
    fn open_locks_scroll() {
        assert_eq!(ModalState::Open.display(), "flex");
        assert_eq!(ModalState::Open.body_overflow(), "hidden");
        assert_eq!(ModalState::Closed.display(), "none");
        assert_eq!(ModalState::Closed.body_overflow(), "auto");
    }

    #[test]
    fn only_flex_counts_as_open() {
        assert_eq!(ModalState::from_display("flex"), ModalState::Open);
        assert_eq!(ModalState::from_display(""), ModalState::Closed);
        assert_eq!(ModalState::from_display("none"), ModalState::Closed);
        assert_eq!(ModalState::from_display("block"), ModalState::Closed);
    }
}
