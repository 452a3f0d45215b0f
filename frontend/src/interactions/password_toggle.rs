use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement};

use crate::error::SiteError;

/// Class set on a toggle control while its input shows plain text.
pub const SHOWN_CLASS: &str = "show-password";
/// Names the id of the input a toggle controls.
pub const TARGET_ATTR: &str = "data-toggle-for";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskMode {
    Hidden,
    Plain,
}

impl MaskMode {
    pub fn from_input_type(input_type: &str) -> Self {
        if input_type.eq_ignore_ascii_case("password") {
            MaskMode::Hidden
        } else {
            MaskMode::Plain
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            MaskMode::Hidden => MaskMode::Plain,
            MaskMode::Plain => MaskMode::Hidden,
        }
    }

    pub fn input_type(self) -> &'static str {
        match self {
            MaskMode::Hidden => "password",
            MaskMode::Plain => "text",
        }
    }
}

#[derive(Clone)]
pub struct PasswordToggle {
    control: Element,
    input: HtmlInputElement,
}

impl PasswordToggle {
    /// Pairs a toggle control with its input: the id named by
    /// `data-toggle-for` first, then the only input in the control's form
    /// group, then the element right before the control.
    pub fn resolve(
        document: &Document,
        control: Element,
        group_selector: &str,
    ) -> Result<Option<Self>, SiteError> {
        let input = match control.get_attribute(TARGET_ATTR) {
            Some(id) => document
                .get_element_by_id(&id)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok()),
            None => None,
        };
        let input = match input {
            Some(input) => Some(input),
            None => Self::sole_input_in_group(&control, group_selector)?,
        };
        let input = input.or_else(|| {
            control
                .previous_element_sibling()
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        });
        Ok(input.map(|input| Self { control, input }))
    }

    fn sole_input_in_group(
        control: &Element,
        group_selector: &str,
    ) -> Result<Option<HtmlInputElement>, SiteError> {
        let Some(group) = control.closest(group_selector)? else {
            return Ok(None);
        };
        let inputs = group.query_selector_all("input")?;
        if inputs.length() != 1 {
            return Ok(None);
        }
        Ok(inputs
            .item(0)
            .and_then(|node| node.dyn_into::<HtmlInputElement>().ok()))
    }

    pub fn input(&self) -> &HtmlInputElement {
        &self.input
    }

    pub fn mode(&self) -> MaskMode {
        MaskMode::from_input_type(&self.input.type_())
    }

    pub fn flip(&self) -> Result<MaskMode, SiteError> {
        let next = self.mode().flipped();
        self.input.set_type(next.input_type());
        self.control
            .class_list()
            .toggle_with_force(SHOWN_CLASS, next == MaskMode::Plain)?;
        Ok(next)
    }

    pub fn bind(&self) -> EventListener {
        let toggle = self.clone();
        EventListener::new(&self.control, "click", move |_| {
            if let Err(e) = toggle.flip() {
                log::warn!("Failed to toggle password visibility: {}", e);
            }
        })
    }
}
