use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

use crate::error::SiteError;
use crate::utils::dom::{request_frame, set_style};

pub const INPUT_ERROR_CLASS: &str = "error";
pub const MESSAGE_CLASS: &str = "error-message";
/// A message line that is fading out. It no longer belongs to its field, so a
/// new error shown during the fade gets a fresh line.
pub const LEAVING_CLASS: &str = "error-message-leaving";

fn current_line(group: &Element) -> Result<Option<HtmlElement>, SiteError> {
    Ok(group
        .query_selector(&format!(".{}", MESSAGE_CLASS))?
        .and_then(|line| line.dyn_into::<HtmlElement>().ok()))
}

fn create_line(document: &Document, group: &Element, fade_ms: u32) -> Result<HtmlElement, SiteError> {
    let line = document
        .create_element("div")?
        .dyn_into::<HtmlElement>()
        .map_err(|_| SiteError::Js("created div is not an HtmlElement".to_string()))?;
    line.set_class_name(MESSAGE_CLASS);
    set_style(&line, "color", "red");
    set_style(&line, "font-size", "0.875rem");
    set_style(&line, "margin-top", "0.25rem");
    set_style(&line, "transition", &format!("all {}ms ease", fade_ms));
    set_style(&line, "transform", "translateY(-10px)");
    set_style(&line, "opacity", "0");
    group.append_child(&line)?;
    Ok(line)
}

/// Marks `input` as failing and shows `message` under its form group,
/// reusing the group's message line when one is already visible.
pub fn show_error(
    document: &Document,
    input: &HtmlInputElement,
    group: &Element,
    message: &str,
    fade_ms: u32,
) -> Result<(), SiteError> {
    let line = match current_line(group)? {
        Some(line) => line,
        None => create_line(document, group, fade_ms)?,
    };
    input.class_list().add_1(INPUT_ERROR_CLASS)?;
    line.set_text_content(Some(message));
    set_style(&line, "opacity", "0");

    // slide in on the next frame so the transition has a starting point
    request_frame(move |_| {
        set_style(&line, "opacity", "1");
        set_style(&line, "transform", "translateY(0)");
    })?;
    Ok(())
}

/// Removes the failing mark from `input` and fades its message line out,
/// dropping the line from the document once the fade has finished.
pub fn clear_error(input: &HtmlInputElement, group: &Element, fade_ms: u32) -> Result<(), SiteError> {
    input.class_list().remove_1(INPUT_ERROR_CLASS)?;
    let Some(line) = current_line(group)? else {
        return Ok(());
    };
    line.class_list().replace(MESSAGE_CLASS, LEAVING_CLASS)?;
    set_style(&line, "opacity", "0");
    set_style(&line, "transform", "translateY(-10px)");
    Timeout::new(fade_ms, move || line.remove()).forget();
    Ok(())
}
