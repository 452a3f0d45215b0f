use gloo_events::{EventListener, EventListenerOptions};
use web_sys::HtmlElement;

use crate::interactions::modal::Modal;
use crate::utils::dom::navigate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CtaAction {
    Navigate(String),
    OpenModal,
}

/// CTAs without a real target, or that would deep-link into the gated
/// application page, are sent to the login modal instead.
pub fn route_cta(href: Option<&str>, application_url: &str) -> CtaAction {
    match href {
        Some(href) if !href.is_empty() && href != "#" && !is_gated(href, application_url) => {
            CtaAction::Navigate(href.to_string())
        }
        _ => CtaAction::OpenModal,
    }
}

fn is_gated(href: &str, application_url: &str) -> bool {
    !application_url.is_empty() && href.contains(application_url)
}

pub fn bind_ctas(
    ctas: &[HtmlElement],
    modal: Option<&Modal>,
    application_url: &str,
) -> Vec<EventListener> {
    ctas.iter()
        .map(|cta| {
            let element = cta.clone();
            let modal = modal.cloned();
            let application_url = application_url.to_string();
            EventListener::new_with_options(
                cta,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    event.prevent_default();
                    let href = element.get_attribute("href");
                    match route_cta(href.as_deref(), &application_url) {
                        CtaAction::Navigate(href) => navigate(&href),
                        CtaAction::OpenModal => match &modal {
                            Some(modal) => {
                                modal.toggle();
                            }
                            None => log::debug!("CTA clicked but the page has no login modal"),
                        },
                    }
                },
            )
        })
        .collect()
}
