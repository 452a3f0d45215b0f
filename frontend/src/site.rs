use std::rc::Rc;

use gloo_events::EventListener;
use web_sys::{Document, Element, HtmlElement, HtmlFormElement};

use crate::auth::login::LoginForm;
use crate::config::SiteConfig;
use crate::error::SiteError;
use crate::interactions::counter::CounterObserver;
use crate::interactions::cta::bind_ctas;
use crate::interactions::modal::Modal;
use crate::interactions::password_toggle::PasswordToggle;
use crate::interactions::smooth_scroll::bind_anchors;
use crate::utils::dom::{select_all, select_one};

/// Every element the page interactions touch, looked up once.
pub struct SiteHandles {
    pub modal: Option<Modal>,
    pub ctas: Vec<HtmlElement>,
    pub login_form: Option<LoginForm>,
    pub password_toggles: Vec<PasswordToggle>,
    pub anchors: Vec<HtmlElement>,
    pub counters: Vec<Element>,
}

impl SiteHandles {
    pub fn resolve(
        document: &Document,
        root: &Element,
        config: &SiteConfig,
    ) -> Result<Self, SiteError> {
        let selectors = &config.selectors;
        let modal = Modal::resolve(document, root, config)?;

        // the login form's own submit button may carry a CTA class
        let ctas = select_all::<HtmlElement>(root, &selectors.cta)?
            .into_iter()
            .filter(|cta| !modal.as_ref().is_some_and(|m| m.contains(cta)))
            .collect();

        let login_form = match select_one::<HtmlFormElement>(root, &selectors.login_form)? {
            Some(form) => Some(LoginForm::resolve(document, form, config)?),
            None => None,
        };

        let mut password_toggles = Vec::new();
        for control in select_all::<Element>(root, &selectors.password_toggle)? {
            match PasswordToggle::resolve(document, control, &selectors.form_group)? {
                Some(toggle) => password_toggles.push(toggle),
                None => log::debug!("Password toggle without an input, skipping"),
            }
        }

        Ok(Self {
            modal,
            ctas,
            login_form,
            password_toggles,
            anchors: select_all::<HtmlElement>(root, &selectors.anchor)?,
            counters: select_all::<Element>(root, &selectors.counter)?,
        })
    }
}

/// Owns every listener and observer installed by [`init`]. Dropping it
/// detaches all of them.
pub struct SiteBindings {
    listeners: Vec<EventListener>,
    counters: Option<CounterObserver>,
}

impl SiteBindings {
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn observes_counters(&self) -> bool {
        self.counters.is_some()
    }

    pub fn dispose(self) {
        drop(self);
    }
}

pub fn wire(
    document: &Document,
    handles: SiteHandles,
    config: &SiteConfig,
) -> Result<SiteBindings, SiteError> {
    let mut listeners = Vec::new();

    match &handles.modal {
        Some(modal) => listeners.extend(modal.bind()),
        None => log::debug!("No login modal on this page"),
    }
    listeners.extend(bind_ctas(
        &handles.ctas,
        handles.modal.as_ref(),
        &config.application_url,
    ));

    match handles.login_form {
        Some(form) => listeners.push(Rc::new(form).bind(config)),
        None => log::debug!("No login form on this page"),
    }

    listeners.extend(handles.password_toggles.iter().map(PasswordToggle::bind));
    listeners.extend(bind_anchors(document, &handles.anchors, config.header_offset));

    let counters = if handles.counters.is_empty() {
        None
    } else {
        Some(CounterObserver::observe(
            &handles.counters,
            config.counter_threshold,
            config.counter_duration_ms,
        )?)
    };

    log::debug!(
        "Wired {} listeners, {} counters",
        listeners.len(),
        handles.counters.len()
    );
    Ok(SiteBindings {
        listeners,
        counters,
    })
}

/// Wires every interaction found under `root`.
pub fn init_within(
    document: &Document,
    root: &Element,
    config: &SiteConfig,
) -> Result<SiteBindings, SiteError> {
    let handles = SiteHandles::resolve(document, root, config)?;
    wire(document, handles, config)
}

/// Wires every interaction on the whole page.
pub fn init(document: &Document, config: &SiteConfig) -> Result<SiteBindings, SiteError> {
    let root = document.document_element().ok_or(SiteError::NoDocument)?;
    init_within(document, &root, config)
}
