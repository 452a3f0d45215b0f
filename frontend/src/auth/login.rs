use std::cell::Cell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use web_sys::{Document, Element, HtmlButtonElement, HtmlFormElement, HtmlInputElement};

use crate::auth::form_errors::{clear_error, show_error};
use crate::auth::validation::{validate_fields, FieldKind, FormReport};
use crate::config::SiteConfig;
use crate::error::SiteError;
use crate::utils::dom::{navigate, select_all, select_one};

pub const BUSY_LABEL: &str = r#"<i class="fas fa-spinner fa-spin"></i> Logging in..."#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
}

impl SubmitState {
    /// Next state after a submit attempt. Once submitting, further attempts
    /// are ignored until the page navigates away.
    pub fn after_submit(self, form_valid: bool) -> SubmitState {
        match self {
            SubmitState::Submitting => SubmitState::Submitting,
            SubmitState::Idle if form_valid => SubmitState::Submitting,
            SubmitState::Idle => SubmitState::Idle,
        }
    }
}

/// A required input together with the group its error line lives in. The
/// kind is captured once so that revealing a password does not turn it into
/// a plain text field for validation.
pub struct RequiredField {
    pub input: HtmlInputElement,
    pub group: Element,
    pub kind: FieldKind,
}

pub struct LoginForm {
    document: Document,
    form: HtmlFormElement,
    fields: Vec<RequiredField>,
    submit: Option<HtmlButtonElement>,
    state: Cell<SubmitState>,
}

impl LoginForm {
    pub fn resolve(
        document: &Document,
        form: HtmlFormElement,
        config: &SiteConfig,
    ) -> Result<Self, SiteError> {
        let mut fields = Vec::new();
        for input in select_all::<HtmlInputElement>(&form, "input[required]")? {
            let group = match input.closest(&config.selectors.form_group)? {
                Some(group) => group,
                None => match input.parent_element() {
                    Some(parent) => parent,
                    None => {
                        log::debug!("Required input {} has no container, skipping", input.name());
                        continue;
                    }
                },
            };
            let kind = FieldKind::from_input_type(&input.type_());
            fields.push(RequiredField { input, group, kind });
        }
        let submit = select_one::<HtmlButtonElement>(&form, &config.selectors.submit)?;
        Ok(Self {
            document: document.clone(),
            form,
            fields,
            submit,
            state: Cell::new(SubmitState::Idle),
        })
    }

    pub fn fields(&self) -> &[RequiredField] {
        &self.fields
    }

    pub fn state(&self) -> SubmitState {
        self.state.get()
    }

    /// Checks every required field and renders or clears its inline error.
    pub fn validate(&self, config: &SiteConfig) -> FormReport {
        let report = validate_fields(
            self.fields.iter().map(|field| (field.kind, field.input.value())),
            config.min_password_length,
        );
        for (field, outcome) in self.fields.iter().zip(&report.outcomes) {
            let rendered = match outcome {
                Err(e) => show_error(
                    &self.document,
                    &field.input,
                    &field.group,
                    &e.to_string(),
                    config.error_fade_ms,
                ),
                Ok(()) => clear_error(&field.input, &field.group, config.error_fade_ms),
            };
            if let Err(e) = rendered {
                log::warn!("Failed to update error for {}: {}", field.input.name(), e);
            }
        }
        report
    }

    /// Handles one submit. On a valid form the submit control goes busy and
    /// the browser is sent to the application page after the login delay.
    pub fn submit(&self, config: &SiteConfig) -> SubmitState {
        if self.state.get() == SubmitState::Submitting {
            return SubmitState::Submitting;
        }
        let report = self.validate(config);
        let next = self.state.get().after_submit(report.is_valid());
        self.state.set(next);
        if next == SubmitState::Submitting {
            self.show_busy();
            let url = config.application_url.clone();
            log::info!("Login accepted, redirecting to {} in {}ms", url, config.login_delay_ms);
            Timeout::new(config.login_delay_ms, move || navigate(&url)).forget();
        }
        next
    }

    fn show_busy(&self) {
        if let Some(button) = &self.submit {
            button.set_disabled(true);
            button.set_inner_html(BUSY_LABEL);
        }
    }

    pub fn bind(self: Rc<Self>, config: &SiteConfig) -> EventListener {
        let config = config.clone();
        let form = self.form.clone();
        EventListener::new_with_options(
            &form,
            "submit",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                self.submit(&config);
            },
        )
    }
}
