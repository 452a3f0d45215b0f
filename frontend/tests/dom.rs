#![cfg(target_arch = "wasm32")]

use loan_site_frontend::auth::form_errors::{LEAVING_CLASS, MESSAGE_CLASS};
use gloo_timers::future::TimeoutFuture;
use loan_site_frontend::auth::login::{LoginForm, SubmitState, BUSY_LABEL};
use loan_site_frontend::interactions::counter::LocaleFormatter;
use loan_site_frontend::interactions::modal::{Modal, ModalState};
use loan_site_frontend::{init, init_within, SiteConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
    Window,
};

wasm_bindgen_test_configure!(run_in_browser);

const PAGE: &str = r##"
    <nav><button class="nav-cta">Apply now</button></nav>
    <a class="hero-cta" href="#">Get started</a>
    <div class="modal-overlay" style="display: none">
        <div class="modal-content">
            <button class="modal-close">x</button>
            <form id="loginForm">
                <div class="form-group">
                    <input id="email" type="email" name="email" required>
                </div>
                <div class="form-group">
                    <input id="password" type="password" name="password" required>
                    <span class="password-toggle"></span>
                </div>
                <button type="submit" class="btn-primary">Log in</button>
            </form>
        </div>
    </div>
    <div class="stat-card"><span class="text-4xl">1,234</span></div>
"##;

struct Fixture {
    document: Document,
    root: HtmlElement,
}

impl Fixture {
    fn new() -> Self {
        Self::with_html(PAGE)
    }

    fn with_html(html: &str) -> Self {
        let document = web_sys::window().unwrap().document().unwrap();
        let root: HtmlElement = document.create_element("div").unwrap().unchecked_into();
        root.set_inner_html(html);
        document.body().unwrap().append_child(&root).unwrap();
        Self { document, root }
    }

    fn find<T: JsCast>(&self, selector: &str) -> T {
        self.root
            .query_selector(selector)
            .unwrap()
            .unwrap()
            .unchecked_into()
    }

    fn modal(&self) -> Modal {
        Modal::resolve(&self.document, &self.root, &SiteConfig::default())
            .unwrap()
            .unwrap()
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.root.remove();
        if let Some(body) = self.document.body() {
            let _ = body.style().remove_property("overflow");
        }
    }
}

#[wasm_bindgen_test]
fn cta_opens_and_close_control_closes_modal() {
    let fixture = Fixture::new();
    let bindings = init_within(&fixture.document, &fixture.root, &SiteConfig::default()).unwrap();
    let modal = fixture.modal();
    let body = fixture.document.body().unwrap();

    fixture.find::<HtmlElement>(".nav-cta").click();
    assert_eq!(modal.state(), ModalState::Open);
    assert_eq!(body.style().get_property_value("overflow").unwrap(), "hidden");

    fixture.find::<HtmlElement>(".modal-close").click();
    assert_eq!(modal.state(), ModalState::Closed);
    assert_eq!(body.style().get_property_value("overflow").unwrap(), "auto");

    bindings.dispose();
}

#[wasm_bindgen_test]
fn only_backdrop_clicks_close_the_modal() {
    let fixture = Fixture::new();
    let bindings = init_within(&fixture.document, &fixture.root, &SiteConfig::default()).unwrap();
    let modal = fixture.modal();

    modal.toggle();
    fixture.find::<HtmlElement>(".modal-content").click();
    assert_eq!(modal.state(), ModalState::Open);

    fixture.find::<HtmlElement>(".modal-overlay").click();
    assert_eq!(modal.state(), ModalState::Closed);

    bindings.dispose();
}

#[wasm_bindgen_test]
fn submit_button_inside_modal_is_not_a_cta() {
    let fixture = Fixture::new();
    let handles = loan_site_frontend::SiteHandles::resolve(
        &fixture.document,
        &fixture.root,
        &SiteConfig::default(),
    )
    .unwrap();
    assert_eq!(handles.ctas.len(), 2);
    assert_eq!(handles.password_toggles.len(), 1);
    assert_eq!(handles.counters.len(), 1);
}

#[wasm_bindgen_test]
fn disposed_bindings_stop_reacting() {
    let fixture = Fixture::new();
    let bindings = init_within(&fixture.document, &fixture.root, &SiteConfig::default()).unwrap();
    assert!(bindings.listener_count() > 0);
    assert!(bindings.observes_counters());
    bindings.dispose();

    fixture.find::<HtmlElement>(".nav-cta").click();
    assert_eq!(fixture.modal().state(), ModalState::Closed);
}

#[wasm_bindgen_test]
fn invalid_submit_shows_inline_errors_and_stays_idle() {
    let fixture = Fixture::new();
    let config = SiteConfig::default();
    let form = LoginForm::resolve(
        &fixture.document,
        fixture.find::<HtmlFormElement>("#loginForm"),
        &config,
    )
    .unwrap();
    assert_eq!(form.fields().len(), 2);

    fixture.find::<HtmlInputElement>("#email").set_value("not-an-email");
    assert_eq!(form.submit(&config), SubmitState::Idle);

    let messages = fixture
        .root
        .query_selector_all(&format!(".{}", MESSAGE_CLASS))
        .unwrap();
    assert_eq!(messages.length(), 2);
    let texts: Vec<String> = (0..messages.length())
        .filter_map(|i| messages.item(i))
        .filter_map(|node| node.text_content())
        .collect();
    assert_eq!(
        texts,
        vec!["Please enter a valid email address", "This field is required"]
    );
    let email = fixture.find::<HtmlInputElement>("#email");
    assert!(email.class_list().contains("error"));
}

#[wasm_bindgen_test]
fn fixing_a_field_fades_its_error_out() {
    let fixture = Fixture::new();
    let config = SiteConfig::default();
    let form = LoginForm::resolve(
        &fixture.document,
        fixture.find::<HtmlFormElement>("#loginForm"),
        &config,
    )
    .unwrap();

    assert!(!form.validate(&config).is_valid());
    fixture.find::<HtmlInputElement>("#email").set_value("user@example.com");
    fixture.find::<HtmlInputElement>("#password").set_value("longenough");
    assert!(form.validate(&config).is_valid());

    let email = fixture.find::<HtmlInputElement>("#email");
    assert!(!email.class_list().contains("error"));
    // still in the document until the fade finishes
    let leaving = fixture
        .root
        .query_selector_all(&format!(".{}", LEAVING_CLASS))
        .unwrap();
    assert_eq!(leaving.length(), 2);
    assert!(fixture
        .root
        .query_selector(&format!(".{}", MESSAGE_CLASS))
        .unwrap()
        .is_none());
}

#[wasm_bindgen_test]
fn submit_event_is_handled_by_the_form_listener() {
    let fixture = Fixture::new();
    let bindings = init_within(&fixture.document, &fixture.root, &SiteConfig::default()).unwrap();

    let form: Element = fixture.find("#loginForm");
    form.dispatch_event(&Event::new("submit").unwrap()).unwrap();
    let messages = fixture.root.query_selector_all(".error-message").unwrap();
    assert_eq!(messages.length(), 2);

    bindings.dispose();
}

#[wasm_bindgen_test]
fn password_toggle_reveals_and_masks() {
    let fixture = Fixture::new();
    let bindings = init_within(&fixture.document, &fixture.root, &SiteConfig::default()).unwrap();
    let input = fixture.find::<HtmlInputElement>("#password");
    let toggle = fixture.find::<HtmlElement>(".password-toggle");

    toggle.click();
    assert_eq!(input.type_(), "text");
    assert!(toggle.class_list().contains("show-password"));

    toggle.click();
    assert_eq!(input.type_(), "password");
    assert!(!toggle.class_list().contains("show-password"));

    bindings.dispose();
}

#[wasm_bindgen_test]
fn toggle_follows_explicit_target() {
    let fixture = Fixture::new();
    fixture.root.set_inner_html(
        r#"<input id="secret" type="password"><div><button class="password-toggle" data-toggle-for="secret"></button></div>"#,
    );
    let bindings = init_within(&fixture.document, &fixture.root, &SiteConfig::default()).unwrap();

    fixture.find::<HtmlElement>(".password-toggle").click();
    assert_eq!(fixture.find::<HtmlInputElement>("#secret").type_(), "text");

    bindings.dispose();
}

fn window() -> Window {
    web_sys::window().unwrap()
}

#[wasm_bindgen_test]
fn whole_page_wires_after_load() {
    let document = window().document().unwrap();
    assert_ne!(document.ready_state(), "loading");
    let bindings = init(&document, &SiteConfig::default()).unwrap();
    bindings.dispose();
}

#[wasm_bindgen_test]
fn valid_submit_goes_busy_and_ignores_resubmits() {
    let fixture = Fixture::new();
    let config = SiteConfig {
        application_url: "#logged-in".to_string(),
        login_delay_ms: 600_000,
        ..SiteConfig::default()
    };
    let form = LoginForm::resolve(
        &fixture.document,
        fixture.find::<HtmlFormElement>("#loginForm"),
        &config,
    )
    .unwrap();
    let email = fixture.find::<HtmlInputElement>("#email");
    email.set_value("user@example.com");
    fixture.find::<HtmlInputElement>("#password").set_value("longenough");

    assert_eq!(form.submit(&config), SubmitState::Submitting);
    assert_eq!(form.state(), SubmitState::Submitting);
    let button = fixture.find::<HtmlButtonElement>("button[type=\"submit\"]");
    assert!(button.disabled());
    assert_eq!(button.inner_html(), BUSY_LABEL);
    assert!(button.text_content().unwrap().contains("Logging in..."));

    // a second submit is not validated again, even with a broken field
    email.set_value("");
    assert_eq!(form.submit(&config), SubmitState::Submitting);
    assert!(fixture.root.query_selector(".error-message").unwrap().is_none());
    assert!(!email.class_list().contains("error"));
}

#[wasm_bindgen_test]
fn locale_formatter_is_reusable() {
    let formatter = LocaleFormatter::new();
    let digits = |text: String| text.chars().filter(char::is_ascii_digit).collect::<String>();
    assert_eq!(digits(formatter.format(1234)), "1234");
    assert_eq!(digits(formatter.format(0)), "0");
    assert_eq!(digits(formatter.format(1_000_000)), "1000000");
}

const COUNTER_PAGE: &str = r#"
    <div style="height: 3000px"></div>
    <div class="stat-card"><span class="text-4xl">1,234</span></div>
    <div style="height: 3000px"></div>
"#;

#[wasm_bindgen_test]
async fn counter_runs_once_when_scrolled_into_view() {
    let fixture = Fixture::with_html(COUNTER_PAGE);
    let config = SiteConfig {
        counter_duration_ms: 200.0,
        ..SiteConfig::default()
    };
    let window = window();
    window.scroll_to_with_x_and_y(0.0, 0.0);
    let bindings = init_within(&fixture.document, &fixture.root, &config).unwrap();
    let counter: Element = fixture.find(".stat-card .text-4xl");
    let expected = LocaleFormatter::new().format(1234);

    TimeoutFuture::new(100).await;
    assert_eq!(counter.text_content().unwrap(), "1,234");

    counter.scroll_into_view();
    TimeoutFuture::new(700).await;
    assert_eq!(counter.text_content().unwrap(), expected);

    // away and back again: the count must not restart from zero
    window.scroll_to_with_x_and_y(0.0, 0.0);
    TimeoutFuture::new(100).await;
    counter.scroll_into_view();
    TimeoutFuture::new(50).await;
    assert_eq!(counter.text_content().unwrap(), expected);

    bindings.dispose();
    window.scroll_to_with_x_and_y(0.0, 0.0);
}

const ANCHOR_PAGE: &str = r##"
    <a id="jump" href="#scroll-target">Jump</a>
    <div style="height: 2000px"></div>
    <section id="scroll-target">Target</section>
    <div style="height: 3000px"></div>
"##;

#[wasm_bindgen_test]
async fn anchor_click_leaves_room_for_the_header() {
    let fixture = Fixture::with_html(ANCHOR_PAGE);
    let config = SiteConfig::default();
    let window = window();
    window.scroll_to_with_x_and_y(0.0, 0.0);
    let bindings = init_within(&fixture.document, &fixture.root, &config).unwrap();
    TimeoutFuture::new(50).await;

    let target: Element = fixture.find("#scroll-target");
    let expected =
        target.get_bounding_client_rect().top() + window.scroll_y().unwrap() - config.header_offset;

    fixture.find::<HtmlElement>("#jump").click();
    TimeoutFuture::new(1500).await;

    let landed = window.scroll_y().unwrap();
    assert!(
        (landed - expected).abs() < 1.0,
        "scrolled to {landed}, expected {expected}"
    );
    assert!((target.get_bounding_client_rect().top() - config.header_offset).abs() < 1.0);

    bindings.dispose();
    window.scroll_to_with_x_and_y(0.0, 0.0);
}
