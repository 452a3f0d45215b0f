use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    js_sys, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
};

use crate::error::SiteError;
use crate::utils::dom::window;

/// Target value of a statistic: its digits read as one integer, so "1,234"
/// and "$1.2k" give 1234 and 12. Text without digits has no target.
pub fn parse_target(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// en-US style thousands grouping, used when the browser cannot format.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub value: u64,
    pub done: bool,
}

/// A single linear count from zero to `target`, clocked by animation frame
/// timestamps. The first frame fixes the start time.
#[derive(Debug, Clone)]
pub struct CounterRun {
    target: u64,
    duration_ms: f64,
    started_at: Option<f64>,
    last: u64,
}

impl CounterRun {
    pub fn new(target: u64, duration_ms: f64) -> Self {
        Self {
            target,
            duration_ms,
            started_at: None,
            last: 0,
        }
    }

    pub fn frame(&mut self, timestamp: f64) -> Frame {
        let start = *self.started_at.get_or_insert(timestamp);
        let progress = if self.duration_ms > 0.0 {
            ((timestamp - start) / self.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let done = progress >= 1.0;
        let value = if done {
            self.target
        } else {
            ((progress * self.target as f64).floor() as u64).min(self.target)
        };
        // frames never count backwards, even on a jittery clock
        self.last = self.last.max(value);
        Frame {
            value: self.last,
            done,
        }
    }
}

/// The browser's default-locale number formatter, built once per count.
pub struct LocaleFormatter {
    format: js_sys::Function,
}

impl LocaleFormatter {
    pub fn new() -> Self {
        let format = js_sys::Intl::NumberFormat::new(&js_sys::Array::new(), &js_sys::Object::new())
            .format();
        Self { format }
    }

    pub fn format(&self, value: u64) -> String {
        self.format
            .call1(&JsValue::NULL, &JsValue::from_f64(value as f64))
            .ok()
            .and_then(|formatted| formatted.as_string())
            .unwrap_or_else(|| group_thousands(value))
    }
}

impl Default for LocaleFormatter {
    fn default() -> Self {
        Self::new()
    }
}

type FrameCallback = Closure<dyn FnMut(f64)>;

fn animate(element: Element, target: u64, duration_ms: f64) -> Result<(), SiteError> {
    let window = window()?;
    let mut run = CounterRun::new(target, duration_ms);
    let formatter = LocaleFormatter::new();
    let step: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
    let next_step = step.clone();
    let frame_window = window.clone();

    *step.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
        let frame = run.frame(timestamp);
        element.set_text_content(Some(&formatter.format(frame.value)));
        if frame.done {
            let _ = next_step.borrow_mut().take();
            return;
        }
        if let Some(callback) = next_step.borrow().as_ref() {
            if let Err(e) = frame_window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                log::warn!("Counter animation stopped: {:?}", e);
            }
        }
    }));

    if let Some(callback) = step.borrow().as_ref() {
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }
    Ok(())
}

type EntriesCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// Watches statistic elements and counts each one up the first time it
/// becomes visible. Dropping it disconnects the observer; counts already
/// running finish on their own.
pub struct CounterObserver {
    observer: IntersectionObserver,
    _callback: EntriesCallback,
}

impl CounterObserver {
    pub fn observe(
        elements: &[Element],
        threshold: f64,
        duration_ms: f64,
    ) -> Result<Self, SiteError> {
        let callback: EntriesCallback = Closure::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let target = entry.target();
                    observer.unobserve(&target);
                    let text = target.text_content().unwrap_or_default();
                    match parse_target(&text) {
                        Some(value) => {
                            if let Err(e) = animate(target, value, duration_ms) {
                                log::warn!("Failed to start counter: {}", e);
                            }
                        }
                        None => log::debug!("Counter text {:?} has no digits", text),
                    }
                }
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_root_margin("0px");
        options.set_threshold(&JsValue::from_f64(threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
        for element in elements {
            observer.observe(element);
        }
        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for CounterObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
