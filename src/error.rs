// Errors raised while wiring the background into the page or drawing a frame,
// plus the page-wide handlers that keep a stray exception from going unseen.

use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, ErrorEvent, PromiseRejectionEvent, Window};

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("no global `window` exists")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("element #{0} is not a canvas")]
    NotACanvas(String),

    #[error("2d drawing context unavailable")]
    NoContext,

    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for FieldError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| value.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
            .unwrap_or_else(|| format!("{:?}", value));
        FieldError::Js(message)
    }
}

impl From<FieldError> for JsValue {
    fn from(error: FieldError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

/// Logs uncaught errors and unhandled promise rejections so that one bad
/// callback is reported without stopping later frames and events.
pub fn install_global_handlers(window: &Window) -> Result<(), FieldError> {
    let on_error = Closure::wrap(Box::new(move |event: ErrorEvent| {
        console::error_2(&"JavaScript error:".into(), &event.error());
    }) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())?;
    on_error.forget();

    let on_rejection = Closure::wrap(Box::new(move |event: PromiseRejectionEvent| {
        console::error_2(&"Unhandled promise rejection:".into(), &event.reason());
        event.prevent_default();
    }) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback(
        "unhandledrejection",
        on_rejection.as_ref().unchecked_ref(),
    )?;
    on_rejection.forget();

    Ok(())
}
