//! Pointer-reactive particle background for a marketing page.
//!
//! On load the module finds the `#bg` canvas, seeds a field of drifting
//! particles sized to the canvas's container, and animates it every display
//! frame: particles bounce off the edges, swell and brighten near the pointer,
//! and nearby pairs are joined by faint lines. Pages without the canvas are left
//! untouched, and a reduced-motion preference stops the animation.
//!
//! The simulation (`field`, `particle`, `stepper`, `pointer`) is plain Rust and
//! runs natively; only `lifecycle` and `CanvasSurface` talk to the browser.

// Use wee_alloc for smaller binaries (optional)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

macro_rules! log {
    ($($t:tt)*) => (web_sys::console::log_1(&format!($($t)*).into()))
}

macro_rules! error {
    ($($t:tt)*) => (web_sys::console::error_1(&format!($($t)*).into()))
}

pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod lifecycle;
pub mod particle;
pub mod pointer;
pub mod renderer;
pub mod stepper;

pub use config::FieldConfig;
pub use error::FieldError;
pub use field::{FieldInput, ParticleField};
pub use lifecycle::ParticleBackground;

use wasm_bindgen::prelude::*;
use web_sys::console;

#[wasm_bindgen(start)]
pub fn initialize() {
    set_panic_hook();

    let window = match web_sys::window() {
        Some(window) => window,
        None => return,
    };
    if let Err(err) = error::install_global_handlers(&window) {
        error!("could not install error handlers: {}", err);
    }

    // Listeners and the frame loop keep the background alive after this drops.
    if let Err(err) = ParticleBackground::launch(FieldConfig::default()) {
        error!("particle background disabled: {}", err);
    }
}

pub fn set_panic_hook() {
    // Panics show up in the browser console with a Rust backtrace instead of
    // an opaque "unreachable executed".
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Labels a `console.time` span that ends when the guard drops.
pub struct Timer<'a> {
    name: &'a str,
}

impl<'a> Timer<'a> {
    pub fn new(name: &'a str) -> Timer<'a> {
        console::time_with_label(name);
        Timer { name }
    }
}

impl<'a> Drop for Timer<'a> {
    fn drop(&mut self) {
        console::time_end_with_label(self.name);
    }
}
