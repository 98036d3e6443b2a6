// Wires the particle field into the page: sizes the canvas to its container,
// forwards pointer/touch/resize events into the field as inputs, and drives
// the requestAnimationFrame loop until unload or a reduced-motion preference
// stops it.

use crate::config::FieldConfig;
use crate::error::FieldError;
use crate::field::{FieldInput, ParticleField};
use crate::particle::Particle;
use crate::renderer::{CanvasSurface, FrameStats, Renderer, Surface};
#[cfg(feature = "frame-timing")]
use crate::Timer;
use std::cell::RefCell;
use std::rc::Rc;
use vecmath::Vector2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent,
    Window,
};

type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// What one animation-frame callback did.
#[derive(Debug)]
pub enum Tick {
    /// The loop was stopped before this frame fired. `stray` is the follow-up
    /// frame requested on the way in, which the caller should cancel.
    Stopped { stray: Option<i32> },
    Drawn(FrameStats),
    /// The frame failed part way; the next one is already scheduled.
    Failed(FieldError),
    /// No follow-up frame could be requested, so the loop is now stopped.
    Unscheduled(FieldError),
}

/// Loop state shared between the frame callback and the event listeners.
pub struct FrameLoop<S: Surface> {
    field: ParticleField,
    renderer: Renderer<S>,
    frame_id: Option<i32>,
    running: bool,
    frames: u64,
}

impl<S: Surface> FrameLoop<S> {
    pub fn new(field: ParticleField, surface: S) -> Self {
        FrameLoop {
            field,
            renderer: Renderer::new(surface),
            frame_id: None,
            running: false,
            frames: 0,
        }
    }

    pub fn start(&mut self, first_frame: Option<i32>) {
        self.running = true;
        self.frame_id = first_frame;
    }

    /// Handles one frame callback. `next` is the follow-up frame the callback
    /// requested before calling in, so the loop stays scheduled however this
    /// frame ends.
    pub fn tick(&mut self, now_ms: f64, next: Result<Option<i32>, FieldError>) -> Tick {
        if !self.running {
            return Tick::Stopped {
                stray: next.ok().flatten(),
            };
        }
        match next {
            Ok(id) => self.frame_id = id,
            Err(err) => {
                self.running = false;
                self.frame_id = None;
                return Tick::Unscheduled(err);
            }
        }

        self.frames += 1;
        match self.frame(now_ms) {
            Ok(stats) => Tick::Drawn(stats),
            Err(err) => Tick::Failed(err),
        }
    }

    fn frame(&mut self, now_ms: f64) -> Result<FrameStats, FieldError> {
        #[cfg(feature = "frame-timing")]
        let _timer = Timer::new("ParticleBackground::frame");
        self.field.advance(now_ms);
        self.renderer.render(&self.field)
    }

    /// Idempotent. Returns the pending frame, which the caller cancels.
    pub fn halt(&mut self) -> Option<i32> {
        self.running = false;
        self.frame_id.take()
    }

    pub fn clear_surface(&mut self) -> Result<(), FieldError> {
        self.renderer.clear(&self.field)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending_frame(&self) -> Option<i32> {
        self.frame_id
    }

    /// Frames that ran the step and render, failed ones included.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut ParticleField {
        &mut self.field
    }
}

pub struct ParticleBackground {
    window: Window,
    state: Rc<RefCell<FrameLoop<CanvasSurface>>>,
}

impl ParticleBackground {
    /// Starts the background on the configured canvas. A page without that
    /// element gets Ok(None): no particles, no loop, no listeners.
    pub fn launch(config: FieldConfig) -> Result<Option<ParticleBackground>, FieldError> {
        let window = web_sys::window().ok_or(FieldError::NoWindow)?;
        // One-time check; changing the preference mid-session has no effect.
        ParticleBackground::launch_with(config, prefers_reduced_motion(&window))
    }

    /// `launch` with the reduced-motion preference already resolved. When it
    /// is set the loop is stopped right after starting and the canvas cleared.
    pub fn launch_with(
        config: FieldConfig,
        reduced_motion: bool,
    ) -> Result<Option<ParticleBackground>, FieldError> {
        let window = web_sys::window().ok_or(FieldError::NoWindow)?;
        let document = window.document().ok_or(FieldError::NoDocument)?;
        let element = match document.get_element_by_id(config.canvas_id) {
            Some(element) => element,
            None => return Ok(None),
        };
        let canvas = element
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| FieldError::NotACanvas(config.canvas_id.to_owned()))?;
        let context = canvas
            .get_context("2d")?
            .ok_or(FieldError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| FieldError::NoContext)?;

        let [width, height] = fit_to_container(&canvas);
        let field = ParticleField::new(config, width, height);
        log!(
            "particle background {}x{} with {} particles",
            width,
            height,
            field.particles().len()
        );

        let state = Rc::new(RefCell::new(FrameLoop::new(
            field,
            CanvasSurface::new(context),
        )));
        let background = ParticleBackground { window, state };

        background.listen_for_resize(&canvas)?;
        background.listen_for_pointer(&canvas)?;
        background.listen_for_unload()?;
        background.start_loop()?;

        if reduced_motion {
            log!("reduced motion requested, particle background stopped");
            background.stop();
            background.state.borrow_mut().clear_surface()?;
        }

        Ok(Some(background))
    }

    pub fn stop(&self) {
        halt_and_cancel(&self.window, &self.state);
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().is_running()
    }

    pub fn frames(&self) -> u64 {
        self.state.borrow().frames()
    }

    pub fn particle_count(&self) -> usize {
        self.state.borrow().field().particles().len()
    }

    pub fn particles(&self) -> Vec<Particle> {
        self.state.borrow().field().particles().to_vec()
    }

    pub fn bounds(&self) -> Vector2<f64> {
        self.state.borrow().field().bounds()
    }

    /// Queues an input for the next frame, the same path DOM events take.
    pub fn push(&self, input: FieldInput) {
        self.state.borrow_mut().field_mut().push(input);
    }

    fn start_loop(&self) -> Result<(), FieldError> {
        // The closure reschedules itself, so it needs a handle to its own slot.
        let slot: FrameSlot = Rc::new(RefCell::new(None));
        let inner = slot.clone();
        let window = self.window.clone();
        let state = self.state.clone();

        *slot.borrow_mut() = Some(Closure::wrap(Box::new(move |now_ms: f64| {
            // Requested before any work so a frame that dies part way still
            // leaves the next one queued.
            let next = request_frame(&window, &inner);
            let mut frame_loop = match state.try_borrow_mut() {
                Ok(frame_loop) => frame_loop,
                Err(_) => {
                    error!("previous particle frame never finished, skipping");
                    return;
                }
            };
            match frame_loop.tick(now_ms, next) {
                Tick::Drawn(_) => {}
                Tick::Stopped { stray } => {
                    if let Some(id) = stray {
                        cancel_frame(&window, id);
                    }
                }
                Tick::Failed(err) => error!("particle frame failed: {}", err),
                Tick::Unscheduled(err) => error!("could not schedule particle frame: {}", err),
            }
        }) as Box<dyn FnMut(f64)>));

        let first_frame = request_frame(&self.window, &slot)?;
        self.state.borrow_mut().start(first_frame);
        Ok(())
    }

    fn listen_for_resize(&self, canvas: &HtmlCanvasElement) -> Result<(), FieldError> {
        let canvas = canvas.clone();
        let state = self.state.clone();
        let on_resize = Closure::wrap(Box::new(move || {
            let [width, height] = fit_to_container(&canvas);
            state
                .borrow_mut()
                .field_mut()
                .push(FieldInput::Resized { width, height });
        }) as Box<dyn FnMut()>);
        self.window
            .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
        on_resize.forget();
        Ok(())
    }

    // Event timestamps share the time origin of the frame callback's clock, so
    // the idle timeout compares like with like.
    fn listen_for_pointer(&self, canvas: &HtmlCanvasElement) -> Result<(), FieldError> {
        let on_mouse = {
            let canvas = canvas.clone();
            let state = self.state.clone();
            Closure::wrap(Box::new(move |event: MouseEvent| {
                let rect = canvas.get_bounding_client_rect();
                state.borrow_mut().field_mut().push(FieldInput::PointerMoved {
                    x: event.client_x() as f64 - rect.left(),
                    y: event.client_y() as f64 - rect.top(),
                    at_ms: event.time_stamp(),
                });
            }) as Box<dyn FnMut(_)>)
        };
        canvas.add_event_listener_with_callback("mousemove", on_mouse.as_ref().unchecked_ref())?;
        on_mouse.forget();

        let on_touch = {
            let canvas = canvas.clone();
            let state = self.state.clone();
            Closure::wrap(Box::new(move |event: TouchEvent| {
                event.prevent_default();
                let touch = match event.touches().get(0) {
                    Some(touch) => touch,
                    None => return,
                };
                let rect = canvas.get_bounding_client_rect();
                state.borrow_mut().field_mut().push(FieldInput::PointerMoved {
                    x: touch.client_x() as f64 - rect.left(),
                    y: touch.client_y() as f64 - rect.top(),
                    at_ms: event.time_stamp(),
                });
            }) as Box<dyn FnMut(_)>)
        };
        // Must not be passive, or preventDefault cannot stop the page scrolling.
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        canvas.add_event_listener_with_callback_and_add_event_listener_options(
            "touchmove",
            on_touch.as_ref().unchecked_ref(),
            &options,
        )?;
        on_touch.forget();
        Ok(())
    }

    fn listen_for_unload(&self) -> Result<(), FieldError> {
        let window = self.window.clone();
        let state = self.state.clone();
        let on_unload = Closure::wrap(Box::new(move || {
            halt_and_cancel(&window, &state);
        }) as Box<dyn FnMut()>);
        self.window
            .add_event_listener_with_callback("beforeunload", on_unload.as_ref().unchecked_ref())?;
        on_unload.forget();
        Ok(())
    }
}

fn halt_and_cancel(window: &Window, state: &RefCell<FrameLoop<CanvasSurface>>) {
    let pending = state.borrow_mut().halt();
    if let Some(id) = pending {
        cancel_frame(window, id);
    }
}

fn cancel_frame(window: &Window, id: i32) {
    if let Err(err) = window.cancel_animation_frame(id) {
        error!("could not cancel particle frame {}: {}", id, FieldError::from(err));
    }
}

fn request_frame(window: &Window, slot: &FrameSlot) -> Result<Option<i32>, FieldError> {
    match slot.borrow().as_ref() {
        Some(callback) => Ok(Some(
            window.request_animation_frame(callback.as_ref().unchecked_ref())?,
        )),
        None => Ok(None),
    }
}

// Matches the drawing buffer to the rendered box of the canvas's container and
// returns the new surface size.
fn fit_to_container(canvas: &HtmlCanvasElement) -> Vector2<f64> {
    let rect = match canvas.parent_element() {
        Some(parent) => parent.get_bounding_client_rect(),
        None => canvas.get_bounding_client_rect(),
    };
    let width = rect.width().max(0.0) as u32;
    let height = rect.height().max(0.0) as u32;
    canvas.set_width(width);
    canvas.set_height(height);
    [width as f64, height as f64]
}

fn prefers_reduced_motion(window: &Window) -> bool {
    window
        .match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .map(|query| query.matches())
        .unwrap_or(false)
}
