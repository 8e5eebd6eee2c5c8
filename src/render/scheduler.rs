//! Browser frame loop and input wiring
//!
//! `FrameLoop` owns every browser resource the garden holds on to while it is
//! running: the pending `requestAnimationFrame` callback, the container's
//! `ResizeObserver`, and the mouse/touch listeners. `stop` (or dropping the
//! loop) releases all of them.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, MouseEvent,
    ResizeObserver, TouchEvent, Window,
};

use super::canvas;
use crate::error::GardenError;
use crate::garden::{Garden, GardenEvent};
use crate::interaction::InputKind;
use crate::math::Vec2;

/// Nominal refresh interval `step` constants are tuned for
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Longest gap folded into one step, so a backgrounded tab does not lurch
const MAX_FRAME_DT: f64 = 4.0;

/// Host callbacks for outbound garden events
#[derive(Default)]
pub struct Hooks {
    pub on_select: Option<Function>,
    pub on_move: Option<Function>,
}

impl Hooks {
    /// Drain pending garden events and hand them to the host.
    ///
    /// The garden borrow is released before any host callback runs, so hosts
    /// may call straight back into the engine.
    pub fn deliver(&self, garden: &RefCell<Garden>) {
        let events = garden.borrow_mut().drain_events();
        for event in events {
            if let Err(err) = self.dispatch(event) {
                tracing::warn!(error = %err, "host callback failed");
            }
        }
    }

    /// Deliver pending events on a fresh microtask.
    ///
    /// Host callbacks then run after every engine and wasm-bindgen borrow of
    /// the current call has been released, so they may freely call back into
    /// `GardenCanvas` (including `stop`).
    pub fn deliver_soon(hooks: &Rc<Hooks>, garden: &Rc<RefCell<Garden>>) {
        if !garden.borrow().has_pending_events() {
            return;
        }
        let Some(window) = web_sys::window() else {
            hooks.deliver(garden);
            return;
        };

        let hooks = Rc::clone(hooks);
        let garden = Rc::clone(garden);
        let task = Closure::once_into_js(move || hooks.deliver(&garden));
        window.queue_microtask(task.unchecked_ref());
    }

    fn dispatch(&self, event: GardenEvent) -> Result<(), GardenError> {
        match event {
            GardenEvent::TreeSelected(tree) => {
                if let Some(f) = &self.on_select {
                    let payload = serde_json::to_string(&tree)?;
                    f.call1(&JsValue::NULL, &JsValue::from_str(&payload))?;
                }
            }
            GardenEvent::TreeMoved { id, x } => {
                if let Some(f) = &self.on_move {
                    f.call2(&JsValue::NULL, &JsValue::from_str(&id), &JsValue::from_f64(x))?;
                }
            }
        }
        Ok(())
    }
}

/// Shared pieces every callback needs
#[derive(Clone)]
struct Surface {
    garden: Rc<RefCell<Garden>>,
    hooks: Rc<Hooks>,
    canvas: HtmlCanvasElement,
}

impl Surface {
    /// Event position in canvas pixels
    fn local(&self, client_x: i32, client_y: i32) -> Vec2 {
        let rect = self.canvas.get_bounding_client_rect();
        Vec2::new(client_x as f64 - rect.left(), client_y as f64 - rect.top())
    }

    fn set_cursor(&self, css: &str) {
        if let Err(err) = self.canvas.style().set_property("cursor", css) {
            tracing::trace!(error = ?err, "cursor update rejected");
        }
    }

    /// Match the canvas backing buffer to its container
    fn fit(&self) {
        let Some(parent) = self.canvas.parent_element() else {
            tracing::warn!("canvas has no container to size against");
            return;
        };
        let width = parent.client_width().max(0) as u32;
        let height = parent.client_height().max(0) as u32;
        if self.canvas.width() != width {
            self.canvas.set_width(width);
        }
        if self.canvas.height() != height {
            self.canvas.set_height(height);
        }
        self.garden.borrow_mut().resize(width as f64, height as f64);
    }
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub struct FrameLoop {
    window: Window,
    running: Rc<Cell<bool>>,
    raf_id: Rc<Cell<Option<i32>>>,
    tick: TickSlot,
    observer: Option<ResizeObserver>,
    resize_callback: Option<Closure<dyn FnMut(js_sys::Array)>>,
    listeners: Vec<Listener>,
}

impl FrameLoop {
    /// Size the surface, attach listeners and schedule the first frame
    pub fn start(
        garden: Rc<RefCell<Garden>>,
        hooks: Rc<Hooks>,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
    ) -> Result<Self, GardenError> {
        let window = web_sys::window().ok_or(GardenError::SurfaceUnavailable("no window"))?;
        let surface = Surface { garden, hooks, canvas };

        let mut frame_loop = Self {
            window,
            running: Rc::new(Cell::new(true)),
            raf_id: Rc::new(Cell::new(None)),
            tick: Rc::new(RefCell::new(None)),
            observer: None,
            resize_callback: None,
            listeners: Vec::new(),
        };

        surface.fit();
        frame_loop.observe_resize(&surface)?;
        frame_loop.attach_mouse(&surface)?;
        frame_loop.attach_touch(&surface)?;
        frame_loop.schedule(surface, ctx)?;

        tracing::debug!(listeners = frame_loop.listeners.len(), "frame loop started");
        Ok(frame_loop)
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    fn schedule(&mut self, surface: Surface, ctx: CanvasRenderingContext2d) -> Result<(), GardenError> {
        let window = self.window.clone();
        let running = Rc::clone(&self.running);
        let raf_id = Rc::clone(&self.raf_id);
        let slot = Rc::clone(&self.tick);
        let mut last: Option<f64> = None;

        let callback = Closure::wrap(Box::new(move |timestamp: f64| {
            raf_id.set(None);
            if !running.get() {
                return;
            }

            let dt = match last {
                Some(prev) => ((timestamp - prev) / FRAME_MS).clamp(0.0, MAX_FRAME_DT),
                None => 1.0,
            };
            last = Some(timestamp);

            surface.garden.borrow_mut().step(dt);
            let frame = surface.garden.borrow().frame();
            if let Err(err) = canvas::paint(&ctx, &frame) {
                tracing::warn!(error = ?err, "paint failed");
            }
            Hooks::deliver_soon(&surface.hooks, &surface.garden);

            if let Some(next) = slot.borrow().as_ref() {
                match window.request_animation_frame(next.as_ref().unchecked_ref()) {
                    Ok(id) => raf_id.set(Some(id)),
                    Err(err) => tracing::warn!(error = ?err, "could not schedule frame"),
                }
            }
        }) as Box<dyn FnMut(f64)>);

        let id = self.window.request_animation_frame(callback.as_ref().unchecked_ref())?;
        self.raf_id.set(Some(id));
        *self.tick.borrow_mut() = Some(callback);
        Ok(())
    }

    fn observe_resize(&mut self, surface: &Surface) -> Result<(), GardenError> {
        let Some(parent) = surface.canvas.parent_element() else {
            return Ok(());
        };

        let surface = surface.clone();
        let callback = Closure::wrap(Box::new(move |_entries: js_sys::Array| {
            surface.fit();
        }) as Box<dyn FnMut(js_sys::Array)>);

        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())?;
        observer.observe(&parent);
        self.observer = Some(observer);
        self.resize_callback = Some(callback);
        Ok(())
    }

    fn attach_mouse(&mut self, surface: &Surface) -> Result<(), GardenError> {
        let canvas: EventTarget = surface.canvas.clone().into();
        let window: EventTarget = self.window.clone().into();

        let s = surface.clone();
        self.listen(&canvas, "mousedown", None, move |event| {
            let Some(e) = event.dyn_ref::<MouseEvent>() else { return };
            let point = s.local(e.client_x(), e.client_y());
            if s.garden.borrow_mut().pointer_down(point, InputKind::Pointer) {
                s.set_cursor("grabbing");
            }
        })?;

        // Move and up live on the window so a drag survives leaving the canvas
        let s = surface.clone();
        self.listen(&window, "mousemove", None, move |event| {
            let Some(e) = event.dyn_ref::<MouseEvent>() else { return };
            let point = s.local(e.client_x(), e.client_y());
            let mut garden = s.garden.borrow_mut();
            garden.pointer_move(point);
            let cursor = garden.hover(point);
            drop(garden);
            s.set_cursor(cursor.css());
        })?;

        let s = surface.clone();
        self.listen(&window, "mouseup", None, move |event| {
            let Some(e) = event.dyn_ref::<MouseEvent>() else { return };
            let point = s.local(e.client_x(), e.client_y());
            s.garden.borrow_mut().pointer_up(point);
            let cursor = s.garden.borrow().hover(point);
            s.set_cursor(cursor.css());
            Hooks::deliver_soon(&s.hooks, &s.garden);
        })
    }

    fn attach_touch(&mut self, surface: &Surface) -> Result<(), GardenError> {
        let canvas: EventTarget = surface.canvas.clone().into();

        let passive = AddEventListenerOptions::new();
        passive.set_passive(true);
        let active = AddEventListenerOptions::new();
        active.set_passive(false);

        let s = surface.clone();
        self.listen(&canvas, "touchstart", Some(&passive), move |event| {
            let Some(e) = event.dyn_ref::<TouchEvent>() else { return };
            if let Some(touch) = e.touches().item(0) {
                let point = s.local(touch.client_x(), touch.client_y());
                s.garden.borrow_mut().pointer_down(point, InputKind::Touch);
            }
        })?;

        // Non-passive so an active drag can stop the page from scrolling
        let s = surface.clone();
        self.listen(&canvas, "touchmove", Some(&active), move |event| {
            let Some(e) = event.dyn_ref::<TouchEvent>() else { return };
            let mut garden = s.garden.borrow_mut();
            if !garden.is_dragging() {
                return;
            }
            e.prevent_default();
            if let Some(touch) = e.touches().item(0) {
                garden.pointer_move(s.local(touch.client_x(), touch.client_y()));
            }
        })?;

        let s = surface.clone();
        self.listen(&canvas, "touchend", None, move |event| {
            let Some(e) = event.dyn_ref::<TouchEvent>() else { return };
            // Suppress the emulated mouse press/release that would select again
            if s.garden.borrow().is_dragging() {
                e.prevent_default();
            }
            match e.changed_touches().item(0) {
                Some(touch) => {
                    let point = s.local(touch.client_x(), touch.client_y());
                    s.garden.borrow_mut().pointer_up(point);
                }
                None => s.garden.borrow_mut().pointer_cancel(),
            }
            Hooks::deliver_soon(&s.hooks, &s.garden);
        })?;

        let s = surface.clone();
        self.listen(&canvas, "touchcancel", None, move |_event| {
            s.garden.borrow_mut().pointer_cancel();
        })
    }

    fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        options: Option<&AddEventListenerOptions>,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), GardenError> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        match options {
            Some(opts) => target.add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                callback.as_ref().unchecked_ref(),
                opts,
            )?,
            None => target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?,
        }
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            callback,
        });
        Ok(())
    }

    /// Cancel the pending frame and release every browser hook
    pub fn stop(&mut self) {
        if !self.running.replace(false) {
            return;
        }

        if let Some(id) = self.raf_id.take() {
            if let Err(err) = self.window.cancel_animation_frame(id) {
                tracing::warn!(error = ?err, "could not cancel pending frame");
            }
        }
        self.tick.borrow_mut().take();

        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        self.resize_callback = None;

        for listener in self.listeners.drain(..) {
            if let Err(err) = listener
                .target
                .remove_event_listener_with_callback(listener.kind, listener.callback.as_ref().unchecked_ref())
            {
                tracing::warn!(kind = listener.kind, error = ?err, "could not detach listener");
            }
        }
        tracing::debug!("frame loop stopped");
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
