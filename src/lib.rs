use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub mod animation;
pub mod config;
pub mod data;
pub mod error;
pub mod garden;
pub mod growth;
pub mod interaction;
pub mod math;
pub mod particles;
pub mod render;
pub mod sketch;

pub use config::GardenConfig;
pub use data::{Category, Tree};
pub use error::GardenError;
pub use garden::{Garden, GardenEvent};

use render::{FrameLoop, Hooks};

/// Initialize panic hook and console logging
///
/// With no `tracing` subscriber installed, events are forwarded as `log`
/// records, which `console_log` writes to the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console-logging")]
    console_log::init_with_level(log::Level::Info).ok();
}

/// Garden engine bound to a canvas, exposed to JavaScript
///
/// Every method takes `&self`: state lives behind `Rc<RefCell<_>>`, and host
/// callbacks run on a later microtask, so a callback can call straight back
/// into the same `GardenCanvas`.
#[wasm_bindgen]
pub struct GardenCanvas {
    garden: Rc<RefCell<Garden>>,
    hooks: Rc<Hooks>,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    frame_loop: RefCell<Option<FrameLoop>>,
}

#[wasm_bindgen]
impl GardenCanvas {
    /// Bind to a canvas.
    ///
    /// `on_select(treeJson)` fires when a tree is tapped, `on_move(id, x)`
    /// when one is dragged to a new spot.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        on_select: Option<Function>,
        on_move: Option<Function>,
    ) -> Result<GardenCanvas, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(GardenError::SurfaceUnavailable("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let mut garden = Garden::default();
        garden.resize(canvas.width() as f64, canvas.height() as f64);

        Ok(Self {
            garden: Rc::new(RefCell::new(garden)),
            hooks: Rc::new(Hooks { on_select, on_move }),
            canvas,
            ctx,
            frame_loop: RefCell::new(None),
        })
    }

    /// Replace the tree list with a JSON array of tree descriptors
    #[wasm_bindgen]
    pub fn set_trees(&self, json: &str) -> Result<(), JsValue> {
        let trees = data::parse_trees(json)?;
        self.garden.borrow_mut().set_trees(trees);
        Ok(())
    }

    /// Override tuning knobs from YAML; unspecified knobs keep their defaults
    #[wasm_bindgen]
    pub fn set_config(&self, yaml: &str) -> Result<(), JsValue> {
        let config = GardenConfig::from_yaml(yaml)?;
        self.garden.borrow_mut().set_config(config);
        Ok(())
    }

    /// Report the host's water counter; each new value throws one splash
    #[wasm_bindgen]
    pub fn water(&self, counter: u32) {
        self.garden.borrow_mut().set_water_event(counter as u64);
    }

    /// Start the animation loop and input handling
    #[wasm_bindgen]
    pub fn start(&self) -> Result<(), JsValue> {
        let mut slot = self.frame_loop.borrow_mut();
        if slot.as_ref().is_some_and(FrameLoop::is_running) {
            return Ok(());
        }
        let frame_loop = FrameLoop::start(
            Rc::clone(&self.garden),
            Rc::clone(&self.hooks),
            self.canvas.clone(),
            self.ctx.clone(),
        )?;
        *slot = Some(frame_loop);
        Ok(())
    }

    /// Stop the loop and detach every listener
    #[wasm_bindgen]
    pub fn stop(&self) {
        let frame_loop = self.frame_loop.borrow_mut().take();
        if let Some(mut frame_loop) = frame_loop {
            frame_loop.stop();
        }
    }

    /// Advance and repaint by hand, for hosts that run their own loop
    #[wasm_bindgen]
    pub fn step(&self, dt: f64) -> Result<(), JsValue> {
        self.garden.borrow_mut().step(dt);
        let frame = self.garden.borrow().frame();
        render::paint(&self.ctx, &frame)?;
        Hooks::deliver_soon(&self.hooks, &self.garden);
        Ok(())
    }

    /// Resize by hand when not running the built-in loop
    #[wasm_bindgen]
    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.garden.borrow_mut().resize(width as f64, height as f64);
    }

    #[wasm_bindgen]
    pub fn tree_count(&self) -> usize {
        self.garden.borrow().tree_count()
    }
}
