//! Browser host for the neural-field particle background
//!
//! This crate provides WASM bindings for mounting the animated particle
//! field on a page as a decorative, non-interactive background.

pub mod canvas2d;
pub mod host;

use neural_field::{ConfigError, FieldConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::canvas2d::CanvasSurface;
use crate::host::BrowserLoop;

/// Initialize WASM panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Parse a config document; an empty string means the defaults
pub fn parse_config(config_json: &str) -> Result<FieldConfig, ConfigError> {
    if config_json.trim().is_empty() {
        return Ok(FieldConfig::default());
    }
    FieldConfig::from_json(config_json)
}

fn config_from_js(config_json: &str) -> Result<FieldConfig, JsValue> {
    parse_config(config_json).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// A mounted particle background
#[wasm_bindgen]
pub struct NeuralBackground {
    inner: Option<BrowserLoop>,
    /// Canvas created by [`NeuralBackground::fullscreen`], removed on unmount
    owned_canvas: Option<HtmlCanvasElement>,
}

#[wasm_bindgen]
impl NeuralBackground {
    /// Start the background on an existing canvas.
    ///
    /// If the canvas has no 2D context the returned handle is inert: nothing
    /// is drawn and no error is raised.
    pub fn mount(canvas: HtmlCanvasElement, config_json: &str) -> Result<NeuralBackground, JsValue> {
        let config = config_from_js(config_json)?;
        Self::start(canvas, config, None)
    }

    /// Create a fixed, full-viewport canvas behind the page and start the
    /// background on it
    pub fn fullscreen(config_json: &str) -> Result<NeuralBackground, JsValue> {
        let config = config_from_js(config_json)?;
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("document not available")?;

        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(JsValue::from)?;
        canvas.set_attribute("aria-hidden", "true")?;
        let style = canvas.style();
        style.set_property("position", "fixed")?;
        style.set_property("inset", "0")?;
        style.set_property("z-index", "0")?;
        style.set_property("pointer-events", "none")?;
        style.set_property("opacity", &config.canvas_opacity.to_string())?;

        document
            .body()
            .ok_or("document has no body")?
            .append_child(&canvas)?;

        Self::start(canvas.clone(), config, Some(canvas))
    }

    fn start(
        canvas: HtmlCanvasElement,
        config: FieldConfig,
        owned_canvas: Option<HtmlCanvasElement>,
    ) -> Result<NeuralBackground, JsValue> {
        let window = web_sys::window().ok_or("window not available")?;

        let inner = match CanvasSurface::new(canvas) {
            Ok(surface) => Some(BrowserLoop::start(window, surface, config)?),
            Err(message) => {
                web_sys::console::warn_1(&format!("neural-field: {message}").into());
                None
            }
        };

        Ok(NeuralBackground {
            inner,
            owned_canvas,
        })
    }

    /// Stop the render loop and detach listeners. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        if let Some(mut inner) = self.inner.take() {
            inner.stop();
        }
        if let Some(canvas) = self.owned_canvas.take() {
            canvas.remove();
        }
    }

    /// Whether frames are still being drawn
    pub fn is_active(&self) -> bool {
        self.inner.as_ref().is_some_and(BrowserLoop::is_running)
    }
}

/// `free()` from JavaScript tears down like `unmount()`
impl Drop for NeuralBackground {
    fn drop(&mut self) {
        self.unmount();
    }
}
