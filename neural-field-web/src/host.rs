//! Browser render loop
//!
//! Binds an [`Engine`] to `requestAnimationFrame` and to the window's
//! `resize` and `mousemove` events. All state lives on the main thread and
//! is shared between callbacks through `Rc<RefCell<_>>`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use neural_field::{Engine, FieldConfig, FrameOutcome, Viewport};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{MouseEvent, Window};

use crate::canvas2d::CanvasSurface;

type SharedEngine = Rc<RefCell<Engine<CanvasSurface, SmallRng>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Current size of the browser viewport
pub fn window_viewport(window: &Window) -> Viewport {
    let dimension = |value: Result<JsValue, JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    Viewport::new(dimension(window.inner_width()), dimension(window.inner_height()))
}

fn request_frame(window: &Window, callback: &Closure<dyn FnMut()>) -> Option<i32> {
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .ok()
}

/// A running engine plus the callbacks that keep it going
pub struct BrowserLoop {
    window: Window,
    engine: SharedEngine,
    /// The rAF callback holds a handle to itself so it can reschedule;
    /// taking it out of here on stop breaks that cycle.
    frame_callback: FrameCallback,
    frame_id: Rc<Cell<Option<i32>>>,
    on_resize: Closure<dyn FnMut()>,
    on_pointer_move: Closure<dyn FnMut(MouseEvent)>,
}

impl BrowserLoop {
    /// Mount the engine on `surface`, attach listeners and request the first
    /// frame
    pub fn start(
        window: Window,
        surface: CanvasSurface,
        config: FieldConfig,
    ) -> Result<Self, JsValue> {
        let engine: SharedEngine = Rc::new(RefCell::new(Engine::new(
            config,
            surface,
            SmallRng::from_entropy(),
        )));
        engine.borrow_mut().mount(window_viewport(&window));

        let on_resize = {
            let engine = Rc::clone(&engine);
            let window = window.clone();
            Closure::<dyn FnMut()>::new(move || {
                engine.borrow_mut().resize(window_viewport(&window));
            })
        };

        let on_pointer_move = {
            let engine = Rc::clone(&engine);
            Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
                engine
                    .borrow_mut()
                    .pointer_move(f64::from(event.client_x()), f64::from(event.client_y()));
            })
        };

        let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
        let frame_id = Rc::new(Cell::new(None));
        {
            let engine = Rc::clone(&engine);
            let callback = Rc::clone(&frame_callback);
            let frame_id = Rc::clone(&frame_id);
            let window = window.clone();
            *frame_callback.borrow_mut() = Some(Closure::<dyn FnMut()>::new(move || {
                frame_id.set(None);
                if engine.borrow_mut().frame() == FrameOutcome::Stopped {
                    return;
                }
                if let Some(next) = callback.borrow().as_ref() {
                    frame_id.set(request_frame(&window, next));
                }
            }));
        }

        let mut browser_loop = Self {
            window,
            engine,
            frame_callback,
            frame_id,
            on_resize,
            on_pointer_move,
        };

        if let Err(error) = browser_loop.attach_listeners() {
            browser_loop.stop();
            return Err(error);
        }

        let first = browser_loop
            .frame_callback
            .borrow()
            .as_ref()
            .and_then(|callback| request_frame(&browser_loop.window, callback));
        browser_loop.frame_id.set(first);

        Ok(browser_loop)
    }

    fn attach_listeners(&self) -> Result<(), JsValue> {
        self.window.add_event_listener_with_callback(
            "resize",
            self.on_resize.as_ref().unchecked_ref(),
        )?;
        self.window.add_event_listener_with_callback(
            "mousemove",
            self.on_pointer_move.as_ref().unchecked_ref(),
        )?;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.engine.borrow().is_running()
    }

    /// Cancel the pending frame and detach both listeners.
    ///
    /// Only the first call does anything.
    pub fn stop(&mut self) -> bool {
        if !self.engine.borrow_mut().unmount() {
            return false;
        }

        if let Some(id) = self.frame_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        let _ = self.window.remove_event_listener_with_callback(
            "resize",
            self.on_resize.as_ref().unchecked_ref(),
        );
        let _ = self.window.remove_event_listener_with_callback(
            "mousemove",
            self.on_pointer_move.as_ref().unchecked_ref(),
        );
        self.frame_callback.borrow_mut().take();
        true
    }
}

impl Drop for BrowserLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
