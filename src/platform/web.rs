//! Browser host
//!
//! Binds the platform traits to `window` timers, keyboard listeners,
//! `alert` and a 2D canvas mounted in the stage element.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::f64::consts::TAU;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, KeyboardEvent, Window};

use super::{Host, HostContainer, KeyboardSource, ListenerId, OutcomeNotifier, TickScheduler, TimerId};
use crate::input::{Key, KeyEvent};
use crate::render::{NullSurface, Surface};
use crate::sim::OutcomeReport;

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

/// Canvas 2D surface
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasSurface {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        ctx.set_font("16px system-ui, sans-serif");
        Ok(Self {
            ctx,
            width: f64::from(canvas.width()),
            height: f64::from(canvas.height()),
        })
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx
            .fill_rect(f64::from(x), f64::from(y), f64::from(w), f64::from(h));
    }

    fn fill_circle(&mut self, x: f32, y: f32, r: f32, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        if self
            .ctx
            .arc(f64::from(x), f64::from(y), f64::from(r), 0.0, TAU)
            .is_ok()
        {
            self.ctx.fill();
        }
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: &str) {
        self.ctx.set_fill_style_str(color);
        if let Err(e) = self.ctx.fill_text(text, f64::from(x), f64::from(y)) {
            log::warn!("fill_text failed: {e:?}");
        }
    }
}

struct Interval {
    handle: i32,
    closure: Closure<dyn FnMut()>,
}

/// `setInterval` scheduler
#[derive(Default)]
pub struct IntervalScheduler {
    next_id: Cell<u64>,
    active: RefCell<BTreeMap<TimerId, Interval>>,
    /// Closures of cleared intervals. A timer may be cancelled from inside
    /// its own callback, so they are only released on the next `schedule`.
    retired: RefCell<Vec<Closure<dyn FnMut()>>>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&self, interval: Duration, closure: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
        let millis = i32::try_from(interval.as_millis()).unwrap_or(i32::MAX).max(1);
        window()?.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            millis,
        )
    }
}

impl TickScheduler for IntervalScheduler {
    fn schedule(&self, interval: Duration, mut on_tick: Box<dyn FnMut()>) -> TimerId {
        self.retired.borrow_mut().clear();

        let id = TimerId(self.next_id.get() + 1);
        self.next_id.set(id.0);

        let closure = Closure::<dyn FnMut()>::new(move || on_tick());
        match self.register(interval, &closure) {
            Ok(handle) => {
                self.active.borrow_mut().insert(id, Interval { handle, closure });
            }
            Err(e) => log::error!("setInterval failed: {e:?}"),
        }
        id
    }

    fn cancel(&self, id: TimerId) {
        let Some(interval) = self.active.borrow_mut().remove(&id) else {
            return;
        };
        match window() {
            Ok(w) => w.clear_interval_with_handle(interval.handle),
            Err(e) => log::error!("clearInterval failed: {e:?}"),
        }
        self.retired.borrow_mut().push(interval.closure);
    }
}

struct KeyListeners {
    down: Closure<dyn FnMut(KeyboardEvent)>,
    up: Closure<dyn FnMut(KeyboardEvent)>,
}

/// Keyboard events from `window`
#[derive(Default)]
pub struct WindowKeyboard {
    next_id: Cell<u64>,
    listeners: RefCell<BTreeMap<ListenerId, KeyListeners>>,
}

impl WindowKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn listener(
        listener: Rc<dyn Fn(KeyEvent)>,
        wrap: fn(Key) -> KeyEvent,
    ) -> Closure<dyn FnMut(KeyboardEvent)> {
        Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if let Some(key) = Key::from_name(&event.key()) {
                listener(wrap(key));
            }
        })
    }

    fn attach(listeners: &KeyListeners) -> Result<(), JsValue> {
        let w = window()?;
        w.add_event_listener_with_callback("keydown", listeners.down.as_ref().unchecked_ref())?;
        w.add_event_listener_with_callback("keyup", listeners.up.as_ref().unchecked_ref())?;
        Ok(())
    }

    fn detach(listeners: &KeyListeners) -> Result<(), JsValue> {
        let w = window()?;
        w.remove_event_listener_with_callback("keydown", listeners.down.as_ref().unchecked_ref())?;
        w.remove_event_listener_with_callback("keyup", listeners.up.as_ref().unchecked_ref())?;
        Ok(())
    }
}

impl KeyboardSource for WindowKeyboard {
    fn subscribe(&self, listener: Rc<dyn Fn(KeyEvent)>) -> ListenerId {
        let id = ListenerId(self.next_id.get() + 1);
        self.next_id.set(id.0);

        let listeners = KeyListeners {
            down: Self::listener(Rc::clone(&listener), KeyEvent::Down),
            up: Self::listener(listener, KeyEvent::Up),
        };
        if let Err(e) = Self::attach(&listeners) {
            log::error!("keyboard subscribe failed: {e:?}");
        }
        self.listeners.borrow_mut().insert(id, listeners);
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        let Some(listeners) = self.listeners.borrow_mut().remove(&id) else {
            return;
        };
        if let Err(e) = Self::detach(&listeners) {
            log::error!("keyboard unsubscribe failed: {e:?}");
        }
    }
}

/// Announces outcomes with `window.alert`
pub struct AlertNotifier;

impl OutcomeNotifier for AlertNotifier {
    fn announce(&self, report: &OutcomeReport) {
        let message = report.message();
        log::info!("{}: {message}", report.kind.title());
        if let Err(e) = window().and_then(|w| w.alert_with_message(&message)) {
            log::warn!("alert failed: {e:?}");
        }
    }
}

/// The stage element games draw into
pub struct StageContainer {
    stage: Element,
}

impl StageContainer {
    pub fn new(stage: Element) -> Self {
        Self { stage }
    }

    /// Look the stage up by element id
    pub fn by_id(id: &str) -> Result<Self, JsValue> {
        let stage = window()?
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))?;
        Ok(Self::new(stage))
    }

    fn mount_canvas(&self, width: u32, height: u32) -> Result<CanvasSurface, JsValue> {
        let document = window()?
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        canvas.set_width(width);
        canvas.set_height(height);

        self.stage.set_inner_html("");
        self.stage.append_child(&canvas)?;
        CanvasSurface::new(&canvas)
    }
}

impl HostContainer for StageContainer {
    fn mount(&self, width: u32, height: u32) -> Box<dyn Surface> {
        match self.mount_canvas(width, height) {
            Ok(surface) => Box::new(surface),
            Err(e) => {
                log::error!("could not mount canvas: {e:?}");
                Box::new(NullSurface)
            }
        }
    }

    fn clear(&self) {
        self.stage.set_inner_html("");
    }
}

/// Host bound to this page, drawing into the element with id `stage_id`
pub fn browser_host(stage_id: &str) -> Result<Host, JsValue> {
    Ok(Host {
        scheduler: Rc::new(IntervalScheduler::new()),
        keyboard: Rc::new(WindowKeyboard::new()),
        notifier: Rc::new(AlertNotifier),
        container: Rc::new(StageContainer::by_id(stage_id)?),
    })
}
