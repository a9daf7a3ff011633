//! In-memory host
//!
//! Drives sessions without a browser: time advances only when asked, key
//! events are injected by hand, outcomes are recorded instead of shown.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use super::{Host, HostContainer, KeyboardSource, ListenerId, OutcomeNotifier, TickScheduler, TimerId};
use crate::input::{Key, KeyEvent};
use crate::render::Surface;
use crate::sim::OutcomeReport;

type TickFn = Rc<RefCell<Box<dyn FnMut()>>>;

struct Timer {
    interval: Duration,
    next_due: Duration,
    callback: TickFn,
}

#[derive(Default)]
struct SchedulerInner {
    now: Duration,
    next_id: u64,
    active: BTreeMap<TimerId, Timer>,
    /// Callback of the last cancelled timer, kept so a racing fire can be replayed
    cancelled: Option<(TimerId, TickFn)>,
}

/// Scheduler whose clock only moves on [`ManualScheduler::advance`]
#[derive(Default)]
pub struct ManualScheduler {
    inner: RefCell<SchedulerInner>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    pub fn active_count(&self) -> usize {
        self.inner.borrow().active.len()
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.inner.borrow().active.contains_key(&id)
    }

    pub fn active_ids(&self) -> Vec<TimerId> {
        self.inner.borrow().active.keys().copied().collect()
    }

    /// Fire every active timer once, ignoring intervals. Returns fires.
    pub fn fire_all(&self) -> usize {
        let mut fired = 0;
        for id in self.active_ids() {
            // A timer cancelled by an earlier callback in this round is skipped
            let callback = self.inner.borrow().active.get(&id).map(|t| Rc::clone(&t.callback));
            if let Some(callback) = callback {
                (callback.borrow_mut())();
                fired += 1;
            }
        }
        fired
    }

    /// Move the clock forward, firing due timers in time order. Returns fires.
    pub fn advance(&self, elapsed: Duration) -> usize {
        let target = self.now() + elapsed;
        let mut fired = 0;

        loop {
            let callback = {
                let mut inner = self.inner.borrow_mut();
                let due = inner
                    .active
                    .iter()
                    .filter(|(_, t)| t.next_due <= target)
                    .min_by_key(|(id, t)| (t.next_due, **id))
                    .map(|(id, _)| *id);
                let Some(id) = due else { break };
                let Some(timer) = inner.active.get_mut(&id) else { break };
                let at = timer.next_due;
                timer.next_due += timer.interval;
                let callback = Rc::clone(&timer.callback);
                inner.now = at;
                callback
            };
            (callback.borrow_mut())();
            fired += 1;
        }

        self.inner.borrow_mut().now = target;
        fired
    }

    /// Invoke the last cancelled timer's callback once, as if the host had
    /// already queued the fire when `cancel` ran.
    pub fn fire_cancelled(&self, id: TimerId) -> bool {
        let callback = {
            let mut inner = self.inner.borrow_mut();
            match inner.cancelled.take() {
                Some((last, callback)) if last == id => Some(callback),
                other => {
                    inner.cancelled = other;
                    None
                }
            }
        };
        match callback {
            Some(callback) => {
                (callback.borrow_mut())();
                true
            }
            None => false,
        }
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule(&self, interval: Duration, on_tick: Box<dyn FnMut()>) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = TimerId(inner.next_id);
        let interval = interval.max(Duration::from_millis(1));
        let next_due = inner.now + interval;
        inner.active.insert(
            id,
            Timer {
                interval,
                next_due,
                callback: Rc::new(RefCell::new(on_tick)),
            },
        );
        id
    }

    fn cancel(&self, id: TimerId) {
        let mut inner = self.inner.borrow_mut();
        if let Some(timer) = inner.active.remove(&id) {
            inner.cancelled = Some((id, timer.callback));
        }
    }
}

/// Keyboard source fed by [`KeyboardBus::press`] / [`KeyboardBus::release`]
#[derive(Default)]
pub struct KeyboardBus {
    next_id: Cell<u64>,
    listeners: RefCell<BTreeMap<ListenerId, Rc<dyn Fn(KeyEvent)>>>,
}

impl KeyboardBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn press(&self, key: Key) {
        self.dispatch(KeyEvent::Down(key));
    }

    pub fn release(&self, key: Key) {
        self.dispatch(KeyEvent::Up(key));
    }

    /// Deliver an event to every listener in subscription order
    pub fn dispatch(&self, event: KeyEvent) {
        let listeners: Vec<_> = self.listeners.borrow().values().cloned().collect();
        for listener in listeners {
            listener(event);
        }
    }
}

impl KeyboardSource for KeyboardBus {
    fn subscribe(&self, listener: Rc<dyn Fn(KeyEvent)>) -> ListenerId {
        let id = ListenerId(self.next_id.get() + 1);
        self.next_id.set(id.0);
        self.listeners.borrow_mut().insert(id, listener);
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.listeners.borrow_mut().remove(&id);
    }
}

/// Notifier that logs and keeps every report
#[derive(Default)]
pub struct RecordingNotifier {
    reports: RefCell<Vec<OutcomeReport>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.reports.borrow().len()
    }

    pub fn reports(&self) -> Vec<OutcomeReport> {
        self.reports.borrow().clone()
    }

    pub fn last(&self) -> Option<OutcomeReport> {
        self.reports.borrow().last().cloned()
    }
}

impl OutcomeNotifier for RecordingNotifier {
    fn announce(&self, report: &OutcomeReport) {
        log::info!("{}: {}", report.kind.title(), report.message());
        self.reports.borrow_mut().push(report.clone());
    }
}

/// Surface that only counts frames (one per `clear`)
pub struct CountingSurface {
    frames: Rc<Cell<u64>>,
}

impl Surface for CountingSurface {
    fn clear(&mut self) {
        self.frames.set(self.frames.get() + 1);
    }
    fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _color: &str) {}
    fn fill_circle(&mut self, _x: f32, _y: f32, _r: f32, _color: &str) {}
    fn fill_text(&mut self, _text: &str, _x: f32, _y: f32, _color: &str) {}
}

/// Container that hands out counting surfaces
#[derive(Default)]
pub struct HeadlessContainer {
    mounted: Cell<bool>,
    mounts: Cell<u32>,
    frames: Rc<Cell<u64>>,
}

impl HeadlessContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    pub fn mounts(&self) -> u32 {
        self.mounts.get()
    }

    /// Frames drawn across all surfaces this container handed out
    pub fn frames(&self) -> u64 {
        self.frames.get()
    }
}

impl HostContainer for HeadlessContainer {
    fn mount(&self, _width: u32, _height: u32) -> Box<dyn Surface> {
        self.mounted.set(true);
        self.mounts.set(self.mounts.get() + 1);
        Box::new(CountingSurface {
            frames: Rc::clone(&self.frames),
        })
    }

    fn clear(&self) {
        self.mounted.set(false);
    }
}

/// The in-memory host with concrete handles kept for inspection
#[derive(Clone, Default)]
pub struct HeadlessHost {
    pub scheduler: Rc<ManualScheduler>,
    pub keyboard: Rc<KeyboardBus>,
    pub notifier: Rc<RecordingNotifier>,
    pub container: Rc<HeadlessContainer>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(&self) -> Host {
        Host {
            scheduler: self.scheduler.clone(),
            keyboard: self.keyboard.clone(),
            notifier: self.notifier.clone(),
            container: self.container.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> (Rc<Cell<u32>>, Box<dyn FnMut()>) {
        let hits = Rc::new(Cell::new(0));
        let inner = Rc::clone(&hits);
        (hits, Box::new(move || inner.set(inner.get() + 1)))
    }

    #[test]
    fn test_advance_fires_on_interval() {
        let scheduler = ManualScheduler::new();
        let (hits, cb) = counter();
        scheduler.schedule(Duration::from_millis(120), cb);

        assert_eq!(scheduler.advance(Duration::from_millis(119)), 0);
        assert_eq!(scheduler.advance(Duration::from_millis(1)), 1);
        assert_eq!(scheduler.advance(Duration::from_millis(360)), 3);
        assert_eq!(hits.get(), 4);
        assert_eq!(scheduler.now(), Duration::from_millis(480));
    }

    #[test]
    fn test_interleaves_timers_by_due_time() {
        let scheduler = ManualScheduler::new();
        let (slow, cb) = counter();
        scheduler.schedule(Duration::from_millis(100), cb);
        let (fast, cb) = counter();
        scheduler.schedule(Duration::from_millis(16), cb);

        scheduler.advance(Duration::from_millis(200));
        assert_eq!(slow.get(), 2);
        assert_eq!(fast.get(), 12);
    }

    #[test]
    fn test_cancelled_timer_stops_but_can_be_replayed() {
        let scheduler = ManualScheduler::new();
        let (hits, cb) = counter();
        let id = scheduler.schedule(Duration::from_millis(10), cb);

        scheduler.cancel(id);
        scheduler.cancel(id);
        assert_eq!(scheduler.active_count(), 0);
        assert_eq!(scheduler.advance(Duration::from_millis(100)), 0);
        assert_eq!(scheduler.fire_all(), 0);

        assert!(!scheduler.fire_cancelled(TimerId(999)));
        assert!(scheduler.fire_cancelled(id));
        assert_eq!(hits.get(), 1);
        // Replayed once, then released
        assert!(!scheduler.fire_cancelled(id));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_only_last_cancelled_timer_is_retained() {
        let scheduler = ManualScheduler::new();
        let (first_hits, cb) = counter();
        let first = scheduler.schedule(Duration::from_millis(10), cb);
        let (second_hits, cb) = counter();
        let second = scheduler.schedule(Duration::from_millis(10), cb);

        scheduler.cancel(first);
        scheduler.cancel(second);

        assert!(!scheduler.fire_cancelled(first));
        assert!(scheduler.fire_cancelled(second));
        assert_eq!(first_hits.get(), 0);
        assert_eq!(second_hits.get(), 1);
    }

    #[test]
    fn test_keyboard_bus_subscriptions() {
        let bus = KeyboardBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = bus.subscribe(Rc::new(move |e| sink.borrow_mut().push(e)));

        bus.press(Key::ArrowUp);
        bus.release(Key::ArrowUp);
        bus.unsubscribe(id);
        bus.unsubscribe(id);
        bus.press(Key::ArrowDown);

        assert_eq!(bus.listener_count(), 0);
        assert_eq!(
            *seen.borrow(),
            vec![KeyEvent::Down(Key::ArrowUp), KeyEvent::Up(Key::ArrowUp)]
        );
    }

    #[test]
    fn test_container_counts_frames() {
        let container = HeadlessContainer::new();
        let mut surface = container.mount(10, 10);
        assert!(container.is_mounted());
        surface.clear();
        surface.clear();
        container.clear();
        assert!(!container.is_mounted());
        assert_eq!(container.frames(), 2);
        assert_eq!(container.mounts(), 1);
    }
}
