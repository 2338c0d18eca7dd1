// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame scheduling on top of a one-shot host frame callback.
//!
//! The host only ever delivers a single callback per request. The scheduler
//! turns that into a continuous loop by re-requesting after each frame while
//! it is still scheduling. The flag is read after the handler body runs, so a
//! frame already requested when [`FrameScheduler::stop`] is called still
//! fires once but does not chain.

use crate::timeline::TimeStamp;
use std::cell::Cell;
use std::rc::Rc;

/// One-shot callback handed to the host
pub type FrameCallback = Box<dyn FnOnce(TimeStamp)>;

/// Host facility delivering display-refresh callbacks
pub trait FrameHost {
    /// Invoke `callback` once, on the next display frame
    fn request_frame(&self, callback: FrameCallback);

    /// Current wall-clock time, independent of the frame loop
    fn now(&self) -> TimeStamp;
}

/// Start/stop controller for per-frame callbacks
///
/// Cloning yields another handle to the same scheduler.
#[derive(Clone)]
pub struct FrameScheduler {
    inner: Rc<SchedulerInner>,
}

struct SchedulerInner {
    host: Rc<dyn FrameHost>,
    handler: Box<dyn Fn(TimeStamp)>,
    scheduling: Cell<bool>,
    frame_pending: Cell<bool>,
}

impl FrameScheduler {
    /// Create a stopped scheduler that runs `handler` on every frame
    pub fn new(host: Rc<dyn FrameHost>, handler: impl Fn(TimeStamp) + 'static) -> Self {
        Self {
            inner: Rc::new(SchedulerInner {
                host,
                handler: Box::new(handler),
                scheduling: Cell::new(false),
                frame_pending: Cell::new(false),
            }),
        }
    }

    /// Begin requesting frames continuously (no-op if already scheduling)
    pub fn start(&self) {
        if self.inner.scheduling.replace(true) {
            return;
        }
        tracing::trace!("Frame scheduler started");
        SchedulerInner::request_frame(&self.inner);
    }

    /// Stop chaining further frame requests (no-op if already stopped)
    ///
    /// A frame already requested from the host still runs once.
    pub fn stop(&self) {
        if self.inner.scheduling.replace(false) {
            tracing::trace!("Frame scheduler stopped");
        }
    }

    /// Run the handler on exactly one upcoming frame
    ///
    /// Equivalent to [`start`](Self::start) followed by [`stop`](Self::stop).
    /// If a continuous loop is already running it ends after its next
    /// in-flight frame.
    pub fn single_frame(&self) {
        self.start();
        self.stop();
    }

    /// Whether the loop will chain another request after the next frame
    pub fn is_scheduling(&self) -> bool {
        self.inner.scheduling.get()
    }

    /// Whether a frame has been requested from the host and not yet delivered
    pub fn has_pending_frame(&self) -> bool {
        self.inner.frame_pending.get()
    }
}

impl SchedulerInner {
    fn request_frame(this: &Rc<Self>) {
        // At most one outstanding host request per scheduler
        if this.frame_pending.replace(true) {
            return;
        }
        let weak = Rc::downgrade(this);
        this.host.request_frame(Box::new(move |timestamp| {
            if let Some(inner) = weak.upgrade() {
                SchedulerInner::run_frame(&inner, timestamp);
            }
        }));
    }

    fn run_frame(this: &Rc<Self>, timestamp: TimeStamp) {
        this.frame_pending.set(false);
        (this.handler)(timestamp);
        if this.scheduling.get() {
            Self::request_frame(this);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ManualFrameHost;
    use std::cell::RefCell;

    fn counting_scheduler() -> (Rc<ManualFrameHost>, FrameScheduler, Rc<RefCell<Vec<TimeStamp>>>) {
        let host = Rc::new(ManualFrameHost::new());
        let frames = Rc::new(RefCell::new(Vec::new()));
        let sink = frames.clone();
        let scheduler = FrameScheduler::new(host.clone(), move |ts| sink.borrow_mut().push(ts));
        (host, scheduler, frames)
    }

    #[test]
    fn test_start_is_idempotent() {
        let (host, scheduler, frames) = counting_scheduler();

        scheduler.start();
        scheduler.start();
        assert_eq!(host.pending_frames(), 1);

        host.advance(16.0);
        host.run_frame();
        host.advance(16.0);
        host.run_frame();
        assert_eq!(*frames.borrow(), vec![16.0, 32.0]);
        assert_eq!(host.pending_frames(), 1);
    }

    #[test]
    fn test_stop_lets_in_flight_frame_run_once() {
        let (host, scheduler, frames) = counting_scheduler();

        scheduler.start();
        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_scheduling());
        assert!(scheduler.has_pending_frame());

        host.run_frames(3);
        assert_eq!(frames.borrow().len(), 1);
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn test_single_frame() {
        let (host, scheduler, frames) = counting_scheduler();

        scheduler.single_frame();
        scheduler.single_frame();
        assert_eq!(host.pending_frames(), 1);

        host.run_frames(3);
        assert_eq!(frames.borrow().len(), 1);
    }

    #[test]
    fn test_single_frame_ends_running_loop() {
        let (host, scheduler, frames) = counting_scheduler();

        scheduler.start();
        host.run_frames(2);
        assert_eq!(frames.borrow().len(), 2);

        scheduler.single_frame();
        host.run_frames(3);
        assert_eq!(frames.borrow().len(), 3);
        assert!(!scheduler.is_scheduling());
    }

    #[test]
    fn test_restart_while_frame_in_flight() {
        let (host, scheduler, frames) = counting_scheduler();

        scheduler.start();
        scheduler.stop();
        scheduler.start();
        assert_eq!(host.pending_frames(), 1);

        host.run_frames(2);
        assert_eq!(frames.borrow().len(), 2);
        assert_eq!(host.pending_frames(), 1);
    }

    #[test]
    fn test_handler_can_stop_its_own_loop() {
        let host = Rc::new(ManualFrameHost::new());
        let count = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<FrameScheduler>>> = Rc::new(RefCell::new(None));

        let handler_count = count.clone();
        let handler_slot = slot.clone();
        let scheduler = FrameScheduler::new(host.clone(), move |_| {
            handler_count.set(handler_count.get() + 1);
            if handler_count.get() == 2 {
                if let Some(s) = handler_slot.borrow().as_ref() {
                    s.stop();
                }
            }
        });
        *slot.borrow_mut() = Some(scheduler.clone());

        scheduler.start();
        host.run_frames(5);
        assert_eq!(count.get(), 2);
        assert_eq!(host.pending_frames(), 0);
    }
}
