// SPDX-License-Identifier: MIT OR Apache-2.0
//! Deterministic frame host with a manually advanced clock.
//!
//! Useful for tests and for replaying a session frame by frame without a
//! display. Requests made while a frame is being delivered wait for the
//! next [`ManualFrameHost::run_frame`] call, as they would with a real
//! display refresh.

use crate::scheduler::{FrameCallback, FrameHost};
use crate::timeline::TimeStamp;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// Frame host driven explicitly by the caller
pub struct ManualFrameHost {
    clock: Cell<TimeStamp>,
    pending: RefCell<VecDeque<FrameCallback>>,
    frames_delivered: Cell<u64>,
}

impl ManualFrameHost {
    /// Create a host whose clock reads zero
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// Create a host whose clock starts at `time`
    pub fn starting_at(time: TimeStamp) -> Self {
        Self {
            clock: Cell::new(time),
            pending: RefCell::new(VecDeque::new()),
            frames_delivered: Cell::new(0),
        }
    }

    /// Move the clock forward by `ms`
    pub fn advance(&self, ms: f64) {
        self.clock.set(self.clock.get() + ms);
    }

    /// Set the clock to an arbitrary value, including one in the past
    pub fn set_time(&self, time: TimeStamp) {
        self.clock.set(time);
    }

    /// Number of callbacks waiting for the next frame
    pub fn pending_frames(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Number of frames delivered so far that had at least one callback
    pub fn frames_delivered(&self) -> u64 {
        self.frames_delivered.get()
    }

    /// Deliver one display frame at the current clock value
    ///
    /// Returns the number of callbacks invoked.
    pub fn run_frame(&self) -> usize {
        let batch: Vec<FrameCallback> = self.pending.borrow_mut().drain(..).collect();
        if batch.is_empty() {
            return 0;
        }

        let timestamp = self.clock.get();
        self.frames_delivered.set(self.frames_delivered.get() + 1);
        let count = batch.len();
        for callback in batch {
            callback(timestamp);
        }
        count
    }

    /// Deliver `frames` display frames without moving the clock
    ///
    /// Returns the total number of callbacks invoked.
    pub fn run_frames(&self, frames: usize) -> usize {
        (0..frames).map(|_| self.run_frame()).sum()
    }

    /// Deliver frames, advancing the clock by `interval` before each one
    ///
    /// Stops early once nothing is pending. Returns the number of frames
    /// that delivered callbacks.
    pub fn run_paced(&self, interval: f64, max_frames: usize) -> usize {
        let mut delivered = 0;
        for _ in 0..max_frames {
            if self.pending_frames() == 0 {
                break;
            }
            self.advance(interval);
            self.run_frame();
            delivered += 1;
        }
        delivered
    }
}

impl Default for ManualFrameHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameHost for ManualFrameHost {
    fn request_frame(&self, callback: FrameCallback) {
        self.pending.borrow_mut().push_back(callback);
    }

    fn now(&self) -> TimeStamp {
        self.clock.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_clock() {
        let host = ManualFrameHost::starting_at(100.0);
        host.advance(16.5);
        assert_eq!(host.now(), 116.5);
        host.set_time(50.0);
        assert_eq!(host.now(), 50.0);
    }

    #[test]
    fn test_requests_during_frame_wait() {
        let host = Rc::new(ManualFrameHost::new());
        let hits = Rc::new(Cell::new(0));

        let inner_host = host.clone();
        let inner_hits = hits.clone();
        host.request_frame(Box::new(move |_| {
            inner_hits.set(inner_hits.get() + 1);
            let again = inner_hits.clone();
            inner_host.request_frame(Box::new(move |_| again.set(again.get() + 1)));
        }));

        assert_eq!(host.run_frame(), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(host.pending_frames(), 1);

        assert_eq!(host.run_frame(), 1);
        assert_eq!(hits.get(), 2);
        assert_eq!(host.run_frame(), 0);
        assert_eq!(host.frames_delivered(), 2);
    }

    #[test]
    fn test_run_paced_stops_when_idle() {
        let host = ManualFrameHost::new();
        host.request_frame(Box::new(|_| {}));
        assert_eq!(host.run_paced(10.0, 5), 1);
        assert_eq!(host.now(), 10.0);
    }
}
