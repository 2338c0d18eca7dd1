// SPDX-License-Identifier: MIT OR Apache-2.0
//! Real-time frame host for headless playback.
//!
//! Stands in for a display refresh loop: callbacks requested by the
//! timeline are queued and delivered once per frame interval, with the
//! wall-clock time measured when the frame starts.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use twisty_player_timeline::{FrameCallback, FrameHost, TimeStamp};

/// Frame host paced by the system clock
pub struct PacedFrameHost {
    origin: Instant,
    frame_interval: Duration,
    next_frame: Cell<Instant>,
    pending: RefCell<VecDeque<FrameCallback>>,
}

impl PacedFrameHost {
    /// Create a host delivering frames every `frame_interval`
    pub fn new(frame_interval: Duration) -> Self {
        let origin = Instant::now();
        Self {
            origin,
            frame_interval,
            next_frame: Cell::new(origin + frame_interval),
            pending: RefCell::new(VecDeque::new()),
        }
    }

    /// Number of callbacks waiting for the next frame
    pub fn pending_frames(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Wait for the next frame boundary and deliver pending callbacks
    ///
    /// Returns the number of callbacks invoked.
    pub fn run_frame(&self) -> usize {
        self.wait_for_frame();

        let batch: Vec<FrameCallback> = self.pending.borrow_mut().drain(..).collect();
        let timestamp = self.now();
        let count = batch.len();
        for callback in batch {
            callback(timestamp);
        }
        count
    }

    /// Deliver `frames` display frames
    pub fn run_frames(&self, frames: u32) -> usize {
        (0..frames).map(|_| self.run_frame()).sum()
    }

    /// Deliver frames until nothing is pending, up to `max_frames`
    ///
    /// Returns the number of frames delivered.
    pub fn run_until_idle(&self, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && self.pending_frames() > 0 {
            self.run_frame();
            frames += 1;
        }
        if frames == max_frames && self.pending_frames() > 0 {
            tracing::warn!(frames, "Timeline still running after frame limit");
        }
        frames
    }

    fn wait_for_frame(&self) {
        let now = Instant::now();
        let deadline = self.next_frame.get();
        if deadline > now {
            std::thread::sleep(deadline - now);
            self.next_frame.set(deadline + self.frame_interval);
        } else {
            // Fell behind; resynchronize instead of bursting frames
            self.next_frame.set(now + self.frame_interval);
        }
    }
}

impl FrameHost for PacedFrameHost {
    fn request_frame(&self, callback: FrameCallback) {
        self.pending.borrow_mut().push_back(callback);
    }

    fn now(&self) -> TimeStamp {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_delivers_with_advancing_time() {
        let host = Rc::new(PacedFrameHost::new(Duration::from_millis(2)));
        let stamps = Rc::new(RefCell::new(Vec::new()));

        for _ in 0..2 {
            let sink = stamps.clone();
            host.request_frame(Box::new(move |ts| sink.borrow_mut().push(ts)));
            assert_eq!(host.run_frame(), 1);
        }

        let stamps = stamps.borrow();
        assert_eq!(stamps.len(), 2);
        assert!(stamps[1] > stamps[0]);
        assert!(stamps[0] >= 2.0);
    }

    #[test]
    fn test_run_until_idle_without_work() {
        let host = PacedFrameHost::new(Duration::from_millis(1));
        assert_eq!(host.run_until_idle(10), 0);
    }
}
