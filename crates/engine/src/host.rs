use std::time::Duration;

/// The host environment the engine runs inside: its clock, its idle wait
/// while assets load, and its frame presentation.
pub trait FrameHost<O> {
    /// Current host time in seconds.
    fn now(&mut self) -> f64;

    /// Idle while assets load. Return false to give up waiting.
    fn wait(&mut self, interval: Duration) -> bool;

    /// Show a finished frame. Return false to stop the loop.
    fn present(&mut self, frame: Option<O>) -> bool;
}

/// Deterministic host: time advances by a fixed step per frame and by the
/// requested interval per wait. Stops after `max_frames` frames.
#[derive(Debug)]
pub struct FixedStepHost<O> {
    time: f64,
    step: f64,
    max_frames: u64,
    max_waits: u64,
    frames: u64,
    waits: u64,
    last_frame: Option<O>,
}

impl<O> FixedStepHost<O> {
    pub fn new(step: Duration, max_frames: u64) -> Self {
        Self {
            time: 0.0,
            step: step.as_secs_f64(),
            max_frames,
            max_waits: u64::MAX,
            frames: 0,
            waits: 0,
            last_frame: None,
        }
    }

    /// Give up after this many asset waits.
    pub fn with_max_waits(mut self, max_waits: u64) -> Self {
        self.max_waits = max_waits;
        self
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn waits(&self) -> u64 {
        self.waits
    }

    /// The most recently presented frame, if it carried output.
    pub fn last_frame(&self) -> Option<&O> {
        self.last_frame.as_ref()
    }

    pub fn into_last_frame(self) -> Option<O> {
        self.last_frame
    }
}

impl<O> FrameHost<O> for FixedStepHost<O> {
    fn now(&mut self) -> f64 {
        self.time
    }

    fn wait(&mut self, interval: Duration) -> bool {
        self.time += interval.as_secs_f64();
        self.waits += 1;
        self.waits < self.max_waits
    }

    fn present(&mut self, frame: Option<O>) -> bool {
        self.frames += 1;
        self.time += self.step;
        if frame.is_some() {
            self.last_frame = frame;
        }
        self.frames < self.max_frames
    }
}
