use std::time::Duration;

/// Frame-scoped time values handed to behaviours.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous tick.
    pub delta: f32,
    /// Seconds since the engine started.
    pub elapsed: f64,
    /// Number of the tick being run, starting at 1.
    pub frame: u64,
}

/// Tracks host time across ticks.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    start: f64,
    last: f64,
    current: FrameTime,
}

impl FrameClock {
    /// Reset so the first tick measures from `now`.
    pub fn start(&mut self, now: f64) {
        self.start = now;
        self.last = now;
        self.current = FrameTime::default();
    }

    /// Move to `now` and return the new frame time. A host clock running
    /// backwards yields a zero delta.
    pub fn advance(&mut self, now: f64) -> FrameTime {
        let delta = (now - self.last).max(0.0);
        self.last = self.last.max(now);
        self.current = FrameTime {
            delta: delta as f32,
            elapsed: self.last - self.start,
            frame: self.current.frame + 1,
        };
        self.current
    }

    pub fn current(&self) -> FrameTime {
        self.current
    }
}

/// Rolling window of recent frame deltas.
#[derive(Debug)]
pub struct FrameTimer {
    history: Vec<Duration>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: vec![Duration::ZERO; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    pub fn count(&self) -> usize {
        if self.filled { self.capacity } else { self.index }
    }

    pub fn average(&self) -> Duration {
        let count = self.count();
        if count == 0 {
            return Duration::ZERO;
        }
        self.history[..count].iter().sum::<Duration>() / count as u32
    }

    pub fn max(&self) -> Duration {
        self.history[..self.count()]
            .iter()
            .copied()
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Frames per second implied by the average delta, or zero.
    pub fn fps(&self) -> f32 {
        let avg = self.average().as_secs_f32();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }
}
