/// Measures elapsed time between display refreshes.
///
/// Delta is measured, never assumed: a slow frame simply produces a larger
/// delta on the next tick.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Last observed timestamp in seconds. `None` before the first frame.
    last: Option<f64>,
    /// Delta produced by the most recent tick, in seconds.
    delta: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a host timestamp in milliseconds and return the delta in seconds.
    /// The very first tick returns zero. A timestamp that goes backwards yields zero.
    pub fn tick(&mut self, timestamp_ms: f64) -> f32 {
        let now = timestamp_ms / 1000.0;
        let delta = match self.last {
            Some(last) => (now - last).max(0.0) as f32,
            None => 0.0,
        };
        self.last = Some(now);
        self.delta = delta;
        delta
    }

    /// Delta of the most recent tick in seconds.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Instantaneous frames per second, or `None` when the last delta was zero.
    pub fn fps(&self) -> Option<f32> {
        if self.delta > 0.0 {
            Some(1.0 / self.delta)
        } else {
            None
        }
    }

    /// Whether at least one frame has been observed.
    pub fn has_started(&self) -> bool {
        self.last.is_some()
    }
}
