use std::time::Instant;

/// Elapsed-time clock for one mounted scene
///
/// Starts at zero when created, only moves forward, and is reset only when the scene
/// is mounted again. Readers get the time passed in; nothing reads it globally.
#[derive(Debug)]
pub struct Clock {
    start: Instant,
    last_tick: Instant,
}

impl Clock {
    /// Create new clock starting now
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
        }
    }

    /// Seconds since the clock started
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    /// Advance the clock, returning `(elapsed, delta)` in seconds
    pub fn tick(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        (now.duration_since(self.start).as_secs_f32(), delta)
    }

    /// Restart from zero
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.start = now;
        self.last_tick = now;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
