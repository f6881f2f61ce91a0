/// Throttled timer - minimum interval between fires
#[derive(Debug, Clone, Copy)]
pub struct Throttled {
    min_interval: f32,
    time_since_last: f32,
}

impl Throttled {
    /// Create throttled timer with minimum interval
    pub fn new(min_interval: f32) -> Self {
        Self {
            min_interval,
            time_since_last: 0.0,
        }
    }

    /// Accumulate delta, returns true if the interval has elapsed
    pub fn try_tick(&mut self, delta: f32) -> bool {
        self.time_since_last += delta;

        if self.time_since_last >= self.min_interval {
            self.time_since_last = 0.0;
            true
        } else {
            false
        }
    }
}

/// Frames-per-second sampled over a fixed window
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    window: Throttled,
    frames: u32,
    elapsed: f32,
    fps: f32,
}

impl FpsCounter {
    pub fn new(interval: f32) -> Self {
        Self {
            window: Throttled::new(interval),
            frames: 0,
            elapsed: 0.0,
            fps: 0.0,
        }
    }

    /// Count one frame; returns the new sample when a window closes
    pub fn frame(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += delta;

        if self.window.try_tick(delta) {
            self.fps = if self.elapsed > 0.0 {
                self.frames as f32 / self.elapsed
            } else {
                0.0
            };
            self.frames = 0;
            self.elapsed = 0.0;
            Some(self.fps)
        } else {
            None
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}
