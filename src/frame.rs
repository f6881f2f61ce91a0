/// Frame metadata handed to the rasterizer: frame number and timing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Seconds since the scene was mounted
    pub time: f32,
    /// Seconds since the previous frame
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }

    /// Next frame at time `time`, with the delta taken from this one
    pub fn next(&self, time: f32) -> Self {
        Self {
            number: self.number + 1,
            time,
            delta: (time - self.time).max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_frame() {
        let first = FrameInfo::new(0, 0.0, 0.0);
        let second = first.next(0.016);
        assert_eq!(second.number, 1);
        assert!((second.delta - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_delta_never_negative() {
        let frame = FrameInfo::new(4, 2.0, 0.0).next(1.0);
        assert_eq!(frame.delta, 0.0);
        assert_eq!(frame.time, 1.0);
    }
}
