use std::collections::VecDeque;

use pixel_filters::pack;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::TestPattern;
use crate::frame::{Frame, FrameSource};
use crate::models::SensorConfig;

const BARS: [(u8, u8, u8); 8] = [
    (255, 255, 255),
    (255, 255, 0),
    (0, 255, 255),
    (0, 255, 0),
    (255, 0, 255),
    (255, 0, 0),
    (0, 0, 255),
    (0, 0, 0),
];

/// A sensor that renders a synthetic pattern on every capture.
#[derive(Debug)]
pub struct PatternSensor {
    width: usize,
    height: usize,
    pattern: TestPattern,
    rng: StdRng,
    captures: u64,
    releases: u64,
    failures: u64,
    fail_remaining: usize,
}

impl PatternSensor {
    pub fn new(width: usize, height: usize, pattern: TestPattern) -> Self {
        Self::with_seed(width, height, pattern, 0)
    }

    pub fn with_seed(width: usize, height: usize, pattern: TestPattern, seed: u64) -> Self {
        Self {
            width,
            height,
            pattern,
            rng: StdRng::seed_from_u64(seed),
            captures: 0,
            releases: 0,
            failures: 0,
            fail_remaining: 0,
        }
    }

    pub fn from_config(config: &SensorConfig) -> Self {
        Self::with_seed(config.width, config.height, config.pattern, config.seed)
    }

    /// Make the next `count` captures fail.
    pub fn fail_next(&mut self, count: usize) {
        self.fail_remaining = count;
    }

    pub fn captures(&self) -> u64 {
        self.captures
    }

    pub fn releases(&self) -> u64 {
        self.releases
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Frames captured and not yet released.
    pub fn outstanding(&self) -> u64 {
        self.captures - self.releases
    }

    fn render(&mut self) -> Vec<u16> {
        let (w, h) = (self.width, self.height);
        let mut pixels = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                let pixel = match self.pattern {
                    TestPattern::ColorBars => {
                        let (r, g, b) = BARS[x * BARS.len() / w];
                        pack(r, g, b)
                    }
                    TestPattern::Gradient => {
                        let r = (x * 255 / w.saturating_sub(1).max(1)) as u8;
                        let g = (y * 255 / h.saturating_sub(1).max(1)) as u8;
                        pack(r, g, 255 - r)
                    }
                    TestPattern::Noise => self.rng.gen(),
                    TestPattern::Checkerboard => {
                        if (x / 8 + y / 8) % 2 == 0 {
                            0xFFFF
                        } else {
                            0x0000
                        }
                    }
                };
                pixels.push(pixel);
            }
        }
        pixels
    }
}

impl FrameSource for PatternSensor {
    fn capture(&mut self) -> Option<Frame> {
        if self.fail_remaining > 0 {
            self.fail_remaining -= 1;
            self.failures += 1;
            return None;
        }
        self.captures += 1;
        let pixels = self.render();
        Some(Frame::new(self.width, self.height, pixels))
    }

    fn release(&mut self, _frame: Frame) {
        self.releases += 1;
    }
}

/// Hands out prepared frames in order and keeps what comes back.
#[derive(Debug, Default)]
pub struct QueueSource {
    frames: VecDeque<Frame>,
    released: Vec<Frame>,
}

impl QueueSource {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into(),
            released: Vec::new(),
        }
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push_back(frame);
    }

    pub fn released(&self) -> &[Frame] {
        &self.released
    }
}

impl FrameSource for QueueSource {
    fn capture(&mut self) -> Option<Frame> {
        self.frames.pop_front()
    }

    fn release(&mut self, frame: Frame) {
        self.released.push(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameGuard;
    use pixel_filters::unpack;

    #[test]
    fn test_color_bars() {
        let mut sensor = PatternSensor::new(16, 2, TestPattern::ColorBars);
        let frame = sensor.capture().unwrap();
        assert_eq!(frame.pixels()[0], 0xFFFF);
        assert_eq!(frame.pixels()[15], 0x0000);
        assert_eq!(unpack(frame.pixels()[10]), (248, 0, 0));
    }

    #[test]
    fn test_gradient_corners() {
        let mut sensor = PatternSensor::new(4, 4, TestPattern::Gradient);
        let frame = sensor.capture().unwrap();
        assert_eq!(unpack(frame.pixels()[0]), (0, 0, 248));
        assert_eq!(unpack(frame.pixels()[15]), (248, 252, 0));
    }

    #[test]
    fn test_noise_is_seeded() {
        let mut a = PatternSensor::with_seed(8, 8, TestPattern::Noise, 7);
        let mut b = PatternSensor::with_seed(8, 8, TestPattern::Noise, 7);
        let (fa, fb) = (a.capture().unwrap(), b.capture().unwrap());
        assert_eq!(fa, fb);
        assert_ne!(fa, a.capture().unwrap());
    }

    #[test]
    fn test_injected_failures() {
        let mut sensor = PatternSensor::new(4, 4, TestPattern::Checkerboard);
        sensor.fail_next(2);
        assert!(sensor.capture().is_none());
        assert!(sensor.capture().is_none());
        assert!(sensor.capture().is_some());
        assert_eq!(sensor.failures(), 2);
        assert_eq!(sensor.captures(), 1);
    }

    #[test]
    fn test_guard_balances_counts() {
        let mut sensor = PatternSensor::new(4, 4, TestPattern::Gradient);
        for _ in 0..3 {
            let _guard = FrameGuard::acquire(&mut sensor).unwrap();
        }
        assert_eq!(sensor.outstanding(), 0);
        assert_eq!(sensor.releases(), 3);
    }

    #[test]
    fn test_queue_source_order() {
        let mut source = QueueSource::new(vec![Frame::filled(1, 1, 1), Frame::filled(1, 1, 2)]);
        let first = source.capture().unwrap();
        source.release(first);
        assert_eq!(source.capture().map(|f| f.pixels()[0]), Some(2));
        assert!(source.capture().is_none());
        assert_eq!(source.released().len(), 1);
    }
}
