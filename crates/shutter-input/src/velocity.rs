//! Release-velocity estimation for flick detection.
//!
//! Impulse-strategy tracker: velocity is derived from the kinetic energy the
//! recent samples would have imparted, which is far more robust against
//! sensor jitter than a two-point difference quotient.

use shutter_geometry::Point;

const HISTORY_SIZE: usize = 20;

/// Samples older than this are ignored when estimating velocity.
const HORIZON_MS: i64 = 100;

/// A gap this long between samples means the finger stopped moving.
const ASSUME_STOPPED_MS: i64 = 40;

#[derive(Clone, Copy, Default)]
struct TimedValue {
    time_ms: i64,
    value: f32,
}

/// Single-axis velocity tracker over absolute positions.
#[derive(Clone)]
pub struct VelocityTracker1d {
    samples: [Option<TimedValue>; HISTORY_SIZE],
    index: usize,
}

impl Default for VelocityTracker1d {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker1d {
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
        }
    }

    pub fn add_sample(&mut self, timestamp_ms: u64, value: f32) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(TimedValue {
            time_ms: timestamp_ms as i64,
            value,
        });
    }

    /// Estimated velocity in units/second. Zero when fewer than two usable
    /// samples exist or the pointer has stopped.
    pub fn velocity(&self) -> f32 {
        let mut values = [0.0f32; HISTORY_SIZE];
        let mut times = [0.0f32; HISTORY_SIZE];
        let mut count = 0;

        let newest = match self.samples[self.index] {
            Some(sample) => sample,
            None => return 0.0,
        };

        let mut current = self.index;
        let mut previous = newest;
        while let Some(sample) = self.samples[current] {
            let age = (newest.time_ms - sample.time_ms) as f32;
            let gap = (sample.time_ms - previous.time_ms).abs() as f32;
            previous = newest;

            if age > HORIZON_MS as f32 || gap > ASSUME_STOPPED_MS as f32 {
                break;
            }

            values[count] = sample.value;
            times[count] = -age;
            current = if current == 0 { HISTORY_SIZE - 1 } else { current - 1 };
            count += 1;
            if count >= HISTORY_SIZE {
                break;
            }
        }

        if count < 2 {
            return 0.0;
        }
        impulse_velocity(&values, &times, count) * 1000.0
    }

    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }
}

/// Two-axis tracker over pointer positions.
#[derive(Clone, Default)]
pub struct VelocityTracker2d {
    x: VelocityTracker1d,
    y: VelocityTracker1d,
}

impl VelocityTracker2d {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sample(&mut self, timestamp_ms: u64, position: Point) {
        self.x.add_sample(timestamp_ms, position.x);
        self.y.add_sample(timestamp_ms, position.y);
    }

    /// Velocity vector in px/second.
    pub fn velocity(&self) -> Point {
        Point::new(self.x.velocity(), self.y.velocity())
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}

fn impulse_velocity(values: &[f32; HISTORY_SIZE], times: &[f32; HISTORY_SIZE], count: usize) -> f32 {
    if count < 2 {
        return 0.0;
    }

    let mut work = 0.0f32;
    let start = count - 1;
    let mut next_time = times[start];

    for i in (1..=start).rev() {
        let current_time = next_time;
        next_time = times[i - 1];
        if current_time == next_time {
            continue;
        }

        let delta = values[i] - values[i - 1];
        let v_curr = delta / (current_time - next_time);
        let v_prev = energy_to_velocity(work);
        work += (v_curr - v_prev) * v_curr.abs();
        if i == start {
            work *= 0.5;
        }
    }

    energy_to_velocity(work)
}

// E = 0.5 * m * v^2 with unit mass, sign carried through.
#[inline]
fn energy_to_velocity(energy: f32) -> f32 {
    energy.signum() * (2.0 * energy.abs()).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tracker_is_stationary() {
        assert_eq!(VelocityTracker1d::new().velocity(), 0.0);
    }

    #[test]
    fn single_sample_is_stationary() {
        let mut tracker = VelocityTracker1d::new();
        tracker.add_sample(0, 100.0);
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn constant_motion() {
        let mut tracker = VelocityTracker1d::new();
        // 100 px per 10 ms = 10 000 px/s.
        for i in 0..4u64 {
            tracker.add_sample(i * 10, (i * 100) as f32);
        }
        let v = tracker.velocity();
        assert!((v - 10_000.0).abs() < 1_000.0, "expected ~10000, got {v}");
    }

    #[test]
    fn downward_motion_is_negative() {
        let mut tracker = VelocityTracker1d::new();
        tracker.add_sample(0, 300.0);
        tracker.add_sample(10, 200.0);
        tracker.add_sample(20, 100.0);
        assert!(tracker.velocity() < 0.0);
    }

    #[test]
    fn long_pause_means_stopped() {
        let mut tracker = VelocityTracker1d::new();
        tracker.add_sample(0, 0.0);
        tracker.add_sample(ASSUME_STOPPED_MS as u64 + 1, 100.0);
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn reset_discards_history() {
        let mut tracker = VelocityTracker1d::new();
        tracker.add_sample(0, 0.0);
        tracker.add_sample(10, 100.0);
        tracker.reset();
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn two_axis_tracking() {
        let mut tracker = VelocityTracker2d::new();
        for i in 0..4u64 {
            tracker.add_sample(i * 10, Point::new(0.0, (i * 50) as f32));
        }
        let v = tracker.velocity();
        assert_eq!(v.x, 0.0);
        assert!(v.y > 3_000.0, "expected fast downward flick, got {}", v.y);
    }
}
