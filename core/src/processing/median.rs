use crate::acquisition::DistanceSample;
use crate::math::stats::StatsHelper;

/// Fixed-capacity ring of the most recent admitted samples.
///
/// Fullness is tracked with its own flag: after the first wrap the cursor is
/// back at zero, same as for an empty window.
#[derive(Debug, Clone)]
pub struct MedianWindow {
    slots: Vec<f32>,
    cursor: usize,
    len: usize,
    filled: bool,
}

impl MedianWindow {
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "median window needs at least one slot");
        Self {
            slots: vec![0.0; capacity],
            cursor: 0,
            len: 0,
            filled: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// Overwrites the oldest slot once the window has wrapped.
    pub fn push(&mut self, sample: DistanceSample) {
        self.slots[self.cursor] = sample.centimeters();
        self.cursor = (self.cursor + 1) % self.slots.len();
        if self.len < self.slots.len() {
            self.len += 1;
        }
        if self.cursor == 0 {
            self.filled = true;
        }
    }

    /// Stored samples in slot order, not arrival order.
    pub fn samples(&self) -> &[f32] {
        &self.slots[..self.len]
    }

    /// Median of the whole window; `None` until it has filled.
    pub fn median(&self) -> Option<f32> {
        if !self.filled {
            return None;
        }
        StatsHelper::median(&self.slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::{EchoReading, RangeGate};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn sample(value: f32) -> DistanceSample {
        // speed 2.0 maps micros straight to centimetres
        RangeGate::new(0.0, 10_000.0, 2.0)
            .acquire(EchoReading::round_trip(value as u32))
            .unwrap()
    }

    fn reference_median(values: &[f32]) -> f32 {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        sorted[sorted.len() / 2]
    }

    #[test]
    #[should_panic]
    fn zero_capacity_window_is_refused() {
        let mut window = MedianWindow::new(0);
        window.push(sample(100.0));
    }

    #[test]
    fn fills_on_exactly_the_nth_push() {
        let mut window = MedianWindow::new(5);
        for i in 0..4 {
            window.push(sample(100.0 + i as f32));
            assert!(!window.is_filled());
            assert_eq!(window.median(), None);
        }
        window.push(sample(104.0));
        assert!(window.is_filled());
        assert_eq!(window.len(), 5);
        assert_eq!(window.median(), Some(102.0));
    }

    #[test]
    fn stays_filled_after_wrapping() {
        let mut window = MedianWindow::new(3);
        for value in [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0] {
            window.push(sample(value));
        }
        assert!(window.is_filled());
        assert_eq!(window.len(), 3);
        // 70 overwrote slot 0, 50 and 60 sit in slots 1 and 2
        assert_eq!(window.samples(), &[70.0, 50.0, 60.0]);
        assert_eq!(window.median(), Some(60.0));
    }

    #[test]
    fn rejects_isolated_spike() {
        let mut window = MedianWindow::new(7);
        for value in [100.0, 101.0, 99.0, 350.0, 100.0, 102.0, 98.0] {
            window.push(sample(value));
        }
        assert_eq!(window.median(), Some(100.0));
    }

    #[test]
    fn all_equal_and_monotonic_windows() {
        let mut flat = MedianWindow::new(7);
        let mut rising = MedianWindow::new(7);
        let mut falling = MedianWindow::new(7);
        for i in 0..7 {
            flat.push(sample(42.0));
            rising.push(sample(10.0 + i as f32));
            falling.push(sample(90.0 - i as f32));
        }
        assert_eq!(flat.median(), Some(42.0));
        assert_eq!(rising.median(), Some(13.0));
        assert_eq!(falling.median(), Some(87.0));
    }

    #[test]
    fn median_matches_reference_sort_for_random_windows() {
        let mut rng = StdRng::seed_from_u64(7);
        for capacity in [3, 5, 7, 9, 15] {
            let mut window = MedianWindow::new(capacity);
            let mut history = Vec::new();
            for _ in 0..200 {
                let value = rng.gen_range(20..400) as f32;
                window.push(sample(value));
                history.push(value);
                if history.len() >= capacity {
                    let recent = &history[history.len() - capacity..];
                    assert_eq!(window.median(), Some(reference_median(recent)));
                } else {
                    assert_eq!(window.median(), None);
                }
            }
        }
    }
}
