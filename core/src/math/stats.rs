use std::cmp::Ordering;

pub struct StatsHelper;

impl StatsHelper {
    /// Middle element of a sorted copy of `samples`, upper middle for even
    /// lengths. `None` for an empty slice.
    pub fn median(samples: &[f32]) -> Option<f32> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        Some(sorted[sorted.len() / 2])
    }
}
