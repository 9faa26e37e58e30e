use crate::acquisition::Rejection;
use crate::processing::{CycleOutcome, CycleReport};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Counters shared between the scheduler and whoever reports on it.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub cycles: u64,
    pub reported: u64,
    pub warm_up: u64,
    pub timeouts: u64,
    pub out_of_range: u64,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record(&self, report: &CycleReport) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.cycles += 1;
            match report.outcome {
                CycleOutcome::Rejected(Rejection::Timeout) => metrics.timeouts += 1,
                CycleOutcome::Rejected(Rejection::OutOfRange { .. }) => metrics.out_of_range += 1,
                CycleOutcome::WarmUp { .. } => {
                    metrics.warm_up += 1;
                    metrics.reported += 1;
                }
                CycleOutcome::Filtered { .. } => metrics.reported += 1,
            }
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
