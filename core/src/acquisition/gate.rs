use crate::acquisition::echo::EchoReading;
use crate::prelude::PipelineConfig;

/// A distance in centimetres that passed the range gate.
///
/// Only [`RangeGate`] creates these, so every sample that reaches the median
/// window lies inside the configured bounds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DistanceSample(f32);

impl DistanceSample {
    pub fn centimeters(self) -> f32 {
        self.0
    }
}

/// Why a reading never became a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    Timeout,
    OutOfRange { distance_cm: f32 },
}

/// Converts echo timings into distances and drops anything physically
/// implausible. Bounds are inclusive on both ends.
#[derive(Debug, Clone)]
pub struct RangeGate {
    min_cm: f32,
    max_cm: f32,
    speed_cm_per_us: f32,
}

impl RangeGate {
    pub fn new(min_cm: f32, max_cm: f32, speed_cm_per_us: f32) -> Self {
        Self {
            min_cm,
            max_cm,
            speed_cm_per_us,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.min_distance_cm,
            config.max_distance_cm,
            config.sound_speed_cm_per_us,
        )
    }

    /// One-way distance for a round-trip pulse width.
    pub fn distance_cm(&self, micros: u32) -> f32 {
        micros as f32 * self.speed_cm_per_us / 2.0
    }

    pub fn classify(&self, reading: EchoReading) -> Result<DistanceSample, Rejection> {
        let micros = match reading {
            EchoReading::RoundTrip { micros } => micros,
            EchoReading::Timeout => return Err(Rejection::Timeout),
        };

        let distance_cm = self.distance_cm(micros);
        if distance_cm < self.min_cm || distance_cm > self.max_cm {
            return Err(Rejection::OutOfRange { distance_cm });
        }
        Ok(DistanceSample(distance_cm))
    }

    pub fn acquire(&self, reading: EchoReading) -> Option<DistanceSample> {
        self.classify(reading).ok()
    }
}
