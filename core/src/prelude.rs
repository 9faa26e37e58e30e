use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Round-trip listening time per centimetre of range, in microseconds.
pub const ECHO_MICROS_PER_CM: u64 = 58;

/// How the exponential smoother picks its state before the first update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SmootherSeed {
    /// Seed with the first median the smoother sees, so it starts without a
    /// transient.
    #[default]
    FirstMedian,
    /// Seed with a fixed value. `Fixed(0.0)` ramps up from zero.
    Fixed(f32),
}

/// Shared configuration for the acquisition gate and the filter chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub min_distance_cm: f32,
    pub max_distance_cm: f32,
    pub sound_speed_cm_per_us: f32,
    pub window_size: usize,
    pub alpha: f32,
    pub seed: SmootherSeed,
    pub sample_interval_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_distance_cm: 20.0,
            max_distance_cm: 400.0,
            sound_speed_cm_per_us: 0.0343,
            window_size: 7,
            alpha: 0.3,
            seed: SmootherSeed::FirstMedian,
            sample_interval_ms: 1000,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.window_size < 3 || self.window_size % 2 == 0 {
            return Err(ConfigError::WindowSize(self.window_size));
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(ConfigError::Alpha(self.alpha));
        }
        if !self.min_distance_cm.is_finite() || self.min_distance_cm < 0.0 {
            return Err(ConfigError::MinDistance(self.min_distance_cm));
        }
        if !self.max_distance_cm.is_finite() || self.max_distance_cm < self.min_distance_cm {
            return Err(ConfigError::DistanceBounds {
                min: self.min_distance_cm,
                max: self.max_distance_cm,
            });
        }
        if !self.sound_speed_cm_per_us.is_finite() || self.sound_speed_cm_per_us <= 0.0 {
            return Err(ConfigError::SoundSpeed(self.sound_speed_cm_per_us));
        }
        if self.sample_interval_ms == 0 {
            return Err(ConfigError::SampleInterval);
        }
        if let SmootherSeed::Fixed(seed) = self.seed {
            if !seed.is_finite() {
                return Err(ConfigError::Seed(seed));
            }
        }
        Ok(())
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    /// Listening budget for the timing driver: an echo that has not returned
    /// within this time cannot come from inside the valid range.
    pub fn echo_timeout(&self) -> Duration {
        let range_cm = self.max_distance_cm.ceil() as u64;
        Duration::from_micros(range_cm.saturating_mul(ECHO_MICROS_PER_CM))
    }
}

/// Rejected configuration values. Only raised when a pipeline is built.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("window size must be odd and at least 3, got {0}")]
    WindowSize(usize),
    #[error("smoothing factor must lie in (0, 1], got {0}")]
    Alpha(f32),
    #[error("minimum distance must be finite and non-negative, got {0}")]
    MinDistance(f32),
    #[error("distance bounds are inverted or not finite: min {min}, max {max}")]
    DistanceBounds { min: f32, max: f32 },
    #[error("sound speed must be finite and positive, got {0}")]
    SoundSpeed(f32),
    #[error("sample interval must be non-zero")]
    SampleInterval,
    #[error("fixed smoother seed must be finite, got {0}")]
    Seed(f32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
