use bilgecore::{EchoReading, EchoSource, PipelineConfig};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Shape of the synthetic echo stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EchoProfile {
    /// True distance from transducer to water surface.
    pub air_gap_cm: f32,
    /// Uniform measurement noise, +/- this many centimetres.
    pub jitter_cm: f32,
    /// Chance that a reading is a multipath spike instead of the true echo.
    pub glitch_probability: f64,
    /// Largest spike offset; spikes land anywhere within +/- this.
    pub glitch_cm: f32,
    pub timeout_probability: f64,
    /// Water level change per cycle, negative while the bilge fills.
    pub drift_cm_per_cycle: f32,
    pub seed: u64,
}

impl Default for EchoProfile {
    fn default() -> Self {
        Self {
            air_gap_cm: 85.0,
            jitter_cm: 0.8,
            glitch_probability: 0.05,
            glitch_cm: 150.0,
            timeout_probability: 0.02,
            drift_cm_per_cycle: 0.0,
            seed: 0,
        }
    }
}

/// Seeded stand-in for the transducer driver.
///
/// Like the real driver it stops listening after the configured echo
/// timeout, so anything farther away reads as [`EchoReading::Timeout`].
pub struct SimulatedEcho {
    profile: EchoProfile,
    sound_speed_cm_per_us: f32,
    echo_timeout_us: u64,
    air_gap_cm: f32,
    rng: StdRng,
}

impl SimulatedEcho {
    pub fn new(profile: EchoProfile, pipeline: &PipelineConfig) -> Self {
        let echo_timeout_us =
            u64::try_from(pipeline.echo_timeout().as_micros()).unwrap_or(u64::MAX);
        Self {
            air_gap_cm: profile.air_gap_cm,
            rng: StdRng::seed_from_u64(profile.seed),
            sound_speed_cm_per_us: pipeline.sound_speed_cm_per_us,
            echo_timeout_us,
            profile,
        }
    }

    #[cfg(test)]
    pub fn air_gap_cm(&self) -> f32 {
        self.air_gap_cm
    }

    fn round_trip_micros(&self, distance_cm: f32) -> u32 {
        (2.0 * distance_cm.max(0.0) / self.sound_speed_cm_per_us).round() as u32
    }

    fn offset(&mut self, spread: f32) -> f32 {
        if spread > 0.0 {
            self.rng.gen_range(-spread..=spread)
        } else {
            0.0
        }
    }
}

impl EchoSource for SimulatedEcho {
    fn sample(&mut self) -> EchoReading {
        self.air_gap_cm += self.profile.drift_cm_per_cycle;

        if self.rng.gen_bool(self.profile.timeout_probability.clamp(0.0, 1.0)) {
            return EchoReading::Timeout;
        }

        let mut distance_cm = self.air_gap_cm + self.offset(self.profile.jitter_cm);
        if self.rng.gen_bool(self.profile.glitch_probability.clamp(0.0, 1.0)) {
            distance_cm += self.offset(self.profile.glitch_cm);
        }
        let micros = self.round_trip_micros(distance_cm);
        if u64::from(micros) > self.echo_timeout_us {
            return EchoReading::Timeout;
        }
        EchoReading::round_trip(micros)
    }
}
