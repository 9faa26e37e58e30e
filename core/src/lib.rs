//! Signal pipeline for the ultrasonic bilge air-gap sensor.
//!
//! Raw echo timings are range-gated into distance samples, pushed through a
//! sliding-window median and smoothed exponentially into one height estimate
//! per sampling interval.

pub mod acquisition;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod signalk;
pub mod telemetry;

pub use acquisition::{DistanceSample, EchoReading, EchoSource, RangeGate};
pub use prelude::{ConfigError, PipelineConfig, SmootherSeed};
pub use processing::{BilgePipeline, CycleReport, PipelinePhase};
