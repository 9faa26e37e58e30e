pub mod echo;
pub mod gate;

pub use echo::{EchoReading, EchoSource};
pub use gate::{DistanceSample, RangeGate, Rejection};
