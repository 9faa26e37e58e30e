//! Signal K flavoured output model for the height estimate.

pub mod delta;
pub mod sink;

pub use delta::{
    HeightDelta, HeightMetadata, DEFAULT_SOURCE_LABEL, HEIGHT_DESCRIPTION, HEIGHT_PATH,
    HEIGHT_UNITS,
};
pub use sink::{SinkError, TelemetrySink};
