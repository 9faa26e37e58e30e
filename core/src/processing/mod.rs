pub mod median;
pub mod pipeline;
pub mod smoother;

pub use median::MedianWindow;
pub use pipeline::{BilgePipeline, CycleOutcome, CycleReport, PipelinePhase};
pub use smoother::ExponentialSmoother;
