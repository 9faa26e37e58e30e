use crate::signalk::delta::HeightDelta;

#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// Downstream consumer of one delta per cycle.
pub trait TelemetrySink {
    fn publish(&mut self, delta: &HeightDelta) -> Result<(), SinkError>;
}

/// Keeps every published delta, in order.
impl TelemetrySink for Vec<HeightDelta> {
    fn publish(&mut self, delta: &HeightDelta) -> Result<(), SinkError> {
        self.push(delta.clone());
        Ok(())
    }
}
