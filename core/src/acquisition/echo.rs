use serde::{Deserialize, Serialize};

/// One round-trip timing as reported by the transducer driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EchoReading {
    /// Echo pulse width in microseconds.
    RoundTrip { micros: u32 },
    /// No echo arrived within the listening budget.
    Timeout,
}

impl EchoReading {
    pub fn round_trip(micros: u32) -> Self {
        Self::RoundTrip { micros }
    }
}

impl From<Option<u32>> for EchoReading {
    fn from(value: Option<u32>) -> Self {
        match value {
            Some(micros) => Self::RoundTrip { micros },
            None => Self::Timeout,
        }
    }
}

/// Anything able to fire the transducer and time the echo.
///
/// Implementations may block for up to the configured echo timeout, but must
/// return before the next cycle is due.
pub trait EchoSource {
    fn sample(&mut self) -> EchoReading;
}

impl<F> EchoSource for F
where
    F: FnMut() -> EchoReading,
{
    fn sample(&mut self) -> EchoReading {
        self()
    }
}
