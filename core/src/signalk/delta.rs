use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const HEIGHT_PATH: &str = "environment.bilge.height";
pub const HEIGHT_UNITS: &str = "cm";
pub const HEIGHT_DESCRIPTION: &str = "Height above bilge water";
pub const DEFAULT_SOURCE_LABEL: &str = "sensesp-bilge-sensor";

const SELF_CONTEXT: &str = "vessels.self";

/// Unit and label announced once for the height channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightMetadata {
    pub units: String,
    pub description: String,
}

impl Default for HeightMetadata {
    fn default() -> Self {
        Self {
            units: HEIGHT_UNITS.to_string(),
            description: HEIGHT_DESCRIPTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathValue {
    pub path: String,
    /// `null` on the wire when the cycle produced no reading.
    pub value: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub source: Source,
    pub timestamp: String,
    pub values: Vec<PathValue>,
}

/// One cycle's estimate wrapped as a Signal K delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightDelta {
    pub context: String,
    pub updates: Vec<Update>,
}

impl HeightDelta {
    pub fn new(source_label: &str, path: &str, height_cm: Option<f32>) -> Self {
        Self::at(source_label, path, height_cm, Utc::now())
    }

    pub fn at(source_label: &str, path: &str, height_cm: Option<f32>, time: DateTime<Utc>) -> Self {
        Self {
            context: SELF_CONTEXT.to_string(),
            updates: vec![Update {
                source: Source {
                    label: source_label.to_string(),
                },
                timestamp: time.to_rfc3339_opts(SecondsFormat::Millis, true),
                values: vec![PathValue {
                    path: path.to_string(),
                    value: height_cm,
                }],
            }],
        }
    }

    /// The reported height, if this delta carries one.
    pub fn height(&self) -> Option<f32> {
        self.updates
            .first()
            .and_then(|update| update.values.first())
            .and_then(|entry| entry.value)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
