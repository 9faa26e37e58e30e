use bilgecore::signalk::{HeightDelta, HeightMetadata};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Last published state, as served over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeModel {
    pub path: String,
    pub meta: HeightMetadata,
    pub latest: Option<HeightDelta>,
}

impl BridgeModel {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            meta: HeightMetadata::default(),
            latest: None,
        }
    }

    /// Body of `GET /meta`.
    pub fn meta_json(&self) -> Value {
        json!({"path": self.path, "meta": self.meta})
    }
}
