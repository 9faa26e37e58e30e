use crate::generator::profile::EchoProfile;
use anyhow::Context;
use bilgecore::signalk::{DEFAULT_SOURCE_LABEL, HEIGHT_PATH};
use bilgecore::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where and under which name estimates are published.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub source_label: String,
    pub path: String,
    /// Print one JSON delta per cycle on stdout.
    pub stdout: bool,
    /// Append an offline run summary here.
    pub report: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            source_label: DEFAULT_SOURCE_LABEL.to_string(),
            path: HEIGHT_PATH.to_string(),
            stdout: true,
            report: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub pipeline: PipelineConfig,
    pub sensor: EchoProfile,
    pub output: OutputConfig,
    /// Stop after this many cycles; run until Ctrl+C when unset.
    pub cycles: Option<u64>,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .pipeline
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Command-line values win over whatever the workflow file or the
    /// defaults set; `None` leaves a field alone.
    pub fn with_overrides(
        mut self,
        cycles: Option<u64>,
        interval_ms: Option<u64>,
        seed: Option<u64>,
    ) -> anyhow::Result<Self> {
        if cycles.is_some() {
            self.cycles = cycles;
        }
        if let Some(interval_ms) = interval_ms {
            self.pipeline.sample_interval_ms = interval_ms;
        }
        if let Some(seed) = seed {
            self.sensor.seed = seed;
        }
        self.pipeline
            .validate()
            .context("validating command-line overrides")?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bilgecore::SmootherSeed;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn overrides_on_defaults_keep_reference_pipeline() {
        let cfg = WorkflowConfig::default()
            .with_overrides(Some(10), Some(250), Some(9))
            .unwrap();
        assert_eq!(cfg.pipeline.window_size, 7);
        assert_eq!(cfg.pipeline.sample_interval_ms, 250);
        assert_eq!(cfg.sensor.seed, 9);
        assert_eq!(cfg.cycles, Some(10));
        assert_eq!(cfg.output.path, "environment.bilge.height");
    }

    #[test]
    fn overrides_apply_uniformly_to_loaded_workflow() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"pipeline:\n  sample_interval_ms: 500\nsensor:\n  seed: 3\ncycles: 30\n",
        )
        .unwrap();
        let path = temp.into_temp_path();

        let untouched = WorkflowConfig::load(&path)
            .unwrap()
            .with_overrides(None, None, None)
            .unwrap();
        assert_eq!(untouched.pipeline.sample_interval_ms, 500);
        assert_eq!(untouched.sensor.seed, 3);
        assert_eq!(untouched.cycles, Some(30));

        let overridden = WorkflowConfig::load(&path)
            .unwrap()
            .with_overrides(Some(5), Some(100), Some(42))
            .unwrap();
        assert_eq!(overridden.pipeline.sample_interval_ms, 100);
        assert_eq!(overridden.sensor.seed, 42);
        assert_eq!(overridden.cycles, Some(5));
    }

    #[test]
    fn zero_interval_override_is_rejected() {
        let err = WorkflowConfig::default()
            .with_overrides(None, Some(0), None)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("sample interval must be non-zero"));
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"pipeline:\n  window_size: 5\n  alpha: 0.5\n  seed: first_median\nsensor:\n  air_gap_cm: 60.0\ncycles: 30\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.pipeline.window_size, 5);
        assert_eq!(cfg.pipeline.seed, SmootherSeed::FirstMedian);
        assert_eq!(cfg.pipeline.max_distance_cm, 400.0);
        assert_eq!(cfg.sensor.air_gap_cm, 60.0);
        assert_eq!(cfg.cycles, Some(30));
        assert_eq!(cfg.output.source_label, "sensesp-bilge-sensor");
    }

    #[test]
    fn config_load_rejects_even_window() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"pipeline:\n  window_size: 4\n").unwrap();
        let path = temp.into_temp_path();
        let err = WorkflowConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("window size must be odd"));
    }
}
