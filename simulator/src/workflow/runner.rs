use crate::generator::profile::SimulatedEcho;
use crate::workflow::config::{OutputConfig, WorkflowConfig};
use anyhow::Context;
use bilgecore::processing::CycleReport;
use bilgecore::signalk::{HeightDelta, TelemetrySink};
use bilgecore::telemetry::MetricsRecorder;
use bilgecore::{BilgePipeline, EchoSource};
use log::{info, warn};
use std::future::Future;
use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};

/// Owns the pipeline and its echo source, and calls them once per interval.
pub struct Runner {
    pipeline: BilgePipeline,
    source: Box<dyn EchoSource + Send>,
    output: OutputConfig,
    metrics: Arc<MetricsRecorder>,
}

impl Runner {
    pub fn new(config: &WorkflowConfig) -> anyhow::Result<Self> {
        let source = SimulatedEcho::new(config.sensor.clone(), &config.pipeline);
        Self::with_source(config, Box::new(source))
    }

    pub fn with_source(
        config: &WorkflowConfig,
        source: Box<dyn EchoSource + Send>,
    ) -> anyhow::Result<Self> {
        let pipeline =
            BilgePipeline::new(config.pipeline.clone()).context("building bilge pipeline")?;
        Ok(Self {
            pipeline,
            source,
            output: config.output.clone(),
            metrics: Arc::new(MetricsRecorder::new()),
        })
    }

    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        self.metrics.clone()
    }

    pub fn pipeline(&self) -> &BilgePipeline {
        &self.pipeline
    }

    /// One acquisition cycle. A failing sink costs this cycle's delta only.
    pub fn tick<S: TelemetrySink + ?Sized>(&mut self, sink: &mut S) -> CycleReport {
        let report = self.pipeline.step(self.source.sample());
        self.metrics.record(&report);

        let delta = HeightDelta::new(&self.output.source_label, &self.output.path, report.output);
        if let Err(err) = sink.publish(&delta) {
            warn!("publishing {} failed: {}", self.output.path, err);
        }
        report
    }

    /// Runs `cycles` cycles back to back without waiting between them.
    pub fn run_offline<S: TelemetrySink + ?Sized>(
        &mut self,
        cycles: u64,
        sink: &mut S,
    ) -> Vec<Option<f32>> {
        (0..cycles).map(|_| self.tick(sink).output).collect()
    }

    /// Runs one cycle per sample interval until `cycles` are done or
    /// `shutdown` resolves. Late ticks are skipped rather than bunched up.
    pub async fn run_scheduled<S, F>(
        &mut self,
        cycles: Option<u64>,
        sink: &mut S,
        shutdown: F,
    ) -> anyhow::Result<u64>
    where
        S: TelemetrySink + ?Sized,
        F: Future<Output = anyhow::Result<()>>,
    {
        let period = self.pipeline.config().sample_interval();
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        info!(
            "sampling every {} ms, publishing to {}",
            period.as_millis(),
            self.output.path
        );

        let mut completed = 0;
        while cycles.map_or(true, |limit| completed < limit) {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick(sink);
                    completed += 1;
                }
                result = &mut shutdown => {
                    result.context("waiting for shutdown")?;
                    info!("shutdown requested after {} cycles", completed);
                    break;
                }
            }
        }
        Ok(completed)
    }
}
