use crate::acquisition::{EchoReading, RangeGate, Rejection};
use crate::prelude::{ConfigResult, PipelineConfig};
use crate::processing::median::MedianWindow;
use crate::processing::smoother::ExponentialSmoother;
use crate::telemetry::log::LogManager;

/// Whether the median window has filled yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    WarmingUp,
    Steady,
}

/// What happened to one reading on its way through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    /// The gate dropped the reading; the window was not touched.
    Rejected(Rejection),
    /// The window is still filling, so the raw sample is passed through.
    WarmUp { sample_cm: f32 },
    Filtered { median_cm: f32, smoothed_cm: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub output: Option<f32>,
    pub outcome: CycleOutcome,
}

/// Range gate, median window and smoother, driven one reading per cycle.
///
/// Not synchronised: the scheduler owns the pipeline and serialises calls.
pub struct BilgePipeline {
    config: PipelineConfig,
    gate: RangeGate,
    window: MedianWindow,
    smoother: ExponentialSmoother,
    logger: LogManager,
}

impl BilgePipeline {
    pub fn new(config: PipelineConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            gate: RangeGate::from_config(&config),
            window: MedianWindow::new(config.window_size),
            smoother: ExponentialSmoother::new(config.alpha, config.seed),
            logger: LogManager::new(),
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn window(&self) -> &MedianWindow {
        &self.window
    }

    pub fn smoothed(&self) -> Option<f32> {
        self.smoother.value()
    }

    pub fn smoother(&self) -> &ExponentialSmoother {
        &self.smoother
    }

    pub fn phase(&self) -> PipelinePhase {
        if self.window.is_filled() {
            PipelinePhase::Steady
        } else {
            PipelinePhase::WarmingUp
        }
    }

    /// Height estimate for this interval, `None` when the reading was dropped.
    pub fn cycle(&mut self, reading: EchoReading) -> Option<f32> {
        self.step(reading).output
    }

    pub fn step(&mut self, reading: EchoReading) -> CycleReport {
        let sample = match self.gate.classify(reading) {
            Ok(sample) => sample,
            Err(rejection) => {
                self.logger
                    .trace_cycle(&format!("reading rejected: {:?}", rejection));
                return CycleReport {
                    output: None,
                    outcome: CycleOutcome::Rejected(rejection),
                };
            }
        };

        let was_filled = self.window.is_filled();
        self.window.push(sample);

        let median_cm = match self.window.median() {
            Some(median) => median,
            None => {
                let sample_cm = sample.centimeters();
                self.logger.trace_cycle(&format!(
                    "warming up {}/{}: raw {:.1} cm",
                    self.window.len(),
                    self.window.capacity(),
                    sample_cm
                ));
                return CycleReport {
                    output: Some(sample_cm),
                    outcome: CycleOutcome::WarmUp { sample_cm },
                };
            }
        };

        if !was_filled {
            self.logger.record(&format!(
                "median window filled after {} samples, smoothing from {:.1} cm with alpha {}",
                self.window.capacity(),
                median_cm,
                self.smoother.alpha()
            ));
        }

        let smoothed_cm = self.smoother.update(median_cm);
        self.logger.trace_cycle(&format!(
            "median {:.1} cm -> smoothed {:.1} cm",
            median_cm, smoothed_cm
        ));
        CycleReport {
            output: Some(smoothed_cm),
            outcome: CycleOutcome::Filtered {
                median_cm,
                smoothed_cm,
            },
        }
    }
}
