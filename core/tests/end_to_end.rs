//! Whole-pipeline scenarios driven through the public API only.

use bilgecore::acquisition::Rejection;
use bilgecore::processing::CycleOutcome;
use bilgecore::signalk::{HeightDelta, TelemetrySink, DEFAULT_SOURCE_LABEL, HEIGHT_PATH};
use bilgecore::telemetry::MetricsRecorder;
use bilgecore::{BilgePipeline, EchoReading, EchoSource, PipelineConfig, PipelinePhase};

/// At 2 cm/us the one-way distance equals the pulse width in microseconds.
fn reference_config(min_distance_cm: f32) -> PipelineConfig {
    PipelineConfig {
        min_distance_cm,
        max_distance_cm: 400.0,
        sound_speed_cm_per_us: 2.0,
        window_size: 7,
        alpha: 0.3,
        ..Default::default()
    }
}

fn echo(cm: u32) -> EchoReading {
    EchoReading::round_trip(cm)
}

#[test]
fn reference_sequence_settles_on_its_median() {
    let mut pipeline = BilgePipeline::new(reference_config(60.0)).unwrap();
    let readings = [100, 102, 98, 101, 99, 103, 100];

    let outputs: Vec<_> = readings.iter().map(|&cm| pipeline.cycle(echo(cm))).collect();
    for (output, &cm) in outputs.iter().zip(readings.iter()).take(6) {
        assert_eq!(*output, Some(cm as f32));
    }
    assert_eq!(outputs[6], Some(100.0));
    assert_eq!(pipeline.phase(), PipelinePhase::Steady);
    assert_eq!(pipeline.window().median(), Some(100.0));

    let before = pipeline.window().samples().to_vec();
    let report = pipeline.step(echo(50));
    assert_eq!(report.output, None);
    assert_eq!(
        report.outcome,
        CycleOutcome::Rejected(Rejection::OutOfRange { distance_cm: 50.0 })
    );
    assert_eq!(pipeline.window().samples(), before.as_slice());
    assert_eq!(pipeline.smoothed(), Some(100.0));
}

#[test]
fn out_of_range_before_any_sample_keeps_warming_up() {
    let mut pipeline = BilgePipeline::new(reference_config(20.0)).unwrap();
    assert_eq!(pipeline.cycle(echo(500)), None);
    assert_eq!(pipeline.phase(), PipelinePhase::WarmingUp);
    assert!(pipeline.window().is_empty());
}

#[test]
fn invalid_streams_never_report_or_fill() {
    let mut pipeline = BilgePipeline::new(reference_config(20.0)).unwrap();
    for cm in (0..20).chain(401..600).step_by(3) {
        assert_eq!(pipeline.cycle(echo(cm)), None);
        assert_eq!(pipeline.cycle(EchoReading::Timeout), None);
    }
    assert!(pipeline.window().is_empty());
    assert_eq!(pipeline.smoothed(), None);
}

#[test]
fn scripted_source_drives_pipeline_into_sink() {
    let script = vec![
        EchoReading::Timeout,
        echo(120),
        echo(121),
        echo(700),
        echo(119),
        echo(122),
        echo(118),
        echo(120),
        echo(121),
        EchoReading::Timeout,
        echo(120),
    ];
    let mut script = script.into_iter();
    let mut source = move || script.next().unwrap_or(EchoReading::Timeout);

    let mut pipeline = BilgePipeline::new(reference_config(20.0)).unwrap();
    let metrics = MetricsRecorder::new();
    let mut sink: Vec<HeightDelta> = Vec::new();

    for _ in 0..11 {
        let report = pipeline.step(source.sample());
        metrics.record(&report);
        sink.publish(&HeightDelta::new(DEFAULT_SOURCE_LABEL, HEIGHT_PATH, report.output))
            .unwrap();
    }

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.cycles, 11);
    assert_eq!(snapshot.timeouts, 2);
    assert_eq!(snapshot.out_of_range, 1);
    assert_eq!(snapshot.warm_up, 6);
    assert_eq!(snapshot.reported, 8);

    assert_eq!(sink.len(), 11);
    assert_eq!(sink[0].height(), None);
    assert_eq!(sink[1].height(), Some(120.0));
    assert_eq!(sink[9].height(), None);
    let last = sink[10].height().unwrap();
    assert!((last - 120.0).abs() < 0.5);
}
