use anyhow::Context;
use clap::Parser;
use publish::bridge::{default_bind_address, TelemetryBridge};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod publish;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Bilge air-gap sensor driver")]
struct Args {
    /// Run the cycles back to back instead of on the sampling interval
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Stop after this many cycles (offline runs default to 60)
    #[arg(long)]
    cycles: Option<u64>,
    /// Sampling interval; overrides the workflow file (default 1000)
    #[arg(long)]
    interval_ms: Option<u64>,
    /// Seed for the simulated echo stream; overrides the workflow file
    #[arg(long)]
    seed: Option<u64>,
    /// Expose the latest delta over HTTP
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long)]
    bind: Option<SocketAddr>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let workflow_config = match args.workflow {
        Some(path) => WorkflowConfig::load(path)?,
        None => WorkflowConfig::default(),
    }
    .with_overrides(args.cycles, args.interval_ms, args.seed)?;

    let mut runner = Runner::new(&workflow_config)?;
    let mut bridge = TelemetryBridge::new(
        &workflow_config.output.path,
        runner.metrics(),
        workflow_config.output.stdout,
    );
    if args.serve {
        bridge.serve(args.bind.unwrap_or_else(default_bind_address));
    }

    if args.offline {
        let cycles = workflow_config.cycles.unwrap_or(60);
        let outputs = runner.run_offline(cycles, &mut bridge);
        let metrics = runner.metrics().snapshot();
        let last = outputs.iter().rev().find_map(|output| *output);

        bridge.publish_status(&format!(
            "offline run -> cycles {}, reported {}, timeouts {}, out of range {}, last {:?}",
            metrics.cycles, metrics.reported, metrics.timeouts, metrics.out_of_range, last
        ));

        if let Some(report_path) = workflow_config.output.report.as_ref() {
            let report = format!(
                "cycles={} reported={} warm_up={} timeouts={} out_of_range={} last={:?}\n",
                metrics.cycles,
                metrics.reported,
                metrics.warm_up,
                metrics.timeouts,
                metrics.out_of_range,
                last
            );
            if let Some(parent) = report_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(report_path)
                .with_context(|| format!("opening report {}", report_path.display()))?;
            file.write_all(report.as_bytes())?;
        }
    } else {
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for the sampling loop")?;
        let completed = runtime.block_on(async {
            let shutdown = async {
                signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
                Ok::<(), anyhow::Error>(())
            };
            runner
                .run_scheduled(workflow_config.cycles, &mut bridge, shutdown)
                .await
        })?;
        bridge.publish_status(&format!(
            "stopped after {} cycles in {:?} phase",
            completed,
            runner.pipeline().phase()
        ));
    }

    if args.serve && args.offline {
        bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
