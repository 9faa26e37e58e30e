use crate::publish::model::BridgeModel;
use bilgecore::signalk::{HeightDelta, SinkError, TelemetrySink};
use bilgecore::telemetry::MetricsRecorder;
use log::{error, info};
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

pub fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

/// Publishing end of the pipeline: remembers the latest delta, optionally
/// echoes it to stdout, and can expose it over HTTP.
pub struct TelemetryBridge {
    state: Arc<RwLock<BridgeModel>>,
    metrics: Arc<MetricsRecorder>,
    stdout: bool,
}

impl TelemetryBridge {
    pub fn new(path: &str, metrics: Arc<MetricsRecorder>, stdout: bool) -> Self {
        Self {
            state: Arc::new(RwLock::new(BridgeModel::new(path))),
            metrics,
            stdout,
        }
    }

    /// Serves `GET /delta`, `GET /meta` and `GET /metrics` from a background
    /// thread until the process exits.
    pub fn serve(&self, addr: SocketAddr) {
        let state_for_filter = self.state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let metrics = self.metrics.clone();

        let delta_route = warp::path("delta")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<BridgeModel>>| {
                let latest = state.read().ok().and_then(|model| model.latest.clone());
                match latest {
                    Some(delta) => {
                        warp::reply::with_status(warp::reply::json(&delta), StatusCode::OK)
                    }
                    None => warp::reply::with_status(
                        warp::reply::json(&json!({"status": "no delta published yet"})),
                        StatusCode::NOT_FOUND,
                    ),
                }
            });

        let meta_route = warp::path("meta")
            .and(warp::get())
            .and(state_filter)
            .map(|state: Arc<RwLock<BridgeModel>>| {
                let body = state.read().ok().map(|model| model.meta_json());
                match body {
                    Some(body) => warp::reply::with_status(warp::reply::json(&body), StatusCode::OK),
                    None => warp::reply::with_status(
                        warp::reply::json(&json!({"status": "state unavailable"})),
                        StatusCode::INTERNAL_SERVER_ERROR,
                    ),
                }
            });

        let metrics_route = warp::path("metrics")
            .and(warp::get())
            .map(move || warp::reply::json(&metrics.snapshot()));

        thread::spawn(move || {
            let routes = delta_route.or(meta_route).or(metrics_route);
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build HTTP runtime: {}", err);
                    return;
                }
            };
            info!("serving telemetry on http://{}", addr);
            runtime.block_on(async move {
                warp::serve(routes).run(addr).await;
            });
        });
    }

    pub fn publish_status(&self, message: &str) {
        info!("[bridge] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> anyhow::Result<BridgeModel> {
        self.state
            .read()
            .map(|model| model.clone())
            .map_err(|_| anyhow::anyhow!("bridge state poisoned"))
    }
}

impl TelemetrySink for TelemetryBridge {
    fn publish(&mut self, delta: &HeightDelta) -> Result<(), SinkError> {
        if self.stdout {
            println!("{}", delta.to_json()?);
        }
        let mut guard = self
            .state
            .write()
            .map_err(|_| SinkError::Unavailable("bridge state poisoned".into()))?;
        guard.latest = Some(delta.clone());
        Ok(())
    }
}
