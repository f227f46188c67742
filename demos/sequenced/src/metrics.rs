use seq_api::{AuthContext, JsonGetHandler, Params, Response};
use seq_prometheus::{Encoder, MetricsEngine, TextEncoder};
use tracing::warn;

pub const METRICS_PATH: &str = "/metrics";

/// Prometheus text exposition of every executor tracked by the engine.
pub struct MetricsPage {
    engine: MetricsEngine,
}

impl MetricsPage {
    pub fn new(engine: MetricsEngine) -> Self {
        Self { engine }
    }
}

impl JsonGetHandler for MetricsPage {
    fn get(&self, _host: &str, path: &str, _params: &Params, _auth: &AuthContext) -> Response {
        if path.trim_end_matches('/') != METRICS_PATH {
            return Response::make_not_found();
        }

        self.engine.refresh();
        let encoder = TextEncoder::new();
        let mut buf = Vec::new();
        if let Err(e) = encoder.encode(&self.engine.set().gather(), &mut buf) {
            warn!(error = %e, "failed to encode metrics");
            return Response::default();
        }
        match String::from_utf8(buf) {
            Ok(text) => Response::make_ok_with_content_type(text, encoder.format_type()),
            Err(_) => Response::default(),
        }
    }
}
