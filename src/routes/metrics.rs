use axum::response::{IntoResponse, Response};
use hyper::StatusCode;
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, TextEncoder};

use crate::metrics::REGISTRY;

pub async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();

    // Our own registry first, then the process-level default one.
    let mut body = encode(&encoder, REGISTRY.gather());
    body.push_str(&encode(&encoder, prometheus::gather()));

    (StatusCode::OK, body).into_response()
}

fn encode(encoder: &TextEncoder, metric_families: Vec<MetricFamily>) -> String {
    let mut buffer = Vec::new();
    if let Err(error) = encoder.encode(&metric_families, &mut buffer) {
        log::error!("Could not encode the metrics. Error: '{error}'.");
    }
    String::from_utf8(buffer).unwrap_or_else(|error| {
        log::error!("The encoded metrics are not valid utf-8. Error: '{error}'.");
        String::default()
    })
}
