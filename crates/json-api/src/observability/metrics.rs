//! Prometheus metrics collection and exposition endpoint.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder, core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

#[derive(Debug)]
struct Metrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    orders_created_total: IntCounter,
    payments_captured_total: IntCounter,
    capture_failures_total: IntCounterVec,
}

static METRICS: OnceLock<Option<Metrics>> = OnceLock::new();

#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        if let Some(metrics) = metrics() {
            metrics.requests_in_flight.inc();
            return Self { tracked: true };
        }

        Self { tracked: false }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_class = status_class(status_code);
    let status_code = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[method, route, status_class, status_code.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Count a pending order persisted with a payment intent.
pub(crate) fn record_order_created() {
    if let Some(metrics) = metrics() {
        metrics.orders_created_total.inc();
    }
}

/// Count a payment captured and its order confirmed.
pub(crate) fn record_payment_captured() {
    if let Some(metrics) = metrics() {
        metrics.payments_captured_total.inc();
    }
}

/// Count a capture that did not confirm its order.
pub(crate) fn record_capture_failure(reason: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .capture_failures_total
            .with_label_values(&[reason])
            .inc();
    }
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let metric_families = metrics.registry.gather();

    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metric_families, &mut encoded) {
        error!("failed to encode metrics response: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    let content_type = match HeaderValue::from_str(encoder.format_type()) {
        Ok(value) => value,
        Err(source) => {
            error!("failed to encode metrics content type header: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

            return;
        }
    };

    res.headers_mut().insert(CONTENT_TYPE, content_type);
    res.render(String::from_utf8_lossy(&encoded).into_owned());
}

fn metrics() -> Option<&'static Metrics> {
    METRICS.get_or_init(build_metrics).as_ref()
}

/// Create a metric and register it, logging and giving up on failure.
fn registered<M, F>(registry: &Registry, name: &str, build: F) -> Option<M>
where
    M: Collector + Clone + 'static,
    F: FnOnce() -> prometheus::Result<M>,
{
    let metric = match build() {
        Ok(metric) => metric,
        Err(source) => {
            error!("failed to create {name} metric: {source}");
            return None;
        }
    };

    if let Err(source) = registry.register(Box::new(metric.clone())) {
        error!("failed to register {name} metric: {source}");
        return None;
    }

    Some(metric)
}

fn build_metrics() -> Option<Metrics> {
    let registry = Registry::new();

    let requests_total = registered(&registry, "requests_total", || {
        IntCounterVec::new(
            Opts::new(
                "storefront_json_http_requests_total",
                "Total HTTP requests partitioned by method, route, status class, and status code.",
            ),
            &["method", "route", "status_class", "status_code"],
        )
    })?;

    let request_duration_seconds = registered(&registry, "request_duration", || {
        HistogramVec::new(
            HistogramOpts::new(
                "storefront_json_http_request_duration_seconds",
                "HTTP request duration in seconds partitioned by method and route.",
            )
            .buckets(vec![
                0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "route"],
        )
    })?;

    let requests_in_flight = registered(&registry, "in-flight gauge", || {
        IntGauge::with_opts(Opts::new(
            "storefront_json_http_requests_in_flight",
            "Current number of in-flight HTTP requests.",
        ))
    })?;

    let orders_created_total = registered(&registry, "orders_created_total", || {
        IntCounter::with_opts(Opts::new(
            "storefront_orders_created_total",
            "Pending orders created with a payment intent.",
        ))
    })?;

    let payments_captured_total = registered(&registry, "payments_captured_total", || {
        IntCounter::with_opts(Opts::new(
            "storefront_payments_captured_total",
            "Payments captured and orders confirmed.",
        ))
    })?;

    let capture_failures_total = registered(&registry, "capture_failures_total", || {
        IntCounterVec::new(
            Opts::new(
                "storefront_capture_failures_total",
                "Payment captures that did not confirm the order, partitioned by reason.",
            ),
            &["reason"],
        )
    })?;

    Some(Metrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
        orders_created_total,
        payments_captured_total,
        capture_failures_total,
    })
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}
