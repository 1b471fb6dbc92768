//! Per-request span, request id and completion logging.

mod request_ids;
mod spans;

use std::time::{Duration, Instant};

use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, Span, error, info, warn};

use super::{metrics, settings};

const REQUEST_ID_DEPOT_KEY: &str = "request_id";

/// Paths scraped by infrastructure; not worth a span or a log line.
const UNLOGGED_PATHS: &[&str] = &["/metrics", "/healthcheck"];

/// How a finished request should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Ok,
    ClientError,
    ServerError,
}

impl Outcome {
    fn of(status: StatusCode) -> Self {
        if status.is_server_error() {
            Self::ServerError
        } else if status.is_client_error() {
            Self::ClientError
        } else {
            Self::Ok
        }
    }
}

fn is_slow(elapsed: Duration, threshold_ms: u64) -> bool {
    elapsed.as_millis() > u128::from(threshold_ms)
}

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if UNLOGGED_PATHS.contains(&req.uri().path()) {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();
    let _in_flight = metrics::InFlightRequestGuard::track();

    let request_id =
        request_ids::resolve_request_id(req.header::<String>(request_ids::REQUEST_ID_HEADER));

    depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());
    request_ids::set_request_id_header(res, &request_id);

    let method = req.method().to_string();
    let path = req.uri().path().to_owned();
    let names = spans::request_span_name(&method, &path);

    let span = tracing::info_span!(
        parent: None,
        "http.request",
        otel.name = %names.otel_span_name,
        otel.kind = "server",
        request_id = %request_id,
        method = %method,
        path = %path,
        remote_addr = %req.remote_addr(),
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty
    );

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    let elapsed = started.elapsed();
    let status = request_ids::response_status_or_ok(res.status_code);

    metrics::observe_request(
        &method,
        &names.otel_path,
        status.as_u16(),
        elapsed.as_secs_f64(),
    );

    report(&span, status, elapsed);
}

fn report(span: &Span, status: StatusCode, elapsed: Duration) {
    let duration_ms = elapsed.as_millis();
    let threshold_ms = settings::slow_request_threshold_ms();

    span.record("status", status.as_u16());
    span.record("duration_ms", duration_ms);

    span.in_scope(|| {
        match Outcome::of(status) {
            Outcome::ServerError => error!(status = status.as_u16(), duration_ms, "request.failed"),
            Outcome::ClientError => warn!(status = status.as_u16(), duration_ms, "request.rejected"),
            Outcome::Ok => info!(status = status.as_u16(), duration_ms, "request.completed"),
        }

        if is_slow(elapsed, threshold_ms) {
            warn!(duration_ms, threshold_ms, "request.slow");
        }
    });
}
