//! Settings read on every request.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::observability::ObservabilityConfig;

static SLOW_REQUEST_THRESHOLD_MS: AtomicU64 = AtomicU64::new(1_000);

pub(super) fn apply_runtime_config(config: &ObservabilityConfig) {
    SLOW_REQUEST_THRESHOLD_MS.store(config.slow_request_threshold_ms, Ordering::Relaxed);
}

pub(super) fn slow_request_threshold_ms() -> u64 {
    SLOW_REQUEST_THRESHOLD_MS.load(Ordering::Relaxed)
}
