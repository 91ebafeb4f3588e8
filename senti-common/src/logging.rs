//! Logging utilities for the sentiment service.
//!
//! Provides structured JSON or pretty logging, plus trace IDs for request tracking.
//!
//! # Noise Filtering
//!
//! By default, noisy library modules (hyper, h2, tower_http, tokio_util) are set to
//! `warn` level to reduce log clutter while keeping business logs at the specified
//! level.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Default noisy modules that should be filtered to warn level.
pub const NOISY_MODULES: &[&str] = &["hyper", "hyper_util", "h2", "tokio_util", "tower_http"];

/// Header carrying the trace ID between client and service.
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Header carrying the caller's span ID.
pub const SPAN_ID_HEADER: &str = "x-span-id";

/// Build the filter directives for the given base level.
fn build_directives(log_level: &str, excluded_targets: &[String]) -> String {
    let mut directives = String::from(log_level);

    for module in NOISY_MODULES {
        directives.push_str(&format!(",{}=warn", module));
    }

    for target in excluded_targets {
        directives.push_str(&format!(",{}=warn", target));
    }

    directives
}

/// Initialize logging.
///
/// # Arguments
///
/// * `log_level` - Base log level (trace, debug, info, warn, error)
/// * `log_format` - Output format: "json" for structured JSON, "pretty" for human-readable
/// * `excluded_targets` - Extra module targets to hold at `warn`
///
/// Noisy modules are set to `warn` unless overridden via `RUST_LOG`.
pub fn init_logging_with_exclusions(
    log_level: &str,
    log_format: &str,
    excluded_targets: &[String],
) {
    let directives = build_directives(log_level, excluded_targets);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directives));

    let subscriber = tracing_subscriber::registry().with(filter);

    if log_format == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        let _ = subscriber.with(fmt_layer).try_init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .with_target(true)
            .with_file(false)
            .with_line_number(false);
        let _ = subscriber.with(fmt_layer).try_init();
    }

    tracing::info!(
        log_level = %log_level,
        log_format = %log_format,
        noise_filtered = NOISY_MODULES.len() + excluded_targets.len(),
        "Logging initialized"
    );
}

/// Generate a new trace ID for request tracing.
pub fn generate_trace_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Generate a new span ID.
pub fn generate_span_id() -> String {
    uuid::Uuid::new_v4().to_string()[..8].to_string()
}

// ============================================================================
// Request Context
// ============================================================================

/// Per-request tracing context.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Trace ID, supplied by the caller or freshly generated
    pub trace_id: String,
    /// Span ID for this service hop
    pub span_id: String,
    /// Caller's span ID (if any)
    pub parent_span_id: Option<String>,
    /// Service name
    pub service: String,
}

impl RequestContext {
    /// Create a new request context.
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            trace_id: generate_trace_id(),
            span_id: generate_span_id(),
            parent_span_id: None,
            service: service.into(),
        }
    }

    /// Create context from HTTP headers.
    pub fn from_headers(headers: &http::HeaderMap, service: impl Into<String>) -> Self {
        let trace_id = headers
            .get(TRACE_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(String::from)
            .unwrap_or_else(generate_trace_id);

        let parent_span_id = headers
            .get(SPAN_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Self {
            trace_id,
            span_id: generate_span_id(),
            parent_span_id,
            service: service.into(),
        }
    }

    /// Add context to HTTP headers for propagation.
    pub fn to_headers(&self, headers: &mut http::HeaderMap) {
        if let Ok(trace_id) = self.trace_id.parse() {
            headers.insert(TRACE_ID_HEADER, trace_id);
        }
        if let Ok(span_id) = self.span_id.parse() {
            headers.insert(SPAN_ID_HEADER, span_id);
        }
    }
}
