use std::time::{Duration, Instant};

use crate::constants::{LOG_PREFIX_ERROR, LOG_PREFIX_SUCCESS, LOG_PREFIX_WARNING};

/// Short random token attached to all log records for one request.
/// Only metadata is ever logged alongside it; request and response bodies,
/// prompts, and credentials never reach a log sink.
pub fn new_correlation_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

pub fn log_request(correlation_id: &str, method: &str, path: &str, model: Option<&str>) {
    match model {
        Some(m) => log::info!(
            "[{}] {} {} (model: {})",
            correlation_id,
            method,
            sanitize_log_message(path),
            sanitize_log_message(m)
        ),
        None => log::info!("[{}] {} {}", correlation_id, method, sanitize_log_message(path)),
    }
}

pub fn log_timed(prefix: &str, operation: &str, start: Instant) {
    let duration = start.elapsed();
    let formatted_duration = format_duration(duration);

    match prefix {
        LOG_PREFIX_SUCCESS => log::info!("{} | {}", operation, formatted_duration),
        LOG_PREFIX_ERROR => log::error!("{} | {}", operation, formatted_duration),
        LOG_PREFIX_WARNING => log::warn!("{} | {}", operation, formatted_duration),
        _ => log::info!("{} | {}", operation, formatted_duration),
    }
}

/// One metadata record per backend attempt: endpoint, attempt number,
/// duration, status. Never the payload.
pub fn log_attempt(
    correlation_id: &str,
    operation: &str,
    attempt: u32,
    status: Result<u16, &str>,
    start: Instant,
) {
    let formatted_duration = format_duration(start.elapsed());
    match status {
        Ok(code) => log::info!(
            "[{}] {} attempt {} -> {} | {}",
            correlation_id,
            operation,
            attempt,
            code,
            formatted_duration
        ),
        Err(class) => log::warn!(
            "[{}] {} attempt {} failed ({}) | {}",
            correlation_id,
            operation,
            attempt,
            class,
            formatted_duration
        ),
    }
}

pub fn format_duration(duration: Duration) -> String {
    let total_nanos = duration.as_nanos();

    if total_nanos < 1_000_000 {
        format!("{:.1}µs", total_nanos as f64 / 1_000.0)
    } else if total_nanos < 1_000_000_000 {
        format!("{:.2}ms", total_nanos as f64 / 1_000_000.0)
    } else {
        format!("{:.2}s", total_nanos as f64 / 1_000_000_000.0)
    }
}

pub fn sanitize_log_message(message: &str) -> String {
    message
        .chars()
        .map(|c| {
            if c.is_control() && !matches!(c, '\t' | '\n' | '\r') {
                '?'
            } else {
                c
            }
        })
        .collect()
}
