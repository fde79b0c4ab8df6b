use std::error::Error;
use std::fmt;

use warp::reject::Reject;

use crate::constants::{
    ERROR_CANCELLED, ERROR_INTERNAL, ERROR_RATE_LIMITED, ERROR_UNAUTHORIZED, ERROR_UPSTREAM,
    ERROR_UPSTREAM_TIMEOUT,
};

/// Error type for the gateway server
#[derive(Debug, Clone)]
pub struct ProxyError {
    pub message: String,
    pub status_code: u16,
    kind: ProxyErrorKind,
}

#[derive(Debug, Clone)]
enum ProxyErrorKind {
    BadRequest,
    NotFound,
    Unauthorized,
    RateLimited,
    Upstream,
    UpstreamTimeout,
    RequestCancelled,
    InternalServerError,
}

impl ProxyError {
    pub fn bad_request(message: &str) -> Self {
        Self {
            message: message.to_string(),
            status_code: 400,
            kind: ProxyErrorKind::BadRequest,
        }
    }

    pub fn model_not_found(model: &str) -> Self {
        Self {
            message: format!("model '{}' not found", model),
            status_code: 404,
            kind: ProxyErrorKind::NotFound,
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            message: ERROR_UNAUTHORIZED.to_string(),
            status_code: 401,
            kind: ProxyErrorKind::Unauthorized,
        }
    }

    pub fn rate_limited() -> Self {
        Self {
            message: ERROR_RATE_LIMITED.to_string(),
            status_code: 429,
            kind: ProxyErrorKind::RateLimited,
        }
    }

    pub fn upstream_error() -> Self {
        Self {
            message: ERROR_UPSTREAM.to_string(),
            status_code: 502,
            kind: ProxyErrorKind::Upstream,
        }
    }

    pub fn upstream_timeout() -> Self {
        Self {
            message: ERROR_UPSTREAM_TIMEOUT.to_string(),
            status_code: 504,
            kind: ProxyErrorKind::UpstreamTimeout,
        }
    }

    pub fn request_cancelled() -> Self {
        Self {
            message: ERROR_CANCELLED.to_string(),
            status_code: 499,
            kind: ProxyErrorKind::RequestCancelled,
        }
    }

    /// The detail is logged; the wire body carries only the generic text.
    pub fn internal_server_error(detail: &str) -> Self {
        log::error!("internal error: {}", detail);
        Self {
            message: ERROR_INTERNAL.to_string(),
            status_code: 500,
            kind: ProxyErrorKind::InternalServerError,
        }
    }

    /// Map a non-success backend status into the gateway error taxonomy.
    /// Messages stay category-only; the model id is the one exception.
    pub fn from_upstream_status(status: u16, model: &str) -> Self {
        match status {
            401 | 403 => Self::unauthorized(),
            404 => Self::model_not_found(model),
            429 => Self::rate_limited(),
            500..=599 => Self::upstream_error(),
            _ => Self::bad_request("invalid request"),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, ProxyErrorKind::RequestCancelled)
    }

    /// Transient failure classes the backend client may retry
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ProxyErrorKind::RateLimited | ProxyErrorKind::Upstream | ProxyErrorKind::UpstreamTimeout
        )
    }
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProxyError {}: {}", self.status_code, self.message)
    }
}

impl Error for ProxyError {}

impl Reject for ProxyError {}

#[macro_export]
macro_rules! check_cancelled {
    ($token:expr) => {
        if $token.is_cancelled() {
            return Err($crate::error::ProxyError::request_cancelled());
        }
    };
}
