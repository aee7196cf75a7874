use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `qcdt-monitor`.
///
/// Each collaborator defines its own error variant. The monitor matches on
/// these to decide whether to broadcast, log, or abort; application glue
/// continues to use `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum MonitorError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Price endpoint ──────────────────────────────────────────────────
    #[error("fetch: {0}")]
    Fetch(#[from] FetchError),

    // ── Notification channel ────────────────────────────────────────────
    #[error("delivery: {0}")]
    Delivery(#[from] DeliveryError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("missing required credential: {0}")]
    MissingCredential(&'static str),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Endpoint fetch errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl FetchError {
    pub(crate) fn from_reqwest(error: &reqwest::Error, timeout_secs: u64) -> Self {
        if error.is_timeout() {
            Self::Timeout(timeout_secs)
        } else if error.is_decode() {
            Self::Malformed(error.to_string())
        } else {
            Self::Network(error.to_string())
        }
    }
}

// ─── Delivery errors ────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("{method} forbidden: bot not in chat or lacks permission")]
    Forbidden { method: &'static str },

    #[error("{method} rejected: {description}")]
    Rejected {
        method: &'static str,
        description: String,
    },

    #[error("{method} request failed: {message}")]
    Network {
        method: &'static str,
        message: String,
    },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, MonitorError>;
