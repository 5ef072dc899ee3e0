// ── Core error types ──
//
// Domain errors from mentordesk-core. Consumers never see HTTP status codes
// or JSON parse failures directly; the `From<mentordesk_api::Error>` impl
// translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("Session store error: {message}")]
    SessionStore { message: String },

    #[error("Invalid session: {reason}")]
    InvalidSession { reason: String },

    #[error("Not signed in: {message}")]
    Unauthorized { message: String },

    #[error("Access denied: {message}")]
    Forbidden { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation not supported: {operation} (requires {required})")]
    Unsupported { operation: String, required: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Nothing selected")]
    EmptySelection,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` if the session token was rejected by the server.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<mentordesk_api::Error> for CoreError {
    fn from(err: mentordesk_api::Error) -> Self {
        match err {
            mentordesk_api::Error::Unauthorized { message } => CoreError::Unauthorized { message },
            mentordesk_api::Error::Forbidden { message } => CoreError::Forbidden { message },
            mentordesk_api::Error::InvalidToken(reason) => CoreError::InvalidSession { reason },
            mentordesk_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            mentordesk_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            mentordesk_api::Error::ClientSetup(reason) => CoreError::Config {
                message: format!("HTTP client setup failed: {reason}"),
            },
            mentordesk_api::Error::NotFound { path } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: path,
            },
            mentordesk_api::Error::Validation { message, fields } => {
                CoreError::ValidationFailed {
                    message: if fields.is_empty() {
                        message
                    } else {
                        format!("{message} ({})", fields.join(", "))
                    },
                }
            }
            mentordesk_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            mentordesk_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
