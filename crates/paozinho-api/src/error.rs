//! # Console Error Type
//!
//! Unified error type for console commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Console                            │
//! │                                                                         │
//! │  Command Function ── Result<T, ConsoleError>                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Local check failed? ── CoreError ──────────────┐  (no request sent)    │
//! │         │                                       │                       │
//! │         ▼                                       ▼                       │
//! │  Remote call failed? ── 401 ─► Unauthorized ─► ConsoleError ─► Notice   │
//! │                         404 ─► NotFound                         │       │
//! │                         5xx ─► Remote (generic toast)           ▼       │
//! │                                                            browser      │
//! │  Success ─────────────────────────────────────────────────► toast      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The browser receives a [`Notice`]:
//! ```json
//! { "code": "SETTLEMENT_MISMATCH", "message": "missing: R$ 0,50" }
//! ```

use paozinho_core::{CoreError, ValidationError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Result type alias for console operations.
pub type ConsoleResult<T> = Result<T, ConsoleError>;

#[derive(Debug, Error)]
pub enum ConsoleError {
    // =========================================================================
    // Local Errors (nothing was sent)
    // =========================================================================
    /// A pricing, cart, lifecycle or settlement rule failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Command needs a session and none is active.
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Invalid configuration: {0}")]
    Config(String),

    // =========================================================================
    // Remote Errors
    // =========================================================================
    /// The API answered 401; the session has been cleared.
    #[error("Session expired, please log in again")]
    Unauthorized,

    /// The identity provider refused the credentials.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{resource} not found")]
    NotFound { resource: String },

    /// 400/409/422: the API refused the payload.
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Any other non-success status.
    #[error("Remote error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// Connection, TLS or timeout failure.
    #[error("Network error: {0}")]
    Transport(String),

    /// The API answered with a body the console cannot use.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Machine-readable error codes for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Field-level input error
    ValidationError,
    /// Payments do not match the post-return total
    SettlementMismatch,
    /// Return exceeds sold quantity
    OverReturn,
    /// Status change not allowed from the current status
    InvalidTransition,
    NotFound,
    /// Session missing or expired; redirect to login
    Unauthorized,
    InvalidCredentials,
    /// Remote refused or failed the request
    RemoteError,
    NetworkError,
    ConfigError,
    BusinessLogic,
}

/// What the browser shows in a toast or next to a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub code: ErrorCode,
    pub message: String,
    /// Form field to highlight, for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ConsoleError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ConsoleError::Core(core) => match core {
                CoreError::Validation(_)
                | CoreError::ZeroSalePrice
                | CoreError::MarginTooHigh { .. }
                | CoreError::PriceOutOfRange
                | CoreError::EmptyCart
                | CoreError::CartTooLarge { .. } => ErrorCode::ValidationError,
                CoreError::PaymentMismatch { .. } => ErrorCode::SettlementMismatch,
                CoreError::ReturnExceedsSold { .. } => ErrorCode::OverReturn,
                CoreError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
                CoreError::ProductNotFound(_)
                | CoreError::CustomPriceNotFound(_)
                | CoreError::UnknownLineItem(_) => ErrorCode::NotFound,
                CoreError::DuplicateCustomPrice { .. } => ErrorCode::BusinessLogic,
            },
            ConsoleError::NotAuthenticated | ConsoleError::Unauthorized => ErrorCode::Unauthorized,
            ConsoleError::InvalidCredentials => ErrorCode::InvalidCredentials,
            ConsoleError::NotFound { .. } => ErrorCode::NotFound,
            ConsoleError::Rejected { .. } | ConsoleError::Remote { .. } | ConsoleError::InvalidResponse(_) => {
                ErrorCode::RemoteError
            }
            ConsoleError::Transport(_) => ErrorCode::NetworkError,
            ConsoleError::Config(_) => ErrorCode::ConfigError,
        }
    }

    /// True when the error was raised before any request was issued.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ConsoleError::Core(_) | ConsoleError::NotAuthenticated | ConsoleError::Config(_)
        )
    }

    /// True when the shell must redirect to the login page.
    pub fn requires_login(&self) -> bool {
        matches!(self, ConsoleError::Unauthorized | ConsoleError::NotAuthenticated)
    }

    /// Converts the error into the user-facing notice.
    ///
    /// Server and transport details are logged, the toast stays generic.
    pub fn notice(&self) -> Notice {
        let message = match self {
            ConsoleError::Remote { status, message } => {
                error!(status, %message, "Remote call failed");
                "The server could not complete the operation. Please try again.".to_string()
            }
            ConsoleError::Transport(detail) => {
                error!(%detail, "Network failure");
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            ConsoleError::InvalidResponse(detail) => {
                error!(%detail, "Unusable response from server");
                "The server sent an unexpected response. Please try again.".to_string()
            }
            ConsoleError::Core(CoreError::Validation(v)) => v.to_string(),
            other => other.to_string(),
        };

        let field = match self {
            ConsoleError::Core(CoreError::Validation(v)) => Some(v.field().to_string()),
            _ => None,
        };

        Notice {
            code: self.code(),
            message,
            field,
        }
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for ConsoleError {
    fn from(err: ValidationError) -> Self {
        ConsoleError::Core(CoreError::Validation(err))
    }
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ConsoleError::InvalidResponse(err.to_string())
        } else {
            ConsoleError::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for ConsoleError {
    fn from(err: url::ParseError) -> Self {
        ConsoleError::Config(format!("invalid URL: {}", err))
    }
}

impl From<std::io::Error> for ConsoleError {
    fn from(err: std::io::Error) -> Self {
        ConsoleError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for ConsoleError {
    fn from(err: toml::de::Error) -> Self {
        ConsoleError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ConsoleError {
    fn from(err: toml::ser::Error) -> Self {
        ConsoleError::Config(err.to_string())
    }
}

impl From<ConsoleError> for Notice {
    fn from(err: ConsoleError) -> Self {
        err.notice()
    }
}
