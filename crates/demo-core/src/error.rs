//! Error types for the demo service.
//!
//! [`ApiError`] is the single error type handlers return. Every variant maps
//! to an HTTP status code through its [`ErrorKind`] and renders to the JSON
//! [`ErrorBody`] clients receive.
//!
//! | `ErrorKind` | Status | Body hint |
//! |---|---|---|
//! | `MissingParameters` | 400 | `required` |
//! | `InvalidParameterType` | 400 | - |
//! | `InvalidOperation` | 400 | `validOperations` |
//! | `DivisionByZero` | 400 | - |
//! | `NotFound` | 404 | `path` |
//! | `Internal` | 500 | `message` (non-production only) |

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculation::REQUIRED_FIELDS;
use crate::calculator::{ArithmeticError, Operation};

/// Result type alias using [`ApiError`].
pub type ApiResult<T> = Result<T, ApiError>;

/// Public message for every internal failure.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Classification of errors, used for status mapping and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// One or more of `operation`, `a`, `b` was absent.
    MissingParameters,
    /// An operand was not a number.
    InvalidParameterType,
    /// The operation name was not recognized.
    InvalidOperation,
    /// The divisor was zero.
    DivisionByZero,
    /// No route matched the request.
    NotFound,
    /// Any unexpected failure.
    Internal,
}

impl ErrorKind {
    /// Returns the HTTP status code for this kind.
    #[must_use]
    pub const fn status_code(self) -> StatusCode {
        match self {
            Self::MissingParameters
            | Self::InvalidParameterType
            | Self::InvalidOperation
            | Self::DivisionByZero => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the snake_case label of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingParameters => "missing_parameters",
            Self::InvalidParameterType => "invalid_parameter_type",
            Self::InvalidOperation => "invalid_operation",
            Self::DivisionByZero => "division_by_zero",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        }
    }
}

/// Standard error type for the demo service.
///
/// # Example
///
/// ```
/// use demo_core::ApiError;
/// use http::StatusCode;
///
/// let err = ApiError::DivisionByZero;
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.to_body(false).error, "Cannot divide by zero");
/// ```
#[derive(Error, Debug)]
pub enum ApiError {
    /// A required request field was absent.
    #[error("Missing required parameters")]
    MissingParameters,

    /// An operand was present but not a number.
    #[error("Parameters a and b must be numbers")]
    InvalidParameterType,

    /// The requested operation is not one of the supported names.
    #[error("Invalid operation")]
    InvalidOperation,

    /// The divisor operand was zero.
    #[error("Cannot divide by zero")]
    DivisionByZero,

    /// No endpoint is registered for the request.
    #[error("Endpoint not found")]
    NotFound {
        /// The request path that failed to match.
        path: String,
    },

    /// Unexpected failure.
    #[error("Internal error: {message}")]
    Internal {
        /// Detail message, only shown to clients outside production.
        message: String,
        /// The underlying error.
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl ApiError {
    /// Creates a not found error for a path.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates an internal error with a detail message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error wrapping a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingParameters => ErrorKind::MissingParameters,
            Self::InvalidParameterType => ErrorKind::InvalidParameterType,
            Self::InvalidOperation => ErrorKind::InvalidOperation,
            Self::DivisionByZero => ErrorKind::DivisionByZero,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    /// Returns `true` for errors caused by the server rather than the client.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    /// Converts this error into the JSON body sent to clients.
    ///
    /// `expose_details` controls whether the detail message of an internal
    /// error is included.
    #[must_use]
    pub fn to_body(&self, expose_details: bool) -> ErrorBody {
        match self {
            Self::MissingParameters => ErrorBody {
                required: Some(REQUIRED_FIELDS.iter().map(ToString::to_string).collect()),
                ..ErrorBody::new(self.to_string())
            },
            Self::InvalidOperation => ErrorBody {
                valid_operations: Some(Operation::names().map(ToString::to_string).collect()),
                ..ErrorBody::new(self.to_string())
            },
            Self::NotFound { path } => ErrorBody {
                path: Some(path.clone()),
                ..ErrorBody::new(self.to_string())
            },
            Self::Internal { message, .. } => ErrorBody {
                message: expose_details.then(|| message.clone()),
                ..ErrorBody::new(INTERNAL_ERROR_MESSAGE)
            },
            Self::InvalidParameterType | Self::DivisionByZero => ErrorBody::new(self.to_string()),
        }
    }
}

impl From<ArithmeticError> for ApiError {
    fn from(err: ArithmeticError) -> Self {
        match err {
            ArithmeticError::DivisionByZero => Self::DivisionByZero,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal_with_source(err.to_string(), err)
    }
}

/// JSON error payload.
///
/// Only `error` is always present; the other fields are hints attached by
/// specific error kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,

    /// Names of the required request fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    /// Names of the supported operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_operations: Option<Vec<String>>,

    /// The path that did not match any endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Internal error detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Creates a body carrying only an error message.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            required: None,
            valid_operations: None,
            path: None,
            message: None,
        }
    }
}
