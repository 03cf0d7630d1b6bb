//! Error types for gNMI telemetry operations.
//!
//! Two layers of failure exist:
//!
//! - Session level ([`SessionError`] / [`ErrorCode`]): returned from the
//!   client's register calls. Misuse, a failed write, or a terminal RPC status.
//! - Decode level ([`DecodeError`] / [`InternalErrorCode`]): produced while
//!   turning a single response into a counter record. These are logged and the
//!   response skipped; they never surface as an RPC failure.

use std::io;
use thiserror::Error;

/// Outcome of a session operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Operation completed
    Success,
    /// Wrong counter bound, missing credentials, or unusable RPC arguments
    ClientTypeFailure,
    /// Writing the subscribe request onto the stream failed
    WritesFailed,
    /// The RPC ended with a non-OK status
    RpcFailure,
}

/// Errors returned by the subscription session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Misuse of the client. No I/O was attempted.
    #[error("Client type failure: {reason}")]
    ClientTypeFailure { reason: String },

    /// The subscribe request could not be written onto the stream.
    #[error("Subscribe request write failed")]
    WritesFailed,

    /// The RPC terminated with a non-OK status.
    #[error("Subscribe rpc failed: {}", .0.message())]
    RpcFailure(tonic::Status),
}

impl SessionError {
    /// Creates a client type failure.
    pub fn client_type(reason: impl Into<String>) -> Self {
        SessionError::ClientTypeFailure {
            reason: reason.into(),
        }
    }

    /// Converts this error to its outcome code.
    pub fn to_code(&self) -> ErrorCode {
        match self {
            SessionError::ClientTypeFailure { .. } => ErrorCode::ClientTypeFailure,
            SessionError::WritesFailed => ErrorCode::WritesFailed,
            SessionError::RpcFailure(_) => ErrorCode::RpcFailure,
        }
    }

    /// Returns the terminal RPC status, if this failure carries one.
    pub fn status(&self) -> Option<&tonic::Status> {
        match self {
            SessionError::RpcFailure(status) => Some(status),
            _ => None,
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Extension trait for converting a [`SessionResult`] to an [`ErrorCode`].
pub trait SessionResultExt {
    /// Converts this result to an outcome code.
    fn to_code(&self) -> ErrorCode;
}

impl<T> SessionResultExt for SessionResult<T> {
    fn to_code(&self) -> ErrorCode {
        match self {
            Ok(_) => ErrorCode::Success,
            Err(e) => e.to_code(),
        }
    }
}

/// Decode-level status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InternalErrorCode {
    Success,
    NoNotification,
    NoPrefixInResponse,
    NoUpdateInNotification,
    NoPolicyNameInResponse,
    NoRuleNameInResponse,
    UnsupportedEncoding,
    UnknownError,
}

impl std::fmt::Display for InternalErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InternalErrorCode::Success => "SUCCESS",
            InternalErrorCode::NoNotification => "NO_NOTIFICATION",
            InternalErrorCode::NoPrefixInResponse => "NO_PREFIX_IN_RESPONSE",
            InternalErrorCode::NoUpdateInNotification => "NO_UPDATE_IN_NOTIFICATION",
            InternalErrorCode::NoPolicyNameInResponse => "NO_POLICY_NAME_IN_RESPONSE",
            InternalErrorCode::NoRuleNameInResponse => "NO_RULE_NAME_IN_RESPONSE",
            InternalErrorCode::UnsupportedEncoding => "UNSUPPORTED_ENCODING",
            InternalErrorCode::UnknownError => "UNKNOWN_ERROR",
        };
        f.write_str(name)
    }
}

/// Errors produced while decoding a response or building a request.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The response carried no notification (sync marker or legacy error).
    #[error("Response carried no notification")]
    NoNotification,

    /// The notification has no prefix, or its origin is empty.
    #[error("Response contained no prefix")]
    NoPrefixInResponse,

    /// The notification carried zero updates.
    #[error("Notification contained no update")]
    NoUpdateInNotification,

    /// No policy-map key was found on the response path.
    #[error("Could not find policy name on return path")]
    NoPolicyNameInResponse,

    /// No rule-name key was found on the response path.
    #[error("Could not find rule name on return path")]
    NoRuleNameInResponse,

    /// The requested encoding is not PROTO or JSON_IETF.
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(i32),

    /// The prefix origin did not match the counter's origin.
    #[error("Unexpected response: {0}")]
    UnknownError(String),

    /// A JSON IETF payload was not well-formed.
    #[error("Malformed JSON IETF payload: {0}")]
    Syntax(#[from] serde_json::Error),

    /// A numeric record field held a non-numeric value.
    #[error("Field '{key}' is not an unsigned integer: {value:?}")]
    Conversion { key: String, value: String },
}

impl DecodeError {
    /// Returns the decode-level code, or `None` for payload faults
    /// (syntax or conversion errors) which carry no code.
    pub fn code(&self) -> Option<InternalErrorCode> {
        match self {
            DecodeError::NoNotification => Some(InternalErrorCode::NoNotification),
            DecodeError::NoPrefixInResponse => Some(InternalErrorCode::NoPrefixInResponse),
            DecodeError::NoUpdateInNotification => Some(InternalErrorCode::NoUpdateInNotification),
            DecodeError::NoPolicyNameInResponse => Some(InternalErrorCode::NoPolicyNameInResponse),
            DecodeError::NoRuleNameInResponse => Some(InternalErrorCode::NoRuleNameInResponse),
            DecodeError::UnsupportedEncoding(_) => Some(InternalErrorCode::UnsupportedEncoding),
            DecodeError::UnknownError(_) => Some(InternalErrorCode::UnknownError),
            DecodeError::Syntax(_) | DecodeError::Conversion { .. } => None,
        }
    }

    /// Returns true for faults raised by malformed payload content.
    pub fn is_fault(&self) -> bool {
        self.code().is_none()
    }
}

/// Result type for decode operations.
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// A path string that does not follow the gNMI path conventions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid gNMI path '{path}': {reason}")]
pub struct PathError {
    /// The offending path string.
    pub path: String,
    /// What is wrong with it.
    pub reason: &'static str,
}

/// Errors from configuration and connection setup.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failed to read a PEM file for TLS.
    #[error("Failed to read {path}: {source}")]
    CertificateRead {
        path: String,
        #[source]
        source: io::Error,
    },

    /// gRPC transport setup error
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for configuration and connection operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;
