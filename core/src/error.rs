//! Error types for the voip.ms API client.
//!
//! # Design
//! `ApiError` has exactly three kinds with no overlap: caller mistakes caught
//! before any I/O, explicit rejections by the service, and successful
//! envelopes whose payload does not match the operation's extraction path.
//! Transport failures never become an `ApiError`; `CallError` carries them
//! through untouched.

use thiserror::Error;

/// Errors produced while building a request or interpreting a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The caller broke an operation's contract (missing required parameter,
    /// unknown parameter, wrong value type). Raised before any network call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The service answered with a non-success `status`. Carries the status
    /// string verbatim, e.g. `invalid_credentials`.
    #[error("remote error: {0}")]
    RemoteError(String),

    /// The body was not JSON, had no usable `status`, or lacked the field
    /// the operation extracts from a successful response.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ApiError {
    /// The verbatim remote status, if the service rejected the request.
    pub fn remote_status(&self) -> Option<&str> {
        match self {
            ApiError::RemoteError(status) => Some(status),
            _ => None,
        }
    }
}

/// Errors returned by `VoipMsClient::call`, which also performs the I/O.
#[derive(Debug, Error)]
pub enum CallError<E> {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Passed through from the transport unchanged.
    #[error("transport error: {0}")]
    Transport(#[source] E),
}

impl<E> CallError<E> {
    /// The `ApiError`, if the failure happened outside the transport.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            CallError::Api(err) => Some(err),
            CallError::Transport(_) => None,
        }
    }
}

/// Errors raised while reading client configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("environment variable {0} is not valid unicode")]
    InvalidVar(&'static str),
}
