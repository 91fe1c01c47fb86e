// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::ErrorCode;
use std::fmt;
use thiserror::Error;

/// The error type for aliyun log operations
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    service: Option<Box<ServiceError>>,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No credential could be loaded for signing
    CredentialMissing,

    /// A builder operation was called in the wrong stage
    StageInvalid,

    /// Query object is not a flat key/value record
    QueryShapeInvalid,

    /// Content does not fit the requested serialization
    ContentShapeInvalid,

    /// Signature algorithm is not supported
    AlgorithmUnsupported,

    /// Compression type is unknown or unsupported
    CompressionUnsupported,

    /// Request cannot be built (bad header, uri, etc.)
    RequestInvalid,

    /// Configuration error (missing fields, invalid values)
    ConfigInvalid,

    /// Transport failed before a response was received
    Transport,

    /// Response payload could not be decompressed or decoded
    Decode,

    /// Service answered with an error detail
    Service,

    /// Unexpected errors
    Unexpected,
}

/// Error detail reported by the log service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    /// Request id echoed by the service, empty when absent.
    pub request_id: String,
    /// Service error code.
    pub code: ErrorCode,
    /// Human readable message.
    pub message: String,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.request_id, self.code, self.message)
    }
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            service: None,
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the service error detail, present only for [`ErrorKind::Service`].
    pub fn service_error(&self) -> Option<&ServiceError> {
        self.service.as_deref()
    }

    /// Get the service error code, if any.
    pub fn code(&self) -> Option<&ErrorCode> {
        self.service.as_ref().map(|v| &v.code)
    }

    /// Check if this is a stage error
    pub fn is_stage_error(&self) -> bool {
        self.kind == ErrorKind::StageInvalid
    }

    /// Check if the caller passed a value the builder cannot accept
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::QueryShapeInvalid
                | ErrorKind::ContentShapeInvalid
                | ErrorKind::AlgorithmUnsupported
                | ErrorKind::CompressionUnsupported
        )
    }
}

// Convenience constructors
impl Error {
    /// Create a credential missing error
    pub fn credential_missing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialMissing, message)
    }

    /// Create a stage invalid error
    pub fn stage_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StageInvalid, message)
    }

    /// Create a query shape error
    pub fn query_shape_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::QueryShapeInvalid, message)
    }

    /// Create a content shape error
    pub fn content_shape_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ContentShapeInvalid, message)
    }

    /// Create an unsupported algorithm error
    pub fn algorithm_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlgorithmUnsupported, message)
    }

    /// Create an unsupported compression error
    pub fn compression_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CompressionUnsupported, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    /// Create a service error carrying the detail reported by the server
    pub fn service(detail: ServiceError) -> Self {
        Self {
            kind: ErrorKind::Service,
            message: detail.to_string(),
            service: Some(Box::new(detail)),
            source: None,
        }
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::CredentialMissing => write!(f, "credential missing"),
            ErrorKind::StageInvalid => write!(f, "invalid builder stage"),
            ErrorKind::QueryShapeInvalid => write!(f, "invalid query shape"),
            ErrorKind::ContentShapeInvalid => write!(f, "invalid content shape"),
            ErrorKind::AlgorithmUnsupported => write!(f, "unsupported signature algorithm"),
            ErrorKind::CompressionUnsupported => write!(f, "unsupported compression"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::Transport => write!(f, "transport error"),
            ErrorKind::Decode => write!(f, "decode error"),
            ErrorKind::Service => write!(f, "service error"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::ToStrError> for Error {
    fn from(err: http::header::ToStrError) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::decode(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_service_error_message() {
        let err = Error::service(ServiceError {
            request_id: "5E0B".to_string(),
            code: ErrorCode::from("SignatureNotMatch"),
            message: "signature mismatch".to_string(),
        });

        assert_eq!(err.kind(), ErrorKind::Service);
        assert_eq!(err.to_string(), "[5E0B] SignatureNotMatch (signature mismatch)");
        assert_eq!(err.code(), Some(&ErrorCode::SIGNATURE_NOT_MATCH));
    }

    #[test]
    fn test_argument_errors() {
        assert!(Error::query_shape_invalid("nested").is_argument_error());
        assert!(Error::compression_unsupported("zstd").is_argument_error());
        assert!(!Error::stage_invalid("twice").is_argument_error());
        assert!(Error::stage_invalid("twice").is_stage_error());
    }
}
