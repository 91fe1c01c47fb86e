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

//! Interned service error codes.

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::{Borrow, Cow};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// ErrorCode is a case-sensitive code string returned by the log service.
///
/// Codes documented by the service are interned: resolving the same known
/// string twice returns values that share storage (see [`ErrorCode::ptr_eq`]).
/// Unknown codes are kept as owned strings and still compare by value.
#[derive(Clone)]
pub struct ErrorCode(Cow<'static, str>);

macro_rules! known_codes {
    ($($(#[$meta:meta])* $name:ident => $code:literal,)*) => {
        impl ErrorCode {
            $(
                $(#[$meta])*
                pub const $name: ErrorCode = ErrorCode(Cow::Borrowed($code));
            )*
        }

        static KNOWN: Lazy<HashMap<&'static str, ErrorCode>> = Lazy::new(|| {
            HashMap::from([$(($code, ErrorCode::$name)),*])
        });
    };
}

known_codes! {
    /// Error raised inside the client itself.
    SDK_INTERNAL_ERROR => "SdkInternalError",
    /// Content-Length header is missing.
    MISSING_CONTENT_LENGTH => "MissingContentLength",
    /// Content-Type header is not supported.
    INVALID_CONTENT_TYPE => "InvalidContentType",
    /// Content-Type header is missing.
    MISSING_CONTENT_TYPE => "MissingContentType",
    /// x-log-bodyrawsize header is missing.
    MISSING_BODY_RAW_SIZE => "MissingBodyRawSize",
    /// x-log-bodyrawsize header is invalid.
    INVALID_BODY_RAW_SIZE => "InvalidBodyRawSize",
    /// x-log-compresstype header is invalid.
    INVALID_COMPRESS_TYPE => "InvalidCompressType",
    /// Host header is missing.
    MISSING_HOST => "MissingHost",
    /// Date header is missing.
    MISSING_DATE => "MissingDate",
    /// Date header is malformed.
    INVALID_DATE_FORMAT => "InvalidDateFormat",
    /// x-log-apiversion header is missing.
    MISSING_API_VERSION => "MissingAPIVersion",
    /// x-log-apiversion header is invalid.
    INVALID_API_VERSION => "InvalidAPIVersion",
    /// AccessKeyId is missing from the Authorization header.
    MISS_ACCESS_KEY_ID => "MissAccessKeyId",
    /// Caller is not authorized.
    UNAUTHORIZED => "Unauthorized",
    /// x-log-signaturemethod header is missing.
    MISSING_SIGNATURE_METHOD => "MissingSignatureMethod",
    /// x-log-signaturemethod header is invalid.
    INVALID_SIGNATURE_METHOD => "InvalidSignatureMethod",
    /// Request date differs too much from server time.
    REQUEST_TIME_TOO_SKEWED => "RequestTimeTooSkewed",
    /// Project does not exist.
    PROJECT_NOT_EXIST => "ProjectNotExist",
    /// Signature does not match.
    SIGNATURE_NOT_MATCH => "SignatureNotMatch",
    /// Write quota exceeded.
    WRITE_QUOTA_EXCEED => "WriteQuotaExceed",
    /// Read quota exceeded.
    READ_QUOTA_EXCEED => "ReadQuotaExceed",
    /// Server internal error.
    INTERNAL_SERVER_ERROR => "InternalServerError",
    /// Server is busy.
    SERVER_BUSY => "ServerBusy",
}

impl ErrorCode {
    /// Resolve a code string, returning the interned instance if it is known.
    pub fn new(code: impl AsRef<str> + Into<String>) -> Self {
        match KNOWN.get(code.as_ref()) {
            Some(v) => v.clone(),
            None => ErrorCode(Cow::Owned(code.into())),
        }
    }

    /// Check whether the given string is a documented service code.
    pub fn is_known_code(code: &str) -> bool {
        KNOWN.contains_key(code)
    }

    /// All documented service codes.
    pub fn known() -> impl Iterator<Item = &'static ErrorCode> {
        KNOWN.values()
    }

    /// Check whether this code is a documented service code.
    pub fn is_known(&self) -> bool {
        Self::is_known_code(&self.0)
    }

    /// Code as str.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether both codes are the same interned instance.
    ///
    /// Only known codes are interned; owned codes never share identity.
    pub fn ptr_eq(&self, other: &ErrorCode) -> bool {
        match (&self.0, &other.0) {
            (Cow::Borrowed(a), Cow::Borrowed(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }
}

impl From<&str> for ErrorCode {
    fn from(value: &str) -> Self {
        ErrorCode::new(value)
    }
}

impl From<String> for ErrorCode {
    fn from(value: String) -> Self {
        ErrorCode::new(value)
    }
}

impl AsRef<str> for ErrorCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ErrorCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErrorCode({:?})", self.0)
    }
}

impl PartialEq for ErrorCode {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for ErrorCode {}

impl PartialEq<str> for ErrorCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ErrorCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<String> for ErrorCode {
    fn eq(&self, other: &String) -> bool {
        self.0 == other.as_str()
    }
}

impl PartialEq<ErrorCode> for &str {
    fn eq(&self, other: &ErrorCode) -> bool {
        *self == other.0
    }
}

impl Hash for ErrorCode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.as_ref().hash(state)
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(ErrorCode::from(code))
    }
}
