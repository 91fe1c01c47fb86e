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

use aliyun_log_core::{Error, ErrorCode, Result, ServiceError};
use http::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;

/// Response headers flattened into lower-cased name to value.
pub type Headers = HashMap<String, String>;

/// Error detail carried by a non-2xx response body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    /// Service error code.
    pub error_code: ErrorCode,
    /// Human readable message.
    #[serde(default)]
    pub error_message: String,
}

/// Response is the uniform envelope every call resolves into.
///
/// Service failures are returned as data. Use [`Response::ensure_success`] or
/// [`Response::into_result`] to turn them into an [`Error`].
#[derive(Debug, Clone)]
pub struct Response<T> {
    pub(crate) is_success: bool,
    pub(crate) status: StatusCode,
    pub(crate) request_id: String,
    pub(crate) headers: Headers,
    pub(crate) error: Option<ErrorDetail>,
    pub(crate) result: Option<T>,
}

impl<T> Response<T> {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        self.is_success
    }

    /// HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Value of `x-log-requestid`, empty when absent.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Flattened response headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Header value by lower-cased name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Error detail of a failed response.
    pub fn error(&self) -> Option<&ErrorDetail> {
        self.error.as_ref()
    }

    /// Decoded result of a successful response.
    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    /// Take the decoded result.
    pub fn into_inner(self) -> Option<T> {
        self.result
    }

    /// Fail with [`ErrorKind::Service`](aliyun_log_core::ErrorKind::Service) if the call failed.
    pub fn ensure_success(&self) -> Result<()> {
        if self.is_success {
            return Ok(());
        }

        let detail = match &self.error {
            Some(e) => ServiceError {
                request_id: self.request_id.clone(),
                code: e.error_code.clone(),
                message: e.error_message.clone(),
            },
            None => ServiceError {
                request_id: self.request_id.clone(),
                code: ErrorCode::SDK_INTERNAL_ERROR,
                message: "The error detail result is missing.".to_string(),
            },
        };
        Err(Error::service(detail))
    }

    /// Ensure success and take the result.
    pub fn into_result(self) -> Result<Option<T>> {
        self.ensure_success()?;
        Ok(self.result)
    }

    /// Re-wrap the result through `f`, which also sees the response headers.
    ///
    /// Status, request id, headers and error are carried over; the response is not re-read.
    pub fn transform<U>(self, f: impl FnOnce(&Headers, T) -> U) -> Response<U> {
        let result = match self.result {
            Some(v) => Some(f(&self.headers, v)),
            None => None,
        };

        Response {
            is_success: self.is_success,
            status: self.status,
            request_id: self.request_id,
            headers: self.headers,
            error: self.error,
            result,
        }
    }

    /// Like [`Response::transform`] but `f` may fail.
    pub fn try_transform<U>(self, f: impl FnOnce(&Headers, T) -> Result<U>) -> Result<Response<U>> {
        let result = match self.result {
            Some(v) => Some(f(&self.headers, v)?),
            None => None,
        };

        Ok(Response {
            is_success: self.is_success,
            status: self.status,
            request_id: self.request_id,
            headers: self.headers,
            error: self.error,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aliyun_log_core::ErrorKind;
    use pretty_assertions::assert_eq;

    fn response(is_success: bool, error: Option<ErrorDetail>, result: Option<i32>) -> Response<i32> {
        Response {
            is_success,
            status: if is_success {
                StatusCode::OK
            } else {
                StatusCode::BAD_REQUEST
            },
            request_id: "5E0B".to_string(),
            headers: Headers::from([("x-log-count".to_string(), "3".to_string())]),
            error,
            result,
        }
    }

    #[test]
    fn test_transform_uses_headers() {
        let resp = response(true, None, Some(2)).transform(|h, v| {
            let count: i32 = h["x-log-count"].parse().unwrap();
            v * count
        });
        assert_eq!(resp.result(), Some(&6));
        assert_eq!(resp.request_id(), "5E0B");
        assert_eq!(resp.header("x-log-count"), Some("3"));
    }

    #[test]
    fn test_transform_without_result() {
        let resp = response(true, None, None).transform(|_, v| v.to_string());
        assert!(resp.result().is_none());
        assert!(resp.is_success());
    }

    #[test]
    fn test_ensure_success_missing_detail() {
        let err = response(false, None, None).ensure_success().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Service);
        assert_eq!(err.code(), Some(&ErrorCode::SDK_INTERNAL_ERROR));
        assert_eq!(
            err.to_string(),
            "[5E0B] SdkInternalError (The error detail result is missing.)"
        );
    }

    #[test]
    fn test_into_result() {
        assert_eq!(response(true, None, Some(1)).into_result().unwrap(), Some(1));

        let err = response(
            false,
            Some(ErrorDetail {
                error_code: ErrorCode::from("ProjectNotExist"),
                error_message: "project does not exist".to_string(),
            }),
            None,
        )
        .into_result()
        .unwrap_err();
        let detail = err.service_error().unwrap();
        assert_eq!(detail.code, "ProjectNotExist");
        assert_eq!(detail.request_id, "5E0B");
    }
}
