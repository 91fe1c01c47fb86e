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

use crate::compress::CompressType;
use crate::constants::{X_LOG_BODY_RAW_SIZE, X_LOG_COMPRESS_TYPE, X_LOG_REQUEST_ID};
use crate::response::{ErrorDetail, Headers, Response};
use aliyun_log_core::{Error, Result};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::fmt::{self, Debug};

type Decompressor = Box<dyn FnOnce(&Headers, Bytes) -> Result<Bytes> + Send>;

/// ResponseResolver turns a raw response into a [`Response`].
///
/// Success bodies are decompressed according to `x-log-compresstype`, then
/// deserialized. Both steps can be replaced.
pub struct ResponseResolver {
    resp: http::Response<Bytes>,
    decompressor: Decompressor,
}

impl Debug for ResponseResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseResolver")
            .field("status", &self.resp.status())
            .field("headers", self.resp.headers())
            .finish()
    }
}

impl ResponseResolver {
    /// Create a resolver for a received response.
    pub fn new(resp: http::Response<Bytes>) -> Self {
        Self {
            resp,
            decompressor: Box::new(auto_decompress),
        }
    }

    /// Replace the decompression step.
    pub fn decompress(
        mut self,
        f: impl FnOnce(&Headers, Bytes) -> Result<Bytes> + Send + 'static,
    ) -> Self {
        self.decompressor = Box::new(f);
        self
    }

    /// Resolve without decoding a result.
    pub fn resolve(self) -> Response<()> {
        Self::split(self.resp).0
    }

    /// Resolve and decode a JSON result.
    pub fn resolve_json<T: DeserializeOwned>(self) -> Result<Response<T>> {
        self.resolve_with(|bs| Ok(serde_json::from_slice(bs)?))
    }

    /// Resolve and decode the result with `deserialize`.
    pub fn resolve_with<T>(self, deserialize: impl FnOnce(&[u8]) -> Result<T>) -> Result<Response<T>> {
        let decompressor = self.decompressor;
        let (resp, body) = Self::split(self.resp);

        let result = match body {
            Some(bs) if resp.is_success && !bs.is_empty() => {
                let bs = decompressor(&resp.headers, bs)?;
                Some(deserialize(&bs)?)
            }
            _ => None,
        };

        Ok(Response {
            is_success: resp.is_success,
            status: resp.status,
            request_id: resp.request_id,
            headers: resp.headers,
            error: resp.error,
            result,
        })
    }

    /// Split into an envelope without result plus the success body.
    fn split(resp: http::Response<Bytes>) -> (Response<()>, Option<Bytes>) {
        let (parts, body) = resp.into_parts();
        let status = parts.status;
        let is_success = status.is_success();

        let mut headers = Headers::with_capacity(parts.headers.len());
        for (k, v) in &parts.headers {
            headers.insert(
                k.as_str().to_string(),
                String::from_utf8_lossy(v.as_bytes()).into_owned(),
            );
        }
        let request_id = headers.get(X_LOG_REQUEST_ID).cloned().unwrap_or_default();
        log::debug!("resolving response: status={status}, request_id={request_id}");

        let (error, body) = if is_success {
            (None, Some(body))
        } else {
            (parse_error_detail(&request_id, &body), None)
        };

        let resp = Response {
            is_success,
            status,
            request_id,
            headers,
            error,
            result: None,
        };
        (resp, body)
    }
}

fn parse_error_detail(request_id: &str, body: &[u8]) -> Option<ErrorDetail> {
    match serde_json::from_slice::<ErrorDetail>(body) {
        Ok(detail) => Some(detail),
        Err(e) => {
            log::warn!(
                "error body of request {request_id} is not a valid error detail: {e}, body: {}",
                String::from_utf8_lossy(body)
            );
            None
        }
    }
}

/// Decompress by `x-log-compresstype`, sized by `x-log-bodyrawsize`.
///
/// Missing or empty compress type leaves the body as is.
pub fn auto_decompress(headers: &Headers, body: Bytes) -> Result<Bytes> {
    let Some(compress_type) = headers.get(X_LOG_COMPRESS_TYPE).filter(|v| !v.is_empty()) else {
        return Ok(body);
    };
    let compress_type: CompressType = compress_type.parse()?;

    let raw_size = match headers.get(X_LOG_BODY_RAW_SIZE).filter(|v| !v.is_empty()) {
        Some(v) => Some(v.trim().parse::<usize>().map_err(|e| {
            Error::decode(format!("invalid x-log-bodyrawsize: {v}")).with_source(e)
        })?),
        None => None,
    };

    match compress_type {
        CompressType::None => Ok(body),
        _ => Ok(compress_type.decompress(&body, raw_size)?.into()),
    }
}
