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

//! [`HttpSend`] implementation backed by [`reqwest`].
//!
//! ```no_run
//! use aliyun_log_core::Context;
//! use aliyun_log_http_send_reqwest::{HttpOptions, ReqwestHttpSend};
//! use std::time::Duration;
//!
//! # fn main() -> aliyun_log_core::Result<()> {
//! let send = ReqwestHttpSend::with_options(
//!     HttpOptions::default().with_timeout(Duration::from_secs(30)),
//! )?;
//! let ctx = Context::new().with_http_send(send);
//! # Ok(())
//! # }
//! ```

use aliyun_log_core::{Error, HttpSend, Result};
use async_trait::async_trait;
use bytes::Bytes;
use http::HeaderMap;
use http_body_util::BodyExt;
use reqwest::{Client, Request};
use std::time::Duration;

/// Transport options applied when the underlying [`Client`] is built.
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    /// Total timeout for a single request.
    pub timeout: Option<Duration>,
    /// Timeout for establishing a connection.
    pub connect_timeout: Option<Duration>,
    /// Proxy url applied to every scheme, e.g. `http://127.0.0.1:8080`.
    pub proxy: Option<String>,
    /// Headers attached to every request unless the request sets them.
    pub default_headers: HeaderMap,
}

impl HttpOptions {
    /// Set the total request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Route all requests through the given proxy.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Replace the default headers.
    pub fn with_default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }
}

/// ReqwestHttpSend sends signed requests with a shared [`Client`].
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from [`HttpOptions`].
    pub fn with_options(opts: HttpOptions) -> Result<Self> {
        let mut builder = Client::builder().default_headers(opts.default_headers);
        if let Some(timeout) = opts.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = opts.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(proxy) = &opts.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str()).map_err(|e| {
                Error::config_invalid(format!("invalid proxy: {proxy}")).with_source(e)
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::config_invalid("build http client failed").with_source(e))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req)
            .map_err(|e| Error::request_invalid("convert request failed").with_source(e))?;
        log::debug!("sending {} {}", req.method(), req.url());

        let resp = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::transport("send request failed").with_source(e))?;
        let resp: http::Response<_> = resp.into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::transport("read response body failed").with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}
