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

//! Aliyun Log Service client.
//!
//! This crate turns typed requests into signed log service calls and typed
//! results back out of the responses. It covers projects, log stores, shards
//! and logs, and exposes the pipeline underneath for calls it does not model.
//!
//! ## Quick Start
//!
//! ```no_run
//! use aliyun_log::{Client, GetLogsRequest, LogGroupInfo, LogInfo, StaticCredentialProvider};
//! use aliyun_log_core::{Context, OsEnv, Result};
//! use aliyun_log_http_send_reqwest::ReqwestHttpSend;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new()
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     let client = Client::builder()
//!         .endpoint("cn-hangzhou.log.aliyuncs.com")
//!         .project("my-project")
//!         .credential_provider(StaticCredentialProvider::new("ak", "sk"))
//!         .context(ctx)
//!         .build()?;
//!
//!     let group = LogGroupInfo {
//!         topic: Some("access".to_string()),
//!         logs: vec![LogInfo::new(chrono::Utc::now()).with_content("status", "200")],
//!         ..Default::default()
//!     };
//!     client.post_logs("my-logstore", &group, None).await?.ensure_success()?;
//!
//!     let now = chrono::Utc::now().timestamp();
//!     let logs = client
//!         .get_logs("my-logstore", &GetLogsRequest::new(now - 900, now).with_query("status: 200"))
//!         .await?
//!         .into_result()?;
//!     println!("{logs:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Credential Sources
//!
//! ```bash
//! export ALIBABA_CLOUD_ACCESS_KEY_ID=your-access-key-id
//! export ALIBABA_CLOUD_ACCESS_KEY_SECRET=your-access-key-secret
//! export ALIBABA_CLOUD_SECURITY_TOKEN=your-sts-token  # Optional, for STS
//! ```
//!
//! [`DefaultCredentialProvider`] reads [`Config`] first and these variables
//! second. [`SharedCredentialProvider`] holds a credential the caller swaps
//! when its session token is refreshed.
//!
//! ## Lower Level Pipeline
//!
//! [`RequestBuilder`] stages content, serializes, compresses, authenticates and
//! signs a request. [`ResponseResolver`] decompresses and decodes the answer
//! into a [`Response`] envelope.
//!
//! ```
//! use aliyun_log::{CompressType, Credential, RequestBuilder, SerializeType};
//! use http::Method;
//!
//! # fn main() -> aliyun_log_core::Result<()> {
//! let req = RequestBuilder::new(Method::POST, "/logstores")?
//!     .content(&serde_json::json!({"logstoreName": "app", "ttl": 30, "shardCount": 2}))?
//!     .serialize(SerializeType::Json)?
//!     .compress(CompressType::Deflate)?
//!     .authenticate(Credential::new("ak", "sk"))?
//!     .build()?;
//! assert!(req.headers().contains_key("authorization"));
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::*;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

mod compress;
pub use compress::CompressType;

mod serialize;
pub use serialize::{flatten_query, SerializeType, ToQueryParams};

mod sign;
pub use sign::{compute_signature, SignatureType, StringToSign};

mod build;
pub use build::RequestBuilder;

mod response;
pub use response::{ErrorDetail, Headers, Response};

mod resolve;
pub use resolve::{auto_decompress, ResponseResolver};

pub mod proto;

mod model;
pub use model::*;

mod client;
pub use client::{Client, ClientBuilder};

mod operation;
