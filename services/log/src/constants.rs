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

// Env values used by the log client.
pub const ALIYUN_LOG_ENDPOINT: &str = "ALIYUN_LOG_ENDPOINT";
pub const ALIYUN_LOG_PROJECT: &str = "ALIYUN_LOG_PROJECT";
pub const ALIBABA_CLOUD_ACCESS_KEY_ID: &str = "ALIBABA_CLOUD_ACCESS_KEY_ID";
pub const ALIBABA_CLOUD_ACCESS_KEY_SECRET: &str = "ALIBABA_CLOUD_ACCESS_KEY_SECRET";
pub const ALIBABA_CLOUD_SECURITY_TOKEN: &str = "ALIBABA_CLOUD_SECURITY_TOKEN";

// Protocol constants.
pub const API_VERSION: &str = "0.6.0";
pub const USER_AGENT_VALUE: &str = concat!("aliyun-log-rust-sdk/", env!("CARGO_PKG_VERSION"));
pub const AUTHORIZATION_PREFIX: &str = "LOG";

// Media types.
pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_PROTOBUF: &str = "application/x-protobuf";

// Headers, lower-cased as `http::HeaderName` stores them.
pub const CONTENT_MD5: &str = "content-md5";
pub const X_LOG_API_VERSION: &str = "x-log-apiversion";
pub const X_LOG_BODY_RAW_SIZE: &str = "x-log-bodyrawsize";
pub const X_LOG_COMPRESS_TYPE: &str = "x-log-compresstype";
pub const X_LOG_SIGNATURE_METHOD: &str = "x-log-signaturemethod";
pub const X_ACS_SECURITY_TOKEN: &str = "x-acs-security-token";
pub const X_LOG_REQUEST_ID: &str = "x-log-requestid";
pub const X_LOG_COUNT: &str = "x-log-count";
pub const X_LOG_CURSOR: &str = "x-log-cursor";
pub const X_LOG_PROGRESS: &str = "x-log-progress";
pub const X_LOG_PROCESSED_ROWS: &str = "x-log-processed-rows";
pub const X_LOG_ELAPSED_MILLISECOND: &str = "x-log-elapsed-millisecond";
pub const X_LOG_HAS_SQL: &str = "x-log-has-sql";
pub const X_LOG_AGG_QUERY: &str = "x-log-agg-query";
pub const X_LOG_WHERE_QUERY: &str = "x-log-where-query";
pub const X_LOG_QUERY_INFO: &str = "x-log-query-info";

/// Header prefixes that take part in the string to sign.
pub const SIGNED_HEADER_PREFIXES: [&str; 2] = ["x-log", "x-acs"];
