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

use crate::serialize::{flatten_query, ToQueryParams};
use aliyun_log_core::Result;
use serde::{Deserialize, Serialize};

/// Parameters to create a log store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLogStoreRequest {
    pub logstore_name: String,
    /// Retention in days.
    pub ttl: i32,
    pub shard_count: i32,
}

impl CreateLogStoreRequest {
    pub fn new(logstore_name: impl Into<String>, ttl: i32, shard_count: i32) -> Self {
        Self {
            logstore_name: logstore_name.into(),
            ttl,
            shard_count,
        }
    }
}

/// Parameters to update a log store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLogStoreRequest {
    pub logstore_name: String,
    pub ttl: i32,
    pub shard_count: i32,
}

/// Query of list log stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLogStoreRequest {
    /// Filter by name, fuzzy matched by the service.
    pub logstore_name: Option<String>,
    pub offset: i32,
    pub size: i32,
}

impl Default for ListLogStoreRequest {
    fn default() -> Self {
        Self {
            logstore_name: None,
            offset: 1,
            size: 500,
        }
    }
}

impl ToQueryParams for ListLogStoreRequest {
    fn to_query_params(&self) -> Result<Vec<(String, String)>> {
        flatten_query(self)
    }
}

/// GetLogStoreResult describes a log store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetLogStoreResult {
    pub logstore_name: String,
    pub ttl: i32,
    pub shard_count: i32,
    #[serde(default)]
    pub create_time: i64,
    #[serde(default)]
    pub last_modify_time: i64,
}

/// ListLogStoreResult is one page of log store names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListLogStoreResult {
    pub count: i32,
    pub total: i32,
    #[serde(default)]
    pub logstores: Vec<String>,
}
