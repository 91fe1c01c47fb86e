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

use crate::constants::*;
use crate::response::Headers;
use crate::serialize::{flatten_query, ToQueryParams};
use aliyun_log_core::time::DateTime;
use aliyun_log_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

/// LogInfo is a single log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogInfo {
    /// Event time, sent with second precision.
    pub time: DateTime,
    pub contents: BTreeMap<String, String>,
}

impl LogInfo {
    pub fn new(time: DateTime) -> Self {
        Self {
            time,
            contents: BTreeMap::new(),
        }
    }

    /// Add a field.
    pub fn with_content(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.contents.insert(key.into(), value.into());
        self
    }
}

/// LogGroupInfo is a batch of logs sharing topic, source and tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogGroupInfo {
    pub topic: Option<String>,
    pub source: Option<String>,
    pub log_tags: BTreeMap<String, String>,
    pub logs: Vec<LogInfo>,
}

/// Whether a query has scanned all matching data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogProgressState {
    Complete,
    Incomplete,
}

impl LogProgressState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogProgressState::Complete => "Complete",
            LogProgressState::Incomplete => "Incomplete",
        }
    }
}

impl FromStr for LogProgressState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("complete") {
            Ok(LogProgressState::Complete)
        } else if s.eq_ignore_ascii_case("incomplete") {
            Ok(LogProgressState::Incomplete)
        } else {
            Err(Error::decode(format!("unknown log progress: {s}")))
        }
    }
}

string_enum_serde!(LogProgressState);

/// Query of get logs on a log store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetLogsRequest {
    /// Unix timestamp in seconds, inclusive.
    pub from: i64,
    /// Unix timestamp in seconds, exclusive.
    pub to: i64,
    pub topic: Option<String>,
    pub query: Option<String>,
    pub line: i32,
    pub offset: i32,
    pub reverse: bool,
}

impl GetLogsRequest {
    pub fn new(from: i64, to: i64) -> Self {
        Self {
            from,
            to,
            topic: None,
            query: None,
            line: 100,
            offset: 0,
            reverse: false,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }
}

impl ToQueryParams for GetLogsRequest {
    fn to_query_params(&self) -> Result<Vec<(String, String)>> {
        flatten_query(self)
    }
}

/// Query of get logs across the whole project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProjectLogsRequest {
    pub query: String,
}

impl ToQueryParams for GetProjectLogsRequest {
    fn to_query_params(&self) -> Result<Vec<(String, String)>> {
        flatten_query(self)
    }
}

/// Query of get histograms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetLogHistogramsRequest {
    pub from: i64,
    pub to: i64,
    pub topic: Option<String>,
    pub query: Option<String>,
}

impl GetLogHistogramsRequest {
    pub fn new(from: i64, to: i64) -> Self {
        Self {
            from,
            to,
            topic: None,
            query: None,
        }
    }
}

impl ToQueryParams for GetLogHistogramsRequest {
    fn to_query_params(&self) -> Result<Vec<(String, String)>> {
        flatten_query(self)
    }
}

/// Extra information about an executed query, carried by `x-log-query-info`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQueryInfo {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub terms: Vec<Value>,
    pub limited: Option<i64>,
    pub marker: Option<String>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// GetLogsResult holds matched rows plus the query statistics from headers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetLogsResult {
    pub progress: Option<LogProgressState>,
    pub count: i32,
    pub processed_rows: i64,
    pub elapsed_millisecond: i64,
    pub has_sql: bool,
    pub agg_query: Option<String>,
    pub where_query: Option<String>,
    pub query_info: Option<LogQueryInfo>,
    pub logs: Vec<BTreeMap<String, String>>,
}

impl GetLogsResult {
    /// Fold the statistics headers into a result.
    pub(crate) fn from_headers(headers: &Headers, logs: Vec<BTreeMap<String, String>>) -> Result<Self> {
        let query_info = match headers.get(X_LOG_QUERY_INFO).filter(|v| !v.is_empty()) {
            Some(v) => Some(serde_json::from_str(v).map_err(|e| {
                Error::decode("invalid x-log-query-info").with_source(e)
            })?),
            None => None,
        };

        Ok(Self {
            progress: progress_from_headers(headers),
            count: number_from_headers(headers, X_LOG_COUNT)?,
            processed_rows: number_from_headers(headers, X_LOG_PROCESSED_ROWS)?,
            elapsed_millisecond: number_from_headers(headers, X_LOG_ELAPSED_MILLISECOND)?,
            has_sql: headers
                .get(X_LOG_HAS_SQL)
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("true")),
            agg_query: headers.get(X_LOG_AGG_QUERY).cloned(),
            where_query: headers.get(X_LOG_WHERE_QUERY).cloned(),
            query_info,
            logs,
        })
    }
}

/// One bucket of a histogram.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogHistogramInfo {
    pub from: i64,
    pub to: i64,
    pub count: i64,
    pub progress: LogProgressState,
}

/// GetLogHistogramsResult holds the buckets plus the statistics from headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetLogHistogramsResult {
    pub progress: Option<LogProgressState>,
    pub count: i64,
    pub histograms: Vec<LogHistogramInfo>,
}

impl GetLogHistogramsResult {
    pub(crate) fn from_headers(headers: &Headers, histograms: Vec<LogHistogramInfo>) -> Result<Self> {
        Ok(Self {
            progress: progress_from_headers(headers),
            count: number_from_headers(headers, X_LOG_COUNT)?,
            histograms,
        })
    }
}

/// PullLogsResult holds the pulled log groups and where to continue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullLogsResult {
    pub log_groups: Vec<LogGroupInfo>,
    /// Cursor to pass to the next pull, from `x-log-cursor`.
    pub next_cursor: Option<String>,
    /// Number of log groups returned, from `x-log-count`.
    pub count: i32,
}

/// Decode the JSON rows of get logs.
///
/// Values that are not strings are kept in their JSON text form.
pub(crate) fn log_rows_from_json(bs: &[u8]) -> Result<Vec<BTreeMap<String, String>>> {
    let rows: Vec<BTreeMap<String, Value>> = serde_json::from_slice(bs)?;
    Ok(rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|(k, v)| match v {
                    Value::String(s) => (k, s),
                    Value::Null => (k, String::new()),
                    other => (k, other.to_string()),
                })
                .collect()
        })
        .collect())
}

/// Unknown progress values are dropped.
pub(crate) fn progress_from_headers(headers: &Headers) -> Option<LogProgressState> {
    headers.get(X_LOG_PROGRESS).and_then(|v| v.trim().parse().ok())
}

/// Missing headers read as zero.
pub(crate) fn number_from_headers<T: FromStr + Default>(headers: &Headers, name: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match headers.get(name).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        Some(v) => v
            .parse()
            .map_err(|e| Error::decode(format!("invalid {name}: {v}")).with_source(e)),
        None => Ok(T::default()),
    }
}
