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

//! Protobuf messages of the log batch wire format.
//!
//! Field tags are fixed by the service and must not change.

use crate::model::{LogGroupInfo, LogInfo};
use aliyun_log_core::{Error, Result};
use chrono::TimeZone;
use prost::Message;

/// Log is a single record.
#[derive(Clone, PartialEq, Message)]
pub struct Log {
    /// Unix timestamp in seconds.
    #[prost(uint32, required, tag = "1")]
    pub time: u32,
    #[prost(message, repeated, tag = "2")]
    pub contents: Vec<LogContent>,
}

/// LogContent is one key/value field of a [`Log`].
#[derive(Clone, PartialEq, Message)]
pub struct LogContent {
    #[prost(string, required, tag = "1")]
    pub key: String,
    #[prost(string, required, tag = "2")]
    pub value: String,
}

/// LogTag is one key/value tag shared by a [`LogGroup`].
#[derive(Clone, PartialEq, Message)]
pub struct LogTag {
    #[prost(string, required, tag = "1")]
    pub key: String,
    #[prost(string, required, tag = "2")]
    pub value: String,
}

/// LogGroup is the unit posted to and pulled from a shard.
#[derive(Clone, PartialEq, Message)]
pub struct LogGroup {
    #[prost(message, repeated, tag = "1")]
    pub logs: Vec<Log>,
    #[prost(string, optional, tag = "2")]
    pub reserved: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub topic: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub source: Option<String>,
    #[prost(message, repeated, tag = "6")]
    pub log_tags: Vec<LogTag>,
}

/// LogGroupList is the body returned by pull logs.
#[derive(Clone, PartialEq, Message)]
pub struct LogGroupList {
    #[prost(message, repeated, tag = "1")]
    pub log_group_list: Vec<LogGroup>,
}

impl LogGroupList {
    /// Decode from protobuf bytes.
    pub fn decode_bytes(bs: &[u8]) -> Result<Self> {
        Self::decode(bs).map_err(|e| Error::decode("decode log group list failed").with_source(e))
    }
}

impl From<&LogInfo> for Log {
    fn from(v: &LogInfo) -> Self {
        Log {
            // Out of range timestamps clamp, the service only accepts u32 seconds.
            time: u32::try_from(v.time.timestamp().max(0)).unwrap_or(u32::MAX),
            contents: v
                .contents
                .iter()
                .map(|(key, value)| LogContent {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
        }
    }
}

impl From<&LogGroupInfo> for LogGroup {
    fn from(v: &LogGroupInfo) -> Self {
        LogGroup {
            logs: v.logs.iter().map(Log::from).collect(),
            reserved: None,
            topic: Some(v.topic.clone().unwrap_or_default()),
            source: Some(v.source.clone().unwrap_or_default()),
            log_tags: v
                .log_tags
                .iter()
                .map(|(key, value)| LogTag {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
        }
    }
}

impl From<Log> for LogInfo {
    fn from(v: Log) -> Self {
        LogInfo {
            time: chrono::Utc
                .timestamp_opt(i64::from(v.time), 0)
                .single()
                .unwrap_or_default(),
            contents: v.contents.into_iter().map(|c| (c.key, c.value)).collect(),
        }
    }
}

impl From<LogGroup> for LogGroupInfo {
    fn from(v: LogGroup) -> Self {
        LogGroupInfo {
            topic: v.topic,
            source: v.source,
            log_tags: v.log_tags.into_iter().map(|t| (t.key, t.value)).collect(),
            logs: v.logs.into_iter().map(LogInfo::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn group() -> LogGroupInfo {
        LogGroupInfo {
            topic: Some("access".to_string()),
            source: None,
            log_tags: BTreeMap::from([("host".to_string(), "web-1".to_string())]),
            logs: vec![LogInfo {
                time: chrono::Utc.timestamp_opt(1_577_836_800, 0).unwrap(),
                contents: BTreeMap::from([
                    ("status".to_string(), "200".to_string()),
                    ("path".to_string(), "".to_string()),
                ]),
            }],
        }
    }

    #[test]
    fn test_domain_round_trip() {
        let info = group();
        let bs = LogGroup::from(&info).encode_to_vec();
        let decoded = LogGroupInfo::from(LogGroup::decode(bs.as_slice()).unwrap());

        assert_eq!(decoded.topic.as_deref(), Some("access"));
        // None source goes on the wire as an empty string.
        assert_eq!(decoded.source.as_deref(), Some(""));
        assert_eq!(decoded.log_tags, info.log_tags);
        assert_eq!(decoded.logs, info.logs);
    }

    #[test]
    fn test_empty_values_are_encoded() {
        let log = Log {
            time: 0,
            contents: vec![LogContent {
                key: "k".to_string(),
                value: String::new(),
            }],
        };
        // tag 1 varint 0, tag 2 message { tag 1 "k", tag 2 "" }
        assert_eq!(
            log.encode_to_vec(),
            vec![0x08, 0x00, 0x12, 0x05, 0x0a, 0x01, b'k', 0x12, 0x00]
        );
    }

    #[test]
    fn test_decode_invalid() {
        assert!(LogGroupList::decode_bytes(&[0xff, 0xff]).is_err());
    }
}
