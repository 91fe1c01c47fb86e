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

use std::str::FromStr;
use std::convert::Infallible;
use serde::{Deserialize, Serialize};

/// Status of a shard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShardState {
    /// Accepts both reads and writes.
    ReadWrite,
    /// Closed by a split or merge, only readable.
    ReadOnly,
    /// A status this client does not know about.
    Other(String),
}

impl ShardState {
    /// Wire value of this status.
    pub fn as_str(&self) -> &str {
        match self {
            ShardState::ReadWrite => "readwrite",
            ShardState::ReadOnly => "readonly",
            ShardState::Other(v) => v,
        }
    }
}

impl FromStr for ShardState {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.eq_ignore_ascii_case("readwrite") {
            ShardState::ReadWrite
        } else if s.eq_ignore_ascii_case("readonly") {
            ShardState::ReadOnly
        } else {
            ShardState::Other(s.to_string())
        })
    }
}

string_enum_serde!(ShardState);

/// ShardInfo describes one shard of a log store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardInfo {
    #[serde(rename = "shardID")]
    pub shard_id: i32,
    pub status: ShardState,
    #[serde(default)]
    pub inclusive_begin_key: String,
    #[serde(default)]
    pub exclusive_end_key: String,
    /// Unix timestamp in seconds.
    #[serde(default)]
    pub create_time: i64,
}

/// Where to position a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorPosition {
    /// The oldest data still retained.
    Begin,
    /// Right after the newest data.
    End,
    /// The first log group received at or after this unix timestamp.
    At(i64),
}

impl std::fmt::Display for CursorPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CursorPosition::Begin => f.write_str("begin"),
            CursorPosition::End => f.write_str("end"),
            CursorPosition::At(ts) => write!(f, "{ts}"),
        }
    }
}

/// GetCursorResult carries a cursor for pull logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetCursorResult {
    pub cursor: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shard_info_from_json() {
        let shards: Vec<ShardInfo> = serde_json::from_str(
            r#"[
                {"shardID":0,"status":"readwrite","inclusiveBeginKey":"00000000000000000000000000000000","exclusiveEndKey":"80000000000000000000000000000000","createTime":1577836800},
                {"shardID":1,"status":"ReadOnly","inclusiveBeginKey":"8","exclusiveEndKey":"f","createTime":1577836801},
                {"shardID":2,"status":"migrating"}
            ]"#,
        )
        .unwrap();

        assert_eq!(shards[0].shard_id, 0);
        assert_eq!(shards[0].status, ShardState::ReadWrite);
        assert_eq!(shards[0].create_time, 1_577_836_800);
        assert_eq!(shards[1].status, ShardState::ReadOnly);
        assert_eq!(shards[2].status, ShardState::Other("migrating".to_string()));
        assert_eq!(shards[2].inclusive_begin_key, "");
    }

    #[test]
    fn test_cursor_position() {
        assert_eq!(CursorPosition::Begin.to_string(), "begin");
        assert_eq!(CursorPosition::End.to_string(), "end");
        assert_eq!(CursorPosition::At(1_577_836_800).to_string(), "1577836800");
    }
}
