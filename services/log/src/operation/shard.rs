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

use crate::build::RequestBuilder;
use crate::client::Client;
use crate::model::{CursorPosition, GetCursorResult, ShardInfo};
use crate::response::Response;
use aliyun_log_core::Result;
use http::Method;

impl Client {
    pub async fn list_shards(&self, logstore: &str) -> Result<Response<Vec<ShardInfo>>> {
        let builder = RequestBuilder::new(Method::GET, &format!("/logstores/{logstore}/shards"))?;
        self.send(builder, self.project_route()?).await?.resolve_json()
    }

    /// Split a read-write shard at `split_key`, a 32 char hex hash.
    ///
    /// Returns the shards touched by the split.
    pub async fn split_shard(
        &self,
        logstore: &str,
        shard_id: i32,
        split_key: &str,
    ) -> Result<Response<Vec<ShardInfo>>> {
        let builder = RequestBuilder::new(
            Method::POST,
            &format!("/logstores/{logstore}/shards/{shard_id}"),
        )?
        .query("action", "split")
        .query("key", split_key);
        self.send(builder, self.project_route()?).await?.resolve_json()
    }

    /// Merge `shard_id` with its right neighbour.
    pub async fn merge_shards(&self, logstore: &str, shard_id: i32) -> Result<Response<Vec<ShardInfo>>> {
        let builder = RequestBuilder::new(
            Method::POST,
            &format!("/logstores/{logstore}/shards/{shard_id}"),
        )?
        .query("action", "merge");
        self.send(builder, self.project_route()?).await?.resolve_json()
    }

    pub async fn get_cursor(
        &self,
        logstore: &str,
        shard_id: i32,
        from: CursorPosition,
    ) -> Result<Response<GetCursorResult>> {
        let builder = RequestBuilder::new(
            Method::GET,
            &format!("/logstores/{logstore}/shards/{shard_id}"),
        )?
        .query("type", "cursor")
        .query("from", from.to_string());
        self.send(builder, self.project_route()?).await?.resolve_json()
    }
}
