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
use crate::compress::CompressType;
use crate::constants::*;
use crate::model::{
    log_rows_from_json, number_from_headers, GetLogHistogramsRequest, GetLogHistogramsResult,
    GetLogsRequest, GetLogsResult, GetProjectLogsRequest, LogGroupInfo, LogHistogramInfo,
    PullLogsResult,
};
use crate::proto::{LogGroup, LogGroupList};
use crate::response::Response;
use crate::serialize::SerializeType;
use aliyun_log_core::Result;
use http::header::{ACCEPT, ACCEPT_ENCODING};
use http::Method;

impl Client {
    /// Write a log group, encoded as protobuf and compressed with lz4.
    ///
    /// Without `hash_key` the service balances across shards, otherwise the
    /// group goes to the shard whose range covers the key.
    pub async fn post_logs(
        &self,
        logstore: &str,
        log_group: &LogGroupInfo,
        hash_key: Option<&str>,
    ) -> Result<Response<()>> {
        let hash_key = hash_key.filter(|v| !v.is_empty());
        let path = match hash_key {
            Some(_) => format!("/logstores/{logstore}/shards/route"),
            None => format!("/logstores/{logstore}/shards/lb"),
        };
        let builder = RequestBuilder::new(Method::POST, &path)?
            .query_opt("key", hash_key)
            .content_message(&LogGroup::from(log_group))
            .serialize(SerializeType::Protobuf)?
            .compress(CompressType::Lz4)?;
        Ok(self.send(builder, self.project_route()?).await?.resolve())
    }

    /// Read up to `count` log groups starting at `cursor`.
    pub async fn pull_logs(
        &self,
        logstore: &str,
        shard_id: i32,
        cursor: &str,
        count: i32,
    ) -> Result<Response<PullLogsResult>> {
        let builder = RequestBuilder::new(
            Method::GET,
            &format!("/logstores/{logstore}/shards/{shard_id}"),
        )?
        .query("type", "logs")
        .query("cursor", cursor)
        .query("count", count.to_string())
        .header(ACCEPT.as_str(), APPLICATION_PROTOBUF)?
        .header(ACCEPT_ENCODING.as_str(), "lz4")?;

        let mut resp = self
            .send(builder, self.project_route()?)
            .await?
            .resolve_with(LogGroupList::decode_bytes)?;
        // An empty list encodes to an empty body.
        if resp.is_success {
            resp.result.get_or_insert_with(LogGroupList::default);
        }

        resp.try_transform(|headers, list| {
            Ok(PullLogsResult {
                log_groups: list.log_group_list.into_iter().map(LogGroupInfo::from).collect(),
                next_cursor: headers.get(X_LOG_CURSOR).cloned(),
                count: number_from_headers(headers, X_LOG_COUNT)?,
            })
        })
    }

    /// Query logs of a log store.
    pub async fn get_logs(&self, logstore: &str, req: &GetLogsRequest) -> Result<Response<GetLogsResult>> {
        let builder = RequestBuilder::new(Method::GET, &format!("/logstores/{logstore}"))?
            .query("type", "log")
            .query_params(req)?;
        self.send(builder, self.project_route()?)
            .await?
            .resolve_with(log_rows_from_json)?
            .try_transform(GetLogsResult::from_headers)
    }

    /// Query logs across the client's project with SQL.
    pub async fn get_project_logs(&self, req: &GetProjectLogsRequest) -> Result<Response<GetLogsResult>> {
        let builder = RequestBuilder::new(Method::GET, "/logs")?.query_params(req)?;
        self.send(builder, self.project_route()?)
            .await?
            .resolve_with(log_rows_from_json)?
            .try_transform(GetLogsResult::from_headers)
    }

    /// Count matching logs per time bucket.
    pub async fn get_histograms(
        &self,
        logstore: &str,
        req: &GetLogHistogramsRequest,
    ) -> Result<Response<GetLogHistogramsResult>> {
        let builder = RequestBuilder::new(Method::GET, &format!("/logstores/{logstore}"))?
            .query("type", "histogram")
            .query_params(req)?;
        self.send(builder, self.project_route()?)
            .await?
            .resolve_json::<Vec<LogHistogramInfo>>()?
            .try_transform(GetLogHistogramsResult::from_headers)
    }
}

