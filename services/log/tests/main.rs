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

use aliyun_log::{
    Client, ClientBuilder, Config, CursorPosition, GetLogsRequest, ListLogStoreRequest,
    LogGroupInfo, LogInfo, ShardState,
};
use aliyun_log_core::{Context, OsEnv, Result};
use aliyun_log_http_send_reqwest::ReqwestHttpSend;
use log::{debug, warn};
use std::env;

/// Build a client against a real service, or `None` when live tests are off.
///
/// Needs `ALIYUN_LOG_ENDPOINT`, `ALIYUN_LOG_PROJECT`, `ALIBABA_CLOUD_ACCESS_KEY_ID`,
/// `ALIBABA_CLOUD_ACCESS_KEY_SECRET` and `ALIYUN_LOG_TEST_LOGSTORE`.
fn init_client() -> Option<(Client, String)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("ALIYUN_LOG_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::default().from_env(&ctx);
    let client = ClientBuilder::from_config(config)
        .context(ctx)
        .build()
        .expect("client must be configured from env");
    let logstore =
        env::var("ALIYUN_LOG_TEST_LOGSTORE").expect("env ALIYUN_LOG_TEST_LOGSTORE must set");

    Some((client, logstore))
}

#[tokio::test]
async fn test_get_project() -> Result<()> {
    let Some((client, _)) = init_client() else {
        warn!("ALIYUN_LOG_TEST is not set, skipped");
        return Ok(());
    };

    let project = client.get_project().await?.into_result()?.expect("project detail");
    debug!("got project: {project:?}");
    assert_eq!(Some(project.project_name.as_str()), client.project());
    Ok(())
}

#[tokio::test]
async fn test_list_log_stores() -> Result<()> {
    let Some((client, logstore)) = init_client() else {
        warn!("ALIYUN_LOG_TEST is not set, skipped");
        return Ok(());
    };

    let req = ListLogStoreRequest {
        logstore_name: Some(logstore.clone()),
        ..Default::default()
    };
    let result = client.list_log_stores(&req).await?.into_result()?.expect("log stores");
    assert!(result.logstores.contains(&logstore));
    Ok(())
}

#[tokio::test]
async fn test_post_then_pull_logs() -> Result<()> {
    let Some((client, logstore)) = init_client() else {
        warn!("ALIYUN_LOG_TEST is not set, skipped");
        return Ok(());
    };

    let shards = client.list_shards(&logstore).await?.into_result()?.unwrap_or_default();
    let shard = shards
        .iter()
        .find(|v| v.status == ShardState::ReadWrite)
        .expect("a read-write shard");

    let cursor = client
        .get_cursor(&logstore, shard.shard_id, CursorPosition::End)
        .await?
        .into_result()?
        .expect("cursor")
        .cursor;

    let group = LogGroupInfo {
        topic: Some("aliyun-log-rs".to_string()),
        logs: vec![LogInfo::new(chrono::Utc::now()).with_content("case", "post_then_pull")],
        ..Default::default()
    };
    client
        .post_logs(&logstore, &group, Some(&shard.inclusive_begin_key))
        .await?
        .ensure_success()?;

    let pulled = client
        .pull_logs(&logstore, shard.shard_id, &cursor, 10)
        .await?
        .into_result()?
        .expect("pulled logs");
    debug!("pulled {} log groups", pulled.count);
    assert!(pulled.next_cursor.is_some());
    Ok(())
}

#[tokio::test]
async fn test_get_logs() -> Result<()> {
    let Some((client, logstore)) = init_client() else {
        warn!("ALIYUN_LOG_TEST is not set, skipped");
        return Ok(());
    };

    let now = chrono::Utc::now().timestamp();
    let resp = client
        .get_logs(&logstore, &GetLogsRequest::new(now - 900, now))
        .await?;
    resp.ensure_success()?;
    debug!("get logs progress: {:?}", resp.result().and_then(|v| v.progress));
    Ok(())
}
