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
use crate::model::{
    CreateLogStoreRequest, GetLogStoreResult, ListLogStoreRequest, ListLogStoreResult,
    UpdateLogStoreRequest,
};
use crate::response::Response;
use crate::serialize::SerializeType;
use aliyun_log_core::Result;
use http::Method;

impl Client {
    pub async fn create_log_store(&self, req: &CreateLogStoreRequest) -> Result<Response<()>> {
        let builder = RequestBuilder::new(Method::POST, "/logstores")?
            .content(req)?
            .serialize(SerializeType::Json)?;
        Ok(self.send(builder, self.project_route()?).await?.resolve())
    }

    pub async fn delete_log_store(&self, logstore: &str) -> Result<Response<()>> {
        let builder = RequestBuilder::new(Method::DELETE, &format!("/logstores/{logstore}"))?;
        Ok(self.send(builder, self.project_route()?).await?.resolve())
    }

    pub async fn update_log_store(&self, req: &UpdateLogStoreRequest) -> Result<Response<()>> {
        let builder = RequestBuilder::new(Method::PUT, &format!("/logstores/{}", req.logstore_name))?
            .content(req)?
            .serialize(SerializeType::Json)?;
        Ok(self.send(builder, self.project_route()?).await?.resolve())
    }

    pub async fn get_log_store(&self, logstore: &str) -> Result<Response<GetLogStoreResult>> {
        let builder = RequestBuilder::new(Method::GET, &format!("/logstores/{logstore}"))?;
        self.send(builder, self.project_route()?).await?.resolve_json()
    }

    pub async fn list_log_stores(&self, req: &ListLogStoreRequest) -> Result<Response<ListLogStoreResult>> {
        let builder = RequestBuilder::new(Method::GET, "/logstores")?.query_params(req)?;
        self.send(builder, self.project_route()?).await?.resolve_json()
    }
}
