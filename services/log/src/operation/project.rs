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
use crate::client::{Client, Route};
use crate::model::{CreateProjectRequest, ListProjectRequest, ListProjectResult, ProjectDetailInfo};
use crate::response::Response;
use crate::serialize::SerializeType;
use aliyun_log_core::Result;
use http::Method;

impl Client {
    /// Create a project. Sent to the endpoint host.
    pub async fn create_project(&self, req: &CreateProjectRequest) -> Result<Response<()>> {
        let builder = RequestBuilder::new(Method::POST, "/")?
            .content(req)?
            .serialize(SerializeType::Json)?;
        Ok(self.send(builder, Route::Global).await?.resolve())
    }

    /// List projects of the account. Sent to the endpoint host.
    pub async fn list_projects(&self, req: &ListProjectRequest) -> Result<Response<ListProjectResult>> {
        let builder = RequestBuilder::new(Method::GET, "/")?.query_params(req)?;
        self.send(builder, Route::Global).await?.resolve_json()
    }

    /// Get the client's project.
    pub async fn get_project(&self) -> Result<Response<ProjectDetailInfo>> {
        let builder = RequestBuilder::new(Method::GET, "/")?;
        self.send(builder, self.project_route()?).await?.resolve_json()
    }

    /// Delete the client's project.
    pub async fn delete_project(&self) -> Result<Response<()>> {
        let builder = RequestBuilder::new(Method::DELETE, "/")?;
        Ok(self.send(builder, self.project_route()?).await?.resolve())
    }
}
