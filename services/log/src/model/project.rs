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
use std::convert::Infallible;
use std::str::FromStr;

/// Parameters to create a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub project_name: String,
    pub description: String,
}

impl CreateProjectRequest {
    pub fn new(project_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            description: description.into(),
        }
    }
}

/// Query of list projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectRequest {
    pub project_name: Option<String>,
    pub offset: i32,
    pub size: i32,
}

impl Default for ListProjectRequest {
    fn default() -> Self {
        Self {
            project_name: None,
            offset: 0,
            size: 500,
        }
    }
}

impl ToQueryParams for ListProjectRequest {
    fn to_query_params(&self) -> Result<Vec<(String, String)>> {
        flatten_query(self)
    }
}

/// Status of a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProjectState {
    Normal,
    Disable,
    /// A status this client does not know about.
    Other(String),
}

impl ProjectState {
    /// Wire value of this status.
    pub fn as_str(&self) -> &str {
        match self {
            ProjectState::Normal => "Normal",
            ProjectState::Disable => "Disable",
            ProjectState::Other(v) => v,
        }
    }
}

impl FromStr for ProjectState {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(if s.eq_ignore_ascii_case("normal") {
            ProjectState::Normal
        } else if s.eq_ignore_ascii_case("disable") {
            ProjectState::Disable
        } else {
            ProjectState::Other(s.to_string())
        })
    }
}

string_enum_serde!(ProjectState);

/// ProjectInfo is one entry of list projects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub project_name: String,
    pub status: ProjectState,
    #[serde(default)]
    pub description: String,
}

/// ProjectDetailInfo describes a single project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetailInfo {
    pub project_name: String,
    pub status: ProjectState,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub owner: String,
    /// Formatted by the service, kept verbatim.
    #[serde(default)]
    pub create_time: String,
    #[serde(default)]
    pub last_modify_time: String,
}

/// ListProjectResult is one page of projects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListProjectResult {
    pub count: i32,
    pub total: i32,
    #[serde(default)]
    pub projects: Vec<ProjectInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_list_project_result() {
        let v: ListProjectResult = serde_json::from_str(
            r#"{"count":2,"total":7,"projects":[
                {"projectName":"p1","status":"Normal","description":"first"},
                {"projectName":"p2","status":"Frozen"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(v.count, 2);
        assert_eq!(v.total, 7);
        assert_eq!(v.projects[0].status, ProjectState::Normal);
        assert_eq!(v.projects[1].status, ProjectState::Other("Frozen".to_string()));
        assert_eq!(v.projects[1].description, "");
    }

    #[test]
    fn test_project_detail() {
        let v: ProjectDetailInfo = serde_json::from_str(
            r#"{"projectName":"p1","status":"disable","description":"d","region":"cn-hangzhou","owner":"123","createTime":"1577836800","lastModifyTime":"1577836900"}"#,
        )
        .unwrap();
        assert_eq!(v.status, ProjectState::Disable);
        assert_eq!(v.region, "cn-hangzhou");
        assert_eq!(v.create_time, "1577836800");
    }

    #[test]
    fn test_list_request_query() {
        let q = ListProjectRequest {
            project_name: Some("p".to_string()),
            ..Default::default()
        }
        .to_query_params()
        .unwrap();
        assert_eq!(
            q,
            vec![
                ("offset".to_string(), "0".to_string()),
                ("projectName".to_string(), "p".to_string()),
                ("size".to_string(), "500".to_string()),
            ]
        );
    }
}
