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
use crate::config::Config;
use crate::credential::Credential;
use crate::provide_credential::{DefaultCredentialProvider, StaticCredentialProvider};
use crate::resolve::ResponseResolver;
use crate::sign::SignatureType;
use aliyun_log_core::{Context, Error, ProvideCredential, Result};
use http::header::HOST;
use http::{HeaderValue, Uri};
use log::debug;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Which host a request is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route<'a> {
    /// The endpoint host itself, for account level calls.
    Global,
    /// `{project}.{endpoint host}`.
    Project(&'a str),
}

/// Endpoint split into scheme and host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Endpoint {
    scheme: &'static str,
    host: String,
}

impl Endpoint {
    /// Parse `host`, `http://host` or `https://host`. Bare hosts use http.
    pub(crate) fn parse(endpoint: &str) -> Result<Self> {
        let endpoint = endpoint.trim();
        let (scheme, host) = if let Some(v) = endpoint.strip_prefix("https://") {
            ("https", v)
        } else if let Some(v) = endpoint.strip_prefix("http://") {
            ("http", v)
        } else {
            ("http", endpoint)
        };
        let host = host.trim_end_matches('/');

        if host.is_empty() || host.contains('/') || host.contains("://") {
            return Err(Error::config_invalid(format!("invalid endpoint: {endpoint}")));
        }

        Ok(Self {
            scheme,
            host: host.to_string(),
        })
    }

    fn host_for(&self, route: Route<'_>) -> String {
        match route {
            Route::Global => self.host.clone(),
            Route::Project(project) => format!("{project}.{}", self.host),
        }
    }
}

/// Client sends signed requests to the log service.
///
/// Cloning is cheap and clones share the transport and credential provider.
/// Every call reads the credential provider once and signs with its own
/// timestamp, so a client can serve concurrent calls.
///
/// ```no_run
/// use aliyun_log::{Client, StaticCredentialProvider};
/// use aliyun_log_core::Context;
///
/// # async fn example(ctx: Context) -> aliyun_log_core::Result<()> {
/// let client = Client::builder()
///     .endpoint("cn-hangzhou.log.aliyuncs.com")
///     .project("my-project")
///     .credential_provider(StaticCredentialProvider::new("ak", "sk"))
///     .context(ctx)
///     .build()?;
///
/// let shards = client.list_shards("my-logstore").await?;
/// for shard in shards.into_result()?.unwrap_or_default() {
///     println!("{}: {}", shard.shard_id, shard.status);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    ctx: Context,
    endpoint: Endpoint,
    project: Option<String>,
    provider: Arc<dyn ProvideCredential<Credential = Credential>>,
}

impl Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint)
            .field("project", &self.project)
            .field("provider", &self.provider)
            .finish()
    }
}

impl Client {
    /// Start building a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// The default project of this client.
    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// A client for another project sharing this client's transport and credentials.
    pub fn with_project(&self, project: impl Into<String>) -> Self {
        let mut client = self.clone();
        client.project = Some(project.into());
        client
    }

    /// Route to the default project, failing if none is configured.
    pub(crate) fn project_route(&self) -> Result<Route<'_>> {
        match self.project.as_deref().filter(|v| !v.is_empty()) {
            Some(project) => Ok(Route::Project(project)),
            None => Err(Error::config_invalid(
                "project is required for project scoped operations",
            )),
        }
    }

    /// Authenticate, sign, route and send a request.
    ///
    /// The returned resolver has not looked at the response yet.
    pub(crate) async fn send(&self, builder: RequestBuilder, route: Route<'_>) -> Result<ResponseResolver> {
        let credential = self
            .provider
            .provide_credential(&self.ctx)
            .await?
            .ok_or_else(|| Error::credential_missing("no credential provided"))?;

        let mut req = builder
            .authenticate(credential)?
            .sign(SignatureType::HmacSha1)
            .build()?;

        let host = self.endpoint.host_for(route);
        let path_and_query = req
            .uri()
            .path_and_query()
            .map(|v| v.as_str())
            .unwrap_or("/");
        let uri: Uri = format!("{}://{host}{path_and_query}", self.endpoint.scheme).parse()?;
        debug!("sending {} {uri}", req.method());

        *req.uri_mut() = uri;
        req.headers_mut().insert(HOST, HeaderValue::from_str(&host)?);

        let resp = self.ctx.http_send(req).await?;
        Ok(ResponseResolver::new(resp))
    }
}

/// Builder of [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
    endpoint: Option<String>,
    project: Option<String>,
    provider: Option<Arc<dyn ProvideCredential<Credential = Credential>>>,
    ctx: Option<Context>,
}

impl Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("endpoint", &self.endpoint)
            .field("project", &self.project)
            .field("provider", &self.provider)
            .finish()
    }
}

impl ClientBuilder {
    /// Seed endpoint and project from `config`, with credentials loaded
    /// from `config` first and the environment second.
    pub fn from_config(config: Config) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            project: config.project.clone(),
            provider: Some(Arc::new(DefaultCredentialProvider::new(Arc::new(config)))),
            ctx: None,
        }
    }

    /// Set the endpoint such as `cn-hangzhou.log.aliyuncs.com`.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the default project.
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Use a fixed access key pair.
    pub fn credential(self, access_key_id: &str, access_key_secret: &str) -> Self {
        self.credential_provider(StaticCredentialProvider::new(access_key_id, access_key_secret))
    }

    /// Set the credential provider.
    pub fn credential_provider(
        mut self,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Set the context carrying the transport and env.
    pub fn context(mut self, ctx: Context) -> Self {
        self.ctx = Some(ctx);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<Client> {
        let endpoint = self
            .endpoint
            .ok_or_else(|| Error::config_invalid("endpoint is required"))?;
        let provider = self
            .provider
            .ok_or_else(|| Error::config_invalid("credential provider is required"))?;

        Ok(Client {
            ctx: self.ctx.unwrap_or_default(),
            endpoint: Endpoint::parse(&endpoint)?,
            project: self.project.filter(|v| !v.is_empty()),
            provider,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aliyun_log_core::ErrorKind;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("cn-hangzhou.log.aliyuncs.com", "http", "cn-hangzhou.log.aliyuncs.com"; "bare host")]
    #[test_case("http://cn-hangzhou.log.aliyuncs.com", "http", "cn-hangzhou.log.aliyuncs.com"; "http")]
    #[test_case("https://cn-hangzhou.log.aliyuncs.com/", "https", "cn-hangzhou.log.aliyuncs.com"; "https with slash")]
    #[test_case("127.0.0.1:8080", "http", "127.0.0.1:8080"; "with port")]
    fn test_parse_endpoint(input: &str, scheme: &str, host: &str) {
        let ep = Endpoint::parse(input).unwrap();
        assert_eq!(ep.scheme, scheme);
        assert_eq!(ep.host, host);
    }

    #[test_case(""; "empty")]
    #[test_case("https://"; "scheme only")]
    #[test_case("ftp://host"; "unknown scheme")]
    #[test_case("host/path"; "with path")]
    fn test_parse_invalid_endpoint(input: &str) {
        let err = Endpoint::parse(input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_host_for_route() {
        let ep = Endpoint::parse("cn-hangzhou.log.aliyuncs.com").unwrap();
        assert_eq!(ep.host_for(Route::Global), "cn-hangzhou.log.aliyuncs.com");
        assert_eq!(
            ep.host_for(Route::Project("p1")),
            "p1.cn-hangzhou.log.aliyuncs.com"
        );
    }

    #[test]
    fn test_builder_requires_endpoint_and_provider() {
        let err = Client::builder().credential("ak", "sk").build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

        let err = Client::builder().endpoint("host").build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_project_route() {
        let client = Client::builder()
            .endpoint("host")
            .credential("ak", "sk")
            .build()
            .unwrap();
        assert_eq!(
            client.project_route().unwrap_err().kind(),
            ErrorKind::ConfigInvalid
        );

        let client = client.with_project("p1");
        assert_eq!(client.project_route().unwrap(), Route::Project("p1"));
    }

    #[test]
    fn test_from_config() {
        let client = ClientBuilder::from_config(Config {
            endpoint: Some("https://cn-beijing.log.aliyuncs.com".to_string()),
            project: Some("p1".to_string()),
            ..Default::default()
        })
        .build()
        .unwrap();

        assert_eq!(client.project(), Some("p1"));
        assert_eq!(client.endpoint.scheme, "https");
    }
}
