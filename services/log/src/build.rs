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

use crate::compress::CompressType;
use crate::constants::*;
use crate::serialize::{to_json_bytes, to_json_value, SerializeType, ToQueryParams};
use crate::sign::{compute_signature, SignatureType};
use crate::Credential;
use aliyun_log_core::hash::{base64_encode, hex_md5_upper};
use aliyun_log_core::time::{format_http_date, now, DateTime};
use aliyun_log_core::{Error, Result};
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, DATE, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{self, Debug};

/// Body staged on a [`RequestBuilder`], tracking how far it has been transformed.
#[derive(Clone)]
enum Content {
    Empty,
    /// Record waiting for JSON serialization.
    Object(Value),
    /// Encoded protobuf message waiting for protobuf serialization.
    Message(Bytes),
    Serialized(Bytes),
    Compressed(Bytes),
}

impl Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Empty => f.write_str("Empty"),
            Content::Object(_) => f.write_str("Object"),
            Content::Message(bs) => write!(f, "Message({} bytes)", bs.len()),
            Content::Serialized(bs) => write!(f, "Serialized({} bytes)", bs.len()),
            Content::Compressed(bs) => write!(f, "Compressed({} bytes)", bs.len()),
        }
    }
}

/// RequestBuilder turns a method, a path and an optional body into a signed request.
///
/// Stages run in a fixed order: query/header/content, then [`serialize`],
/// then [`compress`], then [`authenticate`] and [`sign`], then [`build`].
/// Calling a stage out of order fails with
/// [`ErrorKind::StageInvalid`](aliyun_log_core::ErrorKind::StageInvalid).
///
/// ```
/// use aliyun_log::{CompressType, Credential, RequestBuilder, SerializeType, SignatureType};
/// use http::Method;
///
/// # fn main() -> aliyun_log_core::Result<()> {
/// let req = RequestBuilder::new(Method::POST, "/logstores")?
///     .content(&serde_json::json!({"logstoreName": "app", "ttl": 30, "shardCount": 2}))?
///     .serialize(SerializeType::Json)?
///     .compress(CompressType::Deflate)?
///     .authenticate(Credential::new("ak", "sk"))?
///     .sign(SignatureType::HmacSha1)
///     .build()?;
///
/// assert!(req.headers()["authorization"].to_str().unwrap().starts_with("LOG ak:"));
/// # Ok(())
/// # }
/// ```
///
/// [`serialize`]: RequestBuilder::serialize
/// [`compress`]: RequestBuilder::compress
/// [`authenticate`]: RequestBuilder::authenticate
/// [`sign`]: RequestBuilder::sign
/// [`build`]: RequestBuilder::build
#[derive(Clone)]
pub struct RequestBuilder {
    method: Method,
    path: String,
    query: BTreeMap<String, String>,
    headers: HeaderMap,
    content: Content,
    credential: Option<Credential>,
    signature_type: SignatureType,
    time: Option<DateTime>,
}

impl Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("headers", &self.headers)
            .field("content", &self.content)
            .field("credential", &self.credential)
            .field("signature_type", &self.signature_type)
            .finish()
    }
}

impl RequestBuilder {
    /// Create a builder for `method` and `uri`.
    ///
    /// `uri` is a path that may carry an inline query string such as
    /// `/logstores/app/shards/route?key=abc`; inline parameters are merged into
    /// the query map.
    pub fn new(method: Method, uri: &str) -> Result<Self> {
        let (path, inline_query) = match uri.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (uri, None),
        };
        if !path.starts_with('/') {
            return Err(Error::request_invalid(format!(
                "request path must start with '/': {uri}"
            )));
        }

        let query = inline_query
            .map(|q| {
                form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(X_LOG_API_VERSION, HeaderValue::from_static(API_VERSION));

        Ok(Self {
            method,
            path: path.to_string(),
            query,
            headers,
            content: Content::Empty,
            credential: None,
            signature_type: SignatureType::default(),
            time: None,
        })
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Add a query parameter. A later value for the same key replaces the earlier one.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter when `value` is present.
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Add every parameter of a flat record.
    pub fn query_params<Q: ToQueryParams + ?Sized>(mut self, params: &Q) -> Result<Self> {
        for (k, v) in params.to_query_params()? {
            self.query.insert(k, v);
        }
        Ok(self)
    }

    /// Add a header verbatim.
    pub fn header(mut self, key: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(key.as_bytes())?;
        let value = HeaderValue::from_str(value)?;
        self.headers.append(name, value);
        Ok(self)
    }

    /// Stage a record as body, to be serialized with [`SerializeType::Json`].
    pub fn content<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        self.content = Content::Object(to_json_value(value)?);
        Ok(self)
    }

    /// Stage a protobuf message as body, to be serialized with [`SerializeType::Protobuf`].
    pub fn content_message<M: prost::Message>(mut self, message: &M) -> Self {
        self.content = Content::Message(message.encode_to_vec().into());
        self
    }

    /// Use already serialized bytes as body.
    ///
    /// `x-log-bodyrawsize` is set to the length right away.
    pub fn content_bytes(mut self, bs: impl Into<Bytes>) -> Self {
        let bs = bs.into();
        self.set_body_raw_size(bs.len());
        self.content = Content::Serialized(bs);
        self
    }

    /// Serialize the staged body.
    pub fn serialize(mut self, serialize_type: SerializeType) -> Result<Self> {
        let bs = match (std::mem::replace(&mut self.content, Content::Empty), serialize_type) {
            (Content::Empty, _) => return Err(Error::stage_invalid("nothing to serialize")),
            (Content::Serialized(_) | Content::Compressed(_), _) => {
                return Err(Error::stage_invalid("content has already been serialized"))
            }
            (Content::Object(value), SerializeType::Json) => Bytes::from(to_json_bytes(value)?),
            (Content::Message(bs), SerializeType::Protobuf) => bs,
            (Content::Object(_), SerializeType::Protobuf) => {
                return Err(Error::content_shape_invalid(
                    "protobuf serialization requires a protobuf message",
                ))
            }
            (Content::Message(_), SerializeType::Json) => {
                return Err(Error::content_shape_invalid(
                    "a protobuf message cannot be serialized as json",
                ))
            }
        };

        self.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static(serialize_type.content_type()),
        );
        self.set_body_raw_size(bs.len());
        self.content = Content::Serialized(bs);
        Ok(self)
    }

    /// Compress the serialized body.
    ///
    /// [`CompressType::None`] leaves the body untouched.
    pub fn compress(mut self, compress_type: CompressType) -> Result<Self> {
        let bs = match &self.content {
            Content::Serialized(bs) => bs,
            Content::Compressed(_) => {
                return Err(Error::stage_invalid("content has already been compressed"))
            }
            Content::Empty | Content::Object(_) | Content::Message(_) => {
                return Err(Error::stage_invalid("nothing to compress"))
            }
        };

        let Some(header) = compress_type.as_header_value() else {
            return Ok(self);
        };
        let compressed = compress_type.compress(bs)?;
        self.headers
            .insert(X_LOG_COMPRESS_TYPE, HeaderValue::from_static(header));
        self.content = Content::Compressed(compressed.into());
        Ok(self)
    }

    /// Attach the credential used for signing.
    pub fn authenticate(mut self, credential: Credential) -> Result<Self> {
        if credential.access_key_id.is_empty() {
            return Err(Error::credential_missing("access key id must not be empty"));
        }
        if credential.access_key_secret.is_empty() {
            return Err(Error::credential_missing(
                "access key secret must not be empty",
            ));
        }

        self.credential = Some(credential);
        Ok(self)
    }

    /// Record the signature algorithm, applied by [`RequestBuilder::build`].
    pub fn sign(mut self, signature_type: SignatureType) -> Self {
        self.signature_type = signature_type;
        self
    }

    /// Finalize into a signed request whose uri is the escaped path and query.
    ///
    /// The [`StringToSign`](crate::StringToSign) is attached as an extension.
    pub fn build(self) -> Result<http::Request<Bytes>> {
        let Some(cred) = self.credential else {
            return Err(Error::credential_missing(
                "request must be authenticated before build",
            ));
        };
        let mut headers = self.headers;

        let date = format_http_date(self.time.unwrap_or_else(now));
        headers.insert(DATE, HeaderValue::from_str(&date)?);

        if let Some(token) = cred.security_token.as_deref().filter(|v| !v.is_empty()) {
            let has_token = headers
                .get(X_ACS_SECURITY_TOKEN)
                .is_some_and(|v| !v.is_empty());
            if !has_token {
                let mut value = HeaderValue::from_str(token)?;
                value.set_sensitive(true);
                headers.insert(X_ACS_SECURITY_TOKEN, value);
            }
        }

        // The service rejects some calls when this header is absent.
        if !headers.contains_key(X_LOG_BODY_RAW_SIZE) {
            headers.insert(X_LOG_BODY_RAW_SIZE, HeaderValue::from_static("0"));
        }

        let body = match self.content {
            Content::Empty => Bytes::new(),
            Content::Serialized(bs) | Content::Compressed(bs) => bs,
            Content::Object(_) | Content::Message(_) => {
                return Err(Error::stage_invalid(
                    "content must be serialized before build",
                ))
            }
        };

        let mut content_md5 = None;
        if !body.is_empty() {
            let md5 = hex_md5_upper(&body);
            headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
            headers.insert(CONTENT_MD5, HeaderValue::from_str(&md5)?);
            content_md5 = Some(md5);
        } else if self.method == Method::POST || self.method == Method::PUT {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
            headers.insert(CONTENT_LENGTH, HeaderValue::from_static("0"));
        } else {
            headers.remove(CONTENT_TYPE);
        }

        let (string_to_sign, signature) = compute_signature(
            self.signature_type,
            &self.method,
            &mut headers,
            content_md5.as_deref(),
            &self.path,
            &self.query,
            &cred.access_key_secret,
        )?;

        let mut authorization = HeaderValue::from_str(&format!(
            "{AUTHORIZATION_PREFIX} {}:{}",
            cred.access_key_id,
            base64_encode(&signature)
        ))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        let mut uri = self.path;
        if !self.query.is_empty() {
            uri.push('?');
            uri.push_str(&encode_query(&self.query));
        }

        let mut req = http::Request::builder()
            .method(self.method)
            .uri(uri)
            .body(body)?;
        *req.headers_mut() = headers;
        req.extensions_mut().insert(string_to_sign);
        Ok(req)
    }

    fn set_body_raw_size(&mut self, size: usize) {
        self.headers
            .insert(X_LOG_BODY_RAW_SIZE, HeaderValue::from(size));
    }
}

/// Encode the query for the wire: keys sorted, every key and value escaped.
pub(crate) fn encode_query(query: &BTreeMap<String, String>) -> String {
    query
        .iter()
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Form-encode then apply the service's escaping of space, `*`, `~` and `/`.
fn encode_component(s: &str) -> String {
    form_urlencoded::byte_serialize(s.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
        .replace('*', "%2A")
        .replace('~', "%7E")
        .replace('/', "%2F")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StringToSign;
    use aliyun_log_core::ErrorKind;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn fixed_time() -> DateTime {
        chrono::Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    }

    fn cred() -> Credential {
        Credential::new("AK", "SECRET")
    }

    #[test_case("a b", "a%20b")]
    #[test_case("a*b", "a%2Ab")]
    #[test_case("a~b", "a%7Eb")]
    #[test_case("a/b", "a%2Fb")]
    #[test_case("c&d", "c%26d")]
    #[test_case("中", "%E4%B8%AD")]
    #[test_case("-._", "-._")]
    fn test_encode_component(input: &str, expected: &str) {
        assert_eq!(encode_component(input), expected);
    }

    #[test]
    fn test_inline_query_is_merged() {
        let req = RequestBuilder::new(Method::POST, "/logstores/app/shards/route?key=a%20b")
            .unwrap()
            .with_time(fixed_time())
            .content_bytes(&b"x"[..])
            .authenticate(cred())
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(req.uri().path(), "/logstores/app/shards/route");
        assert_eq!(req.uri().query(), Some("key=a%20b"));
        let sts = req.extensions().get::<StringToSign>().unwrap();
        assert!(sts.as_str().ends_with("/logstores/app/shards/route?key=a b"));
    }

    #[test]
    fn test_golden_json_post() {
        let req = RequestBuilder::new(Method::POST, "/logstores")
            .unwrap()
            .with_time(fixed_time())
            .content(&serde_json::json!({"x": 1}))
            .unwrap()
            .serialize(SerializeType::Json)
            .unwrap()
            .compress(CompressType::None)
            .unwrap()
            .authenticate(cred())
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(req.body().as_ref(), br#"{"x":1}"#);
        assert_eq!(req.headers()[CONTENT_MD5], "AC3EF48CAA08FA3ED5E025DA69EDC645");
        assert_eq!(
            req.headers()[AUTHORIZATION],
            "LOG AK:8NvitIUhFo1SkRAGJ+mUXS9KZKQ="
        );
        assert_eq!(
            req.extensions().get::<StringToSign>().unwrap().as_str(),
            "POST\nAC3EF48CAA08FA3ED5E025DA69EDC645\napplication/json\nWed, 01 Jan 2020 00:00:00 GMT\n\
             x-log-apiversion:0.6.0\nx-log-bodyrawsize:7\nx-log-signaturemethod:hmac-sha1\n/logstores"
        );
    }

    #[test]
    fn test_query_is_raw_in_signature_and_escaped_on_wire() {
        let req = RequestBuilder::new(Method::GET, "/logstores")
            .unwrap()
            .with_time(fixed_time())
            .query("a b", "c&d")
            .authenticate(cred())
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(req.uri().to_string(), "/logstores?a%20b=c%26d");
        assert_eq!(req.uri().query(), Some("a%20b=c%26d"));
        let sts = req.extensions().get::<StringToSign>().unwrap();
        assert!(sts.as_str().ends_with("\n/logstores?a b=c&d"));
        assert_eq!(
            req.headers()[AUTHORIZATION],
            "LOG AK:fPwu+ZyuSWhWfcAmVrLBtSDKlH4="
        );
    }

    #[test]
    fn test_relative_path_is_rejected() {
        let err = RequestBuilder::new(Method::GET, "logstores").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }

    #[test]
    fn test_default_headers() {
        let req = RequestBuilder::new(Method::GET, "/logstores")
            .unwrap()
            .with_time(fixed_time())
            .authenticate(cred())
            .unwrap()
            .build()
            .unwrap();

        let h = req.headers();
        assert_eq!(h[DATE], "Wed, 01 Jan 2020 00:00:00 GMT");
        assert_eq!(h[X_LOG_API_VERSION], API_VERSION);
        assert_eq!(h[X_LOG_BODY_RAW_SIZE], "0");
        assert_eq!(h[X_LOG_SIGNATURE_METHOD], "hmac-sha1");
        assert_eq!(h[USER_AGENT], USER_AGENT_VALUE);
        assert!(h.get(CONTENT_LENGTH).is_none());
        assert!(h.get(CONTENT_TYPE).is_none());
        assert!(h.get(CONTENT_MD5).is_none());
        assert!(req.body().is_empty());
    }

    #[test_case(Method::POST)]
    #[test_case(Method::PUT)]
    fn test_empty_post_put_gets_content_headers(method: Method) {
        let req = RequestBuilder::new(method, "/logstores/app/shards/0?action=merge")
            .unwrap()
            .authenticate(cred())
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(req.headers()[CONTENT_TYPE], APPLICATION_JSON);
        assert_eq!(req.headers()[CONTENT_LENGTH], "0");
        assert!(req.headers().get(CONTENT_MD5).is_none());
    }

    #[test]
    fn test_security_token() {
        let req = RequestBuilder::new(Method::GET, "/")
            .unwrap()
            .authenticate(cred().with_security_token("token"))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(req.headers()[X_ACS_SECURITY_TOKEN], "token");
        let sts = req.extensions().get::<StringToSign>().unwrap();
        assert!(sts.as_str().contains("x-acs-security-token:token\n"));

        let req = RequestBuilder::new(Method::GET, "/")
            .unwrap()
            .header(X_ACS_SECURITY_TOKEN, "explicit")
            .unwrap()
            .authenticate(cred().with_security_token("token"))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(req.headers()[X_ACS_SECURITY_TOKEN], "explicit");
    }

    #[test]
    fn test_compress_sets_headers() {
        let payload = "hello ".repeat(100);
        let req = RequestBuilder::new(Method::POST, "/logstores/app/shards/lb")
            .unwrap()
            .content_bytes(payload.clone())
            .compress(CompressType::Lz4)
            .unwrap()
            .authenticate(cred())
            .unwrap()
            .build()
            .unwrap();

        let h = req.headers();
        assert_eq!(h[X_LOG_COMPRESS_TYPE], "lz4");
        assert_eq!(h[X_LOG_BODY_RAW_SIZE], payload.len().to_string().as_str());
        assert_eq!(h[CONTENT_LENGTH], req.body().len().to_string().as_str());
        assert_eq!(h[CONTENT_MD5], hex_md5_upper(req.body()).as_str());
        assert_eq!(
            CompressType::Lz4
                .decompress(req.body(), Some(payload.len()))
                .unwrap(),
            payload.as_bytes()
        );
    }

    #[test]
    fn test_compress_none_is_noop() {
        let builder = RequestBuilder::new(Method::POST, "/")
            .unwrap()
            .content_bytes(&b"abc"[..])
            .compress(CompressType::None)
            .unwrap();
        assert!(builder.headers.get(X_LOG_COMPRESS_TYPE).is_none());
        assert!(matches!(builder.content, Content::Serialized(_)));
    }

    #[test]
    fn test_serialize_twice_fails() {
        let err = RequestBuilder::new(Method::POST, "/")
            .unwrap()
            .content(&serde_json::json!({"x": 1}))
            .unwrap()
            .serialize(SerializeType::Json)
            .unwrap()
            .serialize(SerializeType::Json)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StageInvalid);
        assert_eq!(err.message(), "content has already been serialized");
    }

    #[test]
    fn test_serialize_without_content_fails() {
        let err = RequestBuilder::new(Method::POST, "/")
            .unwrap()
            .serialize(SerializeType::Json)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StageInvalid);
        assert_eq!(err.message(), "nothing to serialize");
    }

    #[test]
    fn test_compress_before_serialize_fails() {
        let err = RequestBuilder::new(Method::POST, "/")
            .unwrap()
            .content(&serde_json::json!({"x": 1}))
            .unwrap()
            .compress(CompressType::Lz4)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StageInvalid);
        assert_eq!(err.message(), "nothing to compress");
    }

    #[test]
    fn test_compress_twice_fails() {
        let err = RequestBuilder::new(Method::POST, "/")
            .unwrap()
            .content_bytes(&b"abc"[..])
            .compress(CompressType::Deflate)
            .unwrap()
            .compress(CompressType::Lz4)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StageInvalid);
    }

    #[test]
    fn test_build_without_authenticate_fails() {
        let err = RequestBuilder::new(Method::GET, "/")
            .unwrap()
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialMissing);
    }

    #[test]
    fn test_build_with_unserialized_content_fails() {
        let err = RequestBuilder::new(Method::POST, "/")
            .unwrap()
            .content(&serde_json::json!({"x": 1}))
            .unwrap()
            .authenticate(cred())
            .unwrap()
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StageInvalid);
    }

    #[test_case("", "SECRET")]
    #[test_case("AK", "")]
    fn test_authenticate_rejects_empty(ak: &str, sk: &str) {
        let err = RequestBuilder::new(Method::GET, "/")
            .unwrap()
            .authenticate(Credential::new(ak, sk))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialMissing);
    }

    #[test]
    fn test_protobuf_requires_message() {
        let err = RequestBuilder::new(Method::POST, "/")
            .unwrap()
            .content(&serde_json::json!({"x": 1}))
            .unwrap()
            .serialize(SerializeType::Protobuf)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContentShapeInvalid);
    }

    #[test]
    fn test_query_later_value_wins() {
        let req = RequestBuilder::new(Method::GET, "/logstores?offset=0")
            .unwrap()
            .query("offset", "1")
            .query_opt("logstoreName", None::<String>)
            .authenticate(cred())
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(req.uri().query(), Some("offset=1"));
    }
}
