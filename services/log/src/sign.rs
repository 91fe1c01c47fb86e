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

use crate::constants::*;
use aliyun_log_core::hash::hmac_sha1;
use aliyun_log_core::{Error, Result};
use http::header::{CONTENT_TYPE, DATE};
use http::{HeaderMap, HeaderValue, Method};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::str::FromStr;

/// SignatureType is the algorithm used to sign requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum SignatureType {
    /// HMAC-SHA1 over the canonical string, the only algorithm the service accepts.
    #[default]
    HmacSha1,
}

impl SignatureType {
    /// Value carried by `x-log-signaturemethod`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureType::HmacSha1 => "hmac-sha1",
        }
    }
}

impl FromStr for SignatureType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hmac-sha1" => Ok(SignatureType::HmacSha1),
            _ => Err(Error::algorithm_unsupported(format!(
                "signature type [{s}] is not supported, only [hmac-sha1] is"
            ))),
        }
    }
}

/// The canonical string a request was signed with.
///
/// Attached to every built request as an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringToSign(pub String);

impl StringToSign {
    /// Build the canonical string.
    ///
    /// ```text
    /// VERB
    /// CONTENT-MD5
    /// CONTENT-TYPE
    /// DATE
    /// x-acs-*/x-log-* headers, lower-cased and sorted, empty values dropped
    /// RESOURCE[?k1=v1&k2=v2]
    /// ```
    ///
    /// Query keys and values stay raw here, the wire form is escaped separately.
    pub fn build(
        method: &Method,
        headers: &HeaderMap,
        content_md5: Option<&str>,
        resource: &str,
        query: &BTreeMap<String, String>,
    ) -> Result<Self> {
        let mut s = String::new();
        writeln!(&mut s, "{}", method.as_str())?;
        writeln!(&mut s, "{}", content_md5.unwrap_or_default())?;

        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::trim)
            .unwrap_or_default();
        writeln!(&mut s, "{content_type}")?;

        let date = headers
            .get(DATE)
            .ok_or_else(|| Error::request_invalid("date header is required for signing"))?
            .to_str()?;
        writeln!(&mut s, "{date}")?;

        let mut log_headers: Vec<(&str, &str)> = headers
            .keys()
            .filter(|k| {
                SIGNED_HEADER_PREFIXES
                    .iter()
                    .any(|prefix| k.as_str().starts_with(prefix))
            })
            .filter_map(|k| {
                let v = headers.get(k)?.to_str().ok()?;
                (!v.is_empty()).then_some((k.as_str(), v))
            })
            .collect();
        log_headers.sort_unstable();
        let log_headers = log_headers
            .into_iter()
            .map(|(k, v)| format!("{k}:{v}"))
            .collect::<Vec<_>>()
            .join("\n");
        writeln!(&mut s, "{log_headers}")?;

        s.push_str(resource);
        if !query.is_empty() {
            s.push('?');
            let pairs = query
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&");
            s.push_str(&pairs);
        }

        Ok(StringToSign(s))
    }

    /// Canonical string as str.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Sign the request parts with the given algorithm.
///
/// The signature-method header is written into `headers` first since it
/// takes part in the canonical header list.
pub fn compute_signature(
    signature_type: SignatureType,
    method: &Method,
    headers: &mut HeaderMap,
    content_md5: Option<&str>,
    resource: &str,
    query: &BTreeMap<String, String>,
    secret: &str,
) -> Result<(StringToSign, Vec<u8>)> {
    match signature_type {
        SignatureType::HmacSha1 => {
            headers.insert(
                X_LOG_SIGNATURE_METHOD,
                HeaderValue::from_static(signature_type.as_str()),
            );
            let string_to_sign = StringToSign::build(method, headers, content_md5, resource, query)?;
            log::debug!("calculated string to sign: {}", string_to_sign.as_str());

            let signature = hmac_sha1(secret.as_bytes(), string_to_sign.as_str().as_bytes());
            Ok((string_to_sign, signature))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aliyun_log_core::ErrorKind;
    use pretty_assertions::assert_eq;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut m = HeaderMap::new();
        for (k, v) in pairs {
            m.insert(*k, HeaderValue::from_static(v));
        }
        m
    }

    #[test]
    fn test_string_to_sign_layout() {
        let headers = headers(&[
            ("date", "Wed, 01 Jan 2020 00:00:00 GMT"),
            ("content-type", "application/json; charset=utf-8"),
            ("x-log-bodyrawsize", "7"),
            ("x-log-apiversion", "0.6.0"),
            ("x-acs-security-token", "token"),
            ("x-log-compresstype", ""),
            ("user-agent", "ignored"),
        ]);
        let query = BTreeMap::from([
            ("type".to_string(), "log".to_string()),
            ("from".to_string(), "1".to_string()),
        ]);

        let s = StringToSign::build(
            &Method::GET,
            &headers,
            Some("AC3EF48CAA08FA3ED5E025DA69EDC645"),
            "/logstores/app",
            &query,
        )
        .unwrap();

        assert_eq!(
            s.as_str(),
            "GET\n\
             AC3EF48CAA08FA3ED5E025DA69EDC645\n\
             application/json\n\
             Wed, 01 Jan 2020 00:00:00 GMT\n\
             x-acs-security-token:token\n\
             x-log-apiversion:0.6.0\n\
             x-log-bodyrawsize:7\n\
             /logstores/app?from=1&type=log"
        );
    }

    #[test]
    fn test_signature_method_header_is_signed() {
        let mut headers = headers(&[("date", "Wed, 01 Jan 2020 00:00:00 GMT")]);
        let (s, sig) = compute_signature(
            SignatureType::HmacSha1,
            &Method::GET,
            &mut headers,
            None,
            "/",
            &BTreeMap::new(),
            "secret",
        )
        .unwrap();

        assert_eq!(headers.get(X_LOG_SIGNATURE_METHOD).unwrap(), "hmac-sha1");
        assert!(s.as_str().contains("x-log-signaturemethod:hmac-sha1\n/"));
        assert_eq!(sig.len(), 20);
    }

    #[test]
    fn test_signature_is_deterministic() {
        let sign = |date: &'static str| {
            let mut headers = headers(&[("date", date)]);
            compute_signature(
                SignatureType::HmacSha1,
                &Method::POST,
                &mut headers,
                None,
                "/logstores",
                &BTreeMap::new(),
                "secret",
            )
            .unwrap()
            .1
        };

        assert_eq!(
            sign("Wed, 01 Jan 2020 00:00:00 GMT"),
            sign("Wed, 01 Jan 2020 00:00:00 GMT")
        );
        assert_ne!(
            sign("Wed, 01 Jan 2020 00:00:00 GMT"),
            sign("Wed, 01 Jan 2020 00:00:01 GMT")
        );
    }

    #[test]
    fn test_missing_date() {
        let err = StringToSign::build(&Method::GET, &HeaderMap::new(), None, "/", &BTreeMap::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }

    #[test]
    fn test_parse_signature_type() {
        assert_eq!(
            "hmac-sha1".parse::<SignatureType>().unwrap(),
            SignatureType::HmacSha1
        );
        let err = "hmac-sha256".parse::<SignatureType>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlgorithmUnsupported);
    }
}
