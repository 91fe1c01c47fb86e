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

use crate::constants::{APPLICATION_JSON, APPLICATION_PROTOBUF};
use aliyun_log_core::{Error, Result};
use serde::Serialize;
use serde_json::Value;

/// SerializeType selects how a staged body is turned into bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerializeType {
    /// JSON with lower-camel-case field names and no null fields.
    Json,
    /// Protobuf message bytes.
    Protobuf,
}

impl SerializeType {
    /// Media type sent as `Content-Type`.
    pub fn content_type(&self) -> &'static str {
        match self {
            SerializeType::Json => APPLICATION_JSON,
            SerializeType::Protobuf => APPLICATION_PROTOBUF,
        }
    }
}

/// Types that flatten into query parameters.
///
/// Only scalar fields are allowed. Implementations usually delegate to
/// [`flatten_query`] on a `#[serde(rename_all = "camelCase")]` struct.
pub trait ToQueryParams {
    /// Flatten into `(key, value)` pairs.
    fn to_query_params(&self) -> Result<Vec<(String, String)>>;
}

impl ToQueryParams for [(String, String)] {
    fn to_query_params(&self) -> Result<Vec<(String, String)>> {
        Ok(self.to_vec())
    }
}

impl ToQueryParams for Value {
    fn to_query_params(&self) -> Result<Vec<(String, String)>> {
        let Value::Object(fields) = self else {
            return Err(Error::query_shape_invalid(
                "query object must be a record of scalar fields",
            ));
        };

        let mut params = Vec::with_capacity(fields.len());
        for (key, value) in fields {
            let value = match value {
                Value::Null => continue,
                Value::String(v) => v.clone(),
                Value::Bool(v) => v.to_string(),
                Value::Number(v) => v.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(Error::query_shape_invalid(format!(
                        "query field [{key}] is not a scalar value"
                    )))
                }
            };
            params.push((key.clone(), value));
        }
        Ok(params)
    }
}

/// Flatten a serializable record into query parameters.
///
/// Null fields are skipped; nested arrays or objects fail with
/// [`aliyun_log_core::ErrorKind::QueryShapeInvalid`].
pub fn flatten_query<T: Serialize + ?Sized>(value: &T) -> Result<Vec<(String, String)>> {
    let value = serde_json::to_value(value)
        .map_err(|e| Error::query_shape_invalid("query object is not serializable").with_source(e))?;
    value.to_query_params()
}

/// Convert a value into the JSON tree that goes on the wire.
pub(crate) fn to_json_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| Error::content_shape_invalid("content is not serializable").with_source(e))
}

/// Serialize a JSON tree with null fields removed.
pub(crate) fn to_json_bytes(mut value: Value) -> Result<Vec<u8>> {
    strip_nulls(&mut value);
    serde_json::to_vec(&value)
        .map_err(|e| Error::content_shape_invalid("serialize content failed").with_source(e))
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(fields) => {
            fields.retain(|_, v| !v.is_null());
            fields.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aliyun_log_core::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        logstore_name: String,
        #[serde(default)]
        shard_count: Option<i32>,
        #[serde(default)]
        tags: Vec<Option<String>>,
    }

    #[test]
    fn test_json_drops_nulls() {
        let value = to_json_value(&Sample {
            logstore_name: "access-log".to_string(),
            shard_count: None,
            tags: vec![Some("a".to_string())],
        })
        .unwrap();

        let bs = to_json_bytes(value).unwrap();
        assert_eq!(
            String::from_utf8(bs).unwrap(),
            r#"{"logstoreName":"access-log","tags":["a"]}"#
        );
    }

    #[test]
    fn test_json_round_trip_reads_absent_as_default() {
        let origin = Sample {
            logstore_name: "access-log".to_string(),
            shard_count: None,
            tags: vec![],
        };
        let bs = to_json_bytes(to_json_value(&origin).unwrap()).unwrap();
        let restored: Sample = serde_json::from_slice(&bs).unwrap();
        assert_eq!(restored, origin);
    }

    #[test]
    fn test_flatten_query() {
        let mut params = flatten_query(&json!({
            "offset": 1,
            "size": 500,
            "logstoreName": null,
            "reverse": false,
            "query": "status: 200",
        }))
        .unwrap();
        params.sort();

        assert_eq!(
            params,
            vec![
                ("offset".to_string(), "1".to_string()),
                ("query".to_string(), "status: 200".to_string()),
                ("reverse".to_string(), "false".to_string()),
                ("size".to_string(), "500".to_string()),
            ]
        );
    }

    #[test]
    fn test_flatten_query_rejects_nested() {
        let err = flatten_query(&json!({"a": {"b": 1}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::QueryShapeInvalid);

        let err = flatten_query(&json!({"a": [1, 2]})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::QueryShapeInvalid);

        let err = flatten_query(&json!([1, 2])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::QueryShapeInvalid);
    }
}
