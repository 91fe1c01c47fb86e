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

//! Time related utils.

use crate::{Error, Result};

/// DateTime is the alias for chrono's `DateTime<Utc>`.
pub type DateTime = chrono::DateTime<chrono::Utc>;

/// Create a new DateTime for now.
pub fn now() -> DateTime {
    chrono::Utc::now()
}

/// Format time into an RFC 1123 http date: `Wed, 01 Jan 2020 00:00:00 GMT`.
pub fn format_http_date(t: DateTime) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse an RFC 1123 http date.
pub fn parse_http_date(s: &str) -> Result<DateTime> {
    let t = chrono::DateTime::parse_from_rfc2822(s)
        .map_err(|e| Error::unexpected(format!("parse {s} into http date failed")).with_source(e))?;
    Ok(t.with_timezone(&chrono::Utc))
}
