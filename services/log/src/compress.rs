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

use aliyun_log_core::{Error, Result};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

/// CompressType selects the codec for request bodies and response payloads.
///
/// The value carried by `x-log-compresstype` is the lower-case codec name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompressType {
    /// Body is sent as is.
    #[default]
    None,
    /// Raw lz4 block without frame; the receiver needs `x-log-bodyrawsize`.
    Lz4,
    /// zlib stream (RFC 1950).
    Deflate,
}

impl CompressType {
    /// Header value for this codec, `None` has no header.
    pub fn as_header_value(&self) -> Option<&'static str> {
        match self {
            CompressType::None => None,
            CompressType::Lz4 => Some("lz4"),
            CompressType::Deflate => Some("deflate"),
        }
    }

    /// Compress the payload.
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            CompressType::None => Ok(data.to_vec()),
            CompressType::Lz4 => Ok(lz4_flex::block::compress(data)),
            CompressType::Deflate => {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(data)?;
                Ok(encoder.finish()?)
            }
        }
    }

    /// Decompress the payload.
    ///
    /// `raw_size` is the size before compression. It is required by [`CompressType::Lz4`]
    /// and only used as a capacity hint by the others.
    pub fn decompress(&self, data: &[u8], raw_size: Option<usize>) -> Result<Vec<u8>> {
        match self {
            CompressType::None => Ok(data.to_vec()),
            CompressType::Lz4 => {
                let Some(raw_size) = raw_size else {
                    return Err(Error::decode(
                        "x-log-bodyrawsize is required when using lz4 compress",
                    ));
                };
                check_raw_size(data, raw_size)?;
                let bs = lz4_flex::block::decompress(data, raw_size)
                    .map_err(|e| Error::decode("lz4 decompress failed").with_source(e))?;
                if bs.len() != raw_size {
                    return Err(Error::decode(format!(
                        "lz4 decompressed {} bytes, expected {raw_size}",
                        bs.len()
                    )));
                }
                Ok(bs)
            }
            CompressType::Deflate => {
                let hint = raw_size.filter(|&n| check_raw_size(data, n).is_ok());
                let mut bs = Vec::with_capacity(hint.unwrap_or(data.len()));
                ZlibDecoder::new(data).read_to_end(&mut bs)?;
                Ok(bs)
            }
        }
    }
}

/// Upper bound of any decompressed body we accept.
const MAX_RAW_SIZE: usize = 1 << 30;

/// An lz4 block never expands input by more than 255 times.
const MAX_LZ4_RATIO: usize = 255;

/// Reject a declared raw size the payload could not possibly inflate to.
fn check_raw_size(data: &[u8], raw_size: usize) -> Result<()> {
    let limit = data
        .len()
        .saturating_mul(MAX_LZ4_RATIO)
        .saturating_add(16)
        .min(MAX_RAW_SIZE);
    if raw_size > limit {
        return Err(Error::decode(format!(
            "x-log-bodyrawsize {raw_size} exceeds limit {limit} for {} compressed bytes",
            data.len()
        )));
    }
    Ok(())
}

impl FromStr for CompressType {
    type Err = Error;

    /// Parse a header value, case-insensitive.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(CompressType::None),
            "lz4" => Ok(CompressType::Lz4),
            "deflate" => Ok(CompressType::Deflate),
            _ => Err(Error::compression_unsupported(format!(
                "compress type [{s}] is not supported"
            ))),
        }
    }
}

impl fmt::Display for CompressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_header_value().unwrap_or("none"))
    }
}
