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

use crate::types::StringEncoding;

/// Configuration for a [`Skein`](crate::skein::Skein) engine.
///
/// Frozen when the engine is built and shared by every `WriteContext` and
/// `ReadContext` it hands out. Nothing here is written to the wire, so both
/// endpoints must agree on it out of band.
#[derive(Clone, Debug)]
pub struct Config {
    /// Whether object payloads carry a length frame so that fields may be
    /// added or removed between versions.
    pub permissive: bool,
    /// Whether scalar integer members use zigzag varints.
    pub compress_int: bool,
    /// Encoding of strings whose member does not ask for UTF-8 itself.
    pub string_encoding: StringEncoding,
    /// Maximum nesting depth accepted while decoding.
    pub max_depth: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            permissive: false,
            compress_int: false,
            string_encoding: StringEncoding::Utf16,
            max_depth: 128,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn is_permissive(&self) -> bool {
        self.permissive
    }

    #[inline(always)]
    pub fn is_compress_int(&self) -> bool {
        self.compress_int
    }

    #[inline(always)]
    pub fn string_encoding(&self) -> StringEncoding {
        self.string_encoding
    }

    #[inline(always)]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}
