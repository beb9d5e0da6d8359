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

use crate::buffer::{Reader, Writer};
use crate::config::Config;
use crate::error::Error;
use crate::resolver::registry::Registry;
use crate::types::StringEncoding;

/// Per-call encoding state. Also used, with a scratch writer, to size values.
pub struct WriteContext<'se> {
    pub writer: &'se mut Writer,
    registry: &'se Registry,
    config: &'se Config,
    utf8: bool,
    max_depth: u32,
    current_depth: u32,
}

impl<'se> WriteContext<'se> {
    pub fn new(
        registry: &'se Registry,
        config: &'se Config,
        writer: &'se mut Writer,
    ) -> WriteContext<'se> {
        WriteContext {
            writer,
            registry,
            config,
            utf8: config.string_encoding() == StringEncoding::Utf8,
            max_depth: config.max_depth(),
            current_depth: 0,
        }
    }

    /// A context over `writer` that keeps this one's string encoding and
    /// nesting depth, for encoding a nested value on the side.
    pub fn scratch<'a>(&self, writer: &'a mut Writer) -> WriteContext<'a>
    where
        'se: 'a,
    {
        WriteContext {
            writer,
            registry: self.registry,
            config: self.config,
            utf8: self.utf8,
            max_depth: self.max_depth,
            current_depth: self.current_depth,
        }
    }

    #[inline(always)]
    pub fn registry(&self) -> &'se Registry {
        self.registry
    }

    #[inline(always)]
    pub fn config(&self) -> &'se Config {
        self.config
    }

    #[inline(always)]
    pub fn is_permissive(&self) -> bool {
        self.config.is_permissive()
    }

    #[inline(always)]
    pub fn is_compress_int(&self) -> bool {
        self.config.is_compress_int()
    }

    #[inline(always)]
    pub fn string_encoding(&self) -> StringEncoding {
        if self.utf8 {
            StringEncoding::Utf8
        } else {
            StringEncoding::Utf16
        }
    }

    /// Runs `f` with UTF-8 strings forced on when `utf8` is set.
    #[inline]
    pub fn with_utf8<R>(&mut self, utf8: bool, f: impl FnOnce(&mut Self) -> R) -> R {
        if !utf8 || self.utf8 {
            return f(self);
        }
        self.utf8 = true;
        let result = f(self);
        self.utf8 = false;
        result
    }

    pub fn inc_depth(&mut self) -> Result<(), Error> {
        self.current_depth += 1;
        if self.current_depth > self.max_depth {
            return Err(Error::depth_exceed(format!(
                "maximum nesting depth ({}) exceeded while encoding; the value graph may contain a cycle",
                self.max_depth
            )));
        }
        Ok(())
    }

    #[inline(always)]
    pub fn dec_depth(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }
}

/// Per-call decoding state.
pub struct ReadContext<'de, 'bf: 'de> {
    pub reader: Reader<'bf>,
    registry: &'de Registry,
    config: &'de Config,
    utf8: bool,
    max_depth: u32,
    current_depth: u32,
}

impl<'de, 'bf: 'de> ReadContext<'de, 'bf> {
    pub fn new(
        registry: &'de Registry,
        config: &'de Config,
        reader: Reader<'bf>,
    ) -> ReadContext<'de, 'bf> {
        ReadContext {
            reader,
            registry,
            config,
            utf8: config.string_encoding() == StringEncoding::Utf8,
            max_depth: config.max_depth(),
            current_depth: 0,
        }
    }

    #[inline(always)]
    pub fn registry(&self) -> &'de Registry {
        self.registry
    }

    #[inline(always)]
    pub fn config(&self) -> &'de Config {
        self.config
    }

    #[inline(always)]
    pub fn is_permissive(&self) -> bool {
        self.config.is_permissive()
    }

    #[inline(always)]
    pub fn is_compress_int(&self) -> bool {
        self.config.is_compress_int()
    }

    #[inline(always)]
    pub fn string_encoding(&self) -> StringEncoding {
        if self.utf8 {
            StringEncoding::Utf8
        } else {
            StringEncoding::Utf16
        }
    }

    #[inline]
    pub fn with_utf8<R>(&mut self, utf8: bool, f: impl FnOnce(&mut Self) -> R) -> R {
        if !utf8 || self.utf8 {
            return f(self);
        }
        self.utf8 = true;
        let result = f(self);
        self.utf8 = false;
        result
    }

    pub fn inc_depth(&mut self) -> Result<(), Error> {
        self.current_depth += 1;
        if self.current_depth > self.max_depth {
            return Err(Error::depth_exceed(format!(
                "maximum nesting depth ({}) exceeded at byte {}",
                self.max_depth,
                self.reader.get_cursor()
            )));
        }
        Ok(())
    }

    #[inline(always)]
    pub fn dec_depth(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }
}
