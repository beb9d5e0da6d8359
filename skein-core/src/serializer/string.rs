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

//! `[u16 String][i32 len][payload]`, where `len` counts UTF-16 code units
//! or UTF-8 bytes depending on the active encoding.

use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::util::{read_len, read_marker, to_i32_len};
use crate::serializer::{SkeinDefault, Serializer};
use crate::types::{StringEncoding, STRING};

impl Serializer for String {
    #[inline]
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_u16(STRING);
        match context.string_encoding() {
            StringEncoding::Utf8 => {
                context.writer.write_i32(to_i32_len(self.len())?);
                context.writer.write_utf8_string(self);
            }
            StringEncoding::Utf16 => {
                let units = self.encode_utf16().count();
                context.writer.write_i32(to_i32_len(units)?);
                context.writer.write_utf16_string(self);
            }
        }
        Ok(())
    }

    #[inline]
    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        read_marker::<Self>(context, STRING)?;
        let len = read_len(context)?;
        match context.string_encoding() {
            StringEncoding::Utf8 => context.reader.read_utf8_string(len),
            StringEncoding::Utf16 => context.reader.read_utf16_string(len),
        }
    }

    #[inline]
    fn skein_size(&self, context: &mut WriteContext) -> Result<usize, Error> {
        let payload = match context.string_encoding() {
            StringEncoding::Utf8 => self.len(),
            StringEncoding::Utf16 => self.encode_utf16().count() * 2,
        };
        Ok(2 + 4 + payload)
    }

    #[inline(always)]
    fn skein_is_reference() -> bool {
        true
    }
}

impl SkeinDefault for String {
    #[inline(always)]
    fn skein_default() -> Self {
        String::new()
    }
}
