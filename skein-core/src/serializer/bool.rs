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

use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::{SkeinDefault, Serializer};

impl Serializer for bool {
    #[inline(always)]
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_bool(*self);
        Ok(())
    }

    #[inline(always)]
    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        context.reader.read_bool()
    }

    #[inline(always)]
    fn skein_size(&self, _: &mut WriteContext) -> Result<usize, Error> {
        Ok(1)
    }

    #[inline]
    fn skein_write_slice(items: &[Self], context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_bool_slice(items);
        Ok(())
    }

    // every byte is validated, so no block copy on the way in
    fn skein_read_vec(len: usize, context: &mut ReadContext) -> Result<Vec<Self>, Error> {
        let bytes = context.reader.read_bytes(len)?;
        bytes
            .iter()
            .map(|b| match b {
                0 => Ok(false),
                1 => Ok(true),
                v => Err(Error::invalid_data(format!("invalid bool byte {v}"))),
            })
            .collect()
    }

    #[inline]
    fn skein_size_slice(items: &[Self], _: &mut WriteContext) -> Result<usize, Error> {
        Ok(items.len())
    }
}

impl SkeinDefault for bool {
    #[inline(always)]
    fn skein_default() -> Self {
        false
    }
}

/// A Unicode scalar value as a little-endian `u32`.
impl Serializer for char {
    #[inline(always)]
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_char(*self);
        Ok(())
    }

    #[inline(always)]
    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        context.reader.read_char()
    }

    #[inline(always)]
    fn skein_size(&self, _: &mut WriteContext) -> Result<usize, Error> {
        Ok(4)
    }

    #[inline]
    fn skein_size_slice(items: &[Self], _: &mut WriteContext) -> Result<usize, Error> {
        Ok(items.len() * 4)
    }
}

impl SkeinDefault for char {
    #[inline(always)]
    fn skein_default() -> Self {
        '\0'
    }
}
