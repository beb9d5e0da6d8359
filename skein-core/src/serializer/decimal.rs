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
use rust_decimal::Decimal;

const DECIMAL_SIZE: usize = 16;

/// The 16-byte flags/hi/lo/mid layout of [`Decimal::serialize`].
impl Serializer for Decimal {
    #[inline]
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_bytes(&self.serialize());
        Ok(())
    }

    #[inline]
    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        let mut raw = [0u8; DECIMAL_SIZE];
        raw.copy_from_slice(context.reader.read_bytes(DECIMAL_SIZE)?);
        // scale lives in bits 16..24 of the flags word and may not exceed 28
        if raw[2] > 28 {
            return Err(Error::invalid_data(format!("decimal scale {} exceeds 28", raw[2])));
        }
        Ok(Decimal::deserialize(raw))
    }

    #[inline(always)]
    fn skein_size(&self, _: &mut WriteContext) -> Result<usize, Error> {
        Ok(DECIMAL_SIZE)
    }

    #[inline]
    fn skein_size_slice(items: &[Self], _: &mut WriteContext) -> Result<usize, Error> {
        Ok(items.len() * DECIMAL_SIZE)
    }
}

impl SkeinDefault for Decimal {
    #[inline(always)]
    fn skein_default() -> Self {
        Decimal::ZERO
    }
}
