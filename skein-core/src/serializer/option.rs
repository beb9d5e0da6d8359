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

//! `None` is the `Null` sentinel. `Some` of a reference-like value is the
//! value itself, whose header is never null; `Some` of anything else is
//! prefixed with the `Nullable` sentinel.

use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::util::read_marker;
use crate::serializer::{SkeinDefault, Serializer};
use crate::types::{NULL, NULLABLE};

/// Consumes a `Null` header if there is one.
#[inline(always)]
fn read_null(context: &mut ReadContext) -> Result<bool, Error> {
    if context.reader.peek_u16()? == NULL {
        context.reader.skip(2)?;
        return Ok(true);
    }
    Ok(false)
}

impl<T: Serializer> Serializer for Option<T> {
    #[inline]
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        match self {
            None => {
                context.writer.write_u16(NULL);
                Ok(())
            }
            Some(value) => {
                if !T::skein_is_reference() {
                    context.writer.write_u16(NULLABLE);
                }
                value.skein_write(context)
            }
        }
    }

    #[inline]
    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        if read_null(context)? {
            return Ok(None);
        }
        if !T::skein_is_reference() {
            read_marker::<Self>(context, NULLABLE)?;
        }
        T::skein_read(context).map(Some)
    }

    fn skein_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
        if read_null(context)? {
            *self = None;
            return Ok(());
        }
        if !T::skein_is_reference() {
            read_marker::<Self>(context, NULLABLE)?;
        }
        match self {
            Some(value) => value.skein_read_into(context),
            None => {
                *self = Some(T::skein_read(context)?);
                Ok(())
            }
        }
    }

    #[inline]
    fn skein_size(&self, context: &mut WriteContext) -> Result<usize, Error> {
        match self {
            None => Ok(2),
            Some(value) if T::skein_is_reference() => value.skein_size(context),
            Some(value) => Ok(2 + value.skein_size(context)?),
        }
    }
}

impl<T> SkeinDefault for Option<T> {
    #[inline(always)]
    fn skein_default() -> Self {
        None
    }
}
