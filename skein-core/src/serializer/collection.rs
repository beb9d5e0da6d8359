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

//! Shared framing for every container: `[u16 Collection][i32 count]`
//! followed by `count` elements (or key/value pairs).
//!
//! Merge tiers, strongest first:
//! - list-like containers merge element `i` into element `i`, truncate the
//!   tail when the stream is shorter and append fresh elements when longer;
//! - keyed maps merge values under keys present on both sides, drop the
//!   others and construct values for new keys;
//! - sets, heaps and concurrent containers are cleared and refilled, with
//!   no identity guarantee.

use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::util::{read_len, read_marker, to_i32_len};
use crate::serializer::Serializer;
use crate::types::COLLECTION;

/// Marker plus count.
pub const COLLECTION_HEADER_SIZE: usize = 2 + 4;

#[inline(always)]
pub fn write_collection_header(len: usize, context: &mut WriteContext) -> Result<(), Error> {
    context.writer.write_u16(COLLECTION);
    context.writer.write_i32(to_i32_len(len)?);
    Ok(())
}

/// Reads the header of a non-optional container `C` and returns its count.
///
/// The count may not exceed the bytes left in the stream. Elements that
/// encode to nothing (a struct whose members are all ignored) are bounded
/// the same way, so a short input cannot expand into an unbounded decode.
#[inline(always)]
pub fn read_collection_header<C>(context: &mut ReadContext) -> Result<usize, Error> {
    read_marker::<C>(context, COLLECTION)?;
    let len = read_len(context)?;
    let remaining = context.reader.remaining();
    if len > remaining {
        let cursor = context.reader.get_cursor();
        return Err(Error::buffer_out_of_bound(cursor, len, cursor + remaining));
    }
    Ok(len)
}

pub fn write_elements<'a, T, I>(items: I, context: &mut WriteContext) -> Result<(), Error>
where
    T: Serializer,
    I: IntoIterator<Item = &'a T>,
{
    for item in items {
        item.skein_write(context)?;
    }
    Ok(())
}

pub fn size_elements<'a, T, I>(items: I, context: &mut WriteContext) -> Result<usize, Error>
where
    T: Serializer,
    I: IntoIterator<Item = &'a T>,
{
    let mut size = COLLECTION_HEADER_SIZE;
    for item in items {
        size += item.skein_size(context)?;
    }
    Ok(size)
}

/// Reads `len` elements one by one into any collection.
pub fn read_elements<T, C>(len: usize, context: &mut ReadContext) -> Result<C, Error>
where
    T: Serializer,
    C: FromIterator<T>,
{
    (0..len).map(|_| T::skein_read(context)).collect()
}

/// Index-preserving merge of `len` incoming elements onto `items`.
pub fn merge_vec<T: Serializer>(
    items: &mut Vec<T>,
    len: usize,
    context: &mut ReadContext,
) -> Result<(), Error> {
    let keep = len.min(items.len());
    items.truncate(keep);
    T::skein_merge_slice(items, context)?;
    if len > keep {
        let fresh = T::skein_read_vec(len - keep, context)?;
        items.extend(fresh);
    }
    Ok(())
}
