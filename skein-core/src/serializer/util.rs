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
use crate::resolver::context::ReadContext;
use crate::types::{Sentinel, NULL};

/// Consumes the `u16` header of a non-optional `T` and checks it is `expected`.
///
/// A null header is a type mismatch, since `T` cannot hold null; any other
/// unexpected value means the stream is not what the caller thinks it is.
#[inline(always)]
pub fn read_marker<T>(context: &mut ReadContext, expected: u16) -> Result<(), Error> {
    let offset = context.reader.get_cursor();
    let marker = context.reader.read_u16()?;
    if marker == expected {
        return Ok(());
    }
    Err(unexpected_marker::<T>(marker, offset))
}

#[cold]
pub fn unexpected_marker<T>(marker: u16, offset: usize) -> Error {
    if marker == NULL {
        return Error::type_mismatch(std::any::type_name::<T>(), "null");
    }
    let found = match Sentinel::try_from(marker) {
        Ok(sentinel) => format!("{sentinel:?} marker"),
        Err(_) => format!("type id {marker}"),
    };
    Error::invalid_data(format!(
        "expected `{}` at byte {offset}, found {found}",
        std::any::type_name::<T>()
    ))
}

/// Reads an `i32` count or length and rejects negative values.
#[inline(always)]
pub fn read_len(context: &mut ReadContext) -> Result<usize, Error> {
    let len = context.reader.read_i32()?;
    usize::try_from(len).map_err(|_| Error::invalid_data(format!("negative length {len}")))
}

#[inline(always)]
pub fn to_i32_len(len: usize) -> Result<i32, Error> {
    i32::try_from(len).map_err(|_| Error::invalid_data(format!("length {len} does not fit in i32")))
}
