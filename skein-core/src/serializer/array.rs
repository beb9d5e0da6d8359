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
use crate::serializer::collection::{
    read_collection_header, write_collection_header, COLLECTION_HEADER_SIZE,
};
use crate::serializer::{SkeinDefault, Serializer};

#[inline(always)]
fn check_len<const N: usize>(len: usize) -> Result<(), Error> {
    if len != N {
        return Err(Error::invalid_data(format!(
            "array of length {N} cannot hold {len} elements"
        )));
    }
    Ok(())
}

/// Fixed-length arrays use the collection encoding; a count other than
/// `N` is rejected.
impl<T: Serializer, const N: usize> Serializer for [T; N] {
    #[inline]
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_collection_header(N, context)?;
        T::skein_write_slice(self, context)
    }

    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        let len = read_collection_header::<Self>(context)?;
        check_len::<N>(len)?;
        let items = T::skein_read_vec(len, context)?;
        items
            .try_into()
            .map_err(|_: Vec<T>| Error::invalid_data(format!("expected {N} array elements")))
    }

    fn skein_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
        let len = read_collection_header::<Self>(context)?;
        check_len::<N>(len)?;
        T::skein_merge_slice(self, context)
    }

    #[inline]
    fn skein_size(&self, context: &mut WriteContext) -> Result<usize, Error> {
        Ok(COLLECTION_HEADER_SIZE + T::skein_size_slice(self, context)?)
    }

    #[inline(always)]
    fn skein_is_reference() -> bool {
        true
    }
}

impl<T: SkeinDefault, const N: usize> SkeinDefault for [T; N] {
    fn skein_default() -> Self {
        std::array::from_fn(|_| T::skein_default())
    }
}
