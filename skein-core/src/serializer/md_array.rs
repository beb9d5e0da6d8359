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

//! Rectangular arrays of any rank.
//!
//! Wire shape: `[u16 Collection][i32 total][i32 rank][i32 dim]*rank`
//! followed by the `total` elements in row-major order. `total` must equal
//! the product of the dimensions; a zero-length dimension gives an empty
//! but present array.

use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::collection::{
    read_collection_header, write_collection_header, COLLECTION_HEADER_SIZE,
};
use crate::serializer::util::{read_len, to_i32_len};
use crate::serializer::{SkeinDefault, Serializer};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MdArray<T> {
    dims: Vec<usize>,
    data: Vec<T>,
}

fn element_count(dims: &[usize]) -> Option<usize> {
    dims.iter().try_fold(1usize, |acc, d| acc.checked_mul(*d))
}

impl<T> MdArray<T> {
    /// Wraps row-major `data`. Fails unless `data.len()` is the product of `dims`.
    pub fn new(dims: Vec<usize>, data: Vec<T>) -> Result<Self, Error> {
        if dims.is_empty() {
            return Err(Error::not_allowed("a multi-dimensional array needs at least one dimension"));
        }
        match element_count(&dims) {
            Some(total) if total == data.len() => Ok(MdArray { dims, data }),
            _ => Err(Error::not_allowed(format!(
                "dimensions {dims:?} do not describe {} elements",
                data.len()
            ))),
        }
    }

    /// An array of the given shape filled with default values.
    pub fn filled(dims: Vec<usize>) -> Result<Self, Error>
    where
        T: SkeinDefault,
    {
        let total = element_count(&dims)
            .ok_or_else(|| Error::not_allowed(format!("dimensions {dims:?} overflow")))?;
        let data = (0..total).map(|_| T::skein_default()).collect();
        MdArray::new(dims, data)
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    fn offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.dims.len() {
            return None;
        }
        let mut offset = 0;
        for (i, d) in index.iter().zip(&self.dims) {
            if i >= d {
                return None;
            }
            offset = offset * d + i;
        }
        Some(offset)
    }

    pub fn get(&self, index: &[usize]) -> Option<&T> {
        self.offset(index).map(|o| &self.data[o])
    }

    pub fn get_mut(&mut self, index: &[usize]) -> Option<&mut T> {
        self.offset(index).map(|o| &mut self.data[o])
    }
}

fn read_shape<T>(context: &mut ReadContext) -> Result<(usize, Vec<usize>), Error> {
    let total = read_collection_header::<MdArray<T>>(context)?;
    let rank = read_len(context)?;
    if rank == 0 || rank > context.reader.remaining() / 4 {
        return Err(Error::invalid_data(format!("invalid array rank {rank}")));
    }
    let mut dims = Vec::with_capacity(rank);
    for _ in 0..rank {
        dims.push(read_len(context)?);
    }
    if element_count(&dims) != Some(total) {
        return Err(Error::invalid_data(format!(
            "array dimensions {dims:?} disagree with element count {total}"
        )));
    }
    Ok((total, dims))
}

impl<T: Serializer> Serializer for MdArray<T> {
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_collection_header(self.data.len(), context)?;
        context.writer.write_i32(to_i32_len(self.dims.len())?);
        for d in &self.dims {
            context.writer.write_i32(to_i32_len(*d)?);
        }
        T::skein_write_slice(&self.data, context)
    }

    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        let (total, dims) = read_shape::<T>(context)?;
        let data = T::skein_read_vec(total, context)?;
        Ok(MdArray { dims, data })
    }

    /// Reuses the array only when the incoming shape matches exactly.
    fn skein_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
        let (total, dims) = read_shape::<T>(context)?;
        if dims == self.dims {
            return T::skein_merge_slice(&mut self.data, context);
        }
        let data = T::skein_read_vec(total, context)?;
        *self = MdArray { dims, data };
        Ok(())
    }

    fn skein_size(&self, context: &mut WriteContext) -> Result<usize, Error> {
        Ok(COLLECTION_HEADER_SIZE
            + 4
            + 4 * self.dims.len()
            + T::skein_size_slice(&self.data, context)?)
    }

    fn skein_is_reference() -> bool {
        true
    }
}

/// A one-dimensional empty array.
impl<T> SkeinDefault for MdArray<T> {
    fn skein_default() -> Self {
        MdArray {
            dims: vec![0],
            data: Vec::new(),
        }
    }
}

impl<T> Default for MdArray<T> {
    fn default() -> Self {
        Self::skein_default()
    }
}
