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
    merge_vec, read_collection_header, read_elements, size_elements, write_collection_header,
    write_elements, COLLECTION_HEADER_SIZE,
};
use crate::serializer::{SkeinDefault, Serializer};
use std::collections::{LinkedList, VecDeque};

impl<T: Serializer> Serializer for Vec<T> {
    #[inline]
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_collection_header(self.len(), context)?;
        T::skein_write_slice(self, context)
    }

    #[inline]
    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        let len = read_collection_header::<Self>(context)?;
        T::skein_read_vec(len, context)
    }

    fn skein_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
        let len = read_collection_header::<Self>(context)?;
        merge_vec(self, len, context)
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

impl<T> SkeinDefault for Vec<T> {
    #[inline(always)]
    fn skein_default() -> Self {
        Vec::new()
    }
}

impl<T: Serializer> Serializer for VecDeque<T> {
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_collection_header(self.len(), context)?;
        let (front, back) = self.as_slices();
        T::skein_write_slice(front, context)?;
        T::skein_write_slice(back, context)
    }

    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        let len = read_collection_header::<Self>(context)?;
        Ok(T::skein_read_vec(len, context)?.into())
    }

    fn skein_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
        let len = read_collection_header::<Self>(context)?;
        self.truncate(len);
        let (front, back) = self.as_mut_slices();
        T::skein_merge_slice(front, context)?;
        T::skein_merge_slice(back, context)?;
        if len > self.len() {
            let fresh = T::skein_read_vec(len - self.len(), context)?;
            self.extend(fresh);
        }
        Ok(())
    }

    fn skein_size(&self, context: &mut WriteContext) -> Result<usize, Error> {
        let (front, back) = self.as_slices();
        Ok(COLLECTION_HEADER_SIZE
            + T::skein_size_slice(front, context)?
            + T::skein_size_slice(back, context)?)
    }

    fn skein_is_reference() -> bool {
        true
    }
}

impl<T> SkeinDefault for VecDeque<T> {
    fn skein_default() -> Self {
        VecDeque::new()
    }
}

impl<T: Serializer> Serializer for LinkedList<T> {
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_collection_header(self.len(), context)?;
        write_elements(self, context)
    }

    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        let len = read_collection_header::<Self>(context)?;
        read_elements(len, context)
    }

    fn skein_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
        let len = read_collection_header::<Self>(context)?;
        if len < self.len() {
            // detach the tail; the removed nodes are dropped untouched
            drop(self.split_off(len));
        }
        for item in self.iter_mut() {
            item.skein_read_into(context)?;
        }
        for _ in self.len()..len {
            self.push_back(T::skein_read(context)?);
        }
        Ok(())
    }

    fn skein_size(&self, context: &mut WriteContext) -> Result<usize, Error> {
        size_elements(self, context)
    }

    fn skein_is_reference() -> bool {
        true
    }
}

impl<T> SkeinDefault for LinkedList<T> {
    fn skein_default() -> Self {
        LinkedList::new()
    }
}

/// Same encoding as `Vec<T>`. A merge with a different count reallocates
/// the slice but keeps the surviving elements.
impl<T: Serializer> Serializer for Box<[T]> {
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_collection_header(self.len(), context)?;
        T::skein_write_slice(self, context)
    }

    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        let len = read_collection_header::<Self>(context)?;
        Ok(T::skein_read_vec(len, context)?.into_boxed_slice())
    }

    fn skein_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
        let len = read_collection_header::<Self>(context)?;
        if len == self.len() {
            return T::skein_merge_slice(self, context);
        }
        let mut items = std::mem::take(self).into_vec();
        let merged = merge_vec(&mut items, len, context);
        *self = items.into_boxed_slice();
        merged
    }

    fn skein_size(&self, context: &mut WriteContext) -> Result<usize, Error> {
        Ok(COLLECTION_HEADER_SIZE + T::skein_size_slice(self, context)?)
    }

    fn skein_is_reference() -> bool {
        true
    }
}

impl<T> SkeinDefault for Box<[T]> {
    fn skein_default() -> Self {
        Box::default()
    }
}
