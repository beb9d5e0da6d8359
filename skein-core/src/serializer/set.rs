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
    read_collection_header, read_elements, size_elements, write_collection_header,
    write_elements, COLLECTION_HEADER_SIZE,
};
use crate::serializer::util::to_i32_len;
use crate::serializer::{SkeinDefault, Serializer};
use crate::types::COLLECTION;
use dashmap::DashSet;
use std::collections::{BTreeSet, HashSet};
use std::hash::{BuildHasher, Hash};

impl<T, S> Serializer for HashSet<T, S>
where
    T: Serializer + Eq + Hash,
    S: BuildHasher + Default + 'static,
{
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
        self.clear();
        for _ in 0..len {
            self.insert(T::skein_read(context)?);
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

impl<T, S: Default> SkeinDefault for HashSet<T, S> {
    fn skein_default() -> Self {
        HashSet::default()
    }
}

impl<T: Serializer + Ord> Serializer for BTreeSet<T> {
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
        self.clear();
        for _ in 0..len {
            self.insert(T::skein_read(context)?);
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

impl<T> SkeinDefault for BTreeSet<T> {
    fn skein_default() -> Self {
        BTreeSet::new()
    }
}

impl<T, S> Serializer for DashSet<T, S>
where
    T: Serializer + Eq + Hash,
    S: BuildHasher + Clone + Default + 'static,
{
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_u16(COLLECTION);
        let count_pos = context.writer.len();
        context.writer.write_i32(0);
        let mut count = 0usize;
        for item in self.iter() {
            item.key().skein_write(context)?;
            count += 1;
        }
        context
            .writer
            .set_bytes(count_pos, &to_i32_len(count)?.to_le_bytes())
    }

    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        let len = read_collection_header::<Self>(context)?;
        let set = DashSet::with_capacity_and_hasher(len.min(context.reader.remaining()), S::default());
        for _ in 0..len {
            set.insert(T::skein_read(context)?);
        }
        Ok(set)
    }

    fn skein_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
        let len = read_collection_header::<Self>(context)?;
        self.clear();
        for _ in 0..len {
            self.insert(T::skein_read(context)?);
        }
        Ok(())
    }

    fn skein_size(&self, context: &mut WriteContext) -> Result<usize, Error> {
        let mut size = COLLECTION_HEADER_SIZE;
        for item in self.iter() {
            size += item.key().skein_size(context)?;
        }
        Ok(size)
    }

    fn skein_is_reference() -> bool {
        true
    }
}

impl<T, S> SkeinDefault for DashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn skein_default() -> Self {
        DashSet::default()
    }
}
