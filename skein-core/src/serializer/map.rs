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

//! Maps encode as a collection of `count` key/value pairs, each key
//! immediately followed by its value.

use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::collection::{
    read_collection_header, write_collection_header, COLLECTION_HEADER_SIZE,
};
use crate::serializer::util::to_i32_len;
use crate::serializer::{SkeinDefault, Serializer};
use crate::types::COLLECTION;
use dashmap::DashMap;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

fn write_map_data<'a, K, V, I>(len: usize, iter: I, context: &mut WriteContext) -> Result<(), Error>
where
    K: Serializer,
    V: Serializer,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    write_collection_header(len, context)?;
    for (key, value) in iter {
        key.skein_write(context)?;
        value.skein_write(context)?;
    }
    Ok(())
}

fn map_data_size<'a, K, V, I>(iter: I, context: &mut WriteContext) -> Result<usize, Error>
where
    K: Serializer,
    V: Serializer,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    let mut size = COLLECTION_HEADER_SIZE;
    for (key, value) in iter {
        size += key.skein_size(context)? + value.skein_size(context)?;
    }
    Ok(size)
}

impl<K, V, S> Serializer for HashMap<K, V, S>
where
    K: Serializer + Eq + Hash,
    V: Serializer,
    S: BuildHasher + Default + 'static,
{
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_map_data(self.len(), self.iter(), context)
    }

    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        let len = read_collection_header::<Self>(context)?;
        let mut map = HashMap::with_capacity_and_hasher(len.min(context.reader.remaining()), S::default());
        for _ in 0..len {
            let key = K::skein_read(context)?;
            let value = V::skein_read(context)?;
            map.insert(key, value);
        }
        Ok(map)
    }

    /// Values under keys present in the stream are merged in place; the
    /// other entries are dropped.
    fn skein_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
        let len = read_collection_header::<Self>(context)?;
        let mut merged = HashMap::with_capacity_and_hasher(len.min(context.reader.remaining()), S::default());
        for _ in 0..len {
            let key = K::skein_read(context)?;
            if let Some(mut value) = self.remove(&key) {
                value.skein_read_into(context)?;
                merged.insert(key, value);
            } else if let Some(value) = merged.get_mut(&key) {
                value.skein_read_into(context)?;
            } else {
                let value = V::skein_read(context)?;
                merged.insert(key, value);
            }
        }
        *self = merged;
        Ok(())
    }

    fn skein_size(&self, context: &mut WriteContext) -> Result<usize, Error> {
        map_data_size(self.iter(), context)
    }

    fn skein_is_reference() -> bool {
        true
    }
}

impl<K, V, S: Default> SkeinDefault for HashMap<K, V, S> {
    fn skein_default() -> Self {
        HashMap::default()
    }
}

impl<K, V> Serializer for BTreeMap<K, V>
where
    K: Serializer + Ord,
    V: Serializer,
{
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_map_data(self.len(), self.iter(), context)
    }

    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        let len = read_collection_header::<Self>(context)?;
        let mut map = BTreeMap::new();
        for _ in 0..len {
            let key = K::skein_read(context)?;
            let value = V::skein_read(context)?;
            map.insert(key, value);
        }
        Ok(map)
    }

    fn skein_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
        let len = read_collection_header::<Self>(context)?;
        let mut merged = BTreeMap::new();
        for _ in 0..len {
            let key = K::skein_read(context)?;
            if let Some(mut value) = self.remove(&key) {
                value.skein_read_into(context)?;
                merged.insert(key, value);
            } else if let Some(value) = merged.get_mut(&key) {
                value.skein_read_into(context)?;
            } else {
                let value = V::skein_read(context)?;
                merged.insert(key, value);
            }
        }
        *self = merged;
        Ok(())
    }

    fn skein_size(&self, context: &mut WriteContext) -> Result<usize, Error> {
        map_data_size(self.iter(), context)
    }

    fn skein_is_reference() -> bool {
        true
    }
}

impl<K, V> SkeinDefault for BTreeMap<K, V> {
    fn skein_default() -> Self {
        BTreeMap::new()
    }
}

/// Concurrent map: the count is patched in after iterating, so entries
/// inserted or removed by other threads mid-write still yield a
/// consistent payload. Merging clears and refills.
impl<K, V, S> Serializer for DashMap<K, V, S>
where
    K: Serializer + Eq + Hash,
    V: Serializer,
    S: BuildHasher + Clone + Default + 'static,
{
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_u16(COLLECTION);
        let count_pos = context.writer.len();
        context.writer.write_i32(0);
        let mut count = 0usize;
        for entry in self.iter() {
            entry.key().skein_write(context)?;
            entry.value().skein_write(context)?;
            count += 1;
        }
        context
            .writer
            .set_bytes(count_pos, &to_i32_len(count)?.to_le_bytes())
    }

    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        let len = read_collection_header::<Self>(context)?;
        let map = DashMap::with_capacity_and_hasher(len.min(context.reader.remaining()), S::default());
        for _ in 0..len {
            let key = K::skein_read(context)?;
            let value = V::skein_read(context)?;
            map.insert(key, value);
        }
        Ok(map)
    }

    fn skein_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
        let len = read_collection_header::<Self>(context)?;
        self.clear();
        for _ in 0..len {
            let key = K::skein_read(context)?;
            let value = V::skein_read(context)?;
            self.insert(key, value);
        }
        Ok(())
    }

    fn skein_size(&self, context: &mut WriteContext) -> Result<usize, Error> {
        let mut size = COLLECTION_HEADER_SIZE;
        for entry in self.iter() {
            size += entry.key().skein_size(context)? + entry.value().skein_size(context)?;
        }
        Ok(size)
    }

    fn skein_is_reference() -> bool {
        true
    }
}

impl<K, V, S> SkeinDefault for DashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn skein_default() -> Self {
        DashMap::default()
    }
}
