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
use std::collections::BinaryHeap;

/// Written in the heap's internal order; the receiving heap re-establishes
/// its own ordering as elements are pushed.
impl<T: Serializer + Ord> Serializer for BinaryHeap<T> {
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_collection_header(self.len(), context)?;
        T::skein_write_slice(self.as_slice(), context)
    }

    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        let len = read_collection_header::<Self>(context)?;
        Ok(BinaryHeap::from(T::skein_read_vec(len, context)?))
    }

    fn skein_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
        let len = read_collection_header::<Self>(context)?;
        self.clear();
        let items = T::skein_read_vec(len, context)?;
        self.extend(items);
        Ok(())
    }

    fn skein_size(&self, context: &mut WriteContext) -> Result<usize, Error> {
        Ok(COLLECTION_HEADER_SIZE + T::skein_size_slice(self.as_slice(), context)?)
    }

    fn skein_is_reference() -> bool {
        true
    }
}

impl<T: Ord> SkeinDefault for BinaryHeap<T> {
    fn skein_default() -> Self {
        BinaryHeap::new()
    }
}
