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

/// Transparent: a box encodes like what it holds and merges in place, so
/// the heap allocation survives a merge.
impl<T: Serializer> Serializer for Box<T> {
    #[inline(always)]
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        T::skein_write(self.as_ref(), context)
    }

    #[inline(always)]
    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        Ok(Box::new(T::skein_read(context)?))
    }

    #[inline(always)]
    fn skein_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
        T::skein_read_into(self.as_mut(), context)
    }

    #[inline(always)]
    fn skein_size(&self, context: &mut WriteContext) -> Result<usize, Error> {
        T::skein_size(self.as_ref(), context)
    }

    #[inline(always)]
    fn skein_is_reference() -> bool {
        T::skein_is_reference()
    }
}

impl<T: SkeinDefault> SkeinDefault for Box<T> {
    fn skein_default() -> Self {
        Box::new(T::skein_default())
    }
}
