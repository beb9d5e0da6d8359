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
use std::sync::Arc;

/// Same rules as `Rc<T>`; `Arc<Mutex<T>>` merges through the lock.
impl<T: Serializer> Serializer for Arc<T> {
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        T::skein_write(self.as_ref(), context)
    }

    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        Ok(Arc::new(T::skein_read(context)?))
    }

    fn skein_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
        if let Some(inner) = Arc::get_mut(self) {
            return inner.skein_read_into(context);
        }
        if T::skein_merge_shared(self.as_ref(), context)? {
            return Ok(());
        }
        *self = Arc::new(T::skein_read(context)?);
        Ok(())
    }

    fn skein_size(&self, context: &mut WriteContext) -> Result<usize, Error> {
        T::skein_size(self.as_ref(), context)
    }

    fn skein_is_reference() -> bool {
        T::skein_is_reference()
    }

    fn skein_merge_shared(&self, context: &mut ReadContext) -> Result<bool, Error> {
        T::skein_merge_shared(self.as_ref(), context)
    }
}

impl<T: SkeinDefault> SkeinDefault for Arc<T> {
    fn skein_default() -> Self {
        Arc::new(T::skein_default())
    }
}
