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
use std::rc::Rc;

/// Shared handles carry no reference tracking: every handle encodes the
/// full value it points to.
///
/// Merging goes through the pointee when that is possible without
/// breaking other owners: directly when this is the only handle, or
/// through interior mutability (`Rc<RefCell<T>>`). Otherwise the handle is
/// replaced and other owners keep the old value.
impl<T: Serializer> Serializer for Rc<T> {
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        T::skein_write(self.as_ref(), context)
    }

    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        Ok(Rc::new(T::skein_read(context)?))
    }

    fn skein_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
        if let Some(inner) = Rc::get_mut(self) {
            return inner.skein_read_into(context);
        }
        if T::skein_merge_shared(self.as_ref(), context)? {
            return Ok(());
        }
        *self = Rc::new(T::skein_read(context)?);
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

impl<T: SkeinDefault> SkeinDefault for Rc<T> {
    fn skein_default() -> Self {
        Rc::new(T::skein_default())
    }
}
