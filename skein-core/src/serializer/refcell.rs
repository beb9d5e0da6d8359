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

//! `RefCell<T>` encodes as `T`. It is what lets a value behind a shared
//! `Rc` be merged in place.

use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::{SkeinDefault, Serializer};
use std::cell::{Ref, RefCell, RefMut};

fn borrow<T>(cell: &RefCell<T>) -> Result<Ref<'_, T>, Error> {
    cell.try_borrow()
        .map_err(|_| Error::not_allowed("cannot encode a RefCell that is mutably borrowed"))
}

fn borrow_mut<T>(cell: &RefCell<T>) -> Result<RefMut<'_, T>, Error> {
    cell.try_borrow_mut()
        .map_err(|_| Error::not_allowed("cannot merge into a RefCell that is already borrowed"))
}

impl<T: Serializer> Serializer for RefCell<T> {
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        borrow(self)?.skein_write(context)
    }

    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        Ok(RefCell::new(T::skein_read(context)?))
    }

    fn skein_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
        self.get_mut().skein_read_into(context)
    }

    fn skein_size(&self, context: &mut WriteContext) -> Result<usize, Error> {
        borrow(self)?.skein_size(context)
    }

    fn skein_is_reference() -> bool {
        T::skein_is_reference()
    }

    fn skein_merge_shared(&self, context: &mut ReadContext) -> Result<bool, Error> {
        borrow_mut(self)?.skein_read_into(context)?;
        Ok(true)
    }
}

impl<T: SkeinDefault> SkeinDefault for RefCell<T> {
    fn skein_default() -> Self {
        RefCell::new(T::skein_default())
    }
}
