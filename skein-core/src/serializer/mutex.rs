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

//! `Mutex<T>` encodes as `T`, locking for the duration of the call.
//!
//! A poisoned lock is still used: the engine only reads or overwrites the
//! value and has no invariant of its own that a panicking holder could
//! have broken.

use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::{SkeinDefault, Serializer};
use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: Serializer> Serializer for Mutex<T> {
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        lock(self).skein_write(context)
    }

    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        Ok(Mutex::new(T::skein_read(context)?))
    }

    fn skein_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
        self.get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .skein_read_into(context)
    }

    fn skein_size(&self, context: &mut WriteContext) -> Result<usize, Error> {
        lock(self).skein_size(context)
    }

    fn skein_is_reference() -> bool {
        T::skein_is_reference()
    }

    fn skein_merge_shared(&self, context: &mut ReadContext) -> Result<bool, Error> {
        lock(self).skein_read_into(context)?;
        Ok(true)
    }
}

impl<T: SkeinDefault> SkeinDefault for Mutex<T> {
    fn skein_default() -> Self {
        Mutex::new(T::skein_default())
    }
}
