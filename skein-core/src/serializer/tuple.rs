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

//! Tuples are value types: their elements follow each other with no
//! header, and merging merges each element in place.

use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::{SkeinDefault, Serializer};

macro_rules! impl_tuple {
    ($($name:ident: $idx:tt),+) => {
        impl<$($name: Serializer),+> Serializer for ($($name,)+) {
            #[inline(always)]
            fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
                $(self.$idx.skein_write(context)?;)+
                Ok(())
            }

            #[inline(always)]
            fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
                Ok(($($name::skein_read(context)?,)+))
            }

            #[inline(always)]
            fn skein_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
                $(self.$idx.skein_read_into(context)?;)+
                Ok(())
            }

            #[inline(always)]
            fn skein_size(&self, context: &mut WriteContext) -> Result<usize, Error> {
                Ok(0 $(+ self.$idx.skein_size(context)?)+)
            }
        }

        impl<$($name: SkeinDefault),+> SkeinDefault for ($($name,)+) {
            #[inline(always)]
            fn skein_default() -> Self {
                ($($name::skein_default(),)+)
            }
        }
    };
}

impl_tuple!(T0: 0);
impl_tuple!(T0: 0, T1: 1);
impl_tuple!(T0: 0, T1: 1, T2: 2);
impl_tuple!(T0: 0, T1: 1, T2: 2, T3: 3);
impl_tuple!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4);
impl_tuple!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5);
impl_tuple!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5, T6: 6);
impl_tuple!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5, T6: 6, T7: 7);
