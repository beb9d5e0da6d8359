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

//! Custom codecs.
//!
//! A [`Formatter`] takes over the complete encoding of a value, including
//! everything nested inside it. Bind one to a single member with
//! [`Field::with_formatter`](crate::serializer::object::Field::with_formatter),
//! or to every use of a type with [`impl_formatted!`].

use crate::buffer::Writer;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use once_cell::sync::Lazy;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

pub trait Formatter<T>: Default + Send + Sync + 'static {
    fn write(&self, value: &T, context: &mut WriteContext) -> Result<(), Error>;

    fn read(&self, context: &mut ReadContext) -> Result<T, Error>;

    /// Decodes onto `value`. The default replaces it.
    fn read_into(&self, value: &mut T, context: &mut ReadContext) -> Result<(), Error> {
        *value = self.read(context)?;
        Ok(())
    }

    /// Encoded length of `value`. The default encodes into a scratch buffer.
    fn size(&self, value: &T, context: &mut WriteContext) -> Result<usize, Error> {
        let mut scratch = Writer::default();
        {
            let mut scratch_context = context.scratch(&mut scratch);
            self.write(value, &mut scratch_context)?;
        }
        Ok(scratch.len())
    }
}

type Instances = HashMap<TypeId, &'static (dyn Any + Send + Sync)>;

static INSTANCES: Lazy<RwLock<Instances>> = Lazy::new(|| RwLock::new(HashMap::new()));

/// Process-wide instance of the formatter `F`, created on first use.
pub fn instance<F: Default + Send + Sync + 'static>() -> &'static F {
    let key = TypeId::of::<F>();
    let cached = INSTANCES
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
        .copied();
    if let Some(found) = cached.and_then(|any| any.downcast_ref::<F>()) {
        return found;
    }
    let mut instances = INSTANCES.write().unwrap_or_else(PoisonError::into_inner);
    let any: &'static (dyn Any + Send + Sync) = *instances
        .entry(key)
        .or_insert_with(|| Box::leak(Box::new(F::default())));
    match any.downcast_ref::<F>() {
        Some(found) => found,
        // the map is keyed by `TypeId`, so this arm is never taken
        None => Box::leak(Box::new(F::default())),
    }
}

/// Routes every encode and decode of a type through a [`Formatter`].
///
/// ```
/// use skein_core::error::Error;
/// use skein_core::impl_formatted;
/// use skein_core::resolver::context::{ReadContext, WriteContext};
/// use skein_core::serializer::formatter::Formatter;
///
/// #[derive(Default, Debug, PartialEq)]
/// pub struct Rgb(u8, u8, u8);
///
/// #[derive(Default)]
/// pub struct RgbFormatter;
///
/// impl Formatter<Rgb> for RgbFormatter {
///     fn write(&self, value: &Rgb, context: &mut WriteContext) -> Result<(), Error> {
///         context.writer.write_bytes(&[value.0, value.1, value.2]);
///         Ok(())
///     }
///
///     fn read(&self, context: &mut ReadContext) -> Result<Rgb, Error> {
///         let raw = context.reader.read_bytes(3)?;
///         Ok(Rgb(raw[0], raw[1], raw[2]))
///     }
///
///     fn size(&self, _: &Rgb, _: &mut WriteContext) -> Result<usize, Error> {
///         Ok(3)
///     }
/// }
///
/// impl_formatted!(Rgb => RgbFormatter);
/// ```
#[macro_export]
macro_rules! impl_formatted {
    ($ty:ty => $fmt:ty) => {
        impl $crate::serializer::SkeinDefault for $ty {
            fn skein_default() -> Self {
                <$ty as ::core::default::Default>::default()
            }
        }

        impl $crate::serializer::Serializer for $ty {
            fn skein_write(
                &self,
                context: &mut $crate::resolver::context::WriteContext,
            ) -> Result<(), $crate::error::Error> {
                let fmt = $crate::serializer::formatter::instance::<$fmt>();
                <$fmt as $crate::serializer::formatter::Formatter<$ty>>::write(fmt, self, context)
            }

            fn skein_read(
                context: &mut $crate::resolver::context::ReadContext,
            ) -> Result<Self, $crate::error::Error> {
                let fmt = $crate::serializer::formatter::instance::<$fmt>();
                <$fmt as $crate::serializer::formatter::Formatter<$ty>>::read(fmt, context)
            }

            fn skein_read_into(
                &mut self,
                context: &mut $crate::resolver::context::ReadContext,
            ) -> Result<(), $crate::error::Error> {
                let fmt = $crate::serializer::formatter::instance::<$fmt>();
                <$fmt as $crate::serializer::formatter::Formatter<$ty>>::read_into(fmt, self, context)
            }

            fn skein_size(
                &self,
                context: &mut $crate::resolver::context::WriteContext,
            ) -> Result<usize, $crate::error::Error> {
                let fmt = $crate::serializer::formatter::instance::<$fmt>();
                <$fmt as $crate::serializer::formatter::Formatter<$ty>>::size(fmt, self, context)
            }
        }
    };
}
