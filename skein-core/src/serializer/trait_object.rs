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

//! Values whose concrete type is only known at run time.
//!
//! They are always written as `[u16 id][payload]` with the id of the
//! most-derived registered type, whatever kind it is. Decoding looks the id
//! up in the registry's id table and refuses any type that is not
//! assignable to the requested interface.

use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::util::unexpected_marker;
use crate::serializer::{SkeinDefault, Serializer};
use crate::types::FIRST_TYPE_ID;
use std::any::Any;

/// Writes the id of `value`'s runtime type followed by its payload.
///
/// With `expected` set, the runtime type must implement that interface.
pub fn write_polymorphic(
    value: &dyn Any,
    expected: Option<&str>,
    context: &mut WriteContext,
) -> Result<(), Error> {
    let registry = context.registry();
    let info = registry.get(value.type_id()).ok_or_else(|| {
        Error::not_allowed("dynamically typed value of an unregistered type; register it first")
    })?;
    if let Some(expected) = expected {
        if !registry.is_assignable(info, expected) {
            return Err(Error::not_allowed(format!(
                "`{}` is not registered as an implementor of `{expected}`",
                info.get_type_name()
            )));
        }
    }
    context.writer.write_u16(info.get_type_id());
    (info.get_harness().get_write_fn())(value, context)
}

/// Reads an id and the payload of the type it denotes.
pub fn read_polymorphic<T: 'static>(
    expected: Option<&str>,
    context: &mut ReadContext,
) -> Result<Box<dyn Any>, Error> {
    let offset = context.reader.get_cursor();
    let id = context.reader.read_u16()?;
    if id < FIRST_TYPE_ID {
        return Err(unexpected_marker::<T>(id, offset));
    }
    let registry = context.registry();
    let info = registry.decode_info(id)?;
    if let Some(expected) = expected {
        if !registry.is_assignable(info, expected) {
            return Err(Error::type_mismatch(
                expected.to_string(),
                info.get_type_name().to_string(),
            ));
        }
    }
    (info.get_harness().get_read_fn())(context)
}

/// Merges in place when the stream holds the same concrete type as
/// `current`. Returns `false`, with nothing consumed, otherwise.
pub fn merge_polymorphic(
    current: &mut dyn Any,
    expected: Option<&str>,
    context: &mut ReadContext,
) -> Result<bool, Error> {
    let id = context.reader.peek_u16()?;
    let registry = context.registry();
    let Some(info) = registry.get_by_id(id) else {
        return Ok(false);
    };
    if info.get_rust_type() != (*current).type_id() {
        return Ok(false);
    }
    if expected.is_some_and(|expected| !registry.is_assignable(info, expected)) {
        return Ok(false);
    }
    context.reader.skip(2)?;
    (info.get_harness().get_merge_fn())(current, context)?;
    Ok(true)
}

pub fn polymorphic_size(
    value: &dyn Any,
    context: &mut WriteContext,
) -> Result<usize, Error> {
    let info = context.registry().get(value.type_id()).ok_or_else(|| {
        Error::not_allowed("dynamically typed value of an unregistered type; register it first")
    })?;
    Ok(2 + (info.get_harness().get_size_fn())(value, context)?)
}

/// Any registered object. Heterogeneous collections are spelled
/// `Vec<Box<dyn Any>>`; every element carries its own id, and elements of
/// unregistered types are rejected.
impl Serializer for Box<dyn Any> {
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_polymorphic(&**self, None, context)
    }

    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        read_polymorphic::<Self>(None, context)
    }

    fn skein_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
        if merge_polymorphic(&mut **self, None, context)? {
            return Ok(());
        }
        *self = read_polymorphic::<Self>(None, context)?;
        Ok(())
    }

    fn skein_size(&self, context: &mut WriteContext) -> Result<usize, Error> {
        polymorphic_size(&**self, context)
    }

    fn skein_is_reference() -> bool {
        true
    }
}

/// A unit placeholder; encoding it fails until it is replaced.
impl SkeinDefault for Box<dyn Any> {
    fn skein_default() -> Self {
        Box::new(())
    }
}

/// Generates [`Serializer`](crate::serializer::Serializer) for
/// `Box<dyn Trait>` over a closed list of implementors.
///
/// The trait must have [`AsAny`](crate::serializer::AsAny) as a supertrait,
/// be registered with `SkeinBuilder::register_interface::<dyn Trait>()`,
/// and every implementor must declare it through
/// `ObjectDescriptor::implements::<dyn Trait>()`. The default value is the
/// default of the first implementor listed.
///
/// ```
/// use skein_core::serializer::object::{Field, Object, ObjectDescriptor};
/// use skein_core::serializer::AsAny;
/// use skein_core::{impl_object, register_trait_type};
///
/// pub trait Shape: AsAny {
///     fn area(&self) -> f64;
/// }
///
/// #[derive(Default)]
/// pub struct Circle {
///     r: f64,
/// }
///
/// impl Shape for Circle {
///     fn area(&self) -> f64 {
///         3.14 * self.r * self.r
///     }
/// }
///
/// impl Object for Circle {
///     fn describe() -> ObjectDescriptor<Self> {
///         ObjectDescriptor::new()
///             .implements::<dyn Shape>()
///             .field(Field::new("r", |c: &Circle| &c.r, |c: &mut Circle| &mut c.r))
///     }
/// }
///
/// impl_object!(Circle);
/// register_trait_type!(Shape, Circle);
/// ```
#[macro_export]
macro_rules! register_trait_type {
    (@first $first:ty $(, $rest:ty)*) => {
        Box::new(<$first as ::core::default::Default>::default())
    };

    ($trait_name:ident, $($impl_type:ty),+ $(,)?) => {
        impl $crate::serializer::SkeinDefault for Box<dyn $trait_name> {
            fn skein_default() -> Self {
                $crate::register_trait_type!(@first $($impl_type),+)
            }
        }

        impl $crate::serializer::Serializer for Box<dyn $trait_name> {
            fn skein_write(
                &self,
                context: &mut $crate::resolver::context::WriteContext,
            ) -> Result<(), $crate::error::Error> {
                let expected = context.registry().interface_name::<dyn $trait_name>()?;
                $crate::serializer::trait_object::write_polymorphic(
                    $crate::serializer::AsAny::as_any(&**self),
                    Some(expected),
                    context,
                )
            }

            fn skein_read(
                context: &mut $crate::resolver::context::ReadContext,
            ) -> Result<Self, $crate::error::Error> {
                let expected = context.registry().interface_name::<dyn $trait_name>()?;
                let mut any = $crate::serializer::trait_object::read_polymorphic::<Self>(
                    Some(expected),
                    context,
                )?;
                $(
                    any = match any.downcast::<$impl_type>() {
                        Ok(value) => return Ok(value as Box<dyn $trait_name>),
                        Err(other) => other,
                    };
                )+
                drop(any);
                Err($crate::error::Error::type_mismatch(
                    expected.to_string(),
                    "an implementor missing from register_trait_type!",
                ))
            }

            fn skein_read_into(
                &mut self,
                context: &mut $crate::resolver::context::ReadContext,
            ) -> Result<(), $crate::error::Error> {
                let expected = context.registry().interface_name::<dyn $trait_name>()?;
                let merged = $crate::serializer::trait_object::merge_polymorphic(
                    $crate::serializer::AsAny::as_any_mut(&mut **self),
                    Some(expected),
                    context,
                )?;
                if !merged {
                    *self = <Self as $crate::serializer::Serializer>::skein_read(context)?;
                }
                Ok(())
            }

            fn skein_size(
                &self,
                context: &mut $crate::resolver::context::WriteContext,
            ) -> Result<usize, $crate::error::Error> {
                $crate::serializer::trait_object::polymorphic_size(
                    $crate::serializer::AsAny::as_any(&**self),
                    context,
                )
            }

            fn skein_is_reference() -> bool {
                true
            }
        }
    };
}
