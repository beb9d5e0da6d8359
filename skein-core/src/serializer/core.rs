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
use std::any::Any;

/// Value used for freshly decoded containers and for members a permissive
/// stream leaves out.
pub trait SkeinDefault: Sized {
    fn skein_default() -> Self;
}

// No blanket impl over `T: Default`: it would conflict with the impls for
// `Box<dyn Trait>` generated by `register_trait_type!`.

pub trait Serializer: SkeinDefault + 'static {
    /// Writes the complete encoding of `self`, including its header if the
    /// type has one.
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error>;

    /// Decodes a new value.
    fn skein_read(context: &mut ReadContext) -> Result<Self, Error>;

    /// Decodes onto an existing value.
    ///
    /// Implementations reuse whatever they can (elements at surviving
    /// indices, map values under surviving keys, objects behind non-null
    /// references) and only construct what is new. The default replaces
    /// `self` wholesale, which is all a plain value needs.
    #[inline(always)]
    fn skein_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
        *self = Self::skein_read(context)?;
        Ok(())
    }

    /// Exact number of bytes [`Serializer::skein_write`] would produce.
    fn skein_size(&self, context: &mut WriteContext) -> Result<usize, Error>;

    /// Whether the encoding always starts with a non-null `u16` header, so
    /// `Option<Self>` can use the header itself as the presence marker.
    #[inline(always)]
    fn skein_is_reference() -> bool {
        false
    }

    /// Merges through a shared handle (`Rc<Self>` with other owners).
    ///
    /// Returns `Ok(false)` without consuming input when the type has no
    /// interior mutability; the caller then replaces the handle instead.
    #[inline(always)]
    fn skein_merge_shared(&self, context: &mut ReadContext) -> Result<bool, Error> {
        let _ = context;
        Ok(false)
    }

    /// Writes the elements of a collection. Fixed-size primitives override
    /// this with a single block copy.
    #[inline]
    fn skein_write_slice(items: &[Self], context: &mut WriteContext) -> Result<(), Error> {
        for item in items {
            item.skein_write(context)?;
        }
        Ok(())
    }

    /// Reads `len` collection elements.
    #[inline]
    fn skein_read_vec(len: usize, context: &mut ReadContext) -> Result<Vec<Self>, Error> {
        // `len` is bounded by the bytes left, see `read_collection_header`
        let mut items = Vec::with_capacity(len.min(context.reader.remaining()));
        for _ in 0..len {
            items.push(Self::skein_read(context)?);
        }
        Ok(items)
    }

    /// Merges `items.len()` collection elements in place.
    #[inline]
    fn skein_merge_slice(items: &mut [Self], context: &mut ReadContext) -> Result<(), Error> {
        for item in items {
            item.skein_read_into(context)?;
        }
        Ok(())
    }

    #[inline]
    fn skein_size_slice(items: &[Self], context: &mut WriteContext) -> Result<usize, Error> {
        let mut size = 0;
        for item in items {
            size += item.skein_size(context)?;
        }
        Ok(size)
    }
}

/// Upcast helper required by every trait used behind `register_trait_type!`.
///
/// ```
/// use skein_core::serializer::AsAny;
///
/// trait Shape: AsAny {}
/// ```
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    #[inline(always)]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline(always)]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
