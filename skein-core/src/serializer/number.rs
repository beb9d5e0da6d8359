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

//! Numeric primitives.
//!
//! A scalar is written at its natural width, little-endian. With
//! `compress_int`, scalar `i32`/`i64` use zigzag varints and `u32`/`u64`
//! plain varints. Inside collections every number is written as one
//! contiguous fixed-width block regardless of that switch.

use crate::buffer::{varint32_size, varint64_size, varuint64_size};
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::{SkeinDefault, Serializer};
use paste::paste;
use std::mem;

/// Fails before allocating when `len` elements of `T` cannot fit in what is left.
#[inline(always)]
pub(super) fn check_block<T>(len: usize, context: &ReadContext) -> Result<usize, Error> {
    let remaining = context.reader.remaining();
    match len.checked_mul(mem::size_of::<T>()) {
        Some(bytes) if bytes <= remaining => Ok(bytes),
        _ => Err(Error::buffer_out_of_bound(
            context.reader.get_cursor(),
            len.saturating_mul(mem::size_of::<T>()),
            context.reader.get_cursor() + remaining,
        )),
    }
}

macro_rules! impl_bulk {
    ($ty:ident) => {
        paste! {
            #[inline]
            fn skein_write_slice(items: &[Self], context: &mut WriteContext) -> Result<(), Error> {
                context.writer.[<write_ $ty _slice>](items);
                Ok(())
            }

            #[inline]
            fn skein_read_vec(len: usize, context: &mut ReadContext) -> Result<Vec<Self>, Error> {
                check_block::<$ty>(len, context)?;
                let mut items = vec![<$ty as SkeinDefault>::skein_default(); len];
                context.reader.[<read_ $ty _into>](&mut items)?;
                Ok(items)
            }

            #[inline]
            fn skein_merge_slice(items: &mut [Self], context: &mut ReadContext) -> Result<(), Error> {
                context.reader.[<read_ $ty _into>](items)
            }
        }

        #[inline]
        fn skein_size_slice(items: &[Self], _: &mut WriteContext) -> Result<usize, Error> {
            Ok(items.len() * mem::size_of::<$ty>())
        }
    };
}

macro_rules! impl_fixed_num {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Serializer for $ty {
                paste! {
                    #[inline(always)]
                    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
                        context.writer.[<write_ $ty>](*self);
                        Ok(())
                    }

                    #[inline(always)]
                    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
                        context.reader.[<read_ $ty>]()
                    }
                }

                #[inline(always)]
                fn skein_size(&self, _: &mut WriteContext) -> Result<usize, Error> {
                    Ok(mem::size_of::<$ty>())
                }

                impl_bulk!($ty);
            }

            impl SkeinDefault for $ty {
                #[inline(always)]
                fn skein_default() -> Self {
                    0 as $ty
                }
            }
        )*
    };
}

/// `$var` names the varint codec: `write_$var`, `read_$var`.
macro_rules! impl_compressible_num {
    ($($ty:ident => $var:ident, $var_size:expr;)*) => {
        $(
            impl Serializer for $ty {
                paste! {
                    #[inline(always)]
                    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
                        if context.is_compress_int() {
                            context.writer.[<write_ $var>](*self);
                        } else {
                            context.writer.[<write_ $ty>](*self);
                        }
                        Ok(())
                    }

                    #[inline(always)]
                    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
                        if context.is_compress_int() {
                            context.reader.[<read_ $var>]()
                        } else {
                            context.reader.[<read_ $ty>]()
                        }
                    }
                }

                #[inline(always)]
                fn skein_size(&self, context: &mut WriteContext) -> Result<usize, Error> {
                    if context.is_compress_int() {
                        Ok(($var_size)(*self))
                    } else {
                        Ok(mem::size_of::<$ty>())
                    }
                }

                impl_bulk!($ty);
            }

            impl SkeinDefault for $ty {
                #[inline(always)]
                fn skein_default() -> Self {
                    0
                }
            }
        )*
    };
}

impl_fixed_num!(i16, u16, i128, u128, f32, f64);

impl_compressible_num! {
    i32 => varint32, varint32_size;
    u32 => varuint32, |v: u32| varuint64_size(v as u64);
    i64 => varint64, varint64_size;
    u64 => varuint64, varuint64_size;
}

impl Serializer for i8 {
    #[inline(always)]
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_i8(*self);
        Ok(())
    }

    #[inline(always)]
    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        context.reader.read_i8()
    }

    #[inline(always)]
    fn skein_size(&self, _: &mut WriteContext) -> Result<usize, Error> {
        Ok(1)
    }

    impl_bulk!(i8);
}

impl SkeinDefault for i8 {
    #[inline(always)]
    fn skein_default() -> Self {
        0
    }
}

impl Serializer for u8 {
    #[inline(always)]
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_u8(*self);
        Ok(())
    }

    #[inline(always)]
    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        context.reader.read_u8()
    }

    #[inline(always)]
    fn skein_size(&self, _: &mut WriteContext) -> Result<usize, Error> {
        Ok(1)
    }

    #[inline]
    fn skein_write_slice(items: &[Self], context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_bytes(items);
        Ok(())
    }

    #[inline]
    fn skein_read_vec(len: usize, context: &mut ReadContext) -> Result<Vec<Self>, Error> {
        Ok(context.reader.read_bytes(len)?.to_vec())
    }

    #[inline]
    fn skein_merge_slice(items: &mut [Self], context: &mut ReadContext) -> Result<(), Error> {
        items.copy_from_slice(context.reader.read_bytes(items.len())?);
        Ok(())
    }

    #[inline]
    fn skein_size_slice(items: &[Self], _: &mut WriteContext) -> Result<usize, Error> {
        Ok(items.len())
    }
}

impl SkeinDefault for u8 {
    #[inline(always)]
    fn skein_default() -> Self {
        0
    }
}
