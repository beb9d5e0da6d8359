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

//! Fixed-width little-endian primitive codec.
//!
//! [`Writer`] appends into a growable `Vec<u8>`; [`Reader`] walks an
//! immutable byte span and never reads past its end (or past the end of
//! the innermost [`Frame`]): every read is bounds-checked and fails with
//! [`Error::BufferOutOfBound`].

use crate::error::Error;
use byteorder::{ByteOrder, LittleEndian};

macro_rules! impl_write_fixed {
    ($($name:ident: $ty:ty => $size:expr, $bo:ident;)*) => {
        $(
            #[inline(always)]
            pub fn $name(&mut self, value: $ty) {
                LittleEndian::$bo(self.grow($size), value);
            }
        )*
    };
}

macro_rules! impl_write_slice {
    ($($name:ident: $ty:ty => $size:expr, $bo:ident;)*) => {
        $(
            /// Copies the whole slice as one contiguous little-endian block.
            #[inline]
            pub fn $name(&mut self, values: &[$ty]) {
                LittleEndian::$bo(values, self.grow(values.len() * $size));
            }
        )*
    };
}

macro_rules! impl_read_fixed {
    ($($name:ident: $ty:ty => $size:expr, $bo:ident;)*) => {
        $(
            #[inline(always)]
            pub fn $name(&mut self) -> Result<$ty, Error> {
                Ok(LittleEndian::$bo(self.read_bytes($size)?))
            }
        )*
    };
}

macro_rules! impl_read_slice {
    ($($name:ident: $ty:ty => $size:expr, $bo:ident;)*) => {
        $(
            /// Fills `dst` from one contiguous little-endian block.
            #[inline]
            pub fn $name(&mut self, dst: &mut [$ty]) -> Result<(), Error> {
                let src = self.read_bytes(dst.len() * $size)?;
                LittleEndian::$bo(src, dst);
                Ok(())
            }
        )*
    };
}

#[derive(Default, Debug)]
pub struct Writer {
    pub(crate) bf: Vec<u8>,
}

impl Writer {
    pub fn with_capacity(capacity: usize) -> Self {
        Writer {
            bf: Vec::with_capacity(capacity),
        }
    }

    pub fn reset(&mut self) {
        // keep capacity and reset len to 0
        self.bf.clear();
    }

    /// Drops everything written after `len`.
    pub fn truncate(&mut self, len: usize) {
        self.bf.truncate(len);
    }

    pub fn dump(&self) -> Vec<u8> {
        self.bf.clone()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bf
    }

    pub fn len(&self) -> usize {
        self.bf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.bf.capacity()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.bf.reserve(additional);
    }

    #[inline(always)]
    fn grow(&mut self, len: usize) -> &mut [u8] {
        let start = self.bf.len();
        self.bf.resize(start + len, 0);
        &mut self.bf[start..]
    }

    pub fn skip(&mut self, len: usize) {
        self.grow(len);
    }

    /// Overwrites already written bytes, e.g. to back-patch a length.
    pub fn set_bytes(&mut self, offset: usize, data: &[u8]) -> Result<(), Error> {
        let len = self.bf.len();
        match self.bf.get_mut(offset..offset + data.len()) {
            Some(dst) => {
                dst.copy_from_slice(data);
                Ok(())
            }
            None => Err(Error::buffer_out_of_bound(offset, data.len(), len)),
        }
    }

    /// Writes an `i32` placeholder and returns its position for [`Writer::patch_length`].
    pub fn reserve_length(&mut self) -> usize {
        let pos = self.bf.len();
        self.write_i32(0);
        pos
    }

    /// Patches the placeholder at `pos` with the number of bytes written after it.
    pub fn patch_length(&mut self, pos: usize) -> Result<(), Error> {
        let written = self.bf.len().saturating_sub(pos + 4);
        let len = i32::try_from(written)
            .map_err(|_| Error::invalid_data(format!("frame of {written} bytes is too large")))?;
        let mut raw = [0u8; 4];
        LittleEndian::write_i32(&mut raw, len);
        self.set_bytes(pos, &raw)
    }

    pub fn write_bytes(&mut self, v: &[u8]) -> usize {
        self.bf.extend_from_slice(v);
        v.len()
    }

    #[inline(always)]
    pub fn write_u8(&mut self, value: u8) {
        self.bf.push(value);
    }

    #[inline(always)]
    pub fn write_i8(&mut self, value: i8) {
        self.bf.push(value as u8);
    }

    #[inline(always)]
    pub fn write_bool(&mut self, value: bool) {
        self.bf.push(value as u8);
    }

    #[inline(always)]
    pub fn write_char(&mut self, value: char) {
        self.write_u32(value as u32);
    }

    impl_write_fixed! {
        write_u16: u16 => 2, write_u16;
        write_i16: i16 => 2, write_i16;
        write_u32: u32 => 4, write_u32;
        write_i32: i32 => 4, write_i32;
        write_u64: u64 => 8, write_u64;
        write_i64: i64 => 8, write_i64;
        write_u128: u128 => 16, write_u128;
        write_i128: i128 => 16, write_i128;
        write_f32: f32 => 4, write_f32;
        write_f64: f64 => 8, write_f64;
    }

    impl_write_slice! {
        write_u16_slice: u16 => 2, write_u16_into;
        write_i16_slice: i16 => 2, write_i16_into;
        write_u32_slice: u32 => 4, write_u32_into;
        write_i32_slice: i32 => 4, write_i32_into;
        write_u64_slice: u64 => 8, write_u64_into;
        write_i64_slice: i64 => 8, write_i64_into;
        write_u128_slice: u128 => 16, write_u128_into;
        write_i128_slice: i128 => 16, write_i128_into;
        write_f32_slice: f32 => 4, write_f32_into;
        write_f64_slice: f64 => 8, write_f64_into;
    }

    pub fn write_i8_slice(&mut self, values: &[i8]) {
        self.bf.extend(values.iter().map(|v| *v as u8));
    }

    pub fn write_bool_slice(&mut self, values: &[bool]) {
        self.bf.extend(values.iter().map(|v| *v as u8));
    }

    pub fn write_varint32(&mut self, value: i32) {
        let zigzag = ((value << 1) ^ (value >> 31)) as u32;
        self.write_varuint32(zigzag)
    }

    pub fn write_varuint32(&mut self, mut value: u32) {
        while value >= 0x80 {
            self.bf.push((value as u8 & 0x7F) | 0x80);
            value >>= 7;
        }
        self.bf.push(value as u8);
    }

    pub fn write_varint64(&mut self, value: i64) {
        let zigzag = ((value << 1) ^ (value >> 63)) as u64;
        self.write_varuint64(zigzag)
    }

    pub fn write_varuint64(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.bf.push((value as u8 & 0x7F) | 0x80);
            value >>= 7;
        }
        self.bf.push(value as u8);
    }

    pub fn write_utf8_string(&mut self, s: &str) {
        self.bf.extend_from_slice(s.as_bytes());
    }

    /// Writes each UTF-16 code unit of `s` as a little-endian `u16`.
    pub fn write_utf16_string(&mut self, s: &str) {
        self.bf.reserve(s.len() * 2);
        for unit in s.encode_utf16() {
            LittleEndian::write_u16(self.grow(2), unit);
        }
    }
}

/// Encoded size of a zigzag varint32.
pub fn varint32_size(value: i32) -> usize {
    varuint64_size(((value << 1) ^ (value >> 31)) as u32 as u64)
}

pub fn varint64_size(value: i64) -> usize {
    varuint64_size(((value << 1) ^ (value >> 63)) as u64)
}

pub fn varuint64_size(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Saved outer limit, restored by [`Reader::exit_frame`].
#[derive(Debug, Clone, Copy)]
#[must_use]
pub struct Frame {
    end: usize,
    outer_limit: usize,
}

#[derive(Debug, Clone)]
pub struct Reader<'a> {
    bf: &'a [u8],
    cursor: usize,
    limit: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bf: &'a [u8]) -> Reader<'a> {
        Reader {
            bf,
            cursor: 0,
            limit: bf.len(),
        }
    }

    #[inline(always)]
    pub fn get_cursor(&self) -> usize {
        self.cursor
    }

    /// Bytes left before the end of the innermost frame.
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.limit - self.cursor
    }

    #[inline(always)]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.limit
    }

    pub fn slice_after_cursor(&self) -> &'a [u8] {
        &self.bf[self.cursor..self.limit]
    }

    #[inline(always)]
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], Error> {
        if len > self.limit - self.cursor {
            return Err(Error::buffer_out_of_bound(self.cursor, len, self.limit));
        }
        let start = self.cursor;
        self.cursor += len;
        Ok(&self.bf[start..self.cursor])
    }

    pub fn skip(&mut self, len: usize) -> Result<(), Error> {
        self.read_bytes(len).map(|_| ())
    }

    /// Looks at the next `u16` without consuming it.
    pub fn peek_u16(&self) -> Result<u16, Error> {
        if self.limit - self.cursor < 2 {
            return Err(Error::buffer_out_of_bound(self.cursor, 2, self.limit));
        }
        Ok(LittleEndian::read_u16(&self.bf[self.cursor..self.cursor + 2]))
    }

    /// Restricts reads to the next `len` bytes until the frame is exited.
    pub fn enter_frame(&mut self, len: usize) -> Result<Frame, Error> {
        if len > self.limit - self.cursor {
            return Err(Error::buffer_out_of_bound(self.cursor, len, self.limit));
        }
        let frame = Frame {
            end: self.cursor + len,
            outer_limit: self.limit,
        };
        self.limit = frame.end;
        Ok(frame)
    }

    /// Skips whatever the frame still holds and restores the outer limit.
    pub fn exit_frame(&mut self, frame: Frame) {
        self.cursor = frame.end;
        self.limit = frame.outer_limit;
    }

    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        Ok(self.read_bytes(1)?[0])
    }

    #[inline(always)]
    pub fn read_i8(&mut self) -> Result<i8, Error> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_bool(&mut self) -> Result<bool, Error> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            v => Err(Error::invalid_data(format!("invalid bool byte {v}"))),
        }
    }

    pub fn read_char(&mut self) -> Result<char, Error> {
        let raw = self.read_u32()?;
        char::from_u32(raw)
            .ok_or_else(|| Error::invalid_data(format!("invalid char scalar {raw:#x}")))
    }

    impl_read_fixed! {
        read_u16: u16 => 2, read_u16;
        read_i16: i16 => 2, read_i16;
        read_u32: u32 => 4, read_u32;
        read_i32: i32 => 4, read_i32;
        read_u64: u64 => 8, read_u64;
        read_i64: i64 => 8, read_i64;
        read_u128: u128 => 16, read_u128;
        read_i128: i128 => 16, read_i128;
        read_f32: f32 => 4, read_f32;
        read_f64: f64 => 8, read_f64;
    }

    impl_read_slice! {
        read_u16_into: u16 => 2, read_u16_into;
        read_i16_into: i16 => 2, read_i16_into;
        read_u32_into: u32 => 4, read_u32_into;
        read_i32_into: i32 => 4, read_i32_into;
        read_u64_into: u64 => 8, read_u64_into;
        read_i64_into: i64 => 8, read_i64_into;
        read_u128_into: u128 => 16, read_u128_into;
        read_i128_into: i128 => 16, read_i128_into;
        read_f32_into: f32 => 4, read_f32_into;
        read_f64_into: f64 => 8, read_f64_into;
    }

    pub fn read_i8_into(&mut self, dst: &mut [i8]) -> Result<(), Error> {
        let src = self.read_bytes(dst.len())?;
        for (d, s) in dst.iter_mut().zip(src) {
            *d = *s as i8;
        }
        Ok(())
    }

    pub fn read_varuint32(&mut self) -> Result<u32, Error> {
        let mut result = 0u32;
        for i in 0..5 {
            let b = self.read_u8()?;
            result |= ((b & 0x7F) as u32) << (7 * i);
            if b < 0x80 {
                return Ok(result);
            }
        }
        Err(Error::invalid_data("varuint32 longer than 5 bytes"))
    }

    pub fn read_varint32(&mut self) -> Result<i32, Error> {
        let encoded = self.read_varuint32()?;
        Ok(((encoded >> 1) as i32) ^ -((encoded & 1) as i32))
    }

    pub fn read_varuint64(&mut self) -> Result<u64, Error> {
        let mut result = 0u64;
        for i in 0..10 {
            let b = self.read_u8()?;
            result |= ((b & 0x7F) as u64) << (7 * i);
            if b < 0x80 {
                return Ok(result);
            }
        }
        Err(Error::invalid_data("varuint64 longer than 10 bytes"))
    }

    pub fn read_varint64(&mut self) -> Result<i64, Error> {
        let encoded = self.read_varuint64()?;
        Ok(((encoded >> 1) as i64) ^ -((encoded & 1) as i64))
    }

    pub fn read_utf8_string(&mut self, len: usize) -> Result<String, Error> {
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| Error::invalid_data(format!("invalid utf-8 string: {e}")))
    }

    /// Reads `units` little-endian UTF-16 code units.
    pub fn read_utf16_string(&mut self, units: usize) -> Result<String, Error> {
        let bytes = self.read_bytes(units * 2)?;
        let mut buf = vec![0u16; units];
        LittleEndian::read_u16_into(bytes, &mut buf);
        String::from_utf16(&buf).map_err(|e| Error::invalid_data(format!("invalid utf-16 string: {e}")))
    }
}
