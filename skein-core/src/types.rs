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

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Reserved ids written in front of a value to describe its shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum Sentinel {
    Null = 0,
    String = 1,
    Collection = 2,
    Nullable = 3,
}

pub const NULL: u16 = Sentinel::Null as u16;
pub const STRING: u16 = Sentinel::String as u16;
pub const COLLECTION: u16 = Sentinel::Collection as u16;
pub const NULLABLE: u16 = Sentinel::Nullable as u16;

/// Smallest id a user type can be assigned.
pub const FIRST_TYPE_ID: u16 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    /// Value type: written without an id header and never null.
    Struct,
    /// Reference type: written behind its id and may be null.
    Class,
    Interface,
    Collection,
    Nullable,
    Tuple,
}

impl TypeKind {
    /// Whether values of this kind carry a `[u16 id]` header on the wire.
    #[inline(always)]
    pub fn has_id_header(self) -> bool {
        matches!(self, TypeKind::Class | TypeKind::Interface)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Visibility {
    Private,
    Crate,
    #[default]
    Public,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StringEncoding {
    #[default]
    Utf16,
    Utf8,
}

/// Canonical spelling of a type name.
///
/// Whitespace, a leading `::`, `dyn`/`mut`/`const` keywords, reference
/// lifetimes and auto-trait bounds (`+ Send`) are dropped, so `std::any::type_name` output and hand-written
/// names of the same type agree.
///
/// ```
/// use skein_core::types::normalize_type_name;
///
/// assert_eq!(
///     normalize_type_name("alloc::boxed::Box<dyn zoo::Animal + core::marker::Send>"),
///     "alloc::boxed::Box<zoo::Animal>"
/// );
/// ```
pub fn normalize_type_name(name: &str) -> String {
    let name = name.trim();
    let name = name.strip_prefix("::").unwrap_or(name);
    let bytes = name.as_bytes();
    let mut out = String::with_capacity(name.len());
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        let at_word = i == 0 || !is_ident_byte(bytes[i - 1]);
        if at_word {
            if let Some(kw) = ["dyn ", "mut ", "const "]
                .iter()
                .find(|kw| name[i..].starts_with(**kw))
            {
                i += kw.len();
                continue;
            }
        }
        match c {
            b'\'' if out.ends_with('&') => {
                // drop the lifetime of a reference
                i += 1;
                while i < bytes.len() && is_ident_byte(bytes[i]) {
                    i += 1;
                }
            }
            b'+' => {
                // skip a trait bound up to the end of the enclosing argument
                let mut depth = 0i32;
                while i < bytes.len() {
                    match bytes[i] {
                        b'<' | b'(' | b'[' => depth += 1,
                        b'>' | b')' | b']' if depth == 0 => break,
                        b'>' | b')' | b']' => depth -= 1,
                        b',' | b';' if depth == 0 => break,
                        _ => {}
                    }
                    i += 1;
                }
            }
            c if c.is_ascii_whitespace() => i += 1,
            _ => {
                let ch_len = name[i..].chars().next().map_or(1, char::len_utf8);
                out.push_str(&name[i..i + ch_len]);
                i += ch_len;
            }
        }
    }
    out
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Two interleaved djb2 lanes over the UTF-16 units of `s`.
///
/// Stable across processes and builds, unlike `std::hash`.
pub fn name_hash(s: &str) -> i32 {
    let mut hash1: i32 = 5381;
    let mut hash2: i32 = hash1;
    let units: Vec<u16> = s.encode_utf16().collect();
    for pair in units.chunks(2) {
        hash1 = (hash1 << 5).wrapping_add(hash1) ^ pair[0] as i32;
        match pair.get(1) {
            Some(&c) => hash2 = (hash2 << 5).wrapping_add(hash2) ^ c as i32,
            None => break,
        }
    }
    hash1.wrapping_add(hash2.wrapping_mul(1566083941))
}

/// Wire id of a type, derived from its normalized fully-qualified name.
///
/// The 32-bit hash is folded to 16 bits. Results that land on a sentinel
/// are moved past them, so user ids never alias `Null`/`String`/
/// `Collection`/`Nullable`.
pub fn type_id_of(name: &str) -> u16 {
    let hash = name_hash(&normalize_type_name(name)) as u32;
    let folded = ((hash >> 16) ^ (hash & 0xFFFF)) as u16;
    if folded < FIRST_TYPE_ID {
        folded + FIRST_TYPE_ID
    } else {
        folded
    }
}
