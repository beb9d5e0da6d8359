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

//! Structural view of a normalized type name, used by the graph builder to
//! walk generic arguments and element types.

use crate::error::Error;
use crate::types::{normalize_type_name, TypeKind};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeExpr {
    /// `a::b::C<Args..>`
    Path { head: String, args: Vec<TypeExpr> },
    /// `[T; N]`, or `[T]` when `len` is `None`.
    Array { elem: Box<TypeExpr>, len: Option<usize> },
    Tuple(Vec<TypeExpr>),
    /// `&T` or `*T`.
    Ref(Box<TypeExpr>),
    /// `fn(..) -> ..` or `Fn(..)`-style sugar.
    Callable(String),
}

/// How the engine treats a builtin name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    Primitive,
    Collection,
    Nullable,
    /// Smart pointers and cells that encode exactly like their content.
    Transparent,
}

const PRIMITIVES: &[&str] = &[
    "bool", "char", "i8", "i16", "i32", "i64", "i128", "u8", "u16", "u32", "u64", "u128",
    "f32", "f64", "String", "Decimal", "NaiveDate", "NaiveDateTime", "NaiveTime",
];

const COLLECTIONS: &[&str] = &[
    "Vec",
    "VecDeque",
    "LinkedList",
    "HashMap",
    "BTreeMap",
    "HashSet",
    "BTreeSet",
    "BinaryHeap",
    "DashMap",
    "DashSet",
    "MdArray",
];

const TRANSPARENT: &[&str] = &["Box", "Rc", "Arc", "RefCell", "Mutex"];

const TASK_HANDLES: &[&str] = &["JoinHandle", "Future", "Pin", "Waker", "Sender", "Receiver"];

impl TypeExpr {
    pub fn parse(name: &str) -> Result<TypeExpr, Error> {
        let normalized = normalize_type_name(name);
        let mut parser = Parser {
            src: normalized.as_bytes(),
            pos: 0,
        };
        let expr = parser.parse_type()?;
        if parser.pos != parser.src.len() {
            return Err(Error::build(format!(
                "unexpected `{}` in type name `{normalized}`",
                &normalized[parser.pos..]
            )));
        }
        Ok(expr)
    }

    /// Last path segment without generic arguments, e.g. `Vec` for `alloc::vec::Vec<i32>`.
    pub fn short_name(&self) -> Option<&str> {
        match self {
            TypeExpr::Path { head, .. } => head.rsplit("::").next(),
            _ => None,
        }
    }

    pub fn builtin(&self) -> Option<Builtin> {
        match self {
            TypeExpr::Array { .. } => Some(Builtin::Collection),
            TypeExpr::Path { .. } => {
                let short = self.short_name()?;
                if short == "Option" {
                    Some(Builtin::Nullable)
                } else if PRIMITIVES.contains(&short) || short.starts_with("DateTime") {
                    Some(Builtin::Primitive)
                } else if COLLECTIONS.contains(&short) {
                    Some(Builtin::Collection)
                } else if TRANSPARENT.contains(&short) {
                    Some(Builtin::Transparent)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Kind of a builtin or composite expression; `None` for user types.
    pub fn kind(&self) -> Option<TypeKind> {
        match self {
            TypeExpr::Tuple(_) => Some(TypeKind::Tuple),
            _ => match self.builtin()? {
                Builtin::Primitive => Some(TypeKind::Primitive),
                Builtin::Collection => Some(TypeKind::Collection),
                Builtin::Nullable => Some(TypeKind::Nullable),
                Builtin::Transparent => None,
            },
        }
    }

    /// Type arguments, element types and tuple fields.
    pub fn children(&self) -> &[TypeExpr] {
        match self {
            TypeExpr::Path { args, .. } => args,
            TypeExpr::Array { elem, .. } => std::slice::from_ref(elem.as_ref()),
            TypeExpr::Tuple(items) => items,
            TypeExpr::Ref(inner) => std::slice::from_ref(inner.as_ref()),
            TypeExpr::Callable(_) => &[],
        }
    }

    /// Why values of this type can never be encoded, if that is the case.
    pub fn unsupported_reason(&self) -> Option<String> {
        match self {
            TypeExpr::Callable(head) => Some(format!("callback `{head}`")),
            TypeExpr::Ref(_) => Some(format!("borrowed reference `{self}`")),
            TypeExpr::Path { head, .. } if head.contains('{') => {
                Some(format!("closure or async body `{head}`"))
            }
            TypeExpr::Path { .. }
                if self
                    .short_name()
                    .is_some_and(|short| TASK_HANDLES.contains(&short)) =>
            {
                Some(format!("async task handle `{self}`"))
            }
            _ => self.children().iter().find_map(TypeExpr::unsupported_reason),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, items: &[TypeExpr]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }
        match self {
            TypeExpr::Path { head, args } => {
                f.write_str(head)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    list(f, args)?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeExpr::Array { elem, len: Some(n) } => write!(f, "[{elem};{n}]"),
            TypeExpr::Array { elem, len: None } => write!(f, "[{elem}]"),
            TypeExpr::Tuple(items) => {
                f.write_str("(")?;
                list(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            TypeExpr::Ref(inner) => write!(f, "&{inner}"),
            TypeExpr::Callable(head) => f.write_str(head),
        }
    }
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, b: u8) -> Result<(), Error> {
        if self.eat(b) {
            Ok(())
        } else {
            Err(self.error(&format!("expected `{}`", b as char)))
        }
    }

    fn error(&self, msg: &str) -> Error {
        Error::build(format!(
            "malformed type name `{}`: {msg} at {}",
            String::from_utf8_lossy(self.src),
            self.pos
        ))
    }

    fn parse_type(&mut self) -> Result<TypeExpr, Error> {
        match self.peek() {
            Some(b'&') | Some(b'*') => {
                self.pos += 1;
                Ok(TypeExpr::Ref(Box::new(self.parse_type()?)))
            }
            Some(b'[') => {
                self.pos += 1;
                let elem = Box::new(self.parse_type()?);
                let len = if self.eat(b';') {
                    Some(self.parse_number()?)
                } else {
                    None
                };
                self.expect(b']')?;
                Ok(TypeExpr::Array { elem, len })
            }
            Some(b'(') => {
                self.pos += 1;
                let items = self.parse_list(b')')?;
                Ok(TypeExpr::Tuple(items))
            }
            Some(_) => self.parse_path(),
            None => Err(self.error("unexpected end")),
        }
    }

    fn parse_list(&mut self, close: u8) -> Result<Vec<TypeExpr>, Error> {
        let mut items = Vec::new();
        loop {
            if self.eat(close) {
                return Ok(items);
            }
            items.push(self.parse_type()?);
            if !self.eat(b',') {
                self.expect(close)?;
                return Ok(items);
            }
        }
    }

    fn parse_number(&mut self) -> Result<usize, Error> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        std::str::from_utf8(&self.src[start..self.pos])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| self.error("expected array length"))
    }

    fn parse_path(&mut self) -> Result<TypeExpr, Error> {
        let start = self.pos;
        let mut braces = 0i32;
        while let Some(b) = self.peek() {
            match b {
                b'{' => braces += 1,
                b'}' => braces -= 1,
                b'<' | b'>' | b',' | b'(' | b')' | b'[' | b']' | b';' if braces == 0 => break,
                _ => {}
            }
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected a path"));
        }
        let head = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
        if head == "fn" || self.peek() == Some(b'(') {
            // callable signature: swallow the parameter list and return type
            let mut depth = 0i32;
            while let Some(b) = self.peek() {
                if b == b'-' && self.src.get(self.pos + 1) == Some(&b'>') {
                    self.pos += 2;
                    continue;
                }
                match b {
                    b'(' | b'<' | b'[' => depth += 1,
                    b')' | b'>' | b']' if depth > 0 => depth -= 1,
                    b')' | b'>' | b']' | b',' | b';' if depth == 0 => break,
                    _ => {}
                }
                self.pos += 1;
            }
            let sig = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
            return Ok(TypeExpr::Callable(sig));
        }
        let args = if self.eat(b'<') {
            self.parse_list(b'>')?
        } else {
            Vec::new()
        };
        Ok(TypeExpr::Path { head, args })
    }
}
