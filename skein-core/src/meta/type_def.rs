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

//! Declarations handed to the graph builder by whatever discovered the
//! types: hand-written descriptors, generated code or a schema file.
//! These records are plain data and carry no codecs.

use crate::types::{normalize_type_name, TypeKind, Visibility};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberDef {
    pub name: String,
    pub type_name: String,
    pub index: Option<u16>,
    pub ignore: bool,
    /// Explicit opt-in marker, as opposed to being picked up by auto-collection.
    pub include: bool,
    pub formatter: Option<String>,
    pub visibility: Visibility,
    pub utf8: bool,
    /// Set by discovery when it already knows the member cannot be encoded.
    pub unsupported: bool,
    /// Position in the declaring type, assigned by [`TypeDef::member`].
    pub order: usize,
}

impl MemberDef {
    pub fn new(name: impl Into<String>, type_name: &str) -> MemberDef {
        MemberDef {
            name: name.into(),
            type_name: normalize_type_name(type_name),
            index: None,
            ignore: false,
            include: false,
            formatter: None,
            visibility: Visibility::Public,
            utf8: false,
            unsupported: false,
            order: 0,
        }
    }

    pub fn index(mut self, index: u16) -> Self {
        self.index = Some(index);
        self
    }

    pub fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }

    pub fn include(mut self) -> Self {
        self.include = true;
        self
    }

    pub fn formatter(mut self, formatter: impl Into<String>) -> Self {
        self.formatter = Some(formatter.into());
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn utf8(mut self) -> Self {
        self.utf8 = true;
        self
    }

    pub fn unsupported(mut self) -> Self {
        self.unsupported = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDef {
    pub name: String,
    pub kind: TypeKind,
    pub members: Vec<MemberDef>,
    pub base: Option<String>,
    pub interfaces: Vec<String>,
    pub allow_inheritance: bool,
    pub is_abstract: bool,
    /// Carries the serializable marker. Subtypes of a marked base must too.
    pub marked: bool,
    pub visibility: Visibility,
    pub contains_non_public_members: bool,
    /// When false only indexed or explicitly included members are collected.
    pub auto_collect: bool,
    pub explicit_id: Option<u16>,
    pub former_names: Vec<String>,
    pub has_construction_hook: bool,
}

impl TypeDef {
    pub fn new(name: &str, kind: TypeKind) -> TypeDef {
        TypeDef {
            name: normalize_type_name(name),
            kind,
            members: Vec::new(),
            base: None,
            interfaces: Vec::new(),
            allow_inheritance: kind == TypeKind::Interface,
            is_abstract: kind == TypeKind::Interface,
            marked: true,
            visibility: Visibility::Public,
            contains_non_public_members: false,
            auto_collect: true,
            explicit_id: None,
            former_names: Vec::new(),
            has_construction_hook: false,
        }
    }

    pub fn class(name: &str) -> TypeDef {
        TypeDef::new(name, TypeKind::Class)
    }

    pub fn value(name: &str) -> TypeDef {
        TypeDef::new(name, TypeKind::Struct)
    }

    pub fn interface(name: &str) -> TypeDef {
        TypeDef::new(name, TypeKind::Interface)
    }

    /// Appends a member; declaration order follows call order.
    pub fn member(mut self, mut member: MemberDef) -> Self {
        member.order = self.members.len();
        self.members.push(member);
        self
    }

    pub fn base(mut self, base: &str) -> Self {
        self.base = Some(normalize_type_name(base));
        self
    }

    pub fn implements(mut self, interface: &str) -> Self {
        self.interfaces.push(normalize_type_name(interface));
        self
    }

    pub fn allow_inheritance(mut self, allow: bool) -> Self {
        self.allow_inheritance = allow;
        self
    }

    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn marked(mut self, marked: bool) -> Self {
        self.marked = marked;
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn contains_non_public_members(mut self) -> Self {
        self.contains_non_public_members = true;
        self
    }

    pub fn auto_collect(mut self, auto_collect: bool) -> Self {
        self.auto_collect = auto_collect;
        self
    }

    pub fn id(mut self, id: u16) -> Self {
        self.explicit_id = Some(id);
        self
    }

    pub fn former_name(mut self, name: &str) -> Self {
        self.former_names.push(normalize_type_name(name));
        self
    }

    pub fn construction_hook(mut self, has_hook: bool) -> Self {
        self.has_construction_hook = has_hook;
        self
    }

    #[inline]
    pub fn is_concrete(&self) -> bool {
        !self.is_abstract && self.kind != TypeKind::Interface
    }
}
