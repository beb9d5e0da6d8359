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

//! Id <-> codec table.
//!
//! Populated once by [`SkeinBuilder::build`](crate::skein::SkeinBuilder::build)
//! from the validated [`TypeGraph`], then frozen: everything that mutates
//! it is crate-private, so concurrent lookups need no locking.

use super::context::{ReadContext, WriteContext};
use crate::error::Error;
use crate::meta::TypeGraph;
use crate::types::TypeKind;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Writes the payload. Whoever dispatches through the table writes the id.
pub type WriteFn = fn(&dyn Any, &mut WriteContext) -> Result<(), Error>;
/// Reads the payload that follows an already consumed id header.
pub type ReadFn = fn(&mut ReadContext) -> Result<Box<dyn Any>, Error>;
/// Merges the payload that follows an already consumed id header.
pub type MergeFn = fn(&mut dyn Any, &mut ReadContext) -> Result<(), Error>;
/// Encoded size of the payload, without the id header.
pub type SizeFn = fn(&dyn Any, &mut WriteContext) -> Result<usize, Error>;

#[derive(Clone, Copy, Debug)]
pub struct Harness {
    write_fn: WriteFn,
    read_fn: ReadFn,
    merge_fn: MergeFn,
    size_fn: SizeFn,
}

impl Harness {
    pub fn new(write_fn: WriteFn, read_fn: ReadFn, merge_fn: MergeFn, size_fn: SizeFn) -> Harness {
        Harness {
            write_fn,
            read_fn,
            merge_fn,
            size_fn,
        }
    }

    #[inline(always)]
    pub fn get_write_fn(&self) -> WriteFn {
        self.write_fn
    }

    #[inline(always)]
    pub fn get_read_fn(&self) -> ReadFn {
        self.read_fn
    }

    #[inline(always)]
    pub fn get_merge_fn(&self) -> MergeFn {
        self.merge_fn
    }

    #[inline(always)]
    pub fn get_size_fn(&self) -> SizeFn {
        self.size_fn
    }
}

pub struct TypeInfo {
    id: u16,
    name: String,
    kind: TypeKind,
    rust_type: std::any::TypeId,
    harness: Harness,
    plan: Arc<dyn Any + Send + Sync>,
}

impl TypeInfo {
    pub fn new(
        id: u16,
        name: String,
        kind: TypeKind,
        rust_type: std::any::TypeId,
        harness: Harness,
        plan: Arc<dyn Any + Send + Sync>,
    ) -> TypeInfo {
        TypeInfo {
            id,
            name,
            kind,
            rust_type,
            harness,
            plan,
        }
    }

    #[inline(always)]
    pub fn get_type_id(&self) -> u16 {
        self.id
    }

    pub fn get_type_name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn get_kind(&self) -> TypeKind {
        self.kind
    }

    #[inline(always)]
    pub fn get_rust_type(&self) -> std::any::TypeId {
        self.rust_type
    }

    #[inline(always)]
    pub fn get_harness(&self) -> &Harness {
        &self.harness
    }

    /// The codec plan stored for this type, if it is a `P`.
    #[inline(always)]
    pub fn plan<P: Any>(&self) -> Option<&P> {
        self.plan.downcast_ref::<P>()
    }
}

impl std::fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeInfo")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    graph: TypeGraph,
    infos: Vec<TypeInfo>,
    by_rust: HashMap<std::any::TypeId, usize>,
    by_id: HashMap<u16, usize>,
    /// Graph names of the traits usable as `Box<dyn Trait>`.
    interfaces: HashMap<std::any::TypeId, String>,
}

impl Registry {
    pub(crate) fn new(graph: TypeGraph) -> Registry {
        Registry {
            graph,
            ..Registry::default()
        }
    }

    /// Registers a codec. Registering the same type under the same id again
    /// is a no-op; any other clash is a build error.
    pub(crate) fn register(&mut self, info: TypeInfo) -> Result<(), Error> {
        if let Some(&existing) = self.by_rust.get(&info.rust_type) {
            let existing = &self.infos[existing];
            if existing.id == info.id {
                return Ok(());
            }
            return Err(Error::build(format!(
                "`{}` registered under both id {} and id {}",
                info.name, existing.id, info.id
            )));
        }
        if let Some(&other) = self.by_id.get(&info.id) {
            return Err(Error::id_collision(
                info.id,
                self.infos[other].name.clone(),
                info.name,
            ));
        }
        let index = self.infos.len();
        self.by_rust.insert(info.rust_type, index);
        self.by_id.insert(info.id, index);
        self.infos.push(info);
        Ok(())
    }

    /// Lets `id` decode as the already registered `rust_type`.
    pub(crate) fn alias(&mut self, id: u16, rust_type: std::any::TypeId) -> Result<(), Error> {
        let Some(&index) = self.by_rust.get(&rust_type) else {
            return Err(Error::build(format!("cannot alias id {id} to an unregistered type")));
        };
        match self.by_id.get(&id) {
            Some(&other) if other != index => Err(Error::id_collision(
                id,
                self.infos[other].name.clone(),
                self.infos[index].name.clone(),
            )),
            _ => {
                self.by_id.insert(id, index);
                Ok(())
            }
        }
    }

    pub(crate) fn register_interface(&mut self, rust_type: std::any::TypeId, name: String) {
        self.interfaces.insert(rust_type, name);
    }

    pub fn graph(&self) -> &TypeGraph {
        &self.graph
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    #[inline(always)]
    pub fn get(&self, rust_type: std::any::TypeId) -> Option<&TypeInfo> {
        self.by_rust.get(&rust_type).map(|i| &self.infos[*i])
    }

    #[inline(always)]
    pub fn get_by_id(&self, id: u16) -> Option<&TypeInfo> {
        self.by_id.get(&id).map(|i| &self.infos[*i])
    }

    /// Encode-side lookup by static type.
    #[inline]
    pub fn info_of<T: 'static>(&self) -> Result<&TypeInfo, Error> {
        self.get(std::any::TypeId::of::<T>()).ok_or_else(|| {
            Error::not_allowed(format!(
                "type `{}` was not registered with the engine",
                std::any::type_name::<T>()
            ))
        })
    }

    /// Decode-side lookup by wire id.
    #[inline]
    pub fn decode_info(&self, id: u16) -> Result<&TypeInfo, Error> {
        self.get_by_id(id).ok_or_else(|| Error::unknown_type_id(id))
    }

    /// Graph name of the interface `I`, which must be a registered `dyn Trait`.
    #[inline]
    pub fn interface_name<I: ?Sized + 'static>(&self) -> Result<&str, Error> {
        self.interfaces
            .get(&std::any::TypeId::of::<I>())
            .map(String::as_str)
            .ok_or_else(|| {
                Error::not_allowed(format!(
                    "interface `{}` was not registered with the engine",
                    std::any::type_name::<I>()
                ))
            })
    }

    pub fn is_assignable(&self, info: &TypeInfo, expected: &str) -> bool {
        info.name == expected || self.graph.is_assignable(&info.name, expected)
    }
}
