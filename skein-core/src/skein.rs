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

use crate::buffer::{Reader, Writer};
use crate::config::Config;
use crate::error::Error;
use crate::meta::{TypeDef, TypeGraph, TypeGraphBuilder};
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::pool::{Pool, PoolGuard};
use crate::resolver::registry::{Registry, TypeInfo};
use crate::serializer::object::{object_harness, Object, ObjectPlan};
use crate::serializer::trait_object::{read_polymorphic, write_polymorphic};
use crate::serializer::Serializer;
use crate::types::{normalize_type_name, StringEncoding};
use std::any::{Any, TypeId};
use std::sync::Arc;

const INITIAL_WRITER_CAPACITY: usize = 256;

/// Pooled writers that grew beyond this are replaced instead of kept.
const MAX_RETAINED_WRITER_CAPACITY: usize = 1 << 20;

fn recycle_writer(writer: &mut Writer) {
    if writer.capacity() > MAX_RETAINED_WRITER_CAPACITY {
        *writer = Writer::with_capacity(INITIAL_WRITER_CAPACITY);
    } else {
        writer.reset();
    }
}

type Finish = Box<dyn FnOnce(&TypeGraph) -> Result<TypeInfo, Error>>;

/// A registered object type waiting for the graph to be built.
struct PendingType {
    rust_type: TypeId,
    def: TypeDef,
    finish: Finish,
}

/// Collects types and settings, then builds an immutable [`Skein`].
///
/// # Examples
///
/// ```rust
/// use skein_core::Skein;
///
/// let skein = Skein::builder()
///     .permissive(true)
///     .compress_int(true)
///     .max_depth(64)
///     .build()
///     .unwrap();
/// assert!(skein.config().is_permissive());
/// ```
#[derive(Default)]
pub struct SkeinBuilder {
    config: Config,
    pending: Vec<PendingType>,
    interfaces: Vec<(TypeId, String)>,
}

impl SkeinBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object type.
    ///
    /// Its base type, if it has one, must be registered too. Registering
    /// the same type twice is a no-op.
    ///
    /// # Returns
    ///
    /// Returns `self` for method chaining.
    pub fn register<T: Object>(mut self) -> Self {
        let rust_type = TypeId::of::<T>();
        if self.pending.iter().any(|p| p.rust_type == rust_type) {
            return self;
        }
        let (def, fields, construct) = T::describe().into_parts();
        let name = def.name.clone();
        let kind = def.kind;
        let finish: Finish = Box::new(move |graph: &TypeGraph| {
            let plan = ObjectPlan::build(&name, fields, construct, graph)?;
            let id = graph
                .node(&name)
                .map(|node| node.id)
                .ok_or_else(|| Error::build(format!("`{name}` is missing from the type graph")))?;
            Ok(TypeInfo::new(
                id,
                name,
                kind,
                rust_type,
                object_harness::<T>(),
                Arc::new(plan),
            ))
        });
        self.pending.push(PendingType {
            rust_type,
            def,
            finish,
        });
        self
    }

    /// Registers a trait usable as `Box<dyn Trait>`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skein_core::serializer::AsAny;
    /// use skein_core::Skein;
    ///
    /// trait Animal: AsAny {}
    ///
    /// let skein = Skein::builder()
    ///     .register_interface::<dyn Animal>()
    ///     .build()
    ///     .unwrap();
    /// assert!(skein.registry().interface_name::<dyn Animal>().is_ok());
    /// ```
    pub fn register_interface<I: ?Sized + 'static>(mut self) -> Self {
        let rust_type = TypeId::of::<I>();
        if !self.interfaces.iter().any(|(t, _)| *t == rust_type) {
            let name = normalize_type_name(std::any::type_name::<I>());
            self.interfaces.push((rust_type, name));
        }
        self
    }

    /// Sets the version tolerance policy.
    ///
    /// # Arguments
    ///
    /// * `permissive` - `false` (the default) requires the stream to hold
    ///   exactly the members the decoded type expects. `true` frames every
    ///   object with its byte length: members a stream lacks are reset to
    ///   their default and unknown trailing members are skipped.
    ///
    /// Both endpoints must agree on this setting.
    pub fn permissive(mut self, permissive: bool) -> Self {
        self.config.permissive = permissive;
        self
    }

    /// Encodes scalar `i32`/`i64` as zigzag varints and `u32`/`u64` as
    /// varints. Elements of collections keep their fixed width.
    pub fn compress_int(mut self, compress_int: bool) -> Self {
        self.config.compress_int = compress_int;
        self
    }

    /// Default encoding of strings. Members marked UTF-8 ignore it.
    pub fn string_encoding(mut self, encoding: StringEncoding) -> Self {
        self.config.string_encoding = encoding;
        self
    }

    /// Maximum object nesting accepted in either direction.
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Builds the type graph and the registry.
    ///
    /// # Errors
    ///
    /// Every structural problem is reported here as a build error: an
    /// unregistered base type, duplicate member indices, id collisions,
    /// unsupported member types and visibility violations.
    pub fn build(self) -> Result<Skein, Error> {
        let mut graph_builder = TypeGraphBuilder::new();
        for (_, name) in &self.interfaces {
            graph_builder.add(TypeDef::interface(name))?;
        }
        for pending in &self.pending {
            graph_builder.add(pending.def.clone())?;
        }
        let graph = graph_builder.build()?;

        let mut infos = Vec::with_capacity(self.pending.len());
        let mut aliases = Vec::new();
        for pending in self.pending {
            if let Some(node) = graph.node(&pending.def.name) {
                aliases.extend(node.former_ids.iter().map(|id| (*id, pending.rust_type)));
            }
            infos.push((pending.finish)(&graph)?);
        }

        let mut registry = Registry::new(graph);
        for info in infos {
            registry.register(info)?;
        }
        for (id, rust_type) in aliases {
            registry.alias(id, rust_type)?;
        }
        let interface_count = self.interfaces.len();
        for (rust_type, name) in self.interfaces {
            registry.register_interface(rust_type, name);
        }
        log::debug!(
            "skein engine built: {} types, {} interfaces, {} graph nodes, config {:?}",
            registry.len(),
            interface_count,
            registry.graph().len(),
            self.config
        );
        Ok(Skein::new(self.config, registry))
    }
}

/// The serialization engine.
///
/// Built once through [`SkeinBuilder`] and immutable afterwards: every
/// method takes `&self`, and a `Skein` can be shared freely between
/// threads. The only state mutated at run time is the writer pool.
///
/// # Examples
///
/// ```rust
/// use skein_core::Skein;
///
/// let skein = Skein::builder().build().unwrap();
/// let bytes = skein.serialize(&vec![1i32, 2, 3]).unwrap();
/// let back: Vec<i32> = skein.deserialize(&bytes).unwrap();
/// assert_eq!(back, [1, 2, 3]);
/// ```
pub struct Skein {
    config: Config,
    registry: Registry,
    writer_pool: Pool<Writer>,
}

impl std::fmt::Debug for Skein {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Skein")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Skein {
    fn new(config: Config, registry: Registry) -> Skein {
        Skein {
            config,
            registry,
            writer_pool: Pool::new(
                || Writer::with_capacity(INITIAL_WRITER_CAPACITY),
                recycle_writer,
            ),
        }
    }

    pub fn builder() -> SkeinBuilder {
        SkeinBuilder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes `value` into a new byte vector.
    ///
    /// The encoding happens in a pooled writer, so repeated calls do not
    /// reallocate the working buffer.
    pub fn serialize<T: Serializer>(&self, value: &T) -> Result<Vec<u8>, Error> {
        let mut writer = self.writer_pool.acquire();
        self.serialize_to(value, &mut writer)?;
        Ok(writer.dump())
    }

    /// Appends the encoding of `value` to `writer`.
    ///
    /// On error nothing is appended: the writer is cut back to its length
    /// before the call.
    pub fn serialize_to<T: Serializer>(&self, value: &T, writer: &mut Writer) -> Result<(), Error> {
        let start = writer.len();
        let mut context = WriteContext::new(&self.registry, &self.config, writer);
        let result = value.skein_write(&mut context);
        if result.is_err() {
            writer.truncate(start);
        }
        result
    }

    /// Decodes a new `T` from `bf`.
    ///
    /// # Errors
    ///
    /// In strict mode the value must span `bf` exactly; trailing bytes are
    /// reported as invalid data.
    pub fn deserialize<T: Serializer>(&self, bf: &[u8]) -> Result<T, Error> {
        let mut context = ReadContext::new(&self.registry, &self.config, Reader::new(bf));
        let value = T::skein_read(&mut context)?;
        self.check_trailing(&context.reader)?;
        Ok(value)
    }

    /// Decodes a new `T` from `bf` and assigns it to `out`. `out` is left
    /// untouched on error.
    pub fn deserialize_to<T: Serializer>(&self, bf: &[u8], out: &mut T) -> Result<(), Error> {
        *out = self.deserialize(bf)?;
        Ok(())
    }

    /// Decodes `bf` onto an existing value, keeping the identity of
    /// everything that survives.
    ///
    /// List-like containers keep the elements at indices present in both
    /// the old and the new data, truncate or append at the end, and merge
    /// each kept element recursively. Maps keep the values under surviving
    /// keys. Hash sets, heaps and concurrent containers are cleared and
    /// refilled. Objects are overwritten member by member without being
    /// reconstructed; a `None` that receives data is constructed through
    /// the type's construction hook.
    ///
    /// A failed merge is not rolled back. The error still aborts the call,
    /// but `existing` keeps whatever was merged before the failure. Each
    /// element is either fully merged or left as it was, never half decoded,
    /// and a list-like container has already been cut to the shorter of its
    /// old and incoming lengths. Use [`Skein::deserialize_to`] when the
    /// target must stay untouched on error.
    pub fn merge<T: Serializer>(&self, bf: &[u8], existing: &mut T) -> Result<(), Error> {
        let mut context = ReadContext::new(&self.registry, &self.config, Reader::new(bf));
        existing.skein_read_into(&mut context)?;
        self.check_trailing(&context.reader)
    }

    /// Exact number of bytes [`Skein::serialize`] produces for `value`.
    pub fn precompute_size<T: Serializer>(&self, value: &T) -> Result<usize, Error> {
        let mut scratch = Writer::default();
        let mut context = WriteContext::new(&self.registry, &self.config, &mut scratch);
        value.skein_size(&mut context)
    }

    /// Encodes a value of any registered object type, resolved at run time.
    ///
    /// The output always starts with the type id, whatever the type's kind,
    /// so it must be read back with [`Skein::deserialize_any`].
    pub fn serialize_any(&self, value: &dyn Any) -> Result<Vec<u8>, Error> {
        let mut writer = self.writer_pool.acquire();
        {
            let mut context = WriteContext::new(&self.registry, &self.config, &mut writer);
            write_polymorphic(value, None, &mut context)?;
        }
        Ok(writer.dump())
    }

    /// Decodes a value written by [`Skein::serialize_any`].
    pub fn deserialize_any(&self, bf: &[u8]) -> Result<Box<dyn Any>, Error> {
        let mut context = ReadContext::new(&self.registry, &self.config, Reader::new(bf));
        let value = read_polymorphic::<Box<dyn Any>>(None, &mut context)?;
        self.check_trailing(&context.reader)?;
        Ok(value)
    }

    /// Borrows a writer from the engine's pool. It goes back when the guard
    /// is dropped.
    pub fn acquire_writer(&self) -> PoolGuard<'_, Writer> {
        self.writer_pool.acquire()
    }

    fn check_trailing(&self, reader: &Reader) -> Result<(), Error> {
        if self.config.is_permissive() || reader.is_exhausted() {
            return Ok(());
        }
        Err(Error::invalid_data(format!(
            "{} unexpected trailing bytes at byte {}",
            reader.remaining(),
            reader.get_cursor()
        )))
    }
}
