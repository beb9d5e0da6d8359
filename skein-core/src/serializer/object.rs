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

//! Codec for user types described through [`Object`].
//!
//! An object is encoded as its members in the order fixed by the type
//! graph, inherited members first. Class-kind objects are preceded by their
//! `u16` id; struct-kind objects are not. In permissive mode the members
//! are additionally wrapped in an `i32` byte-length frame, so a reader can
//! default the members a shorter payload leaves out and skip the ones it
//! does not know.
//!
//! The member accessors are plain closures produced by [`Field::new`]. No
//! reflection happens at run time: [`ObjectPlan`] is computed once, when
//! the engine is built, and looked up by type afterwards.

use crate::error::Error;
use crate::meta::{MemberDef, TypeDef, TypeGraph};
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::registry::{Harness, Registry, TypeInfo};
use crate::serializer::formatter::{self, Formatter};
use crate::serializer::util::{read_len, unexpected_marker};
use crate::serializer::Serializer;
use crate::types::{normalize_type_name, TypeKind, Visibility, FIRST_TYPE_ID};
use std::any::Any;
use std::sync::Arc;

type WriteMember<T> = Arc<dyn Fn(&T, &mut WriteContext) -> Result<(), Error> + Send + Sync>;
type ReadMember<T> = Arc<dyn Fn(&mut T, &mut ReadContext) -> Result<(), Error> + Send + Sync>;
type SizeMember<T> = Arc<dyn Fn(&T, &mut WriteContext) -> Result<usize, Error> + Send + Sync>;
type ResetMember<T> = Arc<dyn Fn(&mut T) + Send + Sync>;

fn write_member<T, G>(f: G) -> WriteMember<T>
where
    G: Fn(&T, &mut WriteContext) -> Result<(), Error> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn read_member<T, G>(f: G) -> ReadMember<T>
where
    G: Fn(&mut T, &mut ReadContext) -> Result<(), Error> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn size_member<T, G>(f: G) -> SizeMember<T>
where
    G: Fn(&T, &mut WriteContext) -> Result<usize, Error> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn reset_member<T, G>(f: G) -> ResetMember<T>
where
    G: Fn(&mut T) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A user type the engine can encode member by member.
///
/// Implement it by hand (or generate it) and then call [`impl_object!`] to
/// get the [`Serializer`] glue:
///
/// ```
/// use skein_core::impl_object;
/// use skein_core::serializer::object::{Field, Object, ObjectDescriptor};
///
/// #[derive(Default)]
/// pub struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Object for Point {
///     fn describe() -> ObjectDescriptor<Self> {
///         ObjectDescriptor::new()
///             .field(Field::new("x", |p: &Point| &p.x, |p: &mut Point| &mut p.x))
///             .field(Field::new("y", |p: &Point| &p.y, |p: &mut Point| &mut p.y))
///     }
/// }
///
/// impl_object!(Point);
/// ```
pub trait Object: Default + Sized + 'static {
    /// `Class` objects carry an id header and may be null behind an
    /// `Option`; `Struct` objects are inlined values.
    const KIND: TypeKind = TypeKind::Class;

    fn describe() -> ObjectDescriptor<Self>;
}

/// One member of `T`: its declaration plus accessor closures.
pub struct Field<T> {
    def: MemberDef,
    /// Graph name of the type that declares the member.
    owner: String,
    write: WriteMember<T>,
    read: ReadMember<T>,
    merge: ReadMember<T>,
    size: SizeMember<T>,
    reset: ResetMember<T>,
}

impl<T: 'static> Field<T> {
    /// A member encoded with `F`'s own codec.
    pub fn new<F: Serializer>(
        name: &str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Field<T> {
        Field {
            def: MemberDef::new(name, std::any::type_name::<F>()),
            owner: String::new(),
            write: write_member(move |obj, context| get(obj).skein_write(context)),
            // assign a fresh value so construction hooks of nested objects fire
            read: read_member(move |obj, context| {
                *get_mut(obj) = F::skein_read(context)?;
                Ok(())
            }),
            merge: read_member(move |obj, context| get_mut(obj).skein_read_into(context)),
            size: size_member(move |obj, context| get(obj).skein_size(context)),
            reset: reset_member(move |obj| *get_mut(obj) = F::skein_default()),
        }
    }

    /// A member whose whole subtree is handed to the formatter `Fmt`.
    ///
    /// The formatter is resolved once, here, to its process-wide instance.
    pub fn with_formatter<F, Fmt>(
        name: &str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Field<T>
    where
        F: Default + 'static,
        Fmt: Formatter<F>,
    {
        let fmt: &'static Fmt = formatter::instance::<Fmt>();
        Field {
            def: MemberDef::new(name, std::any::type_name::<F>())
                .formatter(normalize_type_name(std::any::type_name::<Fmt>())),
            owner: String::new(),
            write: write_member(move |obj, context| fmt.write(get(obj), context)),
            read: read_member(move |obj, context| {
                *get_mut(obj) = fmt.read(context)?;
                Ok(())
            }),
            merge: read_member(move |obj, context| fmt.read_into(get_mut(obj), context)),
            size: size_member(move |obj, context| fmt.size(get(obj), context)),
            reset: reset_member(move |obj| *get_mut(obj) = F::default()),
        }
    }

    /// Explicit wire position within the declaring type.
    pub fn index(mut self, index: u16) -> Self {
        self.def = self.def.index(index);
        self
    }

    pub fn ignore(mut self) -> Self {
        self.def = self.def.ignore();
        self
    }

    /// Collects the member even when the type turned auto-collection off.
    pub fn include(mut self) -> Self {
        self.def = self.def.include();
        self
    }

    /// Encodes every string inside this member as UTF-8.
    pub fn utf8(mut self) -> Self {
        self.def = self.def.utf8();
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.def = self.def.visibility(visibility);
        self
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    /// Re-targets the accessors at a `D` that embeds `T`.
    fn lift<D: 'static>(self, get: fn(&D) -> &T, get_mut: fn(&mut D) -> &mut T) -> Field<D> {
        let Field {
            def,
            owner,
            write,
            read,
            merge,
            size,
            reset,
        } = self;
        Field {
            def,
            owner,
            write: write_member(move |obj, context| write(get(obj), context)),
            read: read_member(move |obj, context| read(get_mut(obj), context)),
            merge: read_member(move |obj, context| merge(get_mut(obj), context)),
            size: size_member(move |obj, context| size(get(obj), context)),
            reset: reset_member(move |obj| reset(get_mut(obj))),
        }
    }
}

/// What an [`Object`] tells the engine about itself.
pub struct ObjectDescriptor<T> {
    def: TypeDef,
    fields: Vec<Field<T>>,
    construct: Option<fn() -> T>,
}

impl<T: Object> Default for ObjectDescriptor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Object> ObjectDescriptor<T> {
    /// Starts a descriptor named after `std::any::type_name::<T>()`.
    pub fn new() -> Self {
        ObjectDescriptor {
            def: TypeDef::new(std::any::type_name::<T>(), T::KIND),
            fields: Vec::new(),
            construct: None,
        }
    }

    /// Overrides the graph name, and with it the derived wire id.
    pub fn named(mut self, name: &str) -> Self {
        let name = normalize_type_name(name);
        for field in self.fields.iter_mut().filter(|f| f.owner == self.def.name) {
            field.owner = name.clone();
        }
        self.def.name = name;
        self
    }

    /// Declares the next member. Declaration order is the fallback wire order.
    pub fn field(mut self, mut field: Field<T>) -> Self {
        field.owner = self.def.name.clone();
        field.def.order = self.def.members.len();
        self.def = self.def.member(field.def.clone());
        self.fields.push(field);
        self
    }

    /// Embeds a registered base type. Its members, including those it
    /// inherits itself, are written before the members of `T`.
    pub fn base<B: Object>(mut self, get: fn(&T) -> &B, get_mut: fn(&mut T) -> &mut B) -> Self {
        let base = B::describe();
        self.def = self.def.base(&base.def.name);
        self.fields
            .extend(base.fields.into_iter().map(|f| f.lift(get, get_mut)));
        self
    }

    /// Declares that `T` implements the trait `I`, so it can be decoded as
    /// `Box<dyn I>`.
    pub fn implements<I: ?Sized + 'static>(mut self) -> Self {
        self.def = self.def.implements(std::any::type_name::<I>());
        self
    }

    /// Lets other types name `T` as their base.
    pub fn allow_inheritance(mut self) -> Self {
        self.def = self.def.allow_inheritance(true);
        self
    }

    /// Fixes the wire id instead of hashing the name.
    pub fn id(mut self, id: u16) -> Self {
        self.def = self.def.id(id);
        self
    }

    /// Keeps decoding data written while the type had another name.
    pub fn former_name(mut self, name: &str) -> Self {
        self.def = self.def.former_name(name);
        self
    }

    pub fn non_public_members(mut self) -> Self {
        self.def = self.def.contains_non_public_members();
        self
    }

    /// With `false`, only indexed or explicitly included members are encoded.
    pub fn auto_collect(mut self, auto_collect: bool) -> Self {
        self.def = self.def.auto_collect(auto_collect);
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.def = self.def.visibility(visibility);
        self
    }

    /// Obtains every newly decoded instance from `hook` instead of
    /// `Default`. Not inherited by derived types, and never called when
    /// merging into an existing instance.
    pub fn construct_with(mut self, hook: fn() -> T) -> Self {
        self.def = self.def.construction_hook(true);
        self.construct = Some(hook);
        self
    }

    pub fn type_def(&self) -> &TypeDef {
        &self.def
    }

    pub(crate) fn into_parts(self) -> (TypeDef, Vec<Field<T>>, Option<fn() -> T>) {
        (self.def, self.fields, self.construct)
    }
}

/// Wire-ordered accessors of one object type.
pub struct ObjectPlan<T> {
    name: String,
    fields: Vec<Field<T>>,
    construct: Option<fn() -> T>,
}

impl<T: Object> ObjectPlan<T> {
    /// Orders `fields` after the members the graph kept for `name`.
    pub(crate) fn build(
        name: &str,
        fields: Vec<Field<T>>,
        construct: Option<fn() -> T>,
        graph: &TypeGraph,
    ) -> Result<ObjectPlan<T>, Error> {
        let mut chain = Vec::new();
        let mut cursor = graph.index_of(name);
        while let Some(i) = cursor {
            chain.push(graph.get(i));
            cursor = graph.get(i).base;
        }
        if chain.is_empty() {
            return Err(Error::build(format!("`{name}` is missing from the type graph")));
        }

        let mut pending: Vec<Option<Field<T>>> = fields.into_iter().map(Some).collect();
        let mut ordered = Vec::with_capacity(pending.len());
        for node in chain.iter().rev() {
            for member in &node.members {
                let field = pending
                    .iter_mut()
                    .find(|slot| {
                        slot.as_ref()
                            .is_some_and(|f| f.owner == node.name && f.def.name == member.name)
                    })
                    .and_then(Option::take);
                match field {
                    Some(field) => ordered.push(field),
                    None => {
                        return Err(Error::build(format!(
                            "member `{}.{}` has no accessor on `{name}`",
                            node.name, member.name
                        )))
                    }
                }
            }
        }
        Ok(ObjectPlan {
            name: name.to_string(),
            fields: ordered,
            construct,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member names in wire order.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.def.name.as_str())
    }

    fn construct(&self) -> T {
        match self.construct {
            Some(hook) => hook(),
            None => T::default(),
        }
    }
}

fn plan_of<T: Object>(registry: &Registry) -> Result<(&TypeInfo, &ObjectPlan<T>), Error> {
    let info = registry.info_of::<T>()?;
    let plan = info.plan::<ObjectPlan<T>>().ok_or_else(|| {
        Error::not_allowed(format!("`{}` is not registered as an object", info.get_type_name()))
    })?;
    Ok((info, plan))
}

/// Consumes the id header and checks it denotes `info`'s type, directly or
/// through a former name.
fn check_header<T>(info: &TypeInfo, context: &mut ReadContext) -> Result<(), Error> {
    let offset = context.reader.get_cursor();
    let id = context.reader.read_u16()?;
    if id == info.get_type_id() {
        return Ok(());
    }
    if id < FIRST_TYPE_ID {
        return Err(unexpected_marker::<T>(id, offset));
    }
    let found = context.registry().decode_info(id)?;
    if found.get_rust_type() == info.get_rust_type() {
        return Ok(());
    }
    Err(Error::type_mismatch(
        info.get_type_name().to_string(),
        found.get_type_name().to_string(),
    ))
}

pub fn write_object<T: Object>(value: &T, context: &mut WriteContext) -> Result<(), Error> {
    let (info, plan) = plan_of::<T>(context.registry())?;
    if T::KIND.has_id_header() {
        context.writer.write_u16(info.get_type_id());
    }
    write_payload(value, plan, context)
}

pub fn read_object<T: Object>(context: &mut ReadContext) -> Result<T, Error> {
    let (info, plan) = plan_of::<T>(context.registry())?;
    if T::KIND.has_id_header() {
        check_header::<T>(info, context)?;
    }
    read_payload(plan, context)
}

/// Overwrites `value` member by member; nothing is constructed for `value`
/// itself.
pub fn merge_object<T: Object>(value: &mut T, context: &mut ReadContext) -> Result<(), Error> {
    let (info, plan) = plan_of::<T>(context.registry())?;
    if T::KIND.has_id_header() {
        check_header::<T>(info, context)?;
    }
    read_members(value, plan, true, context)
}

pub fn object_size<T: Object>(value: &T, context: &mut WriteContext) -> Result<usize, Error> {
    let (_, plan) = plan_of::<T>(context.registry())?;
    let header = if T::KIND.has_id_header() { 2 } else { 0 };
    Ok(header + payload_size(value, plan, context)?)
}

fn write_payload<T: Object>(
    value: &T,
    plan: &ObjectPlan<T>,
    context: &mut WriteContext,
) -> Result<(), Error> {
    context.inc_depth()?;
    let frame = context
        .is_permissive()
        .then(|| context.writer.reserve_length());
    for field in &plan.fields {
        context
            .with_utf8(field.def.utf8, |context| (field.write)(value, context))
            .map_err(|e| e.in_member(plan.name.clone(), field.def.name.clone(), None))?;
    }
    if let Some(pos) = frame {
        context.writer.patch_length(pos)?;
    }
    context.dec_depth();
    Ok(())
}

fn read_payload<T: Object>(plan: &ObjectPlan<T>, context: &mut ReadContext) -> Result<T, Error> {
    let mut value = plan.construct();
    read_members(&mut value, plan, false, context)?;
    Ok(value)
}

fn read_members<T: Object>(
    value: &mut T,
    plan: &ObjectPlan<T>,
    merge: bool,
    context: &mut ReadContext,
) -> Result<(), Error> {
    context.inc_depth()?;
    if context.is_permissive() {
        let len = read_len(context)?;
        let frame = context.reader.enter_frame(len)?;
        for field in &plan.fields {
            if context.reader.is_exhausted() {
                (field.reset)(value);
                continue;
            }
            read_field(value, plan, field, merge, context)?;
        }
        context.reader.exit_frame(frame);
    } else {
        for field in &plan.fields {
            read_field(value, plan, field, merge, context)?;
        }
    }
    context.dec_depth();
    Ok(())
}

#[inline(always)]
fn read_field<T>(
    value: &mut T,
    plan: &ObjectPlan<T>,
    field: &Field<T>,
    merge: bool,
    context: &mut ReadContext,
) -> Result<(), Error> {
    let offset = context.reader.get_cursor();
    let access = if merge { &field.merge } else { &field.read };
    context
        .with_utf8(field.def.utf8, |context| access(value, context))
        .map_err(|e| e.in_member(plan.name.clone(), field.def.name.clone(), Some(offset)))
}

fn payload_size<T: Object>(
    value: &T,
    plan: &ObjectPlan<T>,
    context: &mut WriteContext,
) -> Result<usize, Error> {
    context.inc_depth()?;
    let mut size = if context.is_permissive() { 4 } else { 0 };
    for field in &plan.fields {
        size += context
            .with_utf8(field.def.utf8, |context| (field.size)(value, context))
            .map_err(|e| e.in_member(plan.name.clone(), field.def.name.clone(), None))?;
    }
    context.dec_depth();
    Ok(size)
}

fn downcast_ref<T: 'static>(value: &dyn Any) -> Result<&T, Error> {
    value.downcast_ref::<T>().ok_or_else(|| {
        Error::not_allowed(format!("value is not a `{}`", std::any::type_name::<T>()))
    })
}

fn write_any<T: Object>(value: &dyn Any, context: &mut WriteContext) -> Result<(), Error> {
    let (_, plan) = plan_of::<T>(context.registry())?;
    write_payload(downcast_ref::<T>(value)?, plan, context)
}

fn read_any<T: Object>(context: &mut ReadContext) -> Result<Box<dyn Any>, Error> {
    let (_, plan) = plan_of::<T>(context.registry())?;
    Ok(Box::new(read_payload(plan, context)?))
}

fn merge_any<T: Object>(value: &mut dyn Any, context: &mut ReadContext) -> Result<(), Error> {
    let (_, plan) = plan_of::<T>(context.registry())?;
    let value = value.downcast_mut::<T>().ok_or_else(|| {
        Error::not_allowed(format!("value is not a `{}`", std::any::type_name::<T>()))
    })?;
    read_members(value, plan, true, context)
}

fn size_any<T: Object>(value: &dyn Any, context: &mut WriteContext) -> Result<usize, Error> {
    let (_, plan) = plan_of::<T>(context.registry())?;
    payload_size(downcast_ref::<T>(value)?, plan, context)
}

/// Payload codecs used when the concrete type is only known from an id.
pub(crate) fn object_harness<T: Object>() -> Harness {
    Harness::new(write_any::<T>, read_any::<T>, merge_any::<T>, size_any::<T>)
}

/// Implements [`Serializer`](crate::serializer::Serializer) and
/// [`SkeinDefault`](crate::serializer::SkeinDefault) for types that
/// implement [`Object`](crate::serializer::object::Object).
#[macro_export]
macro_rules! impl_object {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::serializer::SkeinDefault for $ty {
            fn skein_default() -> Self {
                <$ty as ::core::default::Default>::default()
            }
        }

        impl $crate::serializer::Serializer for $ty {
            #[inline]
            fn skein_write(
                &self,
                context: &mut $crate::resolver::context::WriteContext,
            ) -> Result<(), $crate::error::Error> {
                $crate::serializer::object::write_object(self, context)
            }

            #[inline]
            fn skein_read(
                context: &mut $crate::resolver::context::ReadContext,
            ) -> Result<Self, $crate::error::Error> {
                $crate::serializer::object::read_object(context)
            }

            #[inline]
            fn skein_read_into(
                &mut self,
                context: &mut $crate::resolver::context::ReadContext,
            ) -> Result<(), $crate::error::Error> {
                $crate::serializer::object::merge_object(self, context)
            }

            #[inline]
            fn skein_size(
                &self,
                context: &mut $crate::resolver::context::WriteContext,
            ) -> Result<usize, $crate::error::Error> {
                $crate::serializer::object::object_size(self, context)
            }

            #[inline(always)]
            fn skein_is_reference() -> bool {
                <$ty as $crate::serializer::object::Object>::KIND
                    == $crate::types::TypeKind::Class
            }
        }
    )+};
}
