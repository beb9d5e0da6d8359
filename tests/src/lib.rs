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

//! Types shared by the integration tests.

use skein::prelude::*;
use skein::Visibility;
use std::collections::HashMap;
use std::rc::Rc;
use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};

pub trait Animal: AsAny {
    fn name(&self) -> &str;
    fn sound(&self) -> String;
}

impl std::fmt::Debug for dyn Animal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animal").field("name", &self.name()).finish()
    }
}

/// Concrete type behind a trait object.
pub fn downcast<T: 'static>(animal: &dyn Animal) -> Option<&T> {
    animal.as_any().downcast_ref::<T>()
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Dog {
    pub name: String,
    pub age: i32,
}

impl Animal for Dog {
    fn name(&self) -> &str {
        &self.name
    }

    fn sound(&self) -> String {
        "woof".to_string()
    }
}

impl Object for Dog {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .implements::<dyn Animal>()
            .allow_inheritance()
            .field(Field::new("name", |d: &Dog| &d.name, |d: &mut Dog| &mut d.name).index(0))
            .field(Field::new("age", |d: &Dog| &d.age, |d: &mut Dog| &mut d.age).index(1))
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Puppy {
    pub dog: Dog,
    pub toy: String,
}

impl Animal for Puppy {
    fn name(&self) -> &str {
        &self.dog.name
    }

    fn sound(&self) -> String {
        "yip".to_string()
    }
}

impl Object for Puppy {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .base(|p: &Puppy| &p.dog, |p: &mut Puppy| &mut p.dog)
            .field(Field::new("toy", |p: &Puppy| &p.toy, |p: &mut Puppy| &mut p.toy).index(2))
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Cat {
    pub name: String,
    pub lives: u8,
}

impl Animal for Cat {
    fn name(&self) -> &str {
        &self.name
    }

    fn sound(&self) -> String {
        "meow".to_string()
    }
}

impl Object for Cat {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .implements::<dyn Animal>()
            .field(Field::new("name", |c: &Cat| &c.name, |c: &mut Cat| &mut c.name))
            .field(Field::new("lives", |c: &Cat| &c.lives, |c: &mut Cat| &mut c.lives))
    }
}

#[derive(Default)]
pub struct Shelter {
    pub animals: Vec<Option<Box<dyn Animal>>>,
    pub mascot: Option<Box<dyn Animal>>,
}

impl Object for Shelter {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .field(Field::new("animals", |s: &Shelter| &s.animals, |s: &mut Shelter| &mut s.animals))
            .field(Field::new("mascot", |s: &Shelter| &s.mascot, |s: &mut Shelter| &mut s.mascot))
    }
}

/// Value type: no id header, never null.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Object for Point {
    const KIND: TypeKind = TypeKind::Struct;

    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .field(Field::new("x", |p: &Point| &p.x, |p: &mut Point| &mut p.x))
            .field(Field::new("y", |p: &Point| &p.y, |p: &mut Point| &mut p.y))
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Node {
    pub value: i32,
    pub label: String,
    pub children: Vec<Node>,
}

impl Node {
    pub fn leaf(value: i32) -> Node {
        Node {
            value,
            label: format!("n{value}"),
            children: Vec::new(),
        }
    }
}

impl Object for Node {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .field(Field::new("value", |n: &Node| &n.value, |n: &mut Node| &mut n.value))
            .field(Field::new("label", |n: &Node| &n.label, |n: &mut Node| &mut n.label))
            .field(Field::new("children", |n: &Node| &n.children, |n: &mut Node| &mut n.children))
    }
}

/// Counts how often the construction hook of [`Pooled`] ran.
pub static POOLED_CREATED: AtomicUsize = AtomicUsize::new(0);

#[derive(Default, Debug, PartialEq)]
pub struct Pooled {
    pub id: i64,
    pub from_pool: bool,
}

impl Pooled {
    fn rent() -> Pooled {
        POOLED_CREATED.fetch_add(1, Ordering::SeqCst);
        Pooled {
            id: 0,
            from_pool: true,
        }
    }
}

impl Object for Pooled {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .allow_inheritance()
            .construct_with(Pooled::rent)
            .field(Field::new("id", |p: &Pooled| &p.id, |p: &mut Pooled| &mut p.id))
    }
}

/// Derives from [`Pooled`] without declaring a hook of its own.
#[derive(Default, Debug, PartialEq)]
pub struct PooledChild {
    pub base: Pooled,
    pub extra: i32,
}

impl Object for PooledChild {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .base(|c: &PooledChild| &c.base, |c: &mut PooledChild| &mut c.base)
            .field(Field::new("extra", |c: &PooledChild| &c.extra, |c: &mut PooledChild| &mut c.extra))
    }
}

#[derive(Default, Debug, PartialEq)]
pub struct Holder {
    pub pooled: Option<Pooled>,
    pub shared: Rc<RefCell<Node>>,
}

impl Object for Holder {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .field(Field::new("pooled", |h: &Holder| &h.pooled, |h: &mut Holder| &mut h.pooled))
            .field(Field::new("shared", |h: &Holder| &h.shared, |h: &mut Holder| &mut h.shared))
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Inventory {
    pub grid: MdArray<i32>,
    pub tags: HashMap<String, Vec<Vec<i32>>>,
    pub notes: String,
    pub secret: String,
    pub cache: Vec<u8>,
}

impl Object for Inventory {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .field(Field::new("grid", |i: &Inventory| &i.grid, |i: &mut Inventory| &mut i.grid))
            .field(Field::new("tags", |i: &Inventory| &i.tags, |i: &mut Inventory| &mut i.tags))
            .field(Field::new("notes", |i: &Inventory| &i.notes, |i: &mut Inventory| &mut i.notes).utf8())
            .field(
                Field::new("secret", |i: &Inventory| &i.secret, |i: &mut Inventory| &mut i.secret)
                    .visibility(Visibility::Private),
            )
            .field(Field::new("cache", |i: &Inventory| &i.cache, |i: &mut Inventory| &mut i.cache).ignore())
    }
}

register_trait_type!(Animal, Dog, Puppy, Cat);
impl_object!(Dog, Puppy, Cat, Shelter, Point, Node, Pooled, PooledChild, Holder, Inventory);

/// Builder with every fixture type registered.
pub fn builder() -> SkeinBuilder {
    Skein::builder()
        .register_interface::<dyn Animal>()
        .register::<Dog>()
        .register::<Puppy>()
        .register::<Cat>()
        .register::<Shelter>()
        .register::<Point>()
        .register::<Node>()
        .register::<Pooled>()
        .register::<PooledChild>()
        .register::<Holder>()
        .register::<Inventory>()
}

pub fn skein() -> Skein {
    builder().build().unwrap()
}

pub fn permissive_skein() -> Skein {
    builder().permissive(true).build().unwrap()
}
