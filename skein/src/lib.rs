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
//! # Skein
//!
//! Skein is a compact binary serialization engine for typed object graphs.
//! It targets services that encode and decode the same schema on both
//! ends and care about latency and allocations more than about
//! self-describing data.
//!
//! ## Key Features
//!
//! - **Stable type ids**: every registered type gets a `u16` id hashed from
//!   its fully-qualified name, so the wire needs no embedded schema
//! - **Polymorphism**: `Box<dyn Trait>` and `Vec<Box<dyn Trait>>` round-trip
//!   their concrete types, and decoding into an unrelated type is an error
//! - **Merge**: decode onto an existing value and keep the identity of
//!   every element and object that survives
//! - **Collections of any shape**: lists, maps, sets, heaps, concurrent maps
//!   and rectangular arrays of any rank, with a block-copy fast path for
//!   primitive elements
//! - **Custom formatters** for members or whole types
//! - **Version tolerance**: an opt-in permissive mode that lets members be
//!   added or removed between versions
//!
//! ## Describing types
//!
//! A type becomes encodable by implementing [`Object`]: a list of members
//! with accessor closures, plus optional inheritance, ids and hooks.
//!
//! ```rust
//! use skein::prelude::*;
//! use std::collections::HashMap;
//!
//! #[derive(Default, Debug, PartialEq)]
//! pub struct Address {
//!     street: String,
//!     city: String,
//! }
//!
//! impl Object for Address {
//!     fn describe() -> ObjectDescriptor<Self> {
//!         ObjectDescriptor::new()
//!             .field(Field::new("street", |a: &Address| &a.street, |a: &mut Address| &mut a.street))
//!             .field(Field::new("city", |a: &Address| &a.city, |a: &mut Address| &mut a.city))
//!     }
//! }
//!
//! #[derive(Default, Debug, PartialEq)]
//! pub struct Person {
//!     name: String,
//!     age: i32,
//!     address: Option<Address>,
//!     metadata: HashMap<String, String>,
//! }
//!
//! impl Object for Person {
//!     fn describe() -> ObjectDescriptor<Self> {
//!         ObjectDescriptor::new()
//!             .field(Field::new("name", |p: &Person| &p.name, |p: &mut Person| &mut p.name).index(0))
//!             .field(Field::new("age", |p: &Person| &p.age, |p: &mut Person| &mut p.age).index(1))
//!             .field(Field::new("address", |p: &Person| &p.address, |p: &mut Person| &mut p.address))
//!             .field(Field::new("metadata", |p: &Person| &p.metadata, |p: &mut Person| &mut p.metadata))
//!     }
//! }
//!
//! impl_object!(Address, Person);
//!
//! # fn main() -> Result<(), Error> {
//! let skein = Skein::builder()
//!     .register::<Address>()
//!     .register::<Person>()
//!     .build()?;
//!
//! let person = Person {
//!     name: "John Doe".to_string(),
//!     age: 30,
//!     address: Some(Address {
//!         street: "123 Main St".to_string(),
//!         city: "New York".to_string(),
//!     }),
//!     metadata: HashMap::from([("level".to_string(), "senior".to_string())]),
//! };
//!
//! let bytes = skein.serialize(&person)?;
//! let back: Person = skein.deserialize(&bytes)?;
//! assert_eq!(person, back);
//! # Ok(())
//! # }
//! ```
//!
//! ## Merging
//!
//! [`Skein::merge`] decodes onto an existing value. List elements at
//! surviving indices stay where they are and are updated in place.
//!
//! ```rust
//! use skein::Skein;
//!
//! # fn main() -> Result<(), skein::Error> {
//! let skein = Skein::builder().build()?;
//! let bytes = skein.serialize(&vec![vec![1i32, 2], vec![3]])?;
//!
//! let mut existing: Vec<Vec<i32>> = vec![Vec::with_capacity(64), Vec::new(), Vec::new()];
//! let first = existing[0].as_ptr();
//! skein.merge(&bytes, &mut existing)?;
//! assert_eq!(existing, [vec![1, 2], vec![3]]);
//! assert_eq!(existing[0].as_ptr(), first);
//! # Ok(())
//! # }
//! ```
//!
//! ## Polymorphism
//!
//! Traits used as `Box<dyn Trait>` need [`AsAny`] as a supertrait, a
//! registration on the builder and a [`register_trait_type!`] line naming
//! the implementors.
//!
//! ```rust
//! use skein::prelude::*;
//!
//! pub trait Animal: AsAny {
//!     fn speak(&self) -> String;
//! }
//!
//! #[derive(Default)]
//! pub struct Dog {
//!     name: String,
//! }
//!
//! #[derive(Default)]
//! pub struct Cat {
//!     lives: u8,
//! }
//!
//! impl Animal for Dog {
//!     fn speak(&self) -> String {
//!         format!("{}: woof", self.name)
//!     }
//! }
//!
//! impl Animal for Cat {
//!     fn speak(&self) -> String {
//!         format!("meow x{}", self.lives)
//!     }
//! }
//!
//! impl Object for Dog {
//!     fn describe() -> ObjectDescriptor<Self> {
//!         ObjectDescriptor::new()
//!             .implements::<dyn Animal>()
//!             .field(Field::new("name", |d: &Dog| &d.name, |d: &mut Dog| &mut d.name))
//!     }
//! }
//!
//! impl Object for Cat {
//!     fn describe() -> ObjectDescriptor<Self> {
//!         ObjectDescriptor::new()
//!             .implements::<dyn Animal>()
//!             .field(Field::new("lives", |c: &Cat| &c.lives, |c: &mut Cat| &mut c.lives))
//!     }
//! }
//!
//! impl_object!(Dog, Cat);
//! register_trait_type!(Animal, Dog, Cat);
//!
//! # fn main() -> Result<(), Error> {
//! let skein = Skein::builder()
//!     .register_interface::<dyn Animal>()
//!     .register::<Dog>()
//!     .register::<Cat>()
//!     .build()?;
//!
//! let zoo: Vec<Box<dyn Animal>> = vec![
//!     Box::new(Dog { name: "Rex".to_string() }),
//!     Box::new(Cat { lives: 9 }),
//! ];
//! let bytes = skein.serialize(&zoo)?;
//! let back: Vec<Box<dyn Animal>> = skein.deserialize(&bytes)?;
//! assert_eq!(back[0].speak(), "Rex: woof");
//! assert_eq!(back[1].speak(), "meow x9");
//! # Ok(())
//! # }
//! ```

pub use skein_core::{
    config::Config, error::Error, global, impl_formatted, impl_object, register_trait_type,
    serializer::formatter::Formatter, serializer::object::Field, serializer::object::Object,
    serializer::object::ObjectDescriptor, types::StringEncoding, types::TypeKind,
    types::Visibility, AsAny, MdArray, Reader, Serializer, Skein, SkeinBuilder, SkeinDefault,
    Writer,
};

/// Everything needed to describe and register types.
pub mod prelude {
    pub use crate::{
        impl_formatted, impl_object, register_trait_type, AsAny, Error, Field, Formatter,
        MdArray, Object, ObjectDescriptor, Serializer, Skein, SkeinBuilder, TypeKind,
    };
}
