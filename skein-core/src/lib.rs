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
//! # Skein Core
//!
//! The engine behind `skein`: a compact binary object-graph codec with a
//! stable per-type id, inheritance-aware polymorphism and an in-place
//! "merge" decode mode that preserves object identity.
//!
//! ## Architecture
//!
//! - **`skein`**: the engine, its builder and the public calls
//! - **`global`**: write-once process-wide engine
//! - **`buffer`**: little-endian [`Writer`] and bounds-checked [`Reader`]
//! - **`meta`**: type declarations, type-name parsing and the type graph
//! - **`resolver`**: id table, per-call contexts and the writer pool
//! - **`serializer`**: the [`Serializer`](serializer::Serializer) trait and every codec
//! - **`types`**: sentinel ids, type kinds and type-id hashing
//! - **`config`**: engine settings
//! - **`error`**: error taxonomy
//! - **`util`**: spinlock
//!
//! ## Wire format
//!
//! There is no embedded schema. Integers and floats are fixed-width little
//! endian. The `u16` ids `0..=3` are reserved sentinels:
//!
//! | Id | Meaning | Followed by |
//! |----|---------|-------------|
//! | 0 | `Null` | nothing |
//! | 1 | `String` | `i32` length, then UTF-16 units or UTF-8 bytes |
//! | 2 | `Collection` | `i32` count, then the elements |
//! | 3 | `Nullable` | a present value type |
//!
//! Objects of class kind start with their own id (4 and above) followed by
//! their members; struct-kind objects are just their members.
//!
//! ## Usage
//!
//! ```rust
//! use skein_core::impl_object;
//! use skein_core::serializer::object::{Field, Object, ObjectDescriptor};
//! use skein_core::{Error, Skein};
//!
//! #[derive(Default, Debug, PartialEq)]
//! pub struct Person {
//!     name: String,
//!     scores: Vec<i32>,
//! }
//!
//! impl Object for Person {
//!     fn describe() -> ObjectDescriptor<Self> {
//!         ObjectDescriptor::new()
//!             .field(Field::new("name", |p: &Person| &p.name, |p: &mut Person| &mut p.name))
//!             .field(Field::new("scores", |p: &Person| &p.scores, |p: &mut Person| &mut p.scores))
//!     }
//! }
//!
//! impl_object!(Person);
//!
//! # fn main() -> Result<(), Error> {
//! let skein = Skein::builder().register::<Person>().build()?;
//! let person = Person {
//!     name: "Ada".to_string(),
//!     scores: vec![9, 7],
//! };
//! let bytes = skein.serialize(&person)?;
//! assert_eq!(bytes.len(), skein.precompute_size(&person)?);
//! let back: Person = skein.deserialize(&bytes)?;
//! assert_eq!(back, person);
//! # Ok(())
//! # }
//! ```

pub mod buffer;
pub mod config;
pub mod error;
pub mod global;
pub mod meta;
pub mod resolver;
pub mod serializer;
pub mod skein;
pub mod types;
pub mod util;

pub use buffer::{Reader, Writer};
pub use config::Config;
pub use error::Error;
pub use serializer::{AsAny, MdArray, SkeinDefault, Serializer};
pub use skein::{Skein, SkeinBuilder};
pub use types::{StringEncoding, TypeKind, Visibility};
