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

//! Codecs.
//!
//! Every encodable type implements [`Serializer`]. The impls in this module
//! cover primitives, strings, date/time types, `Decimal`, collections,
//! multi-dimensional arrays, `Option`, tuples and the smart pointers.
//! User types come in through [`object`], runtime-typed values through
//! [`trait_object`], and custom codecs through [`formatter`].

mod arc;
mod array;
mod bool;
mod box_;
pub mod collection;
mod core;
mod datetime;
mod decimal;
pub mod formatter;
mod heap;
mod list;
mod map;
mod md_array;
mod mutex;
mod number;
pub mod object;
mod option;
mod rc;
mod refcell;
mod set;
mod string;
pub mod trait_object;
mod tuple;
mod util;

pub use self::core::{AsAny, SkeinDefault, Serializer};
pub use md_array::MdArray;
