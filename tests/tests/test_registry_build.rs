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

use skein::prelude::*;
use skein::Visibility;
use skein_core::types::normalize_type_name;

#[derive(Default, Debug, PartialEq)]
pub struct Sealed {
    pub a: i32,
}

impl Object for Sealed {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .named("reg::Sealed")
            .field(Field::new("a", |s: &Sealed| &s.a, |s: &mut Sealed| &mut s.a))
    }
}

#[derive(Default, Debug, PartialEq)]
pub struct FromSealed {
    pub base: Sealed,
}

impl Object for FromSealed {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .named("reg::FromSealed")
            .base(|s: &FromSealed| &s.base, |s: &mut FromSealed| &mut s.base)
    }
}

#[derive(Default, Debug, PartialEq)]
pub struct Twice {
    pub a: i32,
    pub b: i32,
}

impl Object for Twice {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .named("reg::Twice")
            .field(Field::new("a", |t: &Twice| &t.a, |t: &mut Twice| &mut t.a).index(1))
            .field(Field::new("b", |t: &Twice| &t.b, |t: &mut Twice| &mut t.b).index(1))
    }
}

#[derive(Default, Debug, PartialEq)]
pub struct Hidden;

impl Object for Hidden {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .named("reg::Hidden")
            .visibility(Visibility::Crate)
    }
}

#[derive(Default, Debug, PartialEq)]
pub struct Reserved;

impl Object for Reserved {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new().named("reg::Reserved").id(2)
    }
}

#[derive(Default, Debug, PartialEq)]
pub struct First;

impl Object for First {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new().named("reg::First").id(500)
    }
}

#[derive(Default, Debug, PartialEq)]
pub struct Second;

impl Object for Second {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new().named("reg::Second").id(500)
    }
}

#[derive(Default, Debug, PartialEq)]
pub struct Conflicted {
    pub a: i32,
}

impl Object for Conflicted {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .named("reg::Conflicted")
            .field(Field::new("a", |c: &Conflicted| &c.a, |c: &mut Conflicted| &mut c.a).ignore().include())
    }
}

/// Mixes explicit indices with declaration order.
#[derive(Default, Debug, PartialEq)]
pub struct Ordered {
    pub late: u8,
    pub first: u8,
    pub early: u8,
    pub second: u8,
}

impl Object for Ordered {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .named("reg::Ordered")
            .field(Field::new("late", |o: &Ordered| &o.late, |o: &mut Ordered| &mut o.late))
            .field(Field::new("second", |o: &Ordered| &o.second, |o: &mut Ordered| &mut o.second).index(1))
            .field(Field::new("early", |o: &Ordered| &o.early, |o: &mut Ordered| &mut o.early))
            .field(Field::new("first", |o: &Ordered| &o.first, |o: &mut Ordered| &mut o.first).index(0))
    }
}

#[derive(Default, Debug, PartialEq)]
pub struct Selective {
    pub indexed: i32,
    pub included: i32,
    pub skipped: i32,
    pub private: i32,
}

impl Object for Selective {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .named("reg::Selective")
            .auto_collect(false)
            .field(Field::new("indexed", |s: &Selective| &s.indexed, |s: &mut Selective| &mut s.indexed).index(0))
            .field(Field::new("included", |s: &Selective| &s.included, |s: &mut Selective| &mut s.included).include())
            .field(Field::new("skipped", |s: &Selective| &s.skipped, |s: &mut Selective| &mut s.skipped))
            .field(
                Field::new("private", |s: &Selective| &s.private, |s: &mut Selective| &mut s.private)
                    .include()
                    .visibility(Visibility::Private),
            )
    }
}

#[derive(Default, Debug, PartialEq)]
pub struct Opened {
    pub private: i32,
}

impl Object for Opened {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .named("reg::Opened")
            .non_public_members()
            .field(
                Field::new("private", |o: &Opened| &o.private, |o: &mut Opened| &mut o.private)
                    .visibility(Visibility::Private),
            )
    }
}

#[derive(Default, Debug, PartialEq)]
pub struct Client {
    pub name: String,
}

impl Object for Client {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .named("crm::Client")
            .field(Field::new("name", |c: &Client| &c.name, |c: &mut Client| &mut c.name))
    }
}

#[derive(Default, Debug, PartialEq)]
pub struct Customer {
    pub name: String,
}

impl Object for Customer {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .named("crm::Customer")
            .former_name("crm::Client")
            .field(Field::new("name", |c: &Customer| &c.name, |c: &mut Customer| &mut c.name))
    }
}

impl_object!(
    Sealed, FromSealed, Twice, Hidden, Reserved, First, Second, Conflicted, Ordered, Selective,
    Opened, Client, Customer
);

fn build_error(builder: SkeinBuilder) -> Error {
    match builder.build() {
        Ok(_) => panic!("build should fail"),
        Err(err) => err,
    }
}

#[test]
fn test_structural_errors_fail_the_build() {
    if skein_core::error::should_panic_on_error() {
        return;
    }
    // base type not registered
    assert!(build_error(Skein::builder().register::<FromSealed>()).is_build());
    // base type does not allow inheritance
    assert!(build_error(Skein::builder().register::<Sealed>().register::<FromSealed>()).is_build());
    assert!(build_error(Skein::builder().register::<Twice>()).is_build());
    assert!(build_error(Skein::builder().register::<Hidden>()).is_build());
    assert!(build_error(Skein::builder().register::<Reserved>()).is_build());
    assert!(build_error(Skein::builder().register::<Conflicted>()).is_build());
}

#[test]
fn test_id_collision() {
    if skein_core::error::should_panic_on_error() {
        return;
    }
    let err = build_error(Skein::builder().register::<First>().register::<Second>());
    assert!(err.is_build());
    assert!(matches!(err, Error::IdCollision { id: 500, .. }), "{err}");
}

#[test]
fn test_registering_twice_is_a_no_op() {
    let skein = Skein::builder()
        .register::<Sealed>()
        .register::<Sealed>()
        .build()
        .unwrap();
    assert_eq!(skein.registry().len(), 1);
    let info = skein.registry().info_of::<Sealed>().unwrap();
    assert_eq!(info.get_type_name(), "reg::Sealed");
    assert_eq!(info.get_type_id(), skein_core::types::type_id_of("reg::Sealed"));
}

#[test]
fn test_explicit_indices_come_first() {
    let skein = Skein::builder().register::<Ordered>().build().unwrap();
    let names: Vec<String> = skein
        .registry()
        .graph()
        .members_of("reg::Ordered")
        .iter()
        .map(|m| m.name.clone())
        .collect();
    assert_eq!(names, ["first", "second", "late", "early"]);

    let value = Ordered {
        late: 3,
        first: 1,
        early: 4,
        second: 2,
    };
    let bytes = skein.serialize(&value).unwrap();
    assert_eq!(&bytes[2..], &[1, 2, 3, 4]);
    assert_eq!(skein.deserialize::<Ordered>(&bytes).unwrap(), value);
}

#[test]
fn test_member_selection() {
    let skein = Skein::builder()
        .register::<Selective>()
        .register::<Opened>()
        .build()
        .unwrap();
    let value = Selective {
        indexed: 1,
        included: 2,
        skipped: 3,
        private: 4,
    };
    let bytes = skein.serialize(&value).unwrap();
    assert_eq!(bytes.len(), 2 + 4 + 4);
    let back: Selective = skein.deserialize(&bytes).unwrap();
    assert_eq!(
        back,
        Selective {
            indexed: 1,
            included: 2,
            skipped: 0,
            private: 0,
        }
    );

    let bytes = skein.serialize(&Opened { private: 9 }).unwrap();
    assert_eq!(skein.deserialize::<Opened>(&bytes).unwrap().private, 9);
}

#[test]
fn test_former_name_still_decodes() {
    let before = Skein::builder().register::<Client>().build().unwrap();
    let bytes = before
        .serialize(&Client {
            name: "acme".to_string(),
        })
        .unwrap();

    let after = Skein::builder().register::<Customer>().build().unwrap();
    let customer: Customer = after.deserialize(&bytes).unwrap();
    assert_eq!(customer.name, "acme");
    // new data carries the new id
    let fresh = after.serialize(&customer).unwrap();
    assert_ne!(fresh[..2], bytes[..2]);
}

#[test]
fn test_unregistered_type_is_misuse() {
    if skein_core::error::should_panic_on_error() {
        return;
    }
    let skein = Skein::builder().build().unwrap();
    assert!(skein.serialize(&Sealed { a: 1 }).unwrap_err().is_misuse());
    assert!(skein.deserialize::<Sealed>(&[0, 0]).unwrap_err().is_misuse());
}

#[test]
fn test_normalized_names() {
    let skein = tests::skein();
    let name = normalize_type_name(std::any::type_name::<tests::Dog>());
    assert_eq!(name, "tests::Dog");
    let graph = skein.registry().graph();
    assert!(graph.is_assignable("tests::Puppy", "tests::Dog"));
    assert!(graph.is_assignable("tests::Puppy", "tests::Animal"));
    assert!(!graph.is_assignable("tests::Cat", "tests::Dog"));
    let subtypes: Vec<&str> = graph.subtypes_of("tests::Dog").map(|n| n.name.as_str()).collect();
    assert_eq!(subtypes, ["tests::Puppy", "tests::Dog"]);
}
