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

#[derive(Default, Debug, Clone, PartialEq)]
pub struct PersonV1 {
    pub name: String,
    pub age: i32,
}

impl Object for PersonV1 {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .named("people::Person")
            .field(Field::new("name", |p: &PersonV1| &p.name, |p: &mut PersonV1| &mut p.name))
            .field(Field::new("age", |p: &PersonV1| &p.age, |p: &mut PersonV1| &mut p.age))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonV2 {
    pub name: String,
    pub age: i32,
    pub email: String,
    pub tags: Vec<String>,
}

impl Default for PersonV2 {
    fn default() -> Self {
        PersonV2 {
            name: String::new(),
            age: 0,
            email: "unset".to_string(),
            tags: vec!["unset".to_string()],
        }
    }
}

impl Object for PersonV2 {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .named("people::Person")
            .field(Field::new("name", |p: &PersonV2| &p.name, |p: &mut PersonV2| &mut p.name))
            .field(Field::new("age", |p: &PersonV2| &p.age, |p: &mut PersonV2| &mut p.age))
            .field(Field::new("email", |p: &PersonV2| &p.email, |p: &mut PersonV2| &mut p.email))
            .field(Field::new("tags", |p: &PersonV2| &p.tags, |p: &mut PersonV2| &mut p.tags))
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Team {
    pub lead: PersonV1,
    pub size: u16,
}

impl Object for Team {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .named("people::Team")
            .field(Field::new("lead", |t: &Team| &t.lead, |t: &mut Team| &mut t.lead))
            .field(Field::new("size", |t: &Team| &t.size, |t: &mut Team| &mut t.size))
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct TeamV2 {
    pub lead: PersonV2,
    pub size: u16,
}

impl Object for TeamV2 {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .named("people::Team")
            .field(Field::new("lead", |t: &TeamV2| &t.lead, |t: &mut TeamV2| &mut t.lead))
            .field(Field::new("size", |t: &TeamV2| &t.size, |t: &mut TeamV2| &mut t.size))
    }
}

impl_object!(PersonV1, PersonV2, Team, TeamV2);

fn v1() -> PersonV1 {
    PersonV1 {
        name: "ada".to_string(),
        age: 36,
    }
}

fn v2() -> PersonV2 {
    PersonV2 {
        name: "ada".to_string(),
        age: 36,
        email: "ada@example.com".to_string(),
        tags: vec!["math".to_string()],
    }
}

fn engines(permissive: bool) -> (Skein, Skein) {
    let old = Skein::builder()
        .permissive(permissive)
        .register::<PersonV1>()
        .register::<Team>()
        .build()
        .unwrap();
    let new = Skein::builder()
        .permissive(permissive)
        .register::<PersonV2>()
        .register::<TeamV2>()
        .build()
        .unwrap();
    (old, new)
}

#[test]
fn test_strict_truncated_stream_is_a_wire_error() {
    if skein_core::error::should_panic_on_error() {
        return;
    }
    let (old, new) = engines(false);
    let bytes = old.serialize(&v1()).unwrap();
    let err = new.deserialize::<PersonV2>(&bytes).unwrap_err();
    assert!(err.is_wire_format(), "{err}");
    assert!(err.to_string().contains("email"), "{err}");

    let bytes = new.serialize(&v2()).unwrap();
    assert!(old.deserialize::<PersonV1>(&bytes).unwrap_err().is_wire_format());
}

#[test]
fn test_strict_same_shape_has_no_frame() {
    let (old, _) = engines(false);
    let bytes = old.serialize(&v1()).unwrap();
    // id, "ada" as utf-16, age
    assert_eq!(bytes.len(), 2 + (6 + 6) + 4);
    assert_eq!(old.deserialize::<PersonV1>(&bytes).unwrap(), v1());
}

#[test]
fn test_permissive_new_members_get_defaults() {
    let (old, new) = engines(true);
    let bytes = old.serialize(&v1()).unwrap();
    // id, frame length, members
    assert_eq!(bytes.len(), 2 + 4 + (6 + 6) + 4);
    let back: PersonV2 = new.deserialize(&bytes).unwrap();
    assert_eq!(back.name, "ada");
    assert_eq!(back.age, 36);
    assert_eq!(back.email, "");
    assert!(back.tags.is_empty());
}

#[test]
fn test_permissive_unknown_members_are_skipped() {
    let (old, new) = engines(true);
    let bytes = new.serialize(&v2()).unwrap();
    assert_eq!(old.deserialize::<PersonV1>(&bytes).unwrap(), v1());
}

#[test]
fn test_permissive_nested_objects() {
    let (old, new) = engines(true);
    let team = TeamV2 {
        lead: v2(),
        size: 4,
    };
    let bytes = new.serialize(&team).unwrap();
    assert_eq!(new.precompute_size(&team).unwrap(), bytes.len());
    let back: Team = old.deserialize(&bytes).unwrap();
    assert_eq!(back.lead, v1());
    assert_eq!(back.size, 4);

    let bytes = old.serialize(&back).unwrap();
    let forward: TeamV2 = new.deserialize(&bytes).unwrap();
    assert_eq!(forward.size, 4);
    assert_eq!(forward.lead.email, "");
}

#[test]
fn test_permissive_merge_resets_missing_members() {
    let (old, new) = engines(true);
    let bytes = old.serialize(&v1()).unwrap();
    let mut existing = v2();
    existing.name = "grace".to_string();
    new.merge(&bytes, &mut existing).unwrap();
    assert_eq!(existing.name, "ada");
    assert_eq!(existing.email, "");
}

#[test]
fn test_frame_longer_than_buffer() {
    if skein_core::error::should_panic_on_error() {
        return;
    }
    let (old, _) = engines(true);
    let mut bytes = old.serialize(&v1()).unwrap();
    bytes.truncate(bytes.len() - 1);
    assert!(old.deserialize::<PersonV1>(&bytes).unwrap_err().is_wire_format());
}
