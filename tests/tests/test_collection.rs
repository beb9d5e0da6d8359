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

use dashmap::{DashMap, DashSet};
use skein::prelude::*;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet, LinkedList, VecDeque};
use tests::Node;

#[test]
fn test_vec_header() {
    let skein = Skein::builder().build().unwrap();
    let bytes = skein.serialize(&vec![1i32, 2, 3]).unwrap();
    assert_eq!(
        bytes,
        [2, 0, 3, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0]
    );
    let empty: Vec<i32> = Vec::new();
    assert_eq!(skein.serialize(&empty).unwrap(), [2, 0, 0, 0, 0, 0]);
}

#[test]
fn test_merge_grows_primitive_list() {
    let skein = Skein::builder().build().unwrap();
    let bytes = skein.serialize(&vec![1i32, 2, 3, 4, 5]).unwrap();
    let mut existing = vec![0i32, 0];
    skein.merge(&bytes, &mut existing).unwrap();
    assert_eq!(existing, [1, 2, 3, 4, 5]);

    let shorter = skein.serialize(&vec![9i32]).unwrap();
    skein.merge(&shorter, &mut existing).unwrap();
    assert_eq!(existing, [9]);
}

#[test]
fn test_merge_keeps_boxed_elements() {
    let skein = tests::skein();
    let mut existing: Vec<Box<Node>> = vec![Box::new(Node::leaf(0)), Box::new(Node::leaf(0))];
    let first = &*existing[0] as *const Node;
    let second = &*existing[1] as *const Node;

    let incoming: Vec<Box<Node>> = (1..=4).map(|i| Box::new(Node::leaf(i))).collect();
    let bytes = skein.serialize(&incoming).unwrap();
    skein.merge(&bytes, &mut existing).unwrap();

    assert_eq!(existing, incoming);
    assert_eq!(&*existing[0] as *const Node, first);
    assert_eq!(&*existing[1] as *const Node, second);
}

#[test]
fn test_nested_map_of_lists() {
    let skein = Skein::builder().build().unwrap();
    let mut value: HashMap<String, Vec<Vec<i32>>> = HashMap::new();
    value.insert("empty".to_string(), vec![]);
    value.insert("ragged".to_string(), vec![vec![1], vec![], vec![2, 3, 4]]);
    value.insert("wide".to_string(), vec![(0..100).collect()]);

    let bytes = skein.serialize(&value).unwrap();
    assert_eq!(skein.precompute_size(&value).unwrap(), bytes.len());
    let back: HashMap<String, Vec<Vec<i32>>> = skein.deserialize(&bytes).unwrap();
    assert_eq!(back, value);
    assert_eq!(back["ragged"][2], [2, 3, 4]);
}

#[test]
fn test_map_merge_keeps_surviving_values() {
    let skein = tests::skein();
    let mut existing: HashMap<String, Box<Node>> = HashMap::new();
    existing.insert("kept".to_string(), Box::new(Node::leaf(1)));
    existing.insert("dropped".to_string(), Box::new(Node::leaf(2)));
    let kept = &*existing["kept"] as *const Node;

    let mut incoming: HashMap<String, Box<Node>> = HashMap::new();
    incoming.insert("kept".to_string(), Box::new(Node::leaf(10)));
    incoming.insert("new".to_string(), Box::new(Node::leaf(11)));
    let bytes = skein.serialize(&incoming).unwrap();
    skein.merge(&bytes, &mut existing).unwrap();

    assert_eq!(existing, incoming);
    assert_eq!(&*existing["kept"] as *const Node, kept);
    assert!(!existing.contains_key("dropped"));
}

#[test]
fn test_sequences() {
    let skein = Skein::builder().build().unwrap();
    let deque: VecDeque<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
    let bytes = skein.serialize(&deque).unwrap();
    assert_eq!(skein.deserialize::<VecDeque<String>>(&bytes).unwrap(), deque);
    // same wire shape as a Vec
    assert_eq!(
        skein.deserialize::<Vec<String>>(&bytes).unwrap(),
        ["a", "b", "c"]
    );

    let list: LinkedList<i64> = [1, -1, 3].into_iter().collect();
    let bytes = skein.serialize(&list).unwrap();
    assert_eq!(skein.deserialize::<LinkedList<i64>>(&bytes).unwrap(), list);

    let boxed: Box<[u8]> = vec![1, 2, 3].into_boxed_slice();
    let bytes = skein.serialize(&boxed).unwrap();
    assert_eq!(skein.deserialize::<Box<[u8]>>(&bytes).unwrap(), boxed);
}

#[test]
fn test_sets_and_maps() {
    let skein = Skein::builder().build().unwrap();
    let set: HashSet<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
    let bytes = skein.serialize(&set).unwrap();
    assert_eq!(skein.deserialize::<HashSet<String>>(&bytes).unwrap(), set);

    let ordered: BTreeSet<i32> = [5, 1, 3].into_iter().collect();
    let bytes = skein.serialize(&ordered).unwrap();
    assert_eq!(skein.deserialize::<BTreeSet<i32>>(&bytes).unwrap(), ordered);

    let tree: BTreeMap<i32, Option<String>> =
        [(1, Some("one".to_string())), (2, None)].into_iter().collect();
    let bytes = skein.serialize(&tree).unwrap();
    assert_eq!(skein.deserialize::<BTreeMap<i32, Option<String>>>(&bytes).unwrap(), tree);

    let heap: BinaryHeap<u32> = [4, 9, 1].into_iter().collect();
    let bytes = skein.serialize(&heap).unwrap();
    let back: BinaryHeap<u32> = skein.deserialize(&bytes).unwrap();
    assert_eq!(back.into_sorted_vec(), [1, 4, 9]);
}

#[test]
fn test_concurrent_containers() {
    let skein = Skein::builder().build().unwrap();
    let map: DashMap<String, i32> = DashMap::new();
    map.insert("a".to_string(), 1);
    map.insert("b".to_string(), 2);
    let bytes = skein.serialize(&map).unwrap();
    let back: DashMap<String, i32> = skein.deserialize(&bytes).unwrap();
    assert_eq!(back.len(), 2);
    assert_eq!(*back.get("b").unwrap(), 2);

    let set: DashSet<i32> = DashSet::new();
    set.insert(7);
    let bytes = skein.serialize(&set).unwrap();
    let mut existing: DashSet<i32> = DashSet::new();
    existing.insert(1);
    skein.merge(&bytes, &mut existing).unwrap();
    assert_eq!(existing.len(), 1);
    assert!(existing.contains(&7));
}

#[test]
fn test_negative_count_is_rejected() {
    if skein_core::error::should_panic_on_error() {
        return;
    }
    let skein = Skein::builder().build().unwrap();
    let err = skein
        .deserialize::<Vec<i32>>(&[2, 0, 0xff, 0xff, 0xff, 0xff])
        .unwrap_err();
    assert!(err.is_wire_format());
    // a huge count must not allocate before the data runs out
    let err = skein
        .deserialize::<Vec<String>>(&[2, 0, 0xff, 0xff, 0xff, 0x7f])
        .unwrap_err();
    assert!(err.is_wire_format());
}

/// Encodes to nothing: its only member is ignored.
#[derive(Default, Debug, PartialEq)]
pub struct Marker {
    pub scratch: Vec<u8>,
}

impl Object for Marker {
    const KIND: TypeKind = TypeKind::Struct;

    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new().field(
            Field::new("scratch", |m: &Marker| &m.scratch, |m: &mut Marker| &mut m.scratch)
                .ignore(),
        )
    }
}

impl_object!(Marker);

#[test]
fn test_count_of_zero_width_elements_is_bounded() {
    if skein_core::error::should_panic_on_error() {
        return;
    }
    let skein = Skein::builder().register::<Marker>().build().unwrap();
    assert_eq!(skein.serialize(&Marker::default()).unwrap(), Vec::<u8>::new());

    let mut bytes = vec![2, 0];
    bytes.extend_from_slice(&20_000_000i32.to_le_bytes());
    let err = skein.deserialize::<Vec<Marker>>(&bytes).unwrap_err();
    assert!(err.is_wire_format());

    let mut bytes = vec![2, 0];
    bytes.extend_from_slice(&i32::MAX.to_le_bytes());
    assert!(skein
        .deserialize::<VecDeque<Marker>>(&bytes)
        .unwrap_err()
        .is_wire_format());
    let mut existing = vec![Marker::default()];
    assert!(skein.merge(&bytes, &mut existing).unwrap_err().is_wire_format());

    let empty: Vec<Marker> = Vec::new();
    let bytes = skein.serialize(&empty).unwrap();
    assert!(skein.deserialize::<Vec<Marker>>(&bytes).unwrap().is_empty());
}
