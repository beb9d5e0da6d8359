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

use std::any::Any;
use tests::{Cat, Dog, Node, Point};

#[test]
fn test_any_round_trip() {
    let skein = tests::skein();
    let dog = Dog {
        name: "rex".to_string(),
        age: 2,
    };
    let bytes = skein.serialize_any(&dog).unwrap();
    let back = skein.deserialize_any(&bytes).unwrap();
    assert_eq!(back.downcast_ref::<Dog>(), Some(&dog));

    // struct kinds get an id too when their type is only known at run time
    let point = Point { x: 3.0, y: 4.0 };
    let bytes = skein.serialize_any(&point).unwrap();
    assert_eq!(bytes.len(), 2 + 8);
    let back = skein.deserialize_any(&bytes).unwrap();
    assert_eq!(back.downcast_ref::<Point>(), Some(&point));
}

#[test]
fn test_heterogeneous_list() {
    let skein = tests::skein();
    let items: Vec<Box<dyn Any>> = vec![
        Box::new(Node::leaf(1)),
        Box::new(Cat {
            name: "tom".to_string(),
            lives: 7,
        }),
        Box::new(Point { x: 1.0, y: 1.0 }),
    ];
    let bytes = skein.serialize(&items).unwrap();
    assert_eq!(skein.precompute_size(&items).unwrap(), bytes.len());
    let back: Vec<Box<dyn Any>> = skein.deserialize(&bytes).unwrap();
    assert_eq!(back.len(), 3);
    assert_eq!(back[0].downcast_ref::<Node>(), Some(&Node::leaf(1)));
    assert_eq!(back[1].downcast_ref::<Cat>().unwrap().lives, 7);
    assert!(back[2].is::<Point>());
}

#[test]
fn test_unregistered_value_is_misuse() {
    if skein_core::error::should_panic_on_error() {
        return;
    }
    let skein = tests::skein();
    assert!(skein.serialize_any(&5u64).unwrap_err().is_misuse());
    let items: Vec<Box<dyn Any>> = vec![Box::new("text")];
    assert!(skein.serialize(&items).unwrap_err().is_misuse());
    // the default placeholder is not encodable either
    let placeholder: Box<dyn Any> = skein_core::SkeinDefault::skein_default();
    assert!(skein.serialize(&placeholder).unwrap_err().is_misuse());
}

#[test]
fn test_sentinel_instead_of_id() {
    if skein_core::error::should_panic_on_error() {
        return;
    }
    let skein = tests::skein();
    assert!(skein.deserialize_any(&[0, 0]).unwrap_err().is_type_mismatch());
    assert!(skein.deserialize_any(&[2, 0, 0, 0, 0, 0]).unwrap_err().is_wire_format());
}
