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

use skein::Skein;
use tests::Node;

fn chain(depth: usize) -> Node {
    let mut node = Node::leaf(0);
    for i in 1..depth {
        node = Node {
            value: i as i32,
            label: String::new(),
            children: vec![node],
        };
    }
    node
}

fn shallow_engine(max_depth: u32) -> Skein {
    tests::builder().max_depth(max_depth).build().unwrap()
}

#[test]
fn test_depth_within_limit() {
    let skein = shallow_engine(5);
    let value = chain(5);
    let bytes = skein.serialize(&value).unwrap();
    assert_eq!(skein.deserialize::<Node>(&bytes).unwrap(), value);
}

#[test]
fn test_encode_depth_exceeded() {
    if skein_core::error::should_panic_on_error() {
        return;
    }
    let skein = shallow_engine(4);
    let err = skein.serialize(&chain(5)).unwrap_err();
    assert!(err.is_wire_format(), "{err}");
    assert!(skein.precompute_size(&chain(5)).is_err());
}

#[test]
fn test_decode_depth_exceeded() {
    if skein_core::error::should_panic_on_error() {
        return;
    }
    let bytes = tests::skein().serialize(&chain(10)).unwrap();
    let err = shallow_engine(3).deserialize::<Node>(&bytes).unwrap_err();
    assert!(err.is_wire_format(), "{err}");
}
