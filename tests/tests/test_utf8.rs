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

use skein::{Skein, StringEncoding};
use tests::Inventory;

#[test]
fn test_utf8_member_overrides_engine_default() {
    let skein = tests::skein();
    let inventory = Inventory {
        notes: "añb".to_string(),
        ..Default::default()
    };
    let bytes = skein.serialize(&inventory).unwrap();
    // the utf-8 payload of "añb" is 4 bytes, its utf-16 payload 6
    let utf8 = [1u8, 0, 4, 0, 0, 0, b'a', 0xc3, 0xb1, b'b'];
    assert!(bytes.windows(utf8.len()).any(|w| w == utf8));
    assert_eq!(skein.precompute_size(&inventory).unwrap(), bytes.len());
    assert_eq!(skein.deserialize::<Inventory>(&bytes).unwrap().notes, "añb");
}

#[test]
fn test_other_members_keep_engine_encoding() {
    let skein = tests::skein();
    let mut inventory = Inventory::default();
    inventory.tags.insert("ключ".to_string(), vec![vec![1]]);
    let bytes = skein.serialize(&inventory).unwrap();
    let key: Vec<u8> = "ключ".encode_utf16().flat_map(u16::to_le_bytes).collect();
    assert!(bytes.windows(key.len()).any(|w| w == key.as_slice()));
    let back: Inventory = skein.deserialize(&bytes).unwrap();
    assert_eq!(back.tags["ключ"], [vec![1]]);
}

#[test]
fn test_mismatched_encoding_is_detected() {
    if skein_core::error::should_panic_on_error() {
        return;
    }
    let utf16 = Skein::builder().build().unwrap();
    let utf8 = Skein::builder()
        .string_encoding(StringEncoding::Utf8)
        .build()
        .unwrap();
    let bytes = utf8.serialize(&"abc".to_string()).unwrap();
    assert!(utf16.deserialize::<String>(&bytes).is_err());
    let bytes = utf8.serialize(&"\u{e9}".to_string()).unwrap();
    assert!(utf16.deserialize::<String>(&bytes).unwrap_err().is_wire_format());
}
