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

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use skein::{Serializer, Skein, StringEncoding};
use std::fmt::Debug;
use std::str::FromStr;

#[test]
fn test_i32_max_is_four_le_bytes() {
    let skein = Skein::builder().build().unwrap();
    let bytes = skein.serialize(&2147483647i32).unwrap();
    assert_eq!(bytes, [0xff, 0xff, 0xff, 0x7f]);
    assert_eq!(skein.deserialize::<i32>(&bytes).unwrap(), 2147483647);
}

fn check<T: Serializer + PartialEq + Debug>(skein: &Skein, value: T) {
    let bytes = skein.serialize(&value).unwrap();
    assert_eq!(bytes.len(), std::mem::size_of::<T>());
    assert_eq!(skein.deserialize::<T>(&bytes).unwrap(), value);
}

#[test]
fn test_numbers() {
    let skein = Skein::builder().build().unwrap();
    check(&skein, -5i8);
    check(&skein, 200u8);
    check(&skein, i16::MIN);
    check(&skein, u16::MAX);
    check(&skein, -7i32);
    check(&skein, u32::MAX);
    check(&skein, i64::MIN);
    check(&skein, u64::MAX);
    check(&skein, i128::MAX);
    check(&skein, u128::MAX);
    check(&skein, 1.25f32);
    check(&skein, -0.1f64);
    assert!(skein.deserialize::<f64>(&skein.serialize(&f64::NAN).unwrap()).unwrap().is_nan());
}

#[test]
fn test_compressed_ints() {
    let skein = Skein::builder().compress_int(true).build().unwrap();
    assert_eq!(skein.serialize(&1i32).unwrap(), [2]);
    assert_eq!(skein.serialize(&-1i64).unwrap(), [1]);
    assert_eq!(skein.serialize(&300u32).unwrap(), [0xac, 0x02]);
    for value in [0i64, i64::MAX, i64::MIN, 1 << 35] {
        let bytes = skein.serialize(&value).unwrap();
        assert_eq!(skein.deserialize::<i64>(&bytes).unwrap(), value);
        assert_eq!(skein.precompute_size(&value).unwrap(), bytes.len());
    }
    // collections keep their fixed-width block
    let bytes = skein.serialize(&vec![1i32, 2]).unwrap();
    assert_eq!(bytes.len(), 2 + 4 + 8);
}

#[test]
fn test_bool_and_char() {
    let skein = Skein::builder().build().unwrap();
    assert_eq!(skein.serialize(&true).unwrap(), [1]);
    assert!(skein.deserialize::<bool>(&[1]).unwrap());
    if !skein_core::error::should_panic_on_error() {
        assert!(skein.deserialize::<bool>(&[2]).unwrap_err().is_wire_format());
    }
    for c in ['a', 'é', '中', '🦀'] {
        let bytes = skein.serialize(&c).unwrap();
        assert_eq!(skein.deserialize::<char>(&bytes).unwrap(), c);
    }
}

#[test]
fn test_strings() {
    let utf16 = Skein::builder().build().unwrap();
    let bytes = utf16.serialize(&"hi".to_string()).unwrap();
    assert_eq!(bytes, [1, 0, 2, 0, 0, 0, b'h', 0, b'i', 0]);

    let utf8 = Skein::builder()
        .string_encoding(StringEncoding::Utf8)
        .build()
        .unwrap();
    let bytes = utf8.serialize(&"hi".to_string()).unwrap();
    assert_eq!(bytes, [1, 0, 2, 0, 0, 0, b'h', b'i']);

    for skein in [&utf16, &utf8] {
        for s in ["", "plain", "grüße", "日本語", "🦀 crab"] {
            let bytes = skein.serialize(&s.to_string()).unwrap();
            assert_eq!(skein.deserialize::<String>(&bytes).unwrap(), s);
            assert_eq!(skein.precompute_size(&s.to_string()).unwrap(), bytes.len());
        }
    }
}

#[test]
fn test_options() {
    let skein = Skein::builder().build().unwrap();
    let none: Option<String> = None;
    assert_eq!(skein.serialize(&none).unwrap(), [0, 0]);
    assert_eq!(skein.deserialize::<Option<String>>(&[0, 0]).unwrap(), None);

    // a string header doubles as the presence marker
    let some = Some("a".to_string());
    assert_eq!(skein.serialize(&some).unwrap(), skein.serialize(&"a".to_string()).unwrap());

    let number = Some(7i32);
    let bytes = skein.serialize(&number).unwrap();
    assert_eq!(bytes, [3, 0, 7, 0, 0, 0]);
    assert_eq!(skein.deserialize::<Option<i32>>(&bytes).unwrap(), number);
    assert_eq!(skein.deserialize::<Option<i32>>(&[0, 0]).unwrap(), None);

    if skein_core::error::should_panic_on_error() {
        return;
    }
    let err = skein.deserialize::<String>(&[0, 0]).unwrap_err();
    assert!(err.is_type_mismatch());
}

#[test]
fn test_temporal_and_decimal() {
    let skein = Skein::builder().build().unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let time = NaiveTime::from_hms_micro_opt(23, 59, 58, 123_456).unwrap();
    let stamp = NaiveDateTime::new(date, time);
    let utc: DateTime<Utc> = stamp.and_utc();
    let price = Decimal::from_str("-1234.5678").unwrap();

    let value = (date, time, stamp, utc, price);
    let bytes = skein.serialize(&value).unwrap();
    assert_eq!(skein.precompute_size(&value).unwrap(), bytes.len());
    let back: (NaiveDate, NaiveTime, NaiveDateTime, DateTime<Utc>, Decimal) =
        skein.deserialize(&bytes).unwrap();
    assert_eq!(back, value);
}

#[test]
fn test_tuples_and_arrays() {
    let skein = Skein::builder().build().unwrap();
    let value = (1u8, "two".to_string(), 3.0f64, Some(4i64));
    let bytes = skein.serialize(&value).unwrap();
    assert_eq!(skein.deserialize::<(u8, String, f64, Option<i64>)>(&bytes).unwrap(), value);

    let array = [[1i16, 2], [3, 4], [5, 6]];
    let bytes = skein.serialize(&array).unwrap();
    assert_eq!(skein.deserialize::<[[i16; 2]; 3]>(&bytes).unwrap(), array);
    if !skein_core::error::should_panic_on_error() {
        assert!(skein.deserialize::<[[i16; 2]; 2]>(&bytes).is_err());
    }
}

#[test]
fn test_trailing_bytes_are_rejected() {
    if skein_core::error::should_panic_on_error() {
        return;
    }
    let skein = Skein::builder().build().unwrap();
    let mut bytes = skein.serialize(&5i32).unwrap();
    bytes.push(0);
    assert!(skein.deserialize::<i32>(&bytes).unwrap_err().is_wire_format());
}
