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
use skein_core::resolver::context::{ReadContext, WriteContext};
use std::sync::Mutex;

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Rgb(u8, u8, u8);

#[derive(Default)]
pub struct HexFormatter;

impl Formatter<Rgb> for HexFormatter {
    fn write(&self, value: &Rgb, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_bytes(&[value.0, value.1, value.2]);
        Ok(())
    }

    fn read(&self, context: &mut ReadContext) -> Result<Rgb, Error> {
        let raw = context.reader.read_bytes(3)?;
        Ok(Rgb(raw[0], raw[1], raw[2]))
    }
}

impl_formatted!(Rgb => HexFormatter);

/// Stores a temperature as whole tenths of a degree.
#[derive(Default)]
pub struct TenthsFormatter;

impl Formatter<f64> for TenthsFormatter {
    fn write(&self, value: &f64, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_i16((value * 10.0).round() as i16);
        Ok(())
    }

    fn read(&self, context: &mut ReadContext) -> Result<f64, Error> {
        Ok(f64::from(context.reader.read_i16()?) / 10.0)
    }

    fn size(&self, _: &f64, _: &mut WriteContext) -> Result<usize, Error> {
        Ok(2)
    }
}

/// Opaque to the type graph: only the formatter knows how to encode it.
#[derive(Default, Debug, PartialEq)]
pub struct Secret(String);

#[derive(Default)]
pub struct ReversedFormatter;

impl Formatter<Secret> for ReversedFormatter {
    fn write(&self, value: &Secret, context: &mut WriteContext) -> Result<(), Error> {
        let reversed: String = value.0.chars().rev().collect();
        reversed.skein_write(context)
    }

    fn read(&self, context: &mut ReadContext) -> Result<Secret, Error> {
        let reversed = String::skein_read(context)?;
        Ok(Secret(reversed.chars().rev().collect()))
    }
}

#[derive(Default, Debug, PartialEq)]
pub struct Reading {
    pub color: Rgb,
    pub colors: Vec<Rgb>,
    pub celsius: f64,
    pub secret: Secret,
}

impl Object for Reading {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new()
            .field(Field::new("color", |r: &Reading| &r.color, |r: &mut Reading| &mut r.color))
            .field(Field::new("colors", |r: &Reading| &r.colors, |r: &mut Reading| &mut r.colors))
            .field(Field::with_formatter::<f64, TenthsFormatter>(
                "celsius",
                |r: &Reading| &r.celsius,
                |r: &mut Reading| &mut r.celsius,
            ))
            .field(Field::with_formatter::<Secret, ReversedFormatter>(
                "secret",
                |r: &Reading| &r.secret,
                |r: &mut Reading| &mut r.secret,
            ))
    }
}

impl_object!(Reading);

fn reading() -> Reading {
    Reading {
        color: Rgb(1, 2, 3),
        colors: vec![Rgb(4, 5, 6), Rgb(7, 8, 9)],
        celsius: 21.5,
        secret: Secret("abc".to_string()),
    }
}

#[test]
fn test_formatted_type() {
    let skein = Skein::builder().build().unwrap();
    assert_eq!(skein.serialize(&Rgb(10, 20, 30)).unwrap(), [10, 20, 30]);
    assert_eq!(skein.deserialize::<Rgb>(&[1, 2, 3]).unwrap(), Rgb(1, 2, 3));
    // the default size comes from a scratch encoding
    assert_eq!(skein.precompute_size(&Rgb(0, 0, 0)).unwrap(), 3);
}

#[test]
fn test_formatted_members() {
    let skein = Skein::builder().register::<Reading>().build().unwrap();
    let value = reading();
    let bytes = skein.serialize(&value).unwrap();
    assert_eq!(skein.precompute_size(&value).unwrap(), bytes.len());
    // id, color, colors, celsius, secret
    assert_eq!(bytes.len(), 2 + 3 + (6 + 6) + 2 + (6 + 6));
    assert_eq!(&bytes[2..5], &[1, 2, 3]);
    assert_eq!(&bytes[17..19], &215i16.to_le_bytes());
    assert_eq!(&bytes[25..], &[b'c', 0, b'b', 0, b'a', 0]);
    assert_eq!(skein.deserialize::<Reading>(&bytes).unwrap(), value);
}

#[test]
fn test_formatter_owns_the_member_type() {
    let skein = Skein::builder().register::<Reading>().build().unwrap();
    let name = skein_core::types::normalize_type_name(std::any::type_name::<Reading>());
    let members = skein.registry().graph().members_of(&name);
    let secret = members.iter().find(|m| m.name == "secret").unwrap();
    assert!(secret.formatter.as_deref().unwrap().ends_with("ReversedFormatter"));
    assert!(secret.type_ref.is_none());
}

#[derive(Default, Debug, PartialEq)]
pub struct Memo {
    pub body: Secret,
}

impl Object for Memo {
    fn describe() -> ObjectDescriptor<Self> {
        ObjectDescriptor::new().field(
            Field::with_formatter::<Secret, ReversedFormatter>(
                "body",
                |m: &Memo| &m.body,
                |m: &mut Memo| &mut m.body,
            )
            .utf8(),
        )
    }
}

impl_object!(Memo);

#[test]
fn test_default_size_keeps_member_encoding() {
    let skein = Skein::builder().register::<Memo>().build().unwrap();
    let value = Memo {
        body: Secret("hello".to_string()),
    };
    let bytes = skein.serialize(&value).unwrap();
    // id, then a utf8 string header and five bytes
    assert_eq!(bytes.len(), 2 + 6 + 5);
    assert_eq!(&bytes[8..], b"olleh");
    assert_eq!(skein.precompute_size(&value).unwrap(), bytes.len());
    assert_eq!(skein.deserialize::<Memo>(&bytes).unwrap(), value);
}

struct CapturedLog(Mutex<Vec<(log::Level, String)>>);

impl log::Log for CapturedLog {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        self.0
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static CAPTURED: CapturedLog = CapturedLog(Mutex::new(Vec::new()));

#[test]
fn test_formatted_member_types_build_quietly() {
    log::set_logger(&CAPTURED).unwrap();
    log::set_max_level(log::LevelFilter::Debug);
    Skein::builder().register::<Reading>().build().unwrap();
    let records = CAPTURED.0.lock().unwrap();
    let about_rgb: Vec<_> = records.iter().filter(|(_, msg)| msg.contains("Rgb")).collect();
    assert!(!about_rgb.is_empty());
    assert!(about_rgb.iter().all(|(level, _)| *level == log::Level::Debug));
}
