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

//! Timestamps as fixed-width integers relative to the Unix epoch.

use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::{SkeinDefault, Serializer};
use crate::util::EPOCH;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Utc};

/// Microseconds since the epoch, as `i64`.
impl Serializer for NaiveDateTime {
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_i64(self.and_utc().timestamp_micros());
        Ok(())
    }

    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        let micros = context.reader.read_i64()?;
        DateTime::from_timestamp_micros(micros)
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| Error::invalid_data(format!("timestamp {micros}us is out of range")))
    }

    fn skein_size(&self, _: &mut WriteContext) -> Result<usize, Error> {
        Ok(8)
    }
}

impl Serializer for DateTime<Utc> {
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_i64(self.timestamp_micros());
        Ok(())
    }

    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        let micros = context.reader.read_i64()?;
        DateTime::from_timestamp_micros(micros)
            .ok_or_else(|| Error::invalid_data(format!("timestamp {micros}us is out of range")))
    }

    fn skein_size(&self, _: &mut WriteContext) -> Result<usize, Error> {
        Ok(8)
    }
}

/// Days since the epoch, as `i32`.
impl Serializer for NaiveDate {
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        let days = self.signed_duration_since(EPOCH).num_days();
        context.writer.write_i32(days as i32);
        Ok(())
    }

    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        let days = context.reader.read_i32()?;
        EPOCH
            .checked_add_signed(TimeDelta::days(days as i64))
            .ok_or_else(|| Error::invalid_data(format!("date {days} days from epoch is out of range")))
    }

    fn skein_size(&self, _: &mut WriteContext) -> Result<usize, Error> {
        Ok(4)
    }
}

/// Nanoseconds since midnight, as `i64`.
impl Serializer for NaiveTime {
    fn skein_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        let nanos = self.num_seconds_from_midnight() as i64 * 1_000_000_000 + self.nanosecond() as i64;
        context.writer.write_i64(nanos);
        Ok(())
    }

    fn skein_read(context: &mut ReadContext) -> Result<Self, Error> {
        let nanos = context.reader.read_i64()?;
        let secs = u32::try_from(nanos.div_euclid(1_000_000_000))
            .map_err(|_| Error::invalid_data(format!("time of day {nanos}ns is out of range")))?;
        let frac = nanos.rem_euclid(1_000_000_000) as u32;
        NaiveTime::from_num_seconds_from_midnight_opt(secs, frac)
            .ok_or_else(|| Error::invalid_data(format!("time of day {nanos}ns is out of range")))
    }

    fn skein_size(&self, _: &mut WriteContext) -> Result<usize, Error> {
        Ok(8)
    }
}

impl SkeinDefault for NaiveDateTime {
    fn skein_default() -> Self {
        NaiveDateTime::default()
    }
}

impl SkeinDefault for DateTime<Utc> {
    fn skein_default() -> Self {
        DateTime::<Utc>::default()
    }
}

impl SkeinDefault for NaiveDate {
    fn skein_default() -> Self {
        NaiveDate::default()
    }
}

impl SkeinDefault for NaiveTime {
    fn skein_default() -> Self {
        NaiveTime::default()
    }
}
