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

//! Process-wide engine.
//!
//! Written at most once, eagerly with [`install`] or on first use with
//! [`get_or_install`]. Concurrent first calls race on the cell, exactly one
//! builder runs, and the engine is read-only from then on.

use crate::error::Error;
use crate::skein::{Skein, SkeinBuilder};
use once_cell::sync::OnceCell;

static ENGINE: OnceCell<Skein> = OnceCell::new();

/// Builds and installs the global engine.
///
/// # Errors
///
/// Fails with a build error if `builder` does, and with
/// [`Error::NotAllowed`] if an engine is already installed.
pub fn install(builder: SkeinBuilder) -> Result<&'static Skein, Error> {
    let mut built_here = false;
    let engine = ENGINE.get_or_try_init(|| {
        built_here = true;
        builder.build()
    })?;
    if !built_here {
        return Err(Error::not_allowed("the global engine is already installed"));
    }
    log::debug!("global skein engine installed");
    Ok(engine)
}

/// The installed engine, or, if there is none yet, the one built from
/// `make_builder`.
pub fn get_or_install(make_builder: impl FnOnce() -> SkeinBuilder) -> Result<&'static Skein, Error> {
    ENGINE.get_or_try_init(|| make_builder().build())
}

pub fn get() -> Result<&'static Skein, Error> {
    ENGINE
        .get()
        .ok_or_else(|| Error::not_allowed("the global engine has not been installed"))
}

pub fn is_installed() -> bool {
    ENGINE.get().is_some()
}
