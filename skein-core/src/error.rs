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

//! Error taxonomy shared by graph construction, encoding and decoding.
//!
//! Every variant belongs to exactly one of four categories, which callers
//! can test for with the `is_*` predicates:
//!
//! | Category        | Variants                                         |
//! |-----------------|--------------------------------------------------|
//! | build           | [`Error::Build`], [`Error::IdCollision`]         |
//! | wire format     | [`Error::BufferOutOfBound`], [`Error::InvalidData`], [`Error::DepthExceed`] |
//! | type mismatch   | [`Error::TypeMismatch`], [`Error::UnknownTypeId`] |
//! | caller misuse   | [`Error::NotAllowed`]                            |
//!
//! [`Error::Context`] wraps any of the above with the type, member and
//! byte offset at which the failure surfaced. Use [`Error::root`] to look
//! through it.
//!
//! Error constructors sit on the hot path of every read, so they are
//! `#[cold]` and `#[track_caller]`. Always build errors through them.

use std::borrow::Cow;

use thiserror::Error;

/// Set `SKEIN_PANIC_ON_ERROR` at compile time to panic where an error is created.
pub const PANIC_ON_ERROR: bool = option_env!("SKEIN_PANIC_ON_ERROR").is_some();

#[inline(always)]
pub const fn should_panic_on_error() -> bool {
    PANIC_ON_ERROR
}

/// Error type for graph building, serialization and deserialization.
///
/// Do not construct variants directly, use the static constructor
/// functions ([`Error::build`], [`Error::invalid_data`], ...).
///
/// ```bash
/// RUST_BACKTRACE=1 SKEIN_PANIC_ON_ERROR=1 cargo test
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Structural problem found while building the type graph.
    #[error("build error: {0}")]
    Build(Cow<'static, str>),

    /// Two distinct types hash to the same wire id.
    #[error("type id {id} is claimed by both `{first}` and `{second}`")]
    IdCollision {
        id: u16,
        first: String,
        second: String,
    },

    /// Read past the end of the buffer (or of a permissive object frame).
    #[error("buffer out of bound: {0} + {1} > {2}")]
    BufferOutOfBound(usize, usize, usize),

    /// Bytes that cannot describe a value of the requested shape.
    #[error("{0}")]
    InvalidData(Cow<'static, str>),

    /// Nesting deeper than the configured limit.
    #[error("{0}")]
    DepthExceed(Cow<'static, str>),

    /// A decoded id names a type that is not assignable to the requested one.
    #[error("type mismatch: expected `{expected}`, found `{actual}`")]
    TypeMismatch {
        expected: Cow<'static, str>,
        actual: Cow<'static, str>,
    },

    /// A decoded id that no registered codec answers to.
    #[error("no codec registered for type id {0}")]
    UnknownTypeId(u16),

    /// The caller asked for something the engine refuses to do.
    #[error("{0}")]
    NotAllowed(Cow<'static, str>),

    /// Location of an inner error.
    #[error("{source} (at `{type_name}.{member}`{})", at_offset(.offset))]
    Context {
        type_name: Cow<'static, str>,
        member: Cow<'static, str>,
        offset: Option<usize>,
        #[source]
        source: Box<Error>,
    },
}

fn at_offset(offset: &Option<usize>) -> String {
    match offset {
        Some(offset) => format!(", byte {offset}"),
        None => String::new(),
    }
}

impl Error {
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn build<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::Build(s.into());
        if PANIC_ON_ERROR {
            panic!("SKEIN_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn id_collision(id: u16, first: impl Into<String>, second: impl Into<String>) -> Self {
        let err = Error::IdCollision {
            id,
            first: first.into(),
            second: second.into(),
        };
        if PANIC_ON_ERROR {
            panic!("SKEIN_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::BufferOutOfBound`] with the given bounds.
    ///
    /// ```
    /// use skein_core::error::Error;
    ///
    /// let err = Error::buffer_out_of_bound(10, 20, 25);
    /// assert!(err.is_wire_format());
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn buffer_out_of_bound(offset: usize, length: usize, capacity: usize) -> Self {
        let err = Error::BufferOutOfBound(offset, length, capacity);
        if PANIC_ON_ERROR {
            panic!("SKEIN_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_data<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::InvalidData(s.into());
        if PANIC_ON_ERROR {
            panic!("SKEIN_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn depth_exceed<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::DepthExceed(s.into());
        if PANIC_ON_ERROR {
            panic!("SKEIN_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::TypeMismatch`] from the requested and decoded type names.
    ///
    /// ```
    /// use skein_core::error::Error;
    ///
    /// let err = Error::type_mismatch("zoo::Dog", "zoo::Cat");
    /// assert!(err.is_type_mismatch());
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn type_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<Cow<'static, str>>,
        A: Into<Cow<'static, str>>,
    {
        let err = Error::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        };
        if PANIC_ON_ERROR {
            panic!("SKEIN_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unknown_type_id(id: u16) -> Self {
        let err = Error::UnknownTypeId(id);
        if PANIC_ON_ERROR {
            panic!("SKEIN_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn not_allowed<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::NotAllowed(s.into());
        if PANIC_ON_ERROR {
            panic!("SKEIN_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Attaches the failing member to `self`.
    ///
    /// Only the innermost location is kept: an error that already carries
    /// a context is returned untouched, so the report points at the leaf
    /// member that actually failed.
    #[cold]
    pub fn in_member(
        self,
        type_name: impl Into<Cow<'static, str>>,
        member: impl Into<Cow<'static, str>>,
        offset: Option<usize>,
    ) -> Self {
        match self {
            Error::Context { .. } => self,
            source => Error::Context {
                type_name: type_name.into(),
                member: member.into(),
                offset,
                source: Box::new(source),
            },
        }
    }

    /// The error beneath any [`Error::Context`] wrapper.
    pub fn root(&self) -> &Error {
        let mut err = self;
        while let Error::Context { source, .. } = err {
            err = source;
        }
        err
    }

    pub fn is_build(&self) -> bool {
        matches!(self.root(), Error::Build(_) | Error::IdCollision { .. })
    }

    pub fn is_wire_format(&self) -> bool {
        matches!(
            self.root(),
            Error::BufferOutOfBound(..) | Error::InvalidData(_) | Error::DepthExceed(_)
        )
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(
            self.root(),
            Error::TypeMismatch { .. } | Error::UnknownTypeId(_)
        )
    }

    pub fn is_misuse(&self) -> bool {
        matches!(self.root(), Error::NotAllowed(_))
    }
}

/// Ensures a condition is true; otherwise returns an [`enum@Error`].
///
/// ```
/// use skein_core::ensure;
/// use skein_core::error::Error;
///
/// fn check_len(len: i32) -> Result<(), Error> {
///     ensure!(len >= 0, Error::invalid_data(format!("negative length {len}")));
///     Ok(())
/// }
/// assert!(check_len(-1).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::invalid_data(format!($fmt, $($arg)*)));
        }
    };
}

/// Returns early with an [`Error::Build`].
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::error::Error::build($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::build(format!($fmt, $($arg)*)))
    };
}

/// Returns early with an [`Error::NotAllowed`].
#[macro_export]
macro_rules! not_allowed {
    ($err:expr) => {
        return Err($crate::error::Error::not_allowed($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::not_allowed(format!($fmt, $($arg)*)))
    };
}
