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

//! Error type shared by the marshalling engine, the converter protocol and the
//! tree readers/writers.
//!
//! Error constructors sit on every failure path of the recursive descent, so
//! they are `#[cold]` and `#[track_caller]`: the happy path of
//! `convert_another` stays small and a panic raised through
//! `ARBOR_PANIC_ON_ERROR` points at the line that built the error.

use std::borrow::Cow;

use thiserror::Error;

/// Set `ARBOR_PANIC_ON_ERROR` at compile time to panic where an error is created.
pub const PANIC_ON_ERROR: bool = option_env!("ARBOR_PANIC_ON_ERROR").is_some();

/// Check if `ARBOR_PANIC_ON_ERROR` was set at compile time.
#[inline(always)]
pub const fn should_panic_on_error() -> bool {
    PANIC_ON_ERROR
}

/// Error type for marshalling and unmarshalling.
///
/// # Always use the constructor functions
///
/// Build errors through [`Error::resolution`], [`Error::circular_reference`]
/// and friends instead of the variant syntax. The constructors accept anything
/// convertible into `Cow<'static, str>` and honour `ARBOR_PANIC_ON_ERROR`:
///
/// ```bash
/// RUST_BACKTRACE=1 ARBOR_PANIC_ON_ERROR=1 cargo test
/// ```
///
/// ```rust
/// use arbor_core::error::Error;
///
/// let err = Error::resolution("my_crate::Person");
/// assert!(err.is_conversion_error());
/// let err = Error::invalid_data(format!("not a number: {}", "abc"));
/// assert!(!err.is_circular_reference());
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// No registered converter accepts the type.
    ///
    /// Do not construct this variant directly; use [`Error::resolution`] instead.
    #[error("No converter available for type {0}")]
    Resolution(Cow<'static, str>),

    /// A converter chosen by the caller declined the item's type.
    ///
    /// Do not construct this variant directly; use [`Error::converter_mismatch`] instead.
    #[error("Explicit selected converter cannot handle item (item-type: {item_type}, converter-type: {converter_type})")]
    ConverterMismatch {
        item_type: Cow<'static, str>,
        converter_type: Cow<'static, str>,
    },

    /// The item is already being converted further up the current descent.
    ///
    /// Do not construct this variant directly; use [`Error::circular_reference`] instead.
    #[error("Recursive reference to parent object (item-type: {item_type}, converter-type: {converter_type})")]
    CircularReference {
        item_type: Cow<'static, str>,
        converter_type: Cow<'static, str>,
    },

    /// Failure raised by a converter's own logic.
    ///
    /// Do not construct this variant directly; use [`Error::conversion`] instead.
    #[error("{0}")]
    Conversion(Cow<'static, str>),

    /// Node text that cannot be turned back into a value.
    ///
    /// Do not construct this variant directly; use [`Error::invalid_data`] instead.
    #[error("{0}")]
    InvalidData(Cow<'static, str>),

    /// Unbalanced or out-of-place tree navigation.
    ///
    /// Do not construct this variant directly; use [`Error::node_mismatch`] instead.
    #[error("{0}")]
    NodeMismatch(Cow<'static, str>),

    /// The ancestor path grew past the configured maximum depth.
    ///
    /// Do not construct this variant directly; use [`Error::depth_exceed`] instead.
    #[error("{0}")]
    DepthExceed(Cow<'static, str>),

    /// Errors from user code, usually bubbled up with `?`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Creates a new [`Error::Resolution`] for the given type name.
    ///
    /// If `ARBOR_PANIC_ON_ERROR` is set, this will panic with the error message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn resolution<S: Into<Cow<'static, str>>>(type_name: S) -> Self {
        let err = Error::Resolution(type_name.into());
        if PANIC_ON_ERROR {
            panic!("ARBOR_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::ConverterMismatch`].
    ///
    /// If `ARBOR_PANIC_ON_ERROR` is set, this will panic with the error message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn converter_mismatch<S, C>(item_type: S, converter_type: C) -> Self
    where
        S: Into<Cow<'static, str>>,
        C: Into<Cow<'static, str>>,
    {
        let err = Error::ConverterMismatch {
            item_type: item_type.into(),
            converter_type: converter_type.into(),
        };
        if PANIC_ON_ERROR {
            panic!("ARBOR_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::CircularReference`].
    ///
    /// If `ARBOR_PANIC_ON_ERROR` is set, this will panic with the error message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn circular_reference<S, C>(item_type: S, converter_type: C) -> Self
    where
        S: Into<Cow<'static, str>>,
        C: Into<Cow<'static, str>>,
    {
        let err = Error::CircularReference {
            item_type: item_type.into(),
            converter_type: converter_type.into(),
        };
        if PANIC_ON_ERROR {
            panic!("ARBOR_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::Conversion`] from a string or static message.
    ///
    /// If `ARBOR_PANIC_ON_ERROR` is set, this will panic with the error message.
    ///
    /// # Example
    /// ```
    /// use arbor_core::error::Error;
    ///
    /// let err = Error::conversion("Cannot marshal a poisoned mutex");
    /// let err = Error::conversion(format!("Field {} missing", "name"));
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn conversion<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::Conversion(s.into());
        if PANIC_ON_ERROR {
            panic!("ARBOR_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::InvalidData`] from a string or static message.
    ///
    /// If `ARBOR_PANIC_ON_ERROR` is set, this will panic with the error message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_data<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::InvalidData(s.into());
        if PANIC_ON_ERROR {
            panic!("ARBOR_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::NodeMismatch`] from a string or static message.
    ///
    /// If `ARBOR_PANIC_ON_ERROR` is set, this will panic with the error message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn node_mismatch<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::NodeMismatch(s.into());
        if PANIC_ON_ERROR {
            panic!("ARBOR_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::DepthExceed`] from a string or static message.
    ///
    /// If `ARBOR_PANIC_ON_ERROR` is set, this will panic with the error message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn depth_exceed<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::DepthExceed(s.into());
        if PANIC_ON_ERROR {
            panic!("ARBOR_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Returns `true` for errors raised while resolving or applying a converter.
    ///
    /// [`Error::CircularReference`] is one of them.
    pub fn is_conversion_error(&self) -> bool {
        matches!(
            self,
            Error::Resolution(_)
                | Error::ConverterMismatch { .. }
                | Error::CircularReference { .. }
                | Error::Conversion(_)
        )
    }

    /// Returns `true` if the error is a [`Error::CircularReference`].
    pub fn is_circular_reference(&self) -> bool {
        matches!(self, Error::CircularReference { .. })
    }

    /// Appends `(type: T)` to a [`Error::Conversion`] or [`Error::InvalidData`] message.
    ///
    /// Other variants are returned unchanged.
    #[inline(never)]
    pub fn enhance_with_type<T: ?Sized + 'static>(err: Error) -> Error {
        match err {
            Error::Conversion(s) => {
                Error::conversion(format!("{} (type: {})", s, std::any::type_name::<T>()))
            }
            Error::InvalidData(s) => {
                Error::invalid_data(format!("{} (type: {})", s, std::any::type_name::<T>()))
            }
            other => other,
        }
    }
}

/// Ensures a condition is true; otherwise returns an [`enum@Error`].
///
/// # Examples
/// ```
/// use arbor_core::ensure;
/// use arbor_core::error::Error;
///
/// fn check_value(n: i32) -> Result<(), Error> {
///     ensure!(n > 0, "value must be positive");
///     ensure!(n < 10, "value {} too large", n);
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            return Err($crate::error::Error::conversion($msg));
        }
    };
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::conversion(format!($fmt, $($arg)*)));
        }
    };
}

/// Returns early with an [`Error::Conversion`].
///
/// # Examples
/// ```
/// use arbor_core::bail;
/// use arbor_core::error::Error;
///
/// fn fail_fast() -> Result<(), Error> {
///     bail!("something went wrong");
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::error::Error::conversion($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::conversion(format!($fmt, $($arg)*)))
    };
}
