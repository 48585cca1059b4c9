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

//! The converter protocol and the built-in converters.
//!
//! A [`Converter`] declares which runtime types it handles, writes values as
//! tree nodes and reads them back. Converters for composite values call
//! [`TreeMarshaller::convert_another`] for every nested value, which re-enters
//! the engine (cycle check included) for that child.
//!
//! Converters whose whole representation is one string implement the smaller
//! [`SingleValueConverter`] and are registered through
//! [`SingleValueConverterWrapper`].

mod atomic;
mod basic;
mod collection;
mod pointer;

pub use atomic::AtomicIntegerConverter;
pub use basic::{
    decode_i64, BoolConverter, CharConverter, IntConverter, LongConverter, NumberConverter,
    StringConverter,
};
pub use collection::{OptionConverter, VecConverter};
pub use pointer::{ArcConverter, BoxConverter, RcConverter, RefCellConverter};

use crate::error::Error;
use crate::marshaller::TreeMarshaller;
use crate::resolver::converter_lookup::{DefaultConverterLookup, Priority};
use crate::types::{Object, TypeDescriptor};
use crate::unmarshaller::UnmarshallingContext;
use std::any::Any;

/// Bidirectional transform between values of some runtime types and tree nodes.
///
/// The node that holds a value is opened and closed by whoever asked for the
/// conversion; `marshal` only fills it with text, attributes and child nodes.
/// The writer and reader are reached through the context
/// ([`TreeMarshaller::writer`], [`UnmarshallingContext::reader`]).
pub trait Converter: Send + Sync + 'static {
    /// Whether this converter handles values of type `ty`.
    ///
    /// Must give the same answer for a type as long as the converter is
    /// registered.
    fn can_convert(&self, ty: &TypeDescriptor) -> bool;

    fn marshal(&self, source: &dyn Object, context: &mut TreeMarshaller<'_>)
        -> Result<(), Error>;

    fn unmarshal(&self, context: &mut UnmarshallingContext<'_>) -> Result<Box<dyn Any>, Error>;

    /// Name used in diagnostics.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Converter for values represented by a single string.
pub trait SingleValueConverter: Send + Sync + 'static {
    fn can_convert(&self, ty: &TypeDescriptor) -> bool;

    fn to_text(&self, source: &dyn Object) -> Result<String, Error>;

    fn from_text(&self, text: &str) -> Result<Box<dyn Any>, Error>;
}

/// Adapts a [`SingleValueConverter`] to the full [`Converter`] protocol.
///
/// The string becomes the scalar text of the current node.
pub struct SingleValueConverterWrapper<C> {
    inner: C,
}

impl<C: SingleValueConverter> SingleValueConverterWrapper<C> {
    pub fn new(inner: C) -> Self {
        SingleValueConverterWrapper { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: SingleValueConverter> Converter for SingleValueConverterWrapper<C> {
    #[inline(always)]
    fn can_convert(&self, ty: &TypeDescriptor) -> bool {
        self.inner.can_convert(ty)
    }

    fn marshal(
        &self,
        source: &dyn Object,
        context: &mut TreeMarshaller<'_>,
    ) -> Result<(), Error> {
        let text = self.inner.to_text(source)?;
        context.writer().set_value(&text)
    }

    fn unmarshal(&self, context: &mut UnmarshallingContext<'_>) -> Result<Box<dyn Any>, Error> {
        let text = context.reader().value();
        self.inner.from_text(&text)
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<C>()
    }
}

/// Downcasts `source` for a converter that only accepts `T`.
#[inline(always)]
pub fn expect_source<T: Any>(source: &dyn Object) -> Result<&T, Error> {
    source.as_any().downcast_ref::<T>().ok_or_else(|| {
        Error::conversion(format!(
            "Expected a value of type {}, got {}",
            std::any::type_name::<T>(),
            source.type_descriptor().name()
        ))
    })
}

/// Downcasts a value produced by `unmarshal` into `T`.
#[inline(always)]
pub fn expect_value<T: Any>(value: Box<dyn Any>) -> Result<Box<T>, Error> {
    value.downcast::<T>().map_err(|_| {
        Error::conversion(format!(
            "Unmarshalled value is not a {}",
            std::any::type_name::<T>()
        ))
    })
}

macro_rules! register_numbers {
    ($lookup:expr, $($ty:ty),+ $(,)?) => {
        $(
            $lookup.register_converter(
                SingleValueConverterWrapper::new(NumberConverter::<$ty>::new()),
                Priority::NORMAL,
            );
        )+
    };
}

pub(crate) fn register_defaults(lookup: &mut DefaultConverterLookup) {
    register_numbers!(lookup, i8, i16, i128, u8, u16, u32, u64, u128, usize, isize, f32, f64);
    lookup.register_converter(SingleValueConverterWrapper::new(IntConverter), Priority::NORMAL);
    lookup.register_converter(SingleValueConverterWrapper::new(LongConverter), Priority::NORMAL);
    lookup.register_converter(SingleValueConverterWrapper::new(BoolConverter), Priority::NORMAL);
    lookup.register_converter(SingleValueConverterWrapper::new(CharConverter), Priority::NORMAL);
    lookup.register_converter(SingleValueConverterWrapper::new(StringConverter), Priority::NORMAL);
    lookup.register_converter(AtomicIntegerConverter::new(), Priority::NORMAL);
}
