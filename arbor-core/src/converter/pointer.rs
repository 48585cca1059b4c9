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

//! Converters for smart pointers and cells.
//!
//! They write nothing themselves: the pointee is handed back to the engine
//! with `convert_another`, so its identity (shared by every clone of the
//! pointer) is what the cycle check sees.

use super::{expect_source, expect_value, Converter};
use crate::error::Error;
use crate::marshaller::TreeMarshaller;
use crate::types::{Object, TypeDescriptor};
use crate::unmarshaller::UnmarshallingContext;
use std::any::Any;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;

macro_rules! impl_pointer_converter {
    ($(#[$meta:meta])* $name:ident, $ptr:ident) => {
        $(#[$meta])*
        pub struct $name<T> {
            _marker: PhantomData<fn() -> T>,
        }

        impl<T> $name<T> {
            pub fn new() -> Self {
                $name {
                    _marker: PhantomData,
                }
            }
        }

        impl<T> Default for $name<T> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<T: Any> Converter for $name<T> {
            #[inline(always)]
            fn can_convert(&self, ty: &TypeDescriptor) -> bool {
                ty.is::<$ptr<T>>()
            }

            fn marshal(
                &self,
                source: &dyn Object,
                context: &mut TreeMarshaller<'_>,
            ) -> Result<(), Error> {
                let pointer = expect_source::<$ptr<T>>(source)?;
                let pointee: &T = pointer;
                context.convert_another(pointee)
            }

            fn unmarshal(
                &self,
                context: &mut UnmarshallingContext<'_>,
            ) -> Result<Box<dyn Any>, Error> {
                let value = context.convert_another(&TypeDescriptor::of::<T>())?;
                let value = expect_value::<T>(value)?;
                Ok(Box::new($ptr::new(*value)))
            }
        }
    };
}

impl_pointer_converter!(
    /// Converter for `Rc<T>`; every clone resolves to the same pointee identity.
    RcConverter,
    Rc
);
impl_pointer_converter!(
    /// Converter for `Arc<T>`; every clone resolves to the same pointee identity.
    ArcConverter,
    Arc
);
impl_pointer_converter!(
    /// Converter for `Box<T>`.
    BoxConverter,
    Box
);

/// Converter for `RefCell<T>`.
///
/// Fails with a conversion error if the cell is mutably borrowed while being
/// marshalled.
pub struct RefCellConverter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> RefCellConverter<T> {
    pub fn new() -> Self {
        RefCellConverter {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for RefCellConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Any> Converter for RefCellConverter<T> {
    #[inline(always)]
    fn can_convert(&self, ty: &TypeDescriptor) -> bool {
        ty.is::<RefCell<T>>()
    }

    fn marshal(&self, source: &dyn Object, context: &mut TreeMarshaller<'_>) -> Result<(), Error> {
        let cell = expect_source::<RefCell<T>>(source)?;
        let value = cell.try_borrow().map_err(|_| {
            Error::conversion(format!(
                "RefCell<{}> is mutably borrowed",
                std::any::type_name::<T>()
            ))
        })?;
        context.convert_another(&*value)
    }

    fn unmarshal(&self, context: &mut UnmarshallingContext<'_>) -> Result<Box<dyn Any>, Error> {
        let value = context.convert_another(&TypeDescriptor::of::<T>())?;
        let value = expect_value::<T>(value)?;
        Ok(Box::new(RefCell::new(*value)))
    }
}
