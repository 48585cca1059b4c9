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

use super::{expect_source, expect_value, Converter};
use crate::error::Error;
use crate::marshaller::TreeMarshaller;
use crate::types::{Object, TypeDescriptor};
use crate::unmarshaller::UnmarshallingContext;
use std::any::Any;
use std::marker::PhantomData;

/// Converter for `Vec<T>`.
///
/// Each element becomes one child node named after its type.
pub struct VecConverter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> VecConverter<T> {
    pub fn new() -> Self {
        VecConverter {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for VecConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Any> Converter for VecConverter<T> {
    fn can_convert(&self, ty: &TypeDescriptor) -> bool {
        ty.is::<Vec<T>>()
    }

    fn marshal(&self, source: &dyn Object, context: &mut TreeMarshaller<'_>) -> Result<(), Error> {
        let items = expect_source::<Vec<T>>(source)?;
        let item_type = TypeDescriptor::of::<T>();
        let name = context.mapper().serialized_class(Some(&item_type));
        for item in items {
            context.writer().start_node_with_type(&name, &item_type)?;
            context.convert_another(item)?;
            context.writer().end_node()?;
        }
        Ok(())
    }

    fn unmarshal(&self, context: &mut UnmarshallingContext<'_>) -> Result<Box<dyn Any>, Error> {
        let item_type = TypeDescriptor::of::<T>();
        let mut items = Vec::new();
        while context.reader().has_more_children() {
            context.reader().move_down()?;
            let item = context.convert_another(&item_type)?;
            items.push(*expect_value::<T>(item)?);
            context.reader().move_up()?;
        }
        Ok(Box::new(items))
    }
}

/// Converter for `Option<T>`.
///
/// `Some` holds one child node named after `T`; `None` holds none.
pub struct OptionConverter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> OptionConverter<T> {
    pub fn new() -> Self {
        OptionConverter {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for OptionConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Any> Converter for OptionConverter<T> {
    fn can_convert(&self, ty: &TypeDescriptor) -> bool {
        ty.is::<Option<T>>()
    }

    fn marshal(&self, source: &dyn Object, context: &mut TreeMarshaller<'_>) -> Result<(), Error> {
        let Some(value) = expect_source::<Option<T>>(source)? else {
            return Ok(());
        };
        let value_type = TypeDescriptor::of::<T>();
        let name = context.mapper().serialized_class(Some(&value_type));
        context.writer().start_node_with_type(&name, &value_type)?;
        context.convert_another(value)?;
        context.writer().end_node()
    }

    fn unmarshal(&self, context: &mut UnmarshallingContext<'_>) -> Result<Box<dyn Any>, Error> {
        if !context.reader().has_more_children() {
            return Ok(Box::new(None::<T>));
        }
        context.reader().move_down()?;
        let value = context.convert_another(&TypeDescriptor::of::<T>())?;
        let value = expect_value::<T>(value)?;
        context.reader().move_up()?;
        Ok(Box::new(Some(*value)))
    }
}
