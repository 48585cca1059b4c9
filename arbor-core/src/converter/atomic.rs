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

use super::{expect_source, Converter, IntConverter};
use crate::error::Error;
use crate::marshaller::TreeMarshaller;
use crate::types::{Object, TypeDescriptor};
use crate::unmarshaller::UnmarshallingContext;
use std::any::Any;
use std::sync::atomic::{AtomicI32, Ordering};

/// Converter for [`AtomicI32`].
///
/// Writes the current value as decimal node text. Reading also accepts the
/// older encoding in which the number sat in a single nested child node.
#[derive(Clone, Copy, Debug, Default)]
pub struct AtomicIntegerConverter {
    int: IntConverter,
}

impl AtomicIntegerConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_text(&self, source: &dyn Object) -> Result<String, Error> {
        Ok(expect_source::<AtomicI32>(source)?
            .load(Ordering::SeqCst)
            .to_string())
    }

    pub fn from_text(&self, text: &str) -> Result<AtomicI32, Error> {
        Ok(AtomicI32::new(self.int.parse(text)?))
    }
}

impl Converter for AtomicIntegerConverter {
    fn can_convert(&self, ty: &TypeDescriptor) -> bool {
        ty.is::<AtomicI32>()
    }

    fn marshal(
        &self,
        source: &dyn Object,
        context: &mut TreeMarshaller<'_>,
    ) -> Result<(), Error> {
        let text = self.to_text(source)?;
        context.writer().set_value(&text)
    }

    fn unmarshal(&self, context: &mut UnmarshallingContext<'_>) -> Result<Box<dyn Any>, Error> {
        let reader = context.reader();
        // must be read before has_more_children
        let data = reader.value();
        if !reader.has_more_children() {
            return Ok(Box::new(self.from_text(&data)?));
        }
        reader.move_down()?;
        let value = self.int.parse(&reader.value())?;
        reader.move_up()?;
        Ok(Box::new(AtomicI32::new(value)))
    }
}
