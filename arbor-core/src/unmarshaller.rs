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

//! Context handed to [`Converter::unmarshal`].
//!
//! Only what converters need to read nested values is provided here; a
//! document-level unmarshalling driver (reference resolution, polymorphic
//! type attributes) is not part of this crate.

use crate::converter::Converter;
use crate::error::Error;
use crate::io::HierarchicalReader;
use crate::mapper::Mapper;
use crate::resolver::converter_lookup::ConverterLookup;
use crate::resolver::data_holder::{DataHolder, Keys};
use crate::types::TypeDescriptor;
use std::any::Any;
use std::borrow::Cow;

pub struct UnmarshallingContext<'a> {
    reader: &'a mut dyn HierarchicalReader,
    lookup: &'a dyn ConverterLookup,
    mapper: &'a dyn Mapper,
    data: Option<DataHolder>,
}

impl<'a> UnmarshallingContext<'a> {
    pub fn new(
        reader: &'a mut dyn HierarchicalReader,
        lookup: &'a dyn ConverterLookup,
        mapper: &'a dyn Mapper,
    ) -> UnmarshallingContext<'a> {
        UnmarshallingContext {
            reader,
            lookup,
            mapper,
            data: None,
        }
    }

    /// Reads the root node as a value of type `ty`.
    ///
    /// A root named by the mapper's null policy yields `None`.
    pub fn start(
        &mut self,
        ty: &TypeDescriptor,
        data: Option<DataHolder>,
    ) -> Result<Option<Box<dyn Any>>, Error> {
        self.data = data;
        if self.reader.node_name() == self.mapper.serialized_class(None) {
            return Ok(None);
        }
        self.convert_another(ty).map(Some)
    }

    /// Reads the current node with the converter registered for `ty`.
    pub fn convert_another(&mut self, ty: &TypeDescriptor) -> Result<Box<dyn Any>, Error> {
        let converter = self.lookup.lookup_converter_for_type(ty)?;
        converter.unmarshal(self)
    }

    /// Reads the current node with a converter chosen by the caller.
    pub fn convert_another_with(
        &mut self,
        ty: &TypeDescriptor,
        converter: &dyn Converter,
    ) -> Result<Box<dyn Any>, Error> {
        if !converter.can_convert(ty) {
            return Err(Error::converter_mismatch(ty.name(), converter.name()));
        }
        converter.unmarshal(self)
    }

    /// Type the mapper associates with the current node name, if any.
    pub fn node_type(&self) -> Option<TypeDescriptor> {
        self.mapper.real_class(self.reader.node_name())
    }

    #[inline(always)]
    pub fn reader(&mut self) -> &mut (dyn HierarchicalReader + 'a) {
        &mut *self.reader
    }

    #[inline(always)]
    pub fn mapper(&self) -> &'a dyn Mapper {
        self.mapper
    }

    pub fn get(&self, key: &str) -> Option<&dyn Any> {
        self.data.as_ref()?.get(key)
    }

    pub fn get_as<V: Any>(&self, key: &str) -> Option<&V> {
        self.data.as_ref()?.get_as::<V>(key)
    }

    pub fn put<K, V>(&mut self, key: K, value: V) -> Option<Box<dyn Any>>
    where
        K: Into<Cow<'static, str>>,
        V: Any,
    {
        self.data.get_or_insert_with(DataHolder::new).put(key, value)
    }

    pub fn keys(&self) -> std::iter::Flatten<std::option::IntoIter<Keys<'_>>> {
        self.data.as_ref().map(DataHolder::keys).into_iter().flatten()
    }
}
