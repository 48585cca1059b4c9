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

use crate::config::Config;
use crate::converter::{expect_value, Converter, SingleValueConverter, SingleValueConverterWrapper};
use crate::error::Error;
use crate::io::{HierarchicalReader, HierarchicalWriter, Node, TreeReader, TreeWriter};
use crate::mapper::DefaultMapper;
use crate::marshaller::TreeMarshaller;
use crate::resolver::converter_lookup::{DefaultConverterLookup, Priority};
use crate::resolver::data_holder::DataHolder;
use crate::types::{Object, TypeDescriptor};
use crate::unmarshaller::UnmarshallingContext;
use std::any::Any;
use std::sync::Arc;

/// Entry point bundling configuration, converter registry and mapper.
///
/// `Arbor` is `Send + Sync`; every call builds its own [`TreeMarshaller`], so
/// one instance can serve many threads marshalling independent graphs.
///
/// # Examples
///
/// ```rust
/// use arbor_core::Arbor;
/// use std::sync::atomic::AtomicI32;
///
/// let arbor = Arbor::default();
/// let tree = arbor.to_tree(&AtomicI32::new(42)).unwrap();
/// assert_eq!(tree.value(), Some("42"));
///
/// let back: AtomicI32 = arbor.from_tree(&tree).unwrap();
/// assert_eq!(back.into_inner(), 42);
/// ```
///
/// Custom configuration:
///
/// ```rust
/// use arbor_core::Arbor;
///
/// let arbor = Arbor::default().type_hints(false).max_depth(64);
/// assert_eq!(arbor.config().max_depth(), Some(64));
/// ```
pub struct Arbor {
    config: Config,
    lookup: DefaultConverterLookup,
    mapper: DefaultMapper,
}

impl Default for Arbor {
    fn default() -> Self {
        Arbor {
            config: Config::default(),
            lookup: DefaultConverterLookup::with_defaults(),
            mapper: DefaultMapper::new(),
        }
    }
}

impl Arbor {
    /// An instance without any converter registered.
    pub fn empty() -> Self {
        Arbor {
            config: Config::default(),
            lookup: DefaultConverterLookup::new(),
            mapper: DefaultMapper::new(),
        }
    }

    /// Whether the root node is opened with the originating type as a hint.
    ///
    /// Defaults to `true`.
    pub fn type_hints(mut self, type_hints: bool) -> Self {
        self.config.type_hints = type_hints;
        self
    }

    /// Limits the nesting depth of converted values.
    ///
    /// Unlimited by default; deep graphs are then bounded only by the stack.
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = Some(max_depth);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn lookup(&self) -> &DefaultConverterLookup {
        &self.lookup
    }

    pub fn mapper(&self) -> &DefaultMapper {
        &self.mapper
    }

    /// Registers `converter` at [`Priority::NORMAL`].
    pub fn register_converter<C: Converter>(&mut self, converter: C) {
        self.lookup.register_converter(converter, Priority::NORMAL);
    }

    pub fn register_converter_with_priority<C: Converter>(&mut self, converter: C, priority: Priority) {
        self.lookup.register_converter(converter, priority);
    }

    pub fn register_shared(&mut self, converter: Arc<dyn Converter>, priority: Priority) {
        self.lookup.register_shared(converter, priority);
    }

    pub fn register_single_value_converter<C: SingleValueConverter>(&mut self, converter: C) {
        self.lookup
            .register_converter(SingleValueConverterWrapper::new(converter), Priority::NORMAL);
    }

    /// Names nodes of type `T` `name` instead of the derived type name.
    pub fn alias<T: ?Sized + 'static>(&mut self, name: &str) {
        self.mapper.alias(name, TypeDescriptor::of::<T>());
    }

    /// Marshals `root` into `writer`; `data` seeds the call's scratch store.
    pub fn marshal(
        &self,
        root: Option<&dyn Object>,
        writer: &mut dyn HierarchicalWriter,
        data: Option<DataHolder>,
    ) -> Result<(), Error> {
        TreeMarshaller::new(writer, &self.lookup, &self.mapper)
            .with_config(self.config.clone())
            .start(root, data)?;
        writer.flush()
    }

    /// Marshals `root` into an in-memory tree.
    pub fn to_tree(&self, root: &dyn Object) -> Result<Node, Error> {
        let mut writer = TreeWriter::new();
        self.marshal(Some(root), &mut writer, None)?;
        writer.into_root()
    }

    /// Reads a value of type `ty` from `reader`, `None` for a null root.
    pub fn unmarshal(
        &self,
        reader: &mut dyn HierarchicalReader,
        ty: &TypeDescriptor,
        data: Option<DataHolder>,
    ) -> Result<Option<Box<dyn Any>>, Error> {
        UnmarshallingContext::new(reader, &self.lookup, &self.mapper).start(ty, data)
    }

    /// Reads a `T` back from an in-memory tree.
    pub fn from_tree<T: Any>(&self, node: &Node) -> Result<T, Error> {
        let mut reader = TreeReader::new(node);
        let value = self
            .unmarshal(&mut reader, &TypeDescriptor::of::<T>(), None)?
            .ok_or_else(|| {
                Error::invalid_data(format!(
                    "Expected a {}, found a null root",
                    std::any::type_name::<T>()
                ))
            })?;
        Ok(*expect_value::<T>(value)?)
    }
}
