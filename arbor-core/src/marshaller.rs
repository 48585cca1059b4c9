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

//! The marshalling engine.
//!
//! [`TreeMarshaller`] walks an object graph by recursive descent. Each value
//! is handed to the converter resolved for its runtime type; converters call
//! back into [`TreeMarshaller::convert_another`] for nested values. Before a
//! converter runs, the value's identity is pushed on the ancestor path and it
//! is popped again on every way out, so a value that turns out to be its own
//! ancestor is reported as a circular reference instead of recursing forever,
//! while the same value may still show up any number of times as long as it
//! does not contain itself.

use crate::config::Config;
use crate::converter::Converter;
use crate::error::Error;
use crate::io::HierarchicalWriter;
use crate::mapper::Mapper;
use crate::resolver::converter_lookup::ConverterLookup;
use crate::resolver::data_holder::{DataHolder, Keys};
use crate::resolver::identity::AncestorPath;
use crate::types::{Identity, Object};
use std::any::Any;
use std::borrow::Cow;
use std::ops::{Deref, DerefMut};
use tracing::{debug, trace};

/// Marshalling context for one top-level call.
///
/// Owns the ancestor path and the scratch store of that call. Create one per
/// marshal operation; the converter lookup and mapper it borrows may be shared
/// freely between marshallers.
///
/// # Examples
///
/// ```rust
/// use arbor_core::io::TreeWriter;
/// use arbor_core::mapper::DefaultMapper;
/// use arbor_core::marshaller::TreeMarshaller;
/// use arbor_core::resolver::DefaultConverterLookup;
///
/// let lookup = DefaultConverterLookup::with_defaults();
/// let mapper = DefaultMapper::new();
/// let mut writer = TreeWriter::new();
///
/// let value = 42i32;
/// TreeMarshaller::new(&mut writer, &lookup, &mapper)
///     .start(Some(&value), None)
///     .unwrap();
///
/// let root = writer.into_root().unwrap();
/// assert_eq!(root.name(), "i32");
/// assert_eq!(root.value(), Some("42"));
/// ```
pub struct TreeMarshaller<'a> {
    writer: &'a mut dyn HierarchicalWriter,
    lookup: &'a dyn ConverterLookup,
    mapper: &'a dyn Mapper,
    config: Config,
    parents: AncestorPath,
    data: Option<DataHolder>,
}

impl<'a> TreeMarshaller<'a> {
    pub fn new(
        writer: &'a mut dyn HierarchicalWriter,
        lookup: &'a dyn ConverterLookup,
        mapper: &'a dyn Mapper,
    ) -> TreeMarshaller<'a> {
        TreeMarshaller {
            writer,
            lookup,
            mapper,
            config: Config::default(),
            parents: AncestorPath::new(),
            data: None,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Marshals `item` as the root node.
    ///
    /// An absent root is written as a single empty node named by the mapper's
    /// null policy. `data` seeds the scratch store; `None` starts empty.
    pub fn start(&mut self, item: Option<&dyn Object>, data: Option<DataHolder>) -> Result<(), Error> {
        self.data = data;
        let mapper = self.mapper;
        let Some(item) = item else {
            self.writer.start_node(&mapper.serialized_class(None))?;
            return self.writer.end_node();
        };
        let ty = item.type_descriptor();
        let name = mapper.serialized_class(Some(&ty));
        if self.config.is_type_hints() {
            self.writer.start_node_with_type(&name, &ty)?;
        } else {
            self.writer.start_node(&name)?;
        }
        self.convert_another(item)?;
        self.writer.end_node()
    }

    /// Converts `item` with the converter registered for its runtime type.
    pub fn convert_another(&mut self, item: &dyn Object) -> Result<(), Error> {
        let ty = item.type_descriptor();
        let converter = self.lookup.lookup_converter_for_type(&ty)?;
        self.convert(item, converter.as_ref())
    }

    /// Converts `item` with a converter chosen by the caller.
    ///
    /// Fails with [`Error::ConverterMismatch`], without running the converter,
    /// if it declines the item's type.
    pub fn convert_another_with(
        &mut self,
        item: &dyn Object,
        converter: &dyn Converter,
    ) -> Result<(), Error> {
        let ty = item.type_descriptor();
        if !converter.can_convert(&ty) {
            return Err(Error::converter_mismatch(ty.name(), converter.name()));
        }
        self.convert(item, converter)
    }

    fn convert(&mut self, item: &dyn Object, converter: &dyn Converter) -> Result<(), Error> {
        let identity = Identity::of(item);
        if self.parents.contains(&identity) {
            let item_type = item.type_descriptor().name();
            debug!(
                item_type,
                converter = converter.name(),
                depth = self.parents.len(),
                "circular reference detected"
            );
            return Err(Error::circular_reference(item_type, converter.name()));
        }
        if let Some(max) = self.config.max_depth() {
            if self.parents.len() >= max as usize {
                return Err(Error::depth_exceed(format!(
                    "Maximum marshalling depth ({}) exceeded while converting {}",
                    max,
                    item.type_descriptor().name()
                )));
            }
        }
        let mut scope = AncestorScope::enter(self, identity);
        trace!(
            item_type = item.type_descriptor().name(),
            depth = scope.parents.len(),
            "converting"
        );
        converter.marshal(item, &mut scope)
    }

    /// The writer receiving the tree.
    #[inline(always)]
    pub fn writer(&mut self) -> &mut (dyn HierarchicalWriter + 'a) {
        &mut *self.writer
    }

    #[inline(always)]
    pub fn mapper(&self) -> &'a dyn Mapper {
        self.mapper
    }

    #[inline(always)]
    pub fn lookup(&self) -> &'a dyn ConverterLookup {
        self.lookup
    }

    #[inline(always)]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of values currently open on the descent.
    #[inline(always)]
    pub fn ancestor_depth(&self) -> usize {
        self.parents.len()
    }

    /// Scratch value stored under `key`, if the store exists and holds one.
    pub fn get(&self, key: &str) -> Option<&dyn Any> {
        self.data.as_ref()?.get(key)
    }

    pub fn get_as<V: Any>(&self, key: &str) -> Option<&V> {
        self.data.as_ref()?.get_as::<V>(key)
    }

    pub fn get_mut<V: Any>(&mut self, key: &str) -> Option<&mut V> {
        self.data.as_mut()?.get_mut::<V>(key)
    }

    /// Records a scratch value, creating the store on first use.
    pub fn put<K, V>(&mut self, key: K, value: V) -> Option<Box<dyn Any>>
    where
        K: Into<Cow<'static, str>>,
        V: Any,
    {
        self.data.get_or_insert_with(DataHolder::new).put(key, value)
    }

    /// Keys of the scratch store; empty if nothing was ever stored.
    pub fn keys(&self) -> std::iter::Flatten<std::option::IntoIter<Keys<'_>>> {
        self.data.as_ref().map(DataHolder::keys).into_iter().flatten()
    }

    /// Takes the scratch store out of a finished call.
    pub fn take_data(&mut self) -> Option<DataHolder> {
        self.data.take()
    }
}

/// Keeps one identity on the ancestor path for as long as it lives.
///
/// Dereferences to the marshaller so the converter can run while the entry is
/// held; dropping it, on success, error or unwinding, pops the entry.
struct AncestorScope<'m, 'a> {
    marshaller: &'m mut TreeMarshaller<'a>,
    identity: Identity,
}

impl<'m, 'a> AncestorScope<'m, 'a> {
    fn enter(marshaller: &'m mut TreeMarshaller<'a>, identity: Identity) -> Self {
        let pushed = marshaller.parents.push(identity);
        debug_assert!(pushed, "identity already on the ancestor path");
        AncestorScope {
            marshaller,
            identity,
        }
    }
}

impl<'a> Deref for AncestorScope<'_, 'a> {
    type Target = TreeMarshaller<'a>;

    fn deref(&self) -> &TreeMarshaller<'a> {
        self.marshaller
    }
}

impl<'a> DerefMut for AncestorScope<'_, 'a> {
    fn deref_mut(&mut self) -> &mut TreeMarshaller<'a> {
        self.marshaller
    }
}

impl Drop for AncestorScope<'_, '_> {
    fn drop(&mut self) {
        let depth = self.marshaller.parents.len();
        let popped = self.marshaller.parents.pop();
        debug_assert_eq!(popped, Some(self.identity));
        trace!(depth, "converted");
    }
}
