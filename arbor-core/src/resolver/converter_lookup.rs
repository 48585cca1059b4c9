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

//! Converter resolution.

use crate::converter::Converter;
use crate::error::Error;
use crate::types::TypeDescriptor;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Resolves the converter responsible for a runtime type.
///
/// Resolution must be a pure function of the type and the current
/// registrations; the marshaller asks afresh for every value.
pub trait ConverterLookup: Send + Sync {
    fn lookup_converter_for_type(&self, ty: &TypeDescriptor)
        -> Result<Arc<dyn Converter>, Error>;
}

/// Registration priority. Higher values are consulted first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub i32);

impl Priority {
    pub const VERY_HIGH: Priority = Priority(10000);
    pub const NORMAL: Priority = Priority(0);
    pub const LOW: Priority = Priority(-10);
    pub const VERY_LOW: Priority = Priority(-20);
}

impl Default for Priority {
    fn default() -> Self {
        Priority::NORMAL
    }
}

struct Registration {
    priority: Priority,
    converter: Arc<dyn Converter>,
}

/// Ordered converter registry.
///
/// Registrations are kept sorted by priority; among equal priorities the most
/// recent registration is consulted first. Successful resolutions are cached
/// per type and the cache is flushed on every registration.
#[derive(Default)]
pub struct DefaultConverterLookup {
    registrations: Vec<Registration>,
    cache: RwLock<HashMap<TypeDescriptor, Arc<dyn Converter>>>,
}

impl DefaultConverterLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in converters at [`Priority::NORMAL`].
    pub fn with_defaults() -> Self {
        let mut lookup = Self::new();
        crate::converter::register_defaults(&mut lookup);
        lookup
    }

    pub fn register_converter<C: Converter>(&mut self, converter: C, priority: Priority) {
        self.register_shared(Arc::new(converter), priority);
    }

    pub fn register_shared(&mut self, converter: Arc<dyn Converter>, priority: Priority) {
        debug!(
            converter = converter.name(),
            priority = priority.0,
            "registering converter"
        );
        let at = self
            .registrations
            .iter()
            .position(|r| r.priority <= priority)
            .unwrap_or(self.registrations.len());
        self.registrations.insert(
            at,
            Registration {
                priority,
                converter,
            },
        );
        self.flush_cache();
    }

    pub fn flush_cache(&mut self) {
        self.cache
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    fn resolve(&self, ty: &TypeDescriptor) -> Option<Arc<dyn Converter>> {
        self.registrations
            .iter()
            .find(|r| r.converter.can_convert(ty))
            .map(|r| r.converter.clone())
    }
}

impl ConverterLookup for DefaultConverterLookup {
    fn lookup_converter_for_type(
        &self,
        ty: &TypeDescriptor,
    ) -> Result<Arc<dyn Converter>, Error> {
        if let Some(hit) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ty)
        {
            return Ok(hit.clone());
        }
        match self.resolve(ty) {
            Some(converter) => {
                self.cache
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(*ty, converter.clone());
                Ok(converter)
            }
            None => {
                debug!(item_type = ty.name(), "no converter matches");
                Err(Error::resolution(ty.name()))
            }
        }
    }
}
