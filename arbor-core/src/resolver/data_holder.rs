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

//! Per-call scratch data shared between unrelated converters.

use std::any::Any;
use std::borrow::Cow;
use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt;

/// Key/value store scoped to one top-level marshal or unmarshal call.
///
/// Converters use it to pass auxiliary data (precomputed ids, caches) without
/// knowing about each other. Values are type-erased and read back with
/// [`DataHolder::get_as`].
///
/// # Examples
///
/// ```rust
/// use arbor_core::resolver::data_holder::DataHolder;
///
/// let mut data = DataHolder::new();
/// data.put("next-id", 7u32);
/// assert_eq!(data.get_as::<u32>("next-id"), Some(&7));
/// assert_eq!(data.get_as::<String>("next-id"), None);
/// ```
#[derive(Default)]
pub struct DataHolder {
    values: HashMap<Cow<'static, str>, Box<dyn Any>>,
}

impl DataHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&dyn Any> {
        self.values.get(key).map(|v| v.as_ref())
    }

    pub fn get_as<V: Any>(&self, key: &str) -> Option<&V> {
        self.values.get(key)?.downcast_ref::<V>()
    }

    pub fn get_mut<V: Any>(&mut self, key: &str) -> Option<&mut V> {
        self.values.get_mut(key)?.downcast_mut::<V>()
    }

    /// Records `value` under `key`, returning the value it replaces.
    pub fn put<K, V>(&mut self, key: K, value: V) -> Option<Box<dyn Any>>
    where
        K: Into<Cow<'static, str>>,
        V: Any,
    {
        self.values.insert(key.into(), Box::new(value))
    }

    pub fn remove(&mut self, key: &str) -> Option<Box<dyn Any>> {
        self.values.remove(key)
    }

    /// Lazy sequence over the recorded keys. Clone it to walk the keys again.
    pub fn keys(&self) -> Keys<'_> {
        Keys {
            inner: self.values.keys(),
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for DataHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}

/// Iterator over the keys of a [`DataHolder`].
#[derive(Clone)]
pub struct Keys<'a> {
    inner: hash_map::Keys<'a, Cow<'static, str>, Box<dyn Any>>,
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.inner.next().map(|k| k.as_ref())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
