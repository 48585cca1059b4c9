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

//! Identity-keyed bookkeeping for the current descent.

use crate::types::{Identity, Object};
use std::collections::HashMap;

/// Map keyed by object identity, never by value equality.
///
/// Two instances that compare equal by content are separate entries.
///
/// # Examples
///
/// ```rust
/// use arbor_core::resolver::identity::IdentityMap;
///
/// let a = String::from("x");
/// let b = String::from("x");
/// let mut map = IdentityMap::new();
/// map.associate_id(&a, "first");
/// assert!(map.contains_id(&a));
/// assert!(!map.contains_id(&b));
/// ```
#[derive(Debug)]
pub struct IdentityMap<V> {
    entries: HashMap<Identity, V>,
}

impl<V> Default for IdentityMap<V> {
    fn default() -> Self {
        IdentityMap {
            entries: HashMap::new(),
        }
    }
}

impl<V> IdentityMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn contains_id(&self, item: &dyn Object) -> bool {
        self.contains_identity(&Identity::of(item))
    }

    #[inline(always)]
    pub fn contains_identity(&self, identity: &Identity) -> bool {
        self.entries.contains_key(identity)
    }

    /// Associates `marker` with `item`, returning the previous marker if any.
    pub fn associate_id(&mut self, item: &dyn Object, marker: V) -> Option<V> {
        self.associate_identity(Identity::of(item), marker)
    }

    pub fn associate_identity(&mut self, identity: Identity, marker: V) -> Option<V> {
        self.entries.insert(identity, marker)
    }

    pub fn lookup_id(&self, item: &dyn Object) -> Option<&V> {
        self.entries.get(&Identity::of(item))
    }

    /// Removes `item`. Removing an absent identity is a no-op.
    pub fn remove_id(&mut self, item: &dyn Object) -> Option<V> {
        self.remove_identity(&Identity::of(item))
    }

    pub fn remove_identity(&mut self, identity: &Identity) -> Option<V> {
        self.entries.remove(identity)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Identities of the values currently open on the recursive descent.
///
/// An ordered stack plus an [`IdentityMap`] index (marker = stack position) so
/// membership is O(1). An identity appears at most once.
#[derive(Debug, Default)]
pub struct AncestorPath {
    stack: Vec<Identity>,
    index: IdentityMap<usize>,
}

impl AncestorPath {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn contains(&self, identity: &Identity) -> bool {
        self.index.contains_identity(identity)
    }

    /// Pushes `identity`. Returns `false`, leaving the path untouched, if it is
    /// already open.
    pub fn push(&mut self, identity: Identity) -> bool {
        if self.index.contains_identity(&identity) {
            return false;
        }
        self.index.associate_identity(identity, self.stack.len());
        self.stack.push(identity);
        true
    }

    /// Pops the innermost identity.
    pub fn pop(&mut self) -> Option<Identity> {
        let identity = self.stack.pop()?;
        self.index.remove_identity(&identity);
        Some(identity)
    }

    /// Stack position of `identity`, `0` being the outermost ancestor.
    pub fn position(&self, identity: &Identity) -> Option<usize> {
        self.index.entries.get(identity).copied()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Identity> + '_ {
        self.stack.iter()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
        self.index.clear();
    }
}
