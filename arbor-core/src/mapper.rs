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

//! Type-to-node-name policy.

use crate::types::TypeDescriptor;
use std::borrow::Cow;
use std::collections::HashMap;

/// Node name used for an absent root value.
pub const NULL_NAME: &str = "null";

/// Node name for `()`, also used when a mangled name comes out empty.
pub const UNIT_NAME: &str = "unit";

/// Maps runtime types to node names and back.
pub trait Mapper: Send + Sync {
    /// Node name for `ty`; `None` stands for an absent value.
    fn serialized_class(&self, ty: Option<&TypeDescriptor>) -> Cow<'_, str>;

    /// Type registered for a node name, if the mapper knows one.
    fn real_class(&self, name: &str) -> Option<TypeDescriptor>;
}

/// Alias table with a name-mangling fallback.
///
/// Unaliased types are named after their path-stripped type name with
/// generic brackets flattened, so `Vec<String>` becomes `Vec-String`.
#[derive(Default)]
pub struct DefaultMapper {
    type_to_alias: HashMap<TypeDescriptor, String>,
    alias_to_type: HashMap<String, TypeDescriptor>,
}

impl DefaultMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` as the node name of `ty`, replacing a previous alias.
    pub fn alias<S: Into<String>>(&mut self, name: S, ty: TypeDescriptor) {
        let name = name.into();
        if let Some(old) = self.type_to_alias.insert(ty, name.clone()) {
            self.alias_to_type.remove(&old);
        }
        self.alias_to_type.insert(name, ty);
    }
}

impl Mapper for DefaultMapper {
    fn serialized_class(&self, ty: Option<&TypeDescriptor>) -> Cow<'_, str> {
        let Some(ty) = ty else {
            return Cow::Borrowed(NULL_NAME);
        };
        match self.type_to_alias.get(ty) {
            Some(alias) => Cow::Borrowed(alias.as_str()),
            None => match mangle(&ty.short_name()) {
                name if name.is_empty() => Cow::Borrowed(UNIT_NAME),
                name => Cow::Owned(name),
            },
        }
    }

    fn real_class(&self, name: &str) -> Option<TypeDescriptor> {
        self.alias_to_type.get(name).copied()
    }
}

fn mangle(short_name: &str) -> String {
    let short_name = short_name.replace("()", UNIT_NAME);
    let mut out = String::with_capacity(short_name.len());
    for ch in short_name.chars() {
        match ch {
            '<' | ',' | ';' => out.push('-'),
            '[' => out.push_str("array-"),
            '&' => out.push_str("ref-"),
            c if c.is_alphanumeric() || c == '_' || c == '-' => out.push(c),
            _ => {}
        }
    }
    out
}
