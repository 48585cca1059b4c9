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

//! Runtime type descriptors and object identity.
//!
//! The engine never inspects values structurally. It needs two facts about
//! every value it meets: *what* it is ([`TypeDescriptor`], used to pick a
//! converter and a node name) and *which* instance it is ([`Identity`], used to
//! detect that a value is its own ancestor).

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Stable descriptor of a runtime type.
///
/// Equality and hashing only consider the [`TypeId`]; the name is carried for
/// diagnostics and node naming.
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
}

impl TypeDescriptor {
    #[inline(always)]
    pub fn of<T: ?Sized + 'static>() -> TypeDescriptor {
        TypeDescriptor {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    #[inline(always)]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name, e.g. `alloc::vec::Vec<alloc::string::String>`.
    #[inline(always)]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Type name with every module path removed, e.g. `Vec<String>`.
    pub fn short_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut segment = String::new();
        for ch in self.name.chars() {
            if ch.is_alphanumeric() || ch == '_' || ch == ':' {
                segment.push(ch);
            } else {
                flush_segment(&mut segment, &mut out);
                out.push(ch);
            }
        }
        flush_segment(&mut segment, &mut out);
        out
    }
}

fn flush_segment(segment: &mut String, out: &mut String) {
    if !segment.is_empty() {
        out.push_str(segment.rsplit("::").next().unwrap_or(segment.as_str()));
        segment.clear();
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({})", self.name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A node of the object graph, seen through a trait object.
///
/// Implemented for every `'static` type, so any `&T` coerces into
/// `&dyn Object`. Pass the pointee, not the pointer: `&*boxed` for a
/// `Box<dyn Object>`, otherwise the box itself becomes the marshalled value.
pub trait Object: Any {
    fn type_descriptor(&self) -> TypeDescriptor;

    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> Object for T {
    #[inline(always)]
    fn type_descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<T>()
    }

    #[inline(always)]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Opaque identity token of one value instance.
///
/// Made of the value's address and its [`TypeId`]. Two instances with equal
/// content never share an identity. A struct and its first field share an
/// address but not a type, so they stay distinct too.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Identity {
    addr: usize,
    type_id: TypeId,
}

impl Identity {
    #[inline(always)]
    pub fn of(item: &dyn Object) -> Identity {
        Identity {
            addr: item as *const dyn Object as *const () as usize,
            type_id: item.as_any().type_id(),
        }
    }

    #[inline(always)]
    pub fn addr(&self) -> usize {
        self.addr
    }
}
