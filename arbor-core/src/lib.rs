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

//! # Arbor Core
//!
//! The marshalling engine of Arbor: it turns an in-memory object graph into a
//! nested tree of named nodes by dispatching every value it meets to a
//! type-specific converter, and refuses to loop forever on cyclic graphs.
//!
//! ## Architecture
//!
//! - **`marshaller`**: the recursive dispatch loop ([`TreeMarshaller`])
//! - **`converter`**: the converter protocol and built-in converters
//! - **`resolver`**: converter lookup, identity bookkeeping and the per-call
//!   scratch store
//! - **`io`**: hierarchical writer/reader traits and an in-memory tree
//! - **`mapper`**: type-to-node-name policy
//! - **`unmarshaller`**: the context converters read nested values through
//! - **`arbor`**: the [`Arbor`] facade tying it together
//! - **`types`**, **`config`**, **`error`**: supporting definitions
//!
//! ## Cycle detection
//!
//! While a value is being converted its identity (address plus runtime type)
//! sits on the ancestor path. Meeting the same identity again before it is
//! popped raises [`Error::CircularReference`]. Shared values that are not
//! their own ancestors (siblings, or values revisited after their subtree is
//! done) marshal normally, once per occurrence.
//!
//! ```rust
//! use arbor_core::{Arbor, RcConverter, RefCellConverter, VecConverter};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let mut arbor = Arbor::default();
//! arbor.register_converter(VecConverter::<Rc<RefCell<i32>>>::new());
//! arbor.register_converter(RcConverter::<RefCell<i32>>::new());
//! arbor.register_converter(RefCellConverter::<i32>::new());
//!
//! let shared = Rc::new(RefCell::new(7));
//! let tree = arbor.to_tree(&vec![shared.clone(), shared]).unwrap();
//! assert_eq!(tree.children().len(), 2);
//! assert_eq!(tree.children()[1].value(), Some("7"));
//! ```

pub mod arbor;
pub mod config;
pub mod converter;
pub mod error;
pub mod io;
pub mod mapper;
pub mod marshaller;
pub mod resolver;
pub mod types;
pub mod unmarshaller;

pub use crate::arbor::Arbor;
pub use crate::config::Config;
pub use crate::converter::{
    AtomicIntegerConverter, ArcConverter, BoxConverter, Converter, OptionConverter,
    RcConverter, RefCellConverter, SingleValueConverter, SingleValueConverterWrapper,
    VecConverter,
};
pub use crate::error::Error;
pub use crate::io::{HierarchicalReader, HierarchicalWriter, Node, TreeReader, TreeWriter};
pub use crate::mapper::{DefaultMapper, Mapper};
pub use crate::marshaller::TreeMarshaller;
pub use crate::resolver::{ConverterLookup, DataHolder, DefaultConverterLookup, Priority};
pub use crate::types::{Identity, Object, TypeDescriptor};
pub use crate::unmarshaller::UnmarshallingContext;
