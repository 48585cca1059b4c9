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

//! # Arbor
//!
//! Arbor turns object graphs into hierarchical trees (and back) through
//! pluggable converters. Every value is dispatched to the converter registered
//! for its runtime type; converters recurse into nested values through the
//! marshalling context, and a value that contains itself is reported as
//! [`Error::CircularReference`] instead of recursing forever.
//!
//! ## Writing a converter
//!
//! ```rust
//! use arbor::{Arbor, Converter, Error, Object, TreeMarshaller, TypeDescriptor,
//!             UnmarshallingContext};
//! use arbor::converter::{expect_source, expect_value};
//! use std::any::Any;
//!
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! struct PointConverter;
//!
//! impl Converter for PointConverter {
//!     fn can_convert(&self, ty: &TypeDescriptor) -> bool {
//!         ty.is::<Point>()
//!     }
//!
//!     fn marshal(&self, source: &dyn Object, context: &mut TreeMarshaller<'_>) -> Result<(), Error> {
//!         let point = expect_source::<Point>(source)?;
//!         for (name, value) in [("x", &point.x), ("y", &point.y)] {
//!             context.writer().start_node(name)?;
//!             context.convert_another(value)?;
//!             context.writer().end_node()?;
//!         }
//!         Ok(())
//!     }
//!
//!     fn unmarshal(&self, context: &mut UnmarshallingContext<'_>) -> Result<Box<dyn Any>, Error> {
//!         let mut coords = [0i32; 2];
//!         for slot in coords.iter_mut() {
//!             context.reader().move_down()?;
//!             let value = context.convert_another(&TypeDescriptor::of::<i32>())?;
//!             *slot = *expect_value::<i32>(value)?;
//!             context.reader().move_up()?;
//!         }
//!         Ok(Box::new(Point { x: coords[0], y: coords[1] }))
//!     }
//! }
//!
//! # fn main() -> Result<(), Error> {
//! let mut arbor = Arbor::default();
//! arbor.register_converter(PointConverter);
//! arbor.alias::<Point>("point");
//!
//! let tree = arbor.to_tree(&Point { x: 1, y: -2 })?;
//! assert_eq!(tree.name(), "point");
//! assert_eq!(tree.child("y").and_then(|n| n.value()), Some("-2"));
//!
//! let point: Point = arbor.from_tree(&tree)?;
//! assert_eq!((point.x, point.y), (1, -2));
//! # Ok(())
//! # }
//! ```

pub use arbor_core::{
    bail, converter, ensure, error, io, mapper, marshaller, resolver, types, unmarshaller,
    Arbor, ArcConverter, AtomicIntegerConverter, BoxConverter, Config, Converter,
    ConverterLookup, DataHolder, DefaultConverterLookup, DefaultMapper, Error,
    HierarchicalReader, HierarchicalWriter, Identity, Mapper, Node, Object, OptionConverter,
    Priority, RcConverter, RefCellConverter, SingleValueConverter, SingleValueConverterWrapper,
    TreeMarshaller, TreeReader, TreeWriter, TypeDescriptor, UnmarshallingContext, VecConverter,
};
