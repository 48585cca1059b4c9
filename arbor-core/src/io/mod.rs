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

//! Hierarchical tree I/O consumed and produced by converters.
//!
//! The engine only talks to [`HierarchicalWriter`]; converters additionally
//! read through [`HierarchicalReader`] when unmarshalling. [`tree`] holds an
//! in-memory implementation of both.

pub mod tree;

pub use tree::{Node, TreeReader, TreeWriter};

use crate::error::Error;
use crate::types::TypeDescriptor;

/// Sink for nested named nodes.
///
/// Every `start_node` must be paired with one `end_node`, in LIFO order.
pub trait HierarchicalWriter {
    fn start_node(&mut self, name: &str) -> Result<(), Error>;

    /// Opens a node and tells the writer which runtime type it stands for.
    ///
    /// Writers that make no use of the hint keep the default.
    #[allow(unused_variables)]
    fn start_node_with_type(&mut self, name: &str, ty: &TypeDescriptor) -> Result<(), Error> {
        self.start_node(name)
    }

    fn add_attribute(&mut self, name: &str, value: &str) -> Result<(), Error>;

    /// Sets the scalar text of the current node.
    fn set_value(&mut self, text: &str) -> Result<(), Error>;

    fn end_node(&mut self) -> Result<(), Error>;

    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// Cursor over nested named nodes.
///
/// Methods take `&mut self` so that streaming readers may consume input
/// lazily; callers that need both the text and the children of a node must
/// read the text first.
pub trait HierarchicalReader {
    fn node_name(&self) -> &str;

    /// Scalar text of the current node, empty if it has none.
    fn value(&mut self) -> String;

    fn attribute(&self, name: &str) -> Option<String>;

    /// Whether the current node has children not yet visited by `move_down`.
    fn has_more_children(&mut self) -> bool;

    /// Enters the next unvisited child.
    fn move_down(&mut self) -> Result<(), Error>;

    /// Leaves the current child and returns to its parent.
    fn move_up(&mut self) -> Result<(), Error>;
}
