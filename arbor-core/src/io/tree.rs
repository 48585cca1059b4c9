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

use super::{HierarchicalReader, HierarchicalWriter};
use crate::error::Error;
use crate::types::TypeDescriptor;
use std::fmt;

/// One node of an in-memory tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
    name: String,
    attributes: Vec<(String, String)>,
    value: Option<String>,
    children: Vec<Node>,
    type_hint: Option<TypeDescriptor>,
}

impl Node {
    pub fn new<S: Into<String>>(name: S) -> Node {
        Node {
            name: name.into(),
            ..Node::default()
        }
    }

    pub fn with_value<S: Into<String>>(mut self, value: S) -> Node {
        self.value = Some(value.into());
        self
    }

    pub fn with_attribute<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Node {
        self.set_attribute(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Node {
        self.children.push(child);
        self
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    #[inline(always)]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Runtime type announced through `start_node_with_type`, if any.
    #[inline(always)]
    pub fn type_hint(&self) -> Option<&TypeDescriptor> {
        self.type_hint.as_ref()
    }

    /// Number of nodes in this subtree, this one included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    fn set_attribute(&mut self, name: String, value: String) {
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "{:indent$}<{}", "", self.name, indent = indent)?;
        for (k, v) in &self.attributes {
            write!(f, " {}=\"{}\"", k, escape(v))?;
        }
        match (&self.value, self.children.is_empty()) {
            (None, true) => writeln!(f, "/>"),
            (Some(v), true) => writeln!(f, ">{}</{}>", escape(v), self.name),
            (value, false) => {
                write!(f, ">")?;
                if let Some(v) = value {
                    write!(f, "{}", escape(v))?;
                }
                writeln!(f)?;
                for child in &self.children {
                    child.fmt_indented(f, indent + 2)?;
                }
                writeln!(f, "{:indent$}</{}>", "", self.name, indent = indent)
            }
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Debug rendering as indented XML-like text.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

/// [`HierarchicalWriter`] that assembles a [`Node`] tree in memory.
///
/// Unbalanced calls are reported as [`Error::NodeMismatch`].
#[derive(Debug, Default)]
pub struct TreeWriter {
    open: Vec<Node>,
    root: Option<Node>,
    opened: usize,
}

impl TreeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `start_node` calls seen so far.
    #[inline(always)]
    pub fn nodes_started(&self) -> usize {
        self.opened
    }

    /// Number of nodes opened but not yet closed.
    #[inline(always)]
    pub fn open_depth(&self) -> usize {
        self.open.len()
    }

    /// Returns the finished root node.
    pub fn into_root(self) -> Result<Node, Error> {
        if !self.open.is_empty() {
            return Err(Error::node_mismatch(format!(
                "{} node(s) still open",
                self.open.len()
            )));
        }
        self.root
            .ok_or_else(|| Error::node_mismatch("No node has been written"))
    }

    fn push(&mut self, node: Node) -> Result<(), Error> {
        if self.open.is_empty() && self.root.is_some() {
            return Err(Error::node_mismatch(format!(
                "Cannot start a second root node '{}'",
                node.name
            )));
        }
        self.opened += 1;
        self.open.push(node);
        Ok(())
    }

    fn current(&mut self) -> Result<&mut Node, Error> {
        self.open
            .last_mut()
            .ok_or_else(|| Error::node_mismatch("No node is open"))
    }
}

impl HierarchicalWriter for TreeWriter {
    fn start_node(&mut self, name: &str) -> Result<(), Error> {
        self.push(Node::new(name))
    }

    fn start_node_with_type(&mut self, name: &str, ty: &TypeDescriptor) -> Result<(), Error> {
        let mut node = Node::new(name);
        node.type_hint = Some(*ty);
        self.push(node)
    }

    fn add_attribute(&mut self, name: &str, value: &str) -> Result<(), Error> {
        self.current()?
            .set_attribute(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_value(&mut self, text: &str) -> Result<(), Error> {
        self.current()?.value = Some(text.to_string());
        Ok(())
    }

    fn end_node(&mut self) -> Result<(), Error> {
        let node = self
            .open
            .pop()
            .ok_or_else(|| Error::node_mismatch("end_node without matching start_node"))?;
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root = Some(node),
        }
        Ok(())
    }
}

/// [`HierarchicalReader`] walking a borrowed [`Node`] tree.
pub struct TreeReader<'a> {
    // (node, index of the next child to visit)
    path: Vec<(&'a Node, usize)>,
}

impl<'a> TreeReader<'a> {
    pub fn new(root: &'a Node) -> TreeReader<'a> {
        TreeReader {
            path: vec![(root, 0)],
        }
    }

    /// Depth below the root, `0` while positioned on the root.
    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }

    fn node(&self) -> &'a Node {
        self.path[self.path.len() - 1].0
    }
}

impl HierarchicalReader for TreeReader<'_> {
    fn node_name(&self) -> &str {
        self.node().name()
    }

    fn value(&mut self) -> String {
        self.node().value().unwrap_or_default().to_string()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.node().attribute(name).map(str::to_string)
    }

    fn has_more_children(&mut self) -> bool {
        let (node, next) = self.path[self.path.len() - 1];
        next < node.children.len()
    }

    fn move_down(&mut self) -> Result<(), Error> {
        let last = self.path.len() - 1;
        let (node, next) = self.path[last];
        let child = node.children.get(next).ok_or_else(|| {
            Error::node_mismatch(format!("Node '{}' has no more children", node.name))
        })?;
        self.path[last].1 = next + 1;
        self.path.push((child, 0));
        Ok(())
    }

    fn move_up(&mut self) -> Result<(), Error> {
        if self.path.len() == 1 {
            return Err(Error::node_mismatch("Cannot move up from the root node"));
        }
        self.path.pop();
        Ok(())
    }
}
