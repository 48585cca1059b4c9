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

use arbor::{
    Converter, Error, Object, Priority, TreeMarshaller, TreeWriter, TypeDescriptor,
    UnmarshallingContext, VecConverter,
};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tests::{init_logging, item_arbor, link, unlink, Item, LenientItemConverter, RecordingWriter};

#[test]
fn test_two_item_cycle_is_rejected() {
    init_logging();
    let arbor = item_arbor();
    let a = Item::new_ref("a");
    let b = Item::new_ref("b");
    link(&a, &b);
    link(&b, &a);

    let mut writer = RecordingWriter::new();
    let err = arbor.marshal(Some(&a), &mut writer, None).unwrap_err();
    assert!(err.is_circular_reference());
    assert!(err.is_conversion_error());
    match &err {
        Error::CircularReference {
            item_type,
            converter_type,
        } => {
            assert!(item_type.contains("RefCell"), "{item_type}");
            assert!(item_type.contains("Item"), "{item_type}");
            assert!(converter_type.contains("RefCellConverter"), "{converter_type}");
        }
        other => panic!("unexpected error: {other}"),
    }
    // a, b, then the node opened for a again
    assert_eq!(writer.starts(), 3);
    assert_eq!(writer.labels(), vec!["a", "b"]);

    unlink(&[&a, &b]);
}

#[test]
fn test_self_reference_is_rejected() {
    let arbor = item_arbor();
    let a = Item::new_ref("a");
    link(&a, &a);

    let err = arbor.to_tree(&a).unwrap_err();
    assert!(err.is_circular_reference());
    assert!(err.to_string().contains("Recursive reference to parent object"));

    unlink(&[&a]);
}

#[test]
fn test_equal_but_distinct_items_are_not_cycles() {
    let arbor = item_arbor();
    let root = Item::new_ref("same");
    let child = Item::new_ref("same");
    let grandchild = Item::new_ref("same");
    link(&root, &child);
    link(&child, &grandchild);

    let tree = arbor.to_tree(&root).unwrap();
    assert_eq!(tree.count(), 3);
}

#[test]
fn test_shared_siblings_are_not_cycles() {
    let arbor = item_arbor();
    let root = Item::new_ref("root");
    let shared = Item::new_ref("shared");
    link(&root, &shared);
    link(&root, &shared);

    let mut writer = RecordingWriter::new();
    arbor.marshal(Some(&root), &mut writer, None).unwrap();
    assert_eq!(writer.labels(), vec!["root", "shared", "shared"]);
    assert!(writer.is_well_nested());
}

#[test]
fn test_diamond_is_written_twice() {
    let arbor = item_arbor();
    let top = Item::new_ref("top");
    let left = Item::new_ref("left");
    let right = Item::new_ref("right");
    let bottom = Item::new_ref("bottom");
    link(&top, &left);
    link(&top, &right);
    link(&left, &bottom);
    link(&right, &bottom);

    let mut writer = RecordingWriter::new();
    arbor.marshal(Some(&top), &mut writer, None).unwrap();
    assert_eq!(
        writer.labels(),
        vec!["top", "left", "bottom", "right", "bottom"]
    );
    assert_eq!(writer.starts(), writer.ends());
}

#[test]
fn test_ancestor_path_is_empty_after_each_call() {
    let arbor = item_arbor();
    let a = Item::new_ref("a");
    let b = Item::new_ref("b");
    link(&a, &b);

    let mut writer = TreeWriter::new();
    let mut marshaller = TreeMarshaller::new(&mut writer, arbor.lookup(), arbor.mapper());
    marshaller.start(Some(&a), None).unwrap();
    assert_eq!(marshaller.ancestor_depth(), 0);

    link(&b, &a);
    let mut writer = TreeWriter::new();
    let mut marshaller = TreeMarshaller::new(&mut writer, arbor.lookup(), arbor.mapper());
    let err = marshaller.start(Some(&a), None).unwrap_err();
    assert!(err.is_circular_reference());
    assert_eq!(marshaller.ancestor_depth(), 0);

    unlink(&[&a, &b]);
}

#[test]
fn test_converter_can_recover_from_cycle() {
    let mut arbor = item_arbor();
    arbor.register_converter_with_priority(LenientItemConverter, Priority::VERY_HIGH);
    let a = Item::new_ref("a");
    let b = Item::new_ref("b");
    link(&a, &b);
    link(&b, &a);

    let tree = arbor.to_tree(&a).unwrap();
    assert_eq!(tree.attribute("label"), Some("a"));
    let b_node = tree.child("item").unwrap();
    assert_eq!(b_node.attribute("label"), Some("b"));
    let back_to_a = b_node.child("item").unwrap();
    assert_eq!(back_to_a.attribute("cycle"), Some("true"));
    assert!(back_to_a.children().is_empty());

    // same instance, acyclic graph
    unlink(&[&b]);
    let tree = arbor.to_tree(&a).unwrap();
    assert_eq!(tree.count(), 2);

    unlink(&[&a]);
}

struct Fuse;

/// Panics instead of returning an error.
struct PanickingConverter;

impl Converter for PanickingConverter {
    fn can_convert(&self, ty: &TypeDescriptor) -> bool {
        ty.is::<Fuse>()
    }

    fn marshal(&self, _source: &dyn Object, _context: &mut TreeMarshaller<'_>) -> Result<(), Error> {
        panic!("fuse blown")
    }

    fn unmarshal(&self, _context: &mut UnmarshallingContext<'_>) -> Result<Box<dyn Any>, Error> {
        panic!("fuse blown")
    }
}

#[test]
fn test_ancestor_path_is_empty_after_converter_panic() {
    let mut arbor = item_arbor();
    arbor.register_converter(PanickingConverter);
    arbor.register_converter(VecConverter::<Fuse>::new());
    let fuses = vec![Fuse];

    let mut writer = RecordingWriter::new();
    let mut marshaller = TreeMarshaller::new(&mut writer, arbor.lookup(), arbor.mapper());
    let result = catch_unwind(AssertUnwindSafe(|| marshaller.start(Some(&fuses), None)));
    assert!(result.is_err());
    assert_eq!(marshaller.ancestor_depth(), 0);

    // the marshaller is still usable afterwards
    let a = Item::new_ref("a");
    marshaller.start(Some(&a), None).unwrap();
    assert_eq!(marshaller.ancestor_depth(), 0);
}
