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

use arbor::{Arbor, Error, Node, TreeMarshaller, TreeWriter, TypeDescriptor, VecConverter};
use tests::{capture_logs, item_arbor, link, Event, Item, ItemRef, RecordingWriter};

#[test]
fn test_null_root_writes_single_empty_node() {
    let arbor = Arbor::default();
    let mut writer = TreeWriter::new();
    arbor.marshal(None, &mut writer, None).unwrap();
    let root = writer.into_root().unwrap();
    assert_eq!(root, Node::new("null"));
}

#[test]
fn test_scalar_root() {
    let arbor = Arbor::default();
    let tree = arbor.to_tree(&String::from("hello")).unwrap();
    assert_eq!(tree.name(), "String");
    assert_eq!(tree.value(), Some("hello"));
    assert!(tree.children().is_empty());
    assert_eq!(tree.type_hint(), Some(&TypeDescriptor::of::<String>()));
}

#[test]
fn test_type_hints_can_be_disabled() {
    let arbor = Arbor::default().type_hints(false);
    let tree = arbor.to_tree(&7u16).unwrap();
    assert_eq!(tree.name(), "u16");
    assert_eq!(tree.type_hint(), None);

    let mut writer = RecordingWriter::new();
    arbor.marshal(Some(&7u16), &mut writer, None).unwrap();
    assert_eq!(writer.typed_starts, 0);

    let mut writer = RecordingWriter::new();
    Arbor::default()
        .marshal(Some(&7u16), &mut writer, None)
        .unwrap();
    assert_eq!(writer.typed_starts, 1);
}

#[test]
fn test_acyclic_graph_is_depth_first() {
    let arbor = item_arbor();
    let root = Item::new_ref("root");
    let c1 = Item::new_ref("c1");
    let g1 = Item::new_ref("g1");
    let c2 = Item::new_ref("c2");
    link(&root, &c1);
    link(&c1, &g1);
    link(&root, &c2);

    let mut writer = RecordingWriter::new();
    arbor.marshal(Some(&root), &mut writer, None).unwrap();

    let attr = |v: &str| Event::Attribute("label".to_string(), v.to_string());
    let start = |n: &str| Event::Start(n.to_string());
    assert_eq!(
        writer.events,
        vec![
            start("item"),
            attr("root"),
            start("item"),
            attr("c1"),
            start("item"),
            attr("g1"),
            Event::End,
            Event::End,
            start("item"),
            attr("c2"),
            Event::End,
            Event::End,
        ]
    );
    assert_eq!(writer.starts(), 4);
    assert_eq!(writer.ends(), 4);
    assert!(writer.is_well_nested());
}

#[test]
fn test_graph_round_trip_through_tree() {
    let arbor = item_arbor();
    let root = Item::new_ref("root");
    let leaf = Item::new_ref("leaf");
    link(&root, &leaf);

    let tree = arbor.to_tree(&root).unwrap();
    assert_eq!(tree.count(), 2);
    assert_eq!(tree.attribute("label"), Some("root"));

    let back: ItemRef = arbor.from_tree(&tree).unwrap();
    let back = back.borrow();
    assert_eq!(back.label, "root");
    assert_eq!(back.children.len(), 1);
    assert_eq!(back.children[0].borrow().label, "leaf");
}

#[test]
fn test_missing_converter_is_resolution_error() {
    let arbor = Arbor::empty();
    let err = arbor.to_tree(&5i32).unwrap_err();
    match err {
        Error::Resolution(ref name) => assert_eq!(name, "i32"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_conversion_error());
    assert!(!err.is_circular_reference());
}

#[test]
fn test_nested_resolution_error_leaves_no_ancestors() {
    let mut arbor = Arbor::default();
    arbor.register_converter(VecConverter::<Item>::new());

    let items = vec![Item::default()];
    let mut writer = TreeWriter::new();
    let mut marshaller = TreeMarshaller::new(&mut writer, arbor.lookup(), arbor.mapper());
    let err = marshaller.start(Some(&items), None).unwrap_err();
    match err {
        Error::Resolution(ref name) => assert!(name.ends_with("Item"), "{name}"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(marshaller.ancestor_depth(), 0);
}

#[test]
fn test_vec_and_option_round_trip() {
    let mut arbor = Arbor::default();
    arbor.register_converter(VecConverter::<i32>::new());
    arbor.register_converter(arbor::OptionConverter::<String>::new());

    let tree = arbor.to_tree(&vec![3, -1, 0x10]).unwrap();
    assert_eq!(tree.name(), "Vec-i32");
    let values: Vec<_> = tree.children().iter().map(|c| c.value()).collect();
    assert_eq!(values, vec![Some("3"), Some("-1"), Some("16")]);
    let back: Vec<i32> = arbor.from_tree(&tree).unwrap();
    assert_eq!(back, vec![3, -1, 16]);

    let some = arbor.to_tree(&Some(String::from("x"))).unwrap();
    assert_eq!(some.children().len(), 1);
    assert_eq!(some.children()[0].value(), Some("x"));
    let none = arbor.to_tree(&None::<String>).unwrap();
    assert!(none.children().is_empty());
    assert_eq!(
        arbor.from_tree::<Option<String>>(&some).unwrap(),
        Some(String::from("x"))
    );
    assert_eq!(arbor.from_tree::<Option<String>>(&none).unwrap(), None);
}

#[test]
fn test_max_depth_guard() {
    let nested = vec![vec![vec![1i32]]];
    let configure = |arbor: Arbor| {
        let mut arbor = arbor;
        arbor.register_converter(VecConverter::<i32>::new());
        arbor.register_converter(VecConverter::<Vec<i32>>::new());
        arbor.register_converter(VecConverter::<Vec<Vec<i32>>>::new());
        arbor
    };

    let shallow = configure(Arbor::default().max_depth(3));
    let err = shallow.to_tree(&nested).unwrap_err();
    assert!(matches!(err, Error::DepthExceed(_)));

    let deep_enough = configure(Arbor::default().max_depth(4));
    let tree = deep_enough.to_tree(&nested).unwrap();
    assert_eq!(tree.count(), 4);

    let unbounded = configure(Arbor::default());
    assert!(unbounded.to_tree(&nested).is_ok());
}

#[test]
fn test_null_root_reads_back_as_none() {
    let arbor = Arbor::default();
    let null = Node::new("null");
    let mut reader = arbor::TreeReader::new(&null);
    let value = arbor
        .unmarshal(&mut reader, &TypeDescriptor::of::<i32>(), None)
        .unwrap();
    assert!(value.is_none());
    assert!(arbor.from_tree::<i32>(&null).is_err());
}

#[test]
fn test_each_conversion_logs_entry_and_exit() {
    let mut arbor = Arbor::default();
    arbor.register_converter(VecConverter::<i32>::new());

    let logs = capture_logs(|| {
        arbor.to_tree(&vec![1, 2]).unwrap();
    });
    assert_eq!(logs.matches("converting").count(), 3, "{logs}");
    assert_eq!(logs.matches("converted").count(), 3, "{logs}");

    // exit is logged on the error path as well
    let logs = capture_logs(|| {
        let mut arbor = Arbor::default();
        arbor.register_converter(VecConverter::<Item>::new());
        assert!(arbor.to_tree(&vec![Item::default()]).is_err());
    });
    assert_eq!(logs.matches("converting").count(), 1, "{logs}");
    assert_eq!(logs.matches("converted").count(), 1, "{logs}");
}
