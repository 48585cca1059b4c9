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

use arbor::converter::{expect_source, IntConverter};
use arbor::{
    Arbor, ConverterLookup, Error, Node, Object, Priority, SingleValueConverter,
    SingleValueConverterWrapper, TypeDescriptor, VecConverter,
};
use std::any::Any;
use std::sync::Arc;
use std::thread;

/// Writes `i32` in hex, tagged with a prefix so the winner is visible.
struct HexIntConverter(&'static str);

impl SingleValueConverter for HexIntConverter {
    fn can_convert(&self, ty: &TypeDescriptor) -> bool {
        ty.is::<i32>()
    }

    fn to_text(&self, source: &dyn Object) -> Result<String, Error> {
        Ok(format!("{}{:#x}", self.0, expect_source::<i32>(source)?))
    }

    fn from_text(&self, text: &str) -> Result<Box<dyn Any>, Error> {
        let text = text.strip_prefix(self.0).unwrap_or(text);
        IntConverter.from_text(text)
    }
}

fn register(arbor: &mut Arbor, tag: &'static str, priority: Priority) {
    arbor.register_converter_with_priority(
        SingleValueConverterWrapper::new(HexIntConverter(tag)),
        priority,
    );
}

#[test]
fn test_higher_priority_wins() {
    let mut arbor = Arbor::default();
    assert_eq!(arbor.to_tree(&255i32).unwrap().value(), Some("255"));

    register(&mut arbor, "low:", Priority::LOW);
    assert_eq!(arbor.to_tree(&255i32).unwrap().value(), Some("255"));

    register(&mut arbor, "high:", Priority::VERY_HIGH);
    let tree = arbor.to_tree(&255i32).unwrap();
    assert_eq!(tree.value(), Some("high:0xff"));
    assert_eq!(arbor.from_tree::<i32>(&tree).unwrap(), 255);
}

#[test]
fn test_latest_registration_wins_among_equals() {
    let mut arbor = Arbor::default();
    register(&mut arbor, "first:", Priority::NORMAL);
    register(&mut arbor, "second:", Priority::NORMAL);
    assert_eq!(arbor.to_tree(&16i32).unwrap().value(), Some("second:0x10"));
}

#[test]
fn test_low_priority_is_a_fallback() {
    let mut arbor = Arbor::empty();
    register(&mut arbor, "fallback:", Priority::VERY_LOW);
    assert_eq!(arbor.to_tree(&1i32).unwrap().value(), Some("fallback:0x1"));
}

#[test]
fn test_registration_flushes_cached_resolution() {
    let mut arbor = Arbor::default();
    let ty = TypeDescriptor::of::<i32>();
    let before = arbor.lookup().lookup_converter_for_type(&ty).unwrap();
    assert!(Arc::ptr_eq(
        &before,
        &arbor.lookup().lookup_converter_for_type(&ty).unwrap()
    ));

    register(&mut arbor, "new:", Priority::NORMAL);
    let after = arbor.lookup().lookup_converter_for_type(&ty).unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert!(after.name().contains("HexIntConverter"));
}

#[test]
fn test_instance_is_shared_across_threads() {
    let mut arbor = Arbor::default();
    arbor.register_converter(VecConverter::<i32>::new());
    let arbor = Arc::new(arbor);

    let handles: Vec<_> = (0..4)
        .map(|n| {
            let arbor = Arc::clone(&arbor);
            thread::spawn(move || {
                let values: Vec<i32> = (0..50).map(|i| i * n).collect();
                let tree = arbor.to_tree(&values).unwrap();
                let back: Vec<i32> = arbor.from_tree(&tree).unwrap();
                assert_eq!(back, values);
                tree
            })
        })
        .collect();

    for handle in handles {
        let tree: Node = handle.join().unwrap();
        assert_eq!(tree.children().len(), 50);
    }
}
