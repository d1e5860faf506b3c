/*
 * Copyright (C) 2025 Reflect JSON Contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

//! End-to-end scenarios, one test per row of the S1-S8 table.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use reflectjson::{Error, Json, Reflect, SerializerBuilder, Shape};

#[test]
fn s1_empty_object_renders_empty_braces() {
    #[derive(Json)]
    struct Empty {}

    let s = SerializerBuilder::new().build();
    assert_eq!(s.to_json(&Empty {}).unwrap(), "{}");
}

#[test]
fn s2_int_array_renders_in_order() {
    let s = SerializerBuilder::new().build();
    let v = vec![1, 2, 3, 4, 5, 6, 7, 8, 9];
    assert_eq!(s.to_json(&v).unwrap(), "[1,2,3,4,5,6,7,8,9]");
}

#[test]
fn s3_mixed_primitive_object_serializes_in_declaration_order() {
    #[derive(Json)]
    struct Mixed {
        #[json(rename = "intVal")]
        int_val: i32,
        #[json(rename = "longVal")]
        long_val: i64,
        #[json(rename = "boolVal")]
        bool_val: bool,
        #[json(rename = "strVal")]
        str_val: String,
    }

    let s = SerializerBuilder::new().build();
    let v = Mixed { int_val: 10, long_val: 20, bool_val: false, str_val: "stringValue".to_string() };
    assert_eq!(
        s.to_json(&v).unwrap(),
        r#"{"intVal":10,"longVal":20,"boolVal":false,"strVal":"stringValue"}"#
    );
}

/// `Node`'s own `children` collapse into its own `shape()` (rather than a
/// named field) purely to keep the fixture small; what matters for this
/// scenario is that `a`'s own list of children contains `a` itself.
struct Node(RefCell<Vec<&'static Node>>);

impl Reflect for Node {
    fn type_info() -> reflectjson::TypeInfo {
        reflectjson::TypeInfo::of::<Node>()
    }
    fn dyn_type_info(&self) -> reflectjson::TypeInfo {
        Self::type_info()
    }
    fn shape(&self) -> Shape<'_> {
        let children = self.0.borrow();
        Shape::Array(children.iter().map(|n| *n as &dyn Reflect).collect())
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn s4_self_referential_children_fail_with_cycle_detected() {
    let a: &'static Node = Box::leak(Box::new(Node(RefCell::new(Vec::new()))));
    a.0.borrow_mut().push(a);

    let s = SerializerBuilder::new().build();
    let err = s.to_json(a).unwrap_err();
    assert!(matches!(err, Error::CycleDetected { .. }));
}

#[test]
fn s5_version_ceiling_excludes_newer_fields() {
    #[derive(Json)]
    struct Versioned {
        untagged: i32,
        #[json(since = "1.1")]
        new_field: i32,
    }

    let s = SerializerBuilder::new().version(1.0).build();
    let v = Versioned { untagged: 1, new_field: 2 };
    assert_eq!(s.to_json(&v).unwrap(), r#"{"untagged":1}"#);
}

#[test]
fn s6_url_serializes_to_its_canonical_string_form() {
    let s = SerializerBuilder::new().build();
    let u = url::Url::parse("http://google.com/").unwrap();
    assert_eq!(s.to_json(&u).unwrap(), r#""http://google.com/""#);
}

#[test]
fn s7_flattened_ancestor_fields_serialize_ahead_of_own_fields() {
    #[derive(Json, Default)]
    struct Base {
        id: i32,
    }

    #[derive(Json)]
    struct Derived {
        #[json(flatten)]
        base: Base,
        name: String,
    }

    let s = SerializerBuilder::new().build();
    let v = Derived { base: Base { id: 1 }, name: "x".to_string() };
    assert_eq!(s.to_json(&v).unwrap(), r#"{"id":1,"name":"x"}"#);
}

#[test]
fn s8_dag_shaped_value_round_trips_structurally() {
    #[derive(Json, Default, Clone, PartialEq, Debug)]
    struct Leaf {
        value: i32,
    }

    #[derive(Json, Default, Clone, PartialEq, Debug)]
    struct Dag {
        left: Rc<Leaf>,
        right: Rc<Leaf>,
    }

    let s = SerializerBuilder::new().build();
    let shared = Rc::new(Leaf { value: 7 });
    let v = Dag { left: shared.clone(), right: shared };

    let json = s.to_json(&v).unwrap();
    assert_eq!(json, r#"{"left":{"value":7},"right":{"value":7}}"#);

    let back: Dag = s.from_json(&json).unwrap();
    assert_eq!(back, v);
}
