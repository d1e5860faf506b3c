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

//! `ObjectNavigator`: the recursive traversal at the heart of
//! serialization, implementing a fixed priority order.
//!
//! Priority, highest first: null, enum, registered handler (exact then
//! raw), array, map, object-with-fields, primitive. A registered handler is
//! treated as terminal — once one claims a declared type, the navigator
//! never falls through to shape-based traversal for it, which is a
//! deliberate simplification of the more general "if the handler declines,
//! continue" wording; this crate's handler closures have no declined-match
//! signal to express that with.
//!
//! Every non-null call emits a `trace`-level span carrying the declared
//! type name and the current recursion depth ([`Context::depth`]), so a
//! `tracing-subscriber` subscriber can observe the walk as it descends:
//!
//! ```
//! use reflectjson::SerializerBuilder;
//!
//! tracing_subscriber::fmt().with_test_writer().try_init().ok();
//!
//! let serializer = SerializerBuilder::new().build();
//! let json = serializer.to_json(&vec![1, 2, 3]).unwrap();
//! assert_eq!(json, "[1,2,3]");
//! ```

use crate::adapter::primitive_to_value;
use crate::error::Result;
use crate::reflect::{Reflect, Shape};
use crate::visitor::Context;

pub fn navigate(value: &dyn Reflect, ctx: &mut Context) -> Result<serde_json::Value> {
    if value.is_null() {
        return Ok(serde_json::Value::Null);
    }

    let info = value.dyn_type_info();
    let _span =
        tracing::trace_span!("navigate", type_name = info.display_name, depth = ctx.depth())
            .entered();

    if let Some(handler) = ctx.handlers.serializer_for(&info).cloned() {
        return handler(value, ctx);
    }

    match value.shape() {
        Shape::Primitive(p) => Ok(primitive_to_value(&p)),

        Shape::Enum { variant_name } => Ok(serde_json::Value::String(variant_name.to_string())),

        Shape::Array(items) => {
            let _guard = ctx.enter(value.identity(), info.display_name)?;
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(navigate(item, ctx)?);
            }
            Ok(serde_json::Value::Array(out))
        }

        Shape::Map(entries) => {
            let _guard = ctx.enter(value.identity(), info.display_name)?;
            let mut out = serde_json::Map::new();
            for (key, val) in entries {
                out.insert(key, navigate(val, ctx)?);
            }
            Ok(serde_json::Value::Object(out))
        }

        Shape::Object(fields) => {
            let _guard = ctx.enter(value.identity(), info.display_name)?;
            if ctx.exclusion.should_skip_class(&info) {
                return Ok(serde_json::Value::Object(serde_json::Map::new()));
            }
            let mut out = serde_json::Map::new();
            for slot in fields {
                if ctx.exclusion.should_skip_field(slot.descriptor) {
                    continue;
                }
                if ctx.exclusion.should_skip_class(&slot.value.dyn_type_info()) {
                    continue;
                }
                if slot.value.is_null() && !ctx.include_nulls {
                    continue;
                }
                let rendered = navigate(slot.value, ctx)?;
                out.insert(slot.descriptor.json_name.to_string(), rendered);
            }
            Ok(serde_json::Value::Object(out))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::Disjunction;
    use crate::field::{FieldDescriptor, FieldModifiers};
    use crate::handler::HandlerMap;
    use crate::reflect::{FieldSlot, Primitive};
    use crate::type_info::TypeInfo;
    use std::any::Any;
    use std::sync::Arc;

    struct Num(i32);
    impl Reflect for Num {
        fn type_info() -> TypeInfo {
            TypeInfo::of::<Num>()
        }
        fn dyn_type_info(&self) -> TypeInfo {
            Self::type_info()
        }
        fn shape(&self) -> Shape<'_> {
            Shape::Primitive(Primitive::Int(self.0 as i128))
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    static NAME_FIELD: FieldDescriptor = FieldDescriptor {
        name: "value",
        json_name: "value",
        declared_index: 0,
        modifiers: FieldModifiers::NONE,
        min_version: None,
        synthetic: false,
    };
    static HIDDEN_FIELD: FieldDescriptor = FieldDescriptor {
        name: "hidden",
        json_name: "hidden",
        declared_index: 1,
        modifiers: FieldModifiers::TRANSIENT,
        min_version: None,
        synthetic: false,
    };

    struct Widget {
        value: Num,
        hidden: Num,
    }
    impl Reflect for Widget {
        fn type_info() -> TypeInfo {
            TypeInfo::of::<Widget>()
        }
        fn dyn_type_info(&self) -> TypeInfo {
            Self::type_info()
        }
        fn shape(&self) -> Shape<'_> {
            Shape::Object(vec![
                FieldSlot { descriptor: &NAME_FIELD, value: &self.value },
                FieldSlot { descriptor: &HIDDEN_FIELD, value: &self.hidden },
            ])
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn fresh_context() -> Context {
        Context::new(
            Arc::new(HandlerMap::new()),
            Arc::new(Disjunction::default_composition()),
            false,
        )
    }

    #[test]
    fn primitive_renders_directly() {
        let mut ctx = fresh_context();
        let v = navigate(&Num(7), &mut ctx).unwrap();
        assert_eq!(v, serde_json::json!(7));
    }

    #[test]
    fn transient_field_is_excluded_by_default() {
        let mut ctx = fresh_context();
        let w = Widget { value: Num(1), hidden: Num(2) };
        let v = navigate(&w, &mut ctx).unwrap();
        assert_eq!(v, serde_json::json!({"value": 1}));
    }

    #[test]
    fn registered_handler_short_circuits_shape_traversal() {
        let mut handlers = HandlerMap::new();
        handlers.register_serializer::<Num, _>(|n, _ctx| Ok(serde_json::json!(n.0 * 100)));
        let mut ctx = Context::new(
            Arc::new(handlers),
            Arc::new(Disjunction::default_composition()),
            false,
        );
        let v = navigate(&Num(3), &mut ctx).unwrap();
        assert_eq!(v, serde_json::json!(300));
    }

    struct Pair(Num, Num);
    impl Reflect for Pair {
        fn type_info() -> TypeInfo {
            TypeInfo::of::<Pair>()
        }
        fn dyn_type_info(&self) -> TypeInfo {
            Self::type_info()
        }
        fn shape(&self) -> Shape<'_> {
            Shape::Array(vec![&self.0, &self.1])
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn nested_array_values_render_in_order() {
        let mut ctx = fresh_context();
        let v = navigate(&Pair(Num(1), Num(2)), &mut ctx).unwrap();
        assert_eq!(v, serde_json::json!([1, 2]));
    }

    #[test]
    fn repeated_but_distinct_instances_are_not_a_cycle() {
        // two array entries with equal *values* but distinct addresses must
        // not trip cycle detection, which keys on identity, not equality.
        let mut ctx = fresh_context();
        let v = navigate(&Pair(Num(5), Num(5)), &mut ctx).unwrap();
        assert_eq!(v, serde_json::json!([5, 5]));
    }
}
