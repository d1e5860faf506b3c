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

//! The symmetric counterpart to `navigator`/`visitor`: builds a `T` back up
//! from a `serde_json::Value` tree.
//!
//! Unlike `Reflect` (which must be object-safe so a struct's heterogeneous
//! fields can be enumerated as `&dyn Reflect`), `ReflectMut` never needs a
//! trait-object form — a caller always knows the concrete `T` it wants back
//! out, the same way `serde::Deserialize` is never invoked through `dyn`.
//! The derive macro generates one `from_json_value` per annotated type that
//! recurses into its fields' own `ReflectMut` impls directly.

use crate::construct::Construct;
use crate::error::{Error, Result};
use crate::exclusion::ExclusionStrategy;
use crate::field::FieldDescriptor;
use crate::handler::HandlerMap;
use crate::type_info::TypeInfo;
use std::any::Any;
use std::sync::Arc;

/// Per-call state for deserialization: the same handler registry and
/// exclusion policy a `Serializer` was built with. JSON trees are finite by
/// construction, so unlike `Context` this carries no visited-set.
pub struct DeContext {
    pub(crate) handlers: Arc<HandlerMap>,
    pub(crate) exclusion: Arc<dyn ExclusionStrategy>,
}

impl DeContext {
    pub fn new(handlers: Arc<HandlerMap>, exclusion: Arc<dyn ExclusionStrategy>) -> Self {
        DeContext { handlers, exclusion }
    }
}

/// Implemented by every type that can be rebuilt from a `serde_json::Value`.
pub trait ReflectMut: Sized + 'static {
    fn type_info() -> TypeInfo;

    /// Rebuilds `Self` from `value`. Consults `ctx.handlers` for a
    /// registered deserializer before falling back to the derive-generated
    /// (or manually written, for primitives/containers) shape traversal.
    fn from_json_value(value: &serde_json::Value, ctx: &mut DeContext) -> Result<Self> {
        deserialize(value, ctx)
    }

    /// Sets one declared field on an already-constructed `self`. The
    /// default no-op is correct for every non-struct type; the derive macro
    /// overrides it for structs with a match over `json_name`.
    fn set_field(&mut self, _json_name: &'static str, _value: &serde_json::Value, _ctx: &mut DeContext) -> Result<()> {
        Ok(())
    }

    /// The fields a struct declares, in emission order (flattened/"ancestor"
    /// fields first). Empty for non-struct types.
    fn declared_fields() -> &'static [FieldDescriptor] {
        &[]
    }

    /// `from_json_value` for struct types that go through `Construct`: get
    /// a blank instance, then populate it field by field. Pulled out of the
    /// default `from_json_value` body so the derive macro can call it
    /// directly without re-deriving the handler lookup.
    fn construct_and_populate(value: &serde_json::Value, ctx: &mut DeContext) -> Result<Self>
    where
        Self: Construct,
    {
        let mut instance = crate::construct::new_instance::<Self>(&ctx.handlers)?;
        for field in Self::declared_fields() {
            if ctx.exclusion.should_skip_field(field) {
                continue;
            }
            if let Some(v) = value.get(field.json_name) {
                instance.set_field(field.json_name, v, ctx)?;
            }
        }
        Ok(instance)
    }
}

/// The default body of `from_json_value`: consults the handler registry,
/// then reports failure. Every concrete `ReflectMut` impl in this crate
/// (primitives, containers, derive-generated structs/enums) overrides
/// `from_json_value` directly instead of relying on this fallback — it
/// exists so the trait has a total default and a third-party impl that
/// forgets to override `from_json_value` fails loudly instead of silently
/// compiling to a no-op.
pub fn deserialize<T: ReflectMut>(value: &serde_json::Value, ctx: &mut DeContext) -> Result<T> {
    let info = T::type_info();
    if let Some(handler) = ctx.handlers.deserializer_for(&info).cloned() {
        let boxed: Box<dyn Any> = handler(value)?;
        return boxed
            .downcast::<T>()
            .map(|b| *b)
            .map_err(|_| Error::Unconstructible { type_name: info.display_name });
    }
    Err(Error::TypeMismatch { expected: info, found: "no deserialization path" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::Disjunction;

    fn fresh_ctx() -> DeContext {
        DeContext::new(Arc::new(HandlerMap::new()), Arc::new(Disjunction::default_composition()))
    }

    struct Tagged(i32);
    impl ReflectMut for Tagged {
        fn type_info() -> TypeInfo {
            TypeInfo::of::<Tagged>()
        }
        fn from_json_value(value: &serde_json::Value, ctx: &mut DeContext) -> Result<Self> {
            if let Some(handler) = ctx.handlers.deserializer_for(&Self::type_info()).cloned() {
                let boxed = handler(value)?;
                return boxed.downcast::<Self>().map(|b| *b).map_err(|_| Error::Unconstructible {
                    type_name: Self::type_info().display_name,
                });
            }
            value
                .as_i64()
                .map(|n| Tagged(n as i32))
                .ok_or(Error::TypeMismatch { expected: Self::type_info(), found: "not a number" })
        }
    }

    #[test]
    fn registered_deserializer_takes_priority_over_default_path() {
        let mut handlers = HandlerMap::new();
        handlers.register_deserializer::<Tagged, _>(|_v| Ok(Tagged(999)));
        let mut ctx = DeContext::new(Arc::new(handlers), Arc::new(Disjunction::default_composition()));
        let v = Tagged::from_json_value(&serde_json::json!(1), &mut ctx).unwrap();
        assert_eq!(v.0, 999);
    }

    #[test]
    fn falls_back_to_type_specific_parsing_without_registration() {
        let mut ctx = fresh_ctx();
        let v = Tagged::from_json_value(&serde_json::json!(42), &mut ctx).unwrap();
        assert_eq!(v.0, 42);
    }

    #[test]
    fn mismatched_shape_reports_type_mismatch() {
        let mut ctx = fresh_ctx();
        let err = Tagged::from_json_value(&serde_json::json!("nope"), &mut ctx).unwrap_err();
        assert!(err.to_string().contains("not a number"));
    }
}
