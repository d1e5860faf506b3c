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

//! The built, immutable facade produced by `SerializerBuilder::build`.

use crate::config::Config;
use crate::deserialize::{DeContext, ReflectMut};
use crate::error::Result;
use crate::navigator;
use crate::reflect::Reflect;
use crate::type_info::TypeInfo;
use crate::visitor::Context;

/// Thread-shareable entry point for `to_json`/`to_json_as`/`from_json`.
/// `Send + Sync` because every collaborator it owns (`HandlerMap` entries,
/// the exclusion strategy, the formatter) is `Arc<dyn ... + Send + Sync>`.
pub struct Serializer {
    config: Config,
}

impl Serializer {
    pub(crate) fn from_config(config: Config) -> Self {
        Serializer { config }
    }

    pub fn include_nulls(&self) -> bool {
        self.config.include_nulls
    }

    /// Serializes `value` under its own declared type.
    pub fn to_json<T: Reflect>(&self, value: &T) -> Result<String> {
        self.to_json_as(value, T::type_info())
    }

    /// Serializes `value` under an explicitly supplied declared type,
    /// which only matters when it differs from `value`'s own runtime type
    /// (e.g. serializing a subtype value through a supertype handle).
    pub fn to_json_as<T: Reflect>(&self, value: &T, declared: TypeInfo) -> Result<String> {
        if value.is_null() || self.config.exclusion.should_skip_class(&declared) {
            return Ok(String::new());
        }
        let mut ctx = Context::new(
            self.config.handlers.clone(),
            self.config.exclusion.clone(),
            self.config.include_nulls,
        );
        let node = navigator::navigate(value, &mut ctx)?;
        self.config.formatter.render(&node)
    }

    /// Parses `text` and rebuilds a `T`, using the same handler registry
    /// and exclusion policy this `Serializer` was built with.
    pub fn from_json<T: ReflectMut>(&self, text: &str) -> Result<T> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let mut ctx = DeContext::new(self.config.handlers.clone(), self.config.exclusion.clone());
        T::from_json_value(&value, &mut ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SerializerBuilder;
    use crate::field::{FieldDescriptor, FieldModifiers};
    use crate::reflect::{FieldSlot, Primitive, Shape};
    use std::any::Any;

    struct Leaf(i32);
    impl Reflect for Leaf {
        fn type_info() -> TypeInfo {
            TypeInfo::of::<Leaf>()
        }
        fn dyn_type_info(&self) -> TypeInfo {
            Self::type_info()
        }
        fn is_null(&self) -> bool {
            false
        }
        fn shape(&self) -> Shape<'_> {
            Shape::Primitive(Primitive::Int(self.0 as i128))
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct NullLeaf;
    impl Reflect for NullLeaf {
        fn type_info() -> TypeInfo {
            TypeInfo::of::<NullLeaf>()
        }
        fn dyn_type_info(&self) -> TypeInfo {
            Self::type_info()
        }
        fn is_null(&self) -> bool {
            true
        }
        fn shape(&self) -> Shape<'_> {
            unreachable!("is_null short-circuits before shape() is consulted")
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    static FIELD: FieldDescriptor = FieldDescriptor {
        name: "n",
        json_name: "n",
        declared_index: 0,
        modifiers: FieldModifiers::NONE,
        min_version: None,
        synthetic: false,
    };

    struct Holder {
        n: Leaf,
    }
    impl Reflect for Holder {
        fn type_info() -> TypeInfo {
            TypeInfo::of::<Holder>()
        }
        fn dyn_type_info(&self) -> TypeInfo {
            Self::type_info()
        }
        fn shape(&self) -> Shape<'_> {
            Shape::Object(vec![FieldSlot { descriptor: &FIELD, value: &self.n }])
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn top_level_null_renders_empty_string() {
        let s = SerializerBuilder::new().build();
        assert_eq!(s.to_json(&NullLeaf).unwrap(), "");
    }

    #[test]
    fn plain_object_renders_compact_json() {
        let s = SerializerBuilder::new().build();
        assert_eq!(s.to_json(&Holder { n: Leaf(5) }).unwrap(), r#"{"n":5}"#);
    }

    #[test]
    fn pretty_formatter_can_be_installed_via_builder() {
        let s = SerializerBuilder::new().formatter(crate::formatter::PrettyFormatter).build();
        let out = s.to_json(&Holder { n: Leaf(5) }).unwrap();
        assert!(out.contains('\n'));
    }
}
