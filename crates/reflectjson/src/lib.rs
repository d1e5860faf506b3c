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

//! A reflective object-to-JSON serialization engine.
//!
//! Given an in-memory value and its declared static type, [`Serializer`]
//! walks the object graph the same way a reflection-based serializer would,
//! except the "reflection" is a `#[derive(Json)]`-generated [`Reflect`] impl
//! rather than a runtime introspection API. The walk is driven by
//! [`navigator`], which at each node consults the [`handler::HandlerMap`]
//! for a custom serializer before falling back to generic field-by-field
//! traversal, applies the composed [`exclusion::ExclusionStrategy`], and
//! hands the resulting tree to a [`formatter::Formatter`].
//!
//! ```
//! use reflectjson::SerializerBuilder;
//! use reflectjson_derive::Json;
//!
//! #[derive(Json)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//!     #[json(skip)]
//!     cached_distance: f64,
//! }
//!
//! let serializer = SerializerBuilder::new().build();
//! let json = serializer.to_json(&Point { x: 1, y: 2, cached_distance: 0.0 }).unwrap();
//! assert_eq!(json, r#"{"x":1,"y":2}"#);
//! ```

pub mod adapter;
pub mod builder;
pub mod config;
pub mod construct;
pub mod deserialize;
pub mod error;
pub mod exclusion;
pub mod field;
pub mod formatter;
pub mod handler;
mod impls;
pub mod navigator;
pub mod reflect;
pub mod serializer;
pub mod type_info;
pub mod visitor;

pub use builder::SerializerBuilder;
pub use construct::Construct;
pub use deserialize::{DeContext, ReflectMut};
pub use error::{Error, Result};
pub use exclusion::{Disjunction, ExclusionStrategy, InnerClassRule, ModifierMask, VersionCeiling};
pub use field::{FieldDescriptor, FieldModifiers};
pub use formatter::{CompactFormatter, Formatter, PrettyFormatter};
pub use handler::HandlerMap;
pub use reflect::{FieldSlot, Primitive, Reflect, Shape};
pub use serializer::Serializer;
pub use type_info::TypeInfo;
pub use visitor::Context;

pub use reflectjson_derive::Json;
