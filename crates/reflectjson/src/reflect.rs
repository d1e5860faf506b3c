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

//! The `Reflect` trait and the `Shape` it classifies a value into.
//!
//! This is the compile-time substitute for runtime
//! reflection: instead of enumerating fields through a reflection API, a
//! derive macro (`reflectjson-derive`) generates a `Reflect` impl per type
//! that exposes exactly the information `ObjectNavigator` needs.

use std::any::Any;

use crate::field::FieldDescriptor;
use crate::type_info::TypeInfo;

/// Canonical primitive forms `TypeAdapter` normalizes serialization into,
/// (`TypeAdapter`) normalizes serialization into.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Bool(bool),
    /// Any signed or unsigned integral value, widened to `i128` so a single
    /// variant covers `i8..i64`/`u8..u64`.
    Int(i128),
    /// Floating-point value. `TypeAdapter` decides at render time whether
    /// it prints without a trailing `.0`.
    Float(f64),
    Char(char),
    Str(String),
    /// Canonical string form of a `url::Url` (or any future URI-like type).
    Url(String),
}

/// One field, paired with a borrow of its value, as yielded by
/// `Shape::Object`.
pub struct FieldSlot<'a> {
    pub descriptor: &'static FieldDescriptor,
    pub value: &'a dyn Reflect,
}

/// The declared-shape classification `ObjectNavigator` dispatches on, in
/// the same priority order `ObjectNavigator` uses (null/enum/custom-handler are
/// decided by the navigator *before* calling `shape()`; `shape()` itself
/// only needs to distinguish the remaining five cases).
pub enum Shape<'a> {
    Primitive(Primitive),
    /// `variant_name` is the declared Rust identifier of the active enum
    /// variant (its "external name", absent a rename
    /// policy override).
    Enum { variant_name: &'static str },
    Array(Vec<&'a dyn Reflect>),
    /// Keys are pre-coerced to `String`.
    Map(Vec<(String, &'a dyn Reflect)>),
    Object(Vec<FieldSlot<'a>>),
}

/// Implemented by every type that can be walked by `ObjectNavigator`.
///
/// Object-safe by construction: no generic methods, everything returns
/// borrowed trait objects so a struct's heterogeneous fields can be
/// enumerated as a single `Vec<FieldSlot<'_>>` without an enum-of-all-types.
pub trait Reflect: Any {
    /// The declared type descriptor for `Self`.
    fn type_info() -> TypeInfo
    where
        Self: Sized;

    /// The declared type descriptor for the concrete runtime value behind
    /// `&dyn Reflect` — used by the navigator once it already has a
    /// trait-object reference and needs the descriptor without knowing `T`.
    fn dyn_type_info(&self) -> TypeInfo;

    /// `true` if the declared type is `Option::None` / has no value at all.
    /// Distinguished from `Shape` because null is handled before shape
    /// classification is even consulted.
    fn is_null(&self) -> bool {
        false
    }

    /// Classify this value's declared shape. Never called when
    /// `is_null()` is true.
    fn shape(&self) -> Shape<'_>;

    /// Upcast to `&dyn Any`, used by `HandlerMap` to downcast a `&dyn
    /// Reflect` back to a concrete `&T` when invoking a registered handler.
    fn as_any(&self) -> &dyn Any;

    /// Stable identity for cycle detection: the address a non-primitive
    /// value lives at. Leaf primitives never get pushed onto the
    /// visited-set, so their identity is irrelevant and this default (the
    /// vtable data pointer) is never consulted for them.
    fn identity(&self) -> usize {
        self as *const Self as *const () as usize
    }
}

/// Returns a `'static` element descriptor for `T`, memoized per
/// monomorphization. Used by container `Reflect` impls (`Vec<T>`,
/// `Option<T>`, map value types, ...) to fill in `TypeInfo::element`
/// without re-deriving it on every call.
///
/// A `static` declared inside a generic function is monomorphized once per
/// instantiation of the function, so this cell is genuinely per-`T`.
pub fn element_info<T: Reflect + 'static>() -> &'static TypeInfo {
    static CELL: once_cell::sync::OnceCell<TypeInfo> = once_cell::sync::OnceCell::new();
    CELL.get_or_init(T::type_info)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Leaf(i32);
    impl Reflect for Leaf {
        fn type_info() -> TypeInfo {
            TypeInfo::of::<Leaf>()
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

    #[test]
    fn identity_differs_across_distinct_instances() {
        let a = Leaf(1);
        let b = Leaf(1);
        assert_ne!(a.identity(), b.identity());
    }

    #[test]
    fn element_info_is_memoized_per_type() {
        let a = element_info::<Leaf>();
        let b = element_info::<Leaf>();
        assert!(std::ptr::eq(a, b));
    }
}
