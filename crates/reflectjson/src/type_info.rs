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

//! Declared-type descriptors.
//!
//! A [`TypeInfo`] is the Rust stand-in for a Java `Type`/`Class` pair: it
//! carries enough identity to drive handler lookup (exact match, then raw
//! fallback) and to describe the element type of arrays/collections/maps.
//!
//! Rust already gives us exact per-instantiation identity via
//! [`std::any::TypeId`] — `Vec<i32>` and `Vec<String>` get distinct ids for
//! free. That collapses the usual "raw class + ordered type argument list"
//! down to a single `TypeId` for the exact match, plus a separate
//! stripped-generics name for the raw fallback that `HandlerMap` tries
//! second.

use std::any::TypeId;

/// A declared-type descriptor, reducible to a raw name plus an optional
/// element descriptor (for arrays/collections/maps).
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    /// Exact monomorphized identity (`TypeId::of::<T>()`), used for the
    /// "exact parameterised descriptor" match in `HandlerMap`.
    pub type_id: TypeId,
    /// The type name with any `<...>` generic argument list stripped, used
    /// as the raw-class fallback key. Two descriptors with equal `raw_name`
    /// are "the same raw class" even if `type_id` differs.
    pub raw_name: &'static str,
    /// Full `std::any::type_name::<T>()`, kept only for diagnostics.
    pub display_name: &'static str,
    /// The element type, for arrays/collections (first/only type argument)
    /// and maps (value type argument — map keys are always coerced to
    /// `String`, so there is no separate key descriptor).
    pub element: Option<&'static TypeInfo>,
}

impl TypeInfo {
    /// Builds a `TypeInfo` for `T`, with no element type. Used by leaf
    /// (non-container) `Reflect` impls.
    pub fn of<T: 'static>() -> Self {
        TypeInfo {
            type_id: TypeId::of::<T>(),
            raw_name: strip_generics(std::any::type_name::<T>()),
            display_name: std::any::type_name::<T>(),
            element: None,
        }
    }

    /// Builds a `TypeInfo` for a container `T` whose element descriptor is
    /// `element` (a `'static` reference, typically obtained from a
    /// `once_cell`-backed static or a leaked `Box` produced by the derive
    /// macro — see `reflectjson-derive`).
    pub fn container<T: 'static>(element: &'static TypeInfo) -> Self {
        TypeInfo {
            type_id: TypeId::of::<T>(),
            raw_name: strip_generics(std::any::type_name::<T>()),
            display_name: std::any::type_name::<T>(),
            element: Some(element),
        }
    }

    /// Exact equality: same monomorphized type.
    pub fn is_exact(&self, other: &TypeInfo) -> bool {
        self.type_id == other.type_id
    }

    /// Raw equality: same erased raw class, regardless of element type.
    pub fn is_same_raw(&self, other: &TypeInfo) -> bool {
        self.raw_name == other.raw_name
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.is_exact(other)
    }
}
impl Eq for TypeInfo {}

/// Strips a trailing `<...>` generic argument list off a `type_name()`
/// string, e.g. `"alloc::vec::Vec<i32>"` -> `"alloc::vec::Vec"`.
fn strip_generics(name: &'static str) -> &'static str {
    match name.find('<') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_requires_same_type_id() {
        let a = TypeInfo::of::<i32>();
        let b = TypeInfo::of::<i64>();
        assert!(!a.is_exact(&b));
        assert_eq!(a, TypeInfo::of::<i32>());
    }

    #[test]
    fn raw_name_strips_generic_arguments() {
        assert_eq!(strip_generics("alloc::vec::Vec<i32>"), "alloc::vec::Vec");
        assert_eq!(strip_generics("i32"), "i32");
    }

    #[test]
    fn container_descriptor_carries_element() {
        let elem: &'static TypeInfo = Box::leak(Box::new(TypeInfo::of::<i32>()));
        let v = TypeInfo::container::<Vec<i32>>(elem);
        assert!(v.element.is_some());
        assert_eq!(v.element.unwrap().raw_name, "i32");
    }
}
