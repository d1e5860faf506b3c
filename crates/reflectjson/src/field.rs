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

//! Field-level metadata the derive macro emits one `&'static FieldDescriptor`
//! for, per declared field. This is the Rust stand-in for "declared field
//! modifiers + version annotation" since Rust has no runtime field
//! modifiers to inspect.

/// Modifier bits a [`crate::exclusion::ModifierMask`] strategy can match
/// against. Rust has no `static` instance fields and no `transient`
/// keyword; `TRANSIENT` is set by the derive macro for `#[json(skip)]`
/// fields, and `STATIC` exists only so the modifier taxonomy stays
/// complete — the derive macro never sets it, since it only ever
/// enumerates instance fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldModifiers(u8);

impl FieldModifiers {
    pub const NONE: FieldModifiers = FieldModifiers(0);
    pub const TRANSIENT: FieldModifiers = FieldModifiers(0b01);
    pub const STATIC: FieldModifiers = FieldModifiers(0b10);

    /// True if `self` and `other` share at least one set bit.
    pub fn intersects(self, other: FieldModifiers) -> bool {
        self.0 & other.0 != 0
    }

    /// True if every bit in `other` is also set in `self`.
    pub fn contains(self, other: FieldModifiers) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for FieldModifiers {
    type Output = FieldModifiers;
    fn bitor(self, rhs: FieldModifiers) -> FieldModifiers {
        FieldModifiers(self.0 | rhs.0)
    }
}

/// Static, derive-generated metadata for one declared field.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// The field's Rust identifier.
    pub name: &'static str,
    /// The JSON object key this field serializes under. Equal to `name`
    /// unless `#[json(rename = "...")]` was used.
    pub json_name: &'static str,
    /// Position among the fields of the *innermost* struct after flattening
    /// is applied — see [`crate::navigator`] for how flattened/"ancestor"
    /// fields are ordered ahead of a struct's own fields.
    pub declared_index: usize,
    pub modifiers: FieldModifiers,
    /// `#[json(since = "...")]` on the field itself; falls back to the
    /// declaring struct's class-level version if `None`.
    pub min_version: Option<f64>,
    /// Set for derive-emitted helper fields that have no source-level
    /// counterpart. The derive macro in this crate never produces one —
    /// the flag exists so [`crate::exclusion::InnerClassRule`] has a real
    /// predicate to evaluate, matching the "synthetic/
    /// anonymous scope-captured fields" clause.
    pub synthetic: bool,
}
