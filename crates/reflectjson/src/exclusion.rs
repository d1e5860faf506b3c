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

//! Exclusion strategies: the leaf policies and the disjunction that
//! composes them.

use crate::field::{FieldDescriptor, FieldModifiers};
use crate::type_info::TypeInfo;

/// A pure predicate deciding whether a field or class should be skipped.
pub trait ExclusionStrategy: Send + Sync {
    /// `true` means skip this field.
    fn should_skip_field(&self, _field: &FieldDescriptor) -> bool {
        false
    }
    /// `true` means skip the whole class/value.
    fn should_skip_class(&self, _info: &TypeInfo) -> bool {
        false
    }
}

/// Excludes fields whose [`FieldModifiers`] intersect `bits`.
///
/// Rust has no `static` instance fields and no `transient` keyword; the
/// default mask still names both bits (matching the default policy of
/// excluding `transient` and `static` members), but only `TRANSIENT` — set by
/// `#[json(skip)]` — can ever be present on a derive-generated field.
pub struct ModifierMask(pub FieldModifiers);

impl ModifierMask {
    pub fn default_mask() -> Self {
        ModifierMask(FieldModifiers::TRANSIENT | FieldModifiers::STATIC)
    }
}

impl ExclusionStrategy for ModifierMask {
    fn should_skip_field(&self, field: &FieldDescriptor) -> bool {
        field.modifiers.intersects(self.0)
    }
}

/// Excludes fields the derive macro marked `synthetic` — the Rust analogue
/// of "non-static nested classes and synthetic/anonymous scope-captured
/// fields" that reflection-based serializers skip. The derive macro in this crate never emits a
/// synthetic field, so this rule is a structural no-op today; it exists so
/// the predicate and its composition slot are real, not hand-waved away.
pub struct InnerClassRule;

impl ExclusionStrategy for InnerClassRule {
    fn should_skip_field(&self, field: &FieldDescriptor) -> bool {
        field.synthetic
    }
}

/// Excludes members whose declared minimum version exceeds `ceiling`.
pub struct VersionCeiling(pub f64);

impl ExclusionStrategy for VersionCeiling {
    fn should_skip_field(&self, field: &FieldDescriptor) -> bool {
        field.min_version.is_some_and(|v| v > self.0)
    }
}

/// Disjunction of child strategies: skip if *any* child says skip.
/// Evaluated in insertion order; short-circuits on the first `true`, which
/// is a performance choice, not a semantic one —
/// composition is associative and commutative.
pub struct Disjunction {
    children: Vec<Box<dyn ExclusionStrategy>>,
}

impl Disjunction {
    pub fn new() -> Self {
        Disjunction { children: Vec::new() }
    }

    pub fn push(&mut self, strategy: Box<dyn ExclusionStrategy>) {
        self.children.push(strategy);
    }

    /// The default composition:
    /// `InnerClassRule ∨ ModifierMask(transient|static)`.
    pub fn default_composition() -> Self {
        let mut d = Disjunction::new();
        d.push(Box::new(InnerClassRule));
        d.push(Box::new(ModifierMask::default_mask()));
        d
    }

    /// Appends a `VersionCeiling(v)` strategy — the builder calls this only
    /// when `SerializerBuilder::version(v)` was used.
    pub fn with_version_ceiling(mut self, v: f64) -> Self {
        self.push(Box::new(VersionCeiling(v)));
        self
    }
}

impl Default for Disjunction {
    fn default() -> Self {
        Disjunction::default_composition()
    }
}

impl ExclusionStrategy for Disjunction {
    fn should_skip_field(&self, field: &FieldDescriptor) -> bool {
        self.children.iter().any(|c| c.should_skip_field(field))
    }

    fn should_skip_class(&self, info: &TypeInfo) -> bool {
        self.children.iter().any(|c| c.should_skip_class(info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(modifiers: FieldModifiers, min_version: Option<f64>) -> FieldDescriptor {
        FieldDescriptor {
            name: "f",
            json_name: "f",
            declared_index: 0,
            modifiers,
            min_version,
            synthetic: false,
        }
    }

    #[test]
    fn modifier_mask_skips_transient() {
        let mask = ModifierMask::default_mask();
        assert!(mask.should_skip_field(&field(FieldModifiers::TRANSIENT, None)));
        assert!(!mask.should_skip_field(&field(FieldModifiers::NONE, None)));
    }

    #[test]
    fn version_ceiling_skips_newer_fields() {
        let ceiling = VersionCeiling(1.0);
        assert!(ceiling.should_skip_field(&field(FieldModifiers::NONE, Some(1.1))));
        assert!(!ceiling.should_skip_field(&field(FieldModifiers::NONE, Some(1.0))));
        assert!(!ceiling.should_skip_field(&field(FieldModifiers::NONE, None)));
    }

    #[test]
    fn disjunction_is_monotone_under_additional_strategies() {
        let base = Disjunction::default_composition();
        let f = field(FieldModifiers::NONE, Some(2.0));
        assert!(!base.should_skip_field(&f));

        let with_ceiling = Disjunction::default_composition().with_version_ceiling(1.0);
        assert!(with_ceiling.should_skip_field(&f));
    }

    #[test]
    fn disjunction_order_does_not_affect_result() {
        let mut a = Disjunction::new();
        a.push(Box::new(VersionCeiling(1.0)));
        a.push(Box::new(ModifierMask::default_mask()));

        let mut b = Disjunction::new();
        b.push(Box::new(ModifierMask::default_mask()));
        b.push(Box::new(VersionCeiling(1.0)));

        let f = field(FieldModifiers::TRANSIENT, Some(2.0));
        assert_eq!(a.should_skip_field(&f), b.should_skip_field(&f));
    }
}
