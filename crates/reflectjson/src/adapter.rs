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

//! `TypeAdapter`: normalizes [`Primitive`] values to and from
//! `serde_json::Value`.

use crate::error::{Error, Result};
use crate::reflect::Primitive;
use crate::type_info::TypeInfo;

/// Renders a declared primitive to its canonical JSON form.
///
/// Integers and floats both become `serde_json::Value::Number`; the
/// distinction between them only matters on the way back in, which is why
/// `narrow` below needs the declared `TypeInfo` to disambiguate `Int` from
/// `Float` when a JSON number has no fractional part.
pub fn primitive_to_value(p: &Primitive) -> serde_json::Value {
    match p {
        Primitive::Bool(b) => serde_json::Value::Bool(*b),
        Primitive::Int(i) => match serde_json::Number::from_i128(*i) {
            Some(n) => serde_json::Value::Number(n),
            // i128 values outside i64/u64 range have no serde_json::Number
            // representation; fall back to their decimal string form.
            None => serde_json::Value::String(i.to_string()),
        },
        // An integral-valued float renders without a trailing `.0` — ryu's
        // `format_finite` (which `Number::from_f64` delegates to) always
        // keeps a decimal point on finite floats, so a whole-number float
        // needs its own integral `Number` instead.
        Primitive::Float(f) if f.is_finite() && f.fract() == 0.0 && in_i64_range(*f) => {
            serde_json::Value::Number(serde_json::Number::from(*f as i64))
        }
        Primitive::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Primitive::Char(c) => serde_json::Value::String(c.to_string()),
        Primitive::Str(s) => serde_json::Value::String(s.clone()),
        Primitive::Url(s) => serde_json::Value::String(s.clone()),
    }
}

/// Narrows a JSON value down to the [`Primitive`] variant `expected` names,
/// for deserialization. `expected` only disambiguates `Int` vs. `Float`
/// (and `Str` vs. `Url`, vs. `Char`) when the JSON value itself is a bare
/// number or string — JSON has no type tag beyond its own six kinds.
pub fn narrow(value: &serde_json::Value, expected: &TypeInfo) -> Result<Primitive> {
    let mismatch = || Error::TypeMismatch {
        expected: *expected,
        found: json_kind(value),
    };

    match expected.raw_name {
        "bool" => value.as_bool().map(Primitive::Bool).ok_or_else(mismatch),
        "char" => value
            .as_str()
            .and_then(|s| s.chars().next())
            .filter(|_| value.as_str().is_some_and(|s| s.chars().count() == 1))
            .map(Primitive::Char)
            .ok_or_else(mismatch),
        "alloc::string::String" | "&str" => {
            value.as_str().map(|s| Primitive::Str(s.to_string())).ok_or_else(mismatch)
        }
        "url::Url" => value.as_str().map(|s| Primitive::Url(s.to_string())).ok_or_else(mismatch),
        "f32" | "f64" => value.as_f64().map(Primitive::Float).ok_or_else(mismatch),
        _ => {
            // every remaining primitive raw name is an integer type
            if let Some(i) = value.as_i64() {
                Ok(Primitive::Int(i as i128))
            } else if let Some(u) = value.as_u64() {
                Ok(Primitive::Int(u as i128))
            } else if let Some(s) = value.as_str().and_then(|s| s.parse::<i128>().ok()) {
                // symmetric with primitive_to_value's decimal-string fallback
                // for i128/u128 magnitudes outside i64/u64 range.
                Ok(Primitive::Int(s))
            } else {
                Err(mismatch())
            }
        }
    }
}

/// Whether `f` rounds to a value `i64` can hold exactly, so the
/// `f as i64` cast in `primitive_to_value` loses nothing.
fn in_i64_range(f: f64) -> bool {
    f >= i64::MIN as f64 && f <= i64::MAX as f64
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a bool",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
