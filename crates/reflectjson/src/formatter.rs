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

//! Renders a `serde_json::Value` tree to its final text form.
//!
//! `serde_json::Value` (built with the `preserve_order` feature) is the
//! node model itself; this module only owns the text-rendering step, kept
//! separate so a caller can swap in `PrettyFormatter` without touching
//! anything upstream of it.

use crate::error::Result;

/// Renders an already-built JSON node tree to text. The facade never calls
/// a `Formatter` for a root `Value::Null` or a wholly-excluded root — those
/// short-circuit to `""` before formatting is even considered.
pub trait Formatter: Send + Sync {
    fn render(&self, value: &serde_json::Value) -> Result<String>;
}

/// The default formatter: `serde_json::to_string`'s grammar, with no
/// inserted whitespace.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompactFormatter;

impl Formatter for CompactFormatter {
    fn render(&self, value: &serde_json::Value) -> Result<String> {
        Ok(serde_json::to_string(value)?)
    }
}

/// Two-space indented rendering, for human-facing output.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrettyFormatter;

impl Formatter for PrettyFormatter {
    fn render(&self, value: &serde_json::Value) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_formatter_has_no_inserted_whitespace() {
        let v = serde_json::json!({"a": 1, "b": [1, 2]});
        let s = CompactFormatter.render(&v).unwrap();
        assert!(!s.contains(' '));
    }

    #[test]
    fn pretty_formatter_indents_nested_values() {
        let v = serde_json::json!({"a": 1});
        let s = PrettyFormatter.render(&v).unwrap();
        assert!(s.contains('\n'));
    }
}
