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

//! The error taxonomy for the serialization/deserialization pipeline.
//!
//! Every variant here is terminal: once raised, the call that produced it
//! discards whatever partial JSON node tree it had built and propagates the
//! error to the caller. There is no partial-subtree recovery.

use std::fmt;

use crate::type_info::TypeInfo;

/// The five error kinds from the navigator/visitor/handler pipeline, plus a
/// passthrough for the text-level JSON codec used by the symmetric
/// deserialization entry point.
#[derive(Debug)]
pub enum Error {
    /// The visited-set invariant would be violated: a non-primitive value
    /// was reached twice along the same root-to-node path.
    CycleDetected {
        /// Best-effort description of the declared type at the cycle point.
        type_name: &'static str,
    },
    /// A field could not be read during traversal.
    ReflectiveAccess {
        field: &'static str,
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    /// A registered serializer or deserializer raised while handling `type_name`.
    UserHandler {
        type_name: &'static str,
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    /// During deserialization, the JSON node shape could not be narrowed to
    /// the declared type.
    TypeMismatch {
        expected: TypeInfo,
        found: &'static str,
    },
    /// No instance creator was registered and no default-construction path
    /// exists for the declared type.
    Unconstructible { type_name: &'static str },
    /// The text-level JSON codec (lexing/parsing/formatting) failed. This is
    /// not one of the five pipeline kinds — it is raised before or after the
    /// pipeline runs, by the `serde_json`-backed formatter/parser collaborator.
    Codec(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CycleDetected { type_name } => {
                write!(f, "cycle detected while serializing a value of type `{type_name}`")
            }
            Error::ReflectiveAccess { field, cause } => {
                write!(f, "failed to read field `{field}`: {cause}")
            }
            Error::UserHandler { type_name, cause } => {
                write!(f, "registered handler for `{type_name}` failed: {cause}")
            }
            Error::TypeMismatch { expected, found } => {
                write!(
                    f,
                    "expected a JSON value compatible with `{}`, found {found}",
                    expected.display_name
                )
            }
            Error::Unconstructible { type_name } => {
                write!(f, "no instance creator or default constructor for `{type_name}`")
            }
            Error::Codec(e) => write!(f, "JSON codec error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ReflectiveAccess { cause, .. } => Some(cause.as_ref()),
            Error::UserHandler { cause, .. } => Some(cause.as_ref()),
            Error::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Codec(e)
    }
}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_type_name_on_cycle() {
        let err = Error::CycleDetected { type_name: "Node" };
        assert!(err.to_string().contains("Node"));
    }

    #[test]
    fn codec_error_round_trips_source() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse_err.into();
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn unconstructible_display() {
        let err = Error::Unconstructible { type_name: "Widget" };
        assert_eq!(
            err.to_string(),
            "no instance creator or default constructor for `Widget`"
        );
    }
}
