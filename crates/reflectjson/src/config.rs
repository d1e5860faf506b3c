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

//! The immutable configuration a built `Serializer` carries, assembled by
//! `SerializerBuilder`.

use std::sync::Arc;

use crate::exclusion::{Disjunction, ExclusionStrategy};
use crate::field::FieldModifiers;
use crate::formatter::{CompactFormatter, Formatter};
use crate::handler::HandlerMap;

/// Resolved, `Send + Sync` configuration shared by every `to_json`/
/// `from_json` call on a `Serializer`.
pub struct Config {
    pub(crate) handlers: Arc<HandlerMap>,
    pub(crate) exclusion: Arc<dyn ExclusionStrategy>,
    pub(crate) formatter: Arc<dyn Formatter>,
    pub(crate) include_nulls: bool,
}

impl Config {
    /// The default configuration: `InnerClassRule ∨ ModifierMask(transient|
    /// static)`, no version ceiling, compact output, nulls omitted.
    pub fn default_with(handlers: HandlerMap) -> Self {
        Config {
            handlers: Arc::new(handlers),
            exclusion: Arc::new(Disjunction::default_composition()),
            formatter: Arc::new(CompactFormatter),
            include_nulls: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::default_with(HandlerMap::new())
    }
}

/// Raw fields a `SerializerBuilder` accumulates before assembling a
/// `Config`. Kept separate from `Config` so the builder can mutate freely
/// while the assembled result stays read-only.
pub(crate) struct PendingConfig {
    pub(crate) handlers: HandlerMap,
    pub(crate) version: Option<f64>,
    pub(crate) modifier_mask: FieldModifiers,
    pub(crate) formatter: Arc<dyn Formatter>,
    pub(crate) include_nulls: bool,
}

impl Default for PendingConfig {
    fn default() -> Self {
        PendingConfig {
            handlers: HandlerMap::new(),
            version: None,
            modifier_mask: FieldModifiers::TRANSIENT | FieldModifiers::STATIC,
            formatter: Arc::new(CompactFormatter),
            include_nulls: false,
        }
    }
}
