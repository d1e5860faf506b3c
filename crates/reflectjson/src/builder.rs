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

//! `SerializerBuilder`: the closed option set for configuring a
//! `Serializer`/`Deserializer` pair.

use std::sync::Arc;

use crate::config::{Config, PendingConfig};
use crate::error::Result;
use crate::exclusion::{Disjunction, ExclusionStrategy, InnerClassRule, ModifierMask};
use crate::field::FieldModifiers;
use crate::formatter::Formatter;
use crate::handler::HandlerMap;
use crate::reflect::Reflect;
use crate::serializer::Serializer;
use crate::visitor::Context;

#[derive(Default)]
pub struct SerializerBuilder {
    pending: PendingConfig,
}

impl SerializerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a `VersionCeiling(v)`; members with a greater declared
    /// minimum version are excluded. Default: no ceiling.
    pub fn version(mut self, v: f64) -> Self {
        self.pending.version = Some(v);
        self
    }

    /// Replaces the default modifier mask (`transient | static`).
    pub fn exclude_fields_with_modifiers(mut self, mask: FieldModifiers) -> Self {
        self.pending.modifier_mask = mask;
        self
    }

    /// Replaces the default compact-output formatter.
    pub fn formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.pending.formatter = Arc::new(formatter);
        self
    }

    /// Emits fields whose value is `null` instead of omitting the key.
    /// Default: off, matching the navigator's default null-field policy.
    pub fn serialize_nulls(mut self, include: bool) -> Self {
        self.pending.include_nulls = include;
        self
    }

    /// Overrides default no-arg construction during deserialization for `T`.
    pub fn register_instance_creator<T, F>(mut self, f: F) -> Self
    where
        T: 'static,
        F: Fn() -> Result<T> + Send + Sync + 'static,
    {
        self.pending.handlers.register_instance_creator::<T, F>(f);
        self
    }

    /// Custom JSON building for `T`.
    pub fn register_serializer<T, F>(mut self, f: F) -> Self
    where
        T: Reflect + 'static,
        F: Fn(&T, &mut Context) -> Result<serde_json::Value> + Send + Sync + 'static,
    {
        self.pending.handlers.register_serializer::<T, F>(f);
        self
    }

    /// Custom JSON building for every monomorphization sharing `T`'s raw
    /// class (see `HandlerMap::register_serializer_raw`).
    pub fn register_serializer_raw<F>(mut self, raw_name: &'static str, f: F) -> Self
    where
        F: Fn(&dyn Reflect, &mut Context) -> Result<serde_json::Value> + Send + Sync + 'static,
    {
        self.pending.handlers.register_serializer_raw(raw_name, f);
        self
    }

    /// Symmetric for inbound values.
    pub fn register_deserializer<T, F>(mut self, f: F) -> Self
    where
        T: 'static,
        F: Fn(&serde_json::Value) -> Result<T> + Send + Sync + 'static,
    {
        self.pending.handlers.register_deserializer::<T, F>(f);
        self
    }

    pub fn build(self) -> Serializer {
        let PendingConfig { handlers, version, modifier_mask, formatter, include_nulls } =
            self.pending;

        let mut exclusion = Disjunction::new();
        exclusion.push(Box::new(InnerClassRule));
        exclusion.push(Box::new(ModifierMask(modifier_mask)));
        let exclusion: Arc<dyn ExclusionStrategy> = match version {
            Some(v) => Arc::new(exclusion.with_version_ceiling(v)),
            None => Arc::new(exclusion),
        };

        Serializer::from_config(Config {
            handlers: Arc::new(handlers),
            exclusion,
            formatter,
            include_nulls,
        })
    }
}
