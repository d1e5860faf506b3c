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

//! The serialization visitor: per-call state threaded through `navigator`,
//! per call.
//!
//! `Context` owns its collaborators behind `Arc` rather than borrowing them,
//! so it carries no lifetime parameter. That keeps `navigate()` and every
//! registered handler closure free of lifetime threading — a handler only
//! ever sees `&mut Context`, never `&mut Context<'a>` tied back to the
//! `Serializer` that created it.

use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::exclusion::ExclusionStrategy;
use crate::handler::HandlerMap;
use crate::reflect::Reflect;

/// Per-call state: the handler registry, the composed exclusion strategy,
/// whether `null` fields are emitted, and the visited-set for cycle
/// detection.
pub struct Context {
    pub(crate) handlers: Arc<HandlerMap>,
    pub(crate) exclusion: Arc<dyn ExclusionStrategy>,
    pub(crate) include_nulls: bool,
    visited: RefCell<HashSet<usize>>,
}

impl Context {
    pub fn new(
        handlers: Arc<HandlerMap>,
        exclusion: Arc<dyn ExclusionStrategy>,
        include_nulls: bool,
    ) -> Self {
        Context {
            handlers,
            exclusion,
            include_nulls,
            visited: RefCell::new(HashSet::new()),
        }
    }

    /// Marks `id` as in-progress for the duration of the returned guard.
    /// Fails if `id` is already on the path from the root to here — a cycle.
    pub fn enter(&self, id: usize, type_name: &'static str) -> Result<VisitGuard<'_>> {
        let mut visited = self.visited.borrow_mut();
        if !visited.insert(id) {
            return Err(Error::CycleDetected { type_name });
        }
        drop(visited);
        Ok(VisitGuard { ctx: self, id })
    }

    /// Current recursion depth: the number of container nodes (array, map,
    /// or object) on the path from the root to here.
    pub fn depth(&self) -> usize {
        self.visited.borrow().len()
    }

    /// Re-entrant call back into the navigator, for use by registered
    /// handlers that delegate part of their output to the default
    /// traversal (e.g. a handler that serializes most fields normally and
    /// only overrides one).
    pub fn serialize(&mut self, value: &dyn Reflect) -> Result<serde_json::Value> {
        crate::navigator::navigate(value, self)
    }
}

/// RAII guard popping `id` off the visited-set on every exit path,
/// including early returns via `?` from deeper in the call stack.
pub struct VisitGuard<'a> {
    ctx: &'a Context,
    id: usize,
}

impl Drop for VisitGuard<'_> {
    fn drop(&mut self) {
        self.ctx.visited.borrow_mut().remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::Disjunction;

    fn fresh_context() -> Context {
        Context::new(
            Arc::new(HandlerMap::new()),
            Arc::new(Disjunction::default_composition()),
            false,
        )
    }

    #[test]
    fn reentry_on_same_id_is_a_cycle() {
        let ctx = fresh_context();
        let _guard = ctx.enter(1, "Node").unwrap();
        assert!(ctx.enter(1, "Node").is_err());
    }

    #[test]
    fn guard_drop_allows_reentry() {
        let ctx = fresh_context();
        {
            let _guard = ctx.enter(1, "Node").unwrap();
        }
        assert!(ctx.enter(1, "Node").is_ok());
    }

    #[test]
    fn guard_drop_on_early_return_still_clears_entry() {
        let ctx = fresh_context();
        let attempt = || -> Result<()> {
            let _guard = ctx.enter(1, "Node")?;
            Err(Error::Unconstructible { type_name: "Node" })
        };
        assert!(attempt().is_err());
        assert!(ctx.enter(1, "Node").is_ok());
    }

    #[test]
    fn distinct_ids_do_not_collide() {
        let ctx = fresh_context();
        let _a = ctx.enter(1, "A").unwrap();
        assert!(ctx.enter(2, "B").is_ok());
    }
}
