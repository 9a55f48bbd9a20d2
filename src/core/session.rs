// This module provides arena-based session management for planning, using the bumpalo crate
// to keep lifetimes simple. PlanningSession owns a reference to the caller's arena and
// tracks everything that should live as long as one generation run: operation lists of
// finished plans, the memo of required-input sets per (order, truncation) pair, and
// statistics. Plans hand out arena slices, so a Plan<'arena> can be passed around freely
// while the session is alive. SessionStats counts plans, emitted operations by kind and
// liveness memo traffic, and renders them for the command line driver.

//! Arena-based planning session management.
//!
//! All plans built through a session borrow from its arena and share its
//! lifetime.

use bumpalo::Bump;
use hashbrown::HashMap;
use std::cell::RefCell;
use std::fmt;

use super::op::{Op, OpKind};

/// Memo key for required-input sets: (order, truncation).
pub type LivenessKey = (u32, usize);

/// Arena-based planning session.
pub struct PlanningSession<'arena> {
    /// Arena allocator for plans and liveness sets.
    arena: &'arena Bump,

    /// Session statistics.
    stats: RefCell<SessionStats>,

    /// Required input slots per (order, truncation), relative to the instance base.
    liveness: RefCell<HashMap<LivenessKey, &'arena [usize]>>,
}

impl<'arena> PlanningSession<'arena> {
    /// Create a new planning session with the given arena.
    pub fn new(arena: &'arena Bump) -> Self {
        Self {
            arena,
            stats: RefCell::new(SessionStats::default()),
            liveness: RefCell::new(HashMap::new()),
        }
    }

    /// Get access to the arena allocator.
    pub fn arena(&self) -> &'arena Bump {
        self.arena
    }

    /// Allocate a copy of a slice in the session arena.
    pub fn alloc_slice<T: Copy>(&self, slice: &[T]) -> &'arena [T] {
        self.arena.alloc_slice_copy(slice)
    }

    /// Look up a memoised required-input set.
    pub fn cached_liveness(&self, key: LivenessKey) -> Option<&'arena [usize]> {
        let hit = self.liveness.borrow().get(&key).copied();
        let mut stats = self.stats.borrow_mut();
        match hit {
            Some(_) => stats.liveness_hits += 1,
            None => stats.liveness_misses += 1,
        }
        hit
    }

    /// Store a required-input set and return the arena copy.
    pub fn store_liveness(&self, key: LivenessKey, slots: &[usize]) -> &'arena [usize] {
        let stored = self.alloc_slice(slots);
        self.liveness.borrow_mut().insert(key, stored);
        stored
    }

    /// Number of memoised required-input sets.
    pub fn liveness_entries(&self) -> usize {
        self.liveness.borrow().len()
    }

    /// Record a finished plan.
    pub fn record_plan(&self, order: u32, truncation: Option<usize>, ops: &[Op]) {
        let mut stats = self.stats.borrow_mut();
        stats.plans_built += 1;
        stats.ops_emitted += ops.len();
        for op in ops {
            match op.kind {
                OpKind::Combine { scale: Some(_), .. } => stats.scaled_combines += 1,
                OpKind::Combine { scale: None, .. } => stats.plain_combines += 1,
                OpKind::Copy { .. } => stats.copies += 1,
            }
        }

        if stats.largest_plan_ops < ops.len() {
            stats.largest_plan_ops = ops.len();
            let n = 1usize << order;
            stats.largest_plan_name = format!("fdct{}_{}", n, truncation.map_or(0, |t| t + 1));
        }
    }

    /// Get session statistics.
    pub fn stats(&self) -> SessionStats {
        self.stats.borrow().clone()
    }
}

/// Planning session statistics.
#[derive(Debug, Default, Clone)]
pub struct SessionStats {
    /// Number of plans built.
    pub plans_built: usize,

    /// Total operations emitted across all plans.
    pub ops_emitted: usize,

    /// Sums and differences without a scale.
    pub plain_combines: usize,

    /// Differences multiplied by a constant.
    pub scaled_combines: usize,

    /// Pass-through copies.
    pub copies: usize,

    /// Largest plan (for analysis).
    pub largest_plan_ops: usize,

    /// Name of largest plan.
    pub largest_plan_name: String,

    /// Liveness memo hits.
    pub liveness_hits: usize,

    /// Liveness memo misses.
    pub liveness_misses: usize,
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Planning Session Statistics:")?;
        writeln!(f, "  Plans built: {}", self.plans_built)?;
        writeln!(f, "  Operations emitted: {}", self.ops_emitted)?;
        writeln!(f, "    plain combines: {}", self.plain_combines)?;
        writeln!(f, "    scaled combines: {}", self.scaled_combines)?;
        writeln!(f, "    copies: {}", self.copies)?;
        writeln!(
            f,
            "  Liveness memo: {} hits, {} misses",
            self.liveness_hits, self.liveness_misses
        )?;

        if !self.largest_plan_name.is_empty() {
            writeln!(
                f,
                "  Largest plan: {} ({} ops)",
                self.largest_plan_name, self.largest_plan_ops
            )?;
        }

        Ok(())
    }
}
