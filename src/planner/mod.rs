// This module is the pruned butterfly planner. Given a transform order p (size 2^p), a base
// offset and a truncation t, it produces the ordered list of scalar assignments that compute
// DCT-II coefficients 0..=t with the recursive fast algorithm, leaving out every sum,
// difference and copy that does not feed one of those coefficients. Planning runs in two
// passes: liveness computes, per (order, truncation), which input slots an instance reads;
// butterfly then emits operations in evaluation order using those sets to filter the
// pre-stage. Results live in the session arena.

//! Pruned butterfly planner.
//!
//! ```
//! use bumpalo::Bump;
//! use dctgen::core::PlanningSession;
//! use dctgen::planner;
//!
//! let arena = Bump::new();
//! let session = PlanningSession::new(&arena);
//! let plan = planner::plan_truncated(&session, 1, 0).unwrap();
//! assert_eq!(plan.ops.len(), 1);
//! assert_eq!(plan.ops[0].to_string(), "Y[0] = X[0] + X[1]");
//! ```

pub mod butterfly;
pub mod liveness;

use crate::core::constants::{check_order, ConstId};
use crate::core::error::{GenError, GenResult};
use crate::core::op::Op;
use crate::core::session::PlanningSession;
use crate::core::slot::{Buffer, SlotSet};
use butterfly::ButterflyPlanner;

pub use crate::core::constants::MAX_ORDER;

/// A finished plan. Operations are stored in the session arena.
#[derive(Debug, Clone)]
pub struct Plan<'arena> {
    /// Transform order; the size is `2^order`.
    pub order: u32,
    /// Index of the first slot of this instance in both buffers.
    pub base_offset: usize,
    /// Highest coefficient index produced, `None` when nothing is requested.
    pub truncation: Option<usize>,
    /// Input slots (absolute indices) actually read by the plan.
    pub live: SlotSet,
    /// Operations in evaluation order.
    pub ops: &'arena [Op],
}

impl<'arena> Plan<'arena> {
    /// Transform size `2^order`.
    pub fn size(&self) -> usize {
        1usize << self.order
    }

    /// Required length of both buffers.
    pub fn buffer_len(&self) -> usize {
        self.base_offset + self.size()
    }

    /// Number of coefficients produced.
    pub fn output_count(&self) -> usize {
        self.truncation.map_or(0, |t| t + 1)
    }

    /// Distinct scale constants referenced by the operations, ascending.
    pub fn constants_used(&self) -> Vec<ConstId> {
        let mut ids: Vec<ConstId> = self.ops.iter().filter_map(Op::scale).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Ordinary sum/difference count.
    pub fn combine_count(&self) -> usize {
        self.ops.iter().filter(|op| op.is_combine()).count()
    }
}

/// Validate planning parameters, returning the truncation as an index.
pub fn validate(order: u32, base_offset: usize, truncation: i64) -> GenResult<Option<usize>> {
    check_order(order)?;

    let size = 1usize << order;
    if base_offset.checked_add(size).is_none() {
        return Err(GenError::invalid(
            "base_offset",
            i64::try_from(base_offset).unwrap_or(i64::MAX),
            "buffer length overflows",
        ));
    }

    match truncation {
        -1 => Ok(None),
        t if t < -1 => Err(GenError::invalid("truncation", t, "must be at least -1")),
        t if t as u64 >= size as u64 => Err(GenError::invalid(
            "truncation",
            t,
            format!("must be below the transform size {}", size),
        )),
        t => Ok(Some(t as usize)),
    }
}

/// Plan an instance of size `2^order` at `base_offset` producing coefficients
/// `0..=truncation`. A truncation of `-1` yields an empty plan.
///
/// The instance reads [`Buffer::Input`] and leaves its unscaled coefficients in
/// [`Buffer::Work`]; the input buffer is used as scratch along the way.
pub fn plan<'arena>(
    session: &PlanningSession<'arena>,
    order: u32,
    base_offset: usize,
    truncation: i64,
) -> GenResult<Plan<'arena>> {
    let truncation = validate(order, base_offset, truncation)?;

    let relative = liveness::required_inputs(session, order, truncation);
    let live = SlotSet::from_indices(relative.iter().copied()).shifted(base_offset);

    let ops: &'arena [Op] = match truncation {
        Some(t) => {
            let mut planner = ButterflyPlanner::new(session);
            planner.emit(order, base_offset, t, Buffer::Input);
            planner.finish()
        }
        None => &[],
    };

    session.record_plan(order, truncation, ops);
    log::debug!(
        "planned order={} base={} t={:?}: {} ops, {} live inputs",
        order,
        base_offset,
        truncation,
        ops.len(),
        live.len()
    );

    Ok(Plan {
        order,
        base_offset,
        truncation,
        live,
        ops,
    })
}

/// Top-level plan at offset 0.
pub fn plan_truncated<'arena>(
    session: &PlanningSession<'arena>,
    order: u32,
    truncation: i64,
) -> GenResult<Plan<'arena>> {
    plan(session, order, 0, truncation)
}
