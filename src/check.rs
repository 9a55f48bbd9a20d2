//! Structural validation of plans.
//!
//! These checks look only at the operation list: every read must see a value,
//! every write must eventually feed a requested coefficient, and the final
//! stage must write each requested coefficient exactly once. `dctgen --check`
//! and the integration tests run them, together with a numeric comparison
//! against the reference transform.

use hashbrown::HashSet;
use std::fmt;

use crate::core::constants::ConstantTable;
use crate::core::error::GenResult;
use crate::core::op::Stage;
use crate::core::slot::{Buffer, Slot, SlotSet};
use crate::eval::{max_abs_error, reference, Evaluator};
use crate::planner::Plan;

/// A violated plan property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckFailure {
    /// Op reads a slot that holds no value yet.
    UnwrittenSource { op_index: usize, slot: Slot },
    /// Op result is never read on the way to a requested coefficient.
    DeadOp { op_index: usize, slot: Slot },
    /// A value needed at entry is not an original input.
    MissingInput { slot: Slot },
    /// Requested coefficient written a number of times other than once.
    OutputCoverage { index: usize, writes: usize },
    /// Final stage wrote a coefficient beyond the truncation.
    ExtraOutput { index: usize },
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckFailure::UnwrittenSource { op_index, slot } => {
                write!(f, "op #{} reads unwritten slot {}", op_index, slot)
            }
            CheckFailure::DeadOp { op_index, slot } => {
                write!(f, "op #{} writes {} which is never used", op_index, slot)
            }
            CheckFailure::MissingInput { slot } => {
                write!(f, "{} is needed but never provided", slot)
            }
            CheckFailure::OutputCoverage { index, writes } => {
                write!(
                    f,
                    "coefficient {} written {} times by the final stage",
                    index, writes
                )
            }
            CheckFailure::ExtraOutput { index } => {
                write!(
                    f,
                    "final stage writes coefficient {} beyond the truncation",
                    index
                )
            }
        }
    }
}

fn original_inputs(plan: &Plan<'_>) -> SlotSet {
    (plan.base_offset..plan.buffer_len()).collect()
}

/// Every source slot must be an original input or an earlier destination.
pub fn check_dependency_order(plan: &Plan<'_>) -> Vec<CheckFailure> {
    let mut written_input = original_inputs(plan);
    let mut written_work = SlotSet::new(plan.buffer_len());
    let mut failures = Vec::new();

    for (op_index, op) in plan.ops.iter().enumerate() {
        for slot in op.sources() {
            let written = match slot.buffer {
                Buffer::Input => written_input.contains(slot.index),
                Buffer::Work => written_work.contains(slot.index),
            };
            if !written {
                failures.push(CheckFailure::UnwrittenSource { op_index, slot });
            }
        }
        match op.dst.buffer {
            Buffer::Input => written_input.insert(op.dst.index),
            Buffer::Work => written_work.insert(op.dst.index),
        };
    }

    failures
}

/// Backward liveness from the requested coefficients: every op must write a
/// slot that is live at that point.
pub fn check_no_dead_ops(plan: &Plan<'_>) -> Vec<CheckFailure> {
    let mut live: HashSet<Slot> = (0..plan.output_count())
        .map(|k| Slot::new(Buffer::Work, plan.base_offset + k))
        .collect();
    let mut failures = Vec::new();

    for (op_index, op) in plan.ops.iter().enumerate().rev() {
        if !live.remove(&op.dst) {
            failures.push(CheckFailure::DeadOp {
                op_index,
                slot: op.dst,
            });
            continue;
        }
        live.extend(op.sources());
    }

    let inputs = original_inputs(plan);
    let mut missing: Vec<Slot> = live
        .into_iter()
        .filter(|slot| slot.buffer != Buffer::Input || !inputs.contains(slot.index))
        .collect();
    missing.sort();
    failures.extend(missing.into_iter().map(|slot| CheckFailure::MissingInput { slot }));

    failures
}

/// The final stage of the top-level instance writes each requested
/// coefficient exactly once and nothing else.
pub fn check_output_coverage(plan: &Plan<'_>) -> Vec<CheckFailure> {
    let size = plan.size();
    let mut writes = vec![0usize; size];
    let mut failures = Vec::new();

    let final_stage = plan.ops.iter().filter(|op| {
        op.order == plan.order && (plan.order == 1 || op.stage == Stage::Interleave)
    });
    for op in final_stage {
        let Some(index) = op.dst.index.checked_sub(plan.base_offset) else {
            failures.push(CheckFailure::ExtraOutput {
                index: op.dst.index,
            });
            continue;
        };
        if op.dst.buffer == Buffer::Work && index < size {
            writes[index] += 1;
        }
        if index >= plan.output_count() {
            failures.push(CheckFailure::ExtraOutput { index });
        }
    }

    for (index, &count) in writes.iter().enumerate().take(plan.output_count()) {
        if count != 1 {
            failures.push(CheckFailure::OutputCoverage {
                index,
                writes: count,
            });
        }
    }

    failures
}

/// Run all structural checks.
pub fn check_plan(plan: &Plan<'_>) -> Vec<CheckFailure> {
    let mut failures = check_dependency_order(plan);
    failures.extend(check_no_dead_ops(plan));
    failures.extend(check_output_coverage(plan));
    if !failures.is_empty() {
        log::warn!(
            "plan for order {} failed {} checks",
            plan.order,
            failures.len()
        );
    }
    failures
}

/// Deterministic, irregular test signal of the given length.
pub fn probe_signal(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let i = i as f64;
            (0.7 * i).sin() + 0.25 * (1.3 * i + 0.5).cos() - 0.01 * i
        })
        .collect()
}

/// Evaluate the plan on `input` and return the largest deviation from the
/// reference DCT-II over the requested coefficients, relative to the largest
/// reference magnitude (or absolute when that is below 1).
pub fn verify_numerically(
    plan: &Plan<'_>,
    constants: &ConstantTable,
    input: &[f64],
) -> GenResult<f64> {
    let out = Evaluator::new(plan, constants)?.run(input)?;
    let instance = input.get(plan.base_offset..plan.buffer_len()).unwrap_or_default();
    let expected = reference::dct2_prefix(instance, out.len());
    let magnitude = expected.iter().fold(1.0f64, |m, v| m.max(v.abs()));
    Ok(max_abs_error(&out, &expected) / magnitude)
}
