//! dctgen - truncated DCT-II code generation.
//!
//! dctgen statically unrolls the recursive fast DCT-II for a power-of-two
//! input size and prunes every sum, difference and copy that does not feed
//! one of the requested leading coefficients. The result is a straight-line
//! routine in JavaScript, Rust or C with all trigonometric constants
//! precomputed.
//!
//! # Primary Usage
//!
//! ```
//! use bumpalo::Bump;
//! use dctgen::core::{ConstantTable, PlanningSession};
//! use dctgen::emit::{self, EmitOptions, Target};
//! use dctgen::planner;
//!
//! // Create a planning session with arena allocation
//! let arena = Bump::new();
//! let session = PlanningSession::new(&arena);
//!
//! // First 11 coefficients of a 32-point transform
//! let plan = planner::plan_truncated(&session, 5, 10)?;
//! let constants = ConstantTable::new(5)?;
//! let source = emit::emit(&plan, &constants, Target::Javascript, &EmitOptions::default())?;
//! assert!(source.contains("function fdct32_11(X, Z)"));
//! # Ok::<(), dctgen::GenError>(())
//! ```
//!
//! # Architecture
//!
//! - [`core`] - Shared infrastructure (session, slots, operations, constants)
//! - [`planner`] - Liveness pass and pruned butterfly emission
//! - [`eval`] - Plan interpreter and reference transform
//! - [`check`] - Structural plan validation
//! - [`emit`] - Source emitters

pub mod check;
pub mod core;
pub mod emit;
pub mod eval;
pub mod planner;

pub use crate::core::{
    // Planning data
    Buffer, CombineOp, Op, OpKind, Slot, SlotSet, Stage,
    // Constants
    ConstId, Constant, ConstantKind, ConstantTable,
    // Session management
    PlanningSession, SessionStats,
    // Errors
    GenError, GenResult,
};
pub use emit::{EmitOptions, Emitter, Target};
pub use eval::Evaluator;
pub use planner::{Plan, MAX_ORDER};

use bumpalo::Bump;

/// Plan and emit in one call, using a private arena.
///
/// `truncation` is the index of the last coefficient to compute (`-1` for
/// none).
pub fn generate(
    order: u32,
    truncation: i64,
    target: Target,
    options: &EmitOptions,
) -> GenResult<String> {
    let arena = Bump::new();
    let session = PlanningSession::new(&arena);
    let plan = planner::plan_truncated(&session, order, truncation)?;
    let constants = ConstantTable::new(order)?;
    emit::emit(&plan, &constants, target, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate() {
        let source = generate(3, 2, Target::C, &EmitOptions::default()).unwrap();
        assert!(source.contains("void fdct8_3(double *X, double *Z)"));
        assert!(generate(3, 8, Target::C, &EmitOptions::default())
            .unwrap_err()
            .is_invalid_parameter());
    }
}
