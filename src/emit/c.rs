//! C Code Generation
//!
//! Emits a single self-contained C99 function. Constants become file-scope
//! `static const double` definitions and the work buffer is a local array.
//!
//! ## Generated Code Structure
//!
//! ```c
//! /* Compute the first 2 coefficients of the 4-element DCT-II. X is used as ... */
//! static const double C0 = 0.7071067811865476; /* cos(pi / 4) */
//! static const double D0 = 0.5; /* 2 ** -1 */
//!
//! void fdct4_2(double *X, double *Z)
//! {
//!     double Y[4];
//!     Y[0] = X[0] + X[3];
//!     ...
//!     Z[0] = Y[0] * D0;
//! }
//! ```
//!
//! `X` must hold the full input and is overwritten; `Z` receives `t + 1` values.

use std::fmt::Write;

use super::{
    declared_constants, definition, function_name, output_scaling, render_assignment, summary,
};
use super::{EmitOptions, Emitter, Target};
use crate::core::constants::ConstantTable;
use crate::core::error::GenResult;
use crate::planner::Plan;

/// C source emitter.
pub struct CEmitter;

impl Emitter for CEmitter {
    fn target(&self) -> Target {
        Target::C
    }

    fn emit(
        &self,
        plan: &Plan<'_>,
        constants: &ConstantTable,
        options: &EmitOptions,
    ) -> GenResult<String> {
        let name = function_name(plan, options);
        let mut out = String::new();

        let header = summary(plan);
        writeln!(out, "/* {} X is used as scratch and is overwritten. */", header)?;
        for constant in declared_constants(plan, constants, options) {
            writeln!(
                out,
                "static const double {} = {:?}; /* {} */",
                constant.name(),
                constant.value,
                definition(constant)
            )?;
        }
        writeln!(out)?;
        writeln!(out, "void {}(double *X, double *Z)", name)?;
        writeln!(out, "{{")?;

        if plan.ops.is_empty() {
            writeln!(out, "    (void)X;")?;
            writeln!(out, "    (void)Z;")?;
        } else {
            writeln!(out, "    double Y[{}];", plan.buffer_len())?;
            for op in plan.ops {
                let line = render_assignment(op, constants, |slot| slot.to_string());
                writeln!(out, "    {};", line)?;
            }
            for (k, index, scale) in output_scaling(plan) {
                writeln!(out, "    Z[{}] = Y[{}] * {};", k, index, scale)?;
            }
        }
        writeln!(out, "}}")?;

        Ok(out)
    }
}
