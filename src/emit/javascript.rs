//! JavaScript emitter.
//!
//! Produces a strict-mode IIFE that declares the constants and the work array
//! once and returns the transform function `fdct{N}_{M}(X, Z)`.

use std::fmt::Write;

use super::{declared_constants, function_name, output_scaling, render_assignment, summary};
use super::{EmitOptions, Emitter, Target};
use crate::core::constants::{Constant, ConstantKind, ConstantTable};
use crate::core::error::GenResult;
use crate::planner::Plan;

pub struct JavaScriptEmitter;

/// Floats the way the exponents have always been printed: always with a fraction.
fn js_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

fn constant_expr(constant: &Constant) -> String {
    match constant.kind {
        ConstantKind::QuarterCosine => "Math.cos(Math.PI / 4)".to_string(),
        ConstantKind::InverseCosine { k, j } => {
            format!("0.5 / Math.cos(Math.PI * {} / {})", 2 * k + 1, j)
        }
        ConstantKind::DcScale { order } => format!("2 ** {}", js_float(-f64::from(order) / 2.0)),
        ConstantKind::AcScale { order } => {
            format!("2 ** {}", js_float((1.0 - f64::from(order)) / 2.0))
        }
    }
}

impl Emitter for JavaScriptEmitter {
    fn target(&self) -> Target {
        Target::Javascript
    }

    fn emit(
        &self,
        plan: &Plan<'_>,
        constants: &ConstantTable,
        options: &EmitOptions,
    ) -> GenResult<String> {
        let name = function_name(plan, options);
        let mut out = String::new();

        writeln!(out, "\"use strict\";")?;
        writeln!(out)?;
        writeln!(out, "/** {} */", summary(plan))?;
        writeln!(out, "const {} = function() {{", name)?;
        for constant in declared_constants(plan, constants, options) {
            let expr = constant_expr(constant);
            writeln!(out, "    const {} = {};", constant.name(), expr)?;
        }
        writeln!(out)?;
        let len = plan.buffer_len();
        writeln!(out, "    const Y = new Float64Array({});", len)?;
        writeln!(out)?;
        writeln!(out, "    return function {}(X, Z) {{", name)?;
        for op in plan.ops {
            let line = render_assignment(op, constants, |slot| slot.to_string());
            writeln!(out, "        {};", line)?;
        }
        for (k, index, scale) in output_scaling(plan) {
            writeln!(out, "        Z[{}] = Y[{}] * {};", k, index, scale)?;
        }
        writeln!(out, "    }};")?;
        writeln!(out, "}}();")?;

        Ok(out)
    }
}
