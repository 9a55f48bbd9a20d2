//! Rust emitter.
//!
//! The routine takes the input as a fixed-size mutable array because the
//! transform overwrites it; coefficients are written into `z`, which must hold
//! at least `t + 1` values.

use std::fmt::Write;

use super::{
    declared_constants, definition, function_name, output_scaling, render_assignment, summary,
};
use super::{EmitOptions, Emitter, Target};
use crate::core::constants::ConstantTable;
use crate::core::error::GenResult;
use crate::core::slot::{Buffer, Slot};
use crate::planner::Plan;

pub struct RustEmitter;

fn slot_name(slot: Slot) -> String {
    let buffer = match slot.buffer {
        Buffer::Input => "x",
        Buffer::Work => "y",
    };
    format!("{}[{}]", buffer, slot.index)
}

impl Emitter for RustEmitter {
    fn target(&self) -> Target {
        Target::Rust
    }

    fn emit(
        &self,
        plan: &Plan<'_>,
        constants: &ConstantTable,
        options: &EmitOptions,
    ) -> GenResult<String> {
        let name = function_name(plan, options);
        let len = plan.buffer_len();
        let mut out = String::new();

        writeln!(out, "// Generated by dctgen.")?;
        writeln!(out)?;
        writeln!(out, "/// {}", summary(plan))?;
        writeln!(out, "///")?;
        writeln!(out, "/// `x` is used as scratch space and is overwritten.")?;
        writeln!(
            out,
            "#[allow(dead_code, clippy::approx_constant, clippy::excessive_precision)]"
        )?;
        writeln!(
            out,
            "pub fn {}(x: &mut [f64; {}], z: &mut [f64]) {{",
            name, len
        )?;
        for constant in declared_constants(plan, constants, options) {
            writeln!(
                out,
                "    const {}: f64 = {:?}; // {}",
                constant.name(),
                constant.value,
                definition(constant)
            )?;
        }

        if plan.ops.is_empty() {
            writeln!(out, "    let _ = (x, z);")?;
        } else {
            writeln!(out, "    let mut y = [0.0f64; {}];", len)?;
            for op in plan.ops {
                writeln!(out, "    {};", render_assignment(op, constants, slot_name))?;
            }
            for (k, index, scale) in output_scaling(plan) {
                writeln!(out, "    z[{}] = y[{}] * {};", k, index, scale)?;
            }
        }
        writeln!(out, "}}")?;

        Ok(out)
    }
}
