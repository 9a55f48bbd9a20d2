// This module turns a finished plan into source text. It holds no algorithmic decisions: an
// Emitter walks the plan's operations in order, prints one assignment per operation, declares
// the constants the operations reference and appends the D0/D1 output scaling. Three targets
// exist: JavaScript (the historical output format), Rust and C. Shared naming and constant
// selection live here so every target agrees on them.

//! Source emitters.

pub mod c;
pub mod javascript;
pub mod rust;

use std::fmt;

use crate::core::constants::{Constant, ConstantTable};
use crate::core::error::{GenError, GenResult};
use crate::core::op::{Op, OpKind};
use crate::core::slot::Slot;
use crate::planner::Plan;

/// Output language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Target {
    #[value(alias = "js")]
    Javascript,
    #[value(alias = "rs")]
    Rust,
    C,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Target::Javascript => "javascript",
            Target::Rust => "rust",
            Target::C => "c",
        })
    }
}

/// Knobs shared by all emitters.
#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    /// Override for the generated function name (default `fdct{N}_{t+1}`).
    pub function_name: Option<String>,
    /// Declare the whole constant table instead of only what the plan uses.
    pub all_constants: bool,
}

/// Prints a plan as source code in one target language.
pub trait Emitter {
    fn target(&self) -> Target;

    fn emit(
        &self,
        plan: &Plan<'_>,
        constants: &ConstantTable,
        options: &EmitOptions,
    ) -> GenResult<String>;
}

/// Emitter for the given target.
pub fn emitter_for(target: Target) -> Box<dyn Emitter> {
    match target {
        Target::Javascript => Box::new(javascript::JavaScriptEmitter),
        Target::Rust => Box::new(rust::RustEmitter),
        Target::C => Box::new(c::CEmitter),
    }
}

/// Emit `plan` for `target`.
pub fn emit(
    plan: &Plan<'_>,
    constants: &ConstantTable,
    target: Target,
    options: &EmitOptions,
) -> GenResult<String> {
    if constants.order() != plan.order {
        return Err(GenError::invalid(
            "constants",
            i64::from(constants.order()),
            format!("table order does not match plan order {}", plan.order),
        ));
    }
    let source = emitter_for(target).emit(plan, constants, options)?;
    log::info!(
        "emitted {} routine {} ({} ops, {} bytes)",
        target,
        function_name(plan, options),
        plan.ops.len(),
        source.len()
    );
    Ok(source)
}

pub(crate) fn function_name(plan: &Plan<'_>, options: &EmitOptions) -> String {
    options
        .function_name
        .clone()
        .unwrap_or_else(|| format!("fdct{}_{}", plan.size(), plan.output_count()))
}

pub(crate) fn summary(plan: &Plan<'_>) -> String {
    format!(
        "Compute the first {} coefficients of the {}-element DCT-II.",
        plan.output_count(),
        plan.size()
    )
}

/// Constants to declare, in table order.
pub(crate) fn declared_constants<'t>(
    plan: &Plan<'_>,
    constants: &'t ConstantTable,
    options: &EmitOptions,
) -> Vec<&'t Constant> {
    if options.all_constants {
        return constants.iter().collect();
    }

    let used = plan.constants_used();
    let outputs = plan.output_count();
    constants
        .iter()
        .filter(|c| {
            used.binary_search(&c.id).is_ok()
                || (c.id == constants.dc_scale() && outputs >= 1)
                || (c.id == constants.ac_scale() && outputs >= 2)
        })
        .collect()
}

/// `dst = rhs` with slots rendered by `slot`, without terminator.
pub(crate) fn render_assignment(
    op: &Op,
    constants: &ConstantTable,
    slot: impl Fn(Slot) -> String,
) -> String {
    let rhs = match op.kind {
        OpKind::Combine {
            op: combine,
            lhs,
            rhs,
            scale: Some(id),
        } => {
            let name = constants.get(id).map_or_else(|| format!("C{}", id.0), Constant::name);
            let (lhs, rhs) = (slot(lhs), slot(rhs));
            format!("({} {} {}) * {}", lhs, combine.symbol(), rhs, name)
        }
        OpKind::Combine {
            op: combine,
            lhs,
            rhs,
            scale: None,
        } => {
            format!("{} {} {}", slot(lhs), combine.symbol(), slot(rhs))
        }
        OpKind::Copy { src } => slot(src),
    };
    format!("{} = {}", slot(op.dst), rhs)
}

/// Right-hand side of a constant's definition, for comments in typed targets.
pub(crate) fn definition(constant: &Constant) -> String {
    let text = constant.to_string();
    match text.split_once(" = ") {
        Some((_, rhs)) => rhs.to_string(),
        None => text,
    }
}

/// Output scaling lines `(k, work_index, scale_name)` for `Z[k] = Y[i] * D`.
pub(crate) fn output_scaling(
    plan: &Plan<'_>,
) -> impl Iterator<Item = (usize, usize, &'static str)> {
    let base = plan.base_offset;
    (0..plan.output_count()).map(move |k| (k, base + k, if k == 0 { "D0" } else { "D1" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::ConstId;
    use crate::core::test_utils::test::with_test_context;
    use crate::planner::plan_truncated;

    #[test]
    fn test_function_name() {
        with_test_context(|ctx| {
            let session = ctx.create_session();
            let plan = plan_truncated(&session, 5, 10).unwrap();
            assert_eq!(function_name(&plan, &EmitOptions::default()), "fdct32_11");
            let named = EmitOptions {
                function_name: Some("dct_head".into()),
                ..Default::default()
            };
            assert_eq!(function_name(&plan, &named), "dct_head");
            assert_eq!(
                summary(&plan),
                "Compute the first 11 coefficients of the 32-element DCT-II."
            );
        });
    }

    #[test]
    fn test_declared_constants() {
        with_test_context(|ctx| {
            let session = ctx.create_session();
            let table = ConstantTable::new(3).unwrap();

            let dc = plan_truncated(&session, 3, 0).unwrap();
            let names: Vec<_> = declared_constants(&dc, &table, &EmitOptions::default())
                .iter()
                .map(|c| c.name())
                .collect();
            assert_eq!(names, vec!["D0"]);

            let all = EmitOptions {
                all_constants: true,
                ..Default::default()
            };
            assert_eq!(declared_constants(&dc, &table, &all).len(), table.len());

            let full = plan_truncated(&session, 3, 7).unwrap();
            let declared = declared_constants(&full, &table, &EmitOptions::default());
            assert_eq!(declared.len(), table.len());
            assert_eq!(declared[0].id, ConstId(0));
        });
    }

    #[test]
    fn test_mismatched_table_rejected() {
        with_test_context(|ctx| {
            let session = ctx.create_session();
            let plan = plan_truncated(&session, 3, 7).unwrap();
            let table = ConstantTable::new(2).unwrap();
            let err = emit(&plan, &table, Target::C, &EmitOptions::default()).unwrap_err();
            assert!(err.is_invalid_parameter());
        });
    }

    #[test]
    fn test_definition() {
        let table = ConstantTable::new(2).unwrap();
        let constant = table.get(ConstId(2)).unwrap();
        assert_eq!(definition(constant), "0.5 / cos(pi * 3 / 8)");
        assert_eq!(definition(table.get(table.dc_scale()).unwrap()), "2 ** -1");
    }

    #[test]
    fn test_target_display() {
        assert_eq!(Target::Javascript.to_string(), "javascript");
        assert_eq!(Target::C.to_string(), "c");
    }
}
