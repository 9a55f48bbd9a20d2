// This module executes plans numerically. The Evaluator interprets a plan's operations over
// two ping-pong f64 buffers exactly as the generated routine would, then applies the D0/D1
// output scales, which makes it possible to check a plan against the naive cosine-sum
// DCT-II without compiling any generated source. The reference submodule holds that naive
// O(n^2) orthonormal transform.

//! Plan evaluation and the reference DCT-II.

use crate::core::constants::ConstantTable;
use crate::core::error::{GenError, GenResult};
use crate::core::op::OpKind;
use crate::core::slot::{Buffer, Slot};
use crate::planner::Plan;

/// Interprets a [`Plan`] on concrete data.
pub struct Evaluator<'p, 'arena> {
    plan: &'p Plan<'arena>,
    constants: &'p ConstantTable,
}

impl<'p, 'arena> Evaluator<'p, 'arena> {
    pub fn new(plan: &'p Plan<'arena>, constants: &'p ConstantTable) -> GenResult<Self> {
        if constants.order() != plan.order {
            return Err(GenError::invalid(
                "constants",
                i64::from(constants.order()),
                format!("table order does not match plan order {}", plan.order),
            ));
        }
        Ok(Self { plan, constants })
    }

    /// Run the plan and return the scaled coefficients `0..=t`.
    ///
    /// `input` must have the plan's buffer length; it is copied, not modified.
    pub fn run(&self, input: &[f64]) -> GenResult<Vec<f64>> {
        let work = self.run_unscaled(input)?;
        let base = self.plan.base_offset;
        let dc = self.constants.value(self.constants.dc_scale());
        let ac = self.constants.value(self.constants.ac_scale());

        (0..self.plan.output_count())
            .map(|k| {
                let slot = Slot::new(Buffer::Work, base + k);
                let value = work[slot.index].ok_or(GenError::UnwrittenSlot { slot })?;
                Ok(value * if k == 0 { dc } else { ac })
            })
            .collect()
    }

    /// Run the plan and return the final contents of the work buffer
    /// (`None` for slots the plan never wrote).
    pub fn run_unscaled(&self, input: &[f64]) -> GenResult<Vec<Option<f64>>> {
        let len = self.plan.buffer_len();
        if input.len() != len {
            return Err(GenError::invalid(
                "input_len",
                input.len() as i64,
                format!("expected {} values", len),
            ));
        }

        let mut x: Vec<Option<f64>> = input.iter().copied().map(Some).collect();
        let mut y: Vec<Option<f64>> = vec![None; len];

        for op in self.plan.ops {
            let read = |slot: Slot, x: &[Option<f64>], y: &[Option<f64>]| {
                let buf = match slot.buffer {
                    Buffer::Input => x,
                    Buffer::Work => y,
                };
                buf[slot.index].ok_or(GenError::UnwrittenSlot { slot })
            };

            let value = match op.kind {
                OpKind::Combine {
                    op: combine,
                    lhs,
                    rhs,
                    scale,
                } => {
                    let v = combine.apply(read(lhs, &x, &y)?, read(rhs, &x, &y)?);
                    match scale {
                        Some(id) => v * self.constants.value(id),
                        None => v,
                    }
                }
                OpKind::Copy { src } => read(src, &x, &y)?,
            };

            match op.dst.buffer {
                Buffer::Input => x[op.dst.index] = Some(value),
                Buffer::Work => y[op.dst.index] = Some(value),
            }
        }

        Ok(y)
    }
}

/// Largest absolute difference between two equally long slices.
pub fn max_abs_error(lhs: &[f64], rhs: &[f64]) -> f64 {
    lhs.iter()
        .zip(rhs)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max)
}

pub mod reference {
    use std::f64::consts::PI;

    /// Orthonormal DCT-II by direct summation.
    pub fn dct2(input: &[f64]) -> Vec<f64> {
        dct2_prefix(input, input.len())
    }

    /// The first `count` coefficients of [`dct2`].
    pub fn dct2_prefix(input: &[f64], count: usize) -> Vec<f64> {
        let n = input.len();
        let nf = n as f64;
        (0..count.min(n))
            .map(|k| {
                let sum: f64 = input
                    .iter()
                    .enumerate()
                    .map(|(m, &x)| {
                        let angle = PI * (2 * m + 1) as f64 * k as f64 / (2.0 * nf);
                        x * angle.cos()
                    })
                    .sum();
                let norm = if k == 0 { (1.0 / nf).sqrt() } else { (2.0 / nf).sqrt() };
                sum * norm
            })
            .collect()
    }
}
