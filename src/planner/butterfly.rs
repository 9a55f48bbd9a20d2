//! Ordered operation emission for the pruned fast DCT-II.
//!
//! Each instance of size `N` reads buffer `a` and writes buffer `b`:
//!
//! 1. pre-stage sums `b[i+k] = a[i+k] + a[i+N-1-k]` for the even half's live inputs,
//! 2. pre-stage differences `b[i+N/2+k] = (a[i+k] - a[i+N-1-k]) * C` for the odd half's,
//! 3. the even half (reads `b`, writes `a`), then the odd half,
//! 4. the interleave writing final coefficient order back into `b`.
//!
//! The halves write disjoint index ranges, so running them back to back is safe.

use bumpalo::collections::Vec as BumpVec;

use super::liveness::{child_truncations, required_inputs};
use crate::core::constants::ConstId;
use crate::core::op::{CombineOp, Op, Stage};
use crate::core::session::PlanningSession;
use crate::core::slot::{Buffer, Slot};

/// Appends operations for one recursion tree into an arena vector.
pub(crate) struct ButterflyPlanner<'s, 'arena> {
    session: &'s PlanningSession<'arena>,
    ops: BumpVec<'arena, Op>,
}

impl<'s, 'arena> ButterflyPlanner<'s, 'arena> {
    pub fn new(session: &'s PlanningSession<'arena>) -> Self {
        Self {
            session,
            ops: BumpVec::new_in(session.arena()),
        }
    }

    /// Consume the planner, leaving the operations in the arena.
    pub fn finish(self) -> &'arena [Op] {
        self.ops.into_bump_slice()
    }

    /// Plan an instance of size `2^order` at `base` reading `input`, producing
    /// coefficients `0..=truncation` into the other buffer.
    pub fn emit(&mut self, order: u32, base: usize, truncation: usize, input: Buffer) {
        let output = input.flip();
        let a = |i: usize| Slot::new(input, i);
        let b = |i: usize| Slot::new(output, i);

        log::trace!(
            "instance order={} base={} t={} {}->{}",
            order,
            base,
            truncation,
            input.name(),
            output.name()
        );

        if order == 1 {
            self.ops.push(Op::combine(
                b(base),
                CombineOp::Add,
                a(base),
                a(base + 1),
                None,
                1,
                Stage::Butterfly,
            ));
            if truncation >= 1 {
                self.ops.push(Op::combine(
                    b(base + 1),
                    CombineOp::Sub,
                    a(base),
                    a(base + 1),
                    Some(ConstId::QUARTER_COSINE),
                    1,
                    Stage::Butterfly,
                ));
            }
            return;
        }

        let size = 1usize << order;
        let half = size / 2;
        let (even, odd) = child_truncations(size, truncation);

        for &k in required_inputs(self.session, order - 1, Some(even)) {
            self.ops.push(Op::combine(
                b(base + k),
                CombineOp::Add,
                a(base + k),
                a(base + size - 1 - k),
                None,
                order,
                Stage::Butterfly,
            ));
        }
        for &k in required_inputs(self.session, order - 1, odd) {
            self.ops.push(Op::combine(
                b(base + half + k),
                CombineOp::Sub,
                a(base + k),
                a(base + size - 1 - k),
                Some(ConstId::butterfly_scale(size, k)),
                order,
                Stage::Butterfly,
            ));
        }

        // Even half first: the interleave reads results of both.
        self.emit(order - 1, base, even, output);
        if let Some(odd) = odd {
            self.emit(order - 1, base + half, odd, output);
        }

        self.interleave(order, base, truncation, input);
    }

    /// Final stage: `b[i+2j] = a[i+j]`, `b[i+2j+1] = a[i+N/2+j] + a[i+N/2+j+1]`.
    ///
    /// The two boundary terms are only reached when the loop is not cut short
    /// by the truncation.
    fn interleave(&mut self, order: u32, base: usize, truncation: usize, input: Buffer) {
        let output = input.flip();
        let a = |i: usize| Slot::new(input, i);
        let b = |i: usize| Slot::new(output, i);
        let size = 1usize << order;
        let half = size / 2;

        for j in 0..half - 1 {
            if truncation < 2 * j {
                return;
            }
            self.ops.push(Op::copy(b(base + 2 * j), a(base + j), order));
            if truncation < 2 * j + 1 {
                return;
            }
            self.ops.push(Op::combine(
                b(base + 2 * j + 1),
                CombineOp::Add,
                a(base + half + j),
                a(base + half + j + 1),
                None,
                order,
                Stage::Interleave,
            ));
        }

        if truncation >= size - 2 {
            self.ops.push(Op::copy(b(base + size - 2), a(base + half - 1), order));
            if truncation >= size - 1 {
                self.ops.push(Op::copy(b(base + size - 1), a(base + size - 1), order));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_utils::test::with_test_context;

    fn render(ops: &[Op]) -> Vec<String> {
        ops.iter().map(|op| op.to_string()).collect()
    }

    #[test]
    fn test_size_two() {
        with_test_context(|ctx| {
            let session = ctx.create_session();
            let mut planner = ButterflyPlanner::new(&session);
            planner.emit(1, 0, 1, Buffer::Input);
            let ops = planner.finish();
            assert_eq!(
                render(ops),
                vec!["Y[0] = X[0] + X[1]", "Y[1] = (X[0] - X[1]) * C0"]
            );
        });
    }

    #[test]
    fn test_size_four_two_coefficients() {
        with_test_context(|ctx| {
            let session = ctx.create_session();
            let mut planner = ButterflyPlanner::new(&session);
            planner.emit(2, 0, 1, Buffer::Input);
            let ops = planner.finish();
            assert_eq!(
                render(ops),
                vec![
                    "Y[0] = X[0] + X[3]",
                    "Y[1] = X[1] + X[2]",
                    "Y[2] = (X[0] - X[3]) * C1",
                    "Y[3] = (X[1] - X[2]) * C2",
                    "X[0] = Y[0] + Y[1]",
                    "X[2] = Y[2] + Y[3]",
                    "X[3] = (Y[2] - Y[3]) * C0",
                    "Y[0] = X[0]",
                    "Y[1] = X[2] + X[3]",
                ]
            );
        });
    }

    #[test]
    fn test_interleave_cut_short_skips_boundary() {
        with_test_context(|ctx| {
            let session = ctx.create_session();
            let mut planner = ButterflyPlanner::new(&session);
            planner.emit(3, 0, 2, Buffer::Input);
            let ops = planner.finish();

            let top: Vec<_> = ops
                .iter()
                .filter(|op| op.order == 3 && op.stage == Stage::Interleave)
                .map(|op| op.to_string())
                .collect();
            assert_eq!(
                top,
                vec!["Y[0] = X[0]", "Y[1] = X[4] + X[5]", "Y[2] = X[1]"]
            );
        });
    }

    #[test]
    fn test_full_size_four_includes_boundary() {
        with_test_context(|ctx| {
            let session = ctx.create_session();
            let mut planner = ButterflyPlanner::new(&session);
            planner.emit(2, 0, 3, Buffer::Input);
            let ops = planner.finish();

            let top: Vec<_> = ops
                .iter()
                .filter(|op| op.order == 2 && op.stage == Stage::Interleave)
                .map(|op| op.to_string())
                .collect();
            assert_eq!(
                top,
                vec!["Y[0] = X[0]", "Y[1] = X[2] + X[3]", "Y[2] = X[1]", "Y[3] = X[3]"]
            );
        });
    }
}
