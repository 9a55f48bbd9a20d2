//! Scalar assignment operations produced by the planner.

use std::fmt;

use super::constants::ConstId;
use super::slot::Slot;

/// Sum or difference of two slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombineOp {
    Add,
    Sub,
}

impl CombineOp {
    pub fn symbol(self) -> char {
        match self {
            CombineOp::Add => '+',
            CombineOp::Sub => '-',
        }
    }

    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            CombineOp::Add => lhs + rhs,
            CombineOp::Sub => lhs - rhs,
        }
    }
}

/// Which part of a recursion instance emitted an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Pre-stage sums and scaled differences, and the size-2 base case.
    Butterfly,
    /// Recombination of the two half-size results into final order.
    Interleave,
}

/// Right hand side of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// `dst = (lhs ± rhs) [* scale]`
    Combine {
        op: CombineOp,
        lhs: Slot,
        rhs: Slot,
        scale: Option<ConstId>,
    },
    /// `dst = src`
    Copy { src: Slot },
}

/// One assignment `dst = kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Op {
    pub dst: Slot,
    pub kind: OpKind,
    /// Order (log2 size) of the recursion instance that emitted this op.
    pub order: u32,
    pub stage: Stage,
}

impl Op {
    #[allow(clippy::too_many_arguments)]
    pub fn combine(
        dst: Slot,
        op: CombineOp,
        lhs: Slot,
        rhs: Slot,
        scale: Option<ConstId>,
        order: u32,
        stage: Stage,
    ) -> Self {
        Self {
            dst,
            kind: OpKind::Combine {
                op,
                lhs,
                rhs,
                scale,
            },
            order,
            stage,
        }
    }

    pub fn copy(dst: Slot, src: Slot, order: u32) -> Self {
        Self {
            dst,
            kind: OpKind::Copy { src },
            order,
            stage: Stage::Interleave,
        }
    }

    /// Source slots in operand order.
    pub fn sources(&self) -> impl Iterator<Item = Slot> {
        let (first, second) = match self.kind {
            OpKind::Combine { lhs, rhs, .. } => (lhs, Some(rhs)),
            OpKind::Copy { src } => (src, None),
        };
        std::iter::once(first).chain(second)
    }

    /// Scale constant, if any.
    pub fn scale(&self) -> Option<ConstId> {
        match self.kind {
            OpKind::Combine { scale, .. } => scale,
            OpKind::Copy { .. } => None,
        }
    }

    pub fn is_combine(&self) -> bool {
        matches!(self.kind, OpKind::Combine { .. })
    }

    pub fn is_difference(&self) -> bool {
        matches!(self.kind, OpKind::Combine { op: CombineOp::Sub, .. })
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OpKind::Combine {
                op,
                lhs,
                rhs,
                scale: Some(c),
            } => {
                let symbol = op.symbol();
                write!(f, "{} = ({} {} {}) * C{}", self.dst, lhs, symbol, rhs, c.0)
            }
            OpKind::Combine {
                op,
                lhs,
                rhs,
                scale: None,
            } => {
                write!(f, "{} = {} {} {}", self.dst, lhs, op.symbol(), rhs)
            }
            OpKind::Copy { src } => write!(f, "{} = {}", self.dst, src),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::slot::Buffer;

    #[test]
    fn test_display() {
        let x = |i| Slot::new(Buffer::Input, i);
        let y = |i| Slot::new(Buffer::Work, i);

        let sum = Op::combine(y(0), CombineOp::Add, x(0), x(1), None, 1, Stage::Butterfly);
        assert_eq!(sum.to_string(), "Y[0] = X[0] + X[1]");

        let diff = Op::combine(
            y(1),
            CombineOp::Sub,
            x(0),
            x(1),
            Some(ConstId(0)),
            1,
            Stage::Butterfly,
        );
        assert_eq!(diff.to_string(), "Y[1] = (X[0] - X[1]) * C0");
        assert!(diff.is_difference());
        assert_eq!(diff.scale(), Some(ConstId(0)));

        let copy = Op::copy(y(2), x(1), 2);
        assert_eq!(copy.to_string(), "Y[2] = X[1]");
        assert!(!copy.is_combine());
        assert_eq!(copy.stage, Stage::Interleave);
    }

    #[test]
    fn test_sources() {
        let x = |i| Slot::new(Buffer::Input, i);
        let y = |i| Slot::new(Buffer::Work, i);

        let sum = Op::combine(y(4), CombineOp::Add, x(4), x(7), None, 2, Stage::Butterfly);
        assert_eq!(sum.sources().collect::<Vec<_>>(), vec![x(4), x(7)]);
        let copy = Op::copy(y(0), x(3), 2);
        assert_eq!(copy.sources().collect::<Vec<_>>(), vec![x(3)]);
    }

    #[test]
    fn test_combine_apply() {
        assert_eq!(CombineOp::Add.apply(2.0, 3.0), 5.0);
        assert_eq!(CombineOp::Sub.apply(2.0, 3.0), -1.0);
    }
}
