//! Trigonometric and scaling constants.
//!
//! The whole table for a given order is built in one non-recursive pass before
//! planning starts, so constant numbering never depends on the order in which
//! the planner happens to visit recursion instances.
//!
//! Layout for order `p`:
//! - `C0 = cos(π/4)`, the scale of the size-2 difference.
//! - For every level size `N = 2^q` with `2 <= q <= p` and `k < N/2`:
//!   `C{N/2 - 1 + k} = 0.5 / cos(π·(2k+1) / (2N))`.
//! - `D0 = 2^(-p/2)` and `D1 = 2^((1-p)/2)`, the orthonormal output scales.

use std::f64::consts::PI;
use std::fmt;

use super::error::{GenError, GenResult};

/// Largest supported transform order (2^20 inputs).
pub const MAX_ORDER: u32 = 20;

/// Reject transform orders outside `1..=MAX_ORDER`.
pub fn check_order(order: u32) -> GenResult<()> {
    if order < 1 {
        let reason = "must be at least 1";
        return Err(GenError::invalid("order", i64::from(order), reason));
    }
    if order > MAX_ORDER {
        return Err(GenError::invalid(
            "order",
            i64::from(order),
            format!("must not exceed {}", MAX_ORDER),
        ));
    }
    Ok(())
}

/// Index into a [`ConstantTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstId(pub u32);

impl ConstId {
    /// `cos(π/4)`, the size-2 difference scale.
    pub const QUARTER_COSINE: ConstId = ConstId(0);

    /// Difference scale for position `k` at a level of size `level_size` (>= 4).
    pub fn butterfly_scale(level_size: usize, k: usize) -> ConstId {
        debug_assert!(level_size >= 4 && k < level_size / 2);
        ConstId((level_size / 2 - 1 + k) as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a constant stands for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstantKind {
    /// `cos(π/4)`.
    QuarterCosine,
    /// `0.5 / cos(π·(2k+1)/j)`.
    InverseCosine { k: u32, j: u32 },
    /// Scale of output 0: `2^(-p/2)`.
    DcScale { order: u32 },
    /// Scale of outputs 1..: `2^((1-p)/2)`.
    AcScale { order: u32 },
}

/// A named, precomputed scalar.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub id: ConstId,
    pub kind: ConstantKind,
    pub value: f64,
}

impl Constant {
    fn new(id: ConstId, kind: ConstantKind) -> Self {
        let value = match kind {
            ConstantKind::QuarterCosine => (PI / 4.0).cos(),
            ConstantKind::InverseCosine { k, j } => {
                0.5 / (PI * f64::from(2 * k + 1) / f64::from(j)).cos()
            }
            ConstantKind::DcScale { order } => 2f64.powf(-f64::from(order) / 2.0),
            ConstantKind::AcScale { order } => 2f64.powf((1.0 - f64::from(order)) / 2.0),
        };
        Self { id, kind, value }
    }

    /// Identifier used in generated source.
    pub fn name(&self) -> String {
        match self.kind {
            ConstantKind::DcScale { .. } => "D0".to_string(),
            ConstantKind::AcScale { .. } => "D1".to_string(),
            _ => format!("C{}", self.id.0),
        }
    }

    /// Whether this is one of the two output scales.
    pub fn is_output_scale(&self) -> bool {
        matches!(self.kind, ConstantKind::DcScale { .. } | ConstantKind::AcScale { .. })
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ConstantKind::QuarterCosine => write!(f, "{} = cos(pi / 4)", self.name()),
            ConstantKind::InverseCosine { k, j } => {
                write!(f, "{} = 0.5 / cos(pi * {} / {})", self.name(), 2 * k + 1, j)
            }
            ConstantKind::DcScale { order } => write!(f, "D0 = 2 ** {}", -f64::from(order) / 2.0),
            ConstantKind::AcScale { order } => {
                write!(f, "D1 = 2 ** {}", (1.0 - f64::from(order)) / 2.0)
            }
        }
    }
}

/// Immutable constant table for one transform order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantTable {
    order: u32,
    entries: Vec<Constant>,
}

impl ConstantTable {
    /// Build the table for a transform of size `2^order`.
    ///
    /// Butterfly constants occupy ids `0..2^order - 1`; `D0` and `D1` follow.
    pub fn new(order: u32) -> GenResult<Self> {
        check_order(order)?;
        let butterfly_count = (1usize << order).saturating_sub(1);
        let mut entries = Vec::with_capacity(butterfly_count + 2);
        entries.push(Constant::new(ConstId(0), ConstantKind::QuarterCosine));

        // Nested enumeration: level size N = 2^q, k ascending.
        for q in 2..=order {
            let n = 1u32 << q;
            for k in 0..n / 2 {
                let id = ConstId(entries.len() as u32);
                debug_assert_eq!(id.0, n / 2 - 1 + k);
                let kind = ConstantKind::InverseCosine { k, j: 2 * n };
                entries.push(Constant::new(id, kind));
            }
        }

        let d0 = ConstId(entries.len() as u32);
        entries.push(Constant::new(d0, ConstantKind::DcScale { order }));
        let d1 = ConstId(entries.len() as u32);
        entries.push(Constant::new(d1, ConstantKind::AcScale { order }));

        log::trace!(
            "constant table for order {}: {} entries",
            order,
            entries.len()
        );
        Ok(Self { order, entries })
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    /// Id of `D0`.
    pub fn dc_scale(&self) -> ConstId {
        ConstId((self.entries.len() - 2) as u32)
    }

    /// Id of `D1`.
    pub fn ac_scale(&self) -> ConstId {
        ConstId((self.entries.len() - 1) as u32)
    }

    pub fn get(&self, id: ConstId) -> Option<&Constant> {
        self.entries.get(id.index())
    }

    /// Numeric value of a constant; `NaN` for an id outside the table.
    pub fn value(&self, id: ConstId) -> f64 {
        self.get(id).map_or(f64::NAN, |c| c.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constant> {
        self.entries.iter()
    }
}
