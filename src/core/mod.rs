// This module gathers the shared building blocks of the generator: the arena-backed planning
// session and its statistics, slot and buffer addressing, the operation representation, the
// precomputed constant table and the error type. The planner, evaluator, checks and emitters
// all speak in these types.

//! Core dctgen infrastructure.
//!
//! # Key Components
//!
//! ## Session Management (`session`)
//! - Arena-based allocation of operation lists using `bumpalo`
//! - Memoised required-input sets per `(order, truncation)`
//! - Planning statistics
//!
//! ## Addressing (`slot`)
//! - Two ping-pong buffers, `Input` (X) and `Work` (Y)
//! - Bitset slot sets for liveness
//!
//! ## Operations (`op`) and Constants (`constants`)
//! - Sum, scaled difference and copy assignments
//! - `C`, `D0` and `D1` tables built before planning

pub mod constants;
pub mod error;
pub mod op;
pub mod session;
pub mod slot;
pub mod test_utils;

pub use constants::{ConstId, Constant, ConstantKind, ConstantTable};
pub use error::{GenError, GenResult};
pub use op::{CombineOp, Op, OpKind, Stage};
pub use session::{PlanningSession, SessionStats};
pub use slot::{Buffer, Slot, SlotSet};
