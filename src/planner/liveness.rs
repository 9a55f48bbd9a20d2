//! Required-input analysis.
//!
//! Before any operation is emitted we need to know, for every recursion
//! instance, which slots of its input buffer it will actually read. That set
//! depends only on the instance's order and truncation (offsets shift it), so
//! it is computed once per `(order, truncation)` pair and memoised in the
//! session arena.

use crate::core::session::PlanningSession;
use crate::core::slot::SlotSet;

const BASE_PAIR: [usize; 2] = [0, 1];

/// Pre-stage slots read for a half's live inputs: a live slot k (sum or
/// difference) reads k and size-1-k.
fn mirrored(size: usize, half_live: &[usize]) -> SlotSet {
    let mut set = SlotSet::new(size);
    for &k in half_live {
        set.insert(k);
        set.insert(size - 1 - k);
    }
    set
}

/// Truncations handed to the even and odd half-size instances.
///
/// The odd half is only planned when at least one odd coefficient is wanted.
pub(crate) fn child_truncations(size: usize, truncation: usize) -> (usize, Option<usize>) {
    let half = size / 2;
    let even = truncation / 2;
    let odd = (truncation >= 1).then(|| ((truncation + 1) / 2).min(half - 1));
    (even, odd)
}

/// Input slots, relative to the instance base and in ascending order, read by
/// an instance of size `2^order` that must produce coefficients `0..=truncation`.
///
/// `None` means the instance produces nothing and reads nothing.
pub fn required_inputs<'arena>(
    session: &PlanningSession<'arena>,
    order: u32,
    truncation: Option<usize>,
) -> &'arena [usize] {
    let Some(truncation) = truncation else {
        return &[];
    };
    if order == 1 {
        // The sum is always emitted and reads both slots.
        return &BASE_PAIR;
    }

    let key = (order, truncation);
    if let Some(cached) = session.cached_liveness(key) {
        return cached;
    }

    let size = 1usize << order;
    let (even, odd) = child_truncations(size, truncation);
    let mut live = mirrored(size, required_inputs(session, order - 1, Some(even)));
    live.union_with(&mirrored(size, required_inputs(session, order - 1, odd)));

    log::trace!(
        "required inputs order={} t={}: {} of {} slots",
        order,
        truncation,
        live.len(),
        size
    );
    session.store_liveness(key, &live.to_vec())
}
