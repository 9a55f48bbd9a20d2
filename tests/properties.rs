//! Property-based tests for generated plans.
//!
//! For random inputs, orders and truncations, the evaluated plan must agree
//! with the direct cosine-sum DCT-II on every requested coefficient.

use bumpalo::Bump;
use proptest::prelude::*;

use dctgen::check::check_plan;
use dctgen::eval::{reference, Evaluator};
use dctgen::planner::plan_truncated;
use dctgen::{ConstantTable, PlanningSession};

/// An order in 1..=7, a truncation valid for it and an input vector of the
/// matching length.
fn arb_case() -> impl Strategy<Value = (u32, usize, Vec<f64>)> {
    (1u32..=7).prop_flat_map(|order| {
        let size = 1usize << order;
        (
            Just(order),
            0..size,
            prop::collection::vec(-100.0f64..100.0, size),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Evaluated coefficients match the reference transform.
    #[test]
    fn plan_matches_reference((order, t, input) in arb_case()) {
        let arena = Bump::new();
        let session = PlanningSession::new(&arena);
        let plan = plan_truncated(&session, order, t as i64).unwrap();
        let constants = ConstantTable::new(order).unwrap();

        let out = Evaluator::new(&plan, &constants).unwrap().run(&input).unwrap();
        let expected = reference::dct2_prefix(&input, t + 1);
        let magnitude = expected.iter().fold(1.0f64, |m, v| m.max(v.abs()));

        prop_assert_eq!(out.len(), t + 1);
        for (k, (a, b)) in out.iter().zip(&expected).enumerate() {
            prop_assert!((a - b).abs() <= 1e-9 * magnitude,
                "order={} t={} k={}: {} vs {}", order, t, k, a, b);
        }
    }

    /// The input slice handed to the evaluator is left untouched.
    #[test]
    fn evaluation_preserves_input((order, t, input) in arb_case()) {
        let arena = Bump::new();
        let session = PlanningSession::new(&arena);
        let plan = plan_truncated(&session, order, t as i64).unwrap();
        let constants = ConstantTable::new(order).unwrap();

        let before = input.clone();
        Evaluator::new(&plan, &constants).unwrap().run(&input).unwrap();
        prop_assert_eq!(before, input);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Structural checks hold for every order/truncation pair.
    #[test]
    fn plan_is_structurally_sound(order in 1u32..=8, t_frac in 0.0f64..1.0) {
        let size = 1usize << order;
        let t = ((size as f64) * t_frac) as usize;
        let t = t.min(size - 1);

        let arena = Bump::new();
        let session = PlanningSession::new(&arena);
        let plan = plan_truncated(&session, order, t as i64).unwrap();
        let failures = check_plan(&plan);
        prop_assert!(
            failures.is_empty(),
            "order={} t={}: {:?}",
            order,
            t,
            failures
        );
    }
}
