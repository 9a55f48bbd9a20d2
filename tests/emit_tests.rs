//! Integration tests for the source emitters.
//!
//! These check the emitted text for each target by pattern, the way the
//! generated routines are read by people.

use bumpalo::Bump;
use dctgen::emit::{self, emitter_for, EmitOptions, Target};
use dctgen::planner::plan_truncated;
use dctgen::{generate, ConstantTable, PlanningSession};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Helper to check if output contains expected patterns
fn check_output_contains(output: &str, patterns: &[&str]) {
    for pattern in patterns {
        assert!(
            output.contains(pattern),
            "Output missing expected pattern: '{pattern}'\nFull output:\n{output}"
        );
    }
}

/// Number of body lines that assign into the ping-pong buffers.
fn assignment_lines(output: &str, prefixes: &[&str]) -> usize {
    output
        .lines()
        .map(str::trim_start)
        .filter(|line| prefixes.iter().any(|p| line.starts_with(p)))
        .count()
}

#[test]
fn test_javascript_default_routine() {
    init_logging();
    let output = generate(5, 10, Target::Javascript, &EmitOptions::default()).unwrap();

    check_output_contains(
        &output,
        &[
            "\"use strict\";\n",
            "/** Compute the first 11 coefficients of the 32-element DCT-II. */",
            "const fdct32_11 = function() {",
            "    const D0 = 2 ** -2.5;",
            "    const D1 = 2 ** -2.0;",
            "    const Y = new Float64Array(32);",
            "    return function fdct32_11(X, Z) {",
            "        Y[0] = X[0] + X[31];",
            "        Z[0] = Y[0] * D0;",
            "        Z[10] = Y[10] * D1;",
            "    };\n}();\n",
        ],
    );
    assert!(!output.contains("Z[11]"));
    assert_eq!(assignment_lines(&output, &["X[", "Y["]), 209);
}

#[test]
fn test_javascript_declares_only_used_constants() {
    init_logging();
    let arena = Bump::new();
    let session = PlanningSession::new(&arena);
    let plan = plan_truncated(&session, 5, 10).unwrap();
    let constants = ConstantTable::new(5).unwrap();

    let options = EmitOptions::default();
    let pruned = emit::emit(&plan, &constants, Target::Javascript, &options).unwrap();
    let declared = pruned.lines().filter(|l| l.trim_start().starts_with("const C")).count();
    assert_eq!(declared, plan.constants_used().len());
    for id in plan.constants_used() {
        assert!(pruned.contains(&format!("const C{} = ", id.0)));
    }

    let all = EmitOptions {
        all_constants: true,
        ..Default::default()
    };
    let full = emit::emit(&plan, &constants, Target::Javascript, &all).unwrap();
    let declared = full.lines().filter(|l| l.trim_start().starts_with("const C")).count();
    assert_eq!(declared, 31);
}

#[test]
fn test_rust_routine() {
    init_logging();
    let options = EmitOptions {
        function_name: Some("dct_head".into()),
        ..Default::default()
    };
    let output = generate(3, 7, Target::Rust, &options).unwrap();

    check_output_contains(
        &output,
        &[
            "/// Compute the first 8 coefficients of the 8-element DCT-II.",
            "/// `x` is used as scratch space and is overwritten.",
            "pub fn dct_head(x: &mut [f64; 8], z: &mut [f64]) {",
            "    const C0: f64 = ",
            "    let mut y = [0.0f64; 8];",
            "    z[7] = y[7] * D1;",
        ],
    );
    assert_eq!(assignment_lines(&output, &["x[", "y["]), 40);
}

#[test]
fn test_c_routine() {
    init_logging();
    let output = generate(2, 1, Target::C, &EmitOptions::default()).unwrap();

    check_output_contains(
        &output,
        &[
            "/* Compute the first 2 coefficients of the 4-element DCT-II. X is used as scratch",
            "static const double C0 = ",
            "static const double C1 = ",
            "static const double C2 = ",
            "void fdct4_2(double *X, double *Z)\n{",
            "    double Y[4];",
            "    Y[0] = X[0] + X[3];",
            "    Y[1] = X[1] + X[2];",
            "    Y[2] = (X[0] - X[3]) * C1;",
            "    Y[3] = (X[1] - X[2]) * C2;",
            "    X[0] = Y[0] + Y[1];",
            "    X[2] = Y[2] + Y[3];",
            "    X[3] = (Y[2] - Y[3]) * C0;",
            "    Y[0] = X[0];",
            "    Y[1] = X[2] + X[3];",
            "    Z[0] = Y[0] * D0;",
            "    Z[1] = Y[1] * D1;",
        ],
    );
}

#[test]
fn test_all_targets_share_naming() {
    init_logging();
    let arena = Bump::new();
    let session = PlanningSession::new(&arena);
    let plan = plan_truncated(&session, 4, 3).unwrap();
    let constants = ConstantTable::new(4).unwrap();

    for target in [Target::Javascript, Target::Rust, Target::C] {
        let emitter = emitter_for(target);
        assert_eq!(emitter.target(), target);
        let output = emitter.emit(&plan, &constants, &EmitOptions::default()).unwrap();
        check_output_contains(
            &output,
            &["fdct16_4", "Compute the first 4 coefficients of the 16-element DCT-II."],
        );
    }
}

#[test]
fn test_generate_rejects_bad_order() {
    init_logging();
    let err = generate(0, 0, Target::Rust, &EmitOptions::default()).unwrap_err();
    assert!(err.is_invalid_parameter());
}
