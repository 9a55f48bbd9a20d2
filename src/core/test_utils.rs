//! Test utilities for arena-based testing.
//!
//! Each test gets its own bounded arena so plans never outlive the data they
//! point into.
