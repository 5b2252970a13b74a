//! Shared test utilities for the climatology workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic precipitation field and dataset generators
//! - Common test fixtures
//! - Approximate float assertions
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_approx_eq, uk_2x2_dataset};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if !(diff <= epsilon) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for element-wise approximate equality of two sequences of `f64`.
///
/// NaN on both sides counts as equal, so masked cells can be compared.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_all_approx_eq;
///
/// assert_all_approx_eq!(field.data().iter(), [1.0, f64::NAN], 1e-9);
/// ```
#[macro_export]
macro_rules! assert_all_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: Vec<f64> = $left.into_iter().map(|v| *::std::borrow::Borrow::<f64>::borrow(&v)).collect();
        let right: Vec<f64> = $right.into_iter().map(|v| *::std::borrow::Borrow::<f64>::borrow(&v)).collect();
        assert_eq!(left.len(), right.len(), "length mismatch");
        for (i, (l, r)) in left.iter().zip(right.iter()).enumerate() {
            if l.is_nan() && r.is_nan() {
                continue;
            }
            let diff = (l - r).abs();
            if !(diff <= $epsilon as f64) {
                panic!(
                    "assertion failed at index {}: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`",
                    i, l, r
                );
            }
        }
    }};
}
