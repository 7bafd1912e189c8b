//! Math type re-exports and tolerance-aware float comparison.
//!
//! This module re-exports the `glam` type used by the scene model and
//! provides the comparison predicate that every scalar material check
//! goes through.

// Re-export glam types
pub use glam::Vec2;

/// Default comparison tolerance for scalar material attributes.
///
/// Two values are considered equal when their absolute difference is
/// strictly below this threshold. A difference of exactly `0.001` is a
/// mismatch.
pub const DEFAULT_TOLERANCE: f32 = 0.001;

/// Tolerance-aware scalar equality: `|a - b| < tolerance`.
///
/// The bound is strict, so values whose difference equals the tolerance
/// exactly compare as different.
#[inline]
pub fn approx_eq(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() < tolerance
}

/// Component-wise tolerance comparison of two slices.
///
/// Returns `false` when the lengths differ.
#[inline]
pub fn slice_approx_eq(a: &[f32], b: &[f32], tolerance: f32) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| approx_eq(*x, *y, tolerance))
}
