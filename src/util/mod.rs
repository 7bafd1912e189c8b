//! Utility types and functions for material deduplication.
//!
//! This module contains fundamental types used throughout the library:
//! - [`Error`] / [`Result`] - Error handling
//! - [`approx_eq`] / [`slice_approx_eq`] - Tolerance-aware comparison
//! - Math type re-exports from glam

mod error;
mod math;

pub use error::*;
pub use math::*;
