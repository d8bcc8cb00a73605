//! Interpolation primitives used by curve sampling.
//!
//! Linear blend, cubic Bezier in time x value space (parameter recovered by
//! bisection) and cubic Hermite with stored tangents.

pub mod functions;

pub use functions::{bezier, hermite, lerp_f32};
