//! Platform-width SIMD bundle type shared by every wide computation in the crate.

use std::simd::Simd;

/// Number of bytes in the widest vector register the target was compiled for.
const fn preferred_byte_size() -> usize {
    if cfg!(target_feature = "avx512f") {
        64
    } else if cfg!(any(target_feature = "avx", target_feature = "avx2")) {
        32
    } else if cfg!(any(
        target_feature = "sse2",
        target_feature = "neon",
        target_feature = "simd128"
    )) {
        16
    } else {
        8
    }
}

/// Number of lanes in a bundle of `T` that fills the preferred register size. Never less than 2,
/// since sample spacing divides by `lanes - 1`.
pub const fn optimal_lanes<T>() -> usize {
    let lanes = preferred_byte_size() / std::mem::size_of::<T>();
    if lanes > 2 {
        lanes
    } else {
        2
    }
}

/// Lane count of every [`Vector`]. Both `f32` and `i32` bundles use the same width so that
/// comparison masks line up with the values they select between.
pub const VECTOR_WIDTH: usize = optimal_lanes::<f32>();

/// A bundle of `VECTOR_WIDTH` scalars processed together.
pub type Vector<T> = Simd<T, VECTOR_WIDTH>;
