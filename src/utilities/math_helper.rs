//! Trigonometric approximations that behave identically for scalar and wide inputs.
//!
//! There is no lane-parallel sine or cosine in `std::simd`, and the orientation integrator needs one
//! per lane, so both are built from a single rational approximation of cosine over [0, pi/2].
//! The scalar versions exist so that code which must agree with a wide result can do so exactly.

use crate::utilities::vector::Vector;
use std::f32::consts::{FRAC_2_PI, FRAC_PI_2, PI};
use std::simd::prelude::*;
use std::simd::StdFloat;

const TWO_PI: f32 = 2.0 * PI;
const THREE_PI_OVER_2: f32 = 3.0 * FRAC_PI_2;

// cos(y) ~= (pi/2 - y) * (2/pi + N1 * y + N2 * y^2) / (1 + D1 * y + D2 * y^2 + D3 * y^3) on [0, pi/2].
// The numerator's root sits exactly at pi/2, so sin(0) and cos(pi/2) land within an ulp of zero instead of on a
// residual of the fit.
const N1: f32 = 0.252_902_62;
const N2: f32 = -0.110_299_51;
const D1: f32 = -0.239_412_3;
const D2: f32 = 0.074_447_37;
const D3: f32 = -0.011_831_753;

/// Computes an approximation of cosine. Maximum error is a little below 3e-6 over [-4 * pi, 4 * pi];
/// values further from zero lose precision gracefully in the range reduction.
#[inline(always)]
pub fn cos(x: f32) -> f32 {
    // Cosine is even, so fold the absolute value into a single period.
    let period_count = x.abs() * (0.5 / PI);
    let period_x = (period_count - period_count.floor()) * TWO_PI;

    // [0, pi/2] = f(x)
    // (pi/2, pi] = -f(pi - x)
    // (pi, 3 * pi / 2] = -f(x - pi)
    // (3 * pi / 2, 2 * pi) = f(2 * pi - x)
    let y = if period_x > THREE_PI_OVER_2 {
        TWO_PI - period_x
    } else if period_x > PI {
        period_x - PI
    } else if period_x > FRAC_PI_2 {
        PI - period_x
    } else {
        period_x
    };

    let numerator = (FRAC_PI_2 - y) * (FRAC_2_PI + y * (N1 + y * N2));
    let denominator = 1.0 + y * (D1 + y * (D2 + y * D3));
    let result = numerator / denominator;
    if period_x > FRAC_PI_2 && period_x < THREE_PI_OVER_2 {
        -result
    } else {
        result
    }
}

/// Computes an approximation of sine by phase shifting [`cos`].
#[inline(always)]
pub fn sin(x: f32) -> f32 {
    cos(x - FRAC_PI_2)
}

/// Computes an approximation of cosine for every lane. Matches [`cos`] lane for lane.
#[inline(always)]
pub fn cos_wide(x: Vector<f32>) -> Vector<f32> {
    let period_count = x.abs() * Vector::splat(0.5 / PI);
    let period_x = (period_count - period_count.floor()) * Vector::splat(TWO_PI);

    let pi_over_2 = Vector::splat(FRAC_PI_2);
    let pi = Vector::splat(PI);
    let three_pi_over_2 = Vector::splat(THREE_PI_OVER_2);

    // Lanes generally sit in different quadrants, so every reflection is applied by selection.
    let mut y = period_x.simd_gt(pi_over_2).select(pi - period_x, period_x);
    y = period_x.simd_gt(pi).select(period_x - pi, y);
    y = period_x
        .simd_gt(three_pi_over_2)
        .select(Vector::splat(TWO_PI) - period_x, y);

    let numerator = (pi_over_2 - y)
        * (Vector::splat(FRAC_2_PI) + y * (Vector::splat(N1) + y * Vector::splat(N2)));
    let denominator = Vector::splat(1.0)
        + y * (Vector::splat(D1) + y * (Vector::splat(D2) + y * Vector::splat(D3)));
    let result = numerator / denominator;
    (period_x.simd_gt(pi_over_2) & period_x.simd_lt(three_pi_over_2)).select(-result, result)
}

/// Computes an approximation of sine for every lane by phase shifting [`cos_wide`].
#[inline(always)]
pub fn sin_wide(x: Vector<f32>) -> Vector<f32> {
    cos_wide(x - Vector::splat(FRAC_PI_2))
}

/// Computes both sine and cosine of every lane.
#[inline(always)]
pub fn get_sin_cos_wide(x: Vector<f32>, sin: &mut Vector<f32>, cos: &mut Vector<f32>) {
    *sin = sin_wide(x);
    *cos = cos_wide(x);
}
