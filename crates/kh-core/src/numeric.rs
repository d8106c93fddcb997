use crate::{KhError, KhResult};

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

/// Is `value` zero within tolerance, scaled by the magnitude of the terms
/// that were summed to produce it?
///
/// A KVL residual is a signed sum of large terms that should cancel; comparing
/// it to zero with a purely relative tolerance is meaningless.
pub fn nearly_zero_sum(value: Real, term_scale: Real, tol: Tolerances) -> bool {
    value.abs() <= tol.abs + tol.rel * term_scale.abs()
}

pub fn ensure_finite(v: Real, what: &'static str) -> KhResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(KhError::NonFinite { what, value: v })
    }
}
