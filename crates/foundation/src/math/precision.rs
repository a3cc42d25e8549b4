//! Precision policies.
//!
//! This module is intentionally small and conservative. It provides:
//! - A deterministic float comparison (`stable_total_cmp_f64`) for sorting keys.
//! - A compensated accumulator (`Adder`) for long sums of small angles.

use core::cmp::Ordering;

/// Canonicalize a floating-point value for deterministic ordering.
///
/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        // Handles +0.0 and -0.0.
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Deterministic total ordering for floats.
///
/// Prefer this any time you sort floats or use them in ordered keys.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}

/// Compensated (two-sum) accumulator.
///
/// Keeps the rounding error of every addition in `lo`, so summing many
/// nearly-cancelling terms keeps its sign.
#[derive(Debug, Copy, Clone, Default)]
pub struct Adder {
    hi: f64,
    lo: f64,
}

impl Adder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, v: f64) {
        let sum = self.hi + v;
        let bv = sum - self.hi;
        let av = sum - bv;
        self.lo += (self.hi - av) + (v - bv);
        self.hi = sum;
    }

    pub fn value(&self) -> f64 {
        self.hi + self.lo
    }
}

#[cfg(test)]
mod tests {
    use super::{Adder, canonical_f64, stable_total_cmp_f64};
    use core::cmp::Ordering;

    #[test]
    fn canonicalizes_negative_zero() {
        assert_eq!(canonical_f64(-0.0), 0.0);
        assert_eq!(canonical_f64(0.0), 0.0);
    }

    #[test]
    fn stable_cmp_is_total_and_deterministic() {
        assert_eq!(stable_total_cmp_f64(1.0, 2.0), Ordering::Less);
        assert_eq!(stable_total_cmp_f64(-0.0, 0.0), Ordering::Equal);
        assert_eq!(stable_total_cmp_f64(f64::NAN, f64::NAN), Ordering::Equal);
    }

    #[test]
    fn adder_keeps_small_terms() {
        let mut naive = 0.0;
        let mut sum = Adder::new();
        for v in [1.0, 1e100, 1.0, -1e100] {
            naive += v;
            sum.add(v);
        }
        assert_eq!(naive, 0.0);
        assert_eq!(sum.value(), 2.0);
    }
}
