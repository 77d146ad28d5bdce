// Loss functions: reduce a tempo's per-step stop errors to one score.
//
// The search only needs a pure reduction that never decreases when any
// single error grows in magnitude; that property is what makes divisor
// pruning safe (see search.rs). `LpLoss` covers the usual choices: sum of
// absolute errors (L1), sum of squares (L2, the default), or any other
// positive exponent.

use serde::{Deserialize, Serialize};

/// A reduction from per-step stop errors to a non-negative scalar.
pub trait Loss {
    fn reduce(&self, errors: &[f64]) -> f64;
}

/// Sum of `|error|^exponent` over all steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LpLoss {
    pub exponent: f64,
}

impl LpLoss {
    pub const L1: LpLoss = LpLoss { exponent: 1.0 };
    pub const L2: LpLoss = LpLoss { exponent: 2.0 };

    pub fn new(exponent: f64) -> Self {
        LpLoss { exponent }
    }
}

impl Default for LpLoss {
    fn default() -> Self {
        LpLoss::L2
    }
}

impl Loss for LpLoss {
    fn reduce(&self, errors: &[f64]) -> f64 {
        // Exact forms for the common exponents keep L1/L2 free of powf
        // rounding.
        if self.exponent == 1.0 {
            errors.iter().map(|e| e.abs()).sum()
        } else if self.exponent == 2.0 {
            errors.iter().map(|e| e * e).sum()
        } else {
            errors.iter().map(|e| e.abs().powf(self.exponent)).sum()
        }
    }
}
