// Target exposure schedule for a test strip.
//
// A test strip is a row of exposures spaced evenly in stops around a base
// exposure time. Step `i` (0-indexed) sits `(i - baseplace + 1) / stepsize`
// stops from the base, where `baseplace` is the 1-indexed position of the
// base exposure on the strip and `stepsize` is the inverse step width
// (3 means third-stop steps).
//
// The numerator of each step is kept as an integer next to its float value
// so presentation can print exact fractions ("+2/3") without re-deriving
// them from floats.
//
// Consumed by lattice.rs (per-tempo beat assignment) and search.rs.

use serde::{Deserialize, Serialize};

use crate::error::StripError;

/// Inputs that define a schedule. `baseplace` of `None` means the middle
/// of the strip (left of middle for an even step count).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StripParams {
    /// Base exposure in seconds (stop 0).
    pub base: f64,
    /// Inverse step width: 1 = whole stops, 2 = half stops, ...
    pub stepsize: u32,
    /// Number of exposures on the strip.
    pub numsteps: u32,
    /// 1-indexed position of the base exposure.
    pub baseplace: Option<u32>,
}

impl StripParams {
    /// Middle of the strip, rounding toward the first step.
    pub fn default_baseplace(numsteps: u32) -> u32 {
        numsteps.div_ceil(2)
    }

    pub fn resolved_baseplace(&self) -> u32 {
        self.baseplace
            .unwrap_or_else(|| Self::default_baseplace(self.numsteps))
    }
}

/// One target exposure on the strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetStep {
    /// Stop offset in units of `1 / stepsize`.
    pub numerator: i64,
    /// Stop offset from the base exposure (`numerator / stepsize`).
    pub stop: f64,
}

/// Ordered target steps plus the parameters they were derived from.
/// Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    base: f64,
    stepsize: u32,
    baseplace: u32,
    steps: Vec<TargetStep>,
}

impl Schedule {
    /// Validate `params` and derive the target steps.
    pub fn build(params: &StripParams) -> Result<Self, StripError> {
        if !params.base.is_finite() || params.base <= 0.0 {
            return Err(StripError::InvalidConfiguration(format!(
                "base must be a positive number of seconds, got {}",
                params.base
            )));
        }
        if params.stepsize == 0 {
            return Err(StripError::InvalidConfiguration(
                "stepsize must be a positive integer".into(),
            ));
        }
        if params.numsteps == 0 {
            return Err(StripError::InvalidConfiguration(
                "numsteps must be a positive integer".into(),
            ));
        }
        let baseplace = params.resolved_baseplace();
        if baseplace < 1 || baseplace > params.numsteps {
            return Err(StripError::InvalidConfiguration(format!(
                "baseplace must be in [1, {}], got {}",
                params.numsteps, baseplace
            )));
        }

        let stepsize = params.stepsize;
        let steps = (0..params.numsteps)
            .map(|i| {
                let numerator = i as i64 - baseplace as i64 + 1;
                TargetStep {
                    numerator,
                    stop: numerator as f64 / stepsize as f64,
                }
            })
            .collect();

        Ok(Schedule {
            base: params.base,
            stepsize,
            baseplace,
            steps,
        })
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn stepsize(&self) -> u32 {
        self.stepsize
    }

    pub fn baseplace(&self) -> u32 {
        self.baseplace
    }

    pub fn steps(&self) -> &[TargetStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Target stop values in strip order.
    pub fn stops(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.stop).collect()
    }

    /// Target exposure times (`base * 2^stop`), for display only.
    pub fn target_seconds(&self) -> Vec<f64> {
        self.steps
            .iter()
            .map(|s| self.base * s.stop.exp2())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(base: f64, stepsize: u32, numsteps: u32, baseplace: Option<u32>) -> StripParams {
        StripParams {
            base,
            stepsize,
            numsteps,
            baseplace,
        }
    }

    #[test]
    fn whole_stop_schedule_around_middle() {
        let schedule = Schedule::build(&params(10.0, 1, 3, Some(2))).unwrap();
        assert_eq!(schedule.stops(), vec![-1.0, 0.0, 1.0]);
        let secs = schedule.target_seconds();
        assert!((secs[0] - 5.0).abs() < 1e-12);
        assert!((secs[1] - 10.0).abs() < 1e-12);
        assert!((secs[2] - 20.0).abs() < 1e-12);
    }

    #[test]
    fn third_stop_numerators() {
        let schedule = Schedule::build(&params(8.0, 3, 7, None)).unwrap();
        let nums: Vec<i64> = schedule.steps().iter().map(|s| s.numerator).collect();
        assert_eq!(nums, vec![-3, -2, -1, 0, 1, 2, 3]);
        assert_eq!(schedule.baseplace(), 4);
        assert!((schedule.steps()[1].stop + 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn default_baseplace_is_left_of_middle_for_even_counts() {
        assert_eq!(StripParams::default_baseplace(1), 1);
        assert_eq!(StripParams::default_baseplace(6), 3);
        assert_eq!(StripParams::default_baseplace(7), 4);
    }

    #[test]
    fn single_step_schedule() {
        let schedule = Schedule::build(&params(10.0, 2, 1, Some(1))).unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.stops(), vec![0.0]);
    }

    #[test]
    fn baseplace_at_first_step_only_brightens() {
        let schedule = Schedule::build(&params(10.0, 2, 4, Some(1))).unwrap();
        assert_eq!(schedule.stops(), vec![0.0, 0.5, 1.0, 1.5]);
    }

    #[test]
    fn rejects_out_of_domain_values() {
        for bad in [
            params(0.0, 3, 7, None),
            params(-1.0, 3, 7, None),
            params(f64::NAN, 3, 7, None),
            params(10.0, 0, 7, None),
            params(10.0, 3, 0, None),
            params(10.0, 3, 7, Some(0)),
            params(10.0, 3, 7, Some(8)),
        ] {
            assert!(
                matches!(
                    Schedule::build(&bad),
                    Err(StripError::InvalidConfiguration(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }
}
