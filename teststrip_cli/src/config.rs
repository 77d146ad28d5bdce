// Run configuration for the test strip calculator.
//
// `StripConfig` holds every user-facing knob with the classic defaults
// (10 s base, third-stop steps, seven exposures, 40-208 BPM). It can be
// loaded from a JSON file; missing fields take their defaults, and
// command-line flags (cli.rs) override individual fields afterwards.
//
// Integer fields are signed so out-of-domain values reach `validate` and
// are reported as configuration errors rather than deserialization
// failures.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use teststrip_core::StripError;
use teststrip_core::loss::LpLoss;
use teststrip_core::schedule::{Schedule, StripParams};
use teststrip_core::timing::{CountMode, Subdivision};

use crate::tempo_list::MAX_TEMPO;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripConfig {
    /// Base exposure in seconds.
    #[serde(default = "StripConfig::default_base")]
    pub base: f64,
    /// Inverse step width (3 = third stops).
    #[serde(default = "StripConfig::default_stepsize")]
    pub stepsize: i64,
    #[serde(default = "StripConfig::default_numsteps")]
    pub numsteps: i64,
    /// 1-indexed position of the base exposure; middle if unset.
    #[serde(default)]
    pub baseplace: Option<i64>,
    #[serde(default = "StripConfig::default_tmin")]
    pub tmin: i64,
    #[serde(default = "StripConfig::default_tmax")]
    pub tmax: i64,
    /// Tempo list file; replaces the tmin..=tmax range when set.
    #[serde(default)]
    pub tempo_file: Option<PathBuf>,
    /// Beats per counted group; per-tempo default if unset.
    #[serde(default)]
    pub divisions: Option<i64>,
    /// Report counts from the start of the strip instead of per step.
    #[serde(default)]
    pub cumulative: bool,
    #[serde(default = "StripConfig::default_loss_exponent")]
    pub loss_exponent: f64,
    /// Evaluate every tempo instead of pruning divisors.
    #[serde(default)]
    pub exhaustive: bool,
}

impl StripConfig {
    fn default_base() -> f64 {
        10.0
    }
    fn default_stepsize() -> i64 {
        3
    }
    fn default_numsteps() -> i64 {
        7
    }
    fn default_tmin() -> i64 {
        40
    }
    fn default_tmax() -> i64 {
        208
    }
    fn default_loss_exponent() -> f64 {
        2.0
    }

    /// Load from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file '{}'", path.display()))?;
        let config: StripConfig = serde_json::from_str(&data)
            .with_context(|| format!("parsing config file '{}'", path.display()))?;
        Ok(config)
    }

    pub fn strip_params(&self) -> Result<StripParams, StripError> {
        let baseplace = self
            .baseplace
            .map(|p| positive_u32("baseplace", p))
            .transpose()?;
        Ok(StripParams {
            base: self.base,
            stepsize: positive_u32("stepsize", self.stepsize)?,
            numsteps: positive_u32("numsteps", self.numsteps)?,
            baseplace,
        })
    }

    /// Inclusive tempo range bounds. Only consulted without a tempo file.
    pub fn tempo_bounds(&self) -> Result<(u32, u32), StripError> {
        let tmin = positive_u32("tmin", self.tmin)?;
        let tmax = positive_u32("tmax", self.tmax)?;
        for (name, value) in [("tmin", tmin), ("tmax", tmax)] {
            if value > MAX_TEMPO {
                return Err(StripError::InvalidConfiguration(format!(
                    "{name} must be at most {MAX_TEMPO}, got {value}"
                )));
            }
        }
        Ok((tmin, tmax))
    }

    pub fn loss(&self) -> Result<LpLoss, StripError> {
        if !self.loss_exponent.is_finite() || self.loss_exponent <= 0.0 {
            return Err(StripError::InvalidConfiguration(format!(
                "loss exponent must be a positive number, got {}",
                self.loss_exponent
            )));
        }
        Ok(LpLoss::new(self.loss_exponent))
    }

    pub fn count_mode(&self) -> CountMode {
        if self.cumulative {
            CountMode::Cumulative
        } else {
            CountMode::Incremental
        }
    }

    /// Check every field before any work is done. Returns the built
    /// schedule so callers do not validate twice.
    pub fn validate(&self) -> Result<Schedule, StripError> {
        let schedule = Schedule::build(&self.strip_params()?)?;
        if self.tempo_file.is_none() {
            self.tempo_bounds()?;
        }
        if let Some(d) = self.divisions {
            Subdivision::explicit(d)?;
        }
        self.loss()?;
        Ok(schedule)
    }
}

impl Default for StripConfig {
    fn default() -> Self {
        StripConfig {
            base: Self::default_base(),
            stepsize: Self::default_stepsize(),
            numsteps: Self::default_numsteps(),
            baseplace: None,
            tmin: Self::default_tmin(),
            tmax: Self::default_tmax(),
            tempo_file: None,
            divisions: None,
            cumulative: false,
            loss_exponent: Self::default_loss_exponent(),
            exhaustive: false,
        }
    }
}

fn positive_u32(name: &str, value: i64) -> Result<u32, StripError> {
    match u32::try_from(value) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(StripError::InvalidConfiguration(format!(
            "{name} must be a positive integer, got {value}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_tool() {
        let config = StripConfig::default();
        let schedule = config.validate().unwrap();
        assert_eq!(schedule.len(), 7);
        assert_eq!(schedule.baseplace(), 4);
        assert_eq!(schedule.stepsize(), 3);
        assert_eq!(config.tempo_bounds().unwrap(), (40, 208));
        assert_eq!(config.count_mode(), CountMode::Incremental);
        assert_eq!(config.loss().unwrap(), LpLoss::L2);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: StripConfig =
            serde_json::from_str(r#"{ "base": 16.0, "stepsize": 2, "cumulative": true }"#)
                .unwrap();
        assert_eq!(config.base, 16.0);
        assert_eq!(config.stepsize, 2);
        assert_eq!(config.numsteps, 7);
        assert_eq!(config.tmax, 208);
        assert!(config.cumulative);
        assert_eq!(config.count_mode(), CountMode::Cumulative);
    }

    #[test]
    fn config_serializes() {
        let config = StripConfig {
            divisions: Some(2),
            tempo_file: Some(PathBuf::from("tempi.txt")),
            ..Default::default()
        };
        let json = serde_json::to_string_pretty(&config).unwrap();
        let restored: StripConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn out_of_domain_values_are_configuration_errors() {
        let cases = [
            StripConfig {
                stepsize: 0,
                ..Default::default()
            },
            StripConfig {
                numsteps: -3,
                ..Default::default()
            },
            StripConfig {
                base: 0.0,
                ..Default::default()
            },
            StripConfig {
                baseplace: Some(8),
                ..Default::default()
            },
            StripConfig {
                baseplace: Some(-1),
                ..Default::default()
            },
            StripConfig {
                tmin: 0,
                ..Default::default()
            },
            StripConfig {
                tmax: -60,
                ..Default::default()
            },
            StripConfig {
                loss_exponent: 0.0,
                ..Default::default()
            },
        ];
        for config in cases {
            assert!(
                matches!(
                    config.validate(),
                    Err(StripError::InvalidConfiguration(_))
                ),
                "{config:?}"
            );
        }
    }

    #[test]
    fn huge_tempo_range_rejected() {
        let config = StripConfig {
            tmax: 4_000_000_000,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(StripError::InvalidConfiguration(_))
        ));
        let edge = StripConfig {
            tmin: MAX_TEMPO as i64,
            tmax: MAX_TEMPO as i64,
            ..Default::default()
        };
        assert_eq!(edge.tempo_bounds().unwrap(), (MAX_TEMPO, MAX_TEMPO));
    }

    #[test]
    fn tempo_bounds_ignored_with_tempo_file() {
        let config = StripConfig {
            tmin: 0,
            tempo_file: Some(PathBuf::from("tempi.txt")),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn non_positive_divisions_rejected() {
        let config = StripConfig {
            divisions: Some(0),
            ..Default::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            StripError::InvalidSubdivision(0)
        );
    }

    #[test]
    fn load_reads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strip.json");
        std::fs::write(&path, r#"{ "numsteps": 5, "tmin": 50, "tmax": 90 }"#).unwrap();
        let config = StripConfig::load(&path).unwrap();
        assert_eq!(config.numsteps, 5);
        assert_eq!(config.tempo_bounds().unwrap(), (50, 90));
        assert!(StripConfig::load(&dir.path().join("missing.json")).is_err());
    }
}
