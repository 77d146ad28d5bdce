// Command-line arguments for `striptest`.
//
// Every strip/search option is optional here so that an explicitly given
// flag overrides the config file (config.rs) while an absent one leaves
// the file's value, or the built-in default, in place.

use std::path::PathBuf;

use clap::Parser;

use crate::config::StripConfig;

/// Calculate the best metronome tempo for timing a darkroom test strip.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about)]
pub struct Args {
    /// Base exposure in seconds [default: 10]
    #[arg(short, long)]
    pub base: Option<f64>,

    /// Inverse of the step size: 1 is whole stops, 2 half stops, 3 third stops [default: 3]
    #[arg(short, long, allow_negative_numbers = true)]
    pub stepsize: Option<i64>,

    /// Number of exposures on the strip [default: 7]
    #[arg(short, long, allow_negative_numbers = true)]
    pub numsteps: Option<i64>,

    /// 1-indexed position of the base exposure [default: middle, left of middle for even counts]
    #[arg(short = 'p', long, allow_negative_numbers = true)]
    pub baseplace: Option<i64>,

    /// Slowest tempo to consider [default: 40]
    #[arg(long, allow_negative_numbers = true)]
    pub tmin: Option<i64>,

    /// Fastest tempo to consider [default: 208]
    #[arg(long, allow_negative_numbers = true)]
    pub tmax: Option<i64>,

    /// Tempo list file (one BPM or `start:end [step]` per line); overrides --tmin/--tmax
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Beats per counted group [default: one group per second]
    #[arg(short, long, allow_negative_numbers = true)]
    pub divisions: Option<i64>,

    /// Count from the start of the strip instead of restarting each step
    #[arg(short, long)]
    pub cumulative: bool,

    /// Exponent of the per-step error in the loss (1 = absolute, 2 = squared) [default: 2]
    #[arg(long)]
    pub loss_exponent: Option<f64>,

    /// Evaluate every tempo instead of pruning dominated ones
    #[arg(long)]
    pub exhaustive: bool,

    /// JSON config file; command-line flags take precedence
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the result as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Write target and achieved stops as JSON for plotting
    #[arg(long, value_name = "PATH")]
    pub plot_data: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Overlay explicitly given flags onto `config`.
    pub fn apply_to(&self, config: &mut StripConfig) {
        if let Some(base) = self.base {
            config.base = base;
        }
        if let Some(stepsize) = self.stepsize {
            config.stepsize = stepsize;
        }
        if let Some(numsteps) = self.numsteps {
            config.numsteps = numsteps;
        }
        if let Some(baseplace) = self.baseplace {
            config.baseplace = Some(baseplace);
        }
        if let Some(tmin) = self.tmin {
            config.tmin = tmin;
        }
        if let Some(tmax) = self.tmax {
            config.tmax = tmax;
        }
        if let Some(file) = &self.file {
            config.tempo_file = Some(file.clone());
        }
        if let Some(divisions) = self.divisions {
            config.divisions = Some(divisions);
        }
        if let Some(exponent) = self.loss_exponent {
            config.loss_exponent = exponent;
        }
        config.cumulative |= self.cumulative;
        config.exhaustive |= self.exhaustive;
    }
}
