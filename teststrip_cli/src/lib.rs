// Darkroom test strip tempo calculator: configuration, tempo sources, and
// presentation around the `teststrip_core` search.
//
// Modules:
// - config.rs: `StripConfig` with defaults, JSON loading, validation
// - cli.rs: clap arguments and their overlay onto a `StripConfig`
// - tempo_list.rs: tempo range and tempo list file parsing
// - report.rs: count table, JSON rows, and plot data
//
// `run` is the whole pipeline minus terminal output: validate, gather
// candidates, search, post-process, and build the report. `main.rs` only
// parses arguments, sets up logging, and prints.

pub mod cli;
pub mod config;
pub mod report;
pub mod tempo_list;

use anyhow::Context;
use teststrip_core::StripError;
use teststrip_core::search::{search, search_exhaustive};
use teststrip_core::timing::{Subdivision, process};
use tracing::info;

use crate::config::StripConfig;
use crate::report::StripReport;
use crate::tempo_list::{read_tempo_file, tempo_range};

/// Candidate tempi from the config: the tempo file if set, else the range.
pub fn candidate_tempi(config: &StripConfig) -> anyhow::Result<Vec<u32>> {
    match &config.tempo_file {
        Some(path) => {
            info!("Using file '{}' for tempos", path.display());
            let list = read_tempo_file(path)?;
            if !list.skipped.is_empty() {
                info!(skipped = list.skipped.len(), "ignored malformed tempo lines");
            }
            Ok(list.tempi)
        }
        None => {
            let (tmin, tmax) = config.tempo_bounds()?;
            Ok(tempo_range(tmin, tmax))
        }
    }
}

/// Run the full calculation for `config`.
pub fn run(config: &StripConfig) -> anyhow::Result<StripReport> {
    let schedule = config.validate().context("invalid configuration")?;
    let loss = config.loss()?;

    let tempi = candidate_tempi(config)?;
    if tempi.is_empty() {
        return Err(StripError::EmptyCandidateSet.into());
    }

    let outcome = if config.exhaustive {
        search_exhaustive(&tempi, &schedule, &loss)?
    } else {
        search(&tempi, &schedule, &loss)?
    };

    let subdivision = Subdivision::resolve(outcome.winner.tempo, config.divisions)?;
    let timing = process(&outcome.winner, &schedule, config.count_mode(), subdivision);
    Ok(StripReport::new(&timing, &outcome, schedule.stepsize()))
}
