// Post-processing of the winning tempo into countable timings.
//
// Two independent transformations of the winner's beat counts:
//
// - Count mode. Cumulative counts are beats elapsed since the start of
//   the strip, for a strip exposed with one continuous count. Incremental
//   (the default, "local") counts are the beats added by each step, i.e.
//   the difference from the previous step's absolute count; the first step
//   is unchanged.
// - Subdivision. At fast tempi counting every beat is impractical, so
//   beats are grouped by a divisor and each count is reported as whole
//   groups plus leftover beats. The default divisor is one group per
//   second (`max(1, tempo / 60)`), but any positive override is allowed.
//
// `process` never mutates the search result; it builds a fresh
// `StripTiming`. Only the count column changes; seconds, stops and errors
// come straight from the winner.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StripError;
use crate::lattice::BeatAssignment;
use crate::schedule::{Schedule, TargetStep};
use crate::search::Candidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CountMode {
    /// Beats since the start of the strip.
    Cumulative,
    /// Beats added by each step.
    #[default]
    Incremental,
}

/// Per-step differences of absolute counts. `cumulative` must be
/// non-decreasing, as beat counts along a strip always are; only then does
/// `to_cumulative` invert this. Debug builds panic on a decrease.
pub fn to_incremental(cumulative: &[u64]) -> Vec<u64> {
    debug_assert!(
        cumulative.windows(2).all(|w| w[0] <= w[1]),
        "absolute counts must be non-decreasing: {cumulative:?}"
    );
    let mut previous = 0;
    cumulative
        .iter()
        .map(|&n| {
            let step = n.saturating_sub(previous);
            previous = n;
            step
        })
        .collect()
}

/// Prefix sums of per-step counts.
pub fn to_cumulative(incremental: &[u64]) -> Vec<u64> {
    incremental
        .iter()
        .scan(0_u64, |total, &n| {
            *total += n;
            Some(*total)
        })
        .collect()
}

/// English ordinal suffix: 1st, 2nd, 3rd, 4th, 11th, 12th, 13th, 21st, ...
pub fn ordinal_suffix(n: u32) -> &'static str {
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// How many beats make up one counted unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subdivision {
    divisor: u32,
}

impl Subdivision {
    /// Default policy: count roughly once per second.
    pub fn for_tempo(tempo: u32) -> Self {
        Subdivision {
            divisor: (tempo / 60).max(1),
        }
    }

    /// An explicit divisor; must be a positive integer.
    pub fn explicit(divisor: i64) -> Result<Self, StripError> {
        match u32::try_from(divisor) {
            Ok(d) if d > 0 => Ok(Subdivision { divisor: d }),
            _ => Err(StripError::InvalidSubdivision(divisor)),
        }
    }

    /// The override if given, else the per-tempo default.
    pub fn resolve(tempo: u32, divisions: Option<i64>) -> Result<Self, StripError> {
        match divisions {
            Some(d) => Self::explicit(d),
            None => Ok(Self::for_tempo(tempo)),
        }
    }

    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    pub fn group(&self, beats: u64) -> GroupedCount {
        GroupedCount {
            beats,
            divisor: self.divisor,
        }
    }

    /// Human-readable counting instruction.
    pub fn notice(&self) -> String {
        if self.divisor == 1 {
            "Count every beat".to_string()
        } else {
            format!(
                "Count every {}{} beat",
                self.divisor,
                ordinal_suffix(self.divisor)
            )
        }
    }
}

/// A beat count expressed in groups of `divisor` beats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedCount {
    pub beats: u64,
    pub divisor: u32,
}

impl GroupedCount {
    /// Count in groups, possibly fractional.
    pub fn value(&self) -> f64 {
        self.beats as f64 / self.divisor as f64
    }

    pub fn whole(&self) -> u64 {
        self.beats / self.divisor as u64
    }

    pub fn remainder(&self) -> u64 {
        self.beats % self.divisor as u64
    }
}

impl fmt::Display for GroupedCount {
    /// `7` when the count is whole, `7+2/4` otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.remainder() == 0 {
            write!(f, "{}", self.whole())
        } else {
            write!(f, "{}+{}/{}", self.whole(), self.remainder(), self.divisor)
        }
    }
}

/// One display-ready step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedStep {
    pub count: GroupedCount,
    pub assignment: BeatAssignment,
    pub target: TargetStep,
    pub target_seconds: f64,
}

/// The winner transformed for counting at the darkroom timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripTiming {
    pub tempo: u32,
    pub loss: f64,
    pub mode: CountMode,
    pub subdivision: Subdivision,
    pub steps: Vec<TimedStep>,
}

impl StripTiming {
    pub fn target_stops(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.target.stop).collect()
    }

    pub fn achieved_stops(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.assignment.stop).collect()
    }

    pub fn notice(&self) -> String {
        self.subdivision.notice()
    }
}

/// Build display timings from a search winner.
pub fn process(
    winner: &Candidate,
    schedule: &Schedule,
    mode: CountMode,
    subdivision: Subdivision,
) -> StripTiming {
    let absolute = winner.beat_counts();
    let counts = match mode {
        CountMode::Cumulative => absolute,
        CountMode::Incremental => to_incremental(&absolute),
    };

    let steps = counts
        .into_iter()
        .zip(&winner.assignments)
        .zip(schedule.steps().iter().zip(schedule.target_seconds()))
        .map(|((beats, assignment), (target, target_seconds))| TimedStep {
            count: subdivision.group(beats),
            assignment: *assignment,
            target: *target,
            target_seconds,
        })
        .collect();

    StripTiming {
        tempo: winner.tempo,
        loss: winner.loss,
        mode,
        subdivision,
        steps,
    }
}
