// Tempo search: pick the candidate tempo whose beat lattice best realizes
// the target schedule.
//
// Candidates are visited from fastest to slowest. Each tempo that is not
// excluded is evaluated (lattice.rs assigns a beat count per target step,
// loss.rs scores the errors) and replaces the current winner only if its
// loss is strictly lower, so among equal scores the fastest tempo wins.
//
// Pruning: if a tempo T fails to beat the current winner, every proper
// divisor D of T (2 <= D < T) is excluded. Every beat instant of D is also
// a beat instant of T (beat M at D is beat (T / D) * M at T), so T's nearest
// lattice point to any target is at least as close as D's, and with a
// monotone loss D can never score below T. Visiting in descending order is
// what guarantees T is evaluated before its divisors. The exclusion set
// only grows.
//
// `search_exhaustive` evaluates every candidate without pruning (in
// parallel via rayon) and reduces in the same order with the same strict
// comparison, so it returns the same winner. It is the reference the
// pruned search is checked against.

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StripError;
use crate::lattice::{BeatAssignment, BeatLattice};
use crate::loss::Loss;
use crate::schedule::Schedule;

/// One evaluated tempo: its beat assignments and their loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub tempo: u32,
    pub assignments: Vec<BeatAssignment>,
    pub loss: f64,
}

impl Candidate {
    pub fn errors(&self) -> Vec<f64> {
        self.assignments.iter().map(BeatAssignment::error).collect()
    }

    pub fn achieved_stops(&self) -> Vec<f64> {
        self.assignments.iter().map(|a| a.stop).collect()
    }

    pub fn beat_counts(&self) -> Vec<u64> {
        self.assignments.iter().map(|a| a.beats).collect()
    }
}

/// Result of a search: the winner plus bookkeeping about how much work
/// pruning saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub winner: Candidate,
    /// Distinct tempi that were evaluated.
    pub evaluated: usize,
    /// Distinct candidate tempi skipped because they were excluded.
    pub pruned: usize,
}

/// Evaluate a single tempo against the schedule.
pub fn evaluate<L: Loss + ?Sized>(tempo: u32, schedule: &Schedule, loss: &L) -> Candidate {
    let lattice = BeatLattice::new(tempo, schedule.base());
    let assignments = lattice.assign(schedule);
    let errors: Vec<f64> = assignments.iter().map(BeatAssignment::error).collect();
    let loss = loss.reduce(&errors);
    Candidate {
        tempo,
        assignments,
        loss,
    }
}

/// Divisors of `n` other than 1 and `n`, ascending.
pub fn proper_divisors(n: u32) -> Vec<u32> {
    let mut low = Vec::new();
    let mut high = Vec::new();
    let mut d = 2_u32;
    while (d as u64) * (d as u64) <= n as u64 {
        if n % d == 0 {
            low.push(d);
            let pair = n / d;
            if pair != d {
                high.push(pair);
            }
        }
        d += 1;
    }
    low.extend(high.into_iter().rev());
    low
}

/// Deduplicate and sort descending, rejecting an empty or zero-bearing
/// candidate list.
fn descending_candidates(tempi: &[u32]) -> Result<Vec<u32>, StripError> {
    if tempi.is_empty() {
        return Err(StripError::EmptyCandidateSet);
    }
    if tempi.contains(&0) {
        return Err(StripError::InvalidConfiguration(
            "tempo candidates must be positive".into(),
        ));
    }
    let mut order = tempi.to_vec();
    order.sort_unstable_by(|a, b| b.cmp(a));
    order.dedup();
    Ok(order)
}

fn improves(candidate: &Candidate, best: Option<&Candidate>) -> bool {
    best.is_none_or(|b| candidate.loss < b.loss)
}

/// Find the tempo with minimum loss, pruning divisors of non-improving
/// tempi.
pub fn search<L: Loss + ?Sized>(
    tempi: &[u32],
    schedule: &Schedule,
    loss: &L,
) -> Result<SearchOutcome, StripError> {
    let order = descending_candidates(tempi)?;

    let mut excluded: FxHashSet<u32> = FxHashSet::default();
    let mut best: Option<Candidate> = None;
    let mut evaluated = 0;
    let mut pruned = 0;

    for tempo in order {
        if excluded.contains(&tempo) {
            debug!(tempo, "skipping excluded tempo");
            pruned += 1;
            continue;
        }

        let candidate = evaluate(tempo, schedule, loss);
        evaluated += 1;
        debug!(tempo, loss = candidate.loss, "evaluated tempo");

        if improves(&candidate, best.as_ref()) {
            best = Some(candidate);
        } else {
            excluded.extend(proper_divisors(tempo));
        }
    }

    let winner = best.ok_or(StripError::EmptyCandidateSet)?;
    info!(
        tempo = winner.tempo,
        loss = winner.loss,
        evaluated,
        pruned,
        "tempo search finished"
    );
    Ok(SearchOutcome {
        winner,
        evaluated,
        pruned,
    })
}

/// Evaluate every candidate (no pruning) and return the same winner
/// `search` would.
pub fn search_exhaustive<L: Loss + Sync + ?Sized>(
    tempi: &[u32],
    schedule: &Schedule,
    loss: &L,
) -> Result<SearchOutcome, StripError> {
    let order = descending_candidates(tempi)?;

    let candidates: Vec<Candidate> = order
        .par_iter()
        .map(|&tempo| evaluate(tempo, schedule, loss))
        .collect();
    let evaluated = candidates.len();

    let mut best: Option<Candidate> = None;
    for candidate in candidates {
        if improves(&candidate, best.as_ref()) {
            best = Some(candidate);
        }
    }

    let winner = best.ok_or(StripError::EmptyCandidateSet)?;
    info!(
        tempo = winner.tempo,
        loss = winner.loss,
        evaluated,
        "exhaustive tempo search finished"
    );
    Ok(SearchOutcome {
        winner,
        evaluated,
        pruned: 0,
    })
}
