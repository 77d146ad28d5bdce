// Beat lattice evaluation for a single tempo.
//
// At `tempo` BPM the achievable exposure times are the instants
// `M * 60 / tempo` seconds for integer beat counts `M >= 1`. In stop space
// (relative to the base exposure) that is `log2(M) + u` with
// `u = log2(60 / (base * tempo))`, so the unconstrained beat count hitting
// a target stop `s` exactly is `M* = 2^(s - u)`. The nearest achievable
// count in log space is always `floor(M*)` or `ceil(M*)`, clamped to 1
// since beat 0 has no defined stop.
//
// Achieved stops are derived from the seconds value `M * 60 / tempo`,
// which is a correctly rounded quotient of two exact integers. A beat
// instant shared by a tempo and one of its divisors (beat `M` at `D` is
// beat `k * M` at `k * D`) therefore yields a bit-identical stop at both
// tempi, which keeps the divisor pruning in search.rs exact in floating
// point. Candidate selection compares those same stop values.
//
// Every target step is evaluated independently; there is no state carried
// between steps.

use serde::{Deserialize, Serialize};

use crate::schedule::Schedule;

/// The beat count chosen for one target step at one tempo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeatAssignment {
    /// Elapsed beats since the start of the exposure (always >= 1).
    pub beats: u64,
    /// Elapsed time in seconds (`beats * 60 / tempo`).
    pub seconds: f64,
    /// Achieved stop relative to the base exposure.
    pub stop: f64,
    /// The stop this assignment was aiming for.
    pub target: f64,
}

impl BeatAssignment {
    /// Achieved minus target stop. Positive means overexposed.
    pub fn error(&self) -> f64 {
        self.stop - self.target
    }
}

/// The set of exposure instants reachable at one tempo.
#[derive(Debug, Clone, Copy)]
pub struct BeatLattice {
    tempo: u32,
    base: f64,
    offset: f64,
}

impl BeatLattice {
    pub fn new(tempo: u32, base: f64) -> Self {
        let offset = (60.0 / (base * tempo as f64)).log2();
        BeatLattice {
            tempo,
            base,
            offset,
        }
    }

    pub fn tempo(&self) -> u32 {
        self.tempo
    }

    /// Log-space offset `u`: `stop = log2(beats) + u`.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn seconds_of(&self, beats: u64) -> f64 {
        (beats as f64 * 60.0) / self.tempo as f64
    }

    pub fn stop_of(&self, beats: u64) -> f64 {
        (self.seconds_of(beats) / self.base).log2()
    }

    /// Real-valued beat count that would land exactly on `target_stop`.
    pub fn continuous_beats(&self, target_stop: f64) -> f64 {
        (target_stop - self.offset).exp2()
    }

    /// Nearest achievable beat count to `target_stop`, in log space.
    pub fn nearest(&self, target_stop: f64) -> BeatAssignment {
        let exact = self.continuous_beats(target_stop);
        // Saturating float-to-int casts keep absurd targets finite.
        let lower = (exact.floor() as u64).max(1);
        let upper = (exact.ceil() as u64).max(1);

        let lower_stop = self.stop_of(lower);
        let upper_stop = self.stop_of(upper);
        let lower_err = (lower_stop - target_stop).powi(2);
        let upper_err = (upper_stop - target_stop).powi(2);

        let (beats, stop) = if upper_err < lower_err {
            (upper, upper_stop)
        } else {
            (lower, lower_stop)
        };

        BeatAssignment {
            beats,
            seconds: self.seconds_of(beats),
            stop,
            target: target_stop,
        }
    }

    /// Assign a beat count to every step of `schedule`, in strip order.
    pub fn assign(&self, schedule: &Schedule) -> Vec<BeatAssignment> {
        schedule
            .steps()
            .iter()
            .map(|step| self.nearest(step.stop))
            .collect()
    }
}
