// Test strip tempo search.
//
// Picks an integer metronome tempo whose beats best realize a darkroom test
// strip: a row of exposures spaced evenly in stops around a base exposure
// time. Exposures are timed by counting metronome beats, so every exposure
// must be a whole number of beats; the search finds the tempo whose beat
// lattice lands closest, in stop space, to the whole target row.
//
// Architecture:
// - schedule.rs: Target stop sequence from (base, stepsize, numsteps, baseplace)
// - lattice.rs: Nearest achievable beat count per target stop at one tempo
// - loss.rs: Reduction of per-step stop errors to one score (L1/L2/Lp)
// - search.rs: Descending tempo search with divisor pruning, plus an
//   unpruned parallel reference search
// - timing.rs: Cumulative/incremental counts and beat subdivision of the
//   winner for display
// - error.rs: Fatal error taxonomy
//
// Everything here is pure and deterministic; file and terminal I/O live in
// `teststrip_cli`.

pub mod error;
pub mod lattice;
pub mod loss;
pub mod schedule;
pub mod search;
pub mod timing;

pub use error::StripError;
