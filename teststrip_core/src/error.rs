// Error taxonomy for the tempo search core.
//
// Every variant is fatal to a run: configuration and candidate-set errors
// are raised before the search starts, and a subdivision error is raised
// before any output is produced. Per-line tempo-list problems are not
// represented here; they are recovered where the list is parsed (see
// `teststrip_cli::tempo_list`).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StripError {
    /// A configuration value is outside its domain (base, stepsize,
    /// numsteps, baseplace, tempo bounds, divisions, loss exponent).
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Tempo candidate set is empty")]
    EmptyCandidateSet,

    #[error("Invalid subdivision {0}: must be a positive integer")]
    InvalidSubdivision(i64),
}
