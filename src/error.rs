// src/error.rs
//
// Configuration errors only. Numerically degenerate physics (zero moments,
// negative temperatures, ...) is not an error: it propagates as inf/NaN.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlgError {
    #[error("site with index {0} already exists")]
    DuplicateSite(usize),

    #[error("neighbor link {from} -> {to} references unknown site {missing}")]
    DanglingNeighbor {
        from: usize,
        to: usize,
        missing: usize,
    },

    #[error("site indices must be 0..{num_sites} without gaps, found index {index}")]
    NonContiguousIndex { index: usize, num_sites: usize },

    #[error("invalid site {index}: {message}")]
    InvalidSite { index: usize, message: String },

    #[error("sweep list '{0}' must have at least one element")]
    EmptySweepList(String),

    #[error("unknown energy unit '{0}', expected 'adim', 'mev' or 'joule'")]
    UnknownEnergyUnit(String),

    #[error("invalid range {{start: {start}, final: {final_}, step: {step}}}: {message}")]
    InvalidRange {
        start: f64,
        final_: f64,
        step: f64,
        message: String,
    },

    #[error("initial state has {got} spins, lattice has {expected} sites")]
    InitialStateLength { got: usize, expected: usize },

    #[error("discard ({discard}) must not exceed the number of iterations ({num_iterations})")]
    InvalidDiscard {
        discard: usize,
        num_iterations: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LlgError>;
