//! Definition of errors.

use std::io;

/// A specialized Result type for this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The sentence contains a word that was never seen in training.
    #[error("Sentence contains new word \"{0}\". Cannot tag it. Please train me with it first.")]
    UnknownWord(String),

    /// The sentence tokenizes to zero words.
    #[error("The sentence contains no word.")]
    EmptySentence,

    /// Backtracking found no surviving candidate for a position.
    #[error("inconsistent lattice: no surviving candidate for position {position}")]
    Lattice { position: usize },

    #[error("interpolation weights ({0}, {1}, {2}) must be non-negative with a positive sum")]
    InvalidWeights(f64, f64, f64),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
