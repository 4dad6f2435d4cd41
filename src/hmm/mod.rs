//! Trigram hidden Markov model: counting, interpolated estimates and Viterbi
//! decoding.

pub mod lexicon;
pub mod model;
pub mod ngram;
pub mod tagger;
pub mod viterbi;

pub use lexicon::{Lexicon, TagId, WordId};
pub use model::{HmmModel, Summary, Weights};
pub use ngram::SequenceStats;
pub use tagger::{Decoding, PosTagger, Tagger};
pub use viterbi::Viterbi;
