//! Part-of-speech tagging with a trigram hidden Markov model.
//!
//! A [`PosTagger`] is trained on `word/TAG` annotated text. Emission and
//! transition probabilities are estimated from the accumulated counts with
//! linear interpolation of tri-, bi- and unigram tag models, and new sentences
//! are tagged with a Viterbi search over a trigram lattice.
//!
//! ```
//! use hmmtag::PosTagger;
//!
//! let mut tagger = PosTagger::default();
//! tagger.train("He/PP is/BEZ a/AT good/JJ man/NN ./.");
//! let decoding = tagger.decode_sentence("He is a good man .");
//! assert!(decoding.success);
//! assert_eq!(decoding.tagged, "He/pp is/bez a/at good/jj man/nn ./.");
//! ```

pub mod config;
pub mod dataset;
mod errors;
pub mod evaluation;
pub mod hmm;
pub mod quark;
pub mod tagset;

pub use config::Config;
pub use dataset::{Dataset, Sentence};
pub use errors::{Error, Result};
pub use evaluation::Evaluation;
pub use hmm::{Decoding, HmmModel, PosTagger, Tagger, Weights};
