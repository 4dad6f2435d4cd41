use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::{
    lexicon::{Lexicon, TagId, WordId},
    ngram::SequenceStats,
};
use crate::{dataset::Sentence, Error, Result};

/// Linear interpolation weights: `lambda1` for the trigram estimate,
/// `lambda2` for the bigram estimate and `lambda3` for the unigram estimate.
/// Always stored normalized to sum 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub lambda1: f64,
    pub lambda2: f64,
    pub lambda3: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self { lambda1: 1.0 / 3.0, lambda2: 1.0 / 3.0, lambda3: 1.0 / 3.0 }
    }
}

impl Weights {
    /// Builds normalized weights; the inputs need not sum to 1.
    pub fn new(lambda1: f64, lambda2: f64, lambda3: f64) -> Result<Self> {
        let valid = |x: f64| x.is_finite() && x >= 0.0;
        let total = lambda1 + lambda2 + lambda3;
        if !(valid(lambda1) && valid(lambda2) && valid(lambda3)) || total <= 0.0 {
            return Err(Error::InvalidWeights(lambda1, lambda2, lambda3));
        }
        Ok(Self { lambda1: lambda1 / total, lambda2: lambda2 / total, lambda3: lambda3 / total })
    }
}

#[inline]
fn ratio(n: u64, d: u64) -> f64 {
    if n == 0 || d == 0 {
        0.0
    } else {
        n as f64 / d as f64
    }
}

#[inline]
fn normalize(x: f64, total: f64) -> f64 {
    if total > 0.0 {
        x / total
    } else {
        0.0
    }
}

/// Counts gathered from training plus the interpolation weights. Probabilities
/// are derived from the counts on every call; there is no compile step.
#[derive(Debug, Clone, Default)]
pub struct HmmModel {
    lexicon: Lexicon,
    stats: SequenceStats,
    num_tokens: u64,
    weights: Weights,
}

impl HmmModel {
    pub fn new(weights: Weights) -> Self {
        Self { weights, ..Default::default() }
    }

    /// Adds one annotated sentence to the counts.
    pub fn add_sentence(&mut self, sentence: &Sentence) {
        let mut tags = Vec::with_capacity(sentence.len());
        for (word, tag) in sentence.pairs() {
            let w = self.lexicon.intern_word(word);
            let t = self.lexicon.intern_tag(tag);
            self.lexicon.record(w, t);
            tags.push(t);
        }
        self.num_tokens += tags.len() as u64;
        self.stats.record_sentence(&tags);
    }

    /// Drops every count. Weights are kept.
    pub fn clear(&mut self) {
        self.lexicon.clear();
        self.stats.clear();
        self.num_tokens = 0;
    }

    pub fn set_weights(&mut self, weights: Weights) {
        self.weights = weights;
    }

    pub fn weights(&self) -> Weights {
        self.weights
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn stats(&self) -> &SequenceStats {
        &self.stats
    }

    pub fn num_tokens(&self) -> u64 {
        self.num_tokens
    }

    pub fn num_sentences(&self) -> u64 {
        self.stats.sentences()
    }

    /// Occurrences of `t` as a conditioning context. The boundary never labels
    /// a word, so it is normalized by the number of sentences instead.
    #[inline]
    fn context_count(&self, t: TagId) -> u64 {
        if t.is_boundary() {
            self.stats.sentences()
        } else {
            self.lexicon.tag(t).total()
        }
    }

    #[inline]
    fn unigram(&self, t: TagId) -> f64 {
        ratio(self.lexicon.tag(t).total(), self.num_tokens)
    }

    /// P(word | tag)
    pub fn p_word_given_tag(&self, word: WordId, tag: TagId) -> f64 {
        let entry = self.lexicon.tag(tag);
        ratio(entry.count(word), entry.total())
    }

    /// P(tag | word)
    pub fn p_tag_given_word(&self, tag: TagId, word: WordId) -> f64 {
        let entry = self.lexicon.word(word);
        ratio(entry.count(tag), entry.total())
    }

    /// P(t2 | t1) = (l2 * C(t1,t2)/C(t1) + l3 * C(t2)/N) / (l2 + l3)
    pub fn p_bigram(&self, t1: Option<TagId>, t2: Option<TagId>) -> f64 {
        let Some(t2) = t2 else {
            return 0.0;
        };
        let Weights { lambda2, lambda3, .. } = self.weights;
        let bigram = t1
            .map(|t1| lambda2 * ratio(self.stats.bigram(t1, t2), self.context_count(t1)))
            .unwrap_or_default();
        let unigram = lambda3 * self.unigram(t2);
        normalize(bigram + unigram, lambda2 + lambda3)
    }

    /// P(t3 | t1, t2) =
    ///     (l1 * C(t1,t2,t3)/C(t1,t2) + l2 * C(t2,t3)/C(t2) + l3 * C(t3)/N) / (l1 + l2 + l3)
    ///
    /// When `t2` is the boundary, `C(t2)` is the number of sentences.
    pub fn p_trigram(&self, t1: Option<TagId>, t2: Option<TagId>, t3: Option<TagId>) -> f64 {
        let Some(t3) = t3 else {
            return 0.0;
        };
        let Weights { lambda1, lambda2, lambda3 } = self.weights;
        let mut trigram = 0.0;
        let mut bigram = 0.0;
        if let Some(t2) = t2 {
            if let Some(t1) = t1 {
                let context = self.stats.bigram(t1, t2);
                trigram = lambda1 * ratio(self.stats.trigram(t1, t2, t3), context);
            }
            bigram = lambda2 * ratio(self.stats.bigram(t2, t3), self.context_count(t2));
        }
        let unigram = lambda3 * self.unigram(t3);
        normalize(trigram + bigram + unigram, lambda1 + lambda2 + lambda3)
    }

    /// P(word | tag) by string; 0 when either is unknown.
    pub fn word_given_tag(&self, word: &str, tag: &str) -> f64 {
        match (self.lexicon.find_word(word), self.lexicon.find_tag(tag)) {
            (Some(w), Some(t)) => self.p_word_given_tag(w, t),
            _ => 0.0,
        }
    }

    /// P(tag | word) by string; 0 when either is unknown.
    pub fn tag_given_word(&self, tag: &str, word: &str) -> f64 {
        match (self.lexicon.find_word(word), self.lexicon.find_tag(tag)) {
            (Some(w), Some(t)) => self.p_tag_given_word(t, w),
            _ => 0.0,
        }
    }

    pub fn bigram(&self, t1: &str, t2: &str) -> f64 {
        self.p_bigram(self.lexicon.find_tag(t1), self.lexicon.find_tag(t2))
    }

    pub fn trigram(&self, t1: &str, t2: &str, t3: &str) -> f64 {
        let lex = &self.lexicon;
        self.p_trigram(lex.find_tag(t1), lex.find_tag(t2), lex.find_tag(t3))
    }

    fn display_tag(&self, t: TagId) -> &str {
        if t.is_boundary() {
            "<s>"
        } else {
            self.lexicon.tag_str(t)
        }
    }

    /// Every observed tag bigram rendered as `a/b`, sorted.
    pub fn bigram_list(&self) -> Vec<String> {
        let mut v: Vec<String> = self
            .stats
            .bigrams()
            .map(|((a, b), _)| format!("{}/{}", self.display_tag(a), self.display_tag(b)))
            .collect();
        v.sort_unstable();
        v
    }

    /// Every observed tag trigram rendered as `a/b/c`, sorted.
    pub fn trigram_list(&self) -> Vec<String> {
        let mut v: Vec<String> = self
            .stats
            .trigrams()
            .map(|((a, b, c), _)| {
                format!("{}/{}/{}", self.display_tag(a), self.display_tag(b), self.display_tag(c))
            })
            .collect();
        v.sort_unstable();
        v
    }

    /// Words labelled with `tag`, most frequent first.
    pub fn words_with_tag(&self, tag: &str) -> Vec<(&str, u64)> {
        let Some(t) = self.lexicon.find_tag(tag) else {
            return Vec::new();
        };
        let mut v: Vec<(&str, u64)> = self
            .lexicon
            .tag(t)
            .iter()
            .map(|(w, c)| (self.lexicon.word_str(w), c))
            .collect();
        v.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        v
    }

    pub fn summary(&self) -> Summary {
        Summary {
            tokens: self.num_tokens,
            words: self.lexicon.num_words(),
            tags: self.lexicon.num_tags(),
            sentences: self.stats.sentences(),
            bigrams: self.stats.num_bigrams(),
            trigrams: self.stats.num_trigrams(),
        }
    }
}

/// Size of a trained model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub tokens: u64,
    pub words: usize,
    pub tags: usize,
    pub sentences: u64,
    pub bigrams: usize,
    pub trigrams: usize,
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Training set info:")?;
        writeln!(f, "\tTokens: {}", self.tokens)?;
        writeln!(f, "\tDistinct words: {}", self.words)?;
        writeln!(f, "\tDistinct tags: {}", self.tags)?;
        writeln!(f, "\tSentences: {}", self.sentences)?;
        writeln!(f, "\tTag bigrams: {}", self.bigrams)?;
        write!(f, "\tTag trigrams: {}", self.trigrams)
    }
}
