use std::collections::HashMap;

use super::lexicon::TagId;

/// Tag bigram and trigram counts, including windows that start with the
/// sentence boundary.
#[derive(Debug, Default, Clone)]
pub struct SequenceStats {
    bigrams: HashMap<(TagId, TagId), u64>,
    trigrams: HashMap<(TagId, TagId, TagId), u64>,
    sentences: u64,
}

impl SequenceStats {
    pub fn record_bigram(&mut self, a: TagId, b: TagId) {
        *self.bigrams.entry((a, b)).or_default() += 1;
    }

    pub fn record_trigram(&mut self, a: TagId, b: TagId, c: TagId) {
        *self.trigrams.entry((a, b, c)).or_default() += 1;
    }

    /// Counts the windows of one sentence's tag sequence:
    ///
    /// - bigrams `(<s>, <s>)`, `(<s>, t1)`, then `(t_i, t_i+1)`;
    /// - trigrams `(<s>, <s>, t1)`, `(<s>, t1, t2)` when `n >= 2`, then
    ///   `(t_i, t_i+1, t_i+2)`.
    ///
    /// An empty sequence is not a sentence and records nothing.
    pub fn record_sentence(&mut self, tags: &[TagId]) {
        let b = TagId::BOUNDARY;
        let Some(&first) = tags.first() else {
            return;
        };
        self.sentences += 1;

        self.record_bigram(b, b);
        self.record_bigram(b, first);
        for w in tags.windows(2) {
            self.record_bigram(w[0], w[1]);
        }

        self.record_trigram(b, b, first);
        if let Some(&second) = tags.get(1) {
            self.record_trigram(b, first, second);
        }
        for w in tags.windows(3) {
            self.record_trigram(w[0], w[1], w[2]);
        }
    }

    #[inline]
    pub fn bigram(&self, a: TagId, b: TagId) -> u64 {
        self.bigrams.get(&(a, b)).copied().unwrap_or_default()
    }

    #[inline]
    pub fn trigram(&self, a: TagId, b: TagId, c: TagId) -> u64 {
        self.trigrams.get(&(a, b, c)).copied().unwrap_or_default()
    }

    /// Number of non-empty sentences recorded.
    pub fn sentences(&self) -> u64 {
        self.sentences
    }

    pub fn bigrams(&self) -> impl Iterator<Item = ((TagId, TagId), u64)> + '_ {
        self.bigrams.iter().map(|(k, v)| (*k, *v))
    }

    pub fn trigrams(&self) -> impl Iterator<Item = ((TagId, TagId, TagId), u64)> + '_ {
        self.trigrams.iter().map(|(k, v)| (*k, *v))
    }

    pub fn num_bigrams(&self) -> usize {
        self.bigrams.len()
    }

    pub fn num_trigrams(&self) -> usize {
        self.trigrams.len()
    }

    pub fn clear(&mut self) {
        self.bigrams.clear();
        self.trigrams.clear();
        self.sentences = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const B: TagId = TagId::BOUNDARY;

    #[test]
    fn windows_of_long_sentence() {
        let (x, y, z) = (TagId(1), TagId(2), TagId(3));
        let mut stats = SequenceStats::default();
        stats.record_sentence(&[x, y, z, x]);
        assert_eq!(stats.sentences(), 1);
        assert_eq!(stats.bigram(B, B), 1);
        assert_eq!(stats.bigram(B, x), 1);
        assert_eq!(stats.bigram(x, y), 1);
        assert_eq!(stats.bigram(y, z), 1);
        assert_eq!(stats.bigram(z, x), 1);
        assert_eq!(stats.num_bigrams(), 5);
        assert_eq!(stats.trigram(B, B, x), 1);
        assert_eq!(stats.trigram(B, x, y), 1);
        assert_eq!(stats.trigram(x, y, z), 1);
        assert_eq!(stats.trigram(y, z, x), 1);
        assert_eq!(stats.num_trigrams(), 4);
    }

    #[test]
    fn single_tag_sentence() {
        let x = TagId(1);
        let mut stats = SequenceStats::default();
        stats.record_sentence(&[x]);
        stats.record_sentence(&[x]);
        assert_eq!(stats.bigram(B, B), 2);
        assert_eq!(stats.bigram(B, x), 2);
        assert_eq!(stats.trigram(B, B, x), 2);
        assert_eq!(stats.num_trigrams(), 1);
        assert_eq!(stats.sentences(), 2);
    }

    #[test]
    fn empty_sentence_is_ignored() {
        let mut stats = SequenceStats::default();
        stats.record_sentence(&[]);
        assert_eq!(stats.sentences(), 0);
        assert_eq!(stats.num_bigrams(), 0);
    }

    #[test]
    fn keys_are_ordered() {
        let (x, y) = (TagId(1), TagId(2));
        let mut stats = SequenceStats::default();
        stats.record_bigram(x, y);
        assert_eq!(stats.bigram(y, x), 0);
        stats.clear();
        assert_eq!(stats.bigram(x, y), 0);
    }
}
