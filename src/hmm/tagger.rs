use std::path::Path;

use serde::Serialize;

use super::{
    lexicon::WordId,
    model::{HmmModel, Weights},
    viterbi::Viterbi,
};
use crate::{
    dataset::{split_token, Dataset, Sentence},
    Error, Evaluation, Result,
};

/// Assigns tags to a tokenized sentence.
pub trait Tagger {
    fn tag_words(&self, words: &[&str]) -> Result<Vec<String>>;
}

impl Tagger for HmmModel {
    fn tag_words(&self, words: &[&str]) -> Result<Vec<String>> {
        let lex = self.lexicon();
        let ids = words
            .iter()
            .map(|w| lex.find_word(w).ok_or_else(|| Error::UnknownWord(w.to_string())))
            .collect::<Result<Vec<WordId>>>()?;
        let tags = Viterbi::new(self).decode(&ids)?;
        Ok(tags.into_iter().map(|t| lex.tag_str(t).to_string()).collect())
    }
}

/// Outcome of tagging one sentence. On failure `tagged` and `tags` are empty
/// and `message` says why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decoding {
    pub success: bool,
    pub message: String,
    pub tagged: String,
    pub tags: Vec<String>,
}

impl Decoding {
    fn new(words: &[&str], tags: Vec<String>) -> Self {
        let tagged = words
            .iter()
            .zip(&tags)
            .map(|(w, t)| format!("{w}/{t}"))
            .collect::<Vec<_>>()
            .join(" ");
        Self { success: true, message: String::new(), tagged, tags }
    }

    fn failure(err: &Error) -> Self {
        Self { success: false, message: err.to_string(), tagged: String::new(), tags: Vec::new() }
    }
}

/// Whether a predicted `(word, tag)` matches a gold `word/tag` token. Tags
/// compare case-insensitively.
fn matches_gold(word: &str, tag: &str, gold: &str) -> bool {
    split_token(gold).is_some_and(|(w, t)| w == word && t.eq_ignore_ascii_case(tag))
}

/// Trains a trigram model from annotated text and tags new sentences with it.
#[derive(Debug, Clone, Default)]
pub struct PosTagger {
    model: HmmModel,
    sentences: Vec<Sentence>,
}

impl PosTagger {
    pub fn new(weights: Weights) -> Self {
        Self { model: HmmModel::new(weights), sentences: Vec::new() }
    }

    /// Adds every annotated line of `text`; returns the number of sentences.
    /// Repeated calls accumulate.
    pub fn train(&mut self, text: &str) -> usize {
        let before = self.sentences.len();
        for seq in text.lines().filter_map(Sentence::parse) {
            self.add_sentence(seq);
        }
        self.sentences.len() - before
    }

    pub fn train_all<I, S>(&mut self, sources: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        sources.into_iter().map(|s| self.train(s.as_ref())).sum()
    }

    pub fn train_dataset(&mut self, ds: &Dataset) -> usize {
        for seq in ds {
            self.add_sentence(seq.clone());
        }
        ds.len()
    }

    /// Trains on a corpus file or folder. The corpus is read completely first,
    /// so an I/O error leaves the model unchanged.
    pub fn train_path(&mut self, path: &Path) -> Result<usize> {
        let mut ds = Dataset::default();
        ds.read_path(path)?;
        let n = self.train_dataset(&ds);
        log::info!("trained {n} sentences from {}", path.display());
        Ok(n)
    }

    fn add_sentence(&mut self, seq: Sentence) {
        self.model.add_sentence(&seq);
        self.sentences.push(seq);
    }

    /// Clears every count and stored sentence.
    pub fn reset(&mut self) {
        self.model.clear();
        self.sentences.clear();
    }

    pub fn set_weights(&mut self, lambda1: f64, lambda2: f64, lambda3: f64) -> Result<()> {
        self.model.set_weights(Weights::new(lambda1, lambda2, lambda3)?);
        Ok(())
    }

    pub fn model(&self) -> &HmmModel {
        &self.model
    }

    /// Training sentences in the order they were added.
    pub fn training_sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Tags a whitespace separated sentence, failing on empty input or on the
    /// first word unseen in training.
    pub fn tag(&self, text: &str) -> Result<Vec<String>> {
        let words: Vec<&str> = text.split_whitespace().collect();
        self.model.tag_words(&words)
    }

    /// Tags a sentence and renders it as `word/tag` tokens.
    pub fn decode_sentence(&self, text: &str) -> Decoding {
        let words: Vec<&str> = text.split_whitespace().collect();
        match self.model.tag_words(&words) {
            Ok(tags) => Decoding::new(&words, tags),
            Err(err) => {
                log::debug!("cannot tag {text:?}: {err}");
                Decoding::failure(&err)
            }
        }
    }

    pub fn word_given_tag(&self, word: &str, tag: &str) -> f64 {
        self.model.word_given_tag(word, tag)
    }

    pub fn tag_given_word(&self, tag: &str, word: &str) -> f64 {
        self.model.tag_given_word(tag, word)
    }

    pub fn bigram(&self, t1: &str, t2: &str) -> f64 {
        self.model.bigram(t1, t2)
    }

    pub fn trigram(&self, t1: &str, t2: &str, t3: &str) -> f64 {
        self.model.trigram(t1, t2, t3)
    }

    /// Whether `sentence` decodes exactly to the `word/tag` tokens of `gold`.
    pub fn sentence_level_accuracy(&self, sentence: &str, gold: &str) -> bool {
        let decoding = self.decode_sentence(sentence);
        let gold: Vec<&str> = gold.split_whitespace().collect();
        let words: Vec<&str> = sentence.split_whitespace().collect();
        decoding.success
            && gold.len() == decoding.tags.len()
            && words
                .iter()
                .zip(&decoding.tags)
                .zip(&gold)
                .all(|((w, t), g)| matches_gold(w, t, g))
    }

    /// `(correct, incorrect)` token counts of decoding `sentence` against
    /// `gold`. A failed decode counts every gold token as incorrect.
    pub fn word_level_accuracy(&self, sentence: &str, gold: &str) -> (u64, u64) {
        let decoding = self.decode_sentence(sentence);
        let words: Vec<&str> = sentence.split_whitespace().collect();
        let mut correct = 0;
        let mut incorrect = 0;
        for (i, g) in gold.split_whitespace().enumerate() {
            let hit = match (words.get(i), decoding.tags.get(i)) {
                (Some(w), Some(t)) => matches_gold(w, t, g),
                _ => false,
            };
            if hit {
                correct += 1;
            } else {
                incorrect += 1;
            }
        }
        (correct, incorrect)
    }

    /// Decodes every sentence and scores it against its gold tags.
    pub fn evaluate<'a, I>(&self, sentences: I) -> Evaluation
    where
        I: IntoIterator<Item = &'a Sentence>,
    {
        let mut evaluation = Evaluation::default();
        for (i, seq) in sentences.into_iter().enumerate() {
            let words: Vec<&str> = seq.words.iter().map(String::as_str).collect();
            match self.model.tag_words(&words) {
                Ok(prediction) => evaluation.accumulate(&seq.tags, &prediction),
                Err(err) => {
                    log::debug!("sentence #{i}: {err}");
                    evaluation.accumulate_failure(&seq.tags);
                }
            }
            if (i + 1) % 1000 == 0 {
                let (correct, total) = evaluation.sequences();
                log::debug!("evaluated {} sentences ({correct}/{total} correct)", i + 1);
            }
        }
        let est = evaluation.evaluate();
        log::info!(
            "item accuracy: {:.4}, sequence accuracy: {:.4}",
            est.item_accuracy,
            est.sequence_accuracy
        );
        evaluation
    }

    /// Re-decodes the training sentences against their own tags.
    pub fn evaluate_training_set(&self) -> Evaluation {
        self.evaluate(&self.sentences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_renders_pairs() {
        let mut tagger = PosTagger::default();
        assert_eq!(tagger.train("He/PP is/BEZ a/AT good/JJ man/NN ./."), 1);
        let d = tagger.decode_sentence("He is a good man .");
        assert!(d.success, "{}", d.message);
        assert_eq!(d.tagged, "He/pp is/bez a/at good/jj man/nn ./.");
    }

    #[test]
    fn failures_carry_messages() {
        let mut tagger = PosTagger::default();
        tagger.train("Go/VB");
        let d = tagger.decode_sentence("Go now");
        assert!(!d.success);
        assert!(d.message.contains("\"now\""), "{}", d.message);
        assert!(d.tags.is_empty());
        let d = tagger.decode_sentence(" \t ");
        assert!(!d.success);
        assert_eq!(d.message, Error::EmptySentence.to_string());
    }

    #[test]
    fn gold_comparison() {
        assert!(matches_gold("man", "nn", "man/NN"));
        assert!(!matches_gold("man", "nn", "man/vb"));
        assert!(!matches_gold("man", "nn", "men/nn"));
        assert!(!matches_gold("man", "nn", "man"));
    }

    #[test]
    fn invalid_weights_keep_previous() {
        let mut tagger = PosTagger::default();
        assert!(tagger.set_weights(-1.0, 0.0, 0.0).is_err());
        assert_eq!(tagger.model().weights(), Weights::default());
        tagger.set_weights(2.0, 1.0, 1.0).unwrap();
        assert_eq!(tagger.model().weights().lambda1, 0.5);
    }
}
