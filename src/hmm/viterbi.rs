use std::collections::HashMap;

use super::{
    lexicon::{TagId, WordId},
    model::HmmModel,
};
use crate::{Error, Result};

/// One surviving state of the trigram lattice: the best path ending with the
/// tags `(t1, t2, t3)` at some position, scored in the log domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub t1: TagId,
    pub t2: TagId,
    pub t3: TagId,
    pub score: f64,
}

/// Candidates of one position, indexed by their last two tags.
#[derive(Debug, Default)]
struct Column {
    candidates: Vec<Candidate>,
    index: HashMap<(TagId, TagId), usize>,
}

impl Column {
    fn push(&mut self, c: Candidate) {
        self.index.entry((c.t2, c.t3)).or_insert(self.candidates.len());
        self.candidates.push(c);
    }

    /// The candidate whose last two tags are `(t2, t3)`.
    fn get(&self, t2: TagId, t3: TagId) -> Option<&Candidate> {
        self.index.get(&(t2, t3)).map(|&i| &self.candidates[i])
    }

    /// Highest score wins; the earliest candidate wins exact ties.
    fn best(&self) -> Option<&Candidate> {
        self.candidates.iter().fold(None, |best: Option<&Candidate>, c| match best {
            Some(b) if b.score >= c.score => Some(b),
            _ => Some(c),
        })
    }
}

/// Viterbi search over a trigram lattice.
pub struct Viterbi<'a> {
    model: &'a HmmModel,
    columns: Vec<Column>,
}

impl<'a> Viterbi<'a> {
    pub fn new(model: &'a HmmModel) -> Self {
        Self { model, columns: Vec::new() }
    }

    #[inline]
    fn admissible(&self, w: WordId) -> &'a [TagId] {
        let model: &'a HmmModel = self.model;
        model.lexicon().word(w).keys()
    }

    #[inline]
    fn emission(&self, w: WordId, t: TagId) -> f64 {
        self.model.p_word_given_tag(w, t).ln()
    }

    /// Finds the most probable tag sequence for `words`.
    pub fn decode(&mut self, words: &[WordId]) -> Result<Vec<TagId>> {
        if words.is_empty() {
            return Err(Error::EmptySentence);
        }
        self.build(words);
        self.backtrack(words.len())
    }

    fn build(&mut self, words: &[WordId]) {
        let model = self.model;
        let b = TagId::BOUNDARY;
        self.columns.clear();

        /* Position 0: both history tags are the boundary. */
        let mut column = Column::default();
        for &t in self.admissible(words[0]) {
            let score =
                model.p_trigram(Some(b), Some(b), Some(t)).ln() + self.emission(words[0], t);
            column.push(Candidate { t1: b, t2: b, t3: t, score });
        }
        self.columns.push(column);

        /* Position 1: only one real tag of history, so use the bigram estimate. */
        if words.len() >= 2 {
            let mut column = Column::default();
            for &t2 in self.admissible(words[0]) {
                for &t3 in self.admissible(words[1]) {
                    let Some(prev) = self.columns[0].get(b, t2) else {
                        continue;
                    };
                    let score = prev.score
                        + model.p_bigram(Some(t2), Some(t3)).ln()
                        + self.emission(words[1], t3);
                    column.push(Candidate { t1: b, t2, t3, score });
                }
            }
            self.columns.push(column);
        }

        /* Position i: keep the best t1 for every (t2, t3). */
        for i in 2..words.len() {
            let prev_column = &self.columns[i - 1];
            let mut column = Column::default();
            for &t3 in self.admissible(words[i]) {
                let emission = self.emission(words[i], t3);
                for &t2 in self.admissible(words[i - 1]) {
                    let mut best: Option<Candidate> = None;
                    for &t1 in self.admissible(words[i - 2]) {
                        let Some(prev) = prev_column.get(t1, t2) else {
                            continue;
                        };
                        let score = prev.score
                            + model.p_trigram(Some(t1), Some(t2), Some(t3)).ln()
                            + emission;
                        if best.map_or(true, |c| c.score < score) {
                            best = Some(Candidate { t1, t2, t3, score });
                        }
                    }
                    if let Some(c) = best {
                        column.push(c);
                    }
                }
            }
            self.columns.push(column);
        }
    }

    fn backtrack(&self, n: usize) -> Result<Vec<TagId>> {
        let last = self.columns[n - 1]
            .best()
            .ok_or(Error::Lattice { position: n - 1 })?;

        let mut tags = vec![TagId::BOUNDARY; n];
        tags[n - 1] = last.t3;
        if n > 1 {
            tags[n - 2] = last.t2;
        }
        if n > 2 {
            tags[n - 3] = last.t1;
        }
        for i in (0..n.saturating_sub(3)).rev() {
            let c = self.columns[i + 2]
                .get(tags[i + 1], tags[i + 2])
                .ok_or(Error::Lattice { position: i })?;
            tags[i] = c.t1;
        }
        log::trace!("best path score: {}", last.score);
        Ok(tags)
    }

    /// Surviving candidates at `position` of the last decoded sentence.
    pub fn candidates(&self, position: usize) -> &[Candidate] {
        self.columns
            .get(position)
            .map(|c| c.candidates.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Sentence;

    fn model(lines: &[&str]) -> HmmModel {
        let mut m = HmmModel::default();
        for s in lines.iter().filter_map(|l| Sentence::parse(l)) {
            m.add_sentence(&s);
        }
        m
    }

    fn decode(m: &HmmModel, text: &str) -> Vec<String> {
        let lex = m.lexicon();
        let words: Vec<WordId> = text
            .split_whitespace()
            .map(|w| lex.find_word(w).unwrap())
            .collect();
        let tags = Viterbi::new(m).decode(&words).unwrap();
        tags.into_iter().map(|t| lex.tag_str(t).to_string()).collect()
    }

    #[test]
    fn unambiguous_sentence() {
        let m = model(&["He/PP is/BEZ a/AT good/JJ man/NN ./."]);
        assert_eq!(decode(&m, "He is a good man ."), vec!["pp", "bez", "at", "jj", "nn", "."]);
    }

    #[test]
    fn lengths_one_and_two() {
        let m = model(&["Go/VB", "Go/VB home/NR"]);
        assert_eq!(decode(&m, "Go"), vec!["vb"]);
        assert_eq!(decode(&m, "Go home"), vec!["vb", "nr"]);
        assert_eq!(decode(&m, "home Go"), vec!["nr", "vb"]);
    }

    #[test]
    fn context_resolves_ambiguity() {
        let m = model(&[
            "I/PPSS can/MD go/VB",
            "I/PPSS can/MD run/VB",
            "the/AT can/NN is/BEZ red/JJ",
            "a/AT can/NN is/BEZ old/JJ",
            "the/AT dog/NN can/MD run/VB",
        ]);
        assert_eq!(decode(&m, "I can run"), vec!["ppss", "md", "vb"]);
        assert_eq!(decode(&m, "the can is red"), vec!["at", "nn", "bez", "jj"]);
        assert_eq!(decode(&m, "a dog can go"), vec!["at", "nn", "md", "vb"]);
    }

    #[test]
    fn lattice_width_is_bounded() {
        let m = model(&[
            "time/NN flies/VBZ fast/RB",
            "time/VB flies/NNS fast/JJ",
            "time/NN flies/NNS fast/RB",
        ]);
        let lex = m.lexicon();
        let words: Vec<WordId> = ["time", "flies", "fast", "time"]
            .iter()
            .map(|w| lex.find_word(w).unwrap())
            .collect();
        let mut v = Viterbi::new(&m);
        v.decode(&words).unwrap();
        assert_eq!(v.candidates(0).len(), 2);
        assert_eq!(v.candidates(1).len(), 4);
        assert_eq!(v.candidates(2).len(), 4);
        assert_eq!(v.candidates(3).len(), 4);
        assert!(v.candidates(4).is_empty());
    }

    #[test]
    fn empty_input_fails() {
        let m = model(&["Go/VB"]);
        assert!(matches!(Viterbi::new(&m).decode(&[]), Err(Error::EmptySentence)));
    }

    #[test]
    fn ties_keep_first() {
        let t = |i| TagId(i);
        let mut col = Column::default();
        col.push(Candidate { t1: t(0), t2: t(1), t3: t(2), score: -1.0 });
        col.push(Candidate { t1: t(0), t2: t(2), t3: t(1), score: -1.0 });
        assert_eq!(col.best().unwrap().t2, t(1));
        col.push(Candidate { t1: t(0), t2: t(3), t3: t(3), score: -0.5 });
        assert_eq!(col.best().unwrap().t2, t(3));
    }

    #[test]
    fn pruning_ties_keep_first_predecessor() {
        let m = model(&["w/a x/c y/e", "w/b x/c y/e"]);
        let lex = m.lexicon();
        let words: Vec<WordId> =
            ["w", "x", "y"].iter().map(|w| lex.find_word(w).unwrap()).collect();
        let mut v = Viterbi::new(&m);
        let tags = v.decode(&words).unwrap();

        let (a, b) = (lex.find_tag("a").unwrap(), lex.find_tag("b").unwrap());
        let prev = v.candidates(1);
        assert_eq!(prev.len(), 2);
        assert_eq!(prev[0].score, prev[1].score);
        assert_eq!((prev[0].t2, prev[1].t2), (a, b));

        let col = v.candidates(2);
        assert_eq!(col.len(), 1);
        assert_eq!(col[0].t1, a);
        assert_eq!(tags, vec![a, lex.find_tag("c").unwrap(), lex.find_tag("e").unwrap()]);
    }

    #[test]
    fn backtrack_reports_missing_candidate() {
        let m = model(&["Go/VB"]);
        let t = |i| TagId(i);
        let column = |cs: &[Candidate]| {
            let mut col = Column::default();
            for c in cs {
                col.push(*c);
            }
            col
        };
        let c = |t1, t2, t3| Candidate { t1: t(t1), t2: t(t2), t3: t(t3), score: -1.0 };

        /* Position 3 points back to (1, 2) at position 2, which only holds (3, 2). */
        let v = Viterbi {
            model: &m,
            columns: vec![
                column(&[c(0, 0, 1)]),
                column(&[c(0, 1, 1)]),
                column(&[c(1, 3, 2)]),
                column(&[c(1, 2, 1)]),
            ],
        };
        assert!(matches!(v.backtrack(4), Err(Error::Lattice { position: 0 })));

        let v = Viterbi { model: &m, columns: vec![Column::default()] };
        assert!(matches!(v.backtrack(1), Err(Error::Lattice { position: 0 })));
    }
}
