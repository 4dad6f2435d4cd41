use std::{
    fs::{self, File},
    path::Path,
};

use hmmtag::{hmm::TagId, Dataset, Error, PosTagger, Weights};

const CORPUS: &str = include_str!("data/sample.txt");

fn trained() -> PosTagger {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut tagger = PosTagger::default();
    tagger.train(CORPUS);
    tagger
}

fn all_probabilities(tagger: &PosTagger) -> Vec<f64> {
    let lex = tagger.model().lexicon();
    let tags = lex.tags();
    let words = lex.words();
    let mut v = Vec::new();
    for w in &words {
        for t in &tags {
            v.push(tagger.word_given_tag(w, t));
            v.push(tagger.tag_given_word(t, w));
        }
    }
    for a in &tags {
        for b in &tags {
            v.push(tagger.bigram(a, b));
            for c in &tags {
                v.push(tagger.trigram(a, b, c));
            }
        }
    }
    v
}

#[test]
fn cooccurrence_totals() {
    let tagger = trained();
    let lex = tagger.model().lexicon();
    let mut tokens = 0;
    for w in lex.words() {
        let entry = lex.word(lex.find_word(w).unwrap());
        assert_eq!(entry.total(), entry.iter().map(|(_, c)| c).sum::<u64>(), "{w}");
        tokens += entry.total();
    }
    for t in lex.tags() {
        let entry = lex.tag(lex.find_tag(t).unwrap());
        assert_eq!(entry.total(), entry.iter().map(|(_, c)| c).sum::<u64>(), "{t}");
    }
    assert_eq!(tokens, tagger.model().num_tokens());
}

#[test]
fn probabilities_are_bounded() {
    let tagger = trained();
    for p in all_probabilities(&tagger) {
        assert!(p.is_finite() && (0.0..=1.0).contains(&p), "{p}");
    }
    assert_eq!(tagger.word_given_tag("unicorn", "nn"), 0.0);
    assert_eq!(tagger.tag_given_word("nn", "unicorn"), 0.0);
    assert_eq!(tagger.word_given_tag("man", "xx"), 0.0);
    assert_eq!(tagger.bigram("at", "xx"), 0.0);
    assert_eq!(tagger.trigram("at", "nn", "xx"), 0.0);
}

#[test]
fn emission_from_counts() {
    let tagger = trained();
    // "can" is md twice and nn twice
    assert!((tagger.tag_given_word("md", "can") - 0.5).abs() < 1e-12);
    assert!((tagger.tag_given_word("MD", "can") - 0.5).abs() < 1e-12);
    assert!((tagger.word_given_tag("can", "md") - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn retraining_is_reproducible() {
    let mut tagger = trained();
    let first = all_probabilities(&tagger);
    let summary = tagger.model().summary();
    tagger.reset();
    assert_eq!(tagger.model().summary().tokens, 0);
    assert!(tagger.training_sentences().is_empty());
    assert_eq!(tagger.word_given_tag("man", "nn"), 0.0);
    assert!(matches!(tagger.tag("man"), Err(Error::UnknownWord(_))));

    tagger.train(CORPUS);
    assert_eq!(tagger.model().summary(), summary);
    let second = all_probabilities(&tagger);
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert!((a - b).abs() < 1e-12);
    }
}

#[test]
fn training_accumulates() {
    let mut tagger = PosTagger::default();
    assert_eq!(tagger.train("Go/VB"), 1);
    assert_eq!(tagger.train("Go/VB home/NR\n\nstray\n"), 1);
    assert_eq!(tagger.train_all(["run/VB", "run/NN fast/RB"]), 2);
    let s = tagger.model().summary();
    assert_eq!(s.sentences, 4);
    assert_eq!(s.tokens, 6);
    assert_eq!(s.words, 4);
    assert_eq!(s.tags, 4);
    assert_eq!(tagger.training_sentences()[1].tagged(), "Go/vb home/nr");
    assert_eq!(tagger.training_sentences()[1].plain(), "Go home");

    let stats = tagger.model().stats();
    assert_eq!(stats.bigram(TagId::BOUNDARY, TagId::BOUNDARY), 4);
    let vb = tagger.model().lexicon().find_tag("vb").unwrap();
    assert_eq!(stats.bigram(TagId::BOUNDARY, vb), 3);
    assert_eq!(stats.trigram(TagId::BOUNDARY, TagId::BOUNDARY, vb), 3);
}

#[test]
fn weights_change_estimates() {
    let mut tagger = trained();
    let uniform = tagger.trigram("at", "nn", "bez");
    tagger.set_weights(1.0, 0.0, 0.0).unwrap();
    let trigram_only = tagger.trigram("at", "nn", "bez");
    assert_ne!(uniform, trigram_only);
    tagger.set_weights(3.0, 3.0, 3.0).unwrap();
    assert!((tagger.trigram("at", "nn", "bez") - uniform).abs() < 1e-12);
    assert!(matches!(tagger.set_weights(0.0, 0.0, 0.0), Err(Error::InvalidWeights(..))));
    assert_eq!(tagger.model().weights(), Weights::new(1.0, 1.0, 1.0).unwrap());
}

#[test]
fn train_from_folder() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("b.txt"), "The/AT dog/NN ./.\n").unwrap();
    fs::write(dir.join("a.txt"), "He/PPS ran/VBD ./.\nstray\n").unwrap();

    let mut ds = Dataset::default();
    assert_eq!(ds.read_path(dir).unwrap(), 2);
    assert_eq!(ds.seqs[0].plain(), "He ran .");

    let mut tagger = PosTagger::default();
    assert_eq!(tagger.train_path(dir).unwrap(), 2);
    assert_eq!(tagger.tag("The dog ran .").unwrap(), vec!["at", "nn", "vbd", "."]);
}

#[test]
fn dataset_from_file() {
    let file = File::open("tests/data/sample.txt").unwrap();
    let ds = Dataset::try_from(file).unwrap();
    let mut expected = Dataset::default();
    expected.read_path(Path::new("tests/data/sample.txt")).unwrap();
    assert!(!ds.is_empty());
    assert_eq!(ds.seqs, expected.seqs);
    assert_eq!(ds.len(), Dataset::from(CORPUS).len());
}

#[test]
fn io_error_leaves_model_untouched() {
    let mut tagger = trained();
    let before = tagger.model().summary();
    let ret = tagger.train_path(Path::new("tests/data/does-not-exist.txt"));
    assert!(matches!(ret, Err(Error::Io(_))));
    assert_eq!(tagger.model().summary(), before);
}
