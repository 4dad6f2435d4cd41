use std::{
    collections::{hash_map::Entry, HashMap},
    hash::Hash,
};

use crate::quark::{Quark, StringTable, TextVectorizer};

/// Handle of an interned surface word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordId(pub(crate) usize);

/// Handle of an interned tag label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(pub(crate) usize);

impl TagId {
    /// Sentence-start sentinel. It occupies the first slot of the tag table
    /// and is never reachable through a string lookup.
    pub const BOUNDARY: TagId = TagId(0);

    #[inline]
    pub fn is_boundary(self) -> bool {
        self == Self::BOUNDARY
    }
}

/// Label stored for the sentinel. Whitespace never survives tokenization, so
/// no corpus tag can collide with it.
pub(crate) const BOUNDARY_LABEL: &str = " <s> ";

/// Co-occurrence counts of one interned entity.
///
/// `total` always equals the sum of the per-key counts; keys are kept in the
/// order they were first observed, which fixes the decoder's enumeration order.
#[derive(Debug, Clone)]
pub struct Cooccurrence<K> {
    total: u64,
    order: Vec<K>,
    counts: HashMap<K, u64>,
}

impl<K> Default for Cooccurrence<K> {
    fn default() -> Self {
        Self { total: 0, order: Vec::new(), counts: HashMap::new() }
    }
}

impl<K: Copy + Eq + Hash> Cooccurrence<K> {
    fn add(&mut self, key: K) {
        match self.counts.entry(key) {
            Entry::Occupied(mut e) => *e.get_mut() += 1,
            Entry::Vacant(e) => {
                e.insert(1);
                self.order.push(key);
            }
        }
        self.total += 1;
    }

    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    #[inline]
    pub fn count(&self, key: K) -> u64 {
        self.counts.get(&key).copied().unwrap_or_default()
    }

    /// Keys in first-observed order.
    pub fn keys(&self) -> &[K] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, u64)> + '_ {
        self.order.iter().map(|k| (*k, self.counts[k]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// A word's counts, keyed by the tags it appeared with.
pub type WordEntry = Cooccurrence<TagId>;
/// A tag's counts, keyed by the words it labelled.
pub type TagEntry = Cooccurrence<WordId>;

/// Interned words and tags together with their raw co-occurrence counts.
#[derive(Debug, Clone)]
pub struct Lexicon {
    words: Quark,
    tags: Quark,
    word_entries: Vec<WordEntry>,
    tag_entries: Vec<TagEntry>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            words: Quark::default(),
            tags: Quark::from(vec![BOUNDARY_LABEL.to_string()]),
            word_entries: Vec::new(),
            tag_entries: vec![TagEntry::default()],
        }
    }
}

impl Lexicon {
    pub fn intern_word(&mut self, surface: &str) -> WordId {
        let id = self.words.find_or_insert(surface);
        if id == self.word_entries.len() {
            self.word_entries.push(WordEntry::default());
        }
        WordId(id)
    }

    /// Interns `label` after lower-casing it.
    pub fn intern_tag(&mut self, label: &str) -> TagId {
        let id = self.tags.find_or_insert(&label.to_lowercase());
        if id == self.tag_entries.len() {
            self.tag_entries.push(TagEntry::default());
        }
        TagId(id)
    }

    /// Counts one (word, tag) observation on both sides. The sentinel never
    /// labels a word, so observations of it are dropped.
    pub fn record(&mut self, word: WordId, tag: TagId) {
        if tag.is_boundary() {
            log::warn!("ignore boundary tag on word {:?}", &self.words[word.0]);
            return;
        }
        self.word_entries[word.0].add(tag);
        self.tag_entries[tag.0].add(word);
    }

    pub fn find_word(&self, surface: &str) -> Option<WordId> {
        self.words.to_id(surface).map(WordId)
    }

    /// Looks up a tag label case-insensitively; the sentinel is never returned.
    pub fn find_tag(&self, label: &str) -> Option<TagId> {
        self.tags
            .to_id(&label.to_lowercase())
            .map(TagId)
            .filter(|t| !t.is_boundary())
    }

    #[inline]
    pub fn word(&self, id: WordId) -> &WordEntry {
        &self.word_entries[id.0]
    }

    #[inline]
    pub fn tag(&self, id: TagId) -> &TagEntry {
        &self.tag_entries[id.0]
    }

    /// Surface form of `id`. Panics on an id from another lexicon.
    #[inline]
    pub fn word_str(&self, id: WordId) -> &str {
        &self.words[id.0]
    }

    #[inline]
    pub fn tag_str(&self, id: TagId) -> &str {
        &self.tags[id.0]
    }

    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    /// Number of real tags, the sentinel excluded.
    pub fn num_tags(&self) -> usize {
        self.tags.len() - 1
    }

    /// All words, sorted.
    pub fn words(&self) -> Vec<&str> {
        let mut v: Vec<&str> = self.words.iter().map(|(_, s)| s).collect();
        v.sort_unstable();
        v
    }

    /// All real tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut v: Vec<&str> = self.tags.iter().skip(1).map(|(_, s)| s).collect();
        v.sort_unstable();
        v
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
