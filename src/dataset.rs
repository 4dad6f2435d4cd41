use std::{
    fs::{self, File},
    io::{self, BufRead, BufReader},
    path::Path,
};

use crate::Result;

/// Splits a `word/TAG` token on its last '/'. Tokens without a delimiter, or
/// with an empty word or tag part, yield `None`.
pub fn split_token(token: &str) -> Option<(&str, &str)> {
    let (word, tag) = token.rsplit_once('/')?;
    if word.is_empty() || tag.is_empty() {
        return None;
    }
    Some((word, tag))
}

/// One annotated sentence. Tags are stored lower-cased.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub words: Vec<String>,
    pub tags: Vec<String>,
}

impl Sentence {
    /// Parses a line of whitespace separated `word/TAG` tokens. Returns `None`
    /// when no token could be extracted.
    pub fn parse(line: &str) -> Option<Self> {
        let mut seq = Sentence::default();
        for token in line.split_whitespace() {
            match split_token(token) {
                Some((word, tag)) => seq.push(word, tag),
                None => log::debug!("skip token without tag: {token:?}"),
            }
        }
        (!seq.is_empty()).then_some(seq)
    }

    pub fn push(&mut self, word: &str, tag: &str) {
        self.words.push(word.to_string());
        self.tags.push(tag.to_lowercase());
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.words.iter().zip(&self.tags).map(|(w, t)| (w.as_str(), t.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// The words joined by single spaces.
    pub fn plain(&self) -> String {
        self.words.join(" ")
    }

    /// The `word/tag` tokens joined by single spaces.
    pub fn tagged(&self) -> String {
        self.pairs().map(|(w, t)| format!("{w}/{t}")).collect::<Vec<_>>().join(" ")
    }
}

/// Annotated sentences, one per non-empty corpus line.
#[derive(Debug, Default, Clone)]
pub struct Dataset {
    pub seqs: Vec<Sentence>,
}

impl Dataset {
    /// Appends the sentences of `text`; returns how many were added.
    pub fn read_str(&mut self, text: &str) -> usize {
        let before = self.seqs.len();
        self.seqs.extend(text.lines().filter_map(Sentence::parse));
        self.seqs.len() - before
    }

    pub fn read<R: BufRead>(&mut self, reader: R) -> io::Result<usize> {
        let before = self.seqs.len();
        for line in reader.lines() {
            if let Some(seq) = Sentence::parse(&line?) {
                self.seqs.push(seq);
            }
        }
        Ok(self.seqs.len() - before)
    }

    /// Reads a corpus file, or every regular file of a directory in name order.
    pub fn read_path(&mut self, path: &Path) -> Result<usize> {
        if !path.is_dir() {
            let n = self.read(BufReader::new(File::open(path)?))?;
            log::debug!("read {n} sentences from {}", path.display());
            return Ok(n);
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            } else {
                log::warn!("skip non-file entry: {}", entry.path().display());
            }
        }
        files.sort();
        let mut n = 0;
        for file in &files {
            n += self.read_path(file)?;
        }
        log::info!("read {n} sentences from {} files in {}", files.len(), path.display());
        Ok(n)
    }

    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }

    pub fn max_length(&self) -> usize {
        self.seqs.iter().map(|x| x.len()).max().unwrap_or_default()
    }

    pub fn total_items(&self) -> usize {
        self.seqs.iter().map(|x| x.len()).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sentence> {
        self.seqs.iter()
    }
}

impl From<&str> for Dataset {
    fn from(text: &str) -> Self {
        let mut ds = Dataset::default();
        ds.read_str(text);
        ds
    }
}

impl TryFrom<File> for Dataset {
    type Error = io::Error;

    fn try_from(file: File) -> io::Result<Self> {
        let mut ds = Dataset::default();
        ds.read(BufReader::new(file))?;
        Ok(ds)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Sentence;
    type IntoIter = std::slice::Iter<'a, Sentence>;

    fn into_iter(self) -> Self::IntoIter {
        self.seqs.iter()
    }
}
