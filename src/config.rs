use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{hmm::Weights, Result};

/// Tagger settings, usually read from a JSON file:
///
/// ```json
/// { "lambda1": 0.5, "lambda2": 0.3, "lambda3": 0.2, "training_folder": "corpus/brown" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lambda1: f64,
    pub lambda2: f64,
    pub lambda3: f64,
    pub training_folder: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let w = Weights::default();
        Self { lambda1: w.lambda1, lambda2: w.lambda2, lambda3: w.lambda3, training_folder: None }
    }
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self> {
        let f = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(f))?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn weights(&self) -> Result<Weights> {
        Weights::new(self.lambda1, self.lambda2, self.lambda3)
    }
}
