use std::{
    io::{self, BufRead},
    path::PathBuf,
    process::ExitCode,
    time::Instant,
};

use clap::{Parser, Subcommand};
use hmmtag::{tagset, Config, Dataset, PosTagger};

/// Train a trigram HMM part-of-speech tagger on `word/TAG` annotated text and
/// use it to tag, evaluate or inspect.
#[derive(Debug, Parser)]
#[command(version)]
#[command(propagate_version = true)]
struct Argv {
    /// increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// read settings from a JSON file (CONFIG)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,
    /// interpolation weights for the trigram, bigram and unigram estimates
    #[arg(long, num_args = 3, value_names = ["L1", "L2", "L3"], global = true)]
    lambda: Option<Vec<f64>>,
    /// training corpus files or folders; defaults to the configured training folder
    #[arg(short = 'd', long = "data", value_name = "PATH", global = true)]
    datasets: Vec<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// print statistics of the training set
    Info {
        /// list all tags
        #[arg(long)]
        tags: bool,
        /// list all words
        #[arg(long)]
        words: bool,
        /// list all tag bigrams
        #[arg(long)]
        bigrams: bool,
        /// list all tag trigrams
        #[arg(long)]
        trigrams: bool,
        /// list the words observed with a tag
        #[arg(long, value_name = "TAG")]
        tag: Option<String>,
    },
    /// tag sentences given as arguments, or read from STDIN one per line
    Tag {
        /// append the descriptions of the assigned tags
        #[arg(long)]
        describe: bool,
        /// print every result as a JSON object
        #[arg(long)]
        json: bool,
        sentences: Vec<String>,
    },
    /// report tagging accuracy on the training sentences or on a labeled corpus
    Evaluate {
        /// evaluate on this corpus instead of the training sentences
        #[arg(short, long, value_name = "FILE")]
        test: Option<PathBuf>,
    },
    /// query a single probability
    Prob {
        #[command(subcommand)]
        query: Query,
    },
}

#[derive(Debug, Subcommand)]
enum Query {
    /// P(word | tag)
    WordGivenTag { word: String, tag: String },
    /// P(tag | word)
    TagGivenWord { tag: String, word: String },
    /// P(t2 | t1)
    Bigram { t1: String, t2: String },
    /// P(t3 | t1, t2)
    Trigram { t1: String, t2: String, t3: String },
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load(argv: &Argv) -> hmmtag::Result<PosTagger> {
    let mut config = match &argv.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    if let Some(l) = &argv.lambda {
        (config.lambda1, config.lambda2, config.lambda3) = (l[0], l[1], l[2]);
    }
    log::info!("config: {:?}", config);

    let mut datasets = argv.datasets.clone();
    if datasets.is_empty() {
        datasets.extend(config.training_folder.clone());
    }

    let mut tagger = PosTagger::new(config.weights()?);
    let begin = Instant::now();
    for path in &datasets {
        tagger.train_path(path)?;
    }
    log::info!("training took: {:?}", begin.elapsed());
    if tagger.training_sentences().is_empty() {
        log::warn!("no training sentences; pass corpus paths with --data or set training_folder");
    }
    Ok(tagger)
}

fn print_decoding(
    tagger: &PosTagger,
    sentence: &str,
    describe: bool,
    json: bool,
) -> hmmtag::Result<bool> {
    let decoding = tagger.decode_sentence(sentence);
    if json {
        println!("{}", serde_json::to_string(&decoding)?);
    } else if decoding.success {
        println!("{}", decoding.tagged);
        if describe {
            for (tag, desc) in tagset::describe(&decoding.tags) {
                println!("\t{tag} : {desc}");
            }
        }
    } else {
        eprintln!("{}", decoding.message);
    }
    Ok(decoding.success)
}

fn run(argv: Argv) -> hmmtag::Result<bool> {
    let tagger = load(&argv)?;
    let model = tagger.model();
    match argv.command {
        Command::Info { tags, words, bigrams, trigrams, tag } => {
            println!("{}", model.summary());
            if tags {
                model.lexicon().tags().iter().for_each(|t| println!("{t}"));
            }
            if words {
                model.lexicon().words().iter().for_each(|w| println!("{w}"));
            }
            if bigrams {
                model.bigram_list().iter().for_each(|s| println!("{s}"));
            }
            if trigrams {
                model.trigram_list().iter().for_each(|s| println!("{s}"));
            }
            if let Some(tag) = tag {
                for (word, count) in model.words_with_tag(&tag) {
                    println!("{word}\t{count}");
                }
            }
            Ok(true)
        }
        Command::Tag { describe, json, sentences } => {
            let mut ok = true;
            if sentences.is_empty() {
                for line in io::stdin().lock().lines() {
                    let line = line?;
                    if line.trim().is_empty() {
                        continue;
                    }
                    ok &= print_decoding(&tagger, &line, describe, json)?;
                }
            } else {
                for sentence in &sentences {
                    ok &= print_decoding(&tagger, sentence, describe, json)?;
                }
            }
            Ok(ok)
        }
        Command::Evaluate { test } => {
            let begin = Instant::now();
            let evaluation = match test {
                Some(path) => {
                    let mut ds = Dataset::default();
                    ds.read_path(&path)?;
                    tagger.evaluate(&ds)
                }
                None => tagger.evaluate_training_set(),
            };
            println!("{}", evaluation);
            log::info!("evaluation took: {:?}", begin.elapsed());
            Ok(true)
        }
        Command::Prob { query } => {
            let p = match &query {
                Query::WordGivenTag { word, tag } => tagger.word_given_tag(word, tag),
                Query::TagGivenWord { tag, word } => tagger.tag_given_word(tag, word),
                Query::Bigram { t1, t2 } => tagger.bigram(t1, t2),
                Query::Trigram { t1, t2, t3 } => tagger.trigram(t1, t2, t3),
            };
            println!("{p}");
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    let argv = Argv::parse();
    init_logger(argv.verbose);
    log::debug!("argv: {:?}", argv);
    match run(argv) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}
