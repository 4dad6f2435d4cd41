//! Brown corpus tag set descriptions.

use std::collections::BTreeSet;

const DESCRIPTIONS: &[(&str, &str)] = &[
    (".", "sentence closer (. ; ? *)"),
    ("(", "left paren"),
    (")", "right paren"),
    ("*", "not, n't"),
    ("--", "dash"),
    (",", "comma"),
    (":", "colon"),
    ("ABL", "pre-qualifier (quite, rather)"),
    ("ABN", "pre-quantifier (half, all)"),
    ("ABX", "pre-quantifier (both)"),
    ("AP", "post-determiner (many, several, next)"),
    ("AT", "article (a, the, no)"),
    ("BE", "be"),
    ("BED", "were"),
    ("BEDZ", "was"),
    ("BEG", "being"),
    ("BEM", "am"),
    ("BEN", "been"),
    ("BER", "are, art"),
    ("BEZ", "is"),
    ("CC", "coordinating conjunction (and, or)"),
    ("CD", "cardinal numeral (one, two, 2, etc.)"),
    ("CS", "subordinating conjunction (if, although)"),
    ("DO", "do"),
    ("DOD", "did"),
    ("DOZ", "does"),
    ("DT", "singular determiner/quantifier (this, that)"),
    ("DTI", "singular or plural determiner/quantifier (some, any)"),
    ("DTS", "plural determiner (these, those)"),
    ("DTX", "determiner/double conjunction (either)"),
    ("EX", "existential there"),
    ("FW", "foreign word (hyphenated before regular tag)"),
    ("HV", "have"),
    ("HVD", "had (past tense)"),
    ("HVG", "having"),
    ("HVN", "had (past participle)"),
    ("IN", "preposition"),
    ("JJ", "adjective"),
    ("JJR", "comparative adjective"),
    ("JJS", "semantically superlative adjective (chief, top)"),
    ("JJT", "morphologically superlative adjective (biggest)"),
    ("MD", "modal auxiliary (can, should, will)"),
    ("NC", "cited word (hyphenated after regular tag)"),
    ("NN", "singular or mass noun"),
    ("NN$", "possessive singular noun"),
    ("NNS", "plural noun"),
    ("NNS$", "possessive plural noun"),
    ("NP", "proper noun or part of name phrase"),
    ("NP$", "possessive proper noun"),
    ("NPS", "plural proper noun"),
    ("NPS$", "possessive plural proper noun"),
    ("NR", "adverbial noun (home, today, west)"),
    ("OD", "ordinal numeral (first, 2nd)"),
    ("PN", "nominal pronoun (everybody, nothing)"),
    ("PN$", "possessive nominal pronoun"),
    ("PP$", "possessive personal pronoun (my, our)"),
    ("PP$$", "second (nominal) possessive pronoun (mine, ours)"),
    ("PPL", "singular reflexive/intensive personal pronoun (myself)"),
    ("PPLS", "plural reflexive/intensive personal pronoun (ourselves)"),
    ("PPO", "objective personal pronoun (me, him, it, them)"),
    ("PPS", "3rd. singular nominative pronoun (he, she, it, one)"),
    ("PPSS", "other nominative personal pronoun (I, we, they, you)"),
    ("PRP", "Personal pronoun"),
    ("PRP$", "Possessive pronoun"),
    ("QL", "qualifier (very, fairly)"),
    ("QLP", "post-qualifier (enough, indeed)"),
    ("RB", "adverb"),
    ("RBR", "comparative adverb"),
    ("RBT", "superlative adverb"),
    ("RN", "nominal adverb (here, then, indoors)"),
    ("RP", "adverb/particle (about, off, up)"),
    ("TO", "infinitive marker to"),
    ("UH", "interjection, exclamation"),
    ("VB", "verb, base form"),
    ("VBD", "verb, past tense"),
    ("VBG", "verb, present participle/gerund"),
    ("VBN", "verb, past participle"),
    ("VBP", "verb, non 3rd person, singular, present"),
    ("VBZ", "verb, 3rd. singular present"),
    ("WDT", "wh- determiner (what, which)"),
    ("WP$", "possessive wh- pronoun (whose)"),
    ("WPO", "objective wh- pronoun (whom, which, that)"),
    ("WPS", "nominative wh- pronoun (who, which, that)"),
    ("WQL", "wh- qualifier (how)"),
    ("WRB", "wh- adverb (how, where, when)"),
];

/// Description of a canonical (upper-case) Brown tag; the lookup ignores case.
pub fn description(tag: &str) -> Option<&'static str> {
    DESCRIPTIONS
        .iter()
        .find(|(t, _)| t.eq_ignore_ascii_case(tag))
        .map(|(_, d)| *d)
}

/// Explains the tags of a decoded sentence.
///
/// The negation marker `*` is reported once, the `fw-` prefix and the `-hl`,
/// `-tl` and `-nc` suffixes are removed and compound tags are split on '+'.
/// Returns the known base tags upper-cased and sorted.
pub fn describe<S: AsRef<str>>(tags: &[S]) -> Vec<(String, &'static str)> {
    let mut base = BTreeSet::new();
    for tag in tags {
        let tag = tag.as_ref().to_lowercase();
        if tag.contains('*') {
            base.insert("*".to_string());
        }
        let stripped = tag
            .replace('*', "")
            .replace("fw-", "")
            .replace("-hl", "")
            .replace("-tl", "")
            .replace("-nc", "");
        base.extend(stripped.split('+').filter(|s| !s.is_empty()).map(str::to_string));
    }
    base.into_iter()
        .filter_map(|t| {
            let t = t.to_uppercase();
            description(&t).map(|d| (t, d))
        })
        .collect()
}
