//! Keyword-based tone scoring.
//!
//! # Responsibility
//! - Classify a piece of correspondence text as positive, negative or
//!   neutral by counting fixed marker words.
//! - Stay independent of the insight aggregation so a real sentiment model
//!   can replace it through `ToneScorer`.
//!
//! # Invariants
//! - Matching is case-insensitive and whole-word only.
//! - Equal positive and negative hit counts (including zero) score neutral.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

const POSITIVE_MARKERS: &[&str] = &[
    "thanks",
    "thank you",
    "grateful",
    "appreciate",
    "great",
    "wonderful",
    "glad",
    "happy",
    "love",
    "delighted",
    "excited",
    "congratulations",
];

const NEGATIVE_MARKERS: &[&str] = &[
    "sorry",
    "unfortunately",
    "apologize",
    "regret",
    "sad",
    "upset",
    "angry",
    "frustrated",
    "disappointed",
    "worried",
    "problem",
    "bad news",
];

static POSITIVE_RE: Lazy<Regex> =
    Lazy::new(|| marker_regex(POSITIVE_MARKERS).expect("valid positive marker regex"));
static NEGATIVE_RE: Lazy<Regex> =
    Lazy::new(|| marker_regex(NEGATIVE_MARKERS).expect("valid negative marker regex"));

/// Coarse tone of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

/// Per-tone entry counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ToneTally {
    pub positive: u32,
    pub negative: u32,
    pub neutral: u32,
}

impl ToneTally {
    /// Counts one scored entry.
    pub fn record(&mut self, tone: Tone) {
        match tone {
            Tone::Positive => self.positive += 1,
            Tone::Negative => self.negative += 1,
            Tone::Neutral => self.neutral += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.positive + self.negative + self.neutral
    }
}

/// Scores free text into a tone.
pub trait ToneScorer {
    fn score(&self, text: &str) -> Tone;
}

/// Default scorer: counts positive vs negative marker words.
#[derive(Debug, Clone)]
pub struct KeywordToneScorer {
    positive: Regex,
    negative: Regex,
}

impl Default for KeywordToneScorer {
    fn default() -> Self {
        Self {
            positive: POSITIVE_RE.clone(),
            negative: NEGATIVE_RE.clone(),
        }
    }
}

impl KeywordToneScorer {
    /// Builds a scorer from caller-supplied marker lists.
    ///
    /// Markers are matched literally; regex metacharacters are escaped.
    pub fn with_markers(positive: &[&str], negative: &[&str]) -> Result<Self, regex::Error> {
        Ok(Self {
            positive: marker_regex(positive)?,
            negative: marker_regex(negative)?,
        })
    }

    /// Returns `(positive_hits, negative_hits)` for `text`.
    pub fn count_hits(&self, text: &str) -> (usize, usize) {
        (
            self.positive.find_iter(text).count(),
            self.negative.find_iter(text).count(),
        )
    }
}

impl ToneScorer for KeywordToneScorer {
    fn score(&self, text: &str) -> Tone {
        let (positive, negative) = self.count_hits(text);
        match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => Tone::Positive,
            std::cmp::Ordering::Less => Tone::Negative,
            std::cmp::Ordering::Equal => Tone::Neutral,
        }
    }
}

fn marker_regex(markers: &[&str]) -> Result<Regex, regex::Error> {
    let patterns = markers
        .iter()
        .map(|marker| {
            marker
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .filter(|pattern| !pattern.is_empty())
        .collect::<Vec<_>>();
    if patterns.is_empty() {
        // Never matches.
        return Regex::new(r"\b\B");
    }
    Regex::new(&format!(r"(?i)\b(?:{})\b", patterns.join("|")))
}

#[cfg(test)]
mod tests {
    use super::{KeywordToneScorer, Tone, ToneScorer, ToneTally};

    #[test]
    fn counts_whole_word_markers_case_insensitively() {
        let scorer = KeywordToneScorer::default();
        let (positive, negative) =
            scorer.count_hits("THANKS for the Great news. Sorry I was late. Thank  you!");
        assert_eq!(positive, 3);
        assert_eq!(negative, 1);
        assert_eq!(scorer.count_hits("greatly unsadness"), (0, 0));
    }

    #[test]
    fn score_compares_hit_counts() {
        let scorer = KeywordToneScorer::default();
        assert_eq!(scorer.score("so glad and happy"), Tone::Positive);
        assert_eq!(scorer.score("unfortunately, bad news"), Tone::Negative);
        assert_eq!(scorer.score("thanks, but sorry"), Tone::Neutral);
        assert_eq!(scorer.score(""), Tone::Neutral);
    }

    #[test]
    fn custom_markers_replace_defaults() {
        let scorer = KeywordToneScorer::with_markers(&["kudos", "well done"], &[]).unwrap();
        assert_eq!(scorer.count_hits("Kudos, well  done on the rewrite"), (2, 0));
        assert_eq!(scorer.count_hits("welldone kudosy"), (0, 0));
        assert_eq!(scorer.score("nothing here"), Tone::Neutral);
    }

    #[test]
    fn blank_markers_are_ignored() {
        let scorer = KeywordToneScorer::with_markers(&["kudos", "", "  "], &[" "]).unwrap();
        assert_eq!(scorer.count_hits("Kudos to the whole team"), (1, 0));
        assert_eq!(scorer.count_hits("plain words here"), (0, 0));
    }

    #[test]
    fn tally_records_each_tone() {
        let mut tally = ToneTally::default();
        tally.record(Tone::Positive);
        tally.record(Tone::Positive);
        tally.record(Tone::Neutral);
        assert_eq!(
            tally,
            ToneTally {
                positive: 2,
                negative: 0,
                neutral: 1
            }
        );
        assert_eq!(tally.total(), 3);
    }
}
