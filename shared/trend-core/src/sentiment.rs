//! Title sentiment: polarity in [-1, 1] and a three-way label

use crate::{Result, TrendCoreError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::info;

/// Three-way sentiment label derived from the sign of the polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    /// Positive above zero, Negative below, Neutral at exactly zero
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > 0.0 {
            SentimentLabel::Positive
        } else if polarity < 0.0 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub polarity: f64,
    pub label: SentimentLabel,
}

/// Anything that can put a polarity on a piece of text
pub trait SentimentAnalyzer: Send + Sync {
    /// Raw polarity. Values outside [-1, 1] are clamped by [`score`](Self::score).
    fn polarity(&self, text: &str) -> f64;

    fn score(&self, text: &str) -> SentimentScore {
        let raw = self.polarity(text);
        let polarity = if raw.is_finite() { raw.clamp(-1.0, 1.0) } else { 0.0 };
        SentimentScore {
            polarity,
            label: SentimentLabel::from_polarity(polarity),
        }
    }
}

/// Multiplier applied to a sentiment word that follows a negation
const NEGATION_FACTOR: f64 = -0.5;

/// Lexicon-based polarity scorer.
///
/// Each sentiment-bearing word contributes its lexicon polarity, scaled by
/// any intensifiers right before it and flipped (and dampened) by a pending
/// negation. The text polarity is the mean of those contributions.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    /// word -> polarity
    words: HashMap<String, f64>,

    /// word -> multiplier ("very" -> 1.3)
    intensifiers: HashMap<String, f64>,

    negations: Vec<String>,

    /// emoticon -> polarity, matched on raw whitespace tokens
    emoticons: HashMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexiconSection {
    Words,
    Intensifiers,
    Negations,
    Emoticons,
}

impl LexiconScorer {
    /// Create a scorer with the built-in English lexicon
    pub fn new() -> Self {
        let mut scorer = Self::empty();
        scorer.load_default_words();
        scorer.load_default_modifiers();
        scorer
    }

    /// Scorer with no entries at all; every text scores 0
    pub fn empty() -> Self {
        Self {
            words: HashMap::new(),
            intensifiers: HashMap::new(),
            negations: Vec::new(),
            emoticons: HashMap::new(),
        }
    }

    /// Built-in lexicon extended (and overridden) by a lexicon file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut scorer = Self::new();
        scorer.parse_lexicon(&content)?;
        info!("📚 Loaded sentiment lexicon from: {}", path.as_ref().display());
        Ok(scorer)
    }

    pub fn add_word(&mut self, word: &str, polarity: f64) {
        self.words.insert(word.to_lowercase(), polarity.clamp(-1.0, 1.0));
    }

    pub fn add_intensifier(&mut self, word: &str, multiplier: f64) {
        self.intensifiers.insert(word.to_lowercase(), multiplier);
    }

    pub fn add_negation(&mut self, word: &str) {
        let word = word.to_lowercase();
        if !self.negations.contains(&word) {
            self.negations.push(word);
        }
    }

    pub fn word_polarity(&self, word: &str) -> Option<f64> {
        self.words.get(&word.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len() + self.emoticons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_negation(&self, word: &str) -> bool {
        word.ends_with("n't") || self.negations.iter().any(|n| n == word)
    }

    /// Parse a lexicon file.
    ///
    /// Lines are `word = score` under an optional `[words]`,
    /// `[intensifiers]`, `[negations]` or `[emoticons]` header. Negations
    /// are bare words. `#` starts a comment line.
    fn parse_lexicon(&mut self, content: &str) -> Result<()> {
        let mut section = LexiconSection::Words;

        for (index, line) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                section = match line[1..line.len() - 1].trim().to_lowercase().as_str() {
                    "words" => LexiconSection::Words,
                    "intensifiers" => LexiconSection::Intensifiers,
                    "negations" => LexiconSection::Negations,
                    "emoticons" => LexiconSection::Emoticons,
                    other => {
                        return Err(TrendCoreError::Lexicon {
                            line: line_no,
                            message: format!("unknown section [{}]", other),
                        })
                    }
                };
                continue;
            }

            if section == LexiconSection::Negations {
                self.add_negation(line);
                continue;
            }

            let (word, value) = line.split_once('=').ok_or_else(|| TrendCoreError::Lexicon {
                line: line_no,
                message: format!("expected `word = score`, got `{}`", line),
            })?;
            let word = word.trim();
            let value: f64 = value.trim().parse().map_err(|_| TrendCoreError::Lexicon {
                line: line_no,
                message: format!("invalid score for `{}`", word),
            })?;

            match section {
                LexiconSection::Words => self.add_word(word, value),
                LexiconSection::Intensifiers => self.add_intensifier(word, value),
                LexiconSection::Emoticons => {
                    self.emoticons.insert(word.to_string(), value.clamp(-1.0, 1.0));
                }
                LexiconSection::Negations => {}
            }
        }

        Ok(())
    }

    fn load_default_words(&mut self) {
        let positive = [
            ("best", 1.0), ("perfect", 1.0), ("awesome", 1.0), ("excellent", 1.0),
            ("wonderful", 1.0), ("brilliant", 0.9), ("fantastic", 0.4), ("incredible", 0.9),
            ("beautiful", 0.85), ("great", 0.8), ("happy", 0.8), ("impressive", 1.0),
            ("good", 0.7), ("nice", 0.6), ("amazing", 0.6), ("superb", 1.0),
            ("love", 0.5), ("lovely", 0.5), ("loved", 0.7), ("cute", 0.5),
            ("hilarious", 0.5), ("funny", 0.25), ("fun", 0.3), ("cool", 0.35),
            ("epic", 0.1), ("top", 0.5), ("easy", 0.43), ("simple", 0.2),
            ("free", 0.4), ("new", 0.14), ("smart", 0.21), ("useful", 0.3),
            ("helpful", 0.3), ("powerful", 0.3), ("success", 0.3), ("successful", 0.75),
            ("win", 0.8), ("winning", 0.5), ("inspiring", 0.5), ("inspirational", 0.5),
            ("motivational", 0.3), ("positive", 0.23), ("healthy", 0.5), ("delicious", 1.0),
            ("tasty", 0.5), ("legendary", 0.5), ("magical", 0.5), ("fresh", 0.3),
            ("ultimate", 0.3), ("real", 0.2), ("true", 0.35), ("proud", 0.8),
            ("peaceful", 0.5), ("calm", 0.3), ("relaxing", 0.4), ("clever", 0.5),
            ("favorite", 0.5), ("favourite", 0.5), ("glad", 0.5), ("excited", 0.4),
            ("exciting", 0.3), ("wow", 0.1), ("secret", 0.1), ("unique", 0.38),
            ("rich", 0.38), ("genius", 0.8), ("masterpiece", 0.8), ("satisfying", 0.5),
        ];

        let negative = [
            ("worst", -1.0), ("terrible", -1.0), ("horrible", -1.0), ("awful", -1.0),
            ("disgusting", -1.0), ("boring", -1.0), ("pathetic", -1.0), ("shocking", -1.0),
            ("stupid", -0.8), ("hate", -0.8), ("hated", -0.9), ("ugly", -0.7),
            ("bad", -0.7), ("crazy", -0.6), ("dangerous", -0.6), ("insane", -1.0),
            ("sad", -0.5), ("angry", -0.5), ("scary", -0.5), ("wrong", -0.5),
            ("fake", -0.5), ("fail", -0.5), ("failed", -0.5), ("failure", -0.3),
            ("difficult", -0.5), ("mistake", -0.4), ("mistakes", -0.4), ("poor", -0.4),
            ("broken", -0.4), ("lost", -0.2), ("hard", -0.29), ("dead", -0.2),
            ("dark", -0.15), ("toxic", -0.5), ("useless", -0.5), ("weird", -0.5),
            ("annoying", -0.8), ("lonely", -0.5), ("painful", -0.7), ("pain", -0.5),
            ("tragic", -0.75), ("cruel", -1.0), ("evil", -1.0), ("nightmare", -0.6),
            ("disaster", -0.8), ("scam", -0.8), ("cringe", -0.6), ("depressed", -0.6),
            ("depression", -0.4), ("anxiety", -0.3), ("stress", -0.3), ("problem", -0.2),
            ("problems", -0.2), ("worse", -0.4), ("unfair", -0.5), ("ridiculous", -0.33),
        ];

        for (word, polarity) in positive.into_iter().chain(negative) {
            self.add_word(word, polarity);
        }

        let emoticons = [
            (":)", 0.5), (":-)", 0.5), (":D", 1.0), (";)", 0.5), ("<3", 0.8),
            ("😂", 0.5), ("😍", 0.9), ("🔥", 0.4), ("❤️", 0.8), ("👍", 0.6),
            (":(", -0.75), (":-(", -0.75), (":'(", -0.8), ("😢", -0.6), ("😡", -0.8),
        ];
        for (emoticon, polarity) in emoticons {
            self.emoticons.insert(emoticon.to_string(), polarity);
        }
    }

    fn load_default_modifiers(&mut self) {
        let intensifiers = [
            ("very", 1.3), ("really", 1.3), ("so", 1.2), ("super", 1.3),
            ("extremely", 1.5), ("absolutely", 1.4), ("totally", 1.3), ("most", 1.4),
            ("too", 1.2), ("incredibly", 1.5), ("highly", 1.3), ("pretty", 0.8),
            ("slightly", 0.5), ("somewhat", 0.6), ("bit", 0.6),
        ];
        for (word, multiplier) in intensifiers {
            self.add_intensifier(word, multiplier);
        }

        for word in ["not", "no", "never", "nothing", "nobody", "none", "without", "dont", "cant", "wont", "isnt"] {
            self.add_negation(word);
        }
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase and strip surrounding punctuation, keeping inner apostrophes
fn normalize_token(token: &str) -> String {
    token
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
        .trim_matches('\'')
        .replace('’', "'")
        .to_lowercase()
}

fn ends_sentence(token: &str) -> bool {
    token.ends_with(['.', '!', '?', ';', '|'])
}

impl SentimentAnalyzer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        let mut contributions: Vec<f64> = Vec::new();
        let mut modifier = 1.0;
        let mut negated = false;

        for raw in text.split_whitespace() {
            if let Some(&polarity) = self.emoticons.get(raw) {
                contributions.push(polarity);
                modifier = 1.0;
                negated = false;
                continue;
            }

            let word = normalize_token(raw);
            if word.is_empty() {
                continue;
            }

            if self.is_negation(&word) {
                negated = true;
            } else if let Some(&multiplier) = self.intensifiers.get(&word) {
                modifier *= multiplier;
            } else if let Some(&polarity) = self.words.get(&word) {
                let mut value = polarity * modifier;
                if negated {
                    value *= NEGATION_FACTOR;
                }
                contributions.push(value.clamp(-1.0, 1.0));
                modifier = 1.0;
                negated = false;
            } else {
                // Intensifiers only reach the very next word
                modifier = 1.0;
            }

            if ends_sentence(raw) {
                modifier = 1.0;
                negated = false;
            }
        }

        if contributions.is_empty() {
            return 0.0;
        }

        let mean = contributions.iter().sum::<f64>() / contributions.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}
