//! Keyword table and transition selection.
//!
//! The table is an ordered list of `(pattern, category)` rules evaluated in
//! order, first match wins. Patterns are case-insensitive regexes applied to
//! one word at a time.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::captions::Word;
use crate::models::TransitionHint;

/// Asset category a keyword resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    SwordVisual,
    ActionClip,
    CommentScreenshot,
    ReactionImage,
    TechnicalImage,
    IntroHook,
    OutroCta,
}

impl AssetCategory {
    /// File-name fragments an image must contain to serve this category.
    ///
    /// `None` means the category is not served by a name-filtered image.
    pub fn image_name_hints(&self) -> Option<&'static [&'static str]> {
        match self {
            AssetCategory::SwordVisual => Some(&["bokken", "sword"] as &[&str]),
            AssetCategory::ReactionImage => Some(&["shock", "face"] as &[&str]),
            AssetCategory::TechnicalImage => Some(&[] as &[&str]),
            AssetCategory::IntroHook => Some(&["intro", "hook"] as &[&str]),
            AssetCategory::OutroCta => Some(&["outro", "cta", "subscribe"] as &[&str]),
            AssetCategory::ActionClip | AssetCategory::CommentScreenshot => None,
        }
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AssetCategory::SwordVisual => "sword_visual",
            AssetCategory::ActionClip => "action_clip",
            AssetCategory::CommentScreenshot => "comment_screenshot",
            AssetCategory::ReactionImage => "reaction_image",
            AssetCategory::TechnicalImage => "technical_image",
            AssetCategory::IntroHook => "intro_hook",
            AssetCategory::OutroCta => "outro_cta",
        };
        write!(f, "{}", name)
    }
}

/// Built-in rules, in precedence order.
const DEFAULT_RULES: &[(&str, AssetCategory)] = &[
    (r"bokken|pedang|katana|sword", AssetCategory::SwordVisual),
    (r"potong|slice|iris|cut|tebas", AssetCategory::ActionClip),
    (r"komentar|netizen|comment|kata|bilang", AssetCategory::CommentScreenshot),
    (r"gila|wow|gokil|sumpah|anjay|keren", AssetCategory::ReactionImage),
    (r"fisika|physics|geometri|geometry|sudut|angle", AssetCategory::TechnicalImage),
    (r"^(gila|wow|halo|guys|kalian)", AssetCategory::IntroHook),
    (r"(subscribe|like|comment|jangan lupa)", AssetCategory::OutroCta),
];

static DEFAULT_TABLE: Lazy<KeywordTable> = Lazy::new(|| {
    KeywordTable::from_rules(DEFAULT_RULES).expect("built-in keyword patterns are valid")
});

#[derive(Debug, Clone)]
struct KeywordRule {
    pattern: Regex,
    category: AssetCategory,
}

/// Ordered keyword table.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    rules: Vec<KeywordRule>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        DEFAULT_TABLE.clone()
    }
}

/// A word that matched a keyword rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatch {
    /// Normalized word text.
    pub keyword: String,
    pub category: AssetCategory,
    /// Word start in narration-audio seconds.
    pub time: f64,
    pub end: f64,
}

impl KeywordTable {
    /// Compile a table from `(pattern, category)` pairs.
    pub fn from_rules(rules: &[(&str, AssetCategory)]) -> Result<Self, regex::Error> {
        let rules = rules
            .iter()
            .map(|(pattern, category)| {
                Ok(KeywordRule {
                    pattern: Regex::new(&format!("(?i){}", pattern))?,
                    category: *category,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Category of the first rule matching `word`.
    pub fn classify(&self, word: &str) -> Option<AssetCategory> {
        let word = normalize_word(word);
        if word.is_empty() {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(&word))
            .map(|rule| rule.category)
    }

    /// Match every word, in word order.
    pub fn match_words(&self, words: &[Word]) -> Vec<KeywordMatch> {
        words
            .iter()
            .filter_map(|word| {
                self.classify(&word.text).map(|category| KeywordMatch {
                    keyword: normalize_word(&word.text),
                    category,
                    time: word.start,
                    end: word.end,
                })
            })
            .collect()
    }
}

/// Lowercase and strip surrounding punctuation.
fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

const TRANSITION_CLUSTERS: &[(&[&str], TransitionHint)] = &[
    (&["potong", "iris", "tebas", "slice", "cut"], TransitionHint::Shake),
    (&["gila", "sumpah", "gokil", "anjay", "wow"], TransitionHint::Spin),
    (&["toxic", "gagal", "fail", "awkward", "lucu"], TransitionHint::Wobble),
    (
        &["fisika", "geometri", "physics", "geometry", "sudut", "angle"],
        TransitionHint::ZoomIn,
    ),
    (
        &["komentar", "netizen", "comment", "kata", "bilang"],
        TransitionHint::Popup,
    ),
];

/// Pick an entry transition from the keyword's semantic cluster.
pub fn select_transition(keyword: &str) -> TransitionHint {
    let keyword = keyword.to_lowercase();
    TRANSITION_CLUSTERS
        .iter()
        .find(|(words, _)| words.iter().any(|w| keyword.contains(w)))
        .map(|(_, hint)| *hint)
        .unwrap_or(TransitionHint::BounceIn)
}

/// Sound-effect cue triggered by a spoken word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SfxCue {
    Impact,
    Funny,
    Pop,
}

impl SfxCue {
    /// File-name fragment used to find a matching sound effect.
    pub fn as_str(&self) -> &'static str {
        match self {
            SfxCue::Impact => "impact",
            SfxCue::Funny => "funny",
            SfxCue::Pop => "pop",
        }
    }
}

/// Cue for a word, if it is one of the sfx trigger words.
pub fn sfx_cue_for(word: &str) -> Option<SfxCue> {
    match normalize_word(word).as_str() {
        "wow" | "gila" | "boom" => Some(SfxCue::Impact),
        "lucu" | "kocak" | "ngakak" => Some(SfxCue::Funny),
        "pop" | "muncul" => Some(SfxCue::Pop),
        _ => None,
    }
}
