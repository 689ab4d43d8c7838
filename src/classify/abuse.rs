//! Abuse detection
//!
//! Keyword-heuristic classifier that sorts a message into
//! {abusive_language, prank_call, normal_query} with a severity score.
//! Keyword sets are checked in fixed priority order: abusive terms first,
//! prank terms second, first matching set wins.

use super::traits::AbuseClassifier;
use crate::config::ClassifierConfig;
use serde::{Deserialize, Serialize};

/// Detection category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionCategory {
    /// Offensive or insulting language
    AbusiveLanguage,
    /// Prank-call content
    PrankCall,
    /// Legitimate query
    NormalQuery,
}

impl std::fmt::Display for DetectionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectionCategory::AbusiveLanguage => write!(f, "abusive_language"),
            DetectionCategory::PrankCall => write!(f, "prank_call"),
            DetectionCategory::NormalQuery => write!(f, "normal_query"),
        }
    }
}

/// Result of abuse classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Detected category
    pub category: DetectionCategory,
    /// Severity score (4 for abusive language, 2 for pranks, 0 otherwise)
    pub severity: u8,
    /// Human-readable reason
    pub reason: String,
}

impl Detection {
    /// Whether this detection counts as an abusive turn.
    pub fn is_abuse(&self) -> bool {
        self.category != DetectionCategory::NormalQuery && self.severity > 0
    }
}

/// Severity assigned to abusive-language matches
const ABUSIVE_SEVERITY: u8 = 4;
/// Severity assigned to prank matches
const PRANK_SEVERITY: u8 = 2;

const ABUSIVE_REASON: &str = "Detected offensive terms.";
const PRANK_REASON: &str = "Detected prank keywords.";
const NORMAL_REASON: &str = "General query.";

/// Keyword-heuristic abuse classifier.
///
/// Matches case-insensitive substrings against the configured term sets.
#[derive(Debug)]
pub struct KeywordAbuseClassifier {
    abusive_terms: Vec<String>,
    prank_terms: Vec<String>,
}

impl KeywordAbuseClassifier {
    /// Create a classifier from the configured keyword sets.
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            abusive_terms: lowercase_all(config.abusive_terms),
            prank_terms: lowercase_all(config.prank_terms),
        }
    }
}

impl Default for KeywordAbuseClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl AbuseClassifier for KeywordAbuseClassifier {
    fn analyze(&self, message: &str) -> Detection {
        let lower = message.to_lowercase();

        if contains_any(&lower, &self.abusive_terms) {
            return Detection {
                category: DetectionCategory::AbusiveLanguage,
                severity: ABUSIVE_SEVERITY,
                reason: ABUSIVE_REASON.to_string(),
            };
        }
        if contains_any(&lower, &self.prank_terms) {
            return Detection {
                category: DetectionCategory::PrankCall,
                severity: PRANK_SEVERITY,
                reason: PRANK_REASON.to_string(),
            };
        }

        Detection {
            category: DetectionCategory::NormalQuery,
            severity: 0,
            reason: NORMAL_REASON.to_string(),
        }
    }
}

fn lowercase_all(terms: Vec<String>) -> Vec<String> {
    terms.into_iter().map(|t| t.to_lowercase()).collect()
}

fn contains_any(lower: &str, terms: &[String]) -> bool {
    terms.iter().any(|t| lower.contains(t.as_str()))
}
