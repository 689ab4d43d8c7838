//! Conversation-focus assessment
//!
//! Keyword-heuristic assessor that decides whether a message stays within the
//! customer-service topic domain. Probing for internal systems is treated as
//! potentially malicious; personal chit-chat is merely off-topic. The
//! suspicious set is checked first.

use super::traits::FocusAssessor;
use crate::config::FocusConfig;
use serde::{Deserialize, Serialize};

/// Focus status of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusStatus {
    /// Within the expected topic domain
    OnTopic,
    /// Personal or irrelevant, but harmless
    SlightlyOffTopic,
    /// Probing internal systems
    OffTopicSuspicious,
}

impl std::fmt::Display for FocusStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FocusStatus::OnTopic => write!(f, "on_topic"),
            FocusStatus::SlightlyOffTopic => write!(f, "slightly_off_topic"),
            FocusStatus::OffTopicSuspicious => write!(f, "off_topic_suspicious"),
        }
    }
}

/// Result of focus assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusAssessment {
    /// Focus status
    pub status: FocusStatus,
    /// Human-readable reason
    pub reason: String,
    /// Whether the message looks like a probe worth escalating
    pub flag_potential_malice: bool,
}

const SUSPICIOUS_REASON: &str = "Asking about internal systems.";
const PERSONAL_REASON: &str = "Personal or irrelevant question.";
const ON_TOPIC_REASON: &str = "On topic.";

/// Keyword-heuristic focus assessor.
#[derive(Debug)]
pub struct KeywordFocusAssessor {
    suspicious_terms: Vec<String>,
    personal_terms: Vec<String>,
}

impl KeywordFocusAssessor {
    /// Create an assessor from the configured keyword sets.
    pub fn new(config: FocusConfig) -> Self {
        Self {
            suspicious_terms: config
                .suspicious_terms
                .into_iter()
                .map(|t| t.to_lowercase())
                .collect(),
            personal_terms: config
                .personal_terms
                .into_iter()
                .map(|t| t.to_lowercase())
                .collect(),
        }
    }
}

impl Default for KeywordFocusAssessor {
    fn default() -> Self {
        Self::new(FocusConfig::default())
    }
}

impl FocusAssessor for KeywordFocusAssessor {
    fn assess(&self, _history: &[String], message: &str) -> FocusAssessment {
        let lower = message.to_lowercase();

        if self.suspicious_terms.iter().any(|t| lower.contains(t.as_str())) {
            return FocusAssessment {
                status: FocusStatus::OffTopicSuspicious,
                reason: SUSPICIOUS_REASON.to_string(),
                flag_potential_malice: true,
            };
        }
        if self.personal_terms.iter().any(|t| lower.contains(t.as_str())) {
            return FocusAssessment {
                status: FocusStatus::SlightlyOffTopic,
                reason: PERSONAL_REASON.to_string(),
                flag_potential_malice: false,
            };
        }

        FocusAssessment {
            status: FocusStatus::OnTopic,
            reason: ON_TOPIC_REASON.to_string(),
            flag_potential_malice: false,
        }
    }
}
