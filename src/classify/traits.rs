//! Trait definitions for the classification subsystem.
//!
//! Both classifiers are defined as traits so a model-backed implementation
//! can be substituted without touching router logic. The shipped
//! implementations are keyword heuristics.

use super::abuse::Detection;
use super::focus::FocusAssessment;

// ---------------------------------------------------------------------------
// AbuseClassifier — detects abusive language and prank calls
// ---------------------------------------------------------------------------

/// Classifies a message for abusive or prank content.
pub trait AbuseClassifier: Send + Sync {
    /// Analyze a message and return the detection record.
    fn analyze(&self, message: &str) -> Detection;
}

// ---------------------------------------------------------------------------
// FocusAssessor — decides whether the conversation stays on topic
// ---------------------------------------------------------------------------

/// Assesses whether a message stays within the expected topic domain.
pub trait FocusAssessor: Send + Sync {
    /// Assess the current message. `history` is the prior transcript; the
    /// keyword implementation matches only the current message.
    fn assess(&self, history: &[String], message: &str) -> FocusAssessment;
}
