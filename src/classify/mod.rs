//! Message classification — abuse detection and conversation-focus assessment

pub mod abuse;
pub mod focus;
pub mod traits;

pub use abuse::{Detection, DetectionCategory, KeywordAbuseClassifier};
pub use focus::{FocusAssessment, FocusStatus, KeywordFocusAssessor};
pub use traits::{AbuseClassifier, FocusAssessor};
