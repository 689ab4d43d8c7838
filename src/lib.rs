//! FilterFlow - Rule-Driven Customer Service Conversation Router
//!
//! FilterFlow simulates a customer-service agent: each incoming message is
//! screened for abuse and prank content, assessed for topical focus, matched
//! against a mock customer/order directory, and answered through one of ~15
//! scripted response/escalation strategies selected by a turn-indexed policy
//! table.
//!
//! ## Pipeline
//!
//! ```text
//! raw input ("user_id: message")
//!   → prefix parse → session load/create
//!   → CustomerDirectory (profile + opportunistic order lookup)
//!   → AbuseClassifier (keyword heuristic) → counter updates
//!   → FocusAssessor (keyword heuristic)
//!   → StandardResponder (canned replies)
//!   → policy table dispatch → TurnResult + session mutation
//! ```
//!
//! The first turn of every session short-circuits into a fixed greeting and
//! runs no classifier. Directory-flagged pranksters and suspected malicious
//! probing override the turn-indexed policy.
//!
//! Classifiers sit behind the [`AbuseClassifier`] and [`FocusAssessor`]
//! traits so model-backed implementations can replace the keyword heuristics
//! without touching router logic.
//!
//! ## Modules
//!
//! - [`router`]: session store, turn policy table, and the routing engine
//! - [`classify`]: abuse detection and conversation-focus assessment
//! - [`directory`]: mock customer/order lookup with defaulting
//! - [`responder`]: canned-reply standard responder
//! - [`config`]: keyword sets, templates, thresholds, and directory seed data
//!
//! ## Example
//!
//! ```
//! use filterflow::{ConversationRouter, RouterAction, RouterConfig};
//!
//! let mut router = ConversationRouter::new(RouterConfig::default()).unwrap();
//!
//! let greeting = router.route("user_new: ");
//! assert_eq!(greeting.action, RouterAction::InitialGreeting);
//!
//! let turn = router.route("user_new: where is my order #ORDERXYZ?");
//! assert_eq!(turn.action, RouterAction::QueryRespondedNormal);
//! ```

pub mod classify;
pub mod config;
pub mod directory;
pub mod error;
pub mod responder;
pub mod router;

pub use classify::{
    AbuseClassifier, Detection, DetectionCategory, FocusAssessment, FocusAssessor, FocusStatus,
    KeywordAbuseClassifier, KeywordFocusAssessor,
};
pub use config::RouterConfig;
pub use directory::{CustomerDirectory, CustomerProfile, CustomerTier, OrderDetails};
pub use error::{Error, Result};
pub use responder::StandardResponder;
pub use router::{ConversationRouter, ConversationStatus, RouterAction, SessionStore, TurnResult};
