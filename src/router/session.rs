//! Per-user conversation session state
//!
//! One `Session` per user id, created on first contact and mutated every
//! turn. The store is owned by the router instance; callers needing
//! multi-client access supply their own concurrency control.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Conversation status, escalating except on explicit redemption paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    /// Default state
    Normal,
    /// Human handoff withdrawn; AI-only handling
    AiOnlyMode,
    /// AI-only handling with an active security escalation
    AiOnlyModeSecurityAlert,
    /// Final warning issued before AI-only handling
    FinalFlag,
}

impl std::fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversationStatus::Normal => write!(f, "normal"),
            ConversationStatus::AiOnlyMode => write!(f, "ai_only_mode"),
            ConversationStatus::AiOnlyModeSecurityAlert => {
                write!(f, "ai_only_mode_security_alert")
            }
            ConversationStatus::FinalFlag => write!(f, "final_flag"),
        }
    }
}

/// Per-user conversation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Session instance id, used for log correlation
    pub id: String,

    /// Owning user id
    pub user_id: String,

    /// Turns completed, including the greeting
    pub turn_count: u32,

    /// Cumulative count of abusive/prank turns
    pub abuse_count: u32,

    /// Run length of back-to-back abusive turns
    pub consecutive_abuse_count: u32,

    /// Turn that first triggered a grace-period warning (0 when clear)
    pub abuse_flagged_round: u32,

    /// Whether the most recent classified turn was abusive
    pub last_input_was_abuse: bool,

    /// Current conversation status
    pub status: ConversationStatus,

    /// Whether the greeting asked for an order id
    pub order_details_requested: bool,

    /// Append-only turn transcript ("User: …" / "AI: …")
    pub history: Vec<String>,

    /// Session creation time
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Create a fresh session for a user.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            turn_count: 0,
            abuse_count: 0,
            consecutive_abuse_count: 0,
            abuse_flagged_round: 0,
            last_input_was_abuse: false,
            status: ConversationStatus::Normal,
            order_details_requested: false,
            history: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Update the abuse counters for the current turn's classification.
    pub fn record_classification(&mut self, is_abuse: bool) {
        if is_abuse {
            self.abuse_count += 1;
            self.consecutive_abuse_count += 1;
            self.last_input_was_abuse = true;
        } else {
            self.consecutive_abuse_count = 0;
            self.last_input_was_abuse = false;
        }
    }

    /// Append a user line to the transcript.
    pub fn push_user(&mut self, message: &str) {
        self.history.push(format!("User: {}", message));
    }

    /// Append an AI line to the transcript.
    pub fn push_ai(&mut self, response: &str) {
        self.history.push(format!("AI: {}", response));
    }
}

/// Session store keyed by user id, owned by the router.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<String, Session>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a session if it exists.
    pub fn get(&self, user_id: &str) -> Option<&Session> {
        self.sessions.get(user_id)
    }

    /// Get a session, creating it on first contact.
    pub fn get_or_create(&mut self, user_id: &str) -> &mut Session {
        self.sessions
            .entry(user_id.to_string())
            .or_insert_with(|| {
                tracing::info!(user_id, "created conversation session");
                Session::new(user_id)
            })
    }

    /// Drop a user's session. Returns whether one existed.
    pub fn reset(&mut self, user_id: &str) -> bool {
        self.sessions.remove(user_id).is_some()
    }

    /// Drop all sessions.
    pub fn clear(&mut self) {
        self.sessions.clear();
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
