//! Conversation routing core — session state, turn policy, and the engine

mod engine;
mod extract;
mod policy;
mod session;

pub use engine::{ConversationRouter, TurnResult};
pub use extract::OrderIdExtractor;
pub use policy::{
    Appendix, Body, FlaggedRoundEffect, FocusMatch, Notice, Outcome, PolicyInput, RouterAction,
    TurnBucket,
};
pub use session::{ConversationStatus, Session, SessionStore};
