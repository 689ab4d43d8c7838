//! Conversation router engine
//!
//! `ConversationRouter` owns the session store and orchestrates the pipeline
//! for every turn: parse the user-id prefix, load or create the session,
//! look up the profile, classify for abuse, update counters, extract an
//! order id, assess focus, produce the core reply, and dispatch the policy
//! table. The first turn of a session short-circuits into the greeting and
//! runs no classifier.

use crate::classify::{
    AbuseClassifier, Detection, FocusAssessment, FocusAssessor, KeywordAbuseClassifier,
    KeywordFocusAssessor,
};
use crate::config::{RouterConfig, TemplatesConfig};
use crate::directory::{CustomerDirectory, DEFAULT_USER_ID};
use crate::error::{Error, Result};
use crate::responder::StandardResponder;
use crate::router::extract::OrderIdExtractor;
use crate::router::policy::{
    self, Appendix, Body, FlaggedRoundEffect, Notice, PolicyInput, RouterAction, TurnBucket,
};
use crate::router::session::{ConversationStatus, SessionStore};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Structured result of one routed turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResult {
    /// Outward response text
    pub response: String,

    /// Action label for this turn
    pub action: RouterAction,

    /// Resolved user id
    pub user_id: String,

    /// Updated turn count
    pub turn_count: u32,

    /// Detection record; absent on the greeting turn
    pub detection: Option<Detection>,

    /// Conversation status after this turn
    pub status: ConversationStatus,

    /// Cumulative abusive-turn count
    pub total_abuse_count: u32,

    /// Run length of back-to-back abusive turns
    pub consecutive_abuse: u32,

    /// Whether the turn should be escalated to a human
    pub escalate_to_human_system: bool,

    /// Whether the user should be queued for review
    pub flag_user_for_review_system: bool,
}

/// Rule-driven conversation router.
///
/// Owns per-user session state; `route` takes `&mut self`, so callers supply
/// concurrency control when sharing a router across clients.
pub struct ConversationRouter {
    config: RouterConfig,
    directory: CustomerDirectory,
    abuse: Box<dyn AbuseClassifier>,
    focus: Box<dyn FocusAssessor>,
    responder: StandardResponder,
    extractor: OrderIdExtractor,
    user_pattern: Option<Regex>,
    sessions: SessionStore,
}

impl ConversationRouter {
    /// Create a router with the keyword-heuristic classifiers.
    pub fn new(config: RouterConfig) -> Result<Self> {
        let abuse = Box::new(KeywordAbuseClassifier::new(config.classifier.clone()));
        let focus = Box::new(KeywordFocusAssessor::new(config.focus.clone()));
        Self::with_classifiers(config, abuse, focus)
    }

    /// Create a router with caller-supplied classifier implementations.
    pub fn with_classifiers(
        config: RouterConfig,
        abuse: Box<dyn AbuseClassifier>,
        focus: Box<dyn FocusAssessor>,
    ) -> Result<Self> {
        let extractor = OrderIdExtractor::new(&config.extractor)?;
        let user_pattern = build_user_pattern(&config.known_users)?;
        let directory = CustomerDirectory::new(config.directory.clone());
        let responder = StandardResponder::new(config.responder.clone());
        Ok(Self {
            config,
            directory,
            abuse,
            focus,
            responder,
            extractor,
            user_pattern,
            sessions: SessionStore::new(),
        })
    }

    /// Read access to the session store.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Mutable access to the session store (session resets, cleanup).
    pub fn sessions_mut(&mut self) -> &mut SessionStore {
        &mut self.sessions
    }

    /// Route one raw input (optionally `"<user_id>: <message>"`) and produce
    /// the turn result. Never fails: unknown ids and non-matching patterns
    /// degrade to defaults.
    pub fn route(&mut self, raw: &str) -> TurnResult {
        let (user_id, message) = self.parse_input(raw);

        // First contact: greet, ask for an order id, run nothing else.
        if self
            .sessions
            .get(&user_id)
            .map_or(true, |s| s.turn_count == 0)
        {
            let greeting = self.config.templates.greeting.clone();
            let session = self.sessions.get_or_create(&user_id);
            session.turn_count += 1;
            session.order_details_requested = true;
            session.push_ai(&greeting);
            tracing::info!(user_id = %user_id, session = %session.id, "greeted new conversation");
            return TurnResult {
                response: greeting,
                action: RouterAction::InitialGreeting,
                user_id,
                turn_count: session.turn_count,
                detection: None,
                status: session.status,
                total_abuse_count: session.abuse_count,
                consecutive_abuse: session.consecutive_abuse_count,
                escalate_to_human_system: false,
                flag_user_for_review_system: false,
            };
        }

        // The full pipeline runs on every non-greeting turn regardless of
        // which policy row ends up firing.
        let profile = self.directory.profile(&user_id);
        let tier = profile.tier(&self.config.tier);
        let detection = self.abuse.analyze(&message);
        let is_abuse = detection.is_abuse();
        let order_id = self.extractor.extract(&message);
        if let Some(id) = order_id.as_deref() {
            let details = self.directory.order(id);
            tracing::info!(user_id = %user_id, order_id = id, ?details, "order id found in message");
        }

        let session = self.sessions.get_or_create(&user_id);
        session.turn_count += 1;
        let turn = session.turn_count;
        session.push_user(&message);
        session.record_classification(is_abuse);

        tracing::info!(
            user_id = %user_id,
            turn,
            category = %detection.category,
            "routing message"
        );

        let prior_history = &session.history[..session.history.len() - 1];
        let focus = self.focus.assess(prior_history, &message);
        let core_reply = self.responder.reply(&message);

        let input = PolicyInput {
            bucket: TurnBucket::from_turn(turn),
            abusive: is_abuse,
            focus: focus.status,
            tier,
            flagged_round: session.abuse_flagged_round,
            known_prankster: profile.is_flagged_prankster,
            malice: focus.flag_potential_malice,
        };
        let outcome = policy::dispatch(&input);

        let mut action = outcome.action;
        let mut response = render_body(
            &self.config.templates,
            outcome.body,
            &core_reply,
            &detection,
            &focus,
        );

        // Sustained abuse from a non-valued customer terminates when the
        // message carries neither an order id nor any on-topic keyword.
        if outcome.termination_check
            && order_id.is_none()
            && !self.extractor.mentions_relevant_topic(&message)
        {
            response.push_str("\n\n");
            response.push_str(&self.config.templates.termination_notice);
            action = RouterAction::AiOnlyModeNonValuedAbuseStrictTerminated;
        }

        if let Some(status) = outcome.status {
            session.status = status;
        }
        match outcome.flagged_round {
            FlaggedRoundEffect::Keep => {}
            FlaggedRoundEffect::MarkCurrentTurn => session.abuse_flagged_round = turn,
            FlaggedRoundEffect::Clear => session.abuse_flagged_round = 0,
        }
        session.push_ai(&response);

        match action {
            RouterAction::EscalateToSecuritySpecialistMaliceDetected => {
                tracing::error!(user_id = %user_id, turn, action = %action, "security escalation");
            }
            RouterAction::QueryRespondedAbuseInformalNotice
            | RouterAction::AiOnlyModeValuedAbuseFocused
            | RouterAction::AiOnlyModeNonValuedAbuseStrict
            | RouterAction::AiOnlyModeNonValuedAbuseStrictTerminated
            | RouterAction::ResteerOffTopicSuspicious => {
                tracing::warn!(user_id = %user_id, turn, action = %action, "turn routed");
            }
            _ => {
                tracing::info!(user_id = %user_id, turn, action = %action, "turn routed");
            }
        }

        TurnResult {
            response,
            action,
            user_id,
            turn_count: turn,
            detection: Some(detection),
            status: session.status,
            total_abuse_count: session.abuse_count,
            consecutive_abuse: session.consecutive_abuse_count,
            escalate_to_human_system: outcome.escalate,
            flag_user_for_review_system: outcome.review,
        }
    }

    /// Split an optional `"<user_id>: <message>"` prefix. Unrecognized
    /// prefixes leave the whole input as the message for the default user.
    fn parse_input(&self, raw: &str) -> (String, String) {
        if let Some(pattern) = &self.user_pattern {
            if let Some(caps) = pattern.captures(raw) {
                let user_id = caps[1].to_lowercase();
                let message = caps
                    .get(2)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default();
                return (user_id, message);
            }
        }
        (DEFAULT_USER_ID.to_string(), raw.to_string())
    }
}

/// Build the user-id prefix recognizer from the known-id set.
fn build_user_pattern(known_users: &[String]) -> Result<Option<Regex>> {
    if known_users.is_empty() {
        return Ok(None);
    }
    let alternation = known_users
        .iter()
        .map(|u| regex::escape(u))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"(?i)^({}):?\s*(.*)", alternation);
    Regex::new(&pattern)
        .map(Some)
        .map_err(|e| Error::Config(format!("Invalid user-id pattern: {}", e)))
}

/// Render the outcome's response body.
fn render_body(
    templates: &TemplatesConfig,
    body: Body,
    core_reply: &str,
    detection: &Detection,
    focus: &FocusAssessment,
) -> String {
    match body {
        Body::Core => core_reply.to_string(),
        Body::CoreWith(appendix) => {
            format!("{}\n\n{}", core_reply, appendix_text(templates, appendix))
        }
        Body::Fixed(notice) => notice_text(templates, notice, detection, focus),
    }
}

fn appendix_text(templates: &TemplatesConfig, appendix: Appendix) -> &str {
    match appendix {
        Appendix::GraceWarning => &templates.grace_warning,
        Appendix::FormalNotice => &templates.formal_notice,
        Appendix::SoftResteer => &templates.soft_resteer,
        Appendix::Redemption => &templates.redemption,
        Appendix::LongTermRedemption => &templates.long_term_redemption,
        Appendix::ValuedReminder => &templates.valued_reminder,
    }
}

fn notice_text(
    templates: &TemplatesConfig,
    notice: Notice,
    detection: &Detection,
    focus: &FocusAssessment,
) -> String {
    match notice {
        Notice::KnownPrankster => templates.known_prankster.clone(),
        Notice::SecurityEscalation => templates
            .security_escalation
            .replace("{focus_status}", &focus.status.to_string())
            .replace("{reason}", &focus.reason),
        Notice::StrictRefusal => templates
            .strict_refusal
            .replace("{category}", &detection.category.to_string()),
        Notice::SuspiciousResteer => templates
            .suspicious_resteer
            .replace("{focus_status}", &focus.status.to_string())
            .replace("{reason}", &focus.reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::DetectionCategory;

    fn router() -> ConversationRouter {
        ConversationRouter::new(RouterConfig::default()).unwrap()
    }

    /// Route past the greeting so the next call lands on `turn`.
    fn advance_to(router: &mut ConversationRouter, user: &str, turn: u32) {
        router.route(&format!("{}: ", user));
        for _ in 2..turn {
            router.route(&format!("{}: where is my package?", user));
        }
    }

    #[test]
    fn test_first_contact_greets_without_classification() {
        let mut router = router();
        let result = router.route("user_new: ");

        assert_eq!(result.action, RouterAction::InitialGreeting);
        assert_eq!(result.turn_count, 1);
        assert!(result.detection.is_none());
        assert_eq!(result.total_abuse_count, 0);
        assert_eq!(result.consecutive_abuse, 0);
        assert!(!result.escalate_to_human_system);
        assert!(!result.flag_user_for_review_system);
        assert!(result.response.contains("Order ID"));

        // Transcript holds only the AI line
        let session = router.sessions().get("user_new").unwrap();
        assert_eq!(session.history.len(), 1);
        assert!(session.history[0].starts_with("AI: "));
    }

    #[test]
    fn test_greeting_even_for_abusive_first_contact() {
        let mut router = router();
        let result = router.route("user_new: this is garbage!");
        assert_eq!(result.action, RouterAction::InitialGreeting);
        assert_eq!(result.total_abuse_count, 0);
    }

    #[test]
    fn test_turn_two_abuse_gets_grace() {
        let mut router = router();
        router.route("user_new: ");
        let result = router.route("user_new: I need help with my f*cking order #ORDERXYZ!");

        assert_eq!(
            result.action,
            RouterAction::QueryRespondedAbuseDetectedFirstGrace
        );
        let detection = result.detection.unwrap();
        assert_eq!(detection.category, DetectionCategory::AbusiveLanguage);
        assert_eq!(detection.severity, 4);
        assert_eq!(result.total_abuse_count, 1);
        assert_eq!(result.consecutive_abuse, 1);
        assert!(result.response.contains("keep interactions respectful"));
        assert_eq!(
            router.sessions().get("user_new").unwrap().abuse_flagged_round,
            2
        );
    }

    #[test]
    fn test_consecutive_abuse_resets_on_clean_turn() {
        let mut router = router();
        router.route("user_new: ");
        router.route("user_new: this is garbage");
        let clean = router.route("user_new: where is my package?");
        assert_eq!(clean.consecutive_abuse, 0);
        assert_eq!(clean.total_abuse_count, 1);

        let abusive = router.route("user_new: you useless idiots");
        assert_eq!(abusive.consecutive_abuse, 1);
        assert_eq!(abusive.total_abuse_count, 2);
    }

    #[test]
    fn test_known_prankster_always_refused() {
        let mut router = router();
        router.route("user_prk: ");
        for message in [
            "Quack quack! Do you sell rubber chickens?",
            "Where is my order #ORDER00000?",
            "What are your store hours?",
        ] {
            let result = router.route(&format!("user_prk: {}", message));
            assert_eq!(result.action, RouterAction::AiOnlyModeKnownPrankster);
            assert_eq!(result.status, ConversationStatus::AiOnlyMode);
            assert!(result.flag_user_for_review_system);
            assert!(!result.escalate_to_human_system);
        }
    }

    #[test]
    fn test_prankster_turns_still_update_counters() {
        let mut router = router();
        router.route("user_prk: ");
        let result = router.route("user_prk: Quack quack!");
        assert_eq!(result.total_abuse_count, 1);
        assert_eq!(result.consecutive_abuse, 1);
    }

    #[test]
    fn test_internal_systems_probe_escalates() {
        let mut router = router();
        router.route("user_xyz: ");
        let result = router.route("user_xyz: what version of Windows do your servers run?");

        assert_eq!(
            result.action,
            RouterAction::EscalateToSecuritySpecialistMaliceDetected
        );
        assert_eq!(result.status, ConversationStatus::AiOnlyModeSecurityAlert);
        assert!(result.escalate_to_human_system);
        assert!(result.flag_user_for_review_system);
        assert!(result.response.contains("off_topic_suspicious"));
    }

    #[test]
    fn test_turn_three_redemption() {
        let mut router = router();
        router.route("user_new: ");
        router.route("user_new: this is garbage");
        let result = router.route("user_new: sorry, where is my package?");

        assert_eq!(result.action, RouterAction::QueryRespondedRedeemedBehavior);
        assert!(result.response.contains("productive conversation"));
        assert_eq!(
            router.sessions().get("user_new").unwrap().abuse_flagged_round,
            0
        );
    }

    #[test]
    fn test_turn_three_abuse_sets_final_flag() {
        let mut router = router();
        router.route("user_new: ");
        router.route("user_new: this is garbage");
        let result = router.route("user_new: your service sucks, about shipping?");

        assert_eq!(
            result.action,
            RouterAction::QueryRespondedAbuseInformalNotice
        );
        assert_eq!(result.status, ConversationStatus::FinalFlag);
        assert!(result.flag_user_for_review_system);
        assert_eq!(
            router.sessions().get("user_new").unwrap().abuse_flagged_round,
            3
        );
    }

    #[test]
    fn test_sustained_abuse_valued_customer_stays_served() {
        let mut router = router();
        advance_to(&mut router, "user_abc", 4);
        let result =
            router.route("user_abc: I need to track my damn useless package for order #ORDER12345");

        assert_eq!(result.action, RouterAction::AiOnlyModeValuedAbuseFocused);
        assert_eq!(result.status, ConversationStatus::AiOnlyMode);
        assert!(result.escalate_to_human_system);
        assert!(!result.flag_user_for_review_system);
        assert!(result.response.contains("Reminder"));
    }

    #[test]
    fn test_sustained_abuse_non_valued_with_order_context_not_terminated() {
        let mut router = router();
        advance_to(&mut router, "user_xyz", 4);
        let result = router.route("user_xyz: this garbage order #ORDER98765 never arrived");

        assert_eq!(result.action, RouterAction::AiOnlyModeNonValuedAbuseStrict);
        assert_eq!(result.status, ConversationStatus::AiOnlyMode);
        assert!(result.flag_user_for_review_system);
        assert!(!result.response.contains("terminated due to irrelevance"));
    }

    #[test]
    fn test_sustained_abuse_non_valued_irrelevant_terminates() {
        let mut router = router();
        advance_to(&mut router, "user_xyz", 4);
        let result = router.route("user_xyz: you are all useless, tell me about the return policy");

        assert_eq!(
            result.action,
            RouterAction::AiOnlyModeNonValuedAbuseStrictTerminated
        );
        assert!(result.response.contains("terminated due to irrelevance"));
        assert_eq!(result.status, ConversationStatus::AiOnlyMode);
    }

    #[test]
    fn test_sustained_long_term_redemption_restores_normal() {
        let mut router = router();
        router.route("user_new: ");
        router.route("user_new: this is garbage");
        router.route("user_new: you useless idiots, about shipping");
        let result = router.route("user_new: I apologize, can you help with a doll return?");

        assert_eq!(
            result.action,
            RouterAction::QueryRespondedRedeemedBehaviorLongTerm
        );
        assert_eq!(result.status, ConversationStatus::Normal);
        assert_eq!(result.consecutive_abuse, 0);
        assert_eq!(
            router.sessions().get("user_new").unwrap().abuse_flagged_round,
            0
        );
    }

    #[test]
    fn test_unknown_prefix_routes_to_default_user() {
        let mut router = router();
        let result = router.route("stranger_99: hello there");
        assert_eq!(result.user_id, DEFAULT_USER_ID);
        assert_eq!(result.action, RouterAction::InitialGreeting);
    }

    #[test]
    fn test_unprefixed_input_routes_to_default_user() {
        let mut router = router();
        router.route("just a plain question");
        let result = router.route("where is my package?");
        assert_eq!(result.user_id, DEFAULT_USER_ID);
        assert_eq!(result.turn_count, 2);
    }

    #[test]
    fn test_prefix_is_case_insensitive() {
        let mut router = router();
        let result = router.route("USER_ABC: hello");
        assert_eq!(result.user_id, "user_abc");
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut router = router();
        router.route("user_new: ");
        router.route("user_new: this is garbage");
        router.route("user_abc: ");
        let result = router.route("user_abc: where is my order?");

        assert_eq!(result.total_abuse_count, 0);
        assert_eq!(result.turn_count, 2);
        assert_eq!(router.sessions().len(), 2);
    }

    #[test]
    fn test_transcript_records_both_sides() {
        let mut router = router();
        router.route("user_abc: ");
        router.route("user_abc: where is my package?");

        let session = router.sessions().get("user_abc").unwrap();
        assert_eq!(session.history.len(), 3);
        assert!(session.history[1].starts_with("User: "));
        assert!(session.history[2].starts_with("AI: "));
    }

    #[test]
    fn test_turn_count_increases_by_one_per_call() {
        let mut router = router();
        for expected in 1..=6 {
            let result = router.route("user_5: hello, any dolls?");
            assert_eq!(result.turn_count, expected);
        }
    }

    #[test]
    fn test_custom_classifier_substitution() {
        struct AlwaysAbusive;
        impl AbuseClassifier for AlwaysAbusive {
            fn analyze(&self, _message: &str) -> Detection {
                Detection {
                    category: DetectionCategory::AbusiveLanguage,
                    severity: 4,
                    reason: "test stub".to_string(),
                }
            }
        }

        let mut router = ConversationRouter::with_classifiers(
            RouterConfig::default(),
            Box::new(AlwaysAbusive),
            Box::new(KeywordFocusAssessor::default()),
        )
        .unwrap();

        router.route("user_new: ");
        let result = router.route("user_new: a perfectly polite message");
        assert_eq!(
            result.action,
            RouterAction::QueryRespondedAbuseDetectedFirstGrace
        );
    }
}
