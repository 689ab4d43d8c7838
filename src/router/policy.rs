//! Turn policy table
//!
//! The per-turn decision logic is a declarative rule table over
//! `(turn bucket, abuse state, focus state, customer tier, flagged round)`
//! plus the two directory/assessment overrides (known prankster, potential
//! malice). Rules are evaluated in order; the first match wins and yields an
//! outcome descriptor the engine renders into a response and applies to the
//! session.

use crate::classify::FocusStatus;
use crate::directory::CustomerTier;
use crate::router::session::ConversationStatus;
use serde::{Deserialize, Serialize};

/// Action labels exposed in the turn result. Wire labels are the
/// SCREAMING_SNAKE_CASE form of the variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouterAction {
    /// First-contact greeting
    InitialGreeting,
    /// Normal canned/echo reply
    QueryRespondedNormal,
    /// Normal reply from the defensive fallback arm
    QueryRespondedFallbackNormal,
    /// First abusive turn, grace period applied
    QueryRespondedAbuseDetectedFirstGrace,
    /// Second abusive turn, formal notice issued
    QueryRespondedAbuseInformalNotice,
    /// Flagged user back on track
    QueryRespondedRedeemedBehavior,
    /// Flagged user back on track after multiple turns
    QueryRespondedRedeemedBehaviorLongTerm,
    /// Soft re-steer for harmless off-topic queries
    ResteerSlightlyOffTopic,
    /// Re-steer for suspicious off-topic queries
    ResteerOffTopicSuspicious,
    /// Directory-flagged prankster refusal
    AiOnlyModeKnownPrankster,
    /// Sustained abuse from a valued customer, query still served
    AiOnlyModeValuedAbuseFocused,
    /// Sustained abuse from a non-valued customer, strict refusal
    AiOnlyModeNonValuedAbuseStrict,
    /// Strict refusal plus conversation termination
    AiOnlyModeNonValuedAbuseStrictTerminated,
    /// Security escalation for suspected malicious probing
    EscalateToSecuritySpecialistMaliceDetected,
}

impl RouterAction {
    /// Stable wire label for the action.
    pub fn label(&self) -> &'static str {
        match self {
            RouterAction::InitialGreeting => "INITIAL_GREETING",
            RouterAction::QueryRespondedNormal => "QUERY_RESPONDED_NORMAL",
            RouterAction::QueryRespondedFallbackNormal => "QUERY_RESPONDED_FALLBACK_NORMAL",
            RouterAction::QueryRespondedAbuseDetectedFirstGrace => {
                "QUERY_RESPONDED_ABUSE_DETECTED_FIRST_GRACE"
            }
            RouterAction::QueryRespondedAbuseInformalNotice => {
                "QUERY_RESPONDED_ABUSE_INFORMAL_NOTICE"
            }
            RouterAction::QueryRespondedRedeemedBehavior => "QUERY_RESPONDED_REDEEMED_BEHAVIOR",
            RouterAction::QueryRespondedRedeemedBehaviorLongTerm => {
                "QUERY_RESPONDED_REDEEMED_BEHAVIOR_LONG_TERM"
            }
            RouterAction::ResteerSlightlyOffTopic => "RESTEER_SLIGHTLY_OFF_TOPIC",
            RouterAction::ResteerOffTopicSuspicious => "RESTEER_OFF_TOPIC_SUSPICIOUS",
            RouterAction::AiOnlyModeKnownPrankster => "AI_ONLY_MODE_KNOWN_PRANKSTER",
            RouterAction::AiOnlyModeValuedAbuseFocused => "AI_ONLY_MODE_VALUED_ABUSE_FOCUSED",
            RouterAction::AiOnlyModeNonValuedAbuseStrict => "AI_ONLY_MODE_NON_VALUED_ABUSE_STRICT",
            RouterAction::AiOnlyModeNonValuedAbuseStrictTerminated => {
                "AI_ONLY_MODE_NON_VALUED_ABUSE_STRICT_TERMINATED"
            }
            RouterAction::EscalateToSecuritySpecialistMaliceDetected => {
                "ESCALATE_TO_SECURITY_SPECIALIST_MALICE_DETECTED"
            }
        }
    }
}

impl std::fmt::Display for RouterAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse turn grouping the policy branches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnBucket {
    /// Turn 2 — first real query after the greeting
    FirstQuery,
    /// Turn 3 — second query, formal-notice territory
    SecondQuery,
    /// Turn 4 and later
    Sustained,
    /// Defensive arm for turn values the table never produces
    Fallback,
}

impl TurnBucket {
    /// Bucket a turn counter. Turn 1 is the greeting and never reaches the
    /// policy table.
    pub fn from_turn(turn: u32) -> Self {
        match turn {
            2 => TurnBucket::FirstQuery,
            3 => TurnBucket::SecondQuery,
            t if t >= 4 => TurnBucket::Sustained,
            _ => TurnBucket::Fallback,
        }
    }
}

/// Focus predicate used by rule matchers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMatch {
    /// Exactly `OffTopicSuspicious`
    Suspicious,
    /// Exactly `SlightlyOffTopic`
    SlightlyOff,
    /// Anything other than `OnTopic`
    AnyOffTopic,
}

impl FocusMatch {
    fn matches(self, status: FocusStatus) -> bool {
        match self {
            FocusMatch::Suspicious => status == FocusStatus::OffTopicSuspicious,
            FocusMatch::SlightlyOff => status == FocusStatus::SlightlyOffTopic,
            FocusMatch::AnyOffTopic => status != FocusStatus::OnTopic,
        }
    }
}

/// Flagged-round predicate used by rule matchers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlaggedMatch {
    /// Flagged exactly at the grace-period round
    ExactlyRoundTwo,
    /// Flagged at any round
    AnyRound,
}

impl FlaggedMatch {
    fn matches(self, flagged_round: u32) -> bool {
        match self {
            FlaggedMatch::ExactlyRoundTwo => flagged_round == 2,
            FlaggedMatch::AnyRound => flagged_round > 0,
        }
    }
}

/// Which text the outcome's response is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body {
    /// The standard responder's core reply alone
    Core,
    /// Core reply with an appendix joined by a blank line
    CoreWith(Appendix),
    /// A fixed notice replacing the core reply
    Fixed(Notice),
}

/// Appendix templates joined to the core reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appendix {
    GraceWarning,
    FormalNotice,
    SoftResteer,
    Redemption,
    LongTermRedemption,
    ValuedReminder,
}

/// Fixed notices replacing the core reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    KnownPrankster,
    SecurityEscalation,
    StrictRefusal,
    SuspiciousResteer,
}

/// Effect on the session's flagged round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlaggedRoundEffect {
    /// Leave as-is
    Keep,
    /// Record the current turn as the flagged round
    MarkCurrentTurn,
    /// Clear on redemption
    Clear,
}

/// Everything the engine needs to render and apply a matched rule
#[derive(Debug, Clone, Copy)]
pub struct Outcome {
    /// Action label
    pub action: RouterAction,
    /// Response body source
    pub body: Body,
    /// Status to force on the session, if any
    pub status: Option<ConversationStatus>,
    /// Raise the escalate-to-human system flag
    pub escalate: bool,
    /// Raise the flag-for-review system flag
    pub review: bool,
    /// Effect on the session's flagged round
    pub flagged_round: FlaggedRoundEffect,
    /// Whether the engine should run the irrelevance termination check
    pub termination_check: bool,
}

/// Per-turn facts the table is evaluated against
#[derive(Debug, Clone, Copy)]
pub struct PolicyInput {
    /// Turn bucket
    pub bucket: TurnBucket,
    /// Whether the current message classified as abusive/prank
    pub abusive: bool,
    /// Focus status of the current message
    pub focus: FocusStatus,
    /// Customer tier from the directory profile
    pub tier: CustomerTier,
    /// Session's flagged round before this turn's effects
    pub flagged_round: u32,
    /// Whether the directory flags the user as a prankster
    pub known_prankster: bool,
    /// Whether the focus assessment flagged potential malice
    pub malice: bool,
}

/// A single row of the policy table
struct PolicyRule {
    /// Require the directory prankster flag
    prankster: bool,
    /// Require the malice flag
    malice: bool,
    bucket: Option<TurnBucket>,
    abusive: Option<bool>,
    focus: Option<FocusMatch>,
    tier: Option<CustomerTier>,
    flagged: Option<FlaggedMatch>,
    outcome: Outcome,
}

impl PolicyRule {
    fn matches(&self, input: &PolicyInput) -> bool {
        if self.prankster && !input.known_prankster {
            return false;
        }
        if self.malice && !input.malice {
            return false;
        }
        if let Some(bucket) = self.bucket {
            if bucket != input.bucket {
                return false;
            }
        }
        if let Some(abusive) = self.abusive {
            if abusive != input.abusive {
                return false;
            }
        }
        if let Some(focus) = self.focus {
            if !focus.matches(input.focus) {
                return false;
            }
        }
        if let Some(tier) = self.tier {
            if tier != input.tier {
                return false;
            }
        }
        if let Some(flagged) = self.flagged {
            if !flagged.matches(input.flagged_round) {
                return false;
            }
        }
        true
    }
}

/// Shorthand for an outcome with no side effects beyond the action/body.
const fn plain(action: RouterAction, body: Body) -> Outcome {
    Outcome {
        action,
        body,
        status: None,
        escalate: false,
        review: false,
        flagged_round: FlaggedRoundEffect::Keep,
        termination_check: false,
    }
}

/// The policy table, first match wins. Overrides come first (directory
/// prankster flag, then malice), then the turn-bucket rows in the order the
/// conversation escalates, then the catch-all.
const POLICY: &[PolicyRule] = &[
    // Known prankster overrides everything
    PolicyRule {
        prankster: true,
        malice: false,
        bucket: None,
        abusive: None,
        focus: None,
        tier: None,
        flagged: None,
        outcome: Outcome {
            action: RouterAction::AiOnlyModeKnownPrankster,
            body: Body::Fixed(Notice::KnownPrankster),
            status: Some(ConversationStatus::AiOnlyMode),
            escalate: false,
            review: true,
            flagged_round: FlaggedRoundEffect::Keep,
            termination_check: false,
        },
    },
    // Suspected malicious probing escalates immediately
    PolicyRule {
        prankster: false,
        malice: true,
        bucket: None,
        abusive: None,
        focus: None,
        tier: None,
        flagged: None,
        outcome: Outcome {
            action: RouterAction::EscalateToSecuritySpecialistMaliceDetected,
            body: Body::Fixed(Notice::SecurityEscalation),
            status: Some(ConversationStatus::AiOnlyModeSecurityAlert),
            escalate: true,
            review: true,
            flagged_round: FlaggedRoundEffect::Keep,
            termination_check: false,
        },
    },
    // Turn 2: first abuse gets a grace-period warning
    PolicyRule {
        prankster: false,
        malice: false,
        bucket: Some(TurnBucket::FirstQuery),
        abusive: Some(true),
        focus: None,
        tier: None,
        flagged: None,
        outcome: Outcome {
            action: RouterAction::QueryRespondedAbuseDetectedFirstGrace,
            body: Body::CoreWith(Appendix::GraceWarning),
            status: None,
            escalate: false,
            review: false,
            flagged_round: FlaggedRoundEffect::MarkCurrentTurn,
            termination_check: false,
        },
    },
    PolicyRule {
        prankster: false,
        malice: false,
        bucket: Some(TurnBucket::FirstQuery),
        abusive: None,
        focus: None,
        tier: None,
        flagged: None,
        outcome: plain(RouterAction::QueryRespondedNormal, Body::Core),
    },
    // Turn 3: repeated abuse gets the formal notice
    PolicyRule {
        prankster: false,
        malice: false,
        bucket: Some(TurnBucket::SecondQuery),
        abusive: Some(true),
        focus: None,
        tier: None,
        flagged: None,
        outcome: Outcome {
            action: RouterAction::QueryRespondedAbuseInformalNotice,
            body: Body::CoreWith(Appendix::FormalNotice),
            status: Some(ConversationStatus::FinalFlag),
            escalate: false,
            review: true,
            flagged_round: FlaggedRoundEffect::MarkCurrentTurn,
            termination_check: false,
        },
    },
    PolicyRule {
        prankster: false,
        malice: false,
        bucket: Some(TurnBucket::SecondQuery),
        abusive: None,
        focus: Some(FocusMatch::AnyOffTopic),
        tier: None,
        flagged: None,
        outcome: plain(
            RouterAction::ResteerSlightlyOffTopic,
            Body::CoreWith(Appendix::SoftResteer),
        ),
    },
    PolicyRule {
        prankster: false,
        malice: false,
        bucket: Some(TurnBucket::SecondQuery),
        abusive: None,
        focus: None,
        tier: None,
        flagged: Some(FlaggedMatch::ExactlyRoundTwo),
        outcome: Outcome {
            action: RouterAction::QueryRespondedRedeemedBehavior,
            body: Body::CoreWith(Appendix::Redemption),
            status: None,
            escalate: false,
            review: false,
            flagged_round: FlaggedRoundEffect::Clear,
            termination_check: false,
        },
    },
    PolicyRule {
        prankster: false,
        malice: false,
        bucket: Some(TurnBucket::SecondQuery),
        abusive: None,
        focus: None,
        tier: None,
        flagged: None,
        outcome: plain(RouterAction::QueryRespondedNormal, Body::Core),
    },
    // Turn 4+: sustained abuse splits by customer tier
    PolicyRule {
        prankster: false,
        malice: false,
        bucket: Some(TurnBucket::Sustained),
        abusive: Some(true),
        focus: None,
        tier: Some(CustomerTier::Valued),
        flagged: None,
        outcome: Outcome {
            action: RouterAction::AiOnlyModeValuedAbuseFocused,
            body: Body::CoreWith(Appendix::ValuedReminder),
            status: Some(ConversationStatus::AiOnlyMode),
            escalate: true,
            review: false,
            flagged_round: FlaggedRoundEffect::Keep,
            termination_check: false,
        },
    },
    PolicyRule {
        prankster: false,
        malice: false,
        bucket: Some(TurnBucket::Sustained),
        abusive: Some(true),
        focus: None,
        tier: None,
        flagged: None,
        outcome: Outcome {
            action: RouterAction::AiOnlyModeNonValuedAbuseStrict,
            body: Body::Fixed(Notice::StrictRefusal),
            status: Some(ConversationStatus::AiOnlyMode),
            escalate: false,
            review: true,
            flagged_round: FlaggedRoundEffect::Keep,
            termination_check: true,
        },
    },
    PolicyRule {
        prankster: false,
        malice: false,
        bucket: Some(TurnBucket::Sustained),
        abusive: None,
        focus: Some(FocusMatch::Suspicious),
        tier: None,
        flagged: None,
        outcome: Outcome {
            action: RouterAction::ResteerOffTopicSuspicious,
            body: Body::Fixed(Notice::SuspiciousResteer),
            status: None,
            escalate: false,
            review: true,
            flagged_round: FlaggedRoundEffect::Keep,
            termination_check: false,
        },
    },
    PolicyRule {
        prankster: false,
        malice: false,
        bucket: Some(TurnBucket::Sustained),
        abusive: None,
        focus: Some(FocusMatch::SlightlyOff),
        tier: None,
        flagged: None,
        outcome: plain(
            RouterAction::ResteerSlightlyOffTopic,
            Body::CoreWith(Appendix::SoftResteer),
        ),
    },
    PolicyRule {
        prankster: false,
        malice: false,
        bucket: Some(TurnBucket::Sustained),
        abusive: None,
        focus: None,
        tier: None,
        flagged: Some(FlaggedMatch::AnyRound),
        outcome: Outcome {
            action: RouterAction::QueryRespondedRedeemedBehaviorLongTerm,
            body: Body::CoreWith(Appendix::LongTermRedemption),
            status: Some(ConversationStatus::Normal),
            escalate: false,
            review: false,
            flagged_round: FlaggedRoundEffect::Clear,
            termination_check: false,
        },
    },
    PolicyRule {
        prankster: false,
        malice: false,
        bucket: Some(TurnBucket::Sustained),
        abusive: None,
        focus: None,
        tier: None,
        flagged: None,
        outcome: plain(RouterAction::QueryRespondedNormal, Body::Core),
    },
    // Defensive catch-all
    PolicyRule {
        prankster: false,
        malice: false,
        bucket: None,
        abusive: None,
        focus: None,
        tier: None,
        flagged: None,
        outcome: plain(RouterAction::QueryRespondedFallbackNormal, Body::Core),
    },
];

/// Evaluate the policy table for a turn. The trailing catch-all guarantees a
/// match.
pub fn dispatch(input: &PolicyInput) -> &'static Outcome {
    POLICY
        .iter()
        .find(|rule| rule.matches(input))
        .map(|rule| &rule.outcome)
        .unwrap_or(&FALLBACK)
}

/// Outcome used if the table were ever exhausted.
static FALLBACK: Outcome = plain(RouterAction::QueryRespondedFallbackNormal, Body::Core);
