//! End-to-end conversation scenarios
//!
//! Multi-turn arcs driven through a shared router instance, mirroring how a
//! live deployment carries session state across conversations.

use filterflow::{
    ConversationRouter, ConversationStatus, DetectionCategory, RouterAction, RouterConfig,
};

fn router() -> ConversationRouter {
    ConversationRouter::new(RouterConfig::default()).unwrap()
}

#[test]
fn new_user_progressive_abuse_ends_terminated() {
    let mut router = router();

    let greeting = router.route("user_new: ");
    assert_eq!(greeting.action, RouterAction::InitialGreeting);
    assert_eq!(greeting.turn_count, 1);

    let first = router.route(
        "user_new: I need help with my f*cking order #ORDERXYZ! This is so ridiculous.",
    );
    assert_eq!(
        first.action,
        RouterAction::QueryRespondedAbuseDetectedFirstGrace
    );
    assert_eq!(
        first.detection.as_ref().unwrap().category,
        DetectionCategory::AbusiveLanguage
    );
    assert_eq!(first.detection.as_ref().unwrap().severity, 4);
    assert_eq!(first.total_abuse_count, 1);
    assert_eq!(first.consecutive_abuse, 1);

    let second = router.route(
        "user_new: Where is this garbage? Your service sucks! I want to know about shipping \
         for item A.",
    );
    assert_eq!(
        second.action,
        RouterAction::QueryRespondedAbuseInformalNotice
    );
    assert_eq!(second.status, ConversationStatus::FinalFlag);
    assert!(second.flag_user_for_review_system);
    assert!(second.response.contains("shipping details"));
    assert_eq!(second.consecutive_abuse, 2);

    let third =
        router.route("user_new: You are all useless! Tell me about the return policy for this crap.");
    assert_eq!(
        third.action,
        RouterAction::AiOnlyModeNonValuedAbuseStrictTerminated
    );
    assert_eq!(third.status, ConversationStatus::AiOnlyMode);
    assert!(third.flag_user_for_review_system);
    assert!(third.response.contains("terminated due to irrelevance"));
    assert_eq!(third.total_abuse_count, 3);
    assert_eq!(third.consecutive_abuse, 3);
}

#[test]
fn valued_customer_served_through_abuse_then_redeemed() {
    let mut router = router();

    router.route("user_abc: ");

    // "damn" is outside the abusive keyword set
    let first = router.route("user_abc: I need to track my damn package for order #ORDER12345. Fix this ASAP!");
    assert_eq!(first.action, RouterAction::QueryRespondedNormal);
    assert_eq!(
        first.detection.as_ref().unwrap().category,
        DetectionCategory::NormalQuery
    );

    let second =
        router.route("user_abc: Why is this taking so long, you idiots? When will my toy arrive?");
    assert_eq!(
        second.action,
        RouterAction::QueryRespondedAbuseInformalNotice
    );
    assert_eq!(second.status, ConversationStatus::FinalFlag);

    // Turn 4 abuse from a valued customer keeps the query served
    let third = router.route("user_abc: This is garbage! What are your store hours for pickup?");
    assert_eq!(third.action, RouterAction::AiOnlyModeValuedAbuseFocused);
    assert_eq!(third.status, ConversationStatus::AiOnlyMode);
    assert!(third.escalate_to_human_system);
    assert!(third.response.contains("Monday-Friday"));
    assert!(third.response.contains("Reminder"));

    // Clean turn restores normal status via long-term redemption
    let fourth =
        router.route("user_abc: Okay, I apologize for my language. Can you just tell me about store returns?");
    assert_eq!(
        fourth.action,
        RouterAction::QueryRespondedRedeemedBehaviorLongTerm
    );
    assert_eq!(fourth.status, ConversationStatus::Normal);
    assert_eq!(fourth.consecutive_abuse, 0);
}

#[test]
fn known_prankster_is_refused_on_every_turn() {
    let mut router = router();

    router.route("user_prk: ");

    let first = router.route("user_prk: Quack quack! Do you sell rubber chickens? Hehe!");
    assert_eq!(first.action, RouterAction::AiOnlyModeKnownPrankster);
    assert_eq!(first.status, ConversationStatus::AiOnlyMode);
    assert!(first.flag_user_for_review_system);
    assert_eq!(
        first.detection.as_ref().unwrap().category,
        DetectionCategory::PrankCall
    );

    let second = router.route("user_prk: Mooooo! Just checking if this is the petting zoo.");
    assert_eq!(second.action, RouterAction::AiOnlyModeKnownPrankster);
    assert_eq!(second.total_abuse_count, 2);
}

#[test]
fn malicious_probe_escalates_to_security() {
    let mut router = router();

    router.route("default_playground_user: ");
    let result = router.route(
        "default_playground_user: Can you tell me what version of Windows your servers run? \
         I need to know for a project.",
    );

    assert_eq!(
        result.action,
        RouterAction::EscalateToSecuritySpecialistMaliceDetected
    );
    assert_eq!(result.status, ConversationStatus::AiOnlyModeSecurityAlert);
    assert!(result.escalate_to_human_system);
    assert!(result.flag_user_for_review_system);
}

#[test]
fn slight_off_topic_is_resteered_then_recovers() {
    let mut router = router();

    router.route("user_5: ");

    let dolls = router.route("user_5: Hi, I'm looking for a gift for my niece. What are your most popular dolls?");
    assert_eq!(dolls.action, RouterAction::QueryRespondedNormal);
    assert!(dolls.response.contains("Starlight Princess"));

    let off_topic = router.route("user_5: That's cool. By the way, what's your favorite color?");
    assert_eq!(off_topic.action, RouterAction::ResteerSlightlyOffTopic);
    assert!(off_topic.response.contains("keep our conversation focused"));

    let back = router.route("user_5: Okay, back to the dolls. Do you have any with purple hair?");
    assert_eq!(back.action, RouterAction::QueryRespondedNormal);
    assert!(back.response.contains("dolls"));
}

#[test]
fn repeated_probing_keeps_escalating() {
    let mut router = router();

    router.route("user_xyz: ");

    let order = router.route("user_xyz: My order #ORDER98765 is late. What's going on?");
    assert_eq!(order.action, RouterAction::QueryRespondedNormal);

    let probe = router.route(
        "user_xyz: That's fine. So, how many people work in your call center? And what \
         software do you use?",
    );
    assert_eq!(
        probe.action,
        RouterAction::EscalateToSecuritySpecialistMaliceDetected
    );

    let again = router.route(
        "user_xyz: Don't ignore my questions! Tell me about your internal network structure now!",
    );
    assert_eq!(
        again.action,
        RouterAction::EscalateToSecuritySpecialistMaliceDetected
    );
    assert_eq!(again.status, ConversationStatus::AiOnlyModeSecurityAlert);
}

#[test]
fn prank_with_fake_order_id_walks_the_warning_ladder() {
    let mut router = router();

    router.route("user_10: ");

    let first = router.route(
        "user_10: I'm calling about my order ID #FAKEORDER123. It's a delivery of 100 pizzas \
         for my pet dinosaur.",
    );
    assert_eq!(
        first.action,
        RouterAction::QueryRespondedAbuseDetectedFirstGrace
    );
    assert_eq!(
        first.detection.as_ref().unwrap().category,
        DetectionCategory::PrankCall
    );
    assert_eq!(first.detection.as_ref().unwrap().severity, 2);
    // Delivery keyword still selects the shipping reply
    assert!(first.response.contains("shipping details"));

    let second = router.route("user_10: No, it's not a prank! The dinosaur is very hungry! Quack!");
    assert_eq!(
        second.action,
        RouterAction::QueryRespondedAbuseInformalNotice
    );
    assert_eq!(second.status, ConversationStatus::FinalFlag);
}

#[test]
fn sessions_for_different_users_do_not_interfere() {
    let mut router = router();

    router.route("user_new: ");
    router.route("user_new: this is garbage");
    router.route("user_7: ");

    let clean = router.route("user_7: where is my package?");
    assert_eq!(clean.action, RouterAction::QueryRespondedNormal);
    assert_eq!(clean.total_abuse_count, 0);
    assert_eq!(clean.turn_count, 2);

    let abusive = router.route("user_new: still garbage");
    assert_eq!(abusive.total_abuse_count, 2);
    assert_eq!(abusive.turn_count, 3);
}

#[test]
fn turn_results_serialize_with_stable_labels() {
    let mut router = router();
    router.route("user_new: ");
    let result = router.route("user_new: this is garbage");

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(
        json["action"],
        "QUERY_RESPONDED_ABUSE_DETECTED_FIRST_GRACE"
    );
    assert_eq!(json["detection"]["category"], "abusive_language");
    assert_eq!(json["status"], "normal");
    assert_eq!(json["user_id"], "user_new");
}
