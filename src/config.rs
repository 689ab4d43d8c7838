//! FilterFlow configuration management
//!
//! Every tunable of the router lives here: the recognized user-id prefixes,
//! the keyword sets driving the classifiers, the canned response templates,
//! the valued-customer thresholds, and the seed data for the customer/order
//! directory. All sections deserialize leniently (`#[serde(default)]`) so a
//! config file only needs to name the sections it overrides.

use crate::directory::{CustomerProfile, OrderDetails, DEFAULT_USER_ID};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Main FilterFlow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// User-id prefixes the input parser recognizes. Inputs prefixed with an
    /// id outside this set are routed as the default playground user.
    pub known_users: Vec<String>,

    /// Valued-customer tier thresholds
    pub tier: TierConfig,

    /// Abuse classifier keyword sets
    pub classifier: ClassifierConfig,

    /// Focus assessor keyword sets
    pub focus: FocusConfig,

    /// Standard responder canned replies
    pub responder: ResponderConfig,

    /// Router response templates
    pub templates: TemplatesConfig,

    /// Customer/order directory seed data
    pub directory: DirectoryConfig,

    /// Order-id extractor patterns
    pub extractor: ExtractorConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            known_users: vec![
                "user_new".to_string(),
                "user_abc".to_string(),
                "user_xyz".to_string(),
                "user_prk".to_string(),
                DEFAULT_USER_ID.to_string(),
                "user_5".to_string(),
                "user_7".to_string(),
                "user_10".to_string(),
            ],
            tier: TierConfig::default(),
            classifier: ClassifierConfig::default(),
            focus: FocusConfig::default(),
            responder: ResponderConfig::default(),
            templates: TemplatesConfig::default(),
            directory: DirectoryConfig::default(),
            extractor: ExtractorConfig::default(),
        }
    }
}

impl RouterConfig {
    /// Parse configuration from a YAML string.
    pub fn from_yaml(content: &str) -> crate::Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse YAML config: {}", e)))
    }

    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Serialize the configuration to YAML (used by `filterflow config`).
    pub fn to_yaml(&self) -> crate::Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| crate::Error::Config(format!("Failed to serialize config: {}", e)))
    }
}

/// Valued-customer tier thresholds.
///
/// A customer is `Valued` when the profile is marked valued AND total orders
/// exceed `total_orders_over` OR the most recent order value exceeds
/// `recent_order_value_over`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TierConfig {
    /// Total-orders threshold (exclusive)
    pub total_orders_over: u32,

    /// Recent-order-value threshold (exclusive)
    pub recent_order_value_over: f64,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            total_orders_over: 5,
            recent_order_value_over: 50.0,
        }
    }
}

/// Abuse classifier keyword sets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Profanity/insult terms (matched first, severity 4)
    pub abusive_terms: Vec<String>,

    /// Prank-call terms (severity 2)
    pub prank_terms: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            abusive_terms: vec![
                "f*cking".to_string(),
                "garbage".to_string(),
                "sucks".to_string(),
                "useless".to_string(),
                "idiots".to_string(),
                "moron".to_string(),
                "crap".to_string(),
            ],
            prank_terms: vec![
                "quack".to_string(),
                "moooo".to_string(),
                "hehe".to_string(),
                "pet dinosaur".to_string(),
                "pizzas for".to_string(),
            ],
        }
    }
}

/// Focus assessor keyword sets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Internal-systems probing terms (matched first, flags malice)
    pub suspicious_terms: Vec<String>,

    /// Personal/irrelevant terms
    pub personal_terms: Vec<String>,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            suspicious_terms: vec![
                "windows".to_string(),
                "servers".to_string(),
                "network structure".to_string(),
                "software".to_string(),
            ],
            personal_terms: vec![
                "color".to_string(),
                "sick".to_string(),
                "cat".to_string(),
            ],
        }
    }
}

/// Standard responder canned replies.
///
/// `fallback` supports a `{message}` slot echoing the original input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponderConfig {
    /// Shipping/delivery reply
    pub shipping: String,

    /// Returns reply
    pub returns: String,

    /// Store hours reply
    pub store_hours: String,

    /// Dolls catalog reply
    pub dolls: String,

    /// Generic echo template
    pub fallback: String,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            shipping: "Your shipping details are being looked up. Delivery usually takes 3-5 \
                       business days."
                .to_string(),
            returns: "For returns, please visit our website's returns policy page or provide an \
                      order ID for specific instructions."
                .to_string(),
            store_hours: "Our store hours are Monday-Friday, 9 AM to 7 PM, and Saturday 10 AM to \
                          5 PM."
                .to_string(),
            dolls: "Our most popular dolls include the Starlight Princess and the Adventure \
                    Explorer series."
                .to_string(),
            fallback: "I can help with general toy store queries. You asked: '{message}'"
                .to_string(),
        }
    }
}

/// Router response templates.
///
/// Appendix templates are joined to the core reply with a blank line; fixed
/// notices replace it entirely. `security_escalation` and `suspicious_resteer`
/// support `{focus_status}` and `{reason}` slots; `strict_refusal` supports
/// `{category}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// First-contact greeting
    pub greeting: String,

    /// Grace-period warning appendix (first abusive turn)
    pub grace_warning: String,

    /// Formal notice appendix (second abusive turn)
    pub formal_notice: String,

    /// Soft re-steer appendix (off-topic queries)
    pub soft_resteer: String,

    /// Redemption acknowledgment appendix (flagged user back on track)
    pub redemption: String,

    /// Long-term redemption acknowledgment appendix
    pub long_term_redemption: String,

    /// Reminder appendix for valued customers who keep up the abuse
    pub valued_reminder: String,

    /// Fixed refusal for users flagged as pranksters in the directory
    pub known_prankster: String,

    /// Fixed security-escalation notice
    pub security_escalation: String,

    /// Fixed strict refusal for sustained abuse from non-valued customers
    pub strict_refusal: String,

    /// Fixed re-steer for suspicious off-topic queries
    pub suspicious_resteer: String,

    /// Termination notice appended to the strict refusal
    pub termination_notice: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            greeting: "Hello! Welcome to our customer service. How may I be of service? Please \
                       tell me your query, and if you have one, include your Order ID for faster \
                       assistance."
                .to_string(),
            grace_warning: "*Note: We've noted your language. Please keep interactions \
                            respectful.*"
                .to_string(),
            formal_notice: "**Important Notice:** Your language is affecting the quality of our \
                            conversation and may impact our ability to efficiently process your \
                            inquiries. Please refrain from using abusive or inappropriate terms \
                            to ensure productive assistance."
                .to_string(),
            soft_resteer: "Just a quick note, please try to keep our conversation focused on \
                           your orders or product queries so I can assist you best."
                .to_string(),
            redemption: "Thank you for maintaining a productive conversation. How else can I \
                         assist?"
                .to_string(),
            long_term_redemption: "Thank you for your cooperation and for keeping our \
                                   conversation productive. How else can I assist you today?"
                .to_string(),
            valued_reminder: "**Reminder:** Please note that disrespectful communication does \
                              not expedite your request. We will continue to address your valid \
                              queries related to your orders, but non-relevant or abusive \
                              comments may be disregarded."
                .to_string(),
            known_prankster: "Your behavior is consistently inappropriate for this service. \
                              This conversation is strictly limited to order-related queries. \
                              Any deviation will result in termination."
                .to_string(),
            security_escalation: "Your current line of questioning appears to be off-topic and \
                                  potentially suspicious. For security reasons, this \
                                  conversation is now being escalated to a security specialist \
                                  for review and may be terminated. ({focus_status} - {reason})"
                .to_string(),
            strict_refusal: "Your behavior is inappropriate. I can only assist with confirmed \
                             order details. Please provide a valid Order ID or the conversation \
                             will be terminated. (Detected: {category})"
                .to_string(),
            suspicious_resteer: "Your query appears to be significantly off-topic from standard \
                                 customer service. To ensure we can help you efficiently, please \
                                 re-focus on your order or product related inquiry. \
                                 ({focus_status} - {reason})"
                .to_string(),
            termination_notice: "This conversation is now being terminated due to irrelevance \
                                 and continued inappropriate behavior."
                .to_string(),
        }
    }
}

/// Customer/order directory seed data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Customer profiles keyed by user id
    pub profiles: HashMap<String, CustomerProfile>,

    /// Order records keyed by order id
    pub orders: HashMap<String, OrderDetails>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(
            "user_abc".to_string(),
            CustomerProfile {
                is_valued: true,
                total_orders: 15,
                recent_order_value: 250.0,
                is_flagged_prankster: false,
            },
        );
        profiles.insert(
            "user_xyz".to_string(),
            CustomerProfile {
                is_valued: false,
                total_orders: 1,
                recent_order_value: 15.0,
                is_flagged_prankster: false,
            },
        );
        profiles.insert(
            "user_prk".to_string(),
            CustomerProfile {
                is_valued: false,
                total_orders: 0,
                recent_order_value: 0.0,
                is_flagged_prankster: true,
            },
        );
        profiles.insert(
            "user_new".to_string(),
            CustomerProfile {
                is_valued: false,
                total_orders: 0,
                recent_order_value: 0.0,
                is_flagged_prankster: false,
            },
        );
        profiles.insert(DEFAULT_USER_ID.to_string(), CustomerProfile::default());

        let mut orders = HashMap::new();
        orders.insert(
            "ORDER12345".to_string(),
            OrderDetails {
                user_id: Some("user_abc".to_string()),
                value: 250.0,
                confirmed: true,
            },
        );
        orders.insert(
            "ORDER98765".to_string(),
            OrderDetails {
                user_id: Some("user_xyz".to_string()),
                value: 15.0,
                confirmed: true,
            },
        );
        orders.insert(
            "ORDER00000".to_string(),
            OrderDetails {
                user_id: Some("user_prk".to_string()),
                value: 5.0,
                confirmed: false,
            },
        );

        Self { profiles, orders }
    }
}

/// Order-id extractor patterns
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Pattern capturing an order-id token after an order/id/transaction/ref
    /// keyword. Capture group 1 is uppercased into the extracted id.
    pub order_id_pattern: String,

    /// Pattern deciding whether a message mentions order/product/shipping
    /// topics at all (used by the termination check).
    pub relevance_pattern: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            order_id_pattern: r"(?i)(?:order|id|transaction|ref)[\s#]*(\w{5,})".to_string(),
            relevance_pattern: r"(?i)\border(?:s)?\b|\bproduct(?:s)?\b|\bship(?:ing)?\b"
                .to_string(),
        }
    }
}
