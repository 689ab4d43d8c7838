//! Standard query responder
//!
//! Produces the core reply for legitimate queries: the first matching keyword
//! among shipping/returns/store-hours/dolls selects a canned sentence, and
//! anything else gets the generic echo template.

use crate::config::ResponderConfig;

/// Slot in the fallback template replaced with the original message
const MESSAGE_SLOT: &str = "{message}";

/// Canned-reply responder for standard customer queries.
#[derive(Debug, Clone)]
pub struct StandardResponder {
    config: ResponderConfig,
}

impl StandardResponder {
    /// Create a responder with the given reply templates.
    pub fn new(config: ResponderConfig) -> Self {
        Self { config }
    }

    /// Produce the core reply for a message.
    pub fn reply(&self, message: &str) -> String {
        let lower = message.to_lowercase();

        if lower.contains("shipping") || lower.contains("delivery") {
            return self.config.shipping.clone();
        }
        if lower.contains("return") || lower.contains("returns") {
            return self.config.returns.clone();
        }
        if lower.contains("store hours") {
            return self.config.store_hours.clone();
        }
        if lower.contains("dolls") {
            return self.config.dolls.clone();
        }

        self.config.fallback.replace(MESSAGE_SLOT, message)
    }
}

impl Default for StandardResponder {
    fn default() -> Self {
        Self::new(ResponderConfig::default())
    }
}
