//! Order-id extraction
//!
//! Pulls an order-id token out of free-form text (an `order`/`id`/
//! `transaction`/`ref` keyword followed by a 5+ character word token) and
//! answers whether a message mentions order/product/shipping topics at all.
//! Patterns come from config and are compiled once at construction.

use crate::config::ExtractorConfig;
use crate::error::{Error, Result};
use regex::Regex;

/// Compiled order-id extractor.
#[derive(Debug)]
pub struct OrderIdExtractor {
    order_id: Regex,
    relevance: Regex,
}

impl OrderIdExtractor {
    /// Compile the configured patterns.
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        let order_id = Regex::new(&config.order_id_pattern).map_err(|e| {
            Error::Config(format!("Invalid order-id pattern: {}", e))
        })?;
        let relevance = Regex::new(&config.relevance_pattern).map_err(|e| {
            Error::Config(format!("Invalid relevance pattern: {}", e))
        })?;
        Ok(Self {
            order_id,
            relevance,
        })
    }

    /// Extract an order id from the message, uppercased.
    pub fn extract(&self, text: &str) -> Option<String> {
        self.order_id
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_uppercase())
    }

    /// Whether the message mentions order/product/shipping topics.
    pub fn mentions_relevant_topic(&self, text: &str) -> bool {
        self.relevance.is_match(text)
    }
}
