//! Customer/order lookup with defaulting
//!
//! `CustomerDirectory` is the read-only stand-in for a customer database.
//! Unknown user ids resolve to the default playground profile; unknown order
//! ids resolve to a zero-value unconfirmed record. The router never mutates
//! directory data.

use crate::config::{DirectoryConfig, TierConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// User id that unknown callers resolve to
pub const DEFAULT_USER_ID: &str = "default_playground_user";

/// Customer profile record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerProfile {
    /// Whether the customer is marked as valued
    pub is_valued: bool,

    /// Lifetime order count
    pub total_orders: u32,

    /// Value of the most recent order
    pub recent_order_value: f64,

    /// Whether the customer is flagged as a known prankster
    pub is_flagged_prankster: bool,
}

/// Customer value tier derived from a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerTier {
    /// High-value customer served even while abusive
    Valued,
    /// Everyone else
    Standard,
}

impl CustomerProfile {
    /// Derive the customer tier under the given thresholds.
    pub fn tier(&self, config: &TierConfig) -> CustomerTier {
        if self.is_valued
            && (self.total_orders > config.total_orders_over
                || self.recent_order_value > config.recent_order_value_over)
        {
            CustomerTier::Valued
        } else {
            CustomerTier::Standard
        }
    }
}

/// Order record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderDetails {
    /// Owning user id, when known
    pub user_id: Option<String>,

    /// Order value
    pub value: f64,

    /// Whether the order is confirmed
    pub confirmed: bool,
}

/// Read-only customer/order directory with defaulting lookups.
#[derive(Debug, Clone)]
pub struct CustomerDirectory {
    profiles: HashMap<String, CustomerProfile>,
    orders: HashMap<String, OrderDetails>,
}

impl CustomerDirectory {
    /// Create a directory from seed data.
    pub fn new(config: DirectoryConfig) -> Self {
        Self {
            profiles: config.profiles,
            orders: config.orders,
        }
    }

    /// Look up a customer profile, falling back to the default playground
    /// profile for unknown ids.
    pub fn profile(&self, user_id: &str) -> CustomerProfile {
        let profile = self
            .profiles
            .get(user_id)
            .or_else(|| self.profiles.get(DEFAULT_USER_ID))
            .cloned()
            .unwrap_or_default();
        tracing::debug!(user_id, ?profile, "retrieved customer profile");
        profile
    }

    /// Look up an order, falling back to a zero-value unconfirmed record.
    pub fn order(&self, order_id: &str) -> OrderDetails {
        let order = self.orders.get(order_id).cloned().unwrap_or_default();
        tracing::debug!(order_id, ?order, "retrieved order details");
        order
    }
}

impl Default for CustomerDirectory {
    fn default() -> Self {
        Self::new(DirectoryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_lookup() {
        let directory = CustomerDirectory::default();

        let abc = directory.profile("user_abc");
        assert!(abc.is_valued);
        assert_eq!(abc.total_orders, 15);

        let prk = directory.profile("user_prk");
        assert!(prk.is_flagged_prankster);
    }

    #[test]
    fn test_unknown_user_falls_back_to_default_profile() {
        let directory = CustomerDirectory::default();
        let profile = directory.profile("nobody_in_particular");
        assert_eq!(profile, CustomerProfile::default());
    }

    #[test]
    fn test_order_lookup() {
        let directory = CustomerDirectory::default();

        let order = directory.order("ORDER12345");
        assert_eq!(order.user_id.as_deref(), Some("user_abc"));
        assert!(order.confirmed);
        assert!((order.value - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_order_defaults_to_unconfirmed_zero() {
        let directory = CustomerDirectory::default();
        let order = directory.order("FAKEORDER123");
        assert!(!order.confirmed);
        assert!((order.value - 0.0).abs() < f64::EPSILON);
        assert!(order.user_id.is_none());
    }

    #[test]
    fn test_tier_thresholds() {
        let tier = TierConfig::default();

        let valued_by_orders = CustomerProfile {
            is_valued: true,
            total_orders: 6,
            recent_order_value: 0.0,
            is_flagged_prankster: false,
        };
        assert_eq!(valued_by_orders.tier(&tier), CustomerTier::Valued);

        let valued_by_value = CustomerProfile {
            is_valued: true,
            total_orders: 1,
            recent_order_value: 50.01,
            is_flagged_prankster: false,
        };
        assert_eq!(valued_by_value.tier(&tier), CustomerTier::Valued);

        // Marked valued but under both thresholds
        let under_thresholds = CustomerProfile {
            is_valued: true,
            total_orders: 5,
            recent_order_value: 50.0,
            is_flagged_prankster: false,
        };
        assert_eq!(under_thresholds.tier(&tier), CustomerTier::Standard);

        // Over thresholds but not marked valued
        let not_marked = CustomerProfile {
            is_valued: false,
            total_orders: 100,
            recent_order_value: 999.0,
            is_flagged_prankster: false,
        };
        assert_eq!(not_marked.tier(&tier), CustomerTier::Standard);
    }

    #[test]
    fn test_empty_seed_still_defaults() {
        let directory = CustomerDirectory::new(DirectoryConfig {
            profiles: HashMap::new(),
            orders: HashMap::new(),
        });
        assert_eq!(directory.profile("anyone"), CustomerProfile::default());
    }
}
