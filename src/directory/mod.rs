//! Customer and order directory

mod store;

pub use store::{CustomerDirectory, CustomerProfile, CustomerTier, OrderDetails, DEFAULT_USER_ID};
