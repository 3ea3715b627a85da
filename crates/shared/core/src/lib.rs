//! Network Double Auction Core Domain
//!
//! Pure domain types for the referral-extended double auction.
//! This crate contains no I/O and draws randomness only from a caller-owned source.

pub mod entities;
pub mod error;
pub mod market;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{Agent, Role};
pub use error::{ConfigError, ConfigResult};
pub use market::{MarketConfig, RunState, SellerRange, SmallWorldConfig, SocialGraph, ValueRange};
pub use values::{AgentId, Value};
