//! Market instance: configuration, social network and run state

mod config;
mod graph;
mod state;

pub use config::{MarketConfig, SellerRange, SmallWorldConfig, ValueRange};
pub use graph::SocialGraph;
pub use state::RunState;
