//! Network Double Auction Runner
//!
//! Ties generation, the static McAfee mechanism and referral diffusion
//! into one run:
//!
//! ```text
//!   generate ──▶ RunState
//!                  │
//!                  ├──▶ optimal welfare (all agents, no reduction)
//!                  │
//!                  └──▶ DiffusionController
//!                         StaticInit:  McAfee on the invited agents
//!                         Diffusing:   excluded agents invite neighbors, TRP
//!                         Converged:   align, welfare
//! ```

pub mod diffusion;
pub mod error;
pub mod simulation;

// Re-export main types
pub use diffusion::{DiffusionController, DiffusionReport, Phase};
pub use error::{RunnerError, RunnerResult};
pub use simulation::{WelfareRatios, WelfareReport, generate, solve};
