mod agent;
mod role;

pub use agent::Agent;
pub use role::Role;
