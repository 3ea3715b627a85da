use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Private value of an agent: cost for a seller, valuation for a buyer.
/// Uses Decimal so midpoints stay exact and values are totally ordered.
pub type Value = Decimal;

/// Index of an agent within a run (sellers occupy `0..s`, buyers `s..n`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub usize);

impl AgentId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for AgentId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}
