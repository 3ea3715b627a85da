use serde::{Deserialize, Serialize};

use super::Role;
use crate::values::{AgentId, Value};

/// A market participant with a single private value drawn at generation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub role: Role,
    /// Cost for a seller, valuation for a buyer
    pub value: Value,
}

impl Agent {
    pub fn seller(id: impl Into<AgentId>, cost: Value) -> Self {
        Self {
            id: id.into(),
            role: Role::Seller,
            value: cost,
        }
    }

    pub fn buyer(id: impl Into<AgentId>, valuation: Value) -> Self {
        Self {
            id: id.into(),
            role: Role::Buyer,
            value: valuation,
        }
    }

    pub fn is_seller(&self) -> bool {
        self.role == Role::Seller
    }

    pub fn is_buyer(&self) -> bool {
        self.role == Role::Buyer
    }
}
