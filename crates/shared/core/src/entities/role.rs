use serde::{Deserialize, Serialize};

/// Market role of an agent, fixed by its index range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Seller,
    Buyer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Seller => write!(f, "seller"),
            Role::Buyer => write!(f, "buyer"),
        }
    }
}
