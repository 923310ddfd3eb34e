use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Named document collections. The name is what lands in `document.collection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Services,
    Users,
    Orders,
    Reviews,
}

impl Collection {
    pub const ALL: [Collection; 4] = [Collection::Services, Collection::Users, Collection::Orders, Collection::Reviews];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Services => "services",
            Collection::Users => "users",
            Collection::Orders => "orders",
            Collection::Reviews => "reviews",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ModelError::Validation(format!("unknown collection: {s}")))
    }
}
