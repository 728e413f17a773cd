use std::fmt::{Display, Formatter, Result};

use serde::{Deserialize, Serialize};

/// Named recipient selection policy for a bulk announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientFilter {
    All,
    Active,
    Completed,
    Struggling,
    Inactive,
}

impl RecipientFilter {
    /// An absent or unrecognized name selects everyone. Callers that want
    /// stricter handling must check the name themselves first.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("active") => RecipientFilter::Active,
            Some("completed") => RecipientFilter::Completed,
            Some("struggling") => RecipientFilter::Struggling,
            Some("inactive") => RecipientFilter::Inactive,
            _ => RecipientFilter::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecipientFilter::All => "all",
            RecipientFilter::Active => "active",
            RecipientFilter::Completed => "completed",
            RecipientFilter::Struggling => "struggling",
            RecipientFilter::Inactive => "inactive",
        }
    }
}

impl Display for RecipientFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.as_str())
    }
}
