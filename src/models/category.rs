//! Category (class/role pair) definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A class label paired with the role filter used for its ranking pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Class slug (e.g., "warrior")
    pub name: String,

    /// Role filter sent with ranking requests (e.g., "all", "dps")
    pub role: String,

    /// Equipment lookup used for this category; falls back to the configured default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prober: Option<ProberKind>,
}

impl Category {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            prober: None,
        }
    }

    /// Use a specific prober for this category.
    pub fn with_prober(mut self, prober: ProberKind) -> Self {
        self.prober = Some(prober);
        self
    }

    /// Name of the record file for this category.
    pub fn file_name(&self) -> String {
        format!("{}_data.json", self.name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.role)
    }
}

/// Detail source used to decide whether a character has the item equipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProberKind {
    /// Raider.IO profile with `fields=gear`
    #[default]
    RaiderIo,
    /// Blizzard profile equipment API
    Blizzard,
}

impl fmt::Display for ProberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProberKind::RaiderIo => f.write_str("raider_io"),
            ProberKind::Blizzard => f.write_str("blizzard"),
        }
    }
}
