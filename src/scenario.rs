//! Emergency scenarios.
//!
//! The active scenario decides which required tool, if any, is mission-critical.
//! Only the critical tool can raise a `critical` alert.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::detect::ObjectClass;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    #[default]
    Normal,
    Fire,
    Leak,
    Oxygen,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Normal,
        Scenario::Fire,
        Scenario::Leak,
        Scenario::Oxygen,
    ];

    /// The tool whose absence is an emergency under this scenario.
    pub fn critical_tool(&self) -> Option<ObjectClass> {
        match self {
            Scenario::Fire => Some(ObjectClass::FireExtinguisher),
            Scenario::Oxygen => Some(ObjectClass::OxygenTank),
            Scenario::Normal | Scenario::Leak => None,
        }
    }

    pub fn is_critical_tool(&self, tool: ObjectClass) -> bool {
        self.critical_tool() == Some(tool)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Normal => "normal",
            Scenario::Fire => "fire",
            Scenario::Leak => "leak",
            Scenario::Oxygen => "oxygen",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Scenario::Normal => "Normal Operations",
            Scenario::Fire => "Fire Emergency",
            Scenario::Leak => "Atmosphere Leak",
            Scenario::Oxygen => "Oxygen Emergency",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Scenario::Normal => "All tools present",
            Scenario::Fire => "Fire extinguisher missing",
            Scenario::Leak => "Tools partially occluded",
            Scenario::Oxygen => "Oxygen tank missing",
        }
    }
}

impl FromStr for Scenario {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.as_str() == needle)
            .ok_or_else(|| {
                anyhow!(
                    "unknown scenario '{}': expected one of normal, fire, leak, oxygen",
                    s
                )
            })
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
