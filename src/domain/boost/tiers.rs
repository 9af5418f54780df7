use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Purchasable boost tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoostLevel {
    Standard,
    Premium,
    Max,
}

impl BoostLevel {
    pub const ALL: [BoostLevel; 3] = [BoostLevel::Standard, BoostLevel::Premium, BoostLevel::Max];

    /// Price in US cents
    pub fn price_cents(&self) -> i64 {
        match self {
            BoostLevel::Standard => 500,
            BoostLevel::Premium => 1500,
            BoostLevel::Max => 3000,
        }
    }

    pub fn duration_days(&self) -> i64 {
        match self {
            BoostLevel::Standard => 7,
            BoostLevel::Premium => 14,
            BoostLevel::Max => 30,
        }
    }

    /// Feed ranking score while the boost runs
    pub fn boost_score(&self) -> i32 {
        match self {
            BoostLevel::Standard => 250,
            BoostLevel::Premium => 500,
            BoostLevel::Max => 1000,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoostLevel::Standard => "standard",
            BoostLevel::Premium => "premium",
            BoostLevel::Max => "max",
        }
    }
}

impl fmt::Display for BoostLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid boost level: {0}")]
pub struct UnknownBoostLevel(pub String);

impl FromStr for BoostLevel {
    type Err = UnknownBoostLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BoostLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownBoostLevel(s.to_string()))
    }
}
