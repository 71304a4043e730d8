//! Aggregate review status of a requirement.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Single label derived from every level of a review chain.
///
/// Serialized as `pending`, `level{k}_approved`, `level{k}_rejected`
/// or `approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverallStatus {
    Pending,
    /// Levels `1..=k` are approved, level `k + 1` is still open.
    LevelApproved(u32),
    /// Level `k` rejected after all lower levels approved.
    LevelRejected(u32),
    Approved,
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::LevelApproved(k) => write!(f, "level{}_approved", k),
            Self::LevelRejected(k) => write!(f, "level{}_rejected", k),
            Self::Approved => write!(f, "approved"),
        }
    }
}

/// Error returned when a string is not a recognized overall status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized overall status: {0}")]
pub struct ParseOverallStatusError(pub String);

impl FromStr for OverallStatus {
    type Err = ParseOverallStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        match lowered.as_str() {
            "pending" => return Ok(Self::Pending),
            "approved" => return Ok(Self::Approved),
            _ => {}
        }

        let parse_level = |rest: &str| rest.parse::<u32>().ok().filter(|k| *k > 0);

        if let Some(rest) = lowered
            .strip_prefix("level")
            .and_then(|r| r.strip_suffix("_approved"))
        {
            if let Some(k) = parse_level(rest) {
                return Ok(Self::LevelApproved(k));
            }
        }
        if let Some(rest) = lowered
            .strip_prefix("level")
            .and_then(|r| r.strip_suffix("_rejected"))
        {
            if let Some(k) = parse_level(rest) {
                return Ok(Self::LevelRejected(k));
            }
        }

        Err(ParseOverallStatusError(s.to_string()))
    }
}

impl Serialize for OverallStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for OverallStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
