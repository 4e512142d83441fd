//! Survival tiers — how resource-constrained an account currently is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A discrete classification of an account's financial headroom.
///
/// Ordered from most to least comfortable: `High < Normal < ... < Dead`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurvivalTier {
    High,
    Normal,
    LowCompute,
    Critical,
    Dead,
}

impl SurvivalTier {
    /// Whether downstream work should scale itself down this cycle.
    pub fn is_constrained(self) -> bool {
        matches!(self, Self::LowCompute | Self::Critical | Self::Dead)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Normal => "normal",
            Self::LowCompute => "low_compute",
            Self::Critical => "critical",
            Self::Dead => "dead",
        }
    }
}

impl fmt::Display for SurvivalTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a credit balance (in cents) to a [`SurvivalTier`].
///
/// Implementations must be pure and total.
pub trait TierClassifier: Send + Sync {
    fn classify(&self, credit_cents: u64) -> SurvivalTier;
}

impl<F> TierClassifier for F
where
    F: Fn(u64) -> SurvivalTier + Send + Sync,
{
    fn classify(&self, credit_cents: u64) -> SurvivalTier {
        self(credit_cents)
    }
}

/// Classifies by strictly-greater-than thresholds, in cents.
///
/// `credit > high` is High, `> normal` is Normal, `> low_compute` is
/// LowCompute, anything above zero is Critical and zero is Dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdClassifier {
    pub high: u64,
    pub normal: u64,
    pub low_compute: u64,
}

impl Default for ThresholdClassifier {
    fn default() -> Self {
        Self {
            high: 500,
            normal: 50,
            low_compute: 10,
        }
    }
}

impl TierClassifier for ThresholdClassifier {
    fn classify(&self, credit_cents: u64) -> SurvivalTier {
        if credit_cents > self.high {
            SurvivalTier::High
        } else if credit_cents > self.normal {
            SurvivalTier::Normal
        } else if credit_cents > self.low_compute {
            SurvivalTier::LowCompute
        } else if credit_cents > 0 {
            SurvivalTier::Critical
        } else {
            SurvivalTier::Dead
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds_cover_every_tier() {
        let c = ThresholdClassifier::default();
        assert_eq!(c.classify(10_000), SurvivalTier::High);
        assert_eq!(c.classify(501), SurvivalTier::High);
        assert_eq!(c.classify(500), SurvivalTier::Normal);
        assert_eq!(c.classify(51), SurvivalTier::Normal);
        assert_eq!(c.classify(50), SurvivalTier::LowCompute);
        assert_eq!(c.classify(11), SurvivalTier::LowCompute);
        assert_eq!(c.classify(10), SurvivalTier::Critical);
        assert_eq!(c.classify(1), SurvivalTier::Critical);
        assert_eq!(c.classify(0), SurvivalTier::Dead);
    }

    #[test]
    fn closures_are_classifiers() {
        let always_normal = |_: u64| SurvivalTier::Normal;
        assert_eq!(always_normal.classify(0), SurvivalTier::Normal);
    }

    #[test]
    fn constrained_tiers() {
        assert!(!SurvivalTier::High.is_constrained());
        assert!(!SurvivalTier::Normal.is_constrained());
        assert!(SurvivalTier::LowCompute.is_constrained());
        assert!(SurvivalTier::Critical.is_constrained());
        assert!(SurvivalTier::Dead.is_constrained());
    }

    #[test]
    fn tiers_order_from_most_to_least_comfortable() {
        let mut tiers = vec![
            SurvivalTier::Dead,
            SurvivalTier::Normal,
            SurvivalTier::Critical,
            SurvivalTier::High,
            SurvivalTier::LowCompute,
        ];
        tiers.sort();
        assert_eq!(
            tiers,
            vec![
                SurvivalTier::High,
                SurvivalTier::Normal,
                SurvivalTier::LowCompute,
                SurvivalTier::Critical,
                SurvivalTier::Dead,
            ]
        );

        let c = ThresholdClassifier::default();
        assert!(c.classify(1_000) < c.classify(5));
    }

    #[test]
    fn tier_serializes_snake_case() {
        let json = serde_json::to_string(&SurvivalTier::LowCompute).unwrap();
        assert_eq!(json, "\"low_compute\"");
        assert_eq!(SurvivalTier::LowCompute.to_string(), "low_compute");
    }
}
