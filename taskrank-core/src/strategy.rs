//! Scoring strategies: a closed set of named weight vectors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Relative weight of each factor in the final score. Components sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub dependencies: f64,
}

impl Weights {
    pub fn total(&self) -> f64 {
        self.urgency + self.importance + self.effort + self.dependencies
    }
}

const SMART_BALANCE: Weights = Weights {
    urgency: 0.35,
    importance: 0.30,
    effort: 0.10,
    dependencies: 0.25,
};

const FASTEST_WINS: Weights = Weights {
    urgency: 0.20,
    importance: 0.20,
    effort: 0.50,
    dependencies: 0.10,
};

const HIGH_IMPACT: Weights = Weights {
    urgency: 0.15,
    importance: 0.60,
    effort: 0.05,
    dependencies: 0.20,
};

const DEADLINE_DRIVEN: Weights = Weights {
    urgency: 0.70,
    importance: 0.15,
    effort: 0.05,
    dependencies: 0.10,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Blend of all four factors.
    #[default]
    SmartBalance,
    /// Low-effort tasks first.
    FastestWins,
    /// Importance dominates.
    HighImpact,
    /// Urgency dominates.
    DeadlineDriven,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "unknown strategy '{0}' (expected one of: smart_balance, fastest_wins, high_impact, deadline_driven)"
)]
pub struct UnknownStrategy(pub String);

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::SmartBalance,
        Strategy::FastestWins,
        Strategy::HighImpact,
        Strategy::DeadlineDriven,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::SmartBalance => "smart_balance",
            Strategy::FastestWins => "fastest_wins",
            Strategy::HighImpact => "high_impact",
            Strategy::DeadlineDriven => "deadline_driven",
        }
    }

    pub fn weights(self) -> Weights {
        match self {
            Strategy::SmartBalance => SMART_BALANCE,
            Strategy::FastestWins => FASTEST_WINS,
            Strategy::HighImpact => HIGH_IMPACT,
            Strategy::DeadlineDriven => DEADLINE_DRIVEN,
        }
    }

    /// Lenient lookup: absent or unrecognized names fall back to `SmartBalance`.
    pub fn resolve(name: Option<&str>) -> Self {
        name.and_then(|n| n.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        for strategy in Strategy::ALL {
            assert!((strategy.weights().total() - 1.0).abs() < 1e-9, "{strategy}");
        }
    }

    #[test]
    fn test_strategy_dominant_factors() {
        assert!(Strategy::FastestWins.weights().effort > 0.4);
        assert!(Strategy::HighImpact.weights().importance > 0.5);
        assert!(Strategy::DeadlineDriven.weights().urgency > 0.6);
    }

    #[test]
    fn test_unknown_names_fall_back_to_smart_balance() {
        assert_eq!(Strategy::resolve(Some("yolo")), Strategy::SmartBalance);
        assert_eq!(Strategy::resolve(None), Strategy::SmartBalance);
        assert_eq!(Strategy::resolve(Some("high_impact")), Strategy::HighImpact);
    }

    #[test]
    fn test_from_str_is_strict() {
        assert_eq!("fastest_wins".parse::<Strategy>(), Ok(Strategy::FastestWins));
        assert!("Fastest_Wins".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case_names() {
        let v = serde_json::to_value(Strategy::DeadlineDriven).unwrap();
        assert_eq!(v, serde_json::json!("deadline_driven"));
    }
}
