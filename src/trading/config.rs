//! Risk configuration.

use std::env;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::RiskPolicy;

use super::sizer::{FixedFractionSizer, PositionSizer, RewardWeightedSizer};

/// Configuration errors surfaced at startup, before any message is handled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be between 0 and 1 (exclusive), got {value}")]
    RiskFractionOutOfRange { name: &'static str, value: Decimal },
    #[error("unrecognized risk policy {0:?} (expected fixed_fraction or reward_weighted)")]
    UnknownPolicy(String),
    #[error("invalid value {value:?} for {name}")]
    InvalidValue { name: &'static str, value: String },
}

/// Process-wide risk settings, passed explicitly into parsing and
/// calculation — the core holds no global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Which position-sizing policy to apply
    pub policy: RiskPolicy,

    /// Fraction of balance risked per trade under the fixed-fraction policy
    pub risk_factor: Decimal,

    /// Base per-target risk fraction under the reward-weighted policy
    pub risk_per_trade: Decimal,

    /// Ask the broker to trail the stop; forwarded with orders, never read
    /// by the calculator
    pub trailing_stop: bool,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            policy: RiskPolicy::FixedFraction,
            risk_factor: dec!(0.01),    // 1% of balance
            risk_per_trade: dec!(0.01), // 1% per unit of reward:risk
            trailing_stop: false,
        }
    }
}

impl RiskConfig {
    /// Load settings from the environment, falling back to defaults for
    /// unset variables: `RISK_POLICY`, `RISK_FACTOR`, `RISK_PER_TRADE`,
    /// `TRAILING_STOP`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(policy) = env::var("RISK_POLICY") {
            config.policy =
                RiskPolicy::from_str(&policy).ok_or(ConfigError::UnknownPolicy(policy))?;
        }
        if let Ok(factor) = env::var("RISK_FACTOR") {
            config.risk_factor =
                Decimal::from_str(&factor).map_err(|_| ConfigError::InvalidValue {
                    name: "RISK_FACTOR",
                    value: factor,
                })?;
        }
        if let Ok(per_trade) = env::var("RISK_PER_TRADE") {
            config.risk_per_trade =
                Decimal::from_str(&per_trade).map_err(|_| ConfigError::InvalidValue {
                    name: "RISK_PER_TRADE",
                    value: per_trade,
                })?;
        }
        if let Ok(trailing) = env::var("TRAILING_STOP") {
            config.trailing_stop = matches!(trailing.to_lowercase().as_str(), "1" | "true" | "yes");
        }

        config.validate()?;
        Ok(config)
    }

    /// Both risk fractions must be strictly between 0 and 1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("risk_factor", self.risk_factor),
            ("risk_per_trade", self.risk_per_trade),
        ] {
            if value <= Decimal::ZERO || value >= Decimal::ONE {
                return Err(ConfigError::RiskFractionOutOfRange { name, value });
            }
        }
        Ok(())
    }

    /// Sizing strategy for the configured policy, selected once here rather
    /// than branched on throughout the calculator.
    pub fn sizer(&self) -> Box<dyn PositionSizer> {
        match self.policy {
            RiskPolicy::FixedFraction => Box::new(FixedFractionSizer {
                risk_factor: self.risk_factor,
            }),
            RiskPolicy::RewardWeighted => Box::new(RewardWeightedSizer {
                risk_per_trade: self.risk_per_trade,
            }),
        }
    }

    /// The fraction the active policy risks, for display.
    pub fn active_fraction(&self) -> Decimal {
        match self.policy {
            RiskPolicy::FixedFraction => self.risk_factor,
            RiskPolicy::RewardWeighted => self.risk_per_trade,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RiskConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_fraction_of_one() {
        let config = RiskConfig {
            risk_factor: dec!(1),
            ..RiskConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::RiskFractionOutOfRange {
                name: "risk_factor",
                value: dec!(1),
            })
        );
    }

    #[test]
    fn test_rejects_zero_fraction() {
        let config = RiskConfig {
            risk_per_trade: Decimal::ZERO,
            ..RiskConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(RiskPolicy::from_str("fixed"), Some(RiskPolicy::FixedFraction));
        assert_eq!(
            RiskPolicy::from_str("REWARD_WEIGHTED"),
            Some(RiskPolicy::RewardWeighted)
        );
        assert_eq!(RiskPolicy::from_str("martingale"), None);
    }
}
