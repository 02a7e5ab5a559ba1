//! Risk configuration, pip/risk computation, position sizing, and reporting.

mod config;
mod report;
mod risk;
mod sizer;

pub use config::{ConfigError, RiskConfig};
pub use report::build_report;
pub use risk::{compute_risk, pip_multiplier, RiskError};
pub use sizer::{FixedFractionSizer, PositionSizer, RewardWeightedSizer};
