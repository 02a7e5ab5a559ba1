//! Position sizing policies: fixed fraction and reward-weighted.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::Sizing;

/// Strategy turning risk capital and pip distances into lot sizes.
///
/// Implementations are pure; the policy is chosen once at configuration
/// time via [`RiskConfig::sizer`](super::RiskConfig::sizer).
pub trait PositionSizer {
    fn size(&self, balance: Decimal, stop_loss_pips: u32, take_profit_pips: &[u32]) -> Sizing;
}

/// Floor to two decimal places (broker lot-step convention). Flooring only
/// ever reduces exposure.
fn floor_lot(lot: Decimal) -> Decimal {
    (lot * dec!(100)).floor() / dec!(100)
}

/// Risk a fixed fraction of balance on the whole signal; the single lot is
/// divided evenly across take-profits at submission time.
pub struct FixedFractionSizer {
    pub risk_factor: Decimal,
}

impl PositionSizer for FixedFractionSizer {
    fn size(&self, balance: Decimal, stop_loss_pips: u32, _take_profit_pips: &[u32]) -> Sizing {
        let lot = floor_lot(balance * self.risk_factor / Decimal::from(stop_loss_pips) / dec!(10));
        Sizing::Single { lot }
    }
}

/// Risk a base fraction per take-profit, scaled by that target's
/// reward:risk ratio — distant targets get proportionally larger lots.
pub struct RewardWeightedSizer {
    pub risk_per_trade: Decimal,
}

impl PositionSizer for RewardWeightedSizer {
    fn size(&self, balance: Decimal, stop_loss_pips: u32, take_profit_pips: &[u32]) -> Sizing {
        let stop = Decimal::from(stop_loss_pips);
        let mut lots = Vec::with_capacity(take_profit_pips.len());
        let mut reward_risk = Vec::with_capacity(take_profit_pips.len());

        for &tp in take_profit_pips {
            let rr = Decimal::from(tp) / stop;
            lots.push(floor_lot(balance * self.risk_per_trade * rr / stop / dec!(10)));
            reward_risk.push(rr);
        }

        Sizing::PerTarget { lots, reward_risk }
    }
}
