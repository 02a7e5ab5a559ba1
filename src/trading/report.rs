//! Human-readable trade report: an ordered projection of a signal's parsed
//! and computed fields into (label, value) rows.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{Sizing, TradeSignal};

use super::RiskConfig;

/// Assemble the report rows for a signal whose risk figures are computed.
/// Pure formatting; rows come out in presentation order.
pub fn build_report(
    trade: &TradeSignal,
    balance: Decimal,
    config: &RiskConfig,
) -> Vec<(String, String)> {
    let mut rows = Vec::new();

    rows.push((trade.order_type.to_string(), trade.symbol.clone()));
    rows.push(("Entry".into(), trade.entry.to_string()));

    let Some(risk) = &trade.risk else {
        return rows;
    };

    rows.push(("Stop Loss".into(), format!("{} pips", risk.stop_loss_pips)));
    for (i, tp_pips) in risk.take_profit_pips.iter().enumerate() {
        rows.push((format!("TP {}", i + 1), format!("({tp_pips} pips)")));
    }

    rows.push(("Stop Loss".into(), trade.stop_loss.to_string()));
    for (i, tp) in trade.take_profits.iter().enumerate() {
        rows.push((format!("TP {}", i + 1), tp.to_string()));
    }

    rows.push((
        "Risk Factor".into(),
        format!("{}%", (config.active_fraction() * dec!(100)).normalize()),
    ));
    rows.push(("Position Size".into(), format_sizing(&risk.sizing)));

    rows.push(("Current Balance".into(), format!("$ {:.2}", balance)));
    rows.push((
        "Potential Loss".into(),
        format!("$ {:.2}", risk.potential_loss()),
    ));

    let profits = risk.potential_profits();
    for (i, profit) in profits.iter().enumerate() {
        rows.push((format!("TP {} Profit", i + 1), format!("$ {profit:.2}")));
    }
    rows.push((
        "Total Profit".into(),
        format!("$ {:.2}", profits.iter().sum::<Decimal>()),
    ));

    rows
}

fn format_sizing(sizing: &Sizing) -> String {
    match sizing {
        Sizing::Single { lot } => lot.to_string(),
        Sizing::PerTarget { lots, .. } => lots
            .iter()
            .map(Decimal::to_string)
            .collect::<Vec<_>>()
            .join(" / "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Entry, OrderType, RiskFigures, RiskPolicy};

    fn computed_signal() -> TradeSignal {
        TradeSignal {
            order_type: OrderType::BuyLimit,
            symbol: "GBPUSD".into(),
            entry: Entry::Fixed(dec!(1.14480)),
            stop_loss: dec!(1.13480),
            take_profits: vec![dec!(1.15480), dec!(1.16480)],
            risk_policy: RiskPolicy::FixedFraction,
            risk: Some(RiskFigures {
                stop_loss_pips: 100,
                take_profit_pips: vec![100, 200],
                sizing: Sizing::Single { lot: dec!(0.10) },
            }),
        }
    }

    #[test]
    fn test_row_order_and_content() {
        let rows = build_report(&computed_signal(), dec!(10000), &RiskConfig::default());

        assert_eq!(rows[0], ("Buy Limit".to_string(), "GBPUSD".to_string()));
        assert_eq!(rows[1], ("Entry".to_string(), "1.14480".to_string()));
        assert_eq!(rows[2], ("Stop Loss".to_string(), "100 pips".to_string()));
        assert_eq!(rows[3], ("TP 1".to_string(), "(100 pips)".to_string()));
        assert_eq!(rows[4], ("TP 2".to_string(), "(200 pips)".to_string()));
        assert_eq!(rows[5], ("Stop Loss".to_string(), "1.13480".to_string()));
        assert_eq!(rows[8], ("Risk Factor".to_string(), "1%".to_string()));
        assert_eq!(rows[9], ("Position Size".to_string(), "0.10".to_string()));
        assert_eq!(rows[10], ("Current Balance".to_string(), "$ 10000.00".to_string()));
        assert_eq!(rows[11], ("Potential Loss".to_string(), "$ 100.00".to_string()));
        // Half the lot to each target: 0.05 * 10 * pips.
        assert_eq!(rows[12], ("TP 1 Profit".to_string(), "$ 50.00".to_string()));
        assert_eq!(rows[13], ("TP 2 Profit".to_string(), "$ 100.00".to_string()));
        assert_eq!(rows[14], ("Total Profit".to_string(), "$ 150.00".to_string()));
    }

    #[test]
    fn test_market_entry_shows_now() {
        let mut trade = computed_signal();
        trade.entry = Entry::AtMarket;
        trade.risk = None;
        let rows = build_report(&trade, dec!(10000), &RiskConfig::default());
        assert_eq!(rows[1], ("Entry".to_string(), "NOW".to_string()));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_per_target_sizing_is_listed() {
        let mut trade = computed_signal();
        trade.risk = Some(RiskFigures {
            stop_loss_pips: 100,
            take_profit_pips: vec![100, 200],
            sizing: Sizing::PerTarget {
                lots: vec![dec!(0.10), dec!(0.20)],
                reward_risk: vec![dec!(1), dec!(2)],
            },
        });
        let rows = build_report(&trade, dec!(10000), &RiskConfig::default());
        let sizing_row = rows.iter().find(|(label, _)| label == "Position Size").unwrap();
        assert_eq!(sizing_row.1, "0.10 / 0.20");
    }
}
