use crate::monitoring::TradeReport;
use tradesim_domain::services::runtime::format_clock;
use tradesim_domain::value_objects::outcome::{EntryContext, TradeResult};
use tradesim_domain::value_objects::trade_event::{EventKind, Phase, TradeEvent};
use tradesim_domain::value_objects::trade_request::ScanPolicy;

pub const NO_DATA_AT_ENTRY: &str = "No data found for the specified entry time. Possible reasons: incorrect date/time or missing data in the CSV file.";
pub const NO_DATA_AFTER_ENTRY: &str = "No data available after the specified entry time.";

/// Human-readable trade report, one entry per output line.
pub fn render_lines(report: &TradeReport) -> Vec<String> {
    let outcome = &report.outcome;
    if outcome.result.is_rejection() {
        return vec![rejection_line(&outcome.result)];
    }
    let Some(entry) = outcome.entry.as_ref() else {
        return vec![NO_DATA_AT_ENTRY.to_string()];
    };

    let mut lines = header_lines(&report.symbol, entry);
    for event in outcome.events_in(Phase::Primary) {
        push_event(&mut lines, entry, event);
    }

    let secondary_header = match outcome.policy {
        ScanPolicy::PlainRace => None,
        ScanPolicy::BreakevenThreeR => Some("(3R System)"),
        ScanPolicy::ThreeROnly => Some("( 3R System (Without Breakeven) )"),
    };
    if let Some(title) = secondary_header {
        lines.push(title.to_string());
        lines.push(format!(
            "3R TP: {:.3} ({:.2} pips)",
            entry.three_r_target, entry.three_r_pips
        ));
        for event in outcome.events_in(Phase::Secondary) {
            push_event(&mut lines, entry, event);
        }
    }

    lines
}

pub fn render_text(report: &TradeReport) -> String {
    render_lines(report).join("\n")
}

fn rejection_line(result: &TradeResult) -> String {
    if let Some(failure) = result.validation_failure() {
        return format!("Invalid input: {failure}");
    }
    match result {
        TradeResult::NoDataAfterEntry => NO_DATA_AFTER_ENTRY.to_string(),
        _ => NO_DATA_AT_ENTRY.to_string(),
    }
}

fn header_lines(symbol: &str, entry: &EntryContext) -> Vec<String> {
    vec![
        format!("Pair: {symbol}"),
        format!("Trade Type: {}", entry.side.label()),
        format!(
            "Entry Price: {:.3} | Time: {}",
            entry.entry_price,
            format_clock(entry.entry_time)
        ),
        format!(
            "SL Price: {:.3} ({:.2} pips) | TP Price: {:.3} ({:.2} pips)",
            entry.stop_loss, entry.risk_pips, entry.take_profit, entry.reward_pips
        ),
    ]
}

fn push_event(lines: &mut Vec<String>, entry: &EntryContext, event: &TradeEvent) {
    let when = format!(
        "Time: {} | Runtime: {}",
        format_clock(event.timestamp),
        event.runtime()
    );
    match event.kind {
        EventKind::TakeProfitHit => {
            lines.push(format!("Take Profit hit: {:.3} | {when}", event.price));
            lines.push(format!("PnL: {:.2}R", event.risk_multiple.unwrap_or_default()));
            lines.push(String::new());
        }
        EventKind::StopLossHit => {
            lines.push(format!("Stoploss hit: {:.3} | {when}", event.price));
            lines.push("PnL: -1R".to_string());
            lines.push(String::new());
        }
        EventKind::BreakevenArmed => {
            lines.push(format!("Breakeven at: {:.3} | {when}", event.price));
        }
        EventKind::BreakevenHit => {
            lines.push(format!("Breakeven hit: {:.3} | {when}", event.price));
        }
        EventKind::ThreeRHit => {
            lines.push(format!(
                "3R hit: {:.3} ({:.2} pips) | {when}",
                event.price, entry.three_r_pips
            ));
        }
        EventKind::Unresolved => {
            lines.push(format!(
                "No SL/TP hit. Last price checked: {:.3} at {}.",
                event.price,
                format_clock(event.timestamp)
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{render_lines, NO_DATA_AFTER_ENTRY, NO_DATA_AT_ENTRY};
    use crate::monitoring::{evaluate_ticket, Levels, TradeTicket};
    use tradesim_domain::aggregates::price_series::PriceSeries;
    use tradesim_domain::services::simulator::Simulator;
    use tradesim_domain::value_objects::bar::Bar;
    use tradesim_domain::value_objects::side::Side;

    const ENTRY: i64 = 1_614_592_800;

    fn bar(minutes: i64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            timestamp: ENTRY + minutes * 60,
            open: close,
            high,
            low,
            close,
        }
    }

    fn ticket(breakeven: Option<bool>) -> TradeTicket {
        TradeTicket {
            side: Side::Buy,
            entry_time: ENTRY,
            levels: Levels::Prices {
                stop_loss: 1795.0,
                take_profit: 1810.0,
            },
            breakeven,
        }
    }

    fn render(bars: Vec<Bar>, breakeven: Option<bool>) -> Vec<String> {
        let series = PriceSeries::new(bars).expect("series");
        let report = evaluate_ticket(&Simulator::default(), &series, &ticket(breakeven))
            .expect("report");
        render_lines(&report)
    }

    #[test]
    fn renders_take_profit_report() {
        let lines = render(
            vec![bar(0, 1800.0, 1800.0, 1800.0), bar(90, 1810.0, 1801.0, 1809.0)],
            None,
        );
        assert_eq!(
            lines,
            vec![
                "Pair: XAUUSD",
                "Trade Type: Buy",
                "Entry Price: 1800.000 | Time: 10:00 AM (01 March 2021)",
                "SL Price: 1795.000 (50.00 pips) | TP Price: 1810.000 (100.00 pips)",
                "Take Profit hit: 1810.000 | Time: 11:30 AM (01 March 2021) | Runtime: 1H 30Min",
                "PnL: 2.00R",
                "",
            ]
        );
    }

    #[test]
    fn renders_breakeven_section() {
        let lines = render(
            vec![
                bar(0, 1800.0, 1800.0, 1800.0),
                bar(1, 1805.0, 1802.0, 1804.0),
                bar(2, 1804.0, 1800.0, 1800.0),
            ],
            Some(true),
        );
        assert_eq!(lines[4], "(3R System)");
        assert_eq!(lines[5], "3R TP: 1815.000 (150.00 pips)");
        assert_eq!(
            lines[6],
            "Breakeven at: 1800.000 | Time: 10:01 AM (01 March 2021) | Runtime: 1Min"
        );
        assert_eq!(
            lines[7],
            "Breakeven hit: 1800.000 | Time: 10:02 AM (01 March 2021) | Runtime: 2Min"
        );
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn renders_unresolved_three_r_without_breakeven() {
        let lines = render(
            vec![bar(0, 1800.0, 1800.0, 1800.0), bar(1, 1801.0, 1799.0, 1800.5)],
            Some(false),
        );
        assert_eq!(lines[4], "( 3R System (Without Breakeven) )");
        assert_eq!(
            lines.last().map(String::as_str),
            Some("No SL/TP hit. Last price checked: 1800.500 at 10:01 AM (01 March 2021).")
        );
    }

    #[test]
    fn renders_rejections_as_single_line() {
        let lines = render(vec![bar(0, 1800.0, 1800.0, 1800.0)], None);
        assert_eq!(lines, vec![NO_DATA_AFTER_ENTRY]);

        let series = PriceSeries::new(vec![bar(0, 1800.0, 1800.0, 1800.0)]).expect("series");
        let mut bad = ticket(None);
        bad.levels = Levels::Prices {
            stop_loss: 1790.0,
            take_profit: 1799.0,
        };
        let report = evaluate_ticket(&Simulator::default(), &series, &bad).expect("report");
        assert_eq!(
            render_lines(&report),
            vec!["Invalid input: For a Buy trade, TP should be above the entry price."]
        );

        let later = PriceSeries::new(vec![bar(1, 1800.0, 1800.0, 1800.0)]).expect("series");
        let report =
            evaluate_ticket(&Simulator::default(), &later, &ticket(Some(true))).expect("report");
        assert_eq!(render_lines(&report), vec![NO_DATA_AT_ENTRY]);
    }
}
