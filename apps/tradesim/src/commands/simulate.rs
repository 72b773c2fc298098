use std::path::PathBuf;
use tradesim_application::config::OutputFormat;
use tradesim_application::monitoring::{monitor_trade, TradeTicket};
use tradesim_application::reporting::render_text;
use tradesim_application::shared::{parse_breakeven, parse_entry_time};
use tradesim_domain::value_objects::side::Side;

pub struct SimulateArgs {
    pub entry: String,
    pub side: String,
    pub sl: Option<f64>,
    pub tp: Option<f64>,
    pub sl_pips: Option<f64>,
    pub tp_pips: Option<f64>,
    pub breakeven: Option<String>,
    pub data: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
}

pub(super) fn run_simulate(args: SimulateArgs) -> Result<(), String> {
    let config = super::common::load_optional_config(args.config.as_deref())?;
    let data_path = crate::infra::resolve_data_path(&config, args.data.as_deref());
    super::common::log_config_summary("simulate", &config, &data_path);

    let ticket = TradeTicket {
        side: Side::parse(&args.side)?,
        entry_time: parse_entry_time(&args.entry, config.timestamp_format())?,
        levels: super::common::resolve_levels(args.sl, args.tp, args.sl_pips, args.tp_pips)?,
        breakeven: args.breakeven.as_deref().map(parse_breakeven).transpose()?,
    };

    let market_data = crate::infra::build_market_data_repo(&config, args.data.as_deref());
    let report = monitor_trade(&config, &ticket, market_data.as_ref())?;

    if args.json || config.output_format() == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|err| format!("failed to serialize trade report: {err}"))?;
        println!("{json}");
    } else {
        println!("{}", render_text(&report));
    }
    Ok(())
}
