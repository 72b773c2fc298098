use std::path::PathBuf;

pub(super) fn run_validate(
    data: Option<PathBuf>,
    config_path: Option<PathBuf>,
    strict: bool,
) -> Result<(), String> {
    let config = super::common::load_optional_config(config_path.as_deref())?;
    let data_path = crate::infra::resolve_data_path(&config, data.as_deref());
    super::common::log_config_summary("validate", &config, &data_path);

    let market_data = crate::infra::build_market_data_repo(&config, data.as_deref());
    let report =
        tradesim_application::validation::validate(&config, strict, market_data.as_ref())?;

    let json = serde_json::to_string_pretty(&report)
        .map_err(|err| format!("failed to serialize validation report: {err}"))?;
    println!("{json}");
    Ok(())
}
