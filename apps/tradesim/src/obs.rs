use clap::ValueEnum;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

const LOG_FILTER_ENV: &str = "TRADESIM_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Installs the global subscriber. `TRADESIM_LOG` overrides `log_level`.
/// Log lines go to stderr; stdout carries only the trade report.
pub fn init_tracing(log_level: &str, format: LogFormat) -> Result<(), String> {
    let filter = std::env::var(LOG_FILTER_ENV).unwrap_or_else(|_| log_level.to_string());
    let env_filter = EnvFilter::try_new(&filter)
        .map_err(|err| format!("invalid log filter '{filter}': {err}"))?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }
    Ok(())
}

/// Blank values count as "not set" so an empty `TRADESIM_METRICS_ADDR` is harmless.
fn parse_metrics_addr(raw: Option<&str>) -> Result<Option<SocketAddr>, String> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    raw.parse()
        .map(Some)
        .map_err(|err| format!("invalid --metrics-addr '{raw}' (expected host:port): {err}"))
}

#[cfg(feature = "prometheus")]
pub fn init_metrics(metrics_addr: Option<&str>) -> Result<Option<SocketAddr>, String> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let Some(addr) = parse_metrics_addr(metrics_addr)? else {
        return Ok(None);
    };
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|err| format!("failed to install prometheus exporter on {addr}: {err}"))?;

    tracing::info!(metrics_addr = %addr, "prometheus metrics exporter enabled");
    Ok(Some(addr))
}

#[cfg(not(feature = "prometheus"))]
pub fn init_metrics(metrics_addr: Option<&str>) -> Result<Option<SocketAddr>, String> {
    match parse_metrics_addr(metrics_addr)? {
        Some(_) => Err("metrics exporter requires tradesim feature `prometheus`".to_string()),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_metrics_addr;

    #[test]
    fn blank_metrics_addr_disables_exporter() {
        assert_eq!(parse_metrics_addr(None).expect("none"), None);
        assert_eq!(parse_metrics_addr(Some("  ")).expect("blank"), None);
    }

    #[test]
    fn metrics_addr_must_be_host_port() {
        let addr = parse_metrics_addr(Some(" 127.0.0.1:9898 "))
            .expect("valid")
            .expect("some");
        assert_eq!(addr.port(), 9898);

        let err = parse_metrics_addr(Some("localhost")).expect_err("no port");
        assert!(err.starts_with("invalid --metrics-addr 'localhost'"), "{err}");
    }
}
