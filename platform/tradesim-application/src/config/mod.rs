use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tradesim_domain::entities::instrument::{
    Instrument, XAUUSD_PIP_SCALE, XAUUSD_SYMBOL, XAUUSD_TOLERANCE,
};

pub const DEFAULT_DATA_PATH: &str = "data";
pub const DEFAULT_TIMESTAMP_COLUMN: &str = "Local time";
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";
pub const DEFAULT_STEP_SECONDS: i64 = 60;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Every section is optional; an empty file yields the XAUUSD defaults.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub instrument: Option<InstrumentConfig>,
    pub data: Option<DataConfig>,
    pub data_quality: Option<DataQualityConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct InstrumentConfig {
    pub symbol: Option<String>,
    pub pip_scale: Option<f64>,
    pub tolerance: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    pub path: Option<String>,
    pub timestamp_column: Option<String>,
    pub timestamp_format: Option<String>,
    pub expected_step_seconds: Option<i64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct DataQualityConfig {
    pub max_duplicates: Option<usize>,
    pub max_out_of_order: Option<usize>,
    pub max_invalid_bars: Option<usize>,
    pub max_missing_values: Option<usize>,
    pub max_gaps: Option<usize>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Builds the instrument, validating pip scale and tolerance.
    pub fn instrument(&self) -> Result<Instrument, String> {
        let section = self.instrument.as_ref();
        Instrument::new(
            section
                .and_then(|i| i.symbol.clone())
                .unwrap_or_else(|| XAUUSD_SYMBOL.to_string()),
            section.and_then(|i| i.pip_scale).unwrap_or(XAUUSD_PIP_SCALE),
            section.and_then(|i| i.tolerance).unwrap_or(XAUUSD_TOLERANCE),
        )
    }

    pub fn data_path(&self) -> &str {
        self.data
            .as_ref()
            .and_then(|d| d.path.as_deref())
            .unwrap_or(DEFAULT_DATA_PATH)
    }

    pub fn timestamp_column(&self) -> &str {
        self.data
            .as_ref()
            .and_then(|d| d.timestamp_column.as_deref())
            .unwrap_or(DEFAULT_TIMESTAMP_COLUMN)
    }

    pub fn timestamp_format(&self) -> &str {
        self.data
            .as_ref()
            .and_then(|d| d.timestamp_format.as_deref())
            .unwrap_or(DEFAULT_TIMESTAMP_FORMAT)
    }

    pub fn expected_step_seconds(&self) -> Result<i64, String> {
        let step = self
            .data
            .as_ref()
            .and_then(|d| d.expected_step_seconds)
            .unwrap_or(DEFAULT_STEP_SECONDS);
        if step <= 0 {
            return Err("data.expected_step_seconds must be > 0".to_string());
        }
        Ok(step)
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output
            .as_ref()
            .and_then(|o| o.format)
            .unwrap_or_default()
    }
}

/// Reads and validates a TOML config; instrument and step errors surface here
/// rather than at first use.
pub fn load_config(path: &Path) -> Result<Config, String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {}", path.display(), err))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|err| format!("failed to parse TOML {}: {}", path.display(), err))?;
    config
        .instrument()
        .map_err(|err| format!("invalid config {}: {}", path.display(), err))?;
    config
        .expected_step_seconds()
        .map_err(|err| format!("invalid config {}: {}", path.display(), err))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::{load_config, Config, OutputFormat};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn parse_config(toml_str: &str) -> Config {
        toml::from_str(toml_str).expect("config should parse")
    }

    fn unique_tmp_path(name: &str) -> PathBuf {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("tradesim_{name}_{}_{}", std::process::id(), now))
    }

    #[test]
    fn empty_config_uses_xauusd_defaults() {
        let config = parse_config("");
        let instrument = config.instrument().expect("instrument");
        assert_eq!(instrument.symbol, "XAUUSD");
        assert!((instrument.pip_scale - 10.0).abs() < 1e-12);
        assert!((instrument.tolerance - 0.1).abs() < 1e-12);
        assert_eq!(config.data_path(), "data");
        assert_eq!(config.timestamp_column(), "Local time");
        assert_eq!(config.timestamp_format(), "%d.%m.%Y %H:%M:%S");
        assert_eq!(config.expected_step_seconds(), Ok(60));
        assert_eq!(config.output_format(), OutputFormat::Text);
    }

    #[test]
    fn parse_config_reads_all_sections() {
        let config = parse_config(
            r#"
[instrument]
symbol = "XAUUSD"
pip_scale = 10.0
tolerance = 0.05

[data]
path = "prices/"
timestamp_format = "%Y-%m-%d %H:%M"
expected_step_seconds = 300

[data_quality]
max_duplicates = 1
max_gaps = 5

[output]
format = "json"
"#,
        );
        assert_eq!(config.data_path(), "prices/");
        assert_eq!(config.expected_step_seconds(), Ok(300));
        assert_eq!(config.output_format(), OutputFormat::Json);
        let limits = config.data_quality.expect("limits");
        assert_eq!(limits.max_gaps, Some(5));
        assert_eq!(limits.max_out_of_order, None);
    }

    #[test]
    fn parse_config_rejects_unknown_fields() {
        let err = toml::from_str::<Config>("[data]\nfile = \"x.csv\"\n").expect_err("unknown");
        assert!(err.to_string().contains("file"));
    }

    #[test]
    fn load_config_rejects_bad_instrument() {
        let path = unique_tmp_path("config_bad.toml");
        fs::write(&path, "[instrument]\npip_scale = 0.0\n").expect("write config");
        let err = load_config(&path).expect_err("invalid pip scale");
        let _ = fs::remove_file(&path);
        assert!(err.contains("pip_scale"), "{err}");
    }

    #[test]
    fn load_config_reports_missing_file() {
        let err = load_config(&unique_tmp_path("missing.toml")).expect_err("missing");
        assert!(err.starts_with("failed to read config"));
    }
}
