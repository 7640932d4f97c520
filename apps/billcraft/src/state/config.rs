//! # Configuration State
//!
//! Business details, currency display and policy switches, loaded once at
//! startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BILLCRAFT_TAX_RATE=12                                              │
//! │     BILLCRAFT_DATA=/srv/books/ledger.json                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/billcraft/config.toml (Linux)                            │
//! │     ~/Library/Application Support/com.billcraft.billcraft/config.toml  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     INR (₹), lakh/crore grouping, 18% split tax, monotonic numbering   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! business_name = "Acme Studio"
//! currency_code = "INR"
//! currency_symbol = "₹"
//! currency_decimals = 2
//! digit_grouping = "indian"     # indian | western
//! default_tax_rate = 18
//! default_tax_mode = "split"    # split | single
//! numbering = "monotonic"       # monotonic | collection_size
//! data_file = "/srv/books/ledger.json"
//!
//! [metrics]
//! revenue = "confirmed"         # all | confirmed
//! collected_tax = "all"
//! revenue_series = "all"
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after loading, so no mutex needed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use billcraft_core::validation::coerce_decimal;
use billcraft_core::{MetricsPolicy, Money, NumberingPolicy, Percent, TaxMode, DEFAULT_TAX_RATE};

/// Largest supported number of currency decimals.
const MAX_CURRENCY_DECIMALS: u32 = 6;

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// How the integer part of an amount is grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitGrouping {
    /// `12,34,567`: thousands, then lakhs and crores.
    #[default]
    Indian,
    /// `1,234,567`: groups of three.
    Western,
}

impl DigitGrouping {
    /// Inserts separators into a string of ASCII digits.
    pub fn group(&self, digits: &str) -> String {
        if digits.len() <= 3 {
            return digits.to_string();
        }

        let (head, tail) = digits.split_at(digits.len() - 3);
        let step = match self {
            DigitGrouping::Indian => 2,
            DigitGrouping::Western => 3,
        };

        let mut groups = Vec::new();
        let mut end = head.len();
        while end > step {
            groups.push(&head[end - step..end]);
            end -= step;
        }
        groups.push(&head[..end]);
        groups.reverse();

        format!("{},{}", groups.join(","), tail)
    }
}

impl std::str::FromStr for DigitGrouping {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "indian" | "lakh" => Ok(DigitGrouping::Indian),
            "western" | "international" => Ok(DigitGrouping::Western),
            other => Err(ConfigError::Invalid(format!(
                "Unknown digit grouping: '{}'. Valid options: indian, western",
                other
            ))),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigState {
    /// Shown in report headers.
    #[serde(default = "default_business_name")]
    pub business_name: String,

    /// Currency code (ISO 4217)
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    /// Currency symbol (for display)
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Number of decimal places for currency
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u32,

    #[serde(default)]
    pub digit_grouping: DigitGrouping,

    /// Rate given to lines that do not state one.
    #[serde(default = "default_tax_rate")]
    pub default_tax_rate: Percent,

    #[serde(default)]
    pub default_tax_mode: TaxMode,

    #[serde(default)]
    pub numbering: NumberingPolicy,

    #[serde(default)]
    pub metrics: MetricsPolicy,

    /// Ledger file override. Platform data dir when unset.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
}

fn default_business_name() -> String {
    "My Business".to_string()
}

fn default_currency_code() -> String {
    "INR".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_currency_decimals() -> u32 {
    2
}

fn default_tax_rate() -> Percent {
    Percent::from_whole(DEFAULT_TAX_RATE)
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            business_name: default_business_name(),
            currency_code: default_currency_code(),
            currency_symbol: default_currency_symbol(),
            currency_decimals: default_currency_decimals(),
            digit_grouping: DigitGrouping::default(),
            default_tax_rate: default_tax_rate(),
            default_tax_mode: TaxMode::default(),
            numbering: NumberingPolicy::default(),
            metrics: MetricsPolicy::default(),
            data_file: None,
        }
    }
}

impl ConfigState {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, or `config.toml` in the config dir)
    /// 3. Environment variables
    ///
    /// An explicit `config_path` must exist; the default one may not.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// [`ConfigState::load`] with overrides read through `lookup` instead of
    /// the process environment.
    pub fn load_with(
        config_path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path)),
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                other => {
                    debug!(path = ?other, "Config file not found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.currency_code.trim().is_empty() {
            return Err(ConfigError::Invalid("currency_code must not be empty".into()));
        }

        if self.currency_decimals > MAX_CURRENCY_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "currency_decimals must be at most {}",
                MAX_CURRENCY_DECIMALS
            )));
        }

        if self.default_tax_rate < Percent::ZERO || self.default_tax_rate > Percent::HUNDRED {
            return Err(ConfigError::Invalid(
                "default_tax_rate must be between 0 and 100".into(),
            ));
        }

        Ok(())
    }

    /// Applies overrides from `lookup` (an environment or a test map).
    ///
    /// Unparseable values are logged and skipped.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("BILLCRAFT_BUSINESS_NAME") {
            self.business_name = name;
        }

        if let Some(code) = lookup("BILLCRAFT_CURRENCY_CODE") {
            self.currency_code = code;
        }

        if let Some(symbol) = lookup("BILLCRAFT_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(decimals) = lookup("BILLCRAFT_CURRENCY_DECIMALS") {
            match decimals.parse::<u32>() {
                Ok(d) => self.currency_decimals = d,
                Err(_) => warn!(value = %decimals, "Ignoring invalid BILLCRAFT_CURRENCY_DECIMALS"),
            }
        }

        if let Some(grouping) = lookup("BILLCRAFT_DIGIT_GROUPING") {
            match grouping.parse() {
                Ok(g) => self.digit_grouping = g,
                Err(_) => warn!(value = %grouping, "Ignoring invalid BILLCRAFT_DIGIT_GROUPING"),
            }
        }

        if let Some(rate) = lookup("BILLCRAFT_TAX_RATE") {
            debug!(rate = %rate, "Overriding default tax rate from environment");
            self.default_tax_rate = Percent::new(coerce_decimal(&rate));
        }

        if let Some(mode) = lookup("BILLCRAFT_TAX_MODE") {
            match mode.parse() {
                Ok(m) => self.default_tax_mode = m,
                Err(_) => warn!(mode = %mode, "Ignoring invalid BILLCRAFT_TAX_MODE"),
            }
        }

        if let Some(policy) = lookup("BILLCRAFT_NUMBERING") {
            match policy.parse() {
                Ok(p) => self.numbering = p,
                Err(_) => warn!(policy = %policy, "Ignoring invalid BILLCRAFT_NUMBERING"),
            }
        }

        if let Some(path) = lookup("BILLCRAFT_DATA") {
            debug!(path = %path, "Overriding ledger path from environment");
            self.data_file = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "billcraft", "billcraft")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Formats an amount with symbol, grouping and the configured decimals.
    ///
    /// Rounds half away from zero.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::new(dec!(1234567.891))), "₹12,34,567.89");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let rounded = amount.rounded(self.currency_decimals);
        let digits = format!(
            "{:.*}",
            self.currency_decimals as usize,
            rounded.abs().amount()
        );
        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (digits.as_str(), None),
        };

        let mut out = String::new();
        if rounded.is_negative() {
            out.push('-');
        }
        out.push_str(&self.currency_symbol);
        out.push_str(&self.digit_grouping.group(whole));
        if let Some(fraction) = fraction {
            out.push('.');
            out.push_str(fraction);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billcraft_core::StatusScope;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_format_currency_indian() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::new(dec!(1234567.891))), "₹12,34,567.89");
        assert_eq!(config.format_currency(Money::from_major(1062)), "₹1,062.00");
        assert_eq!(config.format_currency(Money::from_major(999)), "₹999.00");
        assert_eq!(config.format_currency(Money::zero()), "₹0.00");
        assert_eq!(config.format_currency(Money::new(dec!(0.005))), "₹0.01");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::new(dec!(-150000))), "-₹1,50,000.00");
    }

    #[test]
    fn test_format_currency_western_no_decimals() {
        let config = ConfigState {
            currency_symbol: "$".to_string(),
            currency_decimals: 0,
            digit_grouping: DigitGrouping::Western,
            ..ConfigState::default()
        };
        assert_eq!(config.format_currency(Money::new(dec!(1234567.5))), "$1,234,568");
    }

    #[test]
    fn test_grouping() {
        assert_eq!(DigitGrouping::Indian.group("100000"), "1,00,000");
        assert_eq!(DigitGrouping::Indian.group("10000000"), "1,00,00,000");
        assert_eq!(DigitGrouping::Western.group("10000000"), "10,000,000");
        assert_eq!(DigitGrouping::Western.group("1000"), "1,000");
    }

    #[test]
    fn test_toml_file_with_partial_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
business_name = "Acme Studio"
default_tax_rate = 12
numbering = "collection_size"

[metrics]
revenue = "confirmed"
collected_tax = "confirmed"
revenue_series = "all"
"#,
        )
        .unwrap();

        let config = ConfigState::from_file(&path).unwrap();
        assert_eq!(config.business_name, "Acme Studio");
        assert_eq!(config.default_tax_rate, Percent::from_whole(12));
        assert_eq!(config.numbering, NumberingPolicy::CollectionSize);
        assert_eq!(config.metrics.collected_tax, StatusScope::Confirmed);
        // Untouched fields keep defaults
        assert_eq!(config.currency_code, "INR");
        assert_eq!(config.default_tax_mode, TaxMode::Split);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = ConfigState::load_with(Some(dir.path().join("nope.toml")), |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_with_reads_overrides_from_lookup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "data_file = \"/from/file.json\"\n").unwrap();

        let from_file = ConfigState::load_with(Some(path.clone()), |_| None).unwrap();
        assert_eq!(from_file.data_file, Some(PathBuf::from("/from/file.json")));

        let overridden = ConfigState::load_with(Some(path), |key| {
            (key == "BILLCRAFT_DATA").then(|| "/from/env.json".to_string())
        })
        .unwrap();
        assert_eq!(overridden.data_file, Some(PathBuf::from("/from/env.json")));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("BILLCRAFT_TAX_RATE", "5"),
            ("BILLCRAFT_TAX_MODE", "single"),
            ("BILLCRAFT_DIGIT_GROUPING", "western"),
            ("BILLCRAFT_NUMBERING", "bogus"),
            ("BILLCRAFT_DATA", "/tmp/books.json"),
        ]
        .into_iter()
        .collect();

        let mut config = ConfigState::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.default_tax_rate, Percent::from_whole(5));
        assert_eq!(config.default_tax_mode, TaxMode::Single);
        assert_eq!(config.digit_grouping, DigitGrouping::Western);
        assert_eq!(config.numbering, NumberingPolicy::Monotonic);
        assert_eq!(config.data_file, Some(PathBuf::from("/tmp/books.json")));
    }

    #[test]
    fn test_validation() {
        let mut config = ConfigState::default();
        assert!(config.validate().is_ok());

        config.currency_decimals = 9;
        assert!(config.validate().is_err());

        config.currency_decimals = 2;
        config.default_tax_rate = Percent::from_whole(120);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ConfigState::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("[metrics]"));
        let back: ConfigState = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
