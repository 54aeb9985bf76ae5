//! CLI configuration.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use pixel_commerce::checkout::ShippingPolicy;
use pixel_commerce::money::{Currency, Money};
use pixel_commerce::search::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use pixel_observability::LogConfig;
use serde::{Deserialize, Serialize};

pub const ENV_PROVIDER_URL: &str = "PIXEL_PROVIDER_URL";
pub const ENV_ANON_KEY: &str = "PIXEL_ANON_KEY";
pub const ENV_SERVICE_KEY: &str = "PIXEL_SERVICE_KEY";

/// Config file names, searched from the working directory upwards.
pub const CONFIG_NAMES: [&str; 3] = ["pixel.toml", ".pixel.toml", "pixel.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Provider connection.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Shipping rules used for cart totals.
    #[serde(default)]
    pub shipping: ShippingConfig,

    /// Catalog listing.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LogConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Environment variables win over the file.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = set(ENV_PROVIDER_URL) {
            self.provider.url = Some(url);
        }
        if let Some(key) = set(ENV_ANON_KEY) {
            self.provider.anon_key = Some(key);
        }
        if let Some(key) = set(ENV_SERVICE_KEY) {
            self.provider.service_key = Some(key);
        }
    }

    /// Shipping policy from the `[shipping]` section.
    pub fn shipping_policy(&self) -> Result<ShippingPolicy> {
        let currency = Currency::from_code(&self.shipping.currency)
            .ok_or_else(|| anyhow!("Unknown currency: {}", self.shipping.currency))?;
        let threshold = Money::parse(&self.shipping.free_shipping_threshold, currency)
            .context("shipping.free_shipping_threshold")?;
        let fee = Money::parse(&self.shipping.flat_fee, currency).context("shipping.flat_fee")?;
        Ok(ShippingPolicy::new(threshold, fee)?)
    }

    /// Problems that make the config unusable, then advisories.
    pub fn check(&self) -> (Vec<String>, Vec<String>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        match &self.provider.url {
            Some(url) if !(url.starts_with("https://") || url.starts_with("http://")) => {
                errors.push(format!("provider.url '{}' must be an http(s) URL", url));
            }
            Some(url) if url.starts_with("http://") => {
                warnings.push("provider.url is not using https".to_string());
            }
            Some(_) => {
                if self.provider.anon_key.is_none() {
                    errors.push(format!("provider.anon_key is required (or set {})", ENV_ANON_KEY));
                }
            }
            None => warnings.push(format!(
                "provider.url is not set; only --offline mode will work (or set {})",
                ENV_PROVIDER_URL
            )),
        }
        if self.provider.timeout_secs == 0 {
            errors.push("provider.timeout_secs must be at least 1".to_string());
        }

        if let Err(e) = self.shipping_policy() {
            errors.push(format!("shipping: {:#}", e));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.catalog.page_size) {
            errors.push(format!("catalog.page_size must be 1-{}", MAX_PAGE_SIZE));
        }

        (errors, warnings)
    }
}

/// Provider connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Project URL, e.g. `https://project.provider.co`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Public (anon) API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,

    /// Service key for admin reads. Sent as the bearer token when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_key: Option<String>,

    /// Request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            service_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Shipping settings; amounts are decimal strings in `currency`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingConfig {
    #[serde(default = "default_threshold")]
    pub free_shipping_threshold: String,

    #[serde(default = "default_flat_fee")]
    pub flat_fee: String,

    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_threshold() -> String {
    "99.00".to_string()
}

fn default_flat_fee() -> String {
    "15.90".to_string()
}

fn default_currency() -> String {
    "BRL".to_string()
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            free_shipping_threshold: default_threshold(),
            flat_fee: default_flat_fee(),
            currency: default_currency(),
        }
    }
}

/// Catalog listing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Products per page.
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Generate a default pixel.toml config file.
pub fn generate_default_config() -> String {
    r#"# Pixel storefront CLI configuration

[provider]
# url = "https://your-project.provider.co"
# anon_key = "public-anon-key"
# service_key = "service-role-key"
timeout_secs = 10

[shipping]
free_shipping_threshold = "99.00"
flat_fee = "15.90"
currency = "BRL"

[catalog]
page_size = 12

[logging]
level = "info"
format = "human"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_parses_and_matches_defaults() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.catalog.page_size, 12);
        assert_eq!(config.provider.timeout_secs, 10);
        assert_eq!(config.shipping_policy().unwrap(), ShippingPolicy::default());
        let (errors, warnings) = config.check();
        assert!(errors.is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config: CliConfig = toml::from_str(
            r#"
            [provider]
            url = "https://file.provider.co"
            anon_key = "file-key"
            "#,
        )
        .unwrap();
        let env: HashMap<&str, &str> = [
            (ENV_PROVIDER_URL, "https://env.provider.co"),
            (ENV_SERVICE_KEY, "service"),
            (ENV_ANON_KEY, "  "),
        ]
        .into_iter()
        .collect();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.provider.url.as_deref(), Some("https://env.provider.co"));
        assert_eq!(config.provider.anon_key.as_deref(), Some("file-key"));
        assert_eq!(config.provider.service_key.as_deref(), Some("service"));
    }

    #[test]
    fn test_check_reports_bad_values() {
        let mut config = CliConfig::default();
        config.provider.url = Some("ftp://nope".to_string());
        config.shipping.flat_fee = "abc".to_string();
        config.catalog.page_size = 0;
        let (errors, _) = config.check();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_json_config() {
        let config: CliConfig = serde_json::from_str(
            r#"{ "shipping": { "free_shipping_threshold": "150.00" }, "catalog": { "page_size": 24 } }"#,
        )
        .unwrap();
        let policy = config.shipping_policy().unwrap();
        assert_eq!(policy.free_shipping_threshold(), Money::brl(15000));
        assert_eq!(policy.flat_fee(), Money::brl(1590));
        assert_eq!(config.catalog.page_size, 24);
    }
}
