//! Service configuration from the environment

use crate::catalog::CatalogFilter;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CITIES_URL: &str = "https://api.travelpayouts.com/data/ru/cities.json";

/// Where purchase links point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseLinkConfig {
    pub site: String,
    pub marker: String,
}

impl Default for PurchaseLinkConfig {
    fn default() -> Self {
        Self {
            site: "yourtravel.site".to_string(),
            marker: "123456".to_string(),
        }
    }
}

impl PurchaseLinkConfig {
    /// Affiliate purchase link. Values are substituted verbatim.
    pub fn link(&self, agency: &str, flight_number: &str) -> String {
        format!(
            "https://{}/buy?marker={}&flight={flight_number}&agent={agency}",
            self.site, self.marker
        )
    }
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub port: u16,
    pub catalog_path: PathBuf,
    pub cities_url: String,
    pub directory_timeout: Duration,
    /// Zero disables directory caching
    pub directory_ttl: Duration,
    pub catalog_filter: CatalogFilter,
    pub purchase: PurchaseLinkConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            catalog_path: PathBuf::from("flights.json"),
            cities_url: DEFAULT_CITIES_URL.to_string(),
            directory_timeout: Duration::from_secs(10),
            directory_ttl: Duration::from_secs(3600),
            catalog_filter: CatalogFilter::default(),
            purchase: PurchaseLinkConfig::default(),
        }
    }
}

impl BotConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparseable values fall back
    /// to defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let secs = |key: &str, default: Duration| {
            parsed::<u64>(&lookup, key).map_or(default, Duration::from_secs)
        };

        Self {
            port: parsed(&lookup, "FLIGHT_DESK_PORT").unwrap_or(defaults.port),
            catalog_path: lookup("FLIGHT_DESK_CATALOG_PATH")
                .map_or(defaults.catalog_path, PathBuf::from),
            cities_url: lookup("FLIGHT_DESK_CITIES_URL").unwrap_or(defaults.cities_url),
            directory_timeout: secs(
                "FLIGHT_DESK_DIRECTORY_TIMEOUT_SECS",
                defaults.directory_timeout,
            ),
            directory_ttl: secs("FLIGHT_DESK_DIRECTORY_TTL_SECS", defaults.directory_ttl),
            catalog_filter: parsed(&lookup, "FLIGHT_DESK_CATALOG_FILTER")
                .unwrap_or(defaults.catalog_filter),
            purchase: PurchaseLinkConfig {
                site: lookup("FLIGHT_DESK_PURCHASE_SITE").unwrap_or(defaults.purchase.site),
                marker: lookup("FLIGHT_DESK_AFFILIATE_MARKER").unwrap_or(defaults.purchase.marker),
            },
        }
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "Ignoring invalid configuration value");
            None
        }
    }
}
