//! Static flight catalog
//!
//! The catalog is a JSON array of offers read fresh from disk on every
//! query, in file order.

use crate::directory::CityDirectory;
use crate::route::RouteQuery;
use crate::runtime::FlightSource;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// A purchasing agency listed for an offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agency {
    pub name: String,
}

/// Ticket price, either a bare number or a preformatted string like `"350 USD"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Amount(serde_json::Number),
    Text(String),
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Amount(n) => write!(f, "{n}"),
            Price::Text(s) => f.write_str(s),
        }
    }
}

/// One flight record from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOffer {
    pub flight_number: String,
    pub airline: String,
    pub aircraft: String,
    #[serde(rename = "from")]
    pub origin: String,
    #[serde(rename = "to")]
    pub destination: String,
    #[serde(default)]
    pub stopovers: String,
    pub price: Price,
    #[serde(default)]
    pub agencies: Vec<Agency>,
    /// Departure date as `DD.MM.YYYY`, only consulted by route filtering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read flight catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("flight catalog {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Catalog backed by a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FlightSource for JsonFileCatalog {
    async fn load_offers(&self) -> Result<Vec<FlightOffer>, CatalogError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| CatalogError::Io {
                path: self.path.clone(),
                source,
            })?;
        let offers: Vec<FlightOffer> =
            serde_json::from_slice(&bytes).map_err(|source| CatalogError::Parse {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(
            path = %self.path.display(),
            offers = offers.len(),
            "Loaded flight catalog"
        );
        Ok(offers)
    }
}

/// How a route query narrows the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogFilter {
    /// Every offer is returned whatever the query says
    #[default]
    PassThrough,
    /// Only offers whose cities (and date, when the offer has one) match
    Route,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown catalog filter `{0}` (expected `passthrough` or `route`)")]
pub struct UnknownCatalogFilter(String);

impl FromStr for CatalogFilter {
    type Err = UnknownCatalogFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "passthrough" | "pass-through" | "all" => Ok(CatalogFilter::PassThrough),
            "route" => Ok(CatalogFilter::Route),
            other => Err(UnknownCatalogFilter(other.to_string())),
        }
    }
}

/// Select the offers answering `query`, preserving catalog order.
pub fn find_offers(
    offers: Vec<FlightOffer>,
    query: &RouteQuery,
    directory: &CityDirectory,
    filter: CatalogFilter,
) -> Vec<FlightOffer> {
    match filter {
        CatalogFilter::PassThrough => offers,
        CatalogFilter::Route => offers
            .into_iter()
            .filter(|offer| matches_route(offer, query, directory))
            .collect(),
    }
}

fn matches_route(offer: &FlightOffer, query: &RouteQuery, directory: &CityDirectory) -> bool {
    if !directory.names_city(&offer.origin, &query.origin)
        || !directory.names_city(&offer.destination, &query.destination)
    {
        return false;
    }
    match &offer.date {
        None => true,
        Some(date) => {
            let offer_date = NaiveDate::parse_from_str(date.trim(), "%d.%m.%Y").ok();
            offer_date.is_some() && offer_date == query.date.to_naive_date()
        }
    }
}
