//! City directory client
//!
//! Maps airport/city codes to display names using a remote catalog. Every
//! failure degrades to an empty directory, in which case callers show the
//! raw codes.

use crate::i18n::Language;
use crate::runtime::CitySource;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Code to display-name mapping. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityDirectory {
    names: Arc<HashMap<String, String>>,
}

impl CityDirectory {
    pub fn new(names: HashMap<String, String>) -> Self {
        Self {
            names: Arc::new(names),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    /// Display name for `code`, or the code itself when unknown
    pub fn display_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.get(code).unwrap_or(code)
    }

    /// Whether `text` names the city behind `code`, by display name or by
    /// the raw code, ignoring case.
    pub fn names_city(&self, code: &str, text: &str) -> bool {
        let text = text.trim().to_lowercase();
        code.to_lowercase() == text
            || self
                .get(code)
                .is_some_and(|name| name.to_lowercase() == text)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(String, String)> for CityDirectory {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Why a directory fetch failed. Never shown to users.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory request timed out")]
    Timeout,
    #[error("directory request failed: {0}")]
    Network(#[source] reqwest::Error),
    #[error("directory service returned HTTP {0}")]
    Status(u16),
    #[error("malformed directory payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl From<reqwest::Error> for DirectoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DirectoryError::Timeout
        } else {
            DirectoryError::Network(err)
        }
    }
}

/// One entry of the remote city catalog
#[derive(Debug, Deserialize)]
struct CityRecord {
    code: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    name_translations: HashMap<String, Option<String>>,
}

impl CityRecord {
    fn translation(&self, language: Language) -> Option<&str> {
        self.name_translations
            .get(language.code())
            .and_then(Option::as_deref)
            .filter(|s| !s.is_empty())
    }

    /// Name in `language`, then the untranslated name, then Russian
    fn display_name(&self, language: Language) -> Option<&str> {
        self.translation(language)
            .or_else(|| self.name.as_deref().filter(|s| !s.is_empty()))
            .or_else(|| self.translation(Language::Ru))
    }
}

fn build_directory(records: &[CityRecord], language: Language) -> CityDirectory {
    records
        .iter()
        .filter_map(|record| {
            record
                .display_name(language)
                .map(|name| (record.code.clone(), name.to_string()))
        })
        .collect()
}

/// Fetches the directory over HTTP on every call
pub struct HttpCityDirectory {
    client: Client,
    url: String,
}

impl HttpCityDirectory {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DirectoryError::Network)?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub async fn try_fetch(&self, language: Language) -> Result<CityDirectory, DirectoryError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        let records: Vec<CityRecord> = serde_json::from_slice(&body)?;
        Ok(build_directory(&records, language))
    }
}

#[async_trait]
impl CitySource for HttpCityDirectory {
    async fn fetch_directory(&self, language: Language) -> CityDirectory {
        match self.try_fetch(language).await {
            Ok(directory) => {
                tracing::debug!(cities = directory.len(), %language, "Loaded city directory");
                directory
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    url = %self.url,
                    "Failed to load city names, showing raw codes"
                );
                CityDirectory::empty()
            }
        }
    }
}

/// Keeps successful fetches per language for a fixed TTL.
///
/// Empty directories are never cached so a failed fetch is retried on the
/// next query. A zero TTL disables caching.
pub struct CachedCityDirectory<S> {
    inner: S,
    ttl: Duration,
    entries: RwLock<HashMap<Language, (Instant, CityDirectory)>>,
}

impl<S: CitySource> CachedCityDirectory<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl<S: CitySource> CitySource for CachedCityDirectory<S> {
    async fn fetch_directory(&self, language: Language) -> CityDirectory {
        if self.ttl.is_zero() {
            return self.inner.fetch_directory(language).await;
        }

        if let Some((fetched_at, directory)) = self.entries.read().await.get(&language) {
            if fetched_at.elapsed() < self.ttl {
                return directory.clone();
            }
        }

        let directory = self.inner.fetch_directory(language).await;
        if !directory.is_empty() {
            self.entries
                .write()
                .await
                .insert(language, (Instant::now(), directory.clone()));
        }
        directory
    }
}
