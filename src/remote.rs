//! Remote-table backend: reads the `character_data` and `account` tables of a
//! hosted PostgREST-style API.

use anyhow::{Context, Result, bail};
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use crate::model::{Account, Character};
use crate::source::StatSource;

const URL_VAR: &str = "SUPABASE_URL";
const KEY_VAR: &str = "SUPABASE_KEY";

/// Connection settings for the hosted table API.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base project URL, without the `/rest/v1` suffix.
    pub url: String,
    /// API key, sent as both `apikey` and bearer token.
    pub key: String,
}

impl RemoteConfig {
    /// Builds a config from explicit values, rejecting empty ones.
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let key = key.into();
        if url.trim().is_empty() || key.trim().is_empty() {
            bail!("remote backend requires a non-empty URL and key");
        }
        Ok(RemoteConfig { url, key })
    }

    /// Reads `SUPABASE_URL` and `SUPABASE_KEY` from the environment.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(URL_VAR)
            .with_context(|| format!("environment variable {URL_VAR} is required"))?;
        let key = std::env::var(KEY_VAR)
            .with_context(|| format!("environment variable {KEY_VAR} is required"))?;
        RemoteConfig::new(url, key)
    }
}

/// A backend reading from the hosted table API.
///
/// The HTTP client handle is owned by this value; nothing is process-global.
pub struct RemoteSource {
    config: RemoteConfig,
    client: Client,
}

impl RemoteSource {
    /// Builds the backend, failing fast if the key cannot form valid request
    /// headers.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.key).context("API key is not a valid header")?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.key))
            .context("API key is not a valid header")?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder().default_headers(headers).build()?;
        Ok(RemoteSource { config, client })
    }

    fn table_url(&self, table: &str, query: &str) -> String {
        format!(
            "{}/rest/v1/{}?{}",
            self.config.url.trim_end_matches('/'),
            table,
            query
        )
    }

    fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            bail!("query {} failed: HTTP {}", url, response.status());
        }
        let rows = response
            .json()
            .with_context(|| format!("failed to parse rows from {url}"))?;
        Ok(rows)
    }
}

impl StatSource for RemoteSource {
    fn characters(&self) -> Result<Vec<Character>> {
        self.fetch(&self.table_url("character_data", "select=*"))
    }

    fn character_by_id(&self, id: u32) -> Result<Option<Character>> {
        let url = self.table_url("character_data", &format!("select=*&id=eq.{id}"));
        let mut rows: Vec<Character> = self.fetch(&url)?;
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.swap_remove(0)))
        }
    }

    fn account(&self) -> Result<Option<Account>> {
        // The embedded select pulls the related stats row in one query.
        let url = self.table_url("account", "select=*,stats(*)&limit=1");
        let mut rows: Vec<Account> = self.fetch(&url)?;
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.swap_remove(0)))
        }
    }
}
