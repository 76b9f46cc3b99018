//! The backend contract and the infallible facade the rendering layer
//! consumes.

use std::path::PathBuf;

use anyhow::Result;

use crate::bundled::BundledSource;
use crate::local::LocalSource;
use crate::model::{Account, Character};
use crate::remote::{RemoteConfig, RemoteSource};

/// The fallible contract every backend implements.
///
/// Every method is a single, un-retried read against the backing source; no
/// state is shared between calls.
pub trait StatSource {
    /// All characters found in the source, in source order.
    fn characters(&self) -> Result<Vec<Character>>;

    /// The character whose `id` field equals the given id, if any.
    ///
    /// The default implementation linearly scans [`characters`]; the remote
    /// backend overrides it with a primary-key equality query.
    ///
    /// [`characters`]: StatSource::characters
    fn character_by_id(&self, id: u32) -> Result<Option<Character>> {
        let characters = self.characters()?;
        Ok(characters.into_iter().find(|c| c.id == Some(id)))
    }

    /// The single account/stats record, if the source has one.
    fn account(&self) -> Result<Option<Account>>;
}

/// Selects exactly one backend. Backends are never composed.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    /// Hosted table API, reached over HTTP.
    Remote(RemoteConfig),
    /// The JSON document embedded into the binary at build time.
    Bundled,
    /// JSON files under a local directory.
    LocalDir(PathBuf),
}

/// The read surface handed to the rendering layer.
///
/// Backend errors never escape: each accessor logs the failure and returns
/// its sentinel (an empty list or `None`), so callers cannot distinguish "no
/// data" from "read failed". Construction is the one fallible step.
pub struct DataSource {
    inner: Box<dyn StatSource>,
}

impl DataSource {
    /// Builds the facade over the configured backend.
    ///
    /// Fails fast on invalid configuration (for the remote backend, a missing
    /// URL or key) instead of deferring to sentinels.
    pub fn from_config(config: BackendConfig) -> Result<Self> {
        let inner: Box<dyn StatSource> = match config {
            BackendConfig::Remote(remote) => Box::new(RemoteSource::new(remote)?),
            BackendConfig::Bundled => Box::new(BundledSource::builtin()),
            BackendConfig::LocalDir(dir) => Box::new(LocalSource::new(dir)),
        };
        Ok(DataSource { inner })
    }

    /// Wraps an already-constructed backend.
    pub fn new(inner: Box<dyn StatSource>) -> Self {
        DataSource { inner }
    }

    /// All characters, in source order. Empty on any backend error.
    pub fn characters(&self) -> Vec<Character> {
        match self.inner.characters() {
            Ok(characters) => characters,
            Err(error) => {
                tracing::error!("failed to fetch characters: {error:#}");
                Vec::new()
            }
        }
    }

    /// The character with the given id, or `None` if absent or on error.
    pub fn character_by_id(&self, id: u32) -> Option<Character> {
        match self.inner.character_by_id(id) {
            Ok(character) => character,
            Err(error) => {
                tracing::error!("failed to fetch character {id}: {error:#}");
                None
            }
        }
    }

    /// The character at the given source position, or `None` if out of range
    /// or on error.
    pub fn character_by_index(&self, index: usize) -> Option<Character> {
        match self.inner.characters() {
            Ok(mut characters) => {
                if index < characters.len() {
                    Some(characters.swap_remove(index))
                } else {
                    None
                }
            }
            Err(error) => {
                tracing::error!("failed to fetch character at index {index}: {error:#}");
                None
            }
        }
    }

    /// The account/stats record, or `None` if absent or on error.
    pub fn account(&self) -> Option<Account> {
        match self.inner.account() {
            Ok(account) => account,
            Err(error) => {
                tracing::error!("failed to fetch account: {error:#}");
                None
            }
        }
    }
}
