//! Bundled-JSON backend: serves the combined document compiled into the
//! binary.

use std::borrow::Cow;

use anyhow::{Context, Result};

use crate::model::{Account, Character, Document};
use crate::source::StatSource;

/// A backend over a JSON document held in memory.
///
/// The text is re-parsed on every call; no parsed snapshot is kept around, so
/// each accessor hands out a fresh value.
pub struct BundledSource {
    raw: Cow<'static, str>,
}

impl BundledSource {
    /// The document bundled at build time from `data/DATA.json`.
    pub fn builtin() -> Self {
        BundledSource {
            raw: Cow::Borrowed(include_str!("../data/DATA.json")),
        }
    }

    /// Wraps an arbitrary in-memory document.
    pub fn from_text(raw: impl Into<String>) -> Self {
        BundledSource {
            raw: Cow::Owned(raw.into()),
        }
    }

    fn document(&self) -> Result<Document> {
        let root = serde_json::from_str(&self.raw).context("bundled document is not valid JSON")?;
        Document::from_value(root)
    }
}

impl StatSource for BundledSource {
    fn characters(&self) -> Result<Vec<Character>> {
        Ok(self.document()?.characters)
    }

    fn account(&self) -> Result<Option<Account>> {
        Ok(self.document()?.account)
    }
}
