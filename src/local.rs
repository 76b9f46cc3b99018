//! Local-file JSON backend: reads the combined document from a directory,
//! falling back to the old split files when the combined one is unusable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::model::{Account, Character, Document};
use crate::source::StatSource;

const COMBINED_FILE: &str = "DATA.json";
const CHARACTERS_FILE: &str = "characters.json";
const STATS_FILE: &str = "stats.json";

/// A backend over JSON files in a local directory.
///
/// Two layouts are supported: the combined `DATA.json` document, and the old
/// split layout of `characters.json` plus a flat `stats.json`. The combined
/// file is tried first on every call; files are opened and parsed anew each
/// time.
pub struct LocalSource {
    dir: PathBuf,
}

impl LocalSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        LocalSource { dir: dir.into() }
    }

    /// Loads the combined document, or falls back to the split layout when
    /// the combined file is missing or lacks the expected structure.
    fn document(&self) -> Result<Document> {
        match self.combined_document() {
            Ok(document) => Ok(document),
            Err(error) => {
                tracing::debug!(
                    "combined {COMBINED_FILE} unusable ({error:#}), trying split files"
                );
                self.split_document()
            }
        }
    }

    fn combined_document(&self) -> Result<Document> {
        let root = read_json(&self.dir.join(COMBINED_FILE))?;
        Document::from_value(root)
    }

    fn split_document(&self) -> Result<Document> {
        let characters: Vec<Character> =
            serde_json::from_value(read_json(&self.dir.join(CHARACTERS_FILE))?)
                .context("characters.json is not an array of characters")?;

        // The old stats file is optional; characters alone are still a
        // usable source.
        let account = match read_json(&self.dir.join(STATS_FILE)) {
            Ok(Value::Object(flat)) => Some(Account::from_legacy(flat)),
            _ => None,
        };

        Ok(Document {
            characters,
            account,
        })
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let file = fs::File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Ok(value)
}

impl StatSource for LocalSource {
    fn characters(&self) -> Result<Vec<Character>> {
        Ok(self.document()?.characters)
    }

    fn account(&self) -> Result<Option<Account>> {
        Ok(self.document()?.account)
    }
}
