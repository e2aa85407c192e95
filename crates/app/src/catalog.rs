use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use vocab_core::model::{Catalog, CatalogError, ItemId, Tier, VocabItem};

/// One entry in a catalog file: a JSON array of these records.
#[derive(Debug, Deserialize)]
struct WordRecord {
    id: String,
    source: String,
    target: String,
    tier: Tier,
}

#[derive(Debug)]
pub enum CatalogFileError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Catalog(CatalogError),
}

impl fmt::Display for CatalogFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogFileError::Io(err) => write!(f, "cannot read catalog file: {err}"),
            CatalogFileError::Parse(err) => write!(f, "malformed catalog file: {err}"),
            CatalogFileError::Catalog(err) => write!(f, "invalid catalog: {err}"),
        }
    }
}

impl std::error::Error for CatalogFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogFileError::Io(err) => Some(err),
            CatalogFileError::Parse(err) => Some(err),
            CatalogFileError::Catalog(err) => Some(err),
        }
    }
}

/// Loads a catalog from a JSON file.
///
/// Unlike progress data, a broken catalog is a hard error: silently playing
/// with half a word list would be worse than refusing to start.
pub fn load(path: &Path) -> Result<Catalog, CatalogFileError> {
    let raw = fs::read_to_string(path).map_err(CatalogFileError::Io)?;
    let records: Vec<WordRecord> = serde_json::from_str(&raw).map_err(CatalogFileError::Parse)?;

    let items = records
        .into_iter()
        .map(|r| VocabItem::new(ItemId::new(r.id), r.source, r.target, r.tier))
        .collect();

    Catalog::new(items).map_err(CatalogFileError::Catalog)
}
