use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── TIER ──────────────────────────────────────────────────────────────────────
//

/// Difficulty class partitioning the catalog.
///
/// Tiers unlock progressively; see the `unlock` module for the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    /// All tiers in unlock order.
    #[must_use]
    pub fn all() -> [Tier; 3] {
        [Tier::Easy, Tier::Medium, Tier::Hard]
    }

    /// Lowercase name, matching the serialized form.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Tier::Easy => "easy",
            Tier::Medium => "medium",
            Tier::Hard => "hard",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error type for parsing a `Tier` from a string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown tier: {raw}")]
pub struct TierParseError {
    pub raw: String,
}

impl FromStr for Tier {
    type Err = TierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Tier::Easy),
            "medium" => Ok(Tier::Medium),
            "hard" => Ok(Tier::Hard),
            other => Err(TierParseError {
                raw: other.to_string(),
            }),
        }
    }
}

//
// ─── ITEM ID ───────────────────────────────────────────────────────────────────
//

/// Unique identifier for a vocabulary item.
///
/// Ids are supplied by the catalog; any non-empty string works. `Ord` keeps
/// stats collections deterministically ordered.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates a new `ItemId`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({:?})", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

//
// ─── VOCAB ITEM ────────────────────────────────────────────────────────────────
//

/// One vocabulary pair: a source-language word and its target-language
/// translation, tagged with a difficulty tier.
///
/// Items are immutable once constructed; all per-item mutable state lives in
/// `ItemStats`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabItem {
    id: ItemId,
    source_text: String,
    target_text: String,
    tier: Tier,
}

impl VocabItem {
    #[must_use]
    pub fn new(
        id: ItemId,
        source_text: impl Into<String>,
        target_text: impl Into<String>,
        tier: Tier,
    ) -> Self {
        Self {
            id,
            source_text: source_text.into(),
            target_text: target_text.into(),
            tier,
        }
    }

    #[must_use]
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    #[must_use]
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    #[must_use]
    pub fn target_text(&self) -> &str {
        &self.target_text
    }

    #[must_use]
    pub fn tier(&self) -> Tier {
        self.tier
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Errors raised while building a `Catalog`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate item id: {0}")]
    DuplicateId(ItemId),
}

/// The fixed, externally supplied set of vocabulary items.
///
/// The catalog is validated once at construction (ids must be unique) and is
/// immutable afterwards. An empty catalog is allowed; selection degrades to
/// empty rounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<VocabItem>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate item ids.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` naming the first repeated id.
    pub fn new(items: Vec<VocabItem>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id().clone()) {
                return Err(CatalogError::DuplicateId(item.id().clone()));
            }
        }
        Ok(Self { items })
    }

    /// All items, in catalog order.
    #[must_use]
    pub fn items(&self) -> &[VocabItem] {
        &self.items
    }

    /// Looks up an item by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&VocabItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Items belonging to the given tier, in catalog order.
    pub fn items_in_tier(&self, tier: Tier) -> impl Iterator<Item = &VocabItem> {
        self.items.iter().filter(move |item| item.tier() == tier)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
