mod item;
mod stats;

pub use item::{Catalog, CatalogError, ItemId, Tier, TierParseError, VocabItem};
pub use stats::{ItemStats, StatsMap, LEARNED_THRESHOLD};
