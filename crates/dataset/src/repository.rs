use crate::error::DatasetError;
use crate::loader::{load_catalog, load_changelog, load_performance};
use configuration::DataSettings;
use core_types::{
    Changelog, ChangelogEntry, PerformanceDataset, StrategyCatalog, StrategyDescriptor,
};

/// Fallback when the dataset lists no instruments.
pub const FALLBACK_INSTRUMENT: &str = "SPY";

/// The `DataRepository` holds the three loaded documents and answers the
/// catalog-level questions that need no analytics.
#[derive(Debug, Clone, Default)]
pub struct DataRepository {
    catalog: StrategyCatalog,
    performance: PerformanceDataset,
    changelog: Changelog,
}

impl DataRepository {
    /// Loads all documents from the locations in `settings`.
    pub fn load(settings: &DataSettings) -> Result<Self, DatasetError> {
        let catalog = load_catalog(&settings.strategies_path())?;
        let performance = load_performance(&settings.performance_path())?;
        let changelog = load_changelog(&settings.changelog_path())?;
        Ok(Self::from_parts(catalog, performance, changelog))
    }

    pub fn from_parts(
        catalog: StrategyCatalog,
        performance: PerformanceDataset,
        changelog: Changelog,
    ) -> Self {
        Self {
            catalog,
            performance,
            changelog,
        }
    }

    pub fn strategies(&self) -> &[StrategyDescriptor] {
        &self.catalog.strategies
    }

    pub fn strategy(&self, id: &str) -> Option<&StrategyDescriptor> {
        self.catalog.strategies.iter().find(|s| s.id == id)
    }

    pub fn performance(&self) -> &PerformanceDataset {
        &self.performance
    }

    /// The first instrument of the dataset, else `SPY`.
    pub fn default_instrument(&self) -> &str {
        self.performance
            .instruments
            .first()
            .map(|i| i.symbol.as_str())
            .unwrap_or(FALLBACK_INSTRUMENT)
    }

    /// Case-insensitive substring search on name or id, requiring every tag.
    ///
    /// An empty query matches everything.
    pub fn search_strategies(&self, query: &str, tags: &[String]) -> Vec<&StrategyDescriptor> {
        let needle = query.to_lowercase();
        self.catalog
            .strategies
            .iter()
            .filter(|s| {
                needle.is_empty()
                    || s.name.to_lowercase().contains(&needle)
                    || s.id.to_lowercase().contains(&needle)
            })
            .filter(|s| tags.iter().all(|t| s.tags.contains(t)))
            .collect()
    }

    /// Every tag used in the catalog, sorted and deduplicated.
    pub fn unique_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .catalog
            .strategies
            .iter()
            .flat_map(|s| s.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// The newest `limit` entries (all when `None`).
    pub fn changelog(&self, limit: Option<usize>) -> &[ChangelogEntry] {
        let entries = &self.changelog.entries;
        &entries[..limit.unwrap_or(entries.len()).min(entries.len())]
    }
}
