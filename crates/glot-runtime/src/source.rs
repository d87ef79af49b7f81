//! Collaborator traits and the in-memory language source.
//!
//! The resolver never performs I/O. A [`LanguageSource`] materializes each
//! region's flattened `key -> value` entry list however it likes (asset
//! bundle, file format, network) and hands it over fully built; the core
//! only consumes the finished list. Entry order is preserved and drives
//! trie enumeration order, so sources should emit entries in a stable
//! order.

use crate::resolver::ResolveSettings;

/// Supplies regions, per-region entry lists, and resolver settings.
pub trait LanguageSource {
    /// Resolver settings captured once at `init` time.
    fn settings(&self) -> ResolveSettings {
        ResolveSettings::default()
    }

    /// Region used as the ultimate fallback when a requested region has no
    /// language file. A well-configured source always has entries for it.
    fn default_region(&self) -> String;

    /// Every region this source can produce entries for.
    fn regions(&self) -> Vec<String>;

    /// Flattened entries for `region`, or `None` when unavailable.
    fn entries(&self, region: &str) -> Option<Vec<(String, String)>>;
}

/// Call-site object queried by `#{name}` context escapes.
///
/// The resolver does not know how to compute context values; it only asks
/// for them by name and substitutes whatever comes back.
pub trait LocalizableContext {
    /// Substitution value for the named context property, if known.
    fn localized_value(&self, name: &str) -> Option<String>;
}

/// In-memory [`LanguageSource`] for hosts with preloaded data and for
/// tests.
///
/// # Example
///
/// ```
/// use glot_runtime::{LanguageSource, StaticSource};
///
/// let source = StaticSource::new("EN_US")
///     .region("EN_US", [("ui.menu.start", "Start")])
///     .region("DE_DE", [("ui.menu.start", "Anfang")]);
///
/// assert_eq!(source.default_region(), "EN_US");
/// assert_eq!(source.regions(), vec!["EN_US", "DE_DE"]);
/// assert!(source.entries("DE_DE").is_some());
/// assert!(source.entries("FR_FR").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct StaticSource {
    default_region: String,
    settings: ResolveSettings,
    regions: Vec<(String, Vec<(String, String)>)>,
}

impl StaticSource {
    /// Create a source with the given default region and no entries.
    #[must_use]
    pub fn new(default_region: impl Into<String>) -> Self {
        Self {
            default_region: default_region.into(),
            settings: ResolveSettings::default(),
            regions: Vec::new(),
        }
    }

    /// Set the resolver settings this source hands out at `init`.
    #[must_use]
    pub fn with_settings(mut self, settings: ResolveSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Add (or replace) a region's entry list, preserving entry order.
    #[must_use]
    pub fn region<K, V>(
        mut self,
        id: impl Into<String>,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let id = id.into();
        let entries: Vec<(String, String)> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        if let Some(slot) = self.regions.iter_mut().find(|(r, _)| *r == id) {
            slot.1 = entries;
        } else {
            self.regions.push((id, entries));
        }
        self
    }
}

impl LanguageSource for StaticSource {
    fn settings(&self) -> ResolveSettings {
        self.settings
    }

    fn default_region(&self) -> String {
        self.default_region.clone()
    }

    fn regions(&self) -> Vec<String> {
        self.regions.iter().map(|(r, _)| r.clone()).collect()
    }

    fn entries(&self, region: &str) -> Option<Vec<(String, String)>> {
        self.regions
            .iter()
            .find(|(r, _)| r == region)
            .map(|(_, entries)| entries.clone())
    }
}
