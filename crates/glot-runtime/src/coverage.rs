//! Cross-region key coverage reporting.
//!
//! External tooling (translation dashboards, CI checks) wants to know
//! which keys each region is missing relative to the union of all keys.
//! The report loads every region's entry list from the source; it never
//! touches the resolver's active state.

use rustc_hash::FxHashSet;

use crate::source::LanguageSource;

/// Coverage summary across every region a source provides.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageReport {
    /// Number of unique keys across all regions.
    pub total_keys: usize,
    /// Per-region coverage, sorted by region id.
    pub regions: Vec<RegionCoverage>,
}

/// Per-region coverage statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionCoverage {
    /// Region id (e.g. `"EN_US"`).
    pub region: String,
    /// Number of reference keys the region provides.
    pub present: usize,
    /// Reference keys the region lacks, sorted.
    pub missing: Vec<String>,
    /// Coverage as a percentage (0.0-100.0).
    pub coverage_percent: f32,
}

/// Build a coverage report from every region the source knows about.
///
/// The reference set is the sorted, deduplicated union of keys across all
/// regions. Regions whose entry list is unavailable count as providing
/// nothing.
#[must_use]
pub fn coverage_report(source: &dyn LanguageSource) -> CoverageReport {
    let mut region_ids = source.regions();
    region_ids.sort_unstable();

    let mut all_keys: Vec<String> = region_ids
        .iter()
        .filter_map(|region| source.entries(region))
        .flat_map(|entries| entries.into_iter().map(|(k, _)| k))
        .collect();
    all_keys.sort_unstable();
    all_keys.dedup();
    let total = all_keys.len();

    let regions = region_ids
        .into_iter()
        .map(|region| {
            let present_keys: FxHashSet<String> = source
                .entries(&region)
                .unwrap_or_default()
                .into_iter()
                .map(|(k, _)| k)
                .collect();
            let missing: Vec<String> = all_keys
                .iter()
                .filter(|k| !present_keys.contains(*k))
                .cloned()
                .collect();
            let present = total - missing.len();
            let coverage_percent = if total == 0 {
                100.0
            } else {
                (present as f32 / total as f32) * 100.0
            };
            RegionCoverage {
                region,
                present,
                missing,
                coverage_percent,
            }
        })
        .collect();

    CoverageReport {
        total_keys: total,
        regions,
    }
}
