//! Relation configuration.
//!
//! A relation is configured in two places: its entry in the registry
//! (`relations.toml`) and an optional per-relation document
//! (`relation-<name>.toml`). Both share the [`RelationDocument`] schema; the
//! per-relation document wins key by key. The merged, validated result is a
//! [`RelationConfig`] with every default resolved.
//!
//! ```toml
//! osmrelation = 2713748
//! refmegye = "01"
//! reftelepules = "011"
//! street-filters = ["Only In Ref Nonsense utca"]
//!
//! [refstreets]
//! "OSM Name 1" = "Ref Name 1"
//!
//! [filters."Budaörsi út"]
//! ranges = [{ start = 137, end = 165 }]
//!
//! [filters."Hamzsabégi út"]
//! interpolation = "all"
//! ranges = [{ start = 1, end = 12 }]
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use gimmisn_types::{Interpolation, MissingStreetsPolicy, Range, Ranges};
use serde::Deserialize;

use crate::types::GimmisnResult;

/// One configured range of a street.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeSpec {
    /// First valid number.
    pub start: u32,
    /// Last valid number.
    pub end: u32,
    /// Extra locality code whose reference data covers this range.
    pub reftelepules: Option<String>,
}

/// Per-street settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreetFilter {
    /// Whether the street is even/odd segregated.
    #[serde(default)]
    pub interpolation: Interpolation,
    /// Valid number ranges; absent means the default sanity filter applies.
    pub ranges: Option<Vec<RangeSpec>>,
    /// Locality code replacing the relation's one for this street.
    pub reftelepules: Option<String>,
    /// Reference house numbers to ignore on this street.
    #[serde(default)]
    pub invalid: Vec<String>,
}

/// Raw relation document, as found in the registry or a per-relation file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RelationDocument {
    /// OSM relation id of the area boundary.
    pub osmrelation: Option<u64>,
    /// County code in the reference.
    pub refmegye: Option<String>,
    /// Locality code in the reference.
    pub reftelepules: Option<String>,
    /// Excludes the relation from batch updates.
    pub inactive: Option<bool>,
    /// Which reports apply to the relation.
    pub missing_streets: Option<MissingStreetsPolicy>,
    /// OSM street name to reference street name.
    pub refstreets: Option<BTreeMap<String, String>>,
    /// Reference streets to never report as missing.
    pub street_filters: Option<Vec<String>>,
    /// Per-street settings.
    pub filters: Option<BTreeMap<String, StreetFilter>>,
}

impl RelationDocument {
    /// Parses a document from TOML text.
    pub fn from_toml(content: &str) -> GimmisnResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads a document, returning the empty document if the file is absent.
    pub fn from_path<P: AsRef<Path>>(path: P) -> GimmisnResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("no relation document at {}", path.display());
            return Ok(Self::default());
        }
        Self::from_toml(&fs::read_to_string(path)?)
    }

    /// Overlays `self` on `parent`: keys set here win.
    pub fn merged_over(self, parent: &RelationDocument) -> RelationDocument {
        let parent = parent.clone();
        RelationDocument {
            osmrelation: self.osmrelation.or(parent.osmrelation),
            refmegye: self.refmegye.or(parent.refmegye),
            reftelepules: self.reftelepules.or(parent.reftelepules),
            inactive: self.inactive.or(parent.inactive),
            missing_streets: self.missing_streets.or(parent.missing_streets),
            refstreets: self.refstreets.or(parent.refstreets),
            street_filters: self.street_filters.or(parent.street_filters),
            filters: self.filters.or(parent.filters),
        }
    }
}

/// Resolved configuration of one relation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationConfig {
    osmrelation: u64,
    refmegye: String,
    reftelepules: String,
    active: bool,
    missing_streets: MissingStreetsPolicy,
    refstreets: BTreeMap<String, String>,
    street_filters: Vec<String>,
    filters: BTreeMap<String, StreetFilter>,
}

impl RelationConfig {
    /// Resolves a merged document, applying defaults.
    pub fn from_document(document: RelationDocument) -> Self {
        let config = Self {
            osmrelation: document.osmrelation.unwrap_or(0),
            refmegye: document.refmegye.unwrap_or_default(),
            reftelepules: document.reftelepules.unwrap_or_default(),
            active: !document.inactive.unwrap_or(false),
            missing_streets: document.missing_streets.unwrap_or_default(),
            refstreets: document.refstreets.unwrap_or_default(),
            street_filters: document.street_filters.unwrap_or_default(),
            filters: document.filters.unwrap_or_default(),
        };
        config.warn_inverted_ranges();
        config
    }

    fn warn_inverted_ranges(&self) {
        for (street, filter) in &self.filters {
            for range in filter.ranges.iter().flatten() {
                if range.start > range.end {
                    tracing::warn!(
                        "street '{}' has inverted range {}-{}, it matches nothing",
                        street,
                        range.start,
                        range.end
                    );
                }
            }
        }
    }

    /// Returns the OSM relation id.
    pub fn osmrelation(&self) -> u64 {
        self.osmrelation
    }

    /// Returns the county code.
    pub fn refmegye(&self) -> &str {
        &self.refmegye
    }

    /// Returns the locality code.
    pub fn reftelepules(&self) -> &str {
        &self.reftelepules
    }

    /// Returns true unless the relation is marked inactive.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the missing-streets policy (default `yes`).
    pub fn should_check_missing_streets(&self) -> MissingStreetsPolicy {
        self.missing_streets
    }

    /// Returns the OSM to reference street name table.
    pub fn refstreets(&self) -> &BTreeMap<String, String> {
        &self.refstreets
    }

    /// Returns the street blacklist.
    pub fn street_filters(&self) -> &[String] {
        &self.street_filters
    }

    /// Returns the per-street settings.
    pub fn filters(&self) -> &BTreeMap<String, StreetFilter> {
        &self.filters
    }

    /// Maps an OSM street name to its reference name, identity if unmapped.
    pub fn ref_street_from_osm_street(&self, osm_street: &str) -> String {
        self.refstreets
            .get(osm_street)
            .cloned()
            .unwrap_or_else(|| osm_street.to_string())
    }

    /// Returns false if the street is `interpolation=all`.
    pub fn street_is_even_odd(&self, street: &str) -> bool {
        self.filters
            .get(street)
            .map(|filter| !filter.interpolation.is_all())
            .unwrap_or(true)
    }

    /// Returns the locality codes whose reference data covers a street.
    ///
    /// This is the relation's code, or the street's override, followed by
    /// the codes attached to individual ranges in configuration order.
    pub fn street_reftelepules(&self, street: &str) -> Vec<String> {
        let default = vec![self.reftelepules.clone()];
        let Some(filter) = self.filters.get(street) else {
            return default;
        };

        let base = filter
            .reftelepules
            .clone()
            .unwrap_or_else(|| self.reftelepules.clone());
        let Some(ranges) = &filter.ranges else {
            return vec![base];
        };

        let mut codes = vec![base];
        codes.extend(ranges.iter().filter_map(|range| range.reftelepules.clone()));
        codes
    }

    /// Returns the reference house numbers to ignore on a street.
    pub fn street_invalid(&self, street: &str) -> &[String] {
        self.filters
            .get(street)
            .map(|filter| filter.invalid.as_slice())
            .unwrap_or(&[])
    }

    /// Builds the range sets of all streets that configure ranges.
    pub fn street_ranges(&self) -> HashMap<String, Ranges> {
        self.filters
            .iter()
            .filter_map(|(street, filter)| {
                let specs = filter.ranges.as_ref()?;
                let ranges = specs
                    .iter()
                    .map(|spec| Range::new(spec.start, spec.end, filter.interpolation))
                    .collect();
                Some((street.clone(), Ranges::new(ranges)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAZDAGRET: &str = r#"
street-filters = ["Only In Ref Nonsense utca"]

[refstreets]
"OSM Name 1" = "Ref Name 1"

[filters."Budaörsi út"]
ranges = [{ start = 137, end = 165 }]

[filters."Csiki-hegyek utca"]
ranges = [{ start = 1, end = 15 }, { start = 2, end = 26, reftelepules = "013" }]

[filters."Hamzsabégi út"]
interpolation = "all"
ranges = [{ start = 1, end = 12 }]

[filters."Teszt utca"]
reftelepules = "012"

[filters."Törökugrató utca"]
invalid = ["11", "12"]
"#;

    fn parent() -> RelationDocument {
        RelationDocument {
            osmrelation: Some(2713748),
            refmegye: Some("01".to_string()),
            reftelepules: Some("011".to_string()),
            ..Default::default()
        }
    }

    fn gazdagret() -> RelationConfig {
        let own = RelationDocument::from_toml(GAZDAGRET).unwrap();
        RelationConfig::from_document(own.merged_over(&parent()))
    }

    #[test]
    fn test_defaults() {
        let config = RelationConfig::from_document(RelationDocument::default());
        assert_eq!(config.osmrelation(), 0);
        assert!(config.is_active());
        assert_eq!(config.should_check_missing_streets(), MissingStreetsPolicy::Yes);
        assert!(config.filters().is_empty());
        assert!(config.street_ranges().is_empty());
    }

    #[test]
    fn test_merge_prefers_own_keys() {
        let own = RelationDocument {
            reftelepules: Some("012".to_string()),
            inactive: Some(true),
            ..Default::default()
        };
        let config = RelationConfig::from_document(own.merged_over(&parent()));
        assert_eq!(config.refmegye(), "01");
        assert_eq!(config.reftelepules(), "012");
        assert!(!config.is_active());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(RelationDocument::from_toml("osmrelaton = 42").is_err());
        assert!(RelationDocument::from_toml("missing-streets = \"sometimes\"").is_err());
    }

    #[test]
    fn test_street_ranges() {
        let ranges = gazdagret().street_ranges();
        assert_eq!(ranges.len(), 3);
        assert_eq!(
            ranges["Budaörsi út"],
            Ranges::new(vec![Range::new(137, 165, Interpolation::Default)])
        );
        assert_eq!(
            ranges["Csiki-hegyek utca"],
            Ranges::new(vec![
                Range::new(1, 15, Interpolation::Default),
                Range::new(2, 26, Interpolation::Default),
            ])
        );
        assert_eq!(
            ranges["Hamzsabégi út"],
            Ranges::new(vec![Range::new(1, 12, Interpolation::All)])
        );
    }

    #[test]
    fn test_street_reftelepules() {
        let config = gazdagret();
        assert_eq!(config.street_reftelepules("Budaörsi út"), vec!["011"]);
        assert_eq!(config.street_reftelepules("Teszt utca"), vec!["012"]);
        assert_eq!(config.street_reftelepules("Csiki-hegyek utca"), vec!["011", "013"]);
        assert_eq!(config.street_reftelepules("No such utca"), vec!["011"]);
    }

    #[test]
    fn test_street_reftelepules_keeps_configured_order() {
        let own = RelationDocument::from_toml(
            r#"
[filters."Hosszú utca"]
reftelepules = "014"
ranges = [
    { start = 1, end = 9, reftelepules = "013" },
    { start = 11, end = 19 },
    { start = 21, end = 29, reftelepules = "012" },
]
"#,
        )
        .unwrap();
        let config = RelationConfig::from_document(own.merged_over(&parent()));
        assert_eq!(
            config.street_reftelepules("Hosszú utca"),
            vec!["014", "013", "012"]
        );
    }

    #[test]
    fn test_refstreets() {
        let config = gazdagret();
        assert_eq!(config.ref_street_from_osm_street("OSM Name 1"), "Ref Name 1");
        assert_eq!(config.ref_street_from_osm_street("Ref Name 1"), "Ref Name 1");
        assert_eq!(config.ref_street_from_osm_street("Tűzkő utca"), "Tűzkő utca");
    }

    #[test]
    fn test_street_is_even_odd() {
        let config = gazdagret();
        assert!(!config.street_is_even_odd("Hamzsabégi út"));
        assert!(config.street_is_even_odd("Teszt utca"));
        assert!(config.street_is_even_odd("No such utca"));
    }

    #[test]
    fn test_street_invalid() {
        let config = gazdagret();
        assert_eq!(config.street_invalid("Törökugrató utca"), ["11", "12"]);
        assert!(config.street_invalid("Tűzkő utca").is_empty());
    }
}
