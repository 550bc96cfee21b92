//! # gimmisn-engine
//!
//! Compares OpenStreetMap streets and house numbers of an area against an
//! authoritative reference registry.
//!
//! The engine reads tab-separated Overpass extracts and reference registries,
//! expands raw house numbers such as `2-6` or `1;3` into individual numbers
//! filtered by per-street ranges, and reports which streets and house
//! numbers are missing from OSM.
//!
//! ## Features
//!
//! - `parallel` (default): parses large reference registries with rayon.
//!
//! ## Usage
//!
//! ```no_run
//! use gimmisn_engine::{Relations, Translations};
//!
//! let mut relations = Relations::new("data", "workdir")?;
//! let relation = relations.get_relation("gazdagret")?;
//! let report = relation.write_missing_housenumbers(&Translations::identity())?;
//! println!("{}% complete", report.percent);
//! # Ok::<(), gimmisn_engine::GimmisnError>(())
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod files;
pub mod i18n;
pub mod normalize;
pub mod osm;
pub mod parser;
pub mod query;
pub mod reconcile;
pub mod reference;
pub mod relation;
pub mod relations;
pub mod report;
pub mod settings;
pub mod sort;
pub mod types;

// Re-export gimmisn-types for convenience
pub use gimmisn_types;

pub use config::{RangeSpec, RelationConfig, RelationDocument, StreetFilter};
pub use files::RelationFiles;
pub use i18n::Translations;
pub use normalize::{normalize, normalize_with};
pub use osm::{OsmHouseNumber, OsmStreet};
pub use parser::{TsvParser, TsvRecord};
pub use query::make_turbo_query_for_streets;
pub use reconcile::{get_in_both, get_only_in_first, StreetNumbers};
pub use reference::{
    build_reference_cache, build_reference_caches, build_street_reference_cache,
    HouseNumberReference, StreetReference,
};
pub use relation::Relation;
pub use relations::Relations;
pub use report::{HouseNumberReport, StreetReport};
pub use settings::Settings;
pub use sort::{sort_housenumbers_csv, sort_streets_csv};
pub use types::{GimmisnError, GimmisnResult};
