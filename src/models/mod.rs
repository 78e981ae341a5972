//! Domain model for the place directory
//!
//! Everything here is read-only from the core's point of view: places,
//! their location chain and categories are written by ingestion and admin
//! flows that live elsewhere.

pub mod enrichment;
pub mod location;
pub mod place;

pub use enrichment::EnrichmentBlob;
pub use location::{normalize_slug, Locale, LocationPath, PageType};
pub use place::{Category, City, Country, Place, PlaceSummary, PlanRef, Province, ReviewSnippet};
