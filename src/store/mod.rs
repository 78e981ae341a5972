//! Entity store port
//!
//! The resolver and page assembler only see the `EntityStore` trait. Two
//! implementations ship with the crate:
//!
//! - [`InMemoryEntityStore`]: built in code or from a YAML seed file
//! - [`postgres::PgEntityStore`]: runtime-checked sqlx queries (feature `database`)

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{City, Place, PlaceSummary};

mod memory;
#[cfg(feature = "database")]
pub mod postgres;

pub use memory::{InMemoryEntityStore, Seed};

/// Upper bound on the recent-reviews projection loaded with a place
pub const RECENT_REVIEW_LIMIT: usize = 5;

/// Read-only lookups the directory needs from persistence.
///
/// Implementations must be Send + Sync for use across request tasks.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Find a city by slug within its country, and within the province
    /// when one is given. Without a province any city with that slug in
    /// the country matches.
    async fn find_city_by_slug(
        &self,
        city_slug: &str,
        province_slug: Option<&str>,
        country_slug: &str,
    ) -> Result<Option<City>, StoreError>;

    /// Find a place by slug inside one city, with all of its categories
    /// and at most [`RECENT_REVIEW_LIMIT`] recent reviews.
    async fn find_place_by_slug_in_city(
        &self,
        place_slug: &str,
        city_id: Uuid,
    ) -> Result<Option<Place>, StoreError>;

    /// Find a place by slug alone.
    ///
    /// Returns the full city chain and at most one category, which is
    /// enough to build a canonical URL.
    async fn find_place_by_slug_global(&self, place_slug: &str)
        -> Result<Option<Place>, StoreError>;

    /// Other places in the same city and category, best rated first
    async fn related_places(
        &self,
        city_id: Uuid,
        category_id: Uuid,
        exclude_place_id: Uuid,
        limit: usize,
    ) -> Result<Vec<PlaceSummary>, StoreError>;
}
