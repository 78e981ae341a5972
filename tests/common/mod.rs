//! Shared fixtures for the integration tests
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use place_directory::models::PlaceSummary;
use place_directory::{
    City, ContentSynthesizer, Country, DisabledNarrativeGenerator, EntityStore,
    InMemoryEntityStore, Locale, LocationPath, Narrative, NarrativeError, NarrativeGenerator,
    NarrativeInput, PageAssembler, Place, PlanRef, Province, StoreError,
};

pub const SEED: &str = include_str!("../../demos/seed.yaml");

pub const BASE_URL: &str = "https://directory.example";

pub fn seeded_store() -> InMemoryEntityStore {
    InMemoryEntityStore::from_seed_yaml(SEED).expect("demo seed must load")
}

pub fn seeded_assembler() -> PageAssembler {
    assembler_with(Arc::new(DisabledNarrativeGenerator))
}

pub fn assembler_with(generator: Arc<dyn NarrativeGenerator>) -> PageAssembler {
    PageAssembler::new(
        Arc::new(seeded_store()),
        ContentSynthesizer::new(generator).with_timeout(Duration::from_millis(200)),
        url::Url::parse(BASE_URL).unwrap(),
    )
}

/// Parse a request path the way the router does
pub fn path(raw: &str) -> LocationPath {
    let segments: Vec<&str> = raw.trim_matches('/').split('/').collect();
    let locale: Locale = segments[0].parse().unwrap();
    match segments.as_slice() {
        [_, country, "p", province, city, category, place] => {
            LocationPath::new(locale, country, Some(*province), city, category, place).unwrap()
        }
        [_, country, city, category, place] => {
            LocationPath::new(locale, country, None, city, category, place).unwrap()
        }
        _ => panic!("not a place path: {raw}"),
    }
}

/// A free-standing place, not tied to any store
pub fn sample_place() -> Place {
    Place {
        id: Uuid::from_u128(42),
        slug: "sample-place".into(),
        name: "Sample Place".into(),
        description: Some("A sample listing.".into()),
        phone: Some("+31 30 123 4567".into()),
        email: Some("info@sample.example".into()),
        website: Some("https://sample.example".into()),
        street_address: None,
        postal_code: None,
        latitude: None,
        longitude: None,
        avg_rating: None,
        review_count: 0,
        plan: Some(PlanRef::active("free")),
        is_verified: false,
        scraped_content: None,
        categories: vec![],
        city: City {
            id: Uuid::from_u128(7),
            slug: "utrecht".into(),
            name: "Utrecht".into(),
            province: Some(Province {
                id: Uuid::from_u128(8),
                slug: "utrecht".into(),
                name: "Utrecht".into(),
            }),
            country: Country {
                id: Uuid::from_u128(9),
                slug: "nl".into(),
                name: "Nederland".into(),
            },
        },
        recent_reviews: vec![],
    }
}

// ── Generators ─────────────────────────────────────────────────

/// Always returns the same narrative
pub struct FixedNarrative(pub Narrative);

#[async_trait]
impl NarrativeGenerator for FixedNarrative {
    async fn generate(&self, _input: &NarrativeInput) -> Result<Narrative, NarrativeError> {
        Ok(self.0.clone())
    }
}

/// Never answers within any reasonable timeout
pub struct StalledNarrative;

#[async_trait]
impl NarrativeGenerator for StalledNarrative {
    async fn generate(&self, _input: &NarrativeInput) -> Result<Narrative, NarrativeError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Narrative::default())
    }
}

pub fn narrative_with(secondary: &str) -> Narrative {
    Narrative {
        intro: "An independent business serving the neighbourhood.".into(),
        secondary: secondary.into(),
        bullets: vec![],
    }
}

// ── Stores ─────────────────────────────────────────────────────

/// Every call fails, as if the database were down
pub struct FailingStore;

#[async_trait]
impl EntityStore for FailingStore {
    async fn find_city_by_slug(
        &self,
        _city_slug: &str,
        _province_slug: Option<&str>,
        _country_slug: &str,
    ) -> Result<Option<City>, StoreError> {
        Err(StoreError::Database("connection refused".into()))
    }

    async fn find_place_by_slug_in_city(
        &self,
        _place_slug: &str,
        _city_id: Uuid,
    ) -> Result<Option<Place>, StoreError> {
        Err(StoreError::Database("connection refused".into()))
    }

    async fn find_place_by_slug_global(
        &self,
        _place_slug: &str,
    ) -> Result<Option<Place>, StoreError> {
        Err(StoreError::Database("connection refused".into()))
    }

    async fn related_places(
        &self,
        _city_id: Uuid,
        _category_id: Uuid,
        _exclude_place_id: Uuid,
        _limit: usize,
    ) -> Result<Vec<PlaceSummary>, StoreError> {
        Err(StoreError::Database("connection refused".into()))
    }
}

/// Serves lookups from the seed but fails related-place queries
pub struct FlakyRelatedStore(pub InMemoryEntityStore);

#[async_trait]
impl EntityStore for FlakyRelatedStore {
    async fn find_city_by_slug(
        &self,
        city_slug: &str,
        province_slug: Option<&str>,
        country_slug: &str,
    ) -> Result<Option<City>, StoreError> {
        self.0
            .find_city_by_slug(city_slug, province_slug, country_slug)
            .await
    }

    async fn find_place_by_slug_in_city(
        &self,
        place_slug: &str,
        city_id: Uuid,
    ) -> Result<Option<Place>, StoreError> {
        self.0.find_place_by_slug_in_city(place_slug, city_id).await
    }

    async fn find_place_by_slug_global(
        &self,
        place_slug: &str,
    ) -> Result<Option<Place>, StoreError> {
        self.0.find_place_by_slug_global(place_slug).await
    }

    async fn related_places(
        &self,
        _city_id: Uuid,
        _category_id: Uuid,
        _exclude_place_id: Uuid,
        _limit: usize,
    ) -> Result<Vec<PlaceSummary>, StoreError> {
        Err(StoreError::Database("statement timeout".into()))
    }
}
