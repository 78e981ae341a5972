//! In-memory entity store
//!
//! Immutable after construction, so lookups need no locking. Used by the
//! test suites and by the server when no database is configured.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::{EntityStore, RECENT_REVIEW_LIMIT};
use crate::error::StoreError;
use crate::models::{
    normalize_slug, Category, City, Country, Place, PlaceSummary, PlanRef, Province,
    ReviewSnippet,
};

#[derive(Debug, Default, Clone)]
pub struct InMemoryEntityStore {
    cities: Vec<City>,
    places: Vec<Place>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a city. A city with the same id is replaced.
    pub fn insert_city(&mut self, city: City) {
        self.cities.retain(|c| c.id != city.id);
        self.cities.push(city);
    }

    /// Register a place (and its city, if not yet known).
    ///
    /// Place slugs are unique across the whole store.
    pub fn insert_place(&mut self, place: Place) -> Result<(), StoreError> {
        if self.places.iter().any(|p| p.slug == place.slug) {
            return Err(StoreError::Seed(format!(
                "duplicate place slug '{}'",
                place.slug
            )));
        }
        if !self.cities.iter().any(|c| c.id == place.city.id) {
            self.cities.push(place.city.clone());
        }
        self.places.push(place);
        Ok(())
    }

    pub fn with_place(mut self, place: Place) -> Result<Self, StoreError> {
        self.insert_place(place)?;
        Ok(self)
    }

    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        let store = Self::from_seed_yaml(&yaml)?;
        info!(
            path = %path.display(),
            cities = store.cities.len(),
            places = store.places.len(),
            "Loaded seed data"
        );
        Ok(store)
    }

    pub fn from_seed_yaml(yaml: &str) -> Result<Self, StoreError> {
        let seed: Seed = serde_yaml::from_str(yaml)?;
        Self::from_seed(seed)
    }

    /// Build a store from seed data, resolving slug references
    pub fn from_seed(seed: Seed) -> Result<Self, StoreError> {
        let mut store = Self::new();

        for seed_country in &seed.countries {
            let country_slug = normalize_slug(&seed_country.slug);
            let country = Country {
                id: seed_id(&format!("country:{}", country_slug)),
                slug: country_slug.clone(),
                name: seed_country.name.clone(),
            };

            for seed_city in &seed_country.cities {
                store.insert_city(seed_city.build(&country, None));
            }

            for seed_province in &seed_country.provinces {
                let province_slug = normalize_slug(&seed_province.slug);
                let province = Province {
                    id: seed_id(&format!("province:{}/{}", country_slug, province_slug)),
                    slug: province_slug,
                    name: seed_province.name.clone(),
                };
                for seed_city in &seed_province.cities {
                    store.insert_city(seed_city.build(&country, Some(&province)));
                }
            }
        }

        let categories: HashMap<String, Category> = seed
            .categories
            .iter()
            .map(|c| {
                let slug = normalize_slug(&c.slug);
                let category = Category {
                    id: seed_id(&format!("category:{}", slug)),
                    slug: slug.clone(),
                    name: c.name.clone(),
                };
                (slug, category)
            })
            .collect();

        for seed_place in seed.places {
            let place = seed_place.build(&store, &categories)?;
            store.insert_place(place)?;
        }

        Ok(store)
    }

    fn lookup_city(
        &self,
        city_slug: &str,
        province_slug: Option<&str>,
        country_slug: &str,
    ) -> Option<&City> {
        self.cities.iter().find(|city| {
            city.slug == city_slug
                && city.country.slug == country_slug
                && match province_slug {
                    Some(wanted) => city.province.as_ref().is_some_and(|p| p.slug == wanted),
                    None => true,
                }
        })
    }
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn find_city_by_slug(
        &self,
        city_slug: &str,
        province_slug: Option<&str>,
        country_slug: &str,
    ) -> Result<Option<City>, StoreError> {
        Ok(self
            .lookup_city(city_slug, province_slug, country_slug)
            .cloned())
    }

    async fn find_place_by_slug_in_city(
        &self,
        place_slug: &str,
        city_id: Uuid,
    ) -> Result<Option<Place>, StoreError> {
        let place = self
            .places
            .iter()
            .find(|p| p.slug == place_slug && p.city.id == city_id)
            .cloned()
            .map(|mut place| {
                place
                    .recent_reviews
                    .sort_by(|a, b| b.created_at.cmp(&a.created_at));
                place.recent_reviews.truncate(RECENT_REVIEW_LIMIT);
                place
            });
        Ok(place)
    }

    async fn find_place_by_slug_global(
        &self,
        place_slug: &str,
    ) -> Result<Option<Place>, StoreError> {
        let place = self
            .places
            .iter()
            .find(|p| p.slug == place_slug)
            .cloned()
            .map(|mut place| {
                place.categories.truncate(1);
                place.recent_reviews.clear();
                place
            });
        Ok(place)
    }

    async fn related_places(
        &self,
        city_id: Uuid,
        category_id: Uuid,
        exclude_place_id: Uuid,
        limit: usize,
    ) -> Result<Vec<PlaceSummary>, StoreError> {
        let mut related: Vec<&Place> = self
            .places
            .iter()
            .filter(|p| {
                p.city.id == city_id
                    && p.id != exclude_place_id
                    && p.categories.iter().any(|c| c.id == category_id)
            })
            .collect();

        related.sort_by(|a, b| {
            b.avg_rating
                .unwrap_or(-1.0)
                .total_cmp(&a.avg_rating.unwrap_or(-1.0))
                .then(b.review_count.cmp(&a.review_count))
                .then(a.slug.cmp(&b.slug))
        });

        Ok(related
            .into_iter()
            .take(limit)
            .map(Place::summary)
            .collect())
    }
}

// ── Seed file format ───────────────────────────────────────────

/// YAML seed document
///
/// ```yaml
/// countries:
///   - slug: us
///     name: United States
///     provinces:
///       - slug: california
///         name: California
///         cities:
///           - { slug: san-jose, name: San Jose }
/// categories:
///   - { slug: veterinary, name: Veterinary }
/// places:
///   - slug: happy-paws-vet
///     name: Happy Paws Vet
///     country: us
///     province: california
///     city: san-jose
///     categories: [veterinary]
///     plan: { tier: premium }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub countries: Vec<SeedCountry>,
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
    #[serde(default)]
    pub places: Vec<SeedPlace>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCountry {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub provinces: Vec<SeedProvince>,
    /// Cities that belong to no province
    #[serde(default)]
    pub cities: Vec<SeedCity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedProvince {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub cities: Vec<SeedCity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCity {
    pub slug: String,
    pub name: String,
}

impl SeedCity {
    fn build(&self, country: &Country, province: Option<&Province>) -> City {
        let slug = normalize_slug(&self.slug);
        let scope = match province {
            Some(p) => format!("{}/{}", country.slug, p.slug),
            None => country.slug.clone(),
        };
        City {
            id: seed_id(&format!("city:{}/{}", scope, slug)),
            slug,
            name: self.name.clone(),
            province: province.cloned(),
            country: country.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCategory {
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedPlace {
    pub slug: String,
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub province: Option<String>,
    pub city: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub street_address: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub avg_rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub plan: Option<PlanRef>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub scraped_content: Option<serde_json::Value>,
    #[serde(default)]
    pub reviews: Vec<ReviewSnippet>,
}

impl SeedPlace {
    fn build(
        self,
        store: &InMemoryEntityStore,
        categories: &HashMap<String, Category>,
    ) -> Result<Place, StoreError> {
        let slug = normalize_slug(&self.slug);
        let country_slug = normalize_slug(&self.country);
        let province_slug = self.province.as_deref().map(normalize_slug);
        let city_slug = normalize_slug(&self.city);

        let city = store
            .lookup_city(&city_slug, province_slug.as_deref(), &country_slug)
            .cloned()
            .ok_or_else(|| {
                StoreError::Seed(format!(
                    "place '{}' references unknown city '{}' in '{}'",
                    slug, city_slug, country_slug
                ))
            })?;

        let place_categories = self
            .categories
            .iter()
            .map(|raw| {
                let cat_slug = normalize_slug(raw);
                categories.get(&cat_slug).cloned().ok_or_else(|| {
                    StoreError::Seed(format!(
                        "place '{}' references unknown category '{}'",
                        slug, cat_slug
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Place {
            id: seed_id(&format!("place:{}", slug)),
            slug,
            name: self.name,
            description: self.description,
            phone: self.phone,
            email: self.email,
            website: self.website,
            street_address: self.street_address,
            postal_code: self.postal_code,
            latitude: self.latitude,
            longitude: self.longitude,
            avg_rating: self.avg_rating,
            review_count: self.review_count,
            plan: self.plan,
            is_verified: self.is_verified,
            scraped_content: self.scraped_content,
            categories: place_categories,
            city,
            recent_reviews: self.reviews,
        })
    }
}

/// Stable ids for seeded entities so reloads produce the same UUIDs
fn seed_id(key: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes())
}
