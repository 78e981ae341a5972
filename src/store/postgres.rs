//! Postgres implementation of the `EntityStore` port.
//!
//! A newtype wrapping PgPool. All SQL is runtime-checked (sqlx::query_as,
//! not sqlx::query_as!) to avoid a compile-time DB requirement.
//!
//! Assumed tables: countries, provinces, cities, places, plans,
//! categories, place_categories (place_id, category_id, position), reviews.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use super::{EntityStore, RECENT_REVIEW_LIMIT};
use crate::error::StoreError;
use crate::models::{
    Category, City, Country, Place, PlaceSummary, PlanRef, Province, ReviewSnippet,
};

const CITY_CHAIN_COLUMNS: &str = r#"
    c.id AS city_id, c.slug AS city_slug, c.name AS city_name,
    pr.id AS province_id, pr.slug AS province_slug, pr.name AS province_name,
    co.id AS country_id, co.slug AS country_slug, co.name AS country_name
"#;

const PLACE_COLUMNS: &str = r#"
    p.id, p.slug, p.name, p.description,
    p.phone, p.email, p.website, p.street_address, p.postal_code,
    p.latitude, p.longitude,
    p.avg_rating::float8 AS avg_rating, p.review_count,
    pl.tier AS plan_tier, p.plan_status,
    p.is_verified, p.scraped_content
"#;

const PLACE_JOINS: &str = r#"
    FROM places p
    JOIN cities c ON c.id = p.city_id
    LEFT JOIN provinces pr ON pr.id = c.province_id
    JOIN countries co ON co.id = c.country_id
    LEFT JOIN plans pl ON pl.id = p.plan_id
"#;

/// Postgres-backed entity store
#[derive(Clone)]
pub struct PgEntityStore {
    pool: PgPool,
}

impl PgEntityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a pool with the directory's defaults
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        info!(max_connections, "Connecting to directory database");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Some(Duration::from_secs(600)))
            .connect(database_url)
            .await?;
        info!("Database connection pool created");
        Ok(Self::new(pool))
    }

    async fn load_categories(
        &self,
        place_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT cat.id, cat.slug, cat.name
            FROM place_categories pc
            JOIN categories cat ON cat.id = pc.category_id
            WHERE pc.place_id = $1
            ORDER BY pc.position, cat.slug
            LIMIT $2
            "#,
        )
        .bind(place_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn load_recent_reviews(&self, place_id: Uuid) -> Result<Vec<ReviewSnippet>, StoreError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT author_name, rating, body, created_at
            FROM reviews
            WHERE place_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(place_id)
        .bind(RECENT_REVIEW_LIMIT as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ReviewSnippet::from).collect())
    }
}

#[async_trait]
impl EntityStore for PgEntityStore {
    async fn find_city_by_slug(
        &self,
        city_slug: &str,
        province_slug: Option<&str>,
        country_slug: &str,
    ) -> Result<Option<City>, StoreError> {
        let query = format!(
            r#"
            SELECT {CITY_CHAIN_COLUMNS}
            FROM cities c
            LEFT JOIN provinces pr ON pr.id = c.province_id
            JOIN countries co ON co.id = c.country_id
            WHERE c.slug = $1
              AND co.slug = $2
              AND ($3::text IS NULL OR pr.slug = $3)
            ORDER BY pr.slug NULLS FIRST
            LIMIT 1
            "#
        );
        let row = sqlx::query_as::<_, CityChainRow>(&query)
            .bind(city_slug)
            .bind(country_slug)
            .bind(province_slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(City::from))
    }

    async fn find_place_by_slug_in_city(
        &self,
        place_slug: &str,
        city_id: Uuid,
    ) -> Result<Option<Place>, StoreError> {
        let query = format!(
            r#"
            SELECT {PLACE_COLUMNS}, {CITY_CHAIN_COLUMNS}
            {PLACE_JOINS}
            WHERE p.slug = $1 AND p.city_id = $2
            "#
        );
        let Some(row) = sqlx::query_as::<_, PlaceRow>(&query)
            .bind(place_slug)
            .bind(city_id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let categories = self.load_categories(row.id, None).await?;
        let reviews = self.load_recent_reviews(row.id).await?;
        Ok(Some(row.into_place(categories, reviews)))
    }

    async fn find_place_by_slug_global(
        &self,
        place_slug: &str,
    ) -> Result<Option<Place>, StoreError> {
        let query = format!(
            r#"
            SELECT {PLACE_COLUMNS}, {CITY_CHAIN_COLUMNS}
            {PLACE_JOINS}
            WHERE p.slug = $1
            LIMIT 1
            "#
        );
        let Some(row) = sqlx::query_as::<_, PlaceRow>(&query)
            .bind(place_slug)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let categories = self.load_categories(row.id, Some(1)).await?;
        Ok(Some(row.into_place(categories, Vec::new())))
    }

    async fn related_places(
        &self,
        city_id: Uuid,
        category_id: Uuid,
        exclude_place_id: Uuid,
        limit: usize,
    ) -> Result<Vec<PlaceSummary>, StoreError> {
        let rows = sqlx::query_as::<_, RelatedRow>(
            r#"
            SELECT p.slug, p.name, c.name AS city_name, cat.name AS category_name,
                   p.avg_rating::float8 AS avg_rating, p.review_count
            FROM places p
            JOIN cities c ON c.id = p.city_id
            JOIN place_categories pc ON pc.place_id = p.id AND pc.category_id = $2
            JOIN categories cat ON cat.id = pc.category_id
            WHERE p.city_id = $1 AND p.id <> $3
            ORDER BY p.avg_rating DESC NULLS LAST, p.review_count DESC, p.slug
            LIMIT $4
            "#,
        )
        .bind(city_id)
        .bind(category_id)
        .bind(exclude_place_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(PlaceSummary::from).collect())
    }
}

// ── Row types ──────────────────────────────────────────────────

#[derive(Debug, FromRow)]
struct CityChainRow {
    city_id: Uuid,
    city_slug: String,
    city_name: String,
    province_id: Option<Uuid>,
    province_slug: Option<String>,
    province_name: Option<String>,
    country_id: Uuid,
    country_slug: String,
    country_name: String,
}

impl From<CityChainRow> for City {
    fn from(row: CityChainRow) -> Self {
        let province = match (row.province_id, row.province_slug, row.province_name) {
            (Some(id), Some(slug), Some(name)) => Some(Province { id, slug, name }),
            _ => None,
        };
        City {
            id: row.city_id,
            slug: row.city_slug,
            name: row.city_name,
            province,
            country: Country {
                id: row.country_id,
                slug: row.country_slug,
                name: row.country_name,
            },
        }
    }
}

#[derive(Debug, FromRow)]
struct PlaceRow {
    id: Uuid,
    slug: String,
    name: String,
    description: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    website: Option<String>,
    street_address: Option<String>,
    postal_code: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    avg_rating: Option<f64>,
    review_count: i32,
    plan_tier: Option<String>,
    plan_status: Option<String>,
    is_verified: bool,
    scraped_content: Option<serde_json::Value>,
    #[sqlx(flatten)]
    city: CityChainRow,
}

impl PlaceRow {
    fn into_place(self, categories: Vec<Category>, recent_reviews: Vec<ReviewSnippet>) -> Place {
        Place {
            id: self.id,
            slug: self.slug,
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
            review_count: u32::try_from(self.review_count).unwrap_or(0),
            plan: self.plan_tier.map(|tier| PlanRef {
                tier,
                status: self.plan_status,
            }),
            is_verified: self.is_verified,
            scraped_content: self.scraped_content,
            categories,
            city: City::from(self.city),
            recent_reviews,
        }
    }
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: Uuid,
    slug: String,
    name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            slug: row.slug,
            name: row.name,
        }
    }
}

#[derive(Debug, FromRow)]
struct ReviewRow {
    author_name: String,
    rating: i16,
    body: String,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for ReviewSnippet {
    fn from(row: ReviewRow) -> Self {
        ReviewSnippet {
            author: row.author_name,
            rating: row.rating.clamp(0, 5) as u8,
            body: row.body,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct RelatedRow {
    slug: String,
    name: String,
    city_name: String,
    category_name: String,
    avg_rating: Option<f64>,
    review_count: i32,
}

impl From<RelatedRow> for PlaceSummary {
    fn from(row: RelatedRow) -> Self {
        PlaceSummary {
            slug: row.slug,
            name: row.name,
            city_name: row.city_name,
            primary_category: Some(row.category_name),
            avg_rating: row.avg_rating,
            review_count: u32::try_from(row.review_count).unwrap_or(0),
        }
    }
}
