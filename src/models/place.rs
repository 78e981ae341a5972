//! Places and their location chain

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enrichment::EnrichmentBlob;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Province {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
}

/// A city together with its province (if any) and country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub province: Option<Province>,
    pub country: Country,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
}

/// Subscription plan reference as stored on the place.
///
/// The strings are raw: interpretation (and degradation of unknown
/// values) belongs to the feature gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRef {
    pub tier: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl PlanRef {
    pub fn active(tier: impl Into<String>) -> Self {
        Self {
            tier: tier.into(),
            status: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSnippet {
    pub author: String,
    pub rating: u8,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A directory listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: Uuid,
    /// Unique across the whole directory, not just within a city
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub street_address: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Cached aggregate, maintained by the review pipeline
    pub avg_rating: Option<f64>,
    pub review_count: u32,
    pub plan: Option<PlanRef>,
    pub is_verified: bool,
    /// Raw enrichment payload from the scraping pipeline
    pub scraped_content: Option<serde_json::Value>,
    /// Ordered; the first entry is the primary category
    pub categories: Vec<Category>,
    pub city: City,
    /// Bounded projection for presentation only
    pub recent_reviews: Vec<ReviewSnippet>,
}

impl Place {
    pub fn primary_category(&self) -> Option<&Category> {
        self.categories.first()
    }

    pub fn enrichment(&self) -> Option<EnrichmentBlob> {
        self.scraped_content.as_ref().map(EnrichmentBlob::from_value)
    }

    /// Comma-joined street, postal code and city name, skipping blanks
    pub fn formatted_address(&self) -> Option<String> {
        let parts: Vec<&str> = [
            self.street_address.as_deref(),
            self.postal_code.as_deref(),
            Some(self.city.name.as_str()),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    pub fn summary(&self) -> PlaceSummary {
        PlaceSummary {
            slug: self.slug.clone(),
            name: self.name.clone(),
            city_name: self.city.name.clone(),
            primary_category: self.primary_category().map(|c| c.name.clone()),
            avg_rating: self.avg_rating,
            review_count: self.review_count,
        }
    }
}

/// Compact listing used for related-place links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSummary {
    pub slug: String,
    pub name: String,
    pub city_name: String,
    pub primary_category: Option<String>,
    pub avg_rating: Option<f64>,
    pub review_count: u32,
}
