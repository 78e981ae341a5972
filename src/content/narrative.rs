//! Narrative generation port
//!
//! The directory does not write prose itself. It assembles a structured
//! input from the place and its enrichment data and hands it to a
//! `NarrativeGenerator` (typically an LLM-backed service behind HTTP).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::NarrativeError;
use crate::models::{EnrichmentBlob, Locale, Place};

/// Structured input forwarded to the generator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeInput {
    pub place_name: String,
    pub city_slug: String,
    pub country_name: String,
    pub locale: Locale,
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrichment_about_us: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enrichment_facts: Vec<String>,
}

impl NarrativeInput {
    /// Select the fields to forward for a place.
    ///
    /// Descriptive text priority: enrichment about-us, then the structured
    /// description, then nothing. Only one of the two is ever sent.
    pub fn assemble(place: &Place, enrichment: Option<&EnrichmentBlob>, locale: Locale) -> Self {
        let about_us = enrichment.and_then(|e| e.about_us.clone());
        let description = if about_us.is_some() {
            None
        } else {
            place
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
        };

        let has_reviews = place.review_count > 0;

        Self {
            place_name: place.name.clone(),
            city_slug: place.city.slug.clone(),
            country_name: place.city.country.name.clone(),
            locale,
            categories: place.categories.iter().map(|c| c.name.clone()).collect(),
            rating: place.avg_rating.filter(|_| has_reviews),
            review_count: has_reviews.then_some(place.review_count),
            description,
            address: place.formatted_address(),
            enrichment_about_us: about_us,
            enrichment_facts: enrichment.map(enrichment_facts).unwrap_or_default(),
        }
    }
}

/// Facts first, then derived lines in a fixed order
fn enrichment_facts(blob: &EnrichmentBlob) -> Vec<String> {
    let mut facts = blob.facts.clone();
    if !blob.services.is_empty() {
        facts.push(format!("Services: {}", blob.services.join(", ")));
    }
    if !blob.languages.is_empty() {
        facts.push(format!("Languages spoken: {}", blob.languages.join(", ")));
    }
    if let Some(year) = blob.year_founded {
        facts.push(format!("Founded in {}", year));
    }
    if let Some(hours) = &blob.opening_hours {
        facts.push(format!("Opening hours: {}", hours));
    }
    facts
}

/// Generated page prose
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub secondary: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

/// External prose generator. May be slow; may fail.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate(&self, input: &NarrativeInput) -> Result<Narrative, NarrativeError>;
}

/// Generator used when no endpoint is configured; always fails, so pages
/// fall back to structured content and default FAQs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNarrativeGenerator;

#[async_trait]
impl NarrativeGenerator for DisabledNarrativeGenerator {
    async fn generate(&self, _input: &NarrativeInput) -> Result<Narrative, NarrativeError> {
        Err(NarrativeError::Disabled)
    }
}

/// Generator behind a JSON-over-HTTP endpoint
///
/// `POST {endpoint}` with a [`NarrativeInput`] body, expecting a
/// [`Narrative`] body back.
pub struct HttpNarrativeGenerator {
    client: Client,
    endpoint: String,
}

impl HttpNarrativeGenerator {
    /// `timeout` bounds the HTTP exchange itself; callers usually add an
    /// overall bound as well.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, NarrativeError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl NarrativeGenerator for HttpNarrativeGenerator {
    async fn generate(&self, input: &NarrativeInput) -> Result<Narrative, NarrativeError> {
        debug!(endpoint = %self.endpoint, place = %input.place_name, "Requesting narrative");

        let response = self.client.post(&self.endpoint).json(input).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NarrativeError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| NarrativeError::Decode(e.to_string()))
    }
}
