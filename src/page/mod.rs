//! Page assembly
//!
//! Resolves a location path and, for a resolved place, runs the feature
//! gate and content synthesis and loads related places. The result is a
//! serializable [`PageView`] that a renderer (or the JSON HTTP surface)
//! consumes as-is.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::content::{ContentBundle, ContentSynthesizer};
use crate::gating::{FeatureGate, PlanCapability, UpgradePrompt};
use crate::models::{LocationPath, Locale, Place, PlaceSummary, ReviewSnippet};
use crate::resolver::{canonical_path, canonical_url, EntityResolver, Resolution};
use crate::store::EntityStore;

pub const DEFAULT_RELATED_LIMIT: usize = 6;

/// A contact field as the page may show it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum ContactField {
    Visible(String),
    HiddenByPlan,
    NotProvided,
}

impl ContactField {
    /// Apply a permission flag to a stored value. A field with no data is
    /// `NotProvided` whatever the plan says.
    pub fn gate(allowed: bool, value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => ContactField::NotProvided,
            Some(_) if !allowed => ContactField::HiddenByPlan,
            Some(v) => ContactField::Visible(v.to_string()),
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, ContactField::Visible(_))
    }
}

/// Place details after gating
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceDetails {
    pub slug: String,
    pub name: String,
    pub categories: Vec<String>,
    pub city_name: String,
    pub province_name: Option<String>,
    pub country_name: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub avg_rating: Option<f64>,
    pub review_count: u32,
    pub phone: ContactField,
    pub email: ContactField,
    pub website: ContactField,
}

impl PlaceDetails {
    fn gated(place: &Place, capabilities: &PlanCapability) -> Self {
        Self {
            slug: place.slug.clone(),
            name: place.name.clone(),
            categories: place.categories.iter().map(|c| c.name.clone()).collect(),
            city_name: place.city.name.clone(),
            province_name: place.city.province.as_ref().map(|p| p.name.clone()),
            country_name: place.city.country.name.clone(),
            address: place.formatted_address(),
            latitude: place.latitude,
            longitude: place.longitude,
            avg_rating: place.avg_rating,
            review_count: place.review_count,
            phone: ContactField::gate(capabilities.can_show_phone, place.phone.as_deref()),
            email: ContactField::gate(capabilities.can_show_email, place.email.as_deref()),
            website: ContactField::gate(capabilities.can_show_website, place.website.as_deref()),
        }
    }
}

/// Everything a place page needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub locale: Locale,
    pub place: PlaceDetails,
    pub capabilities: PlanCapability,
    pub upgrade_prompt: Option<UpgradePrompt>,
    pub content: ContentBundle,
    pub related_places: Vec<PlaceSummary>,
    pub recent_reviews: Vec<ReviewSnippet>,
    pub canonical_url: String,
    /// Always `false`. Not-found responses carry `noindex: true` without a
    /// view, so renderers read the flag from either body.
    pub noindex: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Page(Box<PageView>),
    /// Permanent redirect to this canonical path
    Redirect(String),
    NotFound,
}

pub struct PageAssembler {
    resolver: EntityResolver,
    store: Arc<dyn EntityStore>,
    gate: FeatureGate,
    synthesizer: ContentSynthesizer,
    base_url: Url,
    related_limit: usize,
}

impl PageAssembler {
    pub fn new(store: Arc<dyn EntityStore>, synthesizer: ContentSynthesizer, base_url: Url) -> Self {
        Self {
            resolver: EntityResolver::new(Arc::clone(&store)),
            store,
            gate: FeatureGate::new(),
            synthesizer,
            base_url,
            related_limit: DEFAULT_RELATED_LIMIT,
        }
    }

    pub fn with_related_limit(mut self, limit: usize) -> Self {
        self.related_limit = limit;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn assemble(&self, path: &LocationPath) -> PageOutcome {
        match self.resolver.resolve(path).await {
            Resolution::Resolved(place) => {
                PageOutcome::Page(Box::new(self.build_view(&place, path).await))
            }
            Resolution::RedirectTo(canonical) => PageOutcome::Redirect(canonical),
            Resolution::NotFound => PageOutcome::NotFound,
        }
    }

    async fn build_view(&self, place: &Place, path: &LocationPath) -> PageView {
        let locale = path.locale();
        let capabilities = self.gate.compute_capabilities(place);
        let upgrade_prompt = self.gate.compute_upgrade_prompt(place, locale);
        let enrichment = place.enrichment().filter(|blob| !blob.is_empty());

        let (content, related_places) = tokio::join!(
            self.synthesizer.synthesize(place, enrichment.as_ref(), locale),
            self.related_places(place),
        );

        let canonical = canonical_path(place, locale, path.category_slug());
        let canonical_url = match canonical_url(&self.base_url, &canonical) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!(path = %canonical, error = %e, "Could not build absolute canonical URL");
                canonical
            }
        };

        debug!(
            place = %place.slug,
            tier = capabilities.tier.as_str(),
            related = related_places.len(),
            "Page assembled"
        );

        PageView {
            locale,
            place: PlaceDetails::gated(place, &capabilities),
            capabilities,
            upgrade_prompt,
            content,
            related_places,
            recent_reviews: place.recent_reviews.clone(),
            canonical_url,
            noindex: false,
        }
    }

    async fn related_places(&self, place: &Place) -> Vec<PlaceSummary> {
        let Some(category) = place.primary_category() else {
            return Vec::new();
        };
        if self.related_limit == 0 {
            return Vec::new();
        }

        self.store
            .related_places(place.city.id, category.id, place.id, self.related_limit)
            .await
            .unwrap_or_else(|e| {
                warn!(place = %place.slug, error = %e, "Related places unavailable");
                Vec::new()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::narrative::DisabledNarrativeGenerator;
    use crate::content::NarrativeSource;
    use crate::models::place::fixtures::happy_paws;
    use crate::models::PlanRef;
    use crate::store::InMemoryEntityStore;
    use uuid::Uuid;

    fn assembler(store: InMemoryEntityStore) -> PageAssembler {
        PageAssembler::new(
            Arc::new(store),
            ContentSynthesizer::new(Arc::new(DisabledNarrativeGenerator)),
            Url::parse("https://directory.example").unwrap(),
        )
    }

    fn path(place: &str) -> LocationPath {
        LocationPath::new(Locale::En, "us", Some("california"), "san-jose", "veterinary", place)
            .unwrap()
    }

    #[test]
    fn contact_field_gating() {
        assert_eq!(
            ContactField::gate(true, Some("+1")),
            ContactField::Visible("+1".into())
        );
        assert_eq!(ContactField::gate(false, Some("+1")), ContactField::HiddenByPlan);
        assert_eq!(ContactField::gate(true, None), ContactField::NotProvided);
        assert_eq!(ContactField::gate(false, Some("  ")), ContactField::NotProvided);
    }

    #[test]
    fn contact_field_serializes_with_status_tag() {
        let visible = serde_json::to_value(ContactField::Visible("+1".into())).unwrap();
        assert_eq!(visible, serde_json::json!({"status": "visible", "value": "+1"}));
        let hidden = serde_json::to_value(ContactField::HiddenByPlan).unwrap();
        assert_eq!(hidden, serde_json::json!({"status": "hidden_by_plan"}));
    }

    #[tokio::test]
    async fn premium_page_shows_contact_and_related() {
        let mut neighbour = happy_paws();
        neighbour.id = Uuid::from_u128(10_001);
        neighbour.slug = "city-cats".into();
        neighbour.name = "City Cats".into();

        let store = InMemoryEntityStore::new()
            .with_place(happy_paws())
            .unwrap()
            .with_place(neighbour)
            .unwrap();

        let PageOutcome::Page(view) = assembler(store).assemble(&path("happy-paws-vet")).await
        else {
            panic!("expected a page");
        };

        assert!(view.place.phone.is_visible());
        assert_eq!(view.place.email, ContactField::NotProvided);
        assert!(view.upgrade_prompt.is_none());
        assert_eq!(view.related_places.len(), 1);
        assert_eq!(view.related_places[0].slug, "city-cats");
        assert_eq!(
            view.canonical_url,
            "https://directory.example/en/us/p/california/san-jose/veterinary/happy-paws-vet"
        );
        assert!(!view.noindex);
        assert_eq!(view.content.narrative_source, NarrativeSource::Fallback);
        assert!(view.content.faqs.len() >= 2);
    }

    #[tokio::test]
    async fn free_page_hides_phone_and_offers_upgrade() {
        let mut place = happy_paws();
        place.plan = Some(PlanRef::active("free"));
        let store = InMemoryEntityStore::new().with_place(place).unwrap();

        let PageOutcome::Page(view) = assembler(store).assemble(&path("happy-paws-vet")).await
        else {
            panic!("expected a page");
        };
        assert_eq!(view.place.phone, ContactField::HiddenByPlan);
        assert!(view.upgrade_prompt.is_some());
    }

    #[tokio::test]
    async fn unknown_place_is_not_found() {
        let store = InMemoryEntityStore::new().with_place(happy_paws()).unwrap();
        let outcome = assembler(store).assemble(&path("nobody")).await;
        assert_eq!(outcome, PageOutcome::NotFound);
    }
}
