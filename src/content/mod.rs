//! Page content synthesis
//!
//! Merges structured place data, enrichment data and generated prose into
//! a [`ContentBundle`]. The generator is the only unreliable input: when
//! it fails or runs past the timeout, the bundle falls back to the
//! structured description and the default FAQ catalog.
//!
//! FAQ invariant: a bundle carries either no FAQs or at least two. A lone
//! extracted pair reads as an accident on the page, so it is discarded in
//! favour of the catalog.

mod catalog;
mod extract;
pub mod narrative;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::NarrativeError;
use crate::models::{EnrichmentBlob, Locale, Place};

pub use catalog::{DefaultFaqCatalog, FaqRequest};
pub use extract::extract_faqs;
use narrative::{Narrative, NarrativeGenerator, NarrativeInput};

pub const DEFAULT_NARRATIVE_TIMEOUT: Duration = Duration::from_secs(8);

/// Extracted FAQs below this count are replaced by the catalog
const MIN_EXTRACTED_FAQS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaqSource {
    Extracted,
    Defaults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeSource {
    Generated,
    Fallback,
}

/// Synthesized page content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentBundle {
    pub intro: String,
    pub secondary: String,
    pub bullets: Vec<String>,
    pub faqs: Vec<Faq>,
    pub faq_source: FaqSource,
    pub narrative_source: NarrativeSource,
}

pub struct ContentSynthesizer {
    generator: Arc<dyn NarrativeGenerator>,
    catalog: DefaultFaqCatalog,
    timeout: Duration,
}

impl ContentSynthesizer {
    pub fn new(generator: Arc<dyn NarrativeGenerator>) -> Self {
        Self {
            generator,
            catalog: DefaultFaqCatalog::new(),
            timeout: DEFAULT_NARRATIVE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the content bundle for a place page. Infallible.
    pub async fn synthesize(
        &self,
        place: &Place,
        enrichment: Option<&EnrichmentBlob>,
        locale: Locale,
    ) -> ContentBundle {
        let input = NarrativeInput::assemble(place, enrichment, locale);
        let request = FaqRequest::for_place(place, locale);

        match self.generate(&input).await {
            Ok(narrative) => {
                let (faqs, faq_source) = self.select_faqs(extract_faqs(&narrative), &request);
                debug!(
                    place = %place.slug,
                    faq_count = faqs.len(),
                    faq_source = ?faq_source,
                    "Narrative generated"
                );

                let intro = if narrative.intro.trim().is_empty() {
                    fallback_intro(place)
                } else {
                    narrative.intro
                };

                ContentBundle {
                    intro,
                    secondary: narrative.secondary,
                    bullets: narrative.bullets,
                    faqs,
                    faq_source,
                    narrative_source: NarrativeSource::Generated,
                }
            }
            Err(e) => {
                warn!(place = %place.slug, error = %e, "Narrative unavailable, using fallback content");
                ContentBundle {
                    intro: fallback_intro(place),
                    secondary: String::new(),
                    bullets: Vec::new(),
                    faqs: self.catalog.defaults(&request),
                    faq_source: FaqSource::Defaults,
                    narrative_source: NarrativeSource::Fallback,
                }
            }
        }
    }

    /// Keep extracted FAQs when there are enough of them, otherwise use
    /// the catalog for this page.
    pub fn select_faqs(&self, extracted: Vec<Faq>, request: &FaqRequest) -> (Vec<Faq>, FaqSource) {
        if extracted.len() >= MIN_EXTRACTED_FAQS {
            (extracted, FaqSource::Extracted)
        } else {
            (self.catalog.defaults(request), FaqSource::Defaults)
        }
    }

    async fn generate(&self, input: &NarrativeInput) -> Result<Narrative, NarrativeError> {
        match tokio::time::timeout(self.timeout, self.generator.generate(input)).await {
            Ok(result) => result,
            Err(_) => Err(NarrativeError::Timeout(self.timeout)),
        }
    }
}

fn fallback_intro(place: &Place) -> String {
    place
        .description
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::narrative::DisabledNarrativeGenerator;
    use crate::models::place::fixtures::happy_paws;
    use crate::models::PageType;
    use async_trait::async_trait;

    struct Fixed(Narrative);

    #[async_trait]
    impl NarrativeGenerator for Fixed {
        async fn generate(&self, _input: &NarrativeInput) -> Result<Narrative, NarrativeError> {
            Ok(self.0.clone())
        }
    }

    struct Stalled;

    #[async_trait]
    impl NarrativeGenerator for Stalled {
        async fn generate(&self, _input: &NarrativeInput) -> Result<Narrative, NarrativeError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Narrative::default())
        }
    }

    fn synthesizer(generator: impl NarrativeGenerator + 'static) -> ContentSynthesizer {
        ContentSynthesizer::new(Arc::new(generator))
    }

    fn narrative(secondary: &str) -> Narrative {
        Narrative {
            intro: "Happy Paws Vet cares for pets in San Jose.".into(),
            secondary: secondary.into(),
            bullets: vec!["Open six days a week".into()],
        }
    }

    #[tokio::test]
    async fn two_extracted_pairs_are_kept() {
        let s = synthesizer(Fixed(narrative(
            "Q: Do you take walk-ins?\nA: Yes.\nQ: Is there parking?\nA: Behind the building.",
        )));
        let bundle = s.synthesize(&happy_paws(), None, Locale::En).await;
        assert_eq!(bundle.faq_source, FaqSource::Extracted);
        assert_eq!(bundle.faqs.len(), 2);
        assert_eq!(bundle.narrative_source, NarrativeSource::Generated);
        assert_eq!(bundle.bullets, vec!["Open six days a week"]);
    }

    #[tokio::test]
    async fn single_pair_falls_back_to_dutch_place_defaults() {
        let s = synthesizer(Fixed(narrative("Vraag: Zijn jullie open?\nAntwoord: Ja.")));
        let bundle = s.synthesize(&happy_paws(), None, Locale::Nl).await;

        let expected = DefaultFaqCatalog::new().defaults(&FaqRequest::for_place(&happy_paws(), Locale::Nl));
        assert_eq!(bundle.faq_source, FaqSource::Defaults);
        assert_eq!(bundle.faqs.len(), 4);
        assert_eq!(bundle.faqs, expected);
        assert_eq!(bundle.narrative_source, NarrativeSource::Generated);
    }

    #[tokio::test]
    async fn generator_failure_uses_description_and_defaults() {
        let s = synthesizer(DisabledNarrativeGenerator);
        let bundle = s.synthesize(&happy_paws(), None, Locale::En).await;
        assert_eq!(bundle.intro, "Friendly neighbourhood animal clinic.");
        assert!(bundle.secondary.is_empty());
        assert!(bundle.bullets.is_empty());
        assert!(bundle.faqs.len() >= 2);
        assert_eq!(bundle.narrative_source, NarrativeSource::Fallback);
    }

    #[tokio::test]
    async fn timeout_yields_fallback() {
        let s = synthesizer(Stalled).with_timeout(Duration::from_millis(50));
        let mut place = happy_paws();
        place.description = None;
        let bundle = s.synthesize(&place, None, Locale::En).await;
        assert!(bundle.intro.is_empty());
        assert!(bundle.bullets.is_empty());
        assert!(bundle.faqs.len() >= 2);
        assert_eq!(bundle.faq_source, FaqSource::Defaults);
    }

    #[tokio::test]
    async fn empty_generated_intro_uses_description() {
        let mut n = narrative("");
        n.intro = "  ".into();
        let bundle = synthesizer(Fixed(n))
            .synthesize(&happy_paws(), None, Locale::En)
            .await;
        assert_eq!(bundle.intro, "Friendly neighbourhood animal clinic.");
    }

    #[test]
    fn select_faqs_threshold() {
        let s = synthesizer(DisabledNarrativeGenerator);
        let request = FaqRequest {
            page_type: PageType::Category,
            locale: Locale::De,
            place_name: String::new(),
            category_name: Some("Tierarzt".into()),
            city_name: "Berlin".into(),
            country_name: "Deutschland".into(),
        };
        let one = vec![Faq {
            question: "Q?".into(),
            answer: "A.".into(),
        }];
        let (faqs, source) = s.select_faqs(one.clone(), &request);
        assert_eq!(source, FaqSource::Defaults);
        assert_eq!(faqs.len(), 3);

        let two = [one.clone(), vec![Faq { question: "R?".into(), answer: "B.".into() }]].concat();
        let (faqs, source) = s.select_faqs(two.clone(), &request);
        assert_eq!(source, FaqSource::Extracted);
        assert_eq!(faqs, two);
    }
}
