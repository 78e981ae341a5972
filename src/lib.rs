//! Place Directory - location-aware place pages
//!
//! Resolves place pages by their composite location path, gates contact
//! visibility by subscription tier, and synthesizes page content with a
//! deterministic FAQ fallback.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  request path  /{locale}/{country}/p/{province}/{city}/...      │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  EntityResolver   ──▶  Resolved | RedirectTo | NotFound         │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │ Resolved(place)
//!               ┌───────────────┴───────────────┐
//!               ▼                               ▼
//! ┌───────────────────────────┐   ┌─────────────────────────────────┐
//! │  FeatureGate              │   │  ContentSynthesizer             │
//! │  tier table → capability  │   │  narrative + FAQ fallback       │
//! └───────────────────────────┘   └─────────────────────────────────┘
//!               └───────────────┬───────────────┘
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  PageAssembler  ──▶  PageView (server feature: axum handlers)   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use place_directory::{EntityResolver, InMemoryEntityStore, LocationPath, Locale, Resolution};
//!
//! let store = Arc::new(InMemoryEntityStore::from_seed_file("seed.yaml")?);
//! let resolver = EntityResolver::new(store);
//! let path = LocationPath::new(Locale::En, "us", Some("california"), "san-jose", "veterinary", "happy-paws-vet")?;
//!
//! match resolver.resolve(&path).await {
//!     Resolution::Resolved(place) => { /* render */ }
//!     Resolution::RedirectTo(canonical) => { /* 301 */ }
//!     Resolution::NotFound => { /* 404 + noindex */ }
//! }
//! ```

pub mod config;
pub mod content;
pub mod error;
pub mod gating;
pub mod models;
pub mod page;
pub mod resolver;
#[cfg(feature = "server")]
pub mod server;
pub mod store;

// Re-export main types
pub use config::DirectoryConfig;
pub use content::{
    ContentBundle, ContentSynthesizer, DefaultFaqCatalog, Faq, FaqRequest, FaqSource,
    NarrativeSource,
};
pub use content::narrative::{
    DisabledNarrativeGenerator, HttpNarrativeGenerator, Narrative, NarrativeGenerator,
    NarrativeInput,
};
pub use error::{ConfigError, DirectoryError, LocationPathError, NarrativeError, StoreError};
pub use gating::{FeatureGate, PlanBadge, PlanCapability, PlanTier, UpgradePrompt};
pub use models::{
    Category, City, Country, EnrichmentBlob, Locale, LocationPath, PageType, Place,
    PlaceSummary, PlanRef, Province, ReviewSnippet,
};
pub use page::{ContactField, PageAssembler, PageOutcome, PageView};
pub use resolver::{EntityResolver, Resolution};
pub use store::{EntityStore, InMemoryEntityStore};
