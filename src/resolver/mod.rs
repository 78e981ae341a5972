//! Place resolution with canonical redirects
//!
//! Given a location path that may be stale (the place moved city, a
//! province was renamed, a crawler kept an old link), find the place and
//! decide between serving it, permanently redirecting to its canonical
//! path, or reporting it as absent.
//!
//! ```text
//! city in scope? ──no──▶ NotFound
//!      │yes
//! place in city? ──yes─▶ Resolved
//!      │no
//! place anywhere? ─no──▶ NotFound
//!      │yes
//!      ▼
//! RedirectTo(canonical path)
//! ```
//!
//! Store failures at any step are logged and reported as `NotFound`, so a
//! page never renders a partial or 500-class state from this layer.

mod canonical;

use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::error::StoreError;
use crate::models::{LocationPath, Place};
use crate::store::EntityStore;

pub use canonical::{canonical_path, canonical_url};

/// Outcome of resolving a location path
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The place lives at the requested location
    Resolved(Box<Place>),
    /// The place exists elsewhere; permanently redirect to this path
    RedirectTo(String),
    /// No such place
    NotFound,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    /// Absolute redirect target, if this is a redirect
    pub fn redirect_url(&self, base: &Url) -> Option<Url> {
        match self {
            Resolution::RedirectTo(path) => canonical_url(base, path).ok(),
            _ => None,
        }
    }
}

/// Resolves place pages against an entity store. Read-only.
pub struct EntityResolver {
    store: Arc<dyn EntityStore>,
}

impl EntityResolver {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Resolve a location path to a place, a redirect, or nothing
    pub async fn resolve(&self, path: &LocationPath) -> Resolution {
        match self.try_resolve(path).await {
            Ok(resolution) => resolution,
            Err(e) => {
                warn!(path = %path, error = %e, "Store failure during resolution, treating as not found");
                Resolution::NotFound
            }
        }
    }

    async fn try_resolve(&self, path: &LocationPath) -> Result<Resolution, StoreError> {
        let Some(city) = self
            .store
            .find_city_by_slug(path.city_slug(), path.province_slug(), path.country_slug())
            .await?
        else {
            debug!(path = %path, "City not in scope");
            return Ok(Resolution::NotFound);
        };

        if let Some(place) = self
            .store
            .find_place_by_slug_in_city(path.place_slug(), city.id)
            .await?
        {
            debug!(path = %path, place_id = %place.id, "Resolved at requested location");
            return Ok(Resolution::Resolved(Box::new(place)));
        }

        let Some(place) = self
            .store
            .find_place_by_slug_global(path.place_slug())
            .await?
        else {
            debug!(path = %path, "Place slug unknown");
            return Ok(Resolution::NotFound);
        };

        let canonical = canonical_path(&place, path.locale(), path.category_slug());
        if canonical == path.to_path() {
            // Global lookup says the request was already canonical; serve the
            // full record instead of redirecting to ourselves.
            debug!(path = %path, "In-city miss but path is canonical");
            let full = self
                .store
                .find_place_by_slug_in_city(&place.slug, place.city.id)
                .await?
                .unwrap_or(place);
            return Ok(Resolution::Resolved(Box::new(full)));
        }

        debug!(path = %path, canonical = %canonical, "Redirecting to canonical location");
        Ok(Resolution::RedirectTo(canonical))
    }
}
