//! Canonical place URLs
//!
//! The canonical path is derived from where the place actually lives, never
//! from what was requested, with one exception: a place without any
//! category association borrows the requested category segment.

use url::Url;

use crate::models::location::render_path;
use crate::models::{Locale, Place};

/// The one correct path for `place` in `locale`.
///
/// `requested_category` is only used when the place has no category.
pub fn canonical_path(place: &Place, locale: Locale, requested_category: &str) -> String {
    let category_slug = place
        .primary_category()
        .map(|c| c.slug.as_str())
        .unwrap_or(requested_category);

    render_path(
        locale,
        &place.city.country.slug,
        place.city.province.as_ref().map(|p| p.slug.as_str()),
        &place.city.slug,
        category_slug,
        &place.slug,
    )
}

/// Join a canonical path onto the site base URL
pub fn canonical_url(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    base.join(path)
}
