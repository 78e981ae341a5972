//! Location keys: locale, page type and the composite location path
//!
//! A `LocationPath` is the parsed form of a place URL. It exists in two
//! shapes, with and without a province segment:
//!
//! ```text
//! /{locale}/{country}/p/{province}/{city}/{category}/{place}
//! /{locale}/{country}/{city}/{category}/{place}
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::error::LocationPathError;

/// Page languages served by the directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Nl,
    De,
    Fr,
}

impl Locale {
    pub const ALL: [Locale; 4] = [Locale::En, Locale::Nl, Locale::De, Locale::Fr];

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Nl => "nl",
            Locale::De => "de",
            Locale::Fr => "fr",
        }
    }
}

impl FromStr for Locale {
    type Err = LocationPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "nl" => Ok(Locale::Nl),
            "de" => Ok(Locale::De),
            "fr" => Ok(Locale::Fr),
            _ => Err(LocationPathError::UnknownLocale(s.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of directory page, used to pick the default FAQ template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Place,
    City,
    Category,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Place => "place",
            PageType::City => "city",
            PageType::Category => "category",
        }
    }
}

/// Normalize a URL slug for lookup.
///
/// NFKC fold, trim, lowercase. Slugs are stored normalized, so incoming
/// path segments go through the same fold before they reach the store.
///
/// ```
/// use place_directory::models::normalize_slug;
///
/// assert_eq!(normalize_slug("  San-Jose "), "san-jose");
/// assert_eq!(normalize_slug("ＣＡＦＥ"), "cafe");
/// ```
pub fn normalize_slug(raw: &str) -> String {
    let folded: String = raw.nfkc().collect();
    folded.trim().to_lowercase()
}

/// Parsed location path of a place page. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationPath {
    locale: Locale,
    country_slug: String,
    province_slug: Option<String>,
    city_slug: String,
    category_slug: String,
    place_slug: String,
}

impl LocationPath {
    /// Build a path from raw URL segments.
    ///
    /// An empty province segment is treated as "no province"; any other
    /// empty segment is rejected.
    pub fn new(
        locale: Locale,
        country_slug: &str,
        province_slug: Option<&str>,
        city_slug: &str,
        category_slug: &str,
        place_slug: &str,
    ) -> Result<Self, LocationPathError> {
        Ok(Self {
            locale,
            country_slug: required_slug(country_slug, "country")?,
            province_slug: province_slug
                .map(normalize_slug)
                .filter(|slug| !slug.is_empty()),
            city_slug: required_slug(city_slug, "city")?,
            category_slug: required_slug(category_slug, "category")?,
            place_slug: required_slug(place_slug, "place")?,
        })
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn country_slug(&self) -> &str {
        &self.country_slug
    }

    pub fn province_slug(&self) -> Option<&str> {
        self.province_slug.as_deref()
    }

    pub fn city_slug(&self) -> &str {
        &self.city_slug
    }

    pub fn category_slug(&self) -> &str {
        &self.category_slug
    }

    pub fn place_slug(&self) -> &str {
        &self.place_slug
    }

    /// Render this path as a URL path
    pub fn to_path(&self) -> String {
        render_path(
            self.locale,
            &self.country_slug,
            self.province_slug.as_deref(),
            &self.city_slug,
            &self.category_slug,
            &self.place_slug,
        )
    }
}

impl fmt::Display for LocationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

/// Render a place URL path from its segments
pub(crate) fn render_path(
    locale: Locale,
    country_slug: &str,
    province_slug: Option<&str>,
    city_slug: &str,
    category_slug: &str,
    place_slug: &str,
) -> String {
    match province_slug {
        Some(province) => format!(
            "/{}/{}/p/{}/{}/{}/{}",
            locale, country_slug, province, city_slug, category_slug, place_slug
        ),
        None => format!(
            "/{}/{}/{}/{}/{}",
            locale, country_slug, city_slug, category_slug, place_slug
        ),
    }
}

fn required_slug(raw: &str, segment: &'static str) -> Result<String, LocationPathError> {
    let slug = normalize_slug(raw);
    if slug.is_empty() {
        return Err(LocationPathError::EmptySlug(segment));
    }
    Ok(slug)
}
