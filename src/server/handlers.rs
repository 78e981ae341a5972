//! Request handlers

use std::sync::Arc;

use axum::{
    extract::Path,
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::models::{Locale, LocationPath};
use crate::page::{PageAssembler, PageOutcome};
use crate::resolver::canonical_url;

const X_ROBOTS_TAG: HeaderName = HeaderName::from_static("x-robots-tag");

#[derive(Debug, Deserialize)]
pub struct ProvinceSegments {
    locale: String,
    country: String,
    province: String,
    city: String,
    category: String,
    place: String,
}

#[derive(Debug, Deserialize)]
pub struct CountrySegments {
    locale: String,
    country: String,
    city: String,
    category: String,
    place: String,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn place_in_province(
    Extension(assembler): Extension<Arc<PageAssembler>>,
    Path(s): Path<ProvinceSegments>,
) -> Response {
    place_page(
        &assembler,
        &s.locale,
        &s.country,
        Some(&s.province),
        &s.city,
        &s.category,
        &s.place,
    )
    .await
}

pub async fn place_in_country(
    Extension(assembler): Extension<Arc<PageAssembler>>,
    Path(s): Path<CountrySegments>,
) -> Response {
    place_page(
        &assembler, &s.locale, &s.country, None, &s.city, &s.category, &s.place,
    )
    .await
}

pub async fn fallback() -> Response {
    not_found()
}

async fn place_page(
    assembler: &PageAssembler,
    locale: &str,
    country: &str,
    province: Option<&str>,
    city: &str,
    category: &str,
    place: &str,
) -> Response {
    let path = match locale
        .parse::<Locale>()
        .and_then(|locale| LocationPath::new(locale, country, province, city, category, place))
    {
        Ok(path) => path,
        Err(e) => {
            debug!(error = %e, "Rejected place path");
            return not_found();
        }
    };

    match assembler.assemble(&path).await {
        PageOutcome::Page(view) => (StatusCode::OK, Json(view)).into_response(),
        PageOutcome::Redirect(canonical) => {
            let location = redirect_location(assembler.base_url(), &canonical);
            (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
        }
        PageOutcome::NotFound => not_found(),
    }
}

/// Percent-encoded path for the `Location` header
fn redirect_location(base: &Url, canonical: &str) -> String {
    match canonical_url(base, canonical) {
        Ok(url) => url.path().to_string(),
        Err(e) => {
            debug!(path = %canonical, error = %e, "Could not encode redirect path");
            canonical.to_string()
        }
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(X_ROBOTS_TAG, "noindex")],
        Json(json!({ "error": "not_found", "noindex": true })),
    )
        .into_response()
}
