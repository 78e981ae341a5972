//! Scraped enrichment data
//!
//! The enrichment pipeline writes free-form JSON whose shape depends on
//! the source that produced it. This module reads the handful of fields
//! the directory understands, each independently: a field that is
//! missing, blank or of the wrong JSON type is simply absent, and never
//! poisons its neighbours.

use serde::Serialize;
use serde_json::{Map, Value};

const ABOUT_KEYS: &[&str] = &["about_us", "aboutUs", "about"];
const FACT_KEYS: &[&str] = &["facts", "highlights"];
const SERVICE_KEYS: &[&str] = &["services", "specialties"];
const LANGUAGE_KEYS: &[&str] = &["languages", "languages_spoken"];
const FOUNDED_KEYS: &[&str] = &["year_founded", "yearFounded", "founded"];
const HOURS_KEYS: &[&str] = &["opening_hours", "openingHours", "hours"];

/// Optional-field view over a place's scraped content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentBlob {
    pub about_us: Option<String>,
    pub facts: Vec<String>,
    pub services: Vec<String>,
    pub languages: Vec<String>,
    pub year_founded: Option<i32>,
    pub opening_hours: Option<String>,
}

impl EnrichmentBlob {
    /// Read an enrichment blob leniently from raw JSON.
    ///
    /// Anything other than a JSON object yields the empty blob.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        Self {
            about_us: first_text(obj, ABOUT_KEYS),
            facts: first_list(obj, FACT_KEYS),
            services: first_list(obj, SERVICE_KEYS),
            languages: first_list(obj, LANGUAGE_KEYS),
            year_founded: first_year(obj, FOUNDED_KEYS),
            opening_hours: first_hours(obj, HOURS_KEYS),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn clean(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn first_text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(|v| v.as_str().and_then(clean))
}

fn as_list(value: &Value) -> Option<Vec<String>> {
    let items: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().and_then(clean))
            .collect(),
        Value::String(s) => clean(s).into_iter().collect(),
        _ => return None,
    };
    (!items.is_empty()).then_some(items)
}

fn first_list(obj: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(as_list)
        .unwrap_or_default()
}

fn as_year(value: &Value) -> Option<i32> {
    let year = match value {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    // Anything outside this window is scraper noise
    (1000..=9999).contains(&year).then_some(year as i32)
}

fn first_year(obj: &Map<String, Value>, keys: &[&str]) -> Option<i32> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(as_year)
}

fn as_hours(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => clean(s),
        Value::Array(_) => as_list(value).map(|lines| lines.join("; ")),
        Value::Object(days) => {
            let mut lines: Vec<String> = days
                .iter()
                .filter_map(|(day, hours)| {
                    hours
                        .as_str()
                        .and_then(clean)
                        .map(|h| format!("{}: {}", day, h))
                })
                .collect();
            lines.sort();
            (!lines.is_empty()).then(|| lines.join("; "))
        }
        _ => None,
    }
}

fn first_hours(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(as_hours)
}
