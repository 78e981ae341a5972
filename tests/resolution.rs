//! Resolution against the demo seed: serve, redirect, or not found.

mod common;

use std::sync::Arc;

use common::{path, seeded_store, FailingStore};
use place_directory::{EntityResolver, Resolution};

fn resolver() -> EntityResolver {
    EntityResolver::new(Arc::new(seeded_store()))
}

/// (canonical path, place slug) for every categorized seeded place
const CANONICAL: &[(&str, &str)] = &[
    (
        "/en/us/p/california/san-jose/veterinary/happy-paws-vet",
        "happy-paws-vet",
    ),
    ("/en/us/p/california/san-jose/veterinary/city-cats", "city-cats"),
    (
        "/en/us/p/california/san-jose/veterinary/bark-and-bone",
        "bark-and-bone",
    ),
    ("/en/us/p/california/oakland/bakery/oakland-crumbs", "oakland-crumbs"),
    ("/en/nl/utrecht/bakery/de-zoete-inval", "de-zoete-inval"),
];

/// Existing scopes to request places under
const SCOPES: &[&str] = &[
    "/en/us/p/california/san-jose",
    "/en/us/p/california/oakland",
    "/en/us/p/texas/austin",
    "/en/nl/utrecht",
];

#[tokio::test]
async fn canonical_paths_resolve_to_their_place() {
    let resolver = resolver();
    for (canonical, slug) in CANONICAL {
        match resolver.resolve(&path(canonical)).await {
            Resolution::Resolved(place) => assert_eq!(place.slug, *slug),
            other => panic!("{canonical}: expected Resolved, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn wrong_existing_scope_redirects_to_canonical() {
    let resolver = resolver();
    for (canonical, slug) in CANONICAL {
        let category = canonical.rsplit('/').nth(1).unwrap();
        for scope in SCOPES {
            if canonical.starts_with(&format!("{scope}/")) {
                continue;
            }
            let requested = format!("{scope}/{category}/{slug}");
            assert_eq!(
                resolver.resolve(&path(&requested)).await,
                Resolution::RedirectTo(canonical.to_string()),
                "requested {requested}"
            );
        }
    }
}

#[tokio::test]
async fn unknown_slug_is_not_found_everywhere() {
    let resolver = resolver();
    for scope in SCOPES {
        let requested = format!("{scope}/veterinary/no-such-place");
        assert_eq!(
            resolver.resolve(&path(&requested)).await,
            Resolution::NotFound,
            "requested {requested}"
        );
    }
}

#[tokio::test]
async fn moved_vet_redirects_from_oakland() {
    let resolution = resolver()
        .resolve(&path("/en/us/p/california/oakland/veterinary/happy-paws-vet"))
        .await;
    assert_eq!(
        resolution,
        Resolution::RedirectTo("/en/us/p/california/san-jose/veterinary/happy-paws-vet".into())
    );
}

#[tokio::test]
async fn missing_city_is_not_found_even_for_known_slug() {
    let resolution = resolver()
        .resolve(&path("/en/us/p/california/fresno/veterinary/happy-paws-vet"))
        .await;
    assert_eq!(resolution, Resolution::NotFound);

    let resolution = resolver()
        .resolve(&path("/en/us/p/texas/san-jose/veterinary/happy-paws-vet"))
        .await;
    assert_eq!(resolution, Resolution::NotFound);
}

#[tokio::test]
async fn redirect_keeps_requested_locale() {
    let resolution = resolver()
        .resolve(&path("/nl/us/p/texas/austin/bakkerij/de-zoete-inval"))
        .await;
    assert_eq!(
        resolution,
        Resolution::RedirectTo("/nl/nl/utrecht/bakery/de-zoete-inval".into())
    );
}

#[tokio::test]
async fn uncategorized_place_redirects_with_requested_category() {
    let resolution = resolver()
        .resolve(&path("/en/us/p/california/oakland/animal-shelter/stray-dog-shelter"))
        .await;
    assert_eq!(
        resolution,
        Resolution::RedirectTo(
            "/en/us/p/california/san-jose/animal-shelter/stray-dog-shelter".into()
        )
    );
}

#[tokio::test]
async fn resolution_is_idempotent() {
    let resolver = resolver();
    let requested = path("/en/us/p/texas/austin/veterinary/city-cats");
    let first = resolver.resolve(&requested).await;
    let second = resolver.resolve(&requested).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn store_failure_reads_as_not_found() {
    let resolver = EntityResolver::new(Arc::new(FailingStore));
    let resolution = resolver
        .resolve(&path("/en/us/p/california/san-jose/veterinary/happy-paws-vet"))
        .await;
    assert_eq!(resolution, Resolution::NotFound);
}

#[tokio::test]
async fn slugs_are_normalized_before_lookup() {
    let resolution = resolver()
        .resolve(&path("/en/US/p/California/San-Jose/veterinary/Happy-Paws-Vet"))
        .await;
    assert!(resolution.is_found());
}
