//! Integration tests for the community metadata routes.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{json_body, row, MockStore, TestHub};
use serde_json::json;

#[tokio::test]
async fn test_dimensions_sorted_by_refs() {
    let store = MockStore::new().respond(
        "AS ?refs",
        vec![row(&[
            ("uri", "http://data.socialhistory.org/vocab/sex"),
            ("label", "Sex"),
            ("refs", "CSDH"),
        ])],
    );
    let hub = TestHub::new(store, MockStore::new());
    std::fs::write(
        hub.metadata_dir().join("dimensions.json"),
        json!([
            {"uri": "http://example.org/year", "label": "Year", "refs": 30, "id": "year"},
            {"uri": "http://example.org/age", "label": "Age", "refs": 2},
            {"uri": "http://example.org/rare", "label": "Rare", "refs": 1},
            {"uri": "http://example.org/area", "label": "Area", "refs": 7},
            {"label": "No uri", "refs": 9}
        ])
        .to_string(),
    )
    .unwrap();

    let response = hub.get("/community/dimensions").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let dimensions = body["dimensions"].as_object().unwrap();
    let uris: Vec<&str> = dimensions.keys().map(String::as_str).collect();
    assert_eq!(
        uris,
        vec![
            "http://example.org/age",
            "http://example.org/area",
            "http://example.org/year",
            "http://data.socialhistory.org/vocab/sex",
        ]
    );
    assert_eq!(dimensions["http://example.org/year"]["id"], "year");
    assert_eq!(
        dimensions["http://data.socialhistory.org/vocab/sex"]["refs"],
        "CSDH"
    );
}

#[tokio::test]
async fn test_dimensions_survive_unavailable_sources() {
    let hub = TestHub::new(MockStore::new().unavailable(), MockStore::new());
    let response = hub.get("/community/dimensions").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"dimensions": {}}));
}

#[tokio::test]
async fn test_schemes_lod_then_csdh_with_duplicates() {
    let lod = MockStore::new().respond(
        "?scheme",
        vec![
            row(&[("scheme", "http://example.org/hisco"), ("label", "HISCO")]),
            row(&[("scheme", "http://example.org/sex"), ("label", "Sex")]),
        ],
    );
    let store = MockStore::new().respond(
        "?c skos:inScheme ?uri",
        vec![
            row(&[("uri", "http://example.org/sex"), ("label", "Sex")]),
            row(&[("uri", "http://example.org/local"), ("label", "Local")]),
        ],
    );
    let hub = TestHub::new(store, lod);

    let response = hub.get("/community/schemes").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"schemes": [
            {"label": "HISCO", "uri": "http://example.org/hisco"},
            {"label": "Sex", "uri": "http://example.org/sex"},
            {"label": "Sex", "uri": "http://example.org/sex"},
            {"label": "Local", "uri": "http://example.org/local"}
        ]})
    );

    // The external part is snapshotted, the local part is not.
    let snapshot: serde_json::Value = serde_json::from_slice(
        &std::fs::read(hub.metadata_dir().join("schemes.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(snapshot.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_schemes_served_from_snapshot() {
    let hub = TestHub::new(MockStore::new(), MockStore::new().unavailable());
    std::fs::write(
        hub.metadata_dir().join("schemes.json"),
        json!([{"label": "Cached", "uri": "http://example.org/cached"}]).to_string(),
    )
    .unwrap();

    let body = json_body(hub.get("/community/schemes").await).await;
    assert_eq!(
        body,
        json!({"schemes": [{"label": "Cached", "uri": "http://example.org/cached"}]})
    );
}

/// A hub whose snapshots are stale as soon as they are written.
fn hub_with_stale_snapshots(store: MockStore, lod: MockStore) -> TestHub {
    TestHub::with_config(store, lod, |config| {
        config.with_metadata_max_age(Some(Duration::ZERO))
    })
}

#[tokio::test]
async fn test_stale_schemes_served_when_lod_fails() {
    let hub = hub_with_stale_snapshots(MockStore::new(), MockStore::new().unavailable());
    std::fs::write(
        hub.metadata_dir().join("schemes.json"),
        json!([{"label": "Cached", "uri": "http://example.org/cached"}]).to_string(),
    )
    .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let body = json_body(hub.get("/community/schemes").await).await;
    assert_eq!(
        body,
        json!({"schemes": [{"label": "Cached", "uri": "http://example.org/cached"}]})
    );
    // The refresh was attempted.
    assert_eq!(hub.lod.queried().len(), 1);
}

#[tokio::test]
async fn test_stale_dimensions_served_when_lsd_fails() {
    let hub = hub_with_stale_snapshots(MockStore::new(), MockStore::new());
    std::fs::write(
        hub.metadata_dir().join("dimensions.json"),
        json!([{"uri": "http://example.org/age", "label": "Age", "refs": 5}]).to_string(),
    )
    .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    // Nothing listens on the configured LSD address.
    let body = json_body(hub.get("/community/dimensions").await).await;
    let dimensions = body["dimensions"].as_object().unwrap();
    assert_eq!(dimensions.len(), 1);
    assert_eq!(dimensions["http://example.org/age"]["refs"], 5);
}

#[tokio::test]
async fn test_definition_of_known_variable() {
    let uri = "http://example.org/sex";
    let store = MockStore::new()
        .asking(true)
        .respond(
            "?measured_concept",
            vec![row(&[
                ("uri", uri),
                ("type", "http://purl.org/linked-data/cube#DimensionProperty"),
                ("label", "Sex"),
            ])],
        )
        .respond(
            "qb:codeList ?uri",
            vec![
                row(&[("uri", "http://example.org/sex/scheme"), ("label", "Sexes")]),
                row(&[("uri", "http://example.org/sex/other"), ("label", "Other")]),
            ],
        );
    let hub = TestHub::new(store, MockStore::new());

    let response = hub
        .get("/community/definition?uri=http%3A%2F%2Fexample.org%2Fsex")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "uri": uri,
            "type": "http://purl.org/linked-data/cube#DimensionProperty",
            "label": "Sex",
            "codelist": {"uri": "http://example.org/sex/scheme", "label": "Sexes"}
        })
    );
    assert!(hub.store.committed().is_empty());
}

#[tokio::test]
async fn test_definition_resolves_unknown_variable() {
    let store = MockStore::new().asking(false);
    let hub = TestHub::new(store, MockStore::new());

    let response = hub
        .get("/community/definition?uri=http%3A%2F%2Fexample.org%2Fage")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"uri": "http://example.org/age"})
    );
    assert_eq!(
        hub.store.committed(),
        vec!["LOAD <http://example.org/age> INTO GRAPH <http://example.org/age>".to_string()]
    );
}

#[tokio::test]
async fn test_definition_requires_uri() {
    let hub = TestHub::new(MockStore::new(), MockStore::new());
    let response = hub.get("/community/definition").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json_body(response).await["message"]
        .as_str()
        .unwrap()
        .contains("URI"));
}

#[tokio::test]
async fn test_concepts_concatenate_lod_and_local() {
    let lod = MockStore::new().respond(
        "skos:member+",
        vec![row(&[("uri", "http://example.org/m"), ("label", "Male")])],
    );
    let store = MockStore::new().respond(
        "skos:member+",
        vec![
            row(&[("uri", "http://example.org/m"), ("label", "Male")]),
            row(&[("uri", "http://example.org/f"), ("label", "Female"), ("notation", "F")]),
        ],
    );
    let hub = TestHub::new(store, lod);

    let body = json_body(
        hub.get("/community/concepts?uri=http%3A%2F%2Fexample.org%2Fsex")
            .await,
    )
    .await;
    let codelist = body["codelist"].as_array().unwrap();
    assert_eq!(codelist.len(), 3);
    assert_eq!(codelist[2]["notation"], "F");
}

#[tokio::test]
async fn test_concepts_with_lod_down_use_local() {
    let store = MockStore::new().respond(
        "skos:member+",
        vec![row(&[("uri", "http://example.org/f"), ("label", "Female")])],
    );
    let hub = TestHub::new(store, MockStore::new().unavailable());

    let response = hub
        .get("/community/concepts?uri=http%3A%2F%2Fexample.org%2Fsex")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"codelist": [{"uri": "http://example.org/f", "label": "Female"}]})
    );
}

#[tokio::test]
async fn test_concepts_with_every_source_down_fail() {
    let hub = TestHub::new(MockStore::new().unavailable(), MockStore::new().unavailable());
    let response = hub
        .get("/community/concepts?uri=http%3A%2F%2Fexample.org%2Fsex")
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

/// `http://x> INTO GRAPH <urn:g> ; DROP ALL ; LOAD <http://y`, URL encoded.
const TAMPERED_URI: &str =
    "http%3A%2F%2Fx%3E%20INTO%20GRAPH%20%3Curn%3Ag%3E%20%3B%20DROP%20ALL%20%3B%20LOAD%20%3Chttp%3A%2F%2Fy";

#[tokio::test]
async fn test_definition_rejects_invalid_iri() {
    let hub = TestHub::new(MockStore::new().asking(false), MockStore::new());

    let response = hub
        .get(&format!("/community/definition?uri={}", TAMPERED_URI))
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["code"], 500);
    assert!(body["message"].as_str().unwrap().contains("not a valid IRI"));

    assert!(hub.store.committed().is_empty());
    assert!(hub.store.queried().is_empty());
}

#[tokio::test]
async fn test_concepts_rejects_invalid_iri() {
    let hub = TestHub::new(MockStore::new(), MockStore::new());

    let response = hub
        .get(&format!("/community/concepts?uri={}", TAMPERED_URI))
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(hub.store.queried().is_empty());
    assert!(hub.lod.queried().is_empty());
}
