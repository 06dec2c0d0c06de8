//! HTTP tests for the vocabulary endpoints.
//!
//! Each test serves the router on an ephemeral port, backed by an in-memory
//! store, and talks to it with reqwest.

use serde_json::Value;

use thesaurus_api::{router, AppState};
use thesaurus_core::{InMemoryVocabulary, LabelingRegistry, ThesaurusConfig};

const SAMPLE: &str = r#"
:c11880 rdf:type skos:Concept .
:c11880 skos:prefLabel "Lorem Ypsem"@de .
:c11880 skos:prefLabel "Lorem Ipsum"@en .
:c11880 skos:altLabel "Dolor"@de .
:c11881 skos:prefLabel "Sit amet"@de .
:c11881 skos:broader :c11880 .
"#;

async fn spawn_test_server() -> (String, InMemoryVocabulary) {
    let store = InMemoryVocabulary::new();
    let state = AppState::in_memory(
        store.clone(),
        LabelingRegistry::builtin(),
        ThesaurusConfig::default(),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    // Give server a moment to start
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    (base_url, store)
}

async fn import(client: &reqwest::Client, base_url: &str, text: &str) -> reqwest::Response {
    client
        .post(format!("{}/api/v1/rdf/import", base_url))
        .header("content-type", "text/plain")
        .body(text.to_string())
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_without_database() {
    let (base_url, _store) = spawn_test_server().await;
    let response = reqwest::get(format!("{}/health", base_url)).await.unwrap();

    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["labeling_kinds"], 3);
    assert!(body.get("database").is_none());
}

#[tokio::test]
async fn test_import_reports_counts() {
    let (base_url, store) = spawn_test_server().await;
    let client = reqwest::Client::new();

    let response = import(&client, &base_url, SAMPLE).await;
    assert_eq!(response.status(), 201);
    let report: Value = response.json().await.unwrap();
    assert_eq!(report["triples"], 6);
    assert_eq!(report["concepts_created"], 2);
    assert_eq!(report["labelings_created"], 4);
    assert_eq!(report["skipped"], 1);

    assert_eq!(store.counts().await, (2, 4, 4));
}

#[tokio::test]
async fn test_import_rejects_non_literal_object() {
    let (base_url, store) = spawn_test_server().await;
    let client = reqwest::Client::new();

    let response = import(&client, &base_url, ":c1 skos:prefLabel :c2 .\n").await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Labeling::SKOS::PrefLabel#build_from_rdf: Object (:c2) must be a string literal"
    );
    assert_eq!(store.counts().await, (0, 0, 0));
}

#[tokio::test]
async fn test_get_concept_groups_by_relation_name() {
    let (base_url, _store) = spawn_test_server().await;
    let client = reqwest::Client::new();
    import(&client, &base_url, SAMPLE).await;

    let response = client
        .get(format!("{}/api/v1/concepts/c11880", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["concept"]["origin"], "c11880");
    assert_eq!(body["labelings"]["pref_labelings"].as_array().unwrap().len(), 2);
    assert_eq!(body["labelings"]["alt_labelings"][0]["value"], "Dolor");
    assert_eq!(body["labelings"]["alt_labelings"][0]["language"], "de");

    let missing = client
        .get(format!("{}/api/v1/concepts/nope", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_export_concept_as_triples() {
    let (base_url, _store) = spawn_test_server().await;
    let client = reqwest::Client::new();
    import(&client, &base_url, SAMPLE).await;

    let response = client
        .get(format!("{}/api/v1/concepts/c11880/rdf", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let text = response.text().await.unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with(":c11880 rdf:type skos:Concept"));
    assert!(lines[1].contains("skos:prefLabel"));
    assert!(lines[3].contains(r#"skos:altLabel "Dolor"@de"#));
}

#[tokio::test]
async fn test_publish_then_filter_published() {
    let (base_url, _store) = spawn_test_server().await;
    let client = reqwest::Client::new();
    import(&client, &base_url, SAMPLE).await;

    let published = client
        .get(format!(
            "{}/api/v1/labelings?concept_published=true",
            base_url
        ))
        .send()
        .await
        .unwrap()
        .json::<Vec<Value>>()
        .await
        .unwrap();
    assert!(published.is_empty());

    let response = client
        .post(format!("{}/api/v1/concepts/c11880/publish", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let concept: Value = response.json().await.unwrap();
    assert!(!concept["published_at"].is_null());

    let rows = client
        .get(format!(
            "{}/api/v1/labelings?concept_published=true&label_published=true&lang=de",
            base_url
        ))
        .send()
        .await
        .unwrap()
        .json::<Vec<Value>>()
        .await
        .unwrap();
    let values: Vec<&str> = rows
        .iter()
        .map(|r| r["label"]["value"].as_str().unwrap())
        .collect();
    assert_eq!(values, vec!["Lorem Ypsem", "Dolor"]);
    assert_eq!(rows[0]["relation_name"], "pref_labelings");
}

#[tokio::test]
async fn test_labelings_query_params_compose() {
    let (base_url, _store) = spawn_test_server().await;
    let client = reqwest::Client::new();
    import(&client, &base_url, SAMPLE).await;

    let rows = client
        .get(format!(
            "{}/api/v1/labelings?concept=c11880&prefix=lorem",
            base_url
        ))
        .send()
        .await
        .unwrap()
        .json::<Vec<Value>>()
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let rows = client
        .get(format!(
            "{}/api/v1/labelings?kind=Labeling::SKOS::PrefLabel&lang=de",
            base_url
        ))
        .send()
        .await
        .unwrap()
        .json::<Vec<Value>>()
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let unknown = client
        .get(format!("{}/api/v1/labelings?kind=Labeling::Broader", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), 400);

    let missing = client
        .get(format!("{}/api/v1/labelings?concept=nope", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_dashboard_lists_preferred_labels() {
    let (base_url, _store) = spawn_test_server().await;
    let client = reqwest::Client::new();
    import(&client, &base_url, SAMPLE).await;

    let body: Value = client
        .get(format!("{}/api/v1/dashboard?lang=de", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["language"], "de");
    let concepts = body["concepts"].as_array().unwrap();
    assert_eq!(concepts.len(), 2);
    assert_eq!(concepts[0]["origin"], "c11880");
    assert_eq!(concepts[0]["pref_label"], "Lorem Ypsem");
    assert_eq!(concepts[1]["pref_label"], "Sit amet");

    let english: Value = client
        .get(format!("{}/api/v1/dashboard", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(english["language"], "en");
    assert_eq!(english["concepts"][1]["pref_label"], Value::Null);

    let unsupported = client
        .get(format!("{}/api/v1/dashboard?lang=fr", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(unsupported.status(), 400);
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (base_url, _store) = spawn_test_server().await;
    let doc: Value = reqwest::get(format!("{}/openapi.json", base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(doc["info"]["title"], "Thesaurus API");
    assert!(doc["paths"]["/api/v1/dashboard"].is_object());
}
