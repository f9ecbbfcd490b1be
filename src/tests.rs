//! Integration tests for the Research Hub backend.

use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::assistant::Assistant;
use crate::config::{AssistantConfig, Config};
use crate::db::{init_database, Repository};
use crate::search::SearchIndex;
use crate::storage::ObjectStore;
use crate::{create_router, AppState};

const TEST_PSK: &str = "test-api-key";
const TEST_USER: &str = "alice";

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_psk(Some(TEST_PSK.to_string())).await
    }

    async fn with_psk(psk: Option<String>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");
        let index_path = temp_dir.path().join("index");
        let storage_path = temp_dir.path().join("storage");

        // Bind first so stored-file URLs can point at this server
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));
        let search = Arc::new(SearchIndex::open(&index_path).expect("Failed to init search"));
        let storage =
            Arc::new(ObjectStore::open(&storage_path, &base_url).expect("Failed to init storage"));
        let assistant =
            Arc::new(Assistant::new(AssistantConfig::default()).expect("Failed to init assistant"));

        let config = Config {
            api_psk: psk.clone(),
            db_path,
            index_path,
            storage_path,
            public_base_url: base_url.clone(),
            bind_addr: addr,
            log_level: "warn".to_string(),
            assistant: AssistantConfig::default(),
        };

        let state = AppState {
            repo,
            search,
            storage,
            assistant,
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("x-user-id", TEST_USER.parse().unwrap());
        if let Some(key) = psk {
            headers.insert("x-api-key", key.parse().unwrap());
        }

        TestFixture {
            client: Client::builder().default_headers(headers).build().unwrap(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create_citation(&self, body: Value) -> Value {
        let resp = self
            .client
            .post(self.url("/api/citations"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body["data"].clone()
    }

    async fn list(&self, query: &str) -> Vec<Value> {
        let resp = self
            .client
            .get(self.url(&format!("/api/citations{}", query)))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body["data"].as_array().unwrap().clone()
    }
}

fn nature_article() -> Value {
    json!({
        "type": "article",
        "title": "X",
        "authors": ["Smith, J.", "Doe, A."],
        "year": 2020,
        "journal": "Nature",
        "volume": "5",
        "issue": "2",
        "pages": "10-20",
        "doi": "10.1/abc",
        "tags": ["physics"]
    })
}

fn titles(list: &[Value]) -> Vec<&str> {
    list.iter().map(|c| c["title"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = Client::new().get(fixture.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "research-hub-backend");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_auth_missing_psk() {
    let fixture = TestFixture::new().await;

    // Request without API key
    let resp = Client::new()
        .get(fixture.url("/api/citations"))
        .header("x-user-id", TEST_USER)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_auth_invalid_psk() {
    let fixture = TestFixture::new().await;

    let resp = Client::new()
        .get(fixture.url("/api/citations"))
        .header("x-api-key", "wrong-key")
        .header("x-user-id", TEST_USER)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_auth_bearer_token() {
    let fixture = TestFixture::new().await;

    let resp = Client::new()
        .get(fixture.url("/api/citations"))
        .header("authorization", format!("Bearer {}", TEST_PSK))
        .header("x-user-id", TEST_USER)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_no_psk_configured_allows_requests() {
    let fixture = TestFixture::with_psk(None).await;

    let resp = fixture
        .client
        .get(fixture.url("/api/citations"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_missing_or_invalid_user_id() {
    let fixture = TestFixture::new().await;

    let resp = Client::new()
        .get(fixture.url("/api/citations"))
        .header("x-api-key", TEST_PSK)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let resp = fixture
        .client
        .get(fixture.url("/api/citations"))
        .header("x-user-id", "../bob")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_citation_crud() {
    let fixture = TestFixture::new().await;

    // Create
    let created = fixture.create_citation(nature_article()).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(created["userId"], TEST_USER);
    assert_eq!(created["isFavorite"], false);
    assert_eq!(
        created["formattedCitations"]["apa"],
        "Smith, J., Doe, A. (2020). X. Nature, 5(2), 10-20. https://doi.org/10.1/abc"
    );

    // List round trip keeps the supplied fields
    let list = fixture.list("").await;
    assert_eq!(list.len(), 1);
    let listed = &list[0];
    assert_eq!(listed["id"], id.as_str());
    for field in ["type", "title", "authors", "year", "journal", "volume", "issue", "pages", "doi", "tags"] {
        assert_eq!(listed[field], nature_article()[field], "field {}", field);
    }

    // Get
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/citations/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Update
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/citations/{}", id)))
        .json(&json!({ "title": "Y", "tags": ["physics", "review"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["title"], "Y");
    assert_eq!(body["data"]["authors"], json!(["Smith, J.", "Doe, A."]));
    assert_eq!(body["data"]["createdAt"], created["createdAt"]);

    // Delete
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/citations/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Verify deleted
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/citations/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/citations/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_citation_validation() {
    let fixture = TestFixture::new().await;

    let cases = [
        json!({ "title": "", "authors": ["A"], "year": 2020 }),
        json!({ "title": "   ", "authors": ["A"], "year": 2020 }),
        json!({ "title": "T", "authors": [], "year": 2020 }),
        json!({ "title": "T", "authors": ["", "  "], "year": 2020 }),
    ];
    for body in cases {
        let resp = fixture
            .client
            .post(fixture.url("/api/citations"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400, "body {}", body);
        let err: Value = resp.json().await.unwrap();
        assert_eq!(err["error"]["code"], "VALIDATION_ERROR");
    }

    // Nothing was stored
    assert!(fixture.list("").await.is_empty());

    // Blank author entries are dropped, an out-of-range year is accepted
    let created = fixture
        .create_citation(json!({ "title": "Old", "authors": ["A", " "], "year": 1850 }))
        .await;
    assert_eq!(created["authors"], json!(["A"]));
    assert_eq!(created["year"], 1850);

    let id = created["id"].as_str().unwrap();
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/citations/{}", id)))
        .json(&json!({ "authors": [""] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/citations/{}", id)))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_list_filters_and_sorting() {
    let fixture = TestFixture::new().await;

    fixture
        .create_citation(json!({
            "type": "book", "title": "beta", "authors": ["Zed"], "year": 2001,
            "publisher": "ACME", "tags": ["ml"]
        }))
        .await;
    fixture
        .create_citation(json!({
            "type": "article", "title": "Alpha", "authors": ["Young"], "year": 2010,
            "journal": "Graphene Letters", "tags": ["physics"]
        }))
        .await;
    fixture
        .create_citation(json!({
            "type": "article", "title": "gamma", "authors": ["Xu"], "year": 1999,
            "tags": ["ml", "physics"]
        }))
        .await;

    // Default: newest first
    assert_eq!(titles(&fixture.list("").await), vec!["gamma", "Alpha", "beta"]);

    assert_eq!(
        titles(&fixture.list("?sortBy=title&order=asc").await),
        vec!["Alpha", "beta", "gamma"]
    );
    assert_eq!(
        titles(&fixture.list("?sortBy=year&order=desc").await),
        vec!["Alpha", "beta", "gamma"]
    );
    assert_eq!(
        titles(&fixture.list("?sortBy=authors&order=asc").await),
        vec!["gamma", "Alpha", "beta"]
    );

    assert_eq!(titles(&fixture.list("?type=book").await), vec!["beta"]);
    assert_eq!(fixture.list("?type=all").await.len(), 3);

    // Search covers title, authors and journal
    assert_eq!(titles(&fixture.list("?q=GRAPHENE").await), vec!["Alpha"]);
    assert_eq!(titles(&fixture.list("?q=zed").await), vec!["beta"]);

    // Any selected tag matches
    assert_eq!(
        titles(&fixture.list("?tags=ml&sortBy=title&order=asc").await),
        vec!["beta", "gamma"]
    );
    assert_eq!(fixture.list("?tags=ml,physics").await.len(), 3);

    let resp = fixture
        .client
        .get(fixture.url("/api/citations?type=podcast"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_citation_summary() {
    let fixture = TestFixture::new().await;

    fixture.create_citation(nature_article()).await;
    fixture
        .create_citation(json!({
            "type": "book", "title": "B", "authors": ["A"], "year": 2001,
            "tags": ["ml", "physics"], "isFavorite": true
        }))
        .await;

    let resp = fixture
        .client
        .get(fixture.url("/api/citations/summary"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let summary = &body["data"];
    assert_eq!(summary["total"], 2);
    assert_eq!(summary["favorites"], 1);
    assert_eq!(summary["byType"][0], json!({ "type": "article", "count": 1 }));
    assert_eq!(summary["byType"][1], json!({ "type": "book", "count": 1 }));
    assert_eq!(summary["tags"], json!(["ml", "physics"]));
}

#[tokio::test]
async fn test_export_bibliography() {
    let fixture = TestFixture::new().await;

    fixture.create_citation(nature_article()).await;
    fixture
        .create_citation(json!({
            "type": "book", "title": "Deep Learning", "authors": ["Goodfellow, I."],
            "year": 2016, "publisher": "MIT Press"
        }))
        .await;

    let resp = fixture
        .client
        .get(fixture.url("/api/citations/export?style=mla&sortBy=year&order=asc"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["content-type"].to_str().unwrap(),
        "text/plain; charset=utf-8"
    );
    assert_eq!(
        resp.headers()["content-disposition"].to_str().unwrap(),
        "attachment; filename=\"bibliography-mla.txt\""
    );

    let text = resp.text().await.unwrap();
    let paragraphs: Vec<&str> = text.split("\n\n").collect();
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(paragraphs[0], "Goodfellow, I. \"Deep Learning\" 2016.");
    assert_eq!(
        paragraphs[1],
        "Smith, J. \"X\" Nature, vol. 5, no. 2, 2020, pp. 10-20."
    );

    // Unknown style falls back to APA; filters apply
    let resp = fixture
        .client
        .get(fixture.url("/api/citations/export?style=vancouver&type=book"))
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.headers()["content-disposition"].to_str().unwrap(),
        "attachment; filename=\"bibliography-apa.txt\""
    );
    assert_eq!(
        resp.text().await.unwrap(),
        "Goodfellow, I. (2016). Deep Learning. MIT Press."
    );
}

#[tokio::test]
async fn test_favorite_and_format_cache() {
    let fixture = TestFixture::new().await;

    let created = fixture.create_citation(nature_article()).await;
    let id = created["id"].as_str().unwrap();

    // Toggling favorite leaves the cache alone
    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/citations/{}/favorite", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["isFavorite"], true);
    assert_eq!(body["data"]["formattedCitations"], created["formattedCitations"]);

    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/citations/{}/favorite", id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["isFavorite"], false);

    // Editing a bibliographic field clears it
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/citations/{}", id)))
        .json(&json!({ "year": 2021 }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"].get("formattedCitations").is_none());

    // Export falls back to formatting on the fly
    let resp = fixture
        .client
        .get(fixture.url("/api/citations/export?style=harvard"))
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.text().await.unwrap(),
        "Smith, J., Doe, A., 2021. X. Nature."
    );

    // Explicit regeneration
    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/citations/{}/format", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["data"]["formattedCitations"]["chicago"],
        "Smith, J., Doe, A. \"X\" Nature 5, no. 2 (2021): 10-20."
    );

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/citations/{}/formatted?style=harvard", id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["style"], "harvard");
    assert_eq!(body["data"]["text"], "Smith, J., Doe, A., 2021. X. Nature.");

    let resp = fixture
        .client
        .post(fixture.url("/api/citations/missing/format"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_user_isolation() {
    let fixture = TestFixture::new().await;

    let created = fixture.create_citation(nature_article()).await;
    let id = created["id"].as_str().unwrap();

    let resp = fixture
        .client
        .get(fixture.url("/api/citations"))
        .header("x-user-id", "bob")
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());

    for request in [
        fixture.client.get(fixture.url(&format!("/api/citations/{}", id))),
        fixture
            .client
            .put(fixture.url(&format!("/api/citations/{}", id)))
            .json(&json!({ "title": "stolen" })),
        fixture.client.delete(fixture.url(&format!("/api/citations/{}", id))),
        fixture
            .client
            .post(fixture.url(&format!("/api/citations/{}/favorite", id))),
    ] {
        let resp = request.header("x-user-id", "bob").send().await.unwrap();
        assert_eq!(resp.status(), 404);
    }

    let resp = fixture
        .client
        .get(fixture.url("/api/citations/search?q=nature"))
        .header("x-user-id", "bob")
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["total"], 0);

    // Alice's citation is untouched
    let list = fixture.list("").await;
    assert_eq!(titles(&list), vec!["X"]);
}

#[tokio::test]
async fn test_search_citations() {
    let fixture = TestFixture::new().await;

    fixture.create_citation(nature_article()).await;
    let other = fixture
        .create_citation(json!({
            "type": "book", "title": "Quantum Computation", "authors": ["Nielsen, M."],
            "year": 2000, "publisher": "Cambridge"
        }))
        .await;

    let resp = fixture
        .client
        .get(fixture.url("/api/citations/search?q=quantum"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["results"][0]["citation"]["id"], other["id"]);
    assert!(body["data"]["results"][0]["score"].as_f64().unwrap() > 0.0);

    // Updates are re-indexed, deletes removed
    let id = other["id"].as_str().unwrap();
    fixture
        .client
        .put(fixture.url(&format!("/api/citations/{}", id)))
        .json(&json!({ "title": "Information Theory" }))
        .send()
        .await
        .unwrap();
    let resp = fixture
        .client
        .get(fixture.url("/api/citations/search?q=quantum"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["total"], 0);

    fixture
        .client
        .delete(fixture.url(&format!("/api/citations/{}", id)))
        .send()
        .await
        .unwrap();
    let resp = fixture
        .client
        .get(fixture.url("/api/citations/search?q=information&limit=500"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["total"], 0);
    assert_eq!(body["data"]["limit"], 100);
}

#[tokio::test]
async fn test_search_rejects_deep_offsets() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/citations/search?q=x&offset=1099511627776"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let resp = fixture
        .client
        .get(fixture.url("/api/citations/search?q=x&offset=10000"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // The server is still up
    let resp = fixture.client.get(fixture.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_file_upload_download_delete() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/files?name=My%20Paper.pdf&projectId=p1"))
        .header("content-type", "application/pdf")
        .body("%PDF-1.4 test")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let file = &body["data"];
    let id = file["id"].as_str().unwrap().to_string();
    assert_eq!(file["name"], "My Paper.pdf");
    assert_eq!(file["type"], "application/pdf");
    assert_eq!(file["size"], 13);
    assert_eq!(file["projectId"], "p1");
    let storage_path = file["storagePath"].as_str().unwrap().to_string();
    assert_eq!(storage_path, format!("{}/{}-My_Paper.pdf", TEST_USER, id));
    let url = file["url"].as_str().unwrap().to_string();
    assert_eq!(url, fixture.url(&format!("/storage/{}", storage_path)));

    // Stored objects are public
    let resp = Client::new().get(&url).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "%PDF-1.4 test");

    // Listing and filters
    fixture
        .client
        .post(fixture.url("/api/files?name=data.csv"))
        .header("content-type", "text/csv")
        .body("a,b\n1,2\n")
        .send()
        .await
        .unwrap();
    let resp = fixture
        .client
        .get(fixture.url("/api/files"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["name"], "data.csv");

    let resp = fixture
        .client
        .get(fixture.url("/api/files?type=PDF"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let resp = fixture
        .client
        .get(fixture.url("/api/files?projectId=p1"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"][0]["id"], id.as_str());

    // Other users can't see it
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/files/{}", id)))
        .header("x-user-id", "bob")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // Delete removes record and object
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/files/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/files/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = Client::new().get(&url).send().await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_file_upload_validation() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/files?name=empty.txt"))
        .header("content-type", "text/plain")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = fixture
        .client
        .post(fixture.url("/api/files"))
        .header("content-type", "text/plain")
        .body("hello")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_file_analyze() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/files?name=study.pdf"))
        .header("content-type", "application/pdf")
        .body("%PDF")
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let id = body["data"]["id"].as_str().unwrap();

    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/files/{}/analyze", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"]["response"]
        .as_str()
        .unwrap()
        .contains("PDF document"));
    assert_eq!(body["data"]["research_actions"][1]["type"], "extract_citations");
}

#[tokio::test]
async fn test_chat_rules() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/chat"))
        .json(&json!({
            "message": "Can you help format my bibliography?",
            "conversation_history": [{ "role": "user", "content": "hi" }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["suggestions"][0], "Generate bibliography");
    assert_eq!(body["data"]["research_actions"][0]["type"], "create_citation");

    // messages array form; the last user entry is the prompt
    let resp = fixture
        .client
        .post(fixture.url("/api/chat"))
        .json(&json!({
            "messages": [
                { "role": "user", "content": "organize my notes" },
                { "role": "assistant", "content": "..." },
                { "role": "user", "content": "hello there" }
            ]
        }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"]["response"]
        .as_str()
        .unwrap()
        .starts_with("I'm Aethon"));

    let resp = fixture
        .client
        .post(fixture.url("/api/chat"))
        .json(&json!({ "message": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_outline_and_questions() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/assistant/outline"))
        .json(&json!({ "topic": "Urban heat", "type": "thesis" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["title"], "Thesis: Urban heat");
    assert_eq!(body["data"]["sections"][0]["title"], "Chapter 1: Introduction");

    let resp = fixture
        .client
        .post(fixture.url("/api/assistant/questions"))
        .json(&json!({ "topic": "Urban heat" }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 5);

    let resp = fixture
        .client
        .post(fixture.url("/api/assistant/questions"))
        .json(&json!({ "topic": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}
