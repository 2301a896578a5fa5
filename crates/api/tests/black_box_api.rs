use chrono::{Months, NaiveDate, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};

use staffhub_api::app::{build_app, AppServices};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory storage, ephemeral port.
        let app = build_app(AppServices::in_memory());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn employees_url(&self) -> String {
        format!("{}/api/employees", self.base_url)
    }

    fn employee_url(&self, id: &str) -> String {
        format!("{}/api/employees/{}", self.base_url, id)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn years_ago(years: u32) -> NaiveDate {
    Utc::now()
        .date_naive()
        .checked_sub_months(Months::new(years * 12))
        .unwrap()
}

fn john_doe() -> Value {
    json!({
        "first_name": "John",
        "last_name": "Doe",
        "email": "john.doe@test.com",
        "doc_number": "12345678900",
        "date_of_birth": years_ago(25).to_string(),
        "password": "password123",
        "phones": [{ "number": "11987654321", "type": "Mobile" }]
    })
}

async fn create(client: &reqwest::Client, srv: &TestServer, body: &Value) -> reqwest::Response {
    client
        .post(srv.employees_url())
        .json(body)
        .send()
        .await
        .unwrap()
}

async fn create_ok(client: &reqwest::Client, srv: &TestServer, body: &Value) -> String {
    let res = create(client, srv, body).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    created["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_returns_created_with_location_and_no_secrets() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = create(&client, &srv, &john_doe()).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let location = res
        .headers()
        .get(reqwest::header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
        .to_string();
    let body: Value = res.json().await.unwrap();
    let id = body["id"].as_str().unwrap();

    assert_eq!(location, format!("/api/employees/{id}"));
    assert_eq!(body["first_name"], "John");
    assert_eq!(body["doc_number"], "12345678900");
    assert_eq!(body["role"], "employee");
    assert_eq!(body["phones"][0]["number"], "11987654321");
    assert_eq!(body["phones"][0]["type"], "Mobile");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    let fetched: Value = client
        .get(srv.employee_url(id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn duplicate_document_number_and_email_conflict() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create_ok(&client, &srv, &john_doe()).await;

    let mut same_doc = john_doe();
    same_doc["email"] = json!("other@test.com");
    let res = create(&client, &srv, &same_doc).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "conflict");
    assert_eq!(
        body["message"],
        "Employee with document number '12345678900' already exists."
    );

    let mut same_email = john_doe();
    same_email["doc_number"] = json!("99999999999");
    let res = create(&client, &srv, &same_email).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Employee with email 'john.doe@test.com' already exists."
    );
}

#[tokio::test]
async fn under_age_employee_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut minor = john_doe();
    minor["date_of_birth"] = json!(years_ago(17).to_string());
    let res = create(&client, &srv, &minor).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["message"], "Employee must be at least 18 years old.");
}

#[tokio::test]
async fn under_age_is_reported_ahead_of_a_blank_phone() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut minor = john_doe();
    minor["date_of_birth"] = json!(years_ago(17).to_string());
    minor["phones"] = json!([{ "number": " ", "type": "Mobile" }]);
    let res = create(&client, &srv, &minor).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Employee must be at least 18 years old.");
}

#[tokio::test]
async fn boundary_validation_reports_fields() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut bad = john_doe();
    bad["email"] = json!("not-an-email");
    bad["password"] = json!("short");
    bad["phones"] = json!([{ "number": "", "type": "Mobile" }]);
    let res = create(&client, &srv, &bad).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    let fields = body["fields"].as_object().unwrap();
    assert!(fields.contains_key("email"));
    assert!(fields.contains_key("password"));
    assert!(fields.keys().any(|k| k.starts_with("phones")));
}

#[tokio::test]
async fn malformed_body_and_id_are_bad_requests() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.employees_url())
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_body");

    let res = client.get(srv.employee_url("not-a-uuid")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn unknown_employee_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let id = "0190f3a2-7c4e-7a00-8000-000000000000";

    let res = client.get(srv.employee_url(id)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], format!("Employee with ID '{id}' not found."));

    let res = client.delete(srv.employee_url(id)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_replaces_details_and_phones() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let id = create_ok(&client, &srv, &john_doe()).await;

    let res = client
        .put(srv.employee_url(&id))
        .json(&json!({
            "first_name": "Johnny",
            "last_name": "Doe",
            "email": "johnny@test.com",
            "manager_name": "Alice",
            "phones": [
                { "number": "1111", "type": "Home" },
                { "number": "2222", "type": "Work" }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let fetched: Value = client
        .get(srv.employee_url(&id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["first_name"], "Johnny");
    assert_eq!(fetched["email"], "johnny@test.com");
    assert_eq!(fetched["manager_name"], "Alice");
    assert_eq!(fetched["doc_number"], "12345678900");
    let numbers: Vec<&str> = fetched["phones"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["number"].as_str().unwrap())
        .collect();
    assert_eq!(numbers, vec!["1111", "2222"]);
}

#[tokio::test]
async fn update_to_someone_elses_email_conflicts() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let john = create_ok(&client, &srv, &john_doe()).await;

    let mut jane = john_doe();
    jane["first_name"] = json!("Jane");
    jane["email"] = json!("jane@test.com");
    jane["doc_number"] = json!("11122233344");
    create_ok(&client, &srv, &jane).await;

    let res = client
        .put(srv.employee_url(&john))
        .json(&json!({
            "first_name": "John",
            "last_name": "Doe",
            "email": "jane@test.com"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Email 'jane@test.com' is already in use by another employee."
    );
}

#[tokio::test]
async fn delete_hides_employee_from_reads() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let id = create_ok(&client, &srv, &john_doe()).await;

    let mut jane = john_doe();
    jane["email"] = json!("jane@test.com");
    jane["doc_number"] = json!("11122233344");
    create_ok(&client, &srv, &jane).await;

    let res = client.delete(srv.employee_url(&id)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(srv.employee_url(&id)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let list: Value = client
        .get(srv.employees_url())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let items = list["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["email"], "jane@test.com");

    // The record is kept, so its document number stays taken.
    let res = create(&client, &srv, &john_doe()).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client.delete(srv.employee_url(&id)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
