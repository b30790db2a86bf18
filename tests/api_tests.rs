use places_api::{
    AppState, create_router,
    config::{AppConfig, Env},
    models::{PlaceResponse, Role, User},
    password::{MockPasswordService, PasswordState},
    repository::{InMemoryRepository, Repository, RepositoryState},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestApp {
    address: String,
    repo: Arc<InMemoryRepository>,
}

async fn spawn_app() -> TestApp {
    let repo = Arc::new(InMemoryRepository::new());
    let mut config = AppConfig::default();
    // Force the Bearer-token path; the x-user-id bypass stays out of these
    // tests so they exercise the same flow production sees.
    config.env = Env::Production;

    let state = AppState::new(
        repo.clone() as RepositoryState,
        Arc::new(MockPasswordService) as PasswordState,
        config,
    );

    // Seed the administrator every scenario logs in as.
    repo.insert_user(User {
        id: Uuid::new_v4(),
        username: "admin".to_string(),
        password: "hashed::admin-pass".to_string(),
        role: Role::Admin,
    })
    .await
    .expect("admin seed failed");

    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address, repo }
}

async fn login(client: &reqwest::Client, app: &TestApp, username: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/users/login", app.address))
        .json(&serde_json::json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("login body");
    body["token"].as_str().expect("token missing").to_string()
}

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("request failed");
    assert!(response.status().is_success());
}

#[tokio::test]
async fn login_rejects_bad_credentials_with_standard_body() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/users/login", app.address))
        .json(&serde_json::json!({ "username": "admin", "password": "wrong" }))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await.expect("error body");
    assert_eq!(body["status"], 401);
    assert_eq!(body["path"], "/users/login");
    assert!(body["timestamp"].is_string());
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn unauthenticated_listing_is_rejected() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/places", app.address))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn place_lifecycle_roundtrip() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = login(&client, &app, "admin", "admin-pass").await;

    // Create.
    let response = client
        .post(format!("{}/places", app.address))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "name": "Central Park", "city": "New York", "state": "NY" }))
        .send()
        .await
        .expect("create failed");
    assert_eq!(response.status(), 201);
    let created: PlaceResponse = response.json().await.expect("create body");
    assert_eq!(created.slug, "central-park");

    // The response omits the id; recover it through the repository handle.
    let id = app.repo.all_places().await.expect("repo read")[0].id;

    // Duplicate triple, case shifted: rejected with the standard error body.
    let response = client
        .post(format!("{}/places", app.address))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "name": "central park", "city": "new york", "state": "ny" }))
        .send()
        .await
        .expect("duplicate create failed");
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("error body");
    assert_eq!(body["status"], 400);
    assert_eq!(
        body["message"],
        "City in this state already included in our database"
    );
    assert_eq!(body["path"], "/places");

    // Read back.
    let response = client
        .get(format!("{}/places/{}", app.address, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("get failed");
    assert_eq!(response.status(), 200);

    // Rename over PATCH: slug recomputed, updated_at moves forward.
    let response = client
        .patch(format!("{}/places/{}", app.address, id))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "name": "Central Park Renamed", "city": "New York", "state": "NY" }))
        .send()
        .await
        .expect("edit failed");
    assert_eq!(response.status(), 200);
    let edited: PlaceResponse = response.json().await.expect("edit body");
    assert_eq!(edited.slug, "central-park-renamed");
    assert!(edited.updated_at >= edited.created_at);

    // Delete, then the record is gone.
    let response = client
        .delete(format!("{}/places/{}", app.address, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("delete failed");
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("delete body");
    assert_eq!(body["message"], "Place deleted successfully");

    let response = client
        .get(format!("{}/places/{}", app.address, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("get after delete failed");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn paging_clamps_like_the_default_window() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = login(&client, &app, "admin", "admin-pass").await;

    for i in 0..7 {
        let response = client
            .post(format!("{}/places", app.address))
            .bearer_auth(&token)
            .json(&serde_json::json!({
                "name": format!("Place {i}"), "city": "City", "state": "ST"
            }))
            .send()
            .await
            .expect("seed create failed");
        assert_eq!(response.status(), 201);
    }

    let clamped: Vec<PlaceResponse> = client
        .get(format!("{}/places/-1/0", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("clamped page failed")
        .json()
        .await
        .expect("clamped body");
    let canonical: Vec<PlaceResponse> = client
        .get(format!("{}/places/0/5", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("canonical page failed")
        .json()
        .await
        .expect("canonical body");

    assert_eq!(clamped.len(), 5);
    let clamped_names: Vec<_> = clamped.iter().map(|p| &p.name).collect();
    let canonical_names: Vec<_> = canonical.iter().map(|p| &p.name).collect();
    assert_eq!(clamped_names, canonical_names);

    // An oversized page size folds back to the default window as well.
    let oversized: Vec<PlaceResponse> = client
        .get(format!("{}/places/0/50", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("oversized page failed")
        .json()
        .await
        .expect("oversized body");
    assert_eq!(oversized.len(), 5);
}

#[tokio::test]
async fn name_lookup_matches_and_misses() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = login(&client, &app, "admin", "admin-pass").await;

    let response = client
        .post(format!("{}/places", app.address))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "name": "Ibirapuera", "city": "São Paulo", "state": "SP" }))
        .send()
        .await
        .expect("create failed");
    assert_eq!(response.status(), 201);

    let matches: Vec<PlaceResponse> = client
        .get(format!("{}/places/name?name=IBIRAPUERA", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("lookup failed")
        .json()
        .await
        .expect("lookup body");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].slug, "ibirapuera");

    let response = client
        .get(format!("{}/places/name?name=Nowhere", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("miss lookup failed");
    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.expect("miss body");
    assert_eq!(body["status"], 404);
    assert_eq!(body["path"], "/places/name");
}

#[tokio::test]
async fn non_admins_can_read_but_not_mutate() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let admin_token = login(&client, &app, "admin", "admin-pass").await;

    // Admin provisions a regular user.
    let response = client
        .post(format!("{}/users", app.address))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({ "username": "reader", "password": "read-pass", "role": "USER" }))
        .send()
        .await
        .expect("user create failed");
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("user create body");
    assert_eq!(body["message"], "User created with success!");

    let reader_token = login(&client, &app, "reader", "read-pass").await;

    // Reading works.
    let response = client
        .get(format!("{}/places", app.address))
        .bearer_auth(&reader_token)
        .send()
        .await
        .expect("list failed");
    assert_eq!(response.status(), 200);

    // Mutating does not.
    let response = client
        .post(format!("{}/places", app.address))
        .bearer_auth(&reader_token)
        .json(&serde_json::json!({ "name": "Sneaky", "city": "Nowhere", "state": "NA" }))
        .send()
        .await
        .expect("forbidden create failed");
    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn user_management_roundtrip() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let admin_token = login(&client, &app, "admin", "admin-pass").await;

    let response = client
        .post(format!("{}/users", app.address))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({ "username": "rotating", "password": "first", "role": "USER" }))
        .send()
        .await
        .expect("user create failed");
    assert_eq!(response.status(), 200);

    // Duplicate username is a 400 conflict.
    let response = client
        .post(format!("{}/users", app.address))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({ "username": "rotating", "password": "x", "role": "USER" }))
        .send()
        .await
        .expect("duplicate user failed");
    assert_eq!(response.status(), 400);

    let user_id = app
        .repo
        .find_user_by_username("rotating")
        .await
        .expect("repo read")
        .expect("user missing")
        .id;

    // Rotate the password, then the old one stops working.
    let response = client
        .put(format!("{}/users/{}", app.address, user_id))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({ "password": "second" }))
        .send()
        .await
        .expect("password update failed");
    assert_eq!(response.status(), 200);

    let response = client
        .post(format!("{}/users/login", app.address))
        .json(&serde_json::json!({ "username": "rotating", "password": "first" }))
        .send()
        .await
        .expect("stale login failed");
    assert_eq!(response.status(), 401);
    login(&client, &app, "rotating", "second").await;

    // Delete, then the account is gone.
    let response = client
        .delete(format!("{}/users/{}", app.address, user_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .expect("user delete failed");
    assert_eq!(response.status(), 200);

    let response = client
        .delete(format!("{}/users/{}", app.address, user_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .expect("second delete failed");
    assert_eq!(response.status(), 404);
}
