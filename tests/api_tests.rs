// tests/api_tests.rs

use quiz_api::{
    config::Config,
    routes,
    state::AppState,
    store::{Database, seed},
    utils::hash::{PasswordScheme, SchemeKind},
};
use serde_json::{Value, json};

/// Spawns the app on a random port with freshly seeded data.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    spawn_app_with(Database::new(), SchemeKind::Argon2).await
}

async fn spawn_app_with(database: Database, password_scheme: SchemeKind) -> String {
    let config = Config {
        port: 0,
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        password_scheme,
        rust_log: "error".to_string(),
        snapshot_path: None,
    };

    let state = AppState::new(config, database);
    let demo_hash = state
        .passwords
        .hash(seed::DEMO_PASSWORD)
        .expect("Failed to hash demo password");
    seed::ensure_defaults(&mut state.db.write(), &demo_hash);

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// A store as an old deployment would have left it: plaintext password.
fn legacy_snapshot() -> Database {
    Database::recover(json!({
        "teachers": {
            "legacy@x.com": { "name": "Legacy", "password": "123456" }
        },
        "schools": {},
        "results": []
    }))
}

async fn login_status(client: &reqwest::Client, address: &str, password: &str) -> u16 {
    client
        .post(format!("{}/api/login", address))
        .json(&json!({ "email": "legacy@x.com", "password": password }))
        .send()
        .await
        .unwrap()
        .status()
        .as_u16()
}

fn unique_email() -> String {
    format!("t_{}@x.com", &uuid::Uuid::new_v4().to_string()[..8])
}

/// Registers a teacher and returns the parsed response body.
async fn register(client: &reqwest::Client, address: &str, name: &str, email: &str) -> Value {
    let response = client
        .post(format!("{}/api/register", address))
        .json(&json!({
            "name": name,
            "email": email,
            "password": "secret1",
            "school": format!("{} school", name),
            "stage": "primary"
        }))
        .send()
        .await
        .expect("Register failed");

    assert_eq!(response.status().as_u16(), 201);
    response.json().await.expect("Failed to parse register json")
}

#[tokio::test]
async fn health_check_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_login_and_list_own_school() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let email = unique_email();

    // 1. Register
    let response = client
        .post(format!("{}/api/register", address))
        .json(&json!({
            "name": "T1",
            "email": email,
            "password": "secret1",
            "school": "S1",
            "stage": "primary"
        }))
        .send()
        .await
        .expect("Register failed");
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["email"], email.as_str());
    assert_eq!(body["school"]["name"], "S1");
    assert!(body["user"].get("password").is_none());

    // 2. Login
    let login: Value = client
        .post(format!("{}/api/login", address))
        .json(&json!({ "email": email, "password": "secret1" }))
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .expect("Failed to parse login json");

    let token = login["token"].as_str().expect("Token not found");
    assert_eq!(login["user"]["name"], "T1");

    // 3. Owned schools
    let response = client
        .get(format!("{}/api/schools", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let schools: Vec<Value> = response.json().await.unwrap();
    assert_eq!(schools.len(), 1);
    assert_eq!(schools[0]["name"], "S1");
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let email = unique_email();

    register(&client, &address, "First", &email).await;

    let response = client
        .post(format!("{}/api/register", address))
        .json(&json!({
            "name": "Second",
            "email": email,
            "password": "other-password",
            "school": "Other",
            "stage": "secondary"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    // The original account still logs in with the original password.
    let login: Value = client
        .post(format!("{}/api/login", address))
        .json(&json!({ "email": email, "password": "secret1" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(login["user"]["name"], "First");
}

#[tokio::test]
async fn register_requires_every_field() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/register", address))
        .json(&json!({ "email": unique_email(), "password": "secret1" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn login_rejects_unknown_email_and_wrong_password() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/login", address))
        .json(&json!({ "email": unique_email(), "password": "secret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let response = client
        .post(format!("{}/api/login", address))
        .json(&json!({ "email": seed::DEMO_EMAIL, "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn protected_routes_check_the_token() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let missing = client
        .get(format!("{}/api/schools", address))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 401);

    let invalid = client
        .get(format!("{}/api/schools", address))
        .header("Authorization", "Bearer not-a-real-token")
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status().as_u16(), 403);
}

#[tokio::test]
async fn change_password_flow() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let email = unique_email();

    let registered = register(&client, &address, "Changer", &email).await;
    let token = registered["token"].as_str().unwrap().to_string();
    let url = format!("{}/api/change-password", address);

    // Wrong current password
    let response = client
        .post(&url)
        .bearer_auth(&token)
        .json(&json!({ "currentPassword": "nope", "newPassword": "brand-new" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    // Too short
    let response = client
        .post(&url)
        .bearer_auth(&token)
        .json(&json!({ "currentPassword": "secret1", "newPassword": "abc" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    // Success
    let response = client
        .post(&url)
        .bearer_auth(&token)
        .json(&json!({ "currentPassword": "secret1", "newPassword": "brand-new" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let old = client
        .post(format!("{}/api/login", address))
        .json(&json!({ "email": email, "password": "secret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(old.status().as_u16(), 401);

    let new = client
        .post(format!("{}/api/login", address))
        .json(&json!({ "email": email, "password": "brand-new" }))
        .send()
        .await
        .unwrap();
    assert_eq!(new.status().as_u16(), 200);
}

#[tokio::test]
async fn create_and_update_test_in_own_school() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let registered = register(&client, &address, "Author", &unique_email()).await;
    let token = registered["token"].as_str().unwrap();
    let school_id = registered["school"]["id"].as_str().unwrap();

    // Create
    let response = client
        .post(format!("{}/api/schools/{}/tests", address, school_id))
        .bearer_auth(token)
        .json(&json!({
            "name": "Fractions",
            "subject": "Math",
            "grade": "5",
            "timerPerQuestion": 45,
            "difficulty": "hard",
            "description": "Halves and quarters",
            "questions": [
                { "question": "1/2 + 1/4?", "options": ["3/4", "2/6"], "correct": 0 }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let created: Value = response.json().await.unwrap();
    let test_id = created["test"]["id"].as_str().unwrap().to_string();
    assert!(test_id.starts_with("test_"));

    // Visible through the public lookup
    let tests: Vec<Value> = client
        .get(format!("{}/api/tests/{}", address, school_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tests.len(), 1);
    assert_eq!(tests[0]["id"], test_id.as_str());

    // Update only the name
    let response = client
        .put(format!("{}/api/schools/{}/tests/{}", address, school_id, test_id))
        .bearer_auth(token)
        .json(&json!({ "name": "Fractions II" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let updated: Value = response.json().await.unwrap();
    let test = &updated["test"];
    assert_eq!(test["name"], "Fractions II");
    assert_eq!(test["subject"], "Math");
    assert_eq!(test["timerPerQuestion"], 45);
    assert_eq!(test["questions"].as_array().unwrap().len(), 1);
    assert_eq!(test["createdAt"], created["test"]["createdAt"]);
    assert!(test["updatedAt"].is_string());

    // Unknown test id
    let response = client
        .put(format!("{}/api/schools/{}/tests/test_0", address, school_id))
        .bearer_auth(token)
        .json(&json!({ "name": "Ghost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn tests_of_other_teachers_schools_are_off_limits() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let registered = register(&client, &address, "Outsider", &unique_email()).await;
    let token = registered["token"].as_str().unwrap();

    let response = client
        .post(format!(
            "{}/api/schools/{}/tests",
            address,
            seed::DEFAULT_SCHOOL_ID
        ))
        .bearer_auth(token)
        .json(&json!({ "name": "Intrusion" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    let response = client
        .post(format!("{}/api/schools/school_missing/tests", address))
        .bearer_auth(token)
        .json(&json!({ "name": "Nowhere" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let response = client
        .get(format!("{}/api/tests/school_missing", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn same_display_name_does_not_share_schools() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let a = register(&client, &address, "Sam", &unique_email()).await;
    let b = register(&client, &address, "Sam", &unique_email()).await;

    for (me, other) in [(&a, &b), (&b, &a)] {
        let schools: Vec<Value> = client
            .get(format!("{}/api/schools", address))
            .bearer_auth(me["token"].as_str().unwrap())
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(schools.len(), 1);
        assert_eq!(schools[0]["id"], me["school"]["id"]);
        assert_ne!(schools[0]["id"], other["school"]["id"]);
    }
}

#[tokio::test]
async fn results_are_listed_and_deleted_by_their_owner() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let owner = register(&client, &address, "Owner", &unique_email()).await;
    let stranger = register(&client, &address, "Stranger", &unique_email()).await;
    let owner_token = owner["token"].as_str().unwrap();
    let stranger_token = stranger["token"].as_str().unwrap();

    // A student submits without logging in.
    let response = client
        .post(format!("{}/api/results", address))
        .json(&json!({
            "score": 8,
            "student": "s-42",
            "teacher": "Owner",
            "schoolId": owner["school"]["id"],
            "id": 1
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let stored: Value = response.json().await.unwrap();
    let result_id = stored["result"]["id"].as_i64().unwrap();
    assert_ne!(result_id, 1);
    assert_eq!(stored["result"]["score"], 8);
    assert!(stored["result"]["timestamp"].is_string());

    let mine: Vec<Value> = client
        .get(format!("{}/api/results", address))
        .bearer_auth(owner_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["student"], "s-42");

    let theirs: Vec<Value> = client
        .get(format!("{}/api/results", address))
        .bearer_auth(stranger_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(theirs.is_empty());

    let response = client
        .delete(format!("{}/api/results/{}", address, result_id))
        .bearer_auth(stranger_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let response = client
        .delete(format!("{}/api/results/{}", address, result_id))
        .bearer_auth(owner_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let mine: Vec<Value> = client
        .get(format!("{}/api/results", address))
        .bearer_auth(owner_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(mine.is_empty());
}

#[tokio::test]
async fn submit_result_rejects_non_objects() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/results", address))
        .json(&json!([1, 2, 3]))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn reset_data_restores_defaults() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    register(&client, &address, "Temporary", &unique_email()).await;

    let response = client
        .post(format!("{}/api/reset-data", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["stats"]["teachers"], 1);
    assert_eq!(body["stats"]["schools"], 1);
    assert_eq!(body["stats"]["tests"], 1);

    let debug: Value = client
        .get(format!("{}/api/debug/data", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(debug["teachers"], json!([seed::DEMO_EMAIL]));
    assert_eq!(debug["stats"]["results_count"], 0);

    let login = client
        .post(format!("{}/api/login", address))
        .json(&json!({ "email": seed::DEMO_EMAIL, "password": seed::DEMO_PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(login.status().as_u16(), 200);
}

#[tokio::test]
async fn public_listings_and_statistics() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let schools: Vec<Value> = client
        .get(format!("{}/api/schools/public", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(schools.len(), 1);
    assert_eq!(schools[0]["id"], seed::DEFAULT_SCHOOL_ID);
    assert_eq!(schools[0]["testsCount"], 1);
    assert!(schools[0].get("tests").is_none());
    assert!(schools[0].get("owner").is_none());

    let alias: Vec<Value> = client
        .get(format!("{}/api/all-schools", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(alias.len(), 1);

    let teachers: Vec<Value> = client
        .get(format!("{}/api/teachers", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(teachers.len(), 1);
    assert!(teachers[0].get("password").is_none());

    let stats: Value = client
        .get(format!("{}/api/statistics", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        stats,
        json!({
            "totalSchools": 1,
            "totalTeachers": 1,
            "totalTests": 1,
            "totalResults": 0,
            "activeTests": 1
        })
    );

    let index = client.get(format!("{}/", address)).send().await.unwrap();
    assert_eq!(index.status().as_u16(), 200);
}

#[tokio::test]
async fn legacy_plaintext_secret_is_rejected_under_argon2() {
    let address = spawn_app_with(legacy_snapshot(), SchemeKind::Argon2).await;
    let client = reqwest::Client::new();

    assert_eq!(login_status(&client, &address, "123456").await, 401);
    assert_eq!(login_status(&client, &address, "wrong").await, 401);
}

#[tokio::test]
async fn legacy_plaintext_secret_logs_in_under_plaintext_scheme() {
    let address = spawn_app_with(legacy_snapshot(), SchemeKind::Plaintext).await;
    let client = reqwest::Client::new();

    assert_eq!(login_status(&client, &address, "123456").await, 200);
    assert_eq!(login_status(&client, &address, "wrong").await, 401);
}

#[tokio::test]
async fn index_lists_every_route() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(format!("{}/", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let endpoints = body["endpoints"].as_object().expect("endpoints map");
    for key in [
        "teachers",
        "status",
        "all_schools",
        "create_test",
        "update_test",
        "delete_result",
    ] {
        assert!(endpoints.contains_key(key), "index is missing {}", key);
    }
    assert_eq!(endpoints["all_schools"], "GET /api/all-schools");
}
