//! API integration tests
//!
//! These run against a live server on localhost with a migrated database,
//! using the development JWT secret from config/default.toml. Borrowers 1
//! and 2 are expected to be provisioned in the `borrowers` table (they
//! mirror host-auth identities). Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

use bibliotheca_server::models::user::{perm, UserClaims};

const BASE_URL: &str = "http://localhost:8080/api/v1";
const JWT_SECRET: &str = "change-this-secret-in-production";

/// Mint a token the way the host auth subsystem would
fn token(user_id: i32, permissions: &[&str]) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = UserClaims {
        sub: format!("user-{}", user_id),
        user_id,
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
        exp: now + 3600,
        iat: now,
    };
    claims.create_token(JWT_SECRET).expect("Failed to mint token")
}

fn librarian_token() -> String {
    token(
        1,
        &[
            perm::CAN_MARK_RETURNED,
            perm::ADD_AUTHOR,
            perm::CHANGE_AUTHOR,
            perm::DELETE_AUTHOR,
            perm::ADD_BOOK,
            perm::CHANGE_BOOK,
            perm::DELETE_BOOK,
            perm::ADD_GENRE,
            perm::CHANGE_GENRE,
            perm::DELETE_GENRE,
            perm::ADD_LANGUAGE,
            perm::CHANGE_LANGUAGE,
            perm::DELETE_LANGUAGE,
            perm::ADD_BOOKINSTANCE,
            perm::CHANGE_BOOKINSTANCE,
            perm::DELETE_BOOKINSTANCE,
        ],
    )
}

async fn create_author(client: &Client, token: &str, last_name: &str) -> i64 {
    let response = client
        .post(format!("{}/authors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "first_name": "Test", "last_name": last_name }))
        .send()
        .await
        .expect("Failed to create author");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse author");
    body["id"].as_i64().expect("No author ID")
}

async fn create_book(client: &Client, token: &str, author_id: i64, isbn: &str) -> i64 {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Test Book",
            "summary": "A book created by the integration tests",
            "isbn": isbn,
            "author_id": author_id
        }))
        .send()
        .await
        .expect("Failed to create book");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse book");
    body["id"].as_i64().expect("No book ID")
}

async fn delete_resource(client: &Client, token: &str, path: &str) {
    let _ = client
        .delete(format!("{}{}", BASE_URL, path))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_list_books_is_public_and_paginated() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
    // Books default to two per page
    assert_eq!(body["per_page"], 2);
}

#[tokio::test]
#[ignore]
async fn test_unauthenticated_mutation_is_refused() {
    let client = Client::new();

    let response = client
        .post(format!("{}/genres", BASE_URL))
        .json(&json!({ "name": "Unauthenticated Genre" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_create_book_without_permission_persists_nothing() {
    let client = Client::new();
    // Authenticated but holding no catalog permissions
    let reader = token(2, &[]);
    let librarian = librarian_token();

    let before: Value = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to list books")
        .json()
        .await
        .expect("Failed to parse list");

    let author_id = create_author(&client, &librarian, "Permissionless").await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", reader))
        .json(&json!({
            "title": "Forbidden Book",
            "summary": "Should never be stored",
            "isbn": "9780000000017",
            "author_id": author_id
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);

    let after: Value = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to list books")
        .json()
        .await
        .expect("Failed to parse list");

    assert_eq!(before["total"], after["total"]);

    delete_resource(&client, &librarian, &format!("/authors/{}", author_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_genre_names_are_unique_ignoring_case() {
    let client = Client::new();
    let librarian = librarian_token();

    let response = client
        .post(format!("{}/genres", BASE_URL))
        .header("Authorization", format!("Bearer {}", librarian))
        .json(&json!({ "name": "Integration Poetry" }))
        .send()
        .await
        .expect("Failed to create genre");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse genre");
    let genre_id = body["id"].as_i64().expect("No genre ID");

    let duplicate = client
        .post(format!("{}/genres", BASE_URL))
        .header("Authorization", format!("Bearer {}", librarian))
        .json(&json!({ "name": "iNTEGRATION pOETRY" }))
        .send()
        .await
        .expect("Failed to send duplicate");

    assert_eq!(duplicate.status(), 409);
    let body: Value = duplicate.json().await.expect("Failed to parse error");
    assert_eq!(
        body["message"],
        "Genre already exists (case insensitive match)"
    );

    delete_resource(&client, &librarian, &format!("/genres/{}", genre_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_author_delete_restricted_while_books_remain() {
    let client = Client::new();
    let librarian = librarian_token();

    let author_id = create_author(&client, &librarian, "Restricted").await;
    let book_id = create_book(&client, &librarian, author_id, "9780000000024").await;

    // Refused while the book exists
    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .header("Authorization", format!("Bearer {}", librarian))
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(response.status(), 409);

    // Author and book are both still there
    let author: Value = client
        .get(format!("{}/authors/{}", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to fetch author")
        .json()
        .await
        .expect("Failed to parse author");
    assert_eq!(author["books"].as_array().map(|b| b.len()), Some(1));

    // Once the book is gone the delete goes through
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", librarian))
        .send()
        .await
        .expect("Failed to delete book");
    assert_eq!(response.status(), 204);

    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .header("Authorization", format!("Bearer {}", librarian))
        .send()
        .await
        .expect("Failed to delete author");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_language_delete_clears_book_reference() {
    let client = Client::new();
    let librarian = librarian_token();

    let response = client
        .post(format!("{}/languages", BASE_URL))
        .header("Authorization", format!("Bearer {}", librarian))
        .json(&json!({ "name": "Integration Esperanto" }))
        .send()
        .await
        .expect("Failed to create language");
    assert_eq!(response.status(), 201);
    let language: Value = response.json().await.expect("Failed to parse language");
    let language_id = language["id"].as_i64().expect("No language ID");

    let author_id = create_author(&client, &librarian, "Polyglot").await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", librarian))
        .json(&json!({
            "title": "Translated Book",
            "summary": "Loses its language when the language goes",
            "isbn": "9780000000031",
            "author_id": author_id,
            "language_id": language_id
        }))
        .send()
        .await
        .expect("Failed to create book");
    assert_eq!(response.status(), 201);
    let book: Value = response.json().await.expect("Failed to parse book");
    let book_id = book["id"].as_i64().expect("No book ID");

    let response = client
        .delete(format!("{}/languages/{}", BASE_URL, language_id))
        .header("Authorization", format!("Bearer {}", librarian))
        .send()
        .await
        .expect("Failed to delete language");
    assert_eq!(response.status(), 204);

    // Book survives with its language cleared
    let book: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to fetch book")
        .json()
        .await
        .expect("Failed to parse book");
    assert!(book["language"].is_null());

    delete_resource(&client, &librarian, &format!("/books/{}", book_id)).await;
    delete_resource(&client, &librarian, &format!("/authors/{}", author_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_renewal_window_boundaries() {
    let client = Client::new();
    let librarian = librarian_token();
    let today = chrono::Utc::now().date_naive();

    let author_id = create_author(&client, &librarian, "Renewable").await;
    let book_id = create_book(&client, &librarian, author_id, "9780000000048").await;

    let response = client
        .post(format!("{}/instances", BASE_URL))
        .header("Authorization", format!("Bearer {}", librarian))
        .json(&json!({
            "book_id": book_id,
            "imprint": "Integration Press, 2024",
            "status": "on_loan"
        }))
        .send()
        .await
        .expect("Failed to create instance");
    assert_eq!(response.status(), 201);
    let instance: Value = response.json().await.expect("Failed to parse instance");
    let instance_id = instance["id"].as_str().expect("No instance ID").to_string();

    // The form proposes three weeks out
    let form: Value = client
        .get(format!("{}/instances/{}/renew", BASE_URL, instance_id))
        .header("Authorization", format!("Bearer {}", librarian))
        .send()
        .await
        .expect("Failed to fetch renewal form")
        .json()
        .await
        .expect("Failed to parse form");
    assert_eq!(
        form["proposed_renewal_date"],
        (today + chrono::Duration::weeks(3)).to_string()
    );

    // Yesterday is refused
    let response = client
        .post(format!("{}/instances/{}/renew", BASE_URL, instance_id))
        .header("Authorization", format!("Bearer {}", librarian))
        .json(&json!({ "renewal_date": (today - chrono::Duration::days(1)).to_string() }))
        .send()
        .await
        .expect("Failed to send renewal");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse error");
    assert_eq!(body["message"], "Invalid date - renewal in past");

    // Twenty-nine days out is refused
    let response = client
        .post(format!("{}/instances/{}/renew", BASE_URL, instance_id))
        .header("Authorization", format!("Bearer {}", librarian))
        .json(&json!({ "renewal_date": (today + chrono::Duration::days(29)).to_string() }))
        .send()
        .await
        .expect("Failed to send renewal");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse error");
    assert_eq!(body["message"], "Invalid date - renewal more than 4 weeks ahead");

    // The four-week boundary itself is accepted
    let boundary = today + chrono::Duration::days(28);
    let response = client
        .post(format!("{}/instances/{}/renew", BASE_URL, instance_id))
        .header("Authorization", format!("Bearer {}", librarian))
        .json(&json!({ "renewal_date": boundary.to_string() }))
        .send()
        .await
        .expect("Failed to send renewal");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse renewal");
    assert_eq!(body["due_back"], boundary.to_string());

    // Renewal without the librarian permission is refused
    let response = client
        .post(format!("{}/instances/{}/renew", BASE_URL, instance_id))
        .header("Authorization", format!("Bearer {}", token(2, &[])))
        .json(&json!({ "renewal_date": today.to_string() }))
        .send()
        .await
        .expect("Failed to send renewal");
    assert_eq!(response.status(), 403);

    delete_resource(&client, &librarian, &format!("/instances/{}", instance_id)).await;
    delete_resource(&client, &librarian, &format!("/books/{}", book_id)).await;
    delete_resource(&client, &librarian, &format!("/authors/{}", author_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_loan_listings_visibility() {
    let client = Client::new();
    let librarian = librarian_token();
    // Borrowers 1 and 2 are provisioned rows mirroring host-auth identities
    let borrower_u = token(1, &[]);
    let borrower_v = token(2, &[]);

    let author_id = create_author(&client, &librarian, "Lender").await;
    let book_id = create_book(&client, &librarian, author_id, "9780000000055").await;

    let response = client
        .post(format!("{}/instances", BASE_URL))
        .header("Authorization", format!("Bearer {}", librarian))
        .json(&json!({
            "book_id": book_id,
            "imprint": "Integration Press, 2024",
            "due_back": "2024-01-01",
            "status": "on_loan",
            "borrower_id": 1
        }))
        .send()
        .await
        .expect("Failed to create instance");
    assert_eq!(response.status(), 201);
    let instance: Value = response.json().await.expect("Failed to parse instance");
    let instance_id = instance["id"].as_str().expect("No instance ID").to_string();

    // The borrower sees their loan
    let mine: Value = client
        .get(format!("{}/loans/my", BASE_URL))
        .header("Authorization", format!("Bearer {}", borrower_u))
        .send()
        .await
        .expect("Failed to fetch loans")
        .json()
        .await
        .expect("Failed to parse loans");
    assert!(mine
        .as_array()
        .expect("Expected array")
        .iter()
        .any(|i| i["id"] == instance_id.as_str()));

    // A different borrower does not
    let theirs: Value = client
        .get(format!("{}/loans/my", BASE_URL))
        .header("Authorization", format!("Bearer {}", borrower_v))
        .send()
        .await
        .expect("Failed to fetch loans")
        .json()
        .await
        .expect("Failed to parse loans");
    assert!(!theirs
        .as_array()
        .expect("Expected array")
        .iter()
        .any(|i| i["id"] == instance_id.as_str()));

    // The librarian sees it in the global listing, overdue flag included
    let all: Value = client
        .get(format!("{}/loans?per_page=100", BASE_URL))
        .header("Authorization", format!("Bearer {}", librarian))
        .send()
        .await
        .expect("Failed to fetch loans")
        .json()
        .await
        .expect("Failed to parse loans");
    let entry = all["items"]
        .as_array()
        .expect("Expected items")
        .iter()
        .find(|i| i["id"] == instance_id.as_str())
        .expect("Loan missing from global listing")
        .clone();
    assert_eq!(entry["is_overdue"], true);

    // The global listing itself is permission-gated
    let response = client
        .get(format!("{}/loans", BASE_URL))
        .header("Authorization", format!("Bearer {}", borrower_u))
        .send()
        .await
        .expect("Failed to fetch loans");
    assert_eq!(response.status(), 403);

    delete_resource(&client, &librarian, &format!("/instances/{}", instance_id)).await;
    delete_resource(&client, &librarian, &format!("/books/{}", book_id)).await;
    delete_resource(&client, &librarian, &format!("/authors/{}", author_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_stats_counts_and_visits() {
    let client = Client::new();

    let first: Value = client
        .get(format!("{}/stats", BASE_URL))
        .send()
        .await
        .expect("Failed to fetch stats")
        .json()
        .await
        .expect("Failed to parse stats");

    assert!(first["num_books"].is_number());
    assert!(first["num_instances"].is_number());
    assert!(first["num_instances_available"].is_number());
    assert!(first["num_authors"].is_number());

    let second: Value = client
        .get(format!("{}/stats", BASE_URL))
        .send()
        .await
        .expect("Failed to fetch stats")
        .json()
        .await
        .expect("Failed to parse stats");

    assert_eq!(
        second["num_visits"].as_i64().unwrap(),
        first["num_visits"].as_i64().unwrap() + 1
    );
}
