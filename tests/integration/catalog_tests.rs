//! End-to-end catalog tests against a running server

use reqwest::{redirect::Policy, Client, StatusCode};

const BASE_URL: &str = "http://localhost:3000/catalog";

/// Client that reports redirects instead of following them
fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("No Location header")
        .to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_index() {
    let response = client()
        .get(BASE_URL)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Local Library Home"));
}

#[tokio::test]
#[ignore]
async fn test_author_lifecycle() {
    let client = client();

    let response = client
        .post(format!("{}/author/create", BASE_URL))
        .form(&[
            ("first_name", "Ursula"),
            ("family_name", "LeGuin"),
            ("date_of_birth", "1929-10-21"),
            ("date_of_death", ""),
        ])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let author_url = location(&response);
    assert!(author_url.starts_with("/catalog/author/"));

    let detail = client
        .get(format!("http://localhost:3000{}", author_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(detail.status(), StatusCode::OK);
    let body = detail.text().await.expect("Failed to read body");
    assert!(body.contains("LeGuin, Ursula"));
    assert!(body.contains("Oct 21, 1929"));

    let id = author_url.trim_start_matches("/catalog/author/");
    let response = client
        .post(format!("http://localhost:3000{}/delete", author_url))
        .form(&[("authorid", id)])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/authors");
}

#[tokio::test]
#[ignore]
async fn test_genre_duplicate_redirects_to_existing() {
    let client = client();
    let name = format!("Genre{}", std::process::id());

    let first = client
        .post(format!("{}/genre/create", BASE_URL))
        .form(&[("name", name.as_str())])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), StatusCode::SEE_OTHER);

    let second = client
        .post(format!("{}/genre/create", BASE_URL))
        .form(&[("name", name.to_lowercase().as_str())])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&first), location(&second));
}

#[tokio::test]
#[ignore]
async fn test_invalid_book_rerenders_form() {
    let response = client()
        .post(format!("{}/book/create", BASE_URL))
        .form(&[("title", ""), ("author", ""), ("summary", ""), ("isbn", "")])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Title must not be empty."));
}

#[tokio::test]
#[ignore]
async fn test_unknown_book_is_not_found() {
    let response = client()
        .get(format!("{}/book/00000000-0000-0000-0000-000000000000", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
