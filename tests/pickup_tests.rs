// tests/pickup_tests.rs

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use common::spawn_test_app;
use tower::ServiceExt;

#[tokio::test]
async fn borrower_sees_pickup_instructions() {
    let app = spawn_test_app().await;
    let owner = app.register("Ravi", "10", "B").await;
    let alice = app.register("Alice", "9", "A").await;
    let dev = app.register("Dev", "9", "C").await;
    let book_id = app.add_book(&owner, "Matilda", "Roald Dahl").await;
    let uri = format!("/api/books/{book_id}/qr");

    // Not yet borrowed: nobody gets the code
    let (status, _) = app.call("GET", &uri, Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.call("POST", &format!("/api/books/{book_id}/borrow"), Some(&alice.token), None)
        .await;

    let (status, body) = app.call("GET", &uri, Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["instructions"],
        "Book: Matilda\nOwner: Ravi\nClass: 10-B\nShow this to collect the book during lunch break!"
    );
    assert!(body["qr_svg"].as_str().unwrap().contains("<svg"));

    for other in [&dev, &owner] {
        let (status, body) = app.call("GET", &uri, Some(&other.token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body["error"],
            "You are not allowed to view the QR code for this book."
        );
    }
}

#[tokio::test]
async fn borrower_can_download_the_code() {
    let app = spawn_test_app().await;
    let owner = app.register("Ravi", "10", "B").await;
    let alice = app.register("Alice", "9", "A").await;
    let book_id = app.add_book(&owner, "The Hobbit", "J. R. R. Tolkien").await;

    app.call("POST", &format!("/api/books/{book_id}/borrow"), Some(&alice.token), None)
        .await;

    let request = Request::builder()
        .uri(format!("/api/books/{book_id}/qr/download"))
        .header(header::AUTHORIZATION, format!("Bearer {}", alice.token))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"The_Hobbit_QR.svg\""
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("<svg"));
}
