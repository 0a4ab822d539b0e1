mod helpers;

use casaflow_backend::config::{AppConfig, UploadConfig};
use casaflow_backend::http;
use casaflow_backend::models::*;
use casaflow_backend::notifier::MemoryMailer;
use casaflow_backend::repositories::{NewOffer, NewReview};
use casaflow_backend::AppState;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use helpers::*;
use serde_json::Value;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use tower::ServiceExt;

fn form_request(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");

    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

fn multipart_request(uri: &str, fields: &[(&str, &str)], cookie: Option<&str>) -> Request<Body> {
    let boundary = "test-boundary";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            boundary, name, value
        ));
    }
    body.push_str(&format!("--{}--\r\n", boundary));

    let mut builder = Request::builder().method("POST").uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={}", boundary),
    );

    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    builder.body(Body::from(body)).unwrap()
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body should be JSON")
}

// ============================================================================
// Health and Authentication
// ============================================================================

#[sqlx::test]
async fn test_healthz(pool: SqlitePool) {
    let (state, _mailer) = test_app_state(pool);
    let app = http::router(state);

    let response = app.oneshot(get_request("/healthz", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test]
async fn test_register_login_logout(pool: SqlitePool) {
    let (state, _mailer) = test_app_state(pool);
    let app: Router = http::router(state);

    // Register
    let response = app
        .clone()
        .oneshot(form_request(
            "/auth/register",
            "username=olivia&email=olivia%40example.com&password=password123&role=owner",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Registering the same username again is rejected
    let response = app
        .clone()
        .oneshot(form_request(
            "/auth/register",
            "username=olivia&email=other%40example.com&password=password123&role=owner",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Login issues a session cookie
    let response = app
        .clone()
        .oneshot(form_request(
            "/auth/login",
            "username=olivia&password=password123",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Login should set a cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("casaflow_session="));

    let cookie = set_cookie.split(';').next().unwrap().to_string();

    // The session resolves to the account
    let response = app
        .clone()
        .oneshot(get_request("/auth/account", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["username"], "olivia");
    assert!(body.get("password_hash").is_none());

    // Logout clears the cookie and drops the session
    let response = app
        .clone()
        .oneshot(form_request("/auth/logout", "", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .oneshot(get_request("/auth/account", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
async fn test_login_wrong_password(pool: SqlitePool) {
    let db = TestDatabase::from_pool(pool.clone()).await;
    create_test_user(&db, "olivia", UserRole::Owner).await;

    let (state, _mailer) = test_app_state(pool);
    let app = http::router(state);

    let response = app
        .oneshot(form_request(
            "/auth/login",
            "username=olivia&password=wrong",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
async fn test_login_sweeps_expired_sessions(pool: SqlitePool) {
    let db = TestDatabase::from_pool(pool.clone()).await;
    create_test_user(&db, "olivia", UserRole::Owner).await;
    let other = create_test_user(&db, "oscar", UserRole::Owner).await;

    // A long-expired session left behind by another account
    db.session_repo
        .create(other.id, "stale", Utc::now().naive_utc() - Duration::hours(1))
        .await
        .expect("Failed to create session");

    let (state, _mailer) = test_app_state(pool.clone());
    let app = http::router(state);

    let response = app
        .oneshot(form_request(
            "/auth/login",
            "username=olivia&password=password123",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let row = sqlx::query("SELECT COUNT(*) AS n FROM sessions WHERE token = 'stale'")
        .fetch_one(&pool)
        .await
        .unwrap();
    let n: i64 = row.get("n");
    assert_eq!(n, 0, "Expired sessions should be swept on login");
}

// ============================================================================
// Property Authorization
// ============================================================================

#[sqlx::test]
async fn test_property_create_requires_login(pool: SqlitePool) {
    let (state, _mailer) = test_app_state(pool);
    let app = http::router(state);

    let response = app
        .oneshot(multipart_request(
            "/properties",
            &[("street", "Elm Street")],
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
async fn test_property_create_and_feed(pool: SqlitePool) {
    let db = TestDatabase::from_pool(pool.clone()).await;
    let owner = create_test_user(&db, "olivia", UserRole::Owner).await;
    let cookie = login_session(&db, &owner).await;

    let (state, _mailer) = test_app_state(pool);
    let app = http::router(state);

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/properties",
            &[
                ("street", "Elm Street"),
                ("street_number", "14"),
                ("listing_kind", "rent"),
                ("rent_price", "900"),
            ],
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .oneshot(get_request("/", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let listings = body.as_array().expect("Feed should be an array");
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["street"], "Elm Street");
    assert_eq!(listings[0]["owner_username"], "olivia");
}

#[sqlx::test]
async fn test_property_update_by_non_owner_forbidden(pool: SqlitePool) {
    let db = TestDatabase::from_pool(pool.clone()).await;
    let fixtures = TestFixtures::create(&db).await;
    let intruder = create_test_user(&db, "oscar", UserRole::Owner).await;
    let cookie = login_session(&db, &intruder).await;

    let (state, _mailer) = test_app_state(pool);
    let app = http::router(state);

    let response = app
        .oneshot(multipart_request(
            &format!("/properties/{}/update", fixtures.property.id),
            &[("street", "Hijacked Street")],
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let untouched = db
        .property_repo
        .find_by_id(fixtures.property.id)
        .await
        .unwrap()
        .expect("Property should exist");
    assert_eq!(untouched.street, fixtures.property.street);
}

#[sqlx::test]
async fn test_oversized_upload_is_rejected(pool: SqlitePool) {
    let db = TestDatabase::from_pool(pool.clone()).await;
    let owner = create_test_user(&db, "olivia", UserRole::Owner).await;
    let cookie = login_session(&db, &owner).await;

    // Tight limit so the test body stays small
    let config = AppConfig {
        upload: UploadConfig {
            max_bytes: 1024,
            ..UploadConfig::default()
        },
        ..AppConfig::default()
    };
    let state = AppState::new(pool, Arc::new(MemoryMailer::new()), config);
    let app = http::router(state);

    let boundary = "test-boundary";
    let mut body = format!(
        "--{}\r\nContent-Disposition: form-data; name=\"street\"\r\n\r\nElm Street\r\n",
        boundary
    );
    body.push_str(&format!(
        "--{}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"big.png\"\r\nContent-Type: image/png\r\n\r\n",
        boundary
    ));
    body.push_str(&"x".repeat(4096));
    body.push_str(&format!("\r\n--{}--\r\n", boundary));

    let request = Request::builder()
        .method("POST")
        .uri("/properties")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .header(header::COOKIE, cookie.as_str())
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[sqlx::test]
async fn test_missing_property_is_404(pool: SqlitePool) {
    let db = TestDatabase::from_pool(pool.clone()).await;
    let owner = create_test_user(&db, "olivia", UserRole::Owner).await;
    let cookie = login_session(&db, &owner).await;

    let (state, _mailer) = test_app_state(pool);
    let app = http::router(state);

    let response = app
        .oneshot(form_request(
            "/properties/9999/delete",
            "",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Offers
// ============================================================================

#[sqlx::test]
async fn test_offer_requires_bidder_role(pool: SqlitePool) {
    let db = TestDatabase::from_pool(pool.clone()).await;
    let fixtures = TestFixtures::create(&db).await;
    let owner_cookie = login_session(&db, &fixtures.owner).await;
    let bidder_cookie = login_session(&db, &fixtures.bidder).await;

    let (state, _mailer) = test_app_state(pool);
    let app = http::router(state);

    let uri = format!("/properties/{}/offers", fixtures.property.id);

    // Owner accounts cannot send offers
    let response = app
        .clone()
        .oneshot(form_request(&uri, "message=Interested", Some(&owner_cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Bidder accounts can
    let response = app
        .clone()
        .oneshot(form_request(
            &uri,
            "message=Interested",
            Some(&bidder_cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // The owner sees it in the received list
    let response = app
        .oneshot(get_request("/offers/received", Some(&owner_cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let offers = body.as_array().expect("Offers should be an array");
    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0]["message"], "Interested");
    assert_eq!(offers[0]["name"], fixtures.bidder.username);
}

#[sqlx::test]
async fn test_offer_reply_is_emailed(pool: SqlitePool) {
    let db = TestDatabase::from_pool(pool.clone()).await;
    let fixtures = TestFixtures::create(&db).await;
    let owner_cookie = login_session(&db, &fixtures.owner).await;

    let offer = db
        .offer_repo
        .create(NewOffer {
            property_id: fixtures.property.id,
            bidder_id: fixtures.bidder.id,
            name: fixtures.bidder.username.clone(),
            email: fixtures.bidder.email.clone(),
            phone: None,
            message: "Interested".to_string(),
        })
        .await
        .expect("Failed to create offer");

    let (state, mailer) = test_app_state(pool);
    let app = http::router(state);

    let response = app
        .oneshot(form_request(
            &format!("/offers/{}/respond", offer.id),
            "reply=Come+by+on+Saturday",
            Some(&owner_cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let emails = mailer.sent();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].to, fixtures.bidder.email);
    assert!(emails[0].html.contains("Come by on Saturday"));
}

// ============================================================================
// Reviews
// ============================================================================

#[sqlx::test]
async fn test_review_flow(pool: SqlitePool) {
    let db = TestDatabase::from_pool(pool.clone()).await;
    let fixtures = TestFixtures::create(&db).await;

    let (state, _mailer) = test_app_state(pool);
    let app = http::router(state);

    let uri = format!("/properties/{}/reviews", fixtures.property.id);

    // Anyone can leave a review, no session needed
    let response = app
        .clone()
        .oneshot(form_request(
            &uri,
            "reviewer_name=Anon&rating=4&comment=Nice+place",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Out-of-range rating is rejected before it reaches the database
    let response = app
        .clone()
        .oneshot(form_request(&uri, "reviewer_name=Anon&rating=9", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get_request(&uri, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["reviews"].as_array().unwrap().len(), 1);
    assert_eq!(body["summary"]["count"], 1);
}

#[sqlx::test]
async fn test_review_delete_always_forbidden(pool: SqlitePool) {
    let db = TestDatabase::from_pool(pool.clone()).await;
    let fixtures = TestFixtures::create(&db).await;
    let owner_cookie = login_session(&db, &fixtures.owner).await;

    let review = db
        .review_repo
        .create(NewReview {
            property_id: fixtures.property.id,
            reviewer_name: "Anon".to_string(),
            reviewer_email: None,
            rating: 1,
            comment: Some("terrible".to_string()),
        })
        .await
        .expect("Failed to create review");

    let (state, _mailer) = test_app_state(pool);
    let app = http::router(state);

    // Even the property owner cannot remove a review
    let response = app
        .oneshot(form_request(
            &format!("/reviews/{}/delete", review.id),
            "",
            Some(&owner_cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let still_there = db
        .review_repo
        .find_by_id(review.id)
        .await
        .unwrap();
    assert!(still_there.is_some());
}

#[sqlx::test]
async fn test_received_reviews_owner_only(pool: SqlitePool) {
    let db = TestDatabase::from_pool(pool.clone()).await;
    let fixtures = TestFixtures::create(&db).await;
    let bidder_cookie = login_session(&db, &fixtures.bidder).await;
    let owner_cookie = login_session(&db, &fixtures.owner).await;

    db.review_repo
        .create(NewReview {
            property_id: fixtures.property.id,
            reviewer_name: "Anon".to_string(),
            reviewer_email: None,
            rating: 5,
            comment: None,
        })
        .await
        .expect("Failed to create review");

    let (state, _mailer) = test_app_state(pool);
    let app = http::router(state);

    let response = app
        .clone()
        .oneshot(get_request("/reviews/received", Some(&bidder_cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(get_request("/reviews/received", Some(&owner_cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["total_reviews"], 1);
    assert_eq!(body["pending_responses"], 1);
}
