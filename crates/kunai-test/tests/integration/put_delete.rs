#![allow(clippy::unused_async)]
//! Tests for PUT and DELETE methods.
//!
//! Verifies resource creation, overwrite, conditional writes, and the
//! body size limit.

use salvo::http::StatusCode;

use super::helpers::*;

/// ## Summary
/// Test that PUT to a new path creates the member and returns 201.
#[test_log::test(tokio::test)]
async fn put_creates_member() {
    let (service, _backend) = seeded_service();

    let response = TestRequest::put("/dir/b.txt")
        .content_type("text/plain")
        .body(b"fresh".to_vec())
        .send(&service)
        .await;

    assert!(response.get_etag().is_some());
    let _response = response.assert_status(StatusCode::CREATED);

    let _response = TestRequest::get("/dir/b.txt")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_body_contains("fresh")
        .assert_header_contains("Content-Type", "text/plain");
}

/// ## Summary
/// Test that PUT over an existing resource returns 204 and changes the ETag.
#[test_log::test(tokio::test)]
async fn put_overwrites_existing() {
    let (service, _backend) = seeded_service();

    let response = TestRequest::put("/dir/a.txt")
        .body(b"replaced".to_vec())
        .send(&service)
        .await;

    let new_etag = response.get_etag().map(str::to_string);
    let _response = response.assert_status(StatusCode::NO_CONTENT);

    assert!(new_etag.is_some());
    assert_ne!(new_etag.as_deref(), Some("\"e1\""));

    let _response = TestRequest::get("/dir/a.txt")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_body_contains("replaced");
}

/// ## Summary
/// Test that a stale If-Match fails with 412 and leaves the body alone.
#[test_log::test(tokio::test)]
async fn put_if_match_stale_leaves_body() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::put("/dir/a.txt")
        .if_match("\"stale\"")
        .body(b"clobbered".to_vec())
        .send(&service)
        .await
        .assert_status(StatusCode::PRECONDITION_FAILED);

    let _response = TestRequest::get("/dir/a.txt")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_body_contains("hello");
}

/// ## Summary
/// Test that If-Match on a missing resource fails with 412 instead of
/// creating it.
#[test_log::test(tokio::test)]
async fn put_if_match_missing_resource() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::put("/dir/new.txt")
        .if_match("*")
        .body(b"guarded".to_vec())
        .send(&service)
        .await
        .assert_status(StatusCode::PRECONDITION_FAILED);

    let _response = TestRequest::get("/dir/new.txt")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// ## Summary
/// Test that a matching If-Match allows the overwrite.
#[test_log::test(tokio::test)]
async fn put_if_match_current_etag() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::put("/dir/a.txt")
        .if_match("\"e1\"")
        .body(b"updated".to_vec())
        .send(&service)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let _response = TestRequest::get("/dir/a.txt")
        .send(&service)
        .await
        .assert_body_contains("updated");
}

/// ## Summary
/// Test that PUT without an existing parent collection returns 404.
#[test_log::test(tokio::test)]
async fn put_missing_parent() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::put("/nodir/c.txt")
        .body(b"lost".to_vec())
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// ## Summary
/// Test that a body over the configured limit returns 413.
#[test_log::test(tokio::test)]
async fn put_body_too_large() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::put("/dir/big.bin")
        .body(vec![0u8; TEST_MAX_PUT_BODY + 1])
        .send(&service)
        .await
        .assert_status(StatusCode::PAYLOAD_TOO_LARGE);

    let _response = TestRequest::get("/dir/big.bin")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// ## Summary
/// Test that DELETE removes the resource.
#[test_log::test(tokio::test)]
async fn delete_removes_resource() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::delete("/dir/a.txt")
        .send(&service)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let _response = TestRequest::get("/dir/a.txt")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// ## Summary
/// Test that DELETE on a missing resource returns 404.
#[test_log::test(tokio::test)]
async fn delete_missing_resource() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::delete("/dir/nope.txt")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// ## Summary
/// Test that a stale If-Match blocks the deletion.
#[test_log::test(tokio::test)]
async fn delete_if_match_stale() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::delete("/dir/a.txt")
        .if_match("\"stale\"")
        .send(&service)
        .await
        .assert_status(StatusCode::PRECONDITION_FAILED);

    let _response = TestRequest::get("/dir/a.txt")
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
}
