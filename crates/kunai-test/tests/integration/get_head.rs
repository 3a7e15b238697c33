#![allow(clippy::unused_async)]
//! Tests for GET and HEAD methods.
//!
//! Verifies resource retrieval, ETag handling, and conditional requests.

use salvo::http::StatusCode;

use super::helpers::*;

/// ## Summary
/// Test that GET returns the stored body with its ETag.
#[test_log::test(tokio::test)]
async fn get_returns_body_and_etag() {
    let (service, _backend) = seeded_service();

    let response = TestRequest::get("/dir/a.txt").send(&service).await;

    assert_eq!(response.get_etag(), Some("\"e1\""));
    let _response = response
        .assert_status(StatusCode::OK)
        .assert_body_contains("hello");
}

/// ## Summary
/// Test that GET on a missing resource returns 404.
#[test_log::test(tokio::test)]
async fn get_missing_resource() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::get("/dir/nope.txt")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// ## Summary
/// Test that a matching If-None-Match returns 304 without a body.
#[test_log::test(tokio::test)]
async fn get_if_none_match_hit() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::get("/dir/a.txt")
        .if_none_match("\"e1\"")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_MODIFIED)
        .assert_body_empty();
}

/// ## Summary
/// Test that a wildcard If-None-Match matches any stored ETag.
#[test_log::test(tokio::test)]
async fn get_if_none_match_wildcard() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::get("/dir/a.txt")
        .if_none_match("*")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_MODIFIED);
}

/// ## Summary
/// Test that a non-matching If-None-Match serves the body.
#[test_log::test(tokio::test)]
async fn get_if_none_match_miss() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::get("/dir/a.txt")
        .if_none_match("\"other\"")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_body_contains("hello");
}

/// ## Summary
/// Test that HEAD returns headers but no body.
#[test_log::test(tokio::test)]
async fn head_has_no_body() {
    let (service, _backend) = seeded_service();

    let response = TestRequest::head("/dir/a.txt").send(&service).await;

    assert_eq!(response.get_etag(), Some("\"e1\""));
    let _response = response.assert_status(StatusCode::OK).assert_body_empty();
}
