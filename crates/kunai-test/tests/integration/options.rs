#![allow(clippy::unused_async)]
//! Tests for the OPTIONS method.

use salvo::http::StatusCode;

use super::helpers::*;

/// ## Summary
/// Test that OPTIONS advertises the supported methods and DAV class.
#[test_log::test(tokio::test)]
async fn options_advertises_methods_and_dav_class() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::options("/dir/")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_header("DAV", "1")
        .assert_header("Content-Length", "0")
        .assert_header_contains("Allow", "PROPFIND")
        .assert_header_contains("Allow", "REPORT")
        .assert_header_contains("Allow", "MKCOL");
}

/// ## Summary
/// Test that OPTIONS works regardless of whether the path resolves.
#[test_log::test(tokio::test)]
async fn options_on_missing_path() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::options("/does/not/exist")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_header("DAV", "1");
}
