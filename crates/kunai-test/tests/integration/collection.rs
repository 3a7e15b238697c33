#![allow(clippy::unused_async)]
//! Tests for MKCOL.

use salvo::http::StatusCode;

use super::helpers::*;

const RESOURCETYPE_PROPFIND: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<D:propfind xmlns:D="DAV:">
  <D:prop>
    <D:resourcetype/>
  </D:prop>
</D:propfind>"#;

/// ## Summary
/// Test that MKCOL creates a collection visible to PROPFIND.
#[test_log::test(tokio::test)]
async fn mkcol_creates_collection() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::mkcol("/dir/new")
        .send(&service)
        .await
        .assert_status(StatusCode::CREATED);

    let _response = TestRequest::propfind("/dir/new/")
        .depth("0")
        .xml_body(RESOURCETYPE_PROPFIND)
        .send(&service)
        .await
        .assert_status(StatusCode::MULTI_STATUS)
        .assert_body_contains("<D:collection/>");
}

/// ## Summary
/// Test that MKCOL at an occupied path returns 405.
#[test_log::test(tokio::test)]
async fn mkcol_existing_path() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::mkcol("/dir/sub")
        .send(&service)
        .await
        .assert_status(StatusCode::METHOD_NOT_ALLOWED);

    let _response = TestRequest::mkcol("/dir/a.txt")
        .send(&service)
        .await
        .assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

/// ## Summary
/// Test that MKCOL without an existing parent returns 409.
#[test_log::test(tokio::test)]
async fn mkcol_missing_parent() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::mkcol("/nodir/new")
        .send(&service)
        .await
        .assert_status(StatusCode::CONFLICT);
}

/// ## Summary
/// Test that a MKCOL body is rejected.
#[test_log::test(tokio::test)]
async fn mkcol_with_body_is_rejected() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::mkcol("/dir/extended")
        .xml_body("<D:mkcol xmlns:D=\"DAV:\"/>")
        .send(&service)
        .await
        .assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
}
