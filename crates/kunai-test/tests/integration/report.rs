#![allow(clippy::unused_async)]
//! Tests for REPORT.
//!
//! Verifies expand-property expansion and the supported-report error
//! for unregistered report names.

use salvo::http::StatusCode;

use super::helpers::*;

/// ## Summary
/// Test that an unknown report name returns 403 with a
/// supported-report error body naming the registered reports.
#[test_log::test(tokio::test)]
async fn report_unknown_name_lists_supported() {
    let (service, _backend) = seeded_service();

    let body = r#"<?xml version="1.0" encoding="utf-8"?>
<X:unknown-report xmlns:X="urn:example:ns"/>"#;

    let _response = TestRequest::report("/dir/")
        .xml_body(body)
        .send(&service)
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .assert_body_contains("<D:error")
        .assert_body_contains("<D:supported-report>")
        .assert_body_contains("<D:report><D:expand-property/></D:report>");
}

/// ## Summary
/// Test that expand-property inlines the owner principal's properties.
#[test_log::test(tokio::test)]
async fn report_expand_property_inlines_owner() {
    let (service, backend) = seeded_service();

    backend
        .set_owner("/dir/a.txt", "/principals/me/")
        .expect("Failed to set owner");

    let body = r#"<?xml version="1.0" encoding="utf-8"?>
<D:expand-property xmlns:D="DAV:">
  <D:property name="owner">
    <D:property name="displayname"/>
  </D:property>
</D:expand-property>"#;

    let _response = TestRequest::report("/dir/a.txt")
        .xml_body(body)
        .send(&service)
        .await
        .assert_status(StatusCode::MULTI_STATUS)
        .assert_body_contains("<D:owner><D:response>")
        .assert_body_contains("<D:href>/principals/me/</D:href>")
        .assert_body_contains("<D:displayname>Test User</D:displayname>");
}

/// ## Summary
/// Test that an href outside the served space stays a bare href.
#[test_log::test(tokio::test)]
async fn report_expand_property_unresolvable_href() {
    let (service, backend) = seeded_service();

    backend
        .set_owner("/dir/a.txt", "https://elsewhere.example/peer")
        .expect("Failed to set owner");

    let body = r#"<?xml version="1.0" encoding="utf-8"?>
<D:expand-property xmlns:D="DAV:">
  <D:property name="owner">
    <D:property name="displayname"/>
  </D:property>
</D:expand-property>"#;

    let _response = TestRequest::report("/dir/a.txt")
        .xml_body(body)
        .send(&service)
        .await
        .assert_status(StatusCode::MULTI_STATUS)
        .assert_body_contains("<D:owner><D:href>https://elsewhere.example/peer</D:href></D:owner>");
}

/// ## Summary
/// Test that a property without nesting is returned unexpanded.
#[test_log::test(tokio::test)]
async fn report_expand_property_flat_lookup() {
    let (service, _backend) = seeded_service();

    let body = r#"<?xml version="1.0" encoding="utf-8"?>
<D:expand-property xmlns:D="DAV:">
  <D:property name="getetag"/>
</D:expand-property>"#;

    TestRequest::report("/dir/a.txt")
        .xml_body(body)
        .send(&service)
        .await
        .assert_status(StatusCode::MULTI_STATUS)
        .assert_body_contains("<D:getetag>&quot;e1&quot;</D:getetag>");
}

/// ## Summary
/// Test that REPORT on a missing resource returns 404.
#[test_log::test(tokio::test)]
async fn report_missing_resource() {
    let (service, _backend) = seeded_service();

    let body = r#"<?xml version="1.0" encoding="utf-8"?>
<D:expand-property xmlns:D="DAV:"/>"#;

    let _response = TestRequest::report("/gone/")
        .xml_body(body)
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// ## Summary
/// Test that a body without a well-formed root element is refused.
#[test_log::test(tokio::test)]
async fn report_without_body() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::report("/dir/")
        .send(&service)
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}
