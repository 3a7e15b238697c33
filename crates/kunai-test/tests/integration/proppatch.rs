#![allow(clippy::unused_async)]
//! Tests for PROPPATCH.
//!
//! Verifies writable and protected property handling and the collapse
//! to a single-status response when all outcomes agree.

use salvo::http::StatusCode;

use super::helpers::*;

/// ## Summary
/// Test that setting displayname succeeds and collapses to a 200.
#[test_log::test(tokio::test)]
async fn proppatch_sets_displayname() {
    let (service, _backend) = seeded_service();

    let body = r#"<?xml version="1.0" encoding="utf-8"?>
<D:propertyupdate xmlns:D="DAV:">
  <D:set>
    <D:prop>
      <D:displayname>Renamed</D:displayname>
    </D:prop>
  </D:set>
</D:propertyupdate>"#;

    let _response = TestRequest::proppatch("/dir/a.txt")
        .xml_body(body)
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_body_contains("<D:displayname/>")
        .assert_body_contains("HTTP/1.1 200 OK");

    let propfind = r#"<?xml version="1.0" encoding="utf-8"?>
<D:propfind xmlns:D="DAV:">
  <D:prop><D:displayname/></D:prop>
</D:propfind>"#;

    let _response = TestRequest::propfind("/dir/a.txt")
        .depth("0")
        .xml_body(propfind)
        .send(&service)
        .await
        .assert_status(StatusCode::MULTI_STATUS)
        .assert_body_contains("<D:displayname>Renamed</D:displayname>");
}

/// ## Summary
/// Test that a protected property reports 409 while the writable
/// operation in the same request is still applied.
#[test_log::test(tokio::test)]
async fn proppatch_protected_and_writable_mix() {
    let (service, backend) = seeded_service();

    let body = r#"<?xml version="1.0" encoding="utf-8"?>
<D:propertyupdate xmlns:D="DAV:">
  <D:set>
    <D:prop>
      <D:displayname>Renamed</D:displayname>
    </D:prop>
  </D:set>
  <D:set>
    <D:prop>
      <D:getetag>"forged"</D:getetag>
    </D:prop>
  </D:set>
</D:propertyupdate>"#;

    let _response = TestRequest::proppatch("/dir/a.txt")
        .xml_body(body)
        .send(&service)
        .await
        .assert_status(StatusCode::MULTI_STATUS)
        .assert_body_contains("HTTP/1.1 200 OK")
        .assert_body_contains("HTTP/1.1 409 Conflict")
        .assert_body_contains("Property is protected.");

    use kunai_test::component::resource::Backend as _;
    let resource = backend
        .resolve("/dir/a.txt")
        .expect("Resource should still exist");
    assert_eq!(resource.display_name().as_deref(), Some("Renamed"));
    assert_eq!(resource.etag().as_deref(), Some("\"e1\""));
}

/// ## Summary
/// Test that an unknown property reports 404 in its propstat group.
#[test_log::test(tokio::test)]
async fn proppatch_unknown_property() {
    let (service, _backend) = seeded_service();

    let body = r#"<?xml version="1.0" encoding="utf-8"?>
<D:propertyupdate xmlns:D="DAV:" xmlns:X="urn:example:ns">
  <D:set>
    <D:prop>
      <X:unknown>v</X:unknown>
    </D:prop>
  </D:set>
</D:propertyupdate>"#;

    let _response = TestRequest::proppatch("/dir/a.txt")
        .xml_body(body)
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_body_contains("HTTP/1.1 404 Not Found");
}

/// ## Summary
/// Test that removing displayname succeeds.
#[test_log::test(tokio::test)]
async fn proppatch_removes_displayname() {
    let (service, _backend) = seeded_service();

    let body = r#"<?xml version="1.0" encoding="utf-8"?>
<D:propertyupdate xmlns:D="DAV:">
  <D:remove>
    <D:prop><D:displayname/></D:prop>
  </D:remove>
</D:propertyupdate>"#;

    let _response = TestRequest::proppatch("/dir/a.txt")
        .xml_body(body)
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
}

/// ## Summary
/// Test that PROPPATCH on a missing resource returns 404.
#[test_log::test(tokio::test)]
async fn proppatch_missing_resource() {
    let (service, _backend) = seeded_service();

    let body = r#"<?xml version="1.0" encoding="utf-8"?>
<D:propertyupdate xmlns:D="DAV:">
  <D:set>
    <D:prop><D:displayname>x</D:displayname></D:prop>
  </D:set>
</D:propertyupdate>"#;

    let _response = TestRequest::proppatch("/gone.txt")
        .xml_body(body)
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
