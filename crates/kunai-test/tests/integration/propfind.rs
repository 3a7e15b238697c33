#![allow(clippy::unused_async)]
//! Tests for PROPFIND.
//!
//! Verifies depth-bounded traversal, propstat grouping, and the
//! rejection of unsupported request shapes.

use salvo::http::StatusCode;

use super::helpers::*;

const NAME_AND_ETAG_PROPFIND: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<D:propfind xmlns:D="DAV:">
  <D:prop>
    <D:displayname/>
    <D:getetag/>
  </D:prop>
</D:propfind>"#;

/// ## Summary
/// Test that a depth-0 PROPFIND returns one response for the target.
#[test_log::test(tokio::test)]
async fn propfind_depth_zero_single_response() {
    let (service, _backend) = seeded_service();

    let response = TestRequest::propfind("/dir/a.txt")
        .depth("0")
        .xml_body(NAME_AND_ETAG_PROPFIND)
        .send(&service)
        .await;

    assert_eq!(response.count_multistatus_responses(), 1);
    let _response = response
        .assert_status(StatusCode::MULTI_STATUS)
        .assert_header_contains("Content-Type", "text/xml")
        .assert_body_contains("<D:href>/dir/a.txt</D:href>")
        .assert_body_contains("<D:getetag>&quot;e1&quot;</D:getetag>");
}

/// ## Summary
/// Test that a depth-1 PROPFIND covers the collection and its members,
/// with collection member hrefs ending in a slash.
#[test_log::test(tokio::test)]
async fn propfind_depth_one_lists_members() {
    let (service, _backend) = seeded_service();

    let response = TestRequest::propfind("/dir/")
        .depth("1")
        .xml_body(NAME_AND_ETAG_PROPFIND)
        .send(&service)
        .await;

    assert_eq!(response.count_multistatus_responses(), 3);
    let _response = response
        .assert_status(StatusCode::MULTI_STATUS)
        .assert_body_contains("<D:href>/dir/</D:href>")
        .assert_body_contains("<D:href>/dir/a.txt</D:href>")
        .assert_body_contains("<D:href>/dir/sub/</D:href>");
}

/// ## Summary
/// Test that found and missing properties land in separate propstat
/// groups with their own status lines.
#[test_log::test(tokio::test)]
async fn propfind_groups_found_and_missing() {
    let (service, _backend) = seeded_service();

    let body = r#"<?xml version="1.0" encoding="utf-8"?>
<D:propfind xmlns:D="DAV:" xmlns:X="urn:example:ns">
  <D:prop>
    <D:getetag/>
    <X:no-such-prop/>
  </D:prop>
</D:propfind>"#;

    let response = TestRequest::propfind("/dir/a.txt")
        .depth("0")
        .xml_body(body)
        .send(&service)
        .await;

    assert_eq!(response.count_propstats(), 2);
    let _response = response
        .assert_status(StatusCode::MULTI_STATUS)
        .assert_body_contains("HTTP/1.1 200 OK")
        .assert_body_contains("HTTP/1.1 404 Not Found")
        .assert_body_contains("<ns0:no-such-prop/>");
}

/// ## Summary
/// Test that PROPFIND on a missing resource returns 404.
#[test_log::test(tokio::test)]
async fn propfind_missing_resource() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::propfind("/gone/")
        .depth("0")
        .xml_body(NAME_AND_ETAG_PROPFIND)
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// ## Summary
/// Test that the allprop form (an empty body) is refused as a server
/// error rather than silently narrowed, with the failure description
/// in the body.
#[test_log::test(tokio::test)]
async fn propfind_allprop_is_rejected() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::propfind("/dir/")
        .depth("0")
        .send(&service)
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_header_contains("Content-Type", "text/plain")
        .assert_body_contains("Unsupported PROPFIND request shape: allprop");
}

/// ## Summary
/// Test that the propname form is refused as a server error.
#[test_log::test(tokio::test)]
async fn propfind_propname_is_rejected() {
    let (service, _backend) = seeded_service();

    let body = r#"<?xml version="1.0" encoding="utf-8"?>
<D:propfind xmlns:D="DAV:"><D:propname/></D:propfind>"#;

    let _response = TestRequest::propfind("/dir/")
        .depth("0")
        .xml_body(body)
        .send(&service)
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

/// ## Summary
/// Test that traversal at infinite depth is refused.
#[test_log::test(tokio::test)]
async fn propfind_depth_infinity_is_rejected() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::propfind("/dir/")
        .depth("infinity")
        .xml_body(NAME_AND_ETAG_PROPFIND)
        .send(&service)
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

/// ## Summary
/// Test that an unparseable Depth header is a client error.
#[test_log::test(tokio::test)]
async fn propfind_invalid_depth_header() {
    let (service, _backend) = seeded_service();

    let _response = TestRequest::propfind("/dir/")
        .depth("2")
        .xml_body(NAME_AND_ETAG_PROPFIND)
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

/// ## Summary
/// Test that current-user-principal resolves to the configured href.
#[test_log::test(tokio::test)]
async fn propfind_current_user_principal() {
    let (service, _backend) = seeded_service();

    let body = r#"<?xml version="1.0" encoding="utf-8"?>
<D:propfind xmlns:D="DAV:">
  <D:prop>
    <D:current-user-principal/>
  </D:prop>
</D:propfind>"#;

    let _response = TestRequest::propfind("/dir/")
        .depth("0")
        .xml_body(body)
        .send(&service)
        .await
        .assert_status(StatusCode::MULTI_STATUS)
        .assert_body_contains("<D:current-user-principal><D:href>/principals/me/</D:href></D:current-user-principal>");
}
