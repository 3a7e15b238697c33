//! ETag condition matching for `If-Match` / `If-None-Match`.

/// ## Summary
/// Checks whether an ETag matches an `If-Match` style condition.
///
/// The condition is a comma-separated list of quoted tokens, any of which
/// may be `*`. Comparison is byte-exact after trimming surrounding spaces,
/// quotes included. An absent resource (`actual_etag` of `None`) never
/// matches a non-empty condition, so `If-Match` fails against a missing
/// resource while `If-None-Match: *` succeeds against one.
#[must_use]
pub fn etag_matches(condition: &str, actual_etag: Option<&str>) -> bool {
    let Some(actual) = actual_etag else {
        return condition.is_empty();
    };

    condition.split(',').any(|etag| {
        let etag = etag.trim_matches(' ');
        etag == "*" || etag == actual
    })
}
