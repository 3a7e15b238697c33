//! Depth-bounded resource traversal.

use std::sync::Arc;

use kunai_rfc::rfc::dav::core::{Depth, Href};

use crate::error::{EngineError, EngineResult};
use crate::resource::Resource;

/// ## Summary
/// Enumerates a resource and, at `Depth: 1`, its immediate members.
///
/// The base pair always comes first. Member hrefs are the base href
/// joined with the member name, with a trailing slash appended when the
/// member is itself a collection. Callers validate the depth header
/// before invoking traversal; `Depth: infinity` here is an engine error.
///
/// ## Errors
/// Returns [`EngineError::UnsupportedDepth`] for depths other than 0
/// and 1, and backend errors from member enumeration.
pub fn traverse(
    resource: &Arc<dyn Resource>,
    depth: Depth,
    base_href: &str,
) -> EngineResult<Vec<(String, Arc<dyn Resource>)>> {
    let mut out = vec![(base_href.to_owned(), Arc::clone(resource))];

    match depth {
        Depth::Zero => Ok(out),
        Depth::One => {
            if let Some(collection) = resource.as_collection() {
                let base = Href::new(base_href);
                for (name, member) in collection.members()? {
                    let mut href = base.join(&name).as_str().to_owned();
                    if member.is_collection() {
                        href.push('/');
                    }
                    out.push((href, member));
                }
            }
            Ok(out)
        }
        Depth::Infinity => Err(EngineError::UnsupportedDepth(depth)),
    }
}
