//! The REPORT subsystem.
//!
//! Reporters are registered by the qualified name of the request body's
//! root element. Each reporter parses its own body, so new report types
//! plug in without touching the dispatcher.

use std::collections::HashMap;
use std::sync::Arc;

use kunai_rfc::rfc::dav::core::{
    Depth, ExpandPropertyItem, ExpandedNode, PropOutcome, PropertyValue, QName, Status,
};
use kunai_rfc::rfc::dav::parse;

use crate::error::{EngineError, EngineResult};
use crate::registry::PropertyRegistry;
use crate::resource::Resource;

/// Shared context handed to a running reporter.
pub struct ReportContext<'a> {
    /// The engine's property registry.
    pub properties: &'a PropertyRegistry,
    /// Resolves an href inside the server's URL space to a resource.
    /// Hrefs outside the space resolve to `None`.
    pub resolve: &'a (dyn Fn(&str) -> Option<Arc<dyn Resource>> + Sync),
}

/// A pluggable handler for one REPORT type.
pub trait Reporter: Send + Sync {
    /// The root element name this reporter answers to.
    fn name(&self) -> QName;

    /// Runs the report against the target resource.
    ///
    /// ## Errors
    /// A malformed body or a failing property read is fatal to the
    /// request.
    fn run(
        &self,
        body: &[u8],
        target: &Arc<dyn Resource>,
        target_href: &str,
        depth: Depth,
        ctx: &ReportContext<'_>,
    ) -> EngineResult<Vec<Status>>;
}

/// Name-keyed catalog of reporters. Read-only after engine construction.
#[derive(Default)]
pub struct ReporterRegistry {
    by_name: HashMap<QName, Arc<dyn Reporter>>,
}

impl ReporterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a reporter. A duplicate name overwrites the previous one.
    pub fn register(&mut self, reporter: Arc<dyn Reporter>) {
        self.by_name.insert(reporter.name(), reporter);
    }

    /// Returns the reporter for a root element name.
    #[must_use]
    pub fn reporter(&self, name: &QName) -> Option<&Arc<dyn Reporter>> {
        self.by_name.get(name)
    }

    /// Returns all registered report names.
    #[must_use]
    pub fn names(&self) -> Vec<QName> {
        self.by_name.keys().cloned().collect()
    }
}

/// The `DAV:expand-property` report (RFC 3253 §3.8).
pub struct ExpandPropertyReporter;

impl ExpandPropertyReporter {
    fn expand(
        items: &[ExpandPropertyItem],
        href: &str,
        resource: &Arc<dyn Resource>,
        ctx: &ReportContext<'_>,
    ) -> EngineResult<Status> {
        let mut outcomes = Vec::with_capacity(items.len());

        for item in items {
            let mut outcome = ctx.properties.get(resource.as_ref(), &item.name)?;
            if !item.nested.is_empty() && outcome.status.code() == 200 {
                Self::expand_outcome(item, &mut outcome, ctx)?;
            }
            outcomes.push(outcome);
        }

        Ok(Status::with_outcomes(href, outcomes))
    }

    /// Replaces href values with recursively expanded sub-trees.
    /// Unresolvable hrefs are left as bare hrefs, never an error.
    fn expand_outcome(
        item: &ExpandPropertyItem,
        outcome: &mut PropOutcome,
        ctx: &ReportContext<'_>,
    ) -> EngineResult<()> {
        let hrefs: Vec<String> = outcome
            .prop
            .hrefs()
            .into_iter()
            .map(ToOwned::to_owned)
            .collect();
        if hrefs.is_empty() {
            return Ok(());
        }

        let mut nodes = Vec::with_capacity(hrefs.len());
        for href in hrefs {
            match (ctx.resolve)(&href) {
                Some(resource) => {
                    let nested = Self::expand(&item.nested, &href, &resource, ctx)?;
                    nodes.push(ExpandedNode::Response(Box::new(nested)));
                }
                None => nodes.push(ExpandedNode::Href(href)),
            }
        }

        outcome.prop.value = Some(PropertyValue::Expanded(nodes));
        Ok(())
    }
}

impl Reporter for ExpandPropertyReporter {
    fn name(&self) -> QName {
        QName::dav("expand-property")
    }

    #[tracing::instrument(skip_all, fields(href = target_href, depth = %depth))]
    fn run(
        &self,
        body: &[u8],
        target: &Arc<dyn Resource>,
        target_href: &str,
        depth: Depth,
        ctx: &ReportContext<'_>,
    ) -> EngineResult<Vec<Status>> {
        let request = parse::parse_expand_property(body)
            .map_err(|err| EngineError::MalformedBody(err.to_string()))?;

        let status = Self::expand(&request.items, target_href, target, ctx)?;
        Ok(vec![status])
    }
}
