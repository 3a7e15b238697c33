//! The method dispatcher's protocol logic.
//!
//! [`DavEngine`] owns the backend, the property registry, and the
//! reporter registry. Each operation maps one HTTP method's semantics
//! onto the backend and returns a typed outcome; translating outcomes
//! to wire responses is the HTTP layer's job.

use std::sync::Arc;

use kunai_rfc::rfc::dav::core::{
    DavErrorBody, Depth, Multistatus, PropOutcome, PropertyUpdate, PropfindRequest, PropfindType,
    QName, SetOrRemove, Status, StatusLine, etag_matches,
};
use kunai_rfc::rfc::dav::parse;

use crate::error::{EngineError, EngineResult};
use crate::props::register_standard_properties;
use crate::registry::PropertyRegistry;
use crate::reporter::{ExpandPropertyReporter, ReportContext, Reporter, ReporterRegistry};
use crate::resource::{Backend, Resource};
use crate::traverse::traverse;

/// Outcome of a GET.
pub enum GetOutcome {
    /// No resource at the path.
    NotFound,
    /// `If-None-Match` matched.
    NotModified {
        /// The matching ETag.
        etag: String,
    },
    /// The resource body.
    Ok {
        etag: Option<String>,
        content_type: Option<String>,
        body: Vec<u8>,
    },
}

/// Outcome of a PUT.
pub enum PutOutcome {
    /// A new member was created.
    Created { etag: Option<String> },
    /// An existing resource was overwritten.
    Updated { etag: Option<String> },
    /// Neither the target nor its parent collection exists.
    NotFound,
    /// `If-Match` did not match; nothing was written.
    PreconditionFailed,
    /// The body exceeded the configured maximum.
    TooLarge,
}

/// Outcome of a DELETE.
pub enum DeleteOutcome {
    /// The member was removed.
    Deleted,
    /// The target or its parent does not exist.
    NotFound,
    /// `If-Match` did not match; nothing was removed.
    PreconditionFailed,
}

/// Outcome of a MKCOL.
pub enum MkcolOutcome {
    /// The collection was created.
    Created,
    /// A resource already exists at the path.
    AlreadyExists,
    /// The parent collection does not exist.
    MissingParent,
}

/// Outcome of a PROPFIND or PROPPATCH.
pub enum DavOutcome {
    /// No resource at the path.
    NotFound,
    /// Per-resource statuses to render.
    Statuses(Vec<Status>),
}

/// Outcome of a REPORT.
pub enum ReportOutcome {
    /// No resource at the path.
    NotFound,
    /// The report name is not registered. The status carries the
    /// supported-report error payload.
    Unsupported(Box<Status>),
    /// The reporter's per-resource statuses.
    Statuses(Vec<Status>),
}

/// Builder for [`DavEngine`].
pub struct DavEngineBuilder {
    backend: Arc<dyn Backend>,
    properties: PropertyRegistry,
    reporters: ReporterRegistry,
    current_user_principal: String,
    max_put_body: usize,
}

impl DavEngineBuilder {
    /// Starts a builder over a backend.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            properties: PropertyRegistry::new(),
            reporters: ReporterRegistry::new(),
            current_user_principal: "/principals/me/".to_owned(),
            max_put_body: 16 * 1024 * 1024,
        }
    }

    /// Sets the href reported by `current-user-principal`.
    #[must_use]
    pub fn current_user_principal(mut self, href: impl Into<String>) -> Self {
        self.current_user_principal = href.into();
        self
    }

    /// Sets the largest accepted PUT body, in bytes.
    #[must_use]
    pub fn max_put_body(mut self, bytes: usize) -> Self {
        self.max_put_body = bytes;
        self
    }

    /// Registers an extra property handler.
    #[must_use]
    pub fn property(mut self, handler: Arc<dyn crate::registry::PropertyHandler>) -> Self {
        self.properties.register(handler);
        self
    }

    /// Registers an extra reporter.
    #[must_use]
    pub fn reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporters.register(reporter);
        self
    }

    /// ## Summary
    /// Builds the engine, registering the standard property set and the
    /// expand-property reporter. Registries are immutable afterwards.
    #[must_use]
    pub fn build(mut self) -> DavEngine {
        self.reporters.register(Arc::new(ExpandPropertyReporter));
        register_standard_properties(
            &mut self.properties,
            &self.current_user_principal,
            self.reporters.names(),
        );

        DavEngine {
            backend: self.backend,
            properties: Arc::new(self.properties),
            reporters: Arc::new(self.reporters),
            max_put_body: self.max_put_body,
        }
    }
}

/// The protocol engine.
pub struct DavEngine {
    backend: Arc<dyn Backend>,
    properties: Arc<PropertyRegistry>,
    reporters: Arc<ReporterRegistry>,
    max_put_body: usize,
}

impl DavEngine {
    /// Returns the property registry.
    #[must_use]
    pub fn properties(&self) -> &PropertyRegistry {
        &self.properties
    }

    /// Returns the largest accepted PUT body, in bytes.
    #[must_use]
    pub fn max_put_body(&self) -> usize {
        self.max_put_body
    }

    /// Resolves a path through the backend.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<Arc<dyn Resource>> {
        self.backend.resolve(path)
    }

    fn resolve_parent(&self, path: &str) -> Option<(Arc<dyn Resource>, String)> {
        let trimmed = path.trim_end_matches('/');
        let (parent, name) = trimmed.rsplit_once('/')?;
        if name.is_empty() {
            return None;
        }
        let parent_path = if parent.is_empty() { "/" } else { parent };
        let parent = self.backend.resolve(parent_path)?;
        Some((parent, name.to_owned()))
    }

    /// ## Summary
    /// GET: conditional body retrieval.
    ///
    /// ## Errors
    /// Backend body failures are fatal to the request.
    #[tracing::instrument(skip(self))]
    pub fn get(&self, path: &str, if_none_match: Option<&str>) -> EngineResult<GetOutcome> {
        let Some(resource) = self.backend.resolve(path) else {
            return Ok(GetOutcome::NotFound);
        };

        let etag = resource.etag();
        if let Some(condition) = if_none_match
            && etag_matches(condition, etag.as_deref())
        {
            // etag_matches only returns true when an ETag is present
            return Ok(GetOutcome::NotModified {
                etag: etag.unwrap_or_default(),
            });
        }

        Ok(GetOutcome::Ok {
            etag,
            content_type: resource.content_type(),
            body: resource.body()?,
        })
    }

    /// ## Summary
    /// PUT: overwrite an existing resource or create a parent member.
    ///
    /// ## Errors
    /// Backend write failures are fatal to the request.
    #[tracing::instrument(skip(self, body), fields(body_len = body.len()))]
    pub fn put(
        &self,
        path: &str,
        body: Vec<u8>,
        content_type: Option<String>,
        if_match: Option<&str>,
    ) -> EngineResult<PutOutcome> {
        if body.len() > self.max_put_body {
            return Ok(PutOutcome::TooLarge);
        }

        let resource = self.backend.resolve(path);

        // If-Match is evaluated against the current state even when the
        // target does not exist, so a conditional PUT never creates.
        if let Some(condition) = if_match
            && !etag_matches(condition, resource.as_ref().and_then(|r| r.etag()).as_deref())
        {
            return Ok(PutOutcome::PreconditionFailed);
        }

        if let Some(resource) = resource {
            resource.set_body(body, content_type)?;
            return Ok(PutOutcome::Updated {
                etag: resource.etag(),
            });
        }

        let Some((parent, name)) = self.resolve_parent(path) else {
            return Ok(PutOutcome::NotFound);
        };
        let Some(collection) = parent.as_collection() else {
            return Ok(PutOutcome::NotFound);
        };
        let created = collection.create_member(&name, body, content_type)?;
        Ok(PutOutcome::Created {
            etag: created.etag(),
        })
    }

    /// ## Summary
    /// DELETE: remove a member from its parent collection.
    ///
    /// ## Errors
    /// Backend removal failures are fatal to the request.
    #[tracing::instrument(skip(self))]
    pub fn delete(&self, path: &str, if_match: Option<&str>) -> EngineResult<DeleteOutcome> {
        let Some(resource) = self.backend.resolve(path) else {
            return Ok(DeleteOutcome::NotFound);
        };
        let Some((parent, name)) = self.resolve_parent(path) else {
            return Ok(DeleteOutcome::NotFound);
        };
        let Some(collection) = parent.as_collection() else {
            return Ok(DeleteOutcome::NotFound);
        };

        if let Some(condition) = if_match
            && !etag_matches(condition, resource.etag().as_deref())
        {
            return Ok(DeleteOutcome::PreconditionFailed);
        }

        collection.delete_member(&name)?;
        Ok(DeleteOutcome::Deleted)
    }

    /// ## Summary
    /// MKCOL: create a sub-collection.
    ///
    /// ## Errors
    /// Backend creation failures are fatal to the request.
    #[tracing::instrument(skip(self))]
    pub fn mkcol(&self, path: &str) -> EngineResult<MkcolOutcome> {
        if self.backend.resolve(path).is_some() {
            return Ok(MkcolOutcome::AlreadyExists);
        }
        let Some((parent, name)) = self.resolve_parent(path) else {
            return Ok(MkcolOutcome::MissingParent);
        };
        let Some(collection) = parent.as_collection() else {
            return Ok(MkcolOutcome::MissingParent);
        };
        collection.create_collection(&name)?;
        Ok(MkcolOutcome::Created)
    }

    /// ## Summary
    /// PROPFIND: read named properties over a depth-bounded traversal.
    ///
    /// Only the named-properties form is implemented; allprop and
    /// propname are engine errors.
    ///
    /// ## Errors
    /// Unsupported request shapes, unsupported depth, and property read
    /// failures are fatal to the request.
    #[tracing::instrument(skip(self, request))]
    pub fn propfind(
        &self,
        path: &str,
        depth: Depth,
        request: &PropfindRequest,
    ) -> EngineResult<DavOutcome> {
        let Some(resource) = self.backend.resolve(path) else {
            return Ok(DavOutcome::NotFound);
        };

        let names = match &request.propfind_type {
            PropfindType::Prop(names) => names,
            PropfindType::AllProp { .. } => {
                return Err(EngineError::UnsupportedPropfind("allprop"));
            }
            PropfindType::PropName => {
                return Err(EngineError::UnsupportedPropfind("propname"));
            }
        };

        let mut statuses = Vec::new();
        for (href, visited) in traverse(&resource, depth, path)? {
            let outcomes = self.properties.get_all(visited.as_ref(), names)?;
            statuses.push(Status::with_outcomes(href, outcomes));
        }
        Ok(DavOutcome::Statuses(statuses))
    }

    /// ## Summary
    /// PROPPATCH: apply an ordered list of set/remove operations.
    ///
    /// Unknown properties record 404, protected properties record 409,
    /// and neither prevents the other operations in the same request
    /// from being applied.
    ///
    /// ## Errors
    /// Backend failures other than refused writes are fatal.
    #[tracing::instrument(skip(self, updates))]
    pub fn proppatch(&self, path: &str, updates: &[PropertyUpdate]) -> EngineResult<DavOutcome> {
        let Some(resource) = self.backend.resolve(path) else {
            return Ok(DavOutcome::NotFound);
        };

        let mut outcomes = Vec::with_capacity(updates.len());
        for update in updates {
            let name = update.property.name.clone();
            outcomes.push(self.apply_update(resource.as_ref(), update, name)?);
        }

        Ok(DavOutcome::Statuses(vec![Status::with_outcomes(
            path, outcomes,
        )]))
    }

    fn apply_update(
        &self,
        resource: &dyn Resource,
        update: &PropertyUpdate,
        name: QName,
    ) -> EngineResult<PropOutcome> {
        let Some(handler) = self.properties.handler(&name) else {
            return Ok(PropOutcome::not_found(name));
        };
        if handler.protected() {
            return Ok(PropOutcome::protected(name));
        }

        let result = match update.operation {
            SetOrRemove::Set => {
                let value = update
                    .property
                    .value
                    .clone()
                    .unwrap_or(kunai_rfc::rfc::dav::core::PropertyValue::Empty);
                handler.set(resource, &value)
            }
            SetOrRemove::Remove => handler.remove(resource),
        };

        match result {
            Ok(()) => Ok(PropOutcome::with_status(
                StatusLine::OK,
                kunai_rfc::rfc::dav::core::DavProperty::empty(name),
            )),
            Err(EngineError::PropertyNotWritable(_)) => Ok(PropOutcome::protected(name)),
            Err(err) => Err(err),
        }
    }

    /// ## Summary
    /// REPORT: dispatch on the body's root element name.
    ///
    /// An unregistered report name yields a 403 status carrying the
    /// supported-report error payload.
    ///
    /// ## Errors
    /// A body without a well-formed root element is fatal, as are
    /// reporter failures.
    #[tracing::instrument(skip(self, body), fields(body_len = body.len()))]
    pub fn report(&self, path: &str, depth: Depth, body: &[u8]) -> EngineResult<ReportOutcome> {
        let Some(resource) = self.backend.resolve(path) else {
            return Ok(ReportOutcome::NotFound);
        };

        let root = parse::report_root_name(body)
            .map_err(|err| EngineError::MalformedBody(err.to_string()))?;

        let Some(reporter) = self.reporters.reporter(&root) else {
            tracing::warn!(report = %root, "Client requested unsupported report");
            let status = Status::new(path, StatusLine::FORBIDDEN)
                .error(DavErrorBody::SupportedReport(self.reporters.names()))
                .description(format!("Unsupported report: {root}"));
            return Ok(ReportOutcome::Unsupported(Box::new(status)));
        };

        let backend = Arc::clone(&self.backend);
        let resolve = move |href: &str| backend.resolve(href);
        let ctx = ReportContext {
            properties: &self.properties,
            resolve: &resolve,
        };

        let statuses = reporter.run(body, &resource, path, depth, &ctx)?;
        Ok(ReportOutcome::Statuses(statuses))
    }

    /// ## Summary
    /// Renders a list of statuses as a multistatus document.
    #[must_use]
    pub fn to_multistatus(statuses: Vec<Status>) -> Multistatus {
        Multistatus::from_responses(statuses)
    }
}
