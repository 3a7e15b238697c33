//! Multistatus response types.
//!
//! A [`Status`] is one per-resource outcome. It carries either a coarse
//! status line or a list of per-property outcomes, never both. Outcomes
//! sharing the same (status code, description) pair are grouped into a
//! single propstat block when serialized.

use std::collections::BTreeMap;
use std::fmt;

use super::namespace::QName;
use super::property::DavProperty;

/// An HTTP status line carried inside a DAV response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatusLine(pub u16);

impl StatusLine {
    pub const OK: Self = Self(200);
    pub const CREATED: Self = Self(201);
    pub const NO_CONTENT: Self = Self(204);
    pub const MULTI_STATUS: Self = Self(207);
    pub const NOT_MODIFIED: Self = Self(304);
    pub const FORBIDDEN: Self = Self(403);
    pub const NOT_FOUND: Self = Self(404);
    pub const METHOD_NOT_ALLOWED: Self = Self(405);
    pub const CONFLICT: Self = Self(409);
    pub const PRECONDITION_FAILED: Self = Self(412);
    pub const PAYLOAD_TOO_LARGE: Self = Self(413);
    pub const INTERNAL_SERVER_ERROR: Self = Self(500);

    /// Returns the numeric status code.
    #[must_use]
    pub const fn code(self) -> u16 {
        self.0
    }

    /// Returns the reason phrase for this code.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            207 => "Multi-Status",
            304 => "Not Modified",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            409 => "Conflict",
            412 => "Precondition Failed",
            413 => "Payload Too Large",
            500 => "Internal Server Error",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/1.1 {} {}", self.0, self.reason())
    }
}

/// The outcome of reading or writing one property on one resource.
#[derive(Debug, Clone)]
pub struct PropOutcome {
    /// Status code for this property.
    pub status: StatusLine,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// The property element (value present on success, bare name otherwise).
    pub prop: DavProperty,
}

impl PropOutcome {
    /// A 200 outcome with the property's value.
    #[must_use]
    pub fn found(prop: DavProperty) -> Self {
        Self {
            status: StatusLine::OK,
            description: None,
            prop,
        }
    }

    /// A 404 outcome for a property that does not exist here.
    #[must_use]
    pub fn not_found(name: QName) -> Self {
        Self {
            status: StatusLine::NOT_FOUND,
            description: Some("Property not found.".to_owned()),
            prop: DavProperty::not_found(name),
        }
    }

    /// A 409 outcome for a write against a protected property.
    #[must_use]
    pub fn protected(name: QName) -> Self {
        Self {
            status: StatusLine::CONFLICT,
            description: Some("Property is protected.".to_owned()),
            prop: DavProperty::not_found(name),
        }
    }

    /// An outcome with an explicit status.
    #[must_use]
    pub fn with_status(status: StatusLine, prop: DavProperty) -> Self {
        Self {
            status,
            description: None,
            prop,
        }
    }
}

/// A structured error payload inside a `DAV:error` element.
#[derive(Debug, Clone)]
pub enum DavErrorBody {
    /// `DAV:supported-report` listing the report names the target accepts.
    SupportedReport(Vec<QName>),
}

/// One per-resource outcome in a (multi-)status response.
#[derive(Debug, Clone)]
pub struct Status {
    /// The resource href.
    pub href: String,
    /// Coarse status; absent when property outcomes carry the real status.
    pub status: Option<StatusLine>,
    /// Structured error payload.
    pub error: Option<DavErrorBody>,
    /// Human-readable description.
    pub description: Option<String>,
    /// Per-property outcomes.
    pub outcomes: Vec<PropOutcome>,
}

impl Status {
    /// Creates a status with a coarse status line.
    #[must_use]
    pub fn new(href: impl Into<String>, status: StatusLine) -> Self {
        Self {
            href: href.into(),
            status: Some(status),
            error: None,
            description: None,
            outcomes: Vec::new(),
        }
    }

    /// Creates a status carrying per-property outcomes.
    #[must_use]
    pub fn with_outcomes(href: impl Into<String>, outcomes: Vec<PropOutcome>) -> Self {
        Self {
            href: href.into(),
            status: None,
            error: None,
            description: None,
            outcomes,
        }
    }

    /// Attaches a description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attaches a structured error payload.
    #[must_use]
    pub fn error(mut self, error: DavErrorBody) -> Self {
        self.error = Some(error);
        self
    }

    /// ## Summary
    /// Groups property outcomes by (status code, description).
    ///
    /// Outcomes with identical keys are never split across groups. Group
    /// order follows the sorted key, which keeps rendering deterministic.
    #[must_use]
    pub fn propstat_groups(&self) -> BTreeMap<(u16, Option<String>), Vec<&DavProperty>> {
        let mut by_status: BTreeMap<(u16, Option<String>), Vec<&DavProperty>> = BTreeMap::new();
        for outcome in &self.outcomes {
            by_status
                .entry((outcome.status.code(), outcome.description.clone()))
                .or_default()
                .push(&outcome.prop);
        }
        by_status
    }

    /// ## Summary
    /// Returns the status code a single-resource response should use.
    ///
    /// ## Errors
    /// Returns [`NeedsMultistatus`] when the outcomes span more than one
    /// (status code, description) group and only a 207 document can
    /// represent them.
    pub fn single_status(&self) -> Result<StatusLine, NeedsMultistatus> {
        if self.outcomes.is_empty() {
            return Ok(self.status.unwrap_or(StatusLine::OK));
        }
        let groups = self.propstat_groups();
        if groups.len() > 1 {
            return Err(NeedsMultistatus);
        }
        let code = self.outcomes[0].status;
        Ok(code)
    }
}

/// Raised when a response can only be represented as multi-status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeedsMultistatus;

impl fmt::Display for NeedsMultistatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("response requires a multi-status document")
    }
}

impl std::error::Error for NeedsMultistatus {}

/// A full multistatus document.
#[derive(Debug, Clone, Default)]
pub struct Multistatus {
    /// Per-resource responses.
    pub responses: Vec<Status>,
}

impl Multistatus {
    /// Creates an empty multistatus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a multistatus from responses.
    #[must_use]
    pub fn from_responses(responses: Vec<Status>) -> Self {
        Self { responses }
    }

    /// Appends a response.
    pub fn push(&mut self, status: Status) {
        self.responses.push(status);
    }
}
