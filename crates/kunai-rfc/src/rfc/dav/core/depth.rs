//! Depth header values.

use std::fmt;

/// Traversal depth carried by the `Depth` request header.
///
/// Handlers that omit the header treat it as [`Depth::Zero`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Depth {
    /// The target resource only.
    #[default]
    Zero,
    /// The target and its direct members.
    One,
    /// The target and every descendant.
    Infinity,
}

impl Depth {
    /// Parses a `Depth` header value, case-insensitively.
    #[must_use]
    pub fn from_header(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "0" => Some(Self::Zero),
            "1" => Some(Self::One),
            "infinity" => Some(Self::Infinity),
            _ => None,
        }
    }

    /// The canonical header spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::One => "1",
            Self::Infinity => "infinity",
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
