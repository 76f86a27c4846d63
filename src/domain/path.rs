//! Typed request path segmentation and reserved-route membership.

use std::collections::HashSet;

/// First segment of the internal short-link resolution path (`/r/{code}`).
pub const SHORT_LINK_SEGMENT: &str = "r";

/// First segments that always pass through without a tenant lookup.
pub const RESERVED_SEGMENTS: &[&str] = &[
    "api",
    "_next",
    "static",
    "assets",
    "admin",
    "dashboard",
    "login",
    "logout",
    "signup",
    "settings",
    "health",
    SHORT_LINK_SEGMENT,
];

/// File extensions served as static assets.
pub const STATIC_EXTENSIONS: &[&str] = &[
    "ico",
    "png",
    "jpg",
    "jpeg",
    "gif",
    "svg",
    "webp",
    "avif",
    "css",
    "js",
    "map",
    "txt",
    "xml",
    "json",
    "webmanifest",
    "woff",
    "woff2",
    "ttf",
];

/// Non-empty segments of a request path.
///
/// `/alice//promo/` and `/alice/promo` both parse to `["alice", "promo"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegments<'a> {
    segments: Vec<&'a str>,
}

impl<'a> PathSegments<'a> {
    /// Splits a path on `/`, dropping empty segments and any query string.
    pub fn parse(path: &'a str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or(path);

        Self {
            segments: path.split('/').filter(|s| !s.is_empty()).collect(),
        }
    }

    pub fn first(&self) -> Option<&'a str> {
        self.segments.first().copied()
    }

    pub fn last(&self) -> Option<&'a str> {
        self.segments.last().copied()
    }

    pub fn as_slice(&self) -> &[&'a str] {
        &self.segments
    }
}

/// Membership checks for paths that bypass tenant routing.
#[derive(Debug, Clone)]
pub struct ReservedRoutes {
    segments: HashSet<&'static str>,
    extensions: HashSet<&'static str>,
}

impl ReservedRoutes {
    /// Returns true if the first segment is reserved.
    pub fn is_reserved_segment(&self, segment: &str) -> bool {
        self.segments.contains(segment)
    }

    /// Returns true if the last segment carries a static-file extension.
    pub fn is_static_asset(&self, path: &PathSegments<'_>) -> bool {
        path.last()
            .and_then(|last| last.rsplit_once('.'))
            .is_some_and(|(_, ext)| self.extensions.contains(ext.to_ascii_lowercase().as_str()))
    }

    /// Returns true if the request must pass through untouched.
    pub fn is_passthrough(&self, path: &PathSegments<'_>) -> bool {
        path.first().is_some_and(|s| self.is_reserved_segment(s)) || self.is_static_asset(path)
    }
}

impl Default for ReservedRoutes {
    fn default() -> Self {
        Self {
            segments: RESERVED_SEGMENTS.iter().copied().collect(),
            extensions: STATIC_EXTENSIONS.iter().copied().collect(),
        }
    }
}
