//! Routing decisions produced for each inbound request.

use url::Url;

use crate::domain::entities::LinkScope;

/// What the HTTP layer should do with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingDecision {
    /// Forward the request unchanged.
    Passthrough,
    /// Serve the request from a different internal path.
    Rewrite(Rewrite),
    /// Answer `302 Found` pointing at an external URL.
    Redirect { location: String },
    /// The host or link does not exist.
    NotFound,
    /// A backing lookup failed or timed out.
    ServiceUnavailable { retry_after_secs: u64 },
}

impl RoutingDecision {
    /// Short label used for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Passthrough => "passthrough",
            Self::Rewrite(_) => "rewrite",
            Self::Redirect { .. } => "redirect",
            Self::NotFound => "not_found",
            Self::ServiceUnavailable { .. } => "service_unavailable",
        }
    }
}

/// An internal rewrite target plus the scope it was resolved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub path: String,
    pub scope: LinkScope,
}

impl Rewrite {
    /// Rewrite to `/{segment}` with the given scope.
    ///
    /// The segment is percent-encoded, so usernames and codes cannot inject
    /// additional path components.
    pub fn to_segments(segments: &[&str], scope: LinkScope) -> Self {
        let mut url = internal_base();
        if let Ok(mut path) = url.path_segments_mut() {
            path.clear().extend(segments);
        }

        Self {
            path: url.path().to_string(),
            scope,
        }
    }

    /// Builds the rewritten path and query.
    ///
    /// Keeps the caller's query string except for scope parameters, which are
    /// replaced by this rewrite's scope so clients cannot spoof it.
    pub fn path_and_query(&self, original_query: Option<&str>) -> String {
        let mut url = internal_base();
        url.set_path(&self.path);

        {
            let mut query = url.query_pairs_mut();
            if let Some(original) = original_query {
                for (key, value) in url::form_urlencoded::parse(original.as_bytes()) {
                    if key != LinkScope::SUBDOMAIN_PARAM && key != LinkScope::DOMAIN_PARAM {
                        query.append_pair(&key, &value);
                    }
                }
            }
            if let Some((key, value)) = self.scope.query_pair() {
                query.append_pair(key, value);
            }
        }

        if url.query() == Some("") {
            url.set_query(None);
        }

        url[url::Position::BeforePath..].to_string()
    }
}

fn internal_base() -> Url {
    // A constant, valid base URL; parsing cannot fail.
    Url::parse("http://internal.invalid/").expect("static base URL is valid")
}
