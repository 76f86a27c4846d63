//! Hostname classification for tenant addressing.
//!
//! Every request's `Host` header is classified into one of three addressing
//! modes before any lookup happens:
//!
//! - **Main domain** - a configured base domain or its `www.` alias
//! - **User subdomain** - `<label>.<base-domain>` where `<label>` is not reserved
//! - **Custom domain** - anything else; resolved against verified custom domains
//!
//! Classification is pure and allocation-light; it is recomputed per request.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::domain::entities::LinkScope;

/// A single DNS label: 1-63 chars, alphanumeric with inner hyphens.
static LABEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?$").unwrap());

/// Subdomain labels that never identify a tenant.
pub const RESERVED_SUBDOMAINS: &[&str] = &[
    "www", "api", "app", "admin", "mail", "static", "cdn", "assets", "dashboard", "docs", "blog",
    "help", "status", "support",
];

/// Label that turns a base domain into an alias of the main domain.
const MAIN_DOMAIN_ALIAS: &str = "www";

/// Addressing mode derived from a request host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostClass {
    /// The platform's own domain (or its `www.` alias).
    Main,
    /// A tenant subdomain; holds the lowercase label.
    Subdomain(String),
    /// Candidate custom domain; holds the normalized host.
    Custom(String),
}

impl HostClass {
    pub fn is_main_domain(&self) -> bool {
        matches!(self, Self::Main)
    }

    pub fn is_user_subdomain(&self) -> bool {
        matches!(self, Self::Subdomain(_))
    }

    /// Returns the tenant label for subdomain-addressed hosts.
    pub fn subdomain(&self) -> Option<&str> {
        match self {
            Self::Subdomain(label) => Some(label),
            _ => None,
        }
    }

    /// Short-link scope a host is bound to; the main domain has none.
    pub fn link_scope(&self) -> Option<LinkScope> {
        match self {
            Self::Main => None,
            Self::Subdomain(label) => Some(LinkScope::Subdomain(label.clone())),
            Self::Custom(host) => Some(LinkScope::CustomDomain(host.clone())),
        }
    }
}

/// Classifies hosts against a fixed set of base domains.
#[derive(Debug, Clone)]
pub struct HostClassifier {
    base_domains: Vec<String>,
    reserved: HashSet<&'static str>,
}

impl HostClassifier {
    /// Creates a classifier for the given base domains.
    ///
    /// Base domains are normalized the same way request hosts are, so
    /// `Example.com:443` and `example.com` configure the same domain.
    pub fn new<I, S>(base_domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let base_domains = base_domains
            .into_iter()
            .filter_map(|d| normalize_host(d.as_ref()))
            .collect();

        Self {
            base_domains,
            reserved: RESERVED_SUBDOMAINS.iter().copied().collect(),
        }
    }

    /// Classifies a raw `Host` header value.
    ///
    /// Malformed input (empty, bad port syntax) classifies as a custom domain
    /// candidate, which simply misses at lookup time.
    pub fn classify(&self, host_header: &str) -> HostClass {
        let Some(host) = normalize_host(host_header) else {
            return HostClass::Custom(host_header.trim().to_ascii_lowercase());
        };

        for base in &self.base_domains {
            if host == *base {
                return HostClass::Main;
            }

            let Some(label) = host
                .strip_suffix(base.as_str())
                .and_then(|rest| rest.strip_suffix('.'))
            else {
                continue;
            };

            if label == MAIN_DOMAIN_ALIAS {
                return HostClass::Main;
            }

            if LABEL_REGEX.is_match(label) && !self.reserved.contains(label) {
                return HostClass::Subdomain(label.to_string());
            }
        }

        HostClass::Custom(host)
    }
}

/// Classifies `host_header` against `base_domains`.
///
/// Convenience wrapper for one-off classification; long-lived callers should
/// build a [`HostClassifier`] once.
pub fn classify<S: AsRef<str>>(host_header: &str, base_domains: &[S]) -> HostClass {
    HostClassifier::new(base_domains.iter().map(|d| d.as_ref())).classify(host_header)
}

/// Lowercases a host, strips its port and a single trailing dot.
///
/// Bracketed IPv6 literals keep their brackets (`[::1]:8080` -> `[::1]`).
/// Returns `None` for empty hosts.
pub fn normalize_host(raw: &str) -> Option<String> {
    let raw = raw.trim();

    let host = if raw.starts_with('[') {
        match raw.find(']') {
            Some(end) => &raw[..=end],
            None => raw,
        }
    } else {
        raw.split(':').next().unwrap_or(raw)
    };

    let host = host.strip_suffix('.').unwrap_or(host);

    if host.is_empty() {
        return None;
    }

    Some(host.to_ascii_lowercase())
}
