//! Short link entity and the scope it is resolved under.

/// An active-or-inactive short link as stored by the link service.
///
/// Links with `owner_user_id == None` are platform-level links served on the
/// main domain; owned links are only reachable through their tenant's scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLinkRecord {
    pub id: i64,
    pub short_code: String,
    pub destination_url: String,
    pub owner_user_id: Option<i64>,
    pub is_active: bool,
}

impl ShortLinkRecord {
    /// Creates an active link.
    pub fn new(
        id: i64,
        short_code: impl Into<String>,
        destination_url: impl Into<String>,
        owner_user_id: Option<i64>,
    ) -> Self {
        Self {
            id,
            short_code: short_code.into(),
            destination_url: destination_url.into(),
            owner_user_id,
            is_active: true,
        }
    }
}

/// Address space a short code is looked up in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LinkScope {
    /// Links owned by the tenant behind `<label>.<base-domain>`.
    Subdomain(String),
    /// Links owned by the tenant behind a verified custom domain.
    CustomDomain(String),
    /// Unowned platform links.
    Global,
}

impl LinkScope {
    /// Query parameter name used to carry a subdomain scope.
    pub const SUBDOMAIN_PARAM: &'static str = "subdomain";
    /// Query parameter name used to carry a custom-domain scope.
    pub const DOMAIN_PARAM: &'static str = "domain";

    /// Builds a scope from rewrite query parameters.
    ///
    /// Blank values are ignored; a subdomain wins when both are present.
    pub fn from_params(subdomain: Option<&str>, domain: Option<&str>) -> Self {
        let non_blank = |v: Option<&str>| {
            v.map(|s| s.trim().to_ascii_lowercase())
                .filter(|s| !s.is_empty())
        };

        if let Some(label) = non_blank(subdomain) {
            Self::Subdomain(label)
        } else if let Some(host) = non_blank(domain) {
            Self::CustomDomain(host)
        } else {
            Self::Global
        }
    }

    /// The `(name, value)` query pair that carries this scope, if any.
    pub fn query_pair(&self) -> Option<(&'static str, &str)> {
        match self {
            Self::Subdomain(label) => Some((Self::SUBDOMAIN_PARAM, label)),
            Self::CustomDomain(host) => Some((Self::DOMAIN_PARAM, host)),
            Self::Global => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_from_params() {
        assert_eq!(
            LinkScope::from_params(Some("Alice"), None),
            LinkScope::Subdomain("alice".to_string())
        );
        assert_eq!(
            LinkScope::from_params(None, Some("alice.com")),
            LinkScope::CustomDomain("alice.com".to_string())
        );
        assert_eq!(LinkScope::from_params(Some(" "), None), LinkScope::Global);
        assert_eq!(LinkScope::from_params(None, None), LinkScope::Global);
    }

    #[test]
    fn test_scope_query_pair() {
        let scope = LinkScope::CustomDomain("alice.com".to_string());
        assert_eq!(scope.query_pair(), Some(("domain", "alice.com")));
        assert_eq!(LinkScope::Global.query_pair(), None);
    }

    #[test]
    fn test_new_link_is_active() {
        let link = ShortLinkRecord::new(1, "promo", "https://example.com", Some(7));
        assert!(link.is_active);
        assert_eq!(link.owner_user_id, Some(7));
    }
}
