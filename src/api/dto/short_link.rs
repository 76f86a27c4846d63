//! DTOs for the short-link resolution endpoint.

use serde::Deserialize;

use crate::domain::entities::LinkScope;

/// Scope named in the query of a short-link request.
///
/// The routing middleware sets it when rewriting tenant paths. Requests for
/// `/r/{code}` can also carry it directly, so it is only trusted where the
/// host does not bind a scope of its own.
#[derive(Debug, Default, Deserialize)]
pub struct ScopeParams {
    pub subdomain: Option<String>,
    pub domain: Option<String>,
}

impl ScopeParams {
    pub fn scope(&self) -> LinkScope {
        LinkScope::from_params(self.subdomain.as_deref(), self.domain.as_deref())
    }

    /// Scope to resolve in for a request whose host binds `host_scope`.
    ///
    /// Tenant hosts always resolve in their own scope; a query naming any
    /// other scope yields `None`. Hosts without a scope use the query as is.
    pub fn effective_scope(&self, host_scope: Option<LinkScope>) -> Option<LinkScope> {
        let requested = self.scope();

        match host_scope {
            None => Some(requested),
            Some(own) if requested == LinkScope::Global || requested == own => Some(own),
            Some(_) => None,
        }
    }
}
