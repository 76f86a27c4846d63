//! Tenant entity resolved from a subdomain or a verified custom domain.

use std::fmt;
use std::str::FromStr;

/// What a tenant's custom domain serves at its root path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootDomainMode {
    /// Serve the tenant's bio/profile page.
    #[default]
    Bio,
    /// Redirect visitors to the configured external URL.
    Redirect,
}

impl RootDomainMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bio => "bio",
            Self::Redirect => "redirect",
        }
    }
}

impl FromStr for RootDomainMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bio" => Ok(Self::Bio),
            "redirect" => Ok(Self::Redirect),
            other => Err(format!("unknown root domain mode '{}'", other)),
        }
    }
}

impl fmt::Display for RootDomainMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable snapshot of a tenant as seen by the routing core.
///
/// Never mutated here; changes made elsewhere become visible once the cached
/// snapshot expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantRecord {
    pub user_id: i64,
    pub username: String,
    pub root_domain_mode: RootDomainMode,
    pub root_domain_redirect_url: Option<String>,
}

impl TenantRecord {
    /// Creates a tenant in bio mode.
    pub fn new(user_id: i64, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            root_domain_mode: RootDomainMode::Bio,
            root_domain_redirect_url: None,
        }
    }

    /// Switches the tenant to redirect mode with the given target.
    pub fn with_redirect(mut self, url: impl Into<String>) -> Self {
        self.root_domain_mode = RootDomainMode::Redirect;
        self.root_domain_redirect_url = Some(url.into());
        self
    }

    /// Returns the root redirect target when redirect mode is active and a
    /// non-blank URL is configured.
    pub fn root_redirect_target(&self) -> Option<&str> {
        if self.root_domain_mode != RootDomainMode::Redirect {
            return None;
        }

        self.root_domain_redirect_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
