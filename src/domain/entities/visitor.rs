//! Request-derived visitor metadata attached to analytics events.

/// Client metadata captured from request headers.
///
/// Every field is optional; missing headers simply leave gaps in analytics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitorInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
}
