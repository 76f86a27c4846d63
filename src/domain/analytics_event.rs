//! Analytics event model for asynchronous visit tracking.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use url::Url;

use crate::domain::entities::VisitorInfo;

/// What triggered an analytics event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A short link was resolved and the visitor redirected.
    LinkClick,
    /// A custom domain root redirected to the tenant's external URL.
    RootRedirect,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LinkClick => "link_click",
            Self::RootRedirect => "root_redirect",
        }
    }
}

/// Coarse device class derived from the User-Agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    Desktop,
    Mobile,
    Tablet,
    Bot,
    Unknown,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Bot => "bot",
            Self::Unknown => "unknown",
        }
    }

    /// Classifies a User-Agent string.
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        let Some(ua) = user_agent.map(str::to_ascii_lowercase) else {
            return Self::Unknown;
        };

        if ["bot", "crawler", "spider", "slurp", "preview", "curl/", "wget/"]
            .iter()
            .any(|m| ua.contains(m))
        {
            Self::Bot
        } else if ua.contains("ipad") || ua.contains("tablet") {
            Self::Tablet
        } else if ua.contains("android") && !ua.contains("mobile") {
            Self::Tablet
        } else if ["mobile", "iphone", "ipod", "android"]
            .iter()
            .any(|m| ua.contains(m))
        {
            Self::Mobile
        } else if ua.is_empty() {
            Self::Unknown
        } else {
            Self::Desktop
        }
    }
}

/// A single analytics record, queued for the background worker.
///
/// Built in the request path from [`VisitorInfo`]; the raw client IP never
/// leaves the request, only a one-way hash of it.
#[derive(Debug, Clone)]
pub struct AnalyticsEvent {
    pub kind: EventKind,
    pub user_id: Option<i64>,
    pub link_id: Option<i64>,
    pub host: Option<String>,
    pub path: String,
    pub referrer: Option<String>,
    pub referrer_domain: Option<String>,
    pub device: DeviceType,
    pub browser: Option<&'static str>,
    pub os: Option<&'static str>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub visitor_hash: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl AnalyticsEvent {
    /// Creates an event stamped with the current time.
    pub fn new(
        kind: EventKind,
        user_id: Option<i64>,
        host: Option<&str>,
        path: &str,
        visitor: &VisitorInfo,
    ) -> Self {
        let user_agent = visitor.user_agent.as_deref();

        Self {
            kind,
            user_id,
            link_id: None,
            host: host.map(str::to_string),
            path: path.to_string(),
            referrer: visitor.referrer.clone(),
            referrer_domain: visitor.referrer.as_deref().and_then(referrer_domain),
            device: DeviceType::from_user_agent(user_agent),
            browser: user_agent.and_then(detect_browser),
            os: user_agent.and_then(detect_os),
            country: visitor.country.clone(),
            region: visitor.region.clone(),
            city: visitor.city.clone(),
            visitor_hash: visitor.ip.as_deref().map(hash_visitor),
            occurred_at: Utc::now(),
        }
    }

    /// Attaches the clicked link.
    pub fn with_link(mut self, link_id: i64) -> Self {
        self.link_id = Some(link_id);
        self
    }
}

/// Host part of a referrer URL, without a leading `www.`.
pub fn referrer_domain(referrer: &str) -> Option<String> {
    let url = Url::parse(referrer).ok()?;
    let host = url.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_ascii_lowercase())
}

/// One-way visitor fingerprint: hex SHA-256 of the client IP, truncated.
pub fn hash_visitor(ip: &str) -> String {
    let digest = Sha256::digest(ip.as_bytes());
    hex::encode(&digest[..16])
}

/// Browser family from a User-Agent. Order matters: Edge and Opera embed
/// "Chrome", and Chrome embeds "Safari".
pub fn detect_browser(user_agent: &str) -> Option<&'static str> {
    const BROWSERS: &[(&str, &str)] = &[
        ("edg/", "Edge"),
        ("opr/", "Opera"),
        ("samsungbrowser", "Samsung Internet"),
        ("firefox/", "Firefox"),
        ("fxios", "Firefox"),
        ("crios", "Chrome"),
        ("chrome/", "Chrome"),
        ("safari/", "Safari"),
    ];

    let ua = user_agent.to_ascii_lowercase();
    BROWSERS
        .iter()
        .find(|(marker, _)| ua.contains(marker))
        .map(|(_, name)| *name)
}

/// Operating system family from a User-Agent.
pub fn detect_os(user_agent: &str) -> Option<&'static str> {
    const SYSTEMS: &[(&str, &str)] = &[
        ("iphone", "iOS"),
        ("ipad", "iOS"),
        ("android", "Android"),
        ("windows", "Windows"),
        ("mac os x", "macOS"),
        ("cros", "ChromeOS"),
        ("linux", "Linux"),
    ];

    let ua = user_agent.to_ascii_lowercase();
    SYSTEMS
        .iter()
        .find(|(marker, _)| ua.contains(marker))
        .map(|(_, name)| *name)
}
