//! Host and visitor metadata extraction from HTTP request headers.

use axum::extract::ConnectInfo;
use axum::http::{Extensions, HeaderMap};
use std::net::SocketAddr;

use crate::domain::entities::VisitorInfo;

const X_FORWARDED_HOST: &str = "x-forwarded-host";
const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Country headers set by common edge providers, in priority order.
const COUNTRY_HEADERS: &[&str] = &[
    "cf-ipcountry",
    "x-vercel-ip-country",
    "cloudfront-viewer-country",
    "x-country-code",
];
const REGION_HEADERS: &[&str] = &["x-vercel-ip-country-region", "cloudfront-viewer-country-region"];
const CITY_HEADERS: &[&str] = &["x-vercel-ip-city", "cf-ipcity", "cloudfront-viewer-city"];

/// Returns the raw host the client addressed, port included.
///
/// Behind a trusted proxy the first `X-Forwarded-Host` value wins over `Host`.
/// Returns `None` if no usable header is present or it is not valid UTF-8.
pub fn request_host(headers: &HeaderMap, behind_proxy: bool) -> Option<&str> {
    if behind_proxy
        && let Some(forwarded) = header_str(headers, X_FORWARDED_HOST)
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    {
        return Some(forwarded);
    }

    header_str(headers, "host").filter(|v| !v.trim().is_empty())
}

/// Collects analytics metadata for the current request.
///
/// The client IP comes from the socket peer address, or from
/// `X-Forwarded-For` / `X-Real-IP` when `behind_proxy` is set.
pub fn visitor_info(headers: &HeaderMap, extensions: &Extensions, behind_proxy: bool) -> VisitorInfo {
    let forwarded_ip = || {
        header_str(headers, X_FORWARDED_FOR)
            .and_then(|v| v.split(',').next())
            .or_else(|| header_str(headers, X_REAL_IP))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    let peer_ip = || {
        extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
    };

    let ip = if behind_proxy {
        forwarded_ip().or_else(peer_ip)
    } else {
        peer_ip()
    };

    VisitorInfo {
        ip,
        user_agent: owned(headers, "user-agent"),
        referrer: owned(headers, "referer"),
        country: first_of(headers, COUNTRY_HEADERS).filter(|c| c != "XX"),
        region: first_of(headers, REGION_HEADERS),
        city: first_of(headers, CITY_HEADERS),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn owned(headers: &HeaderMap, name: &str) -> Option<String> {
    header_str(headers, name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn first_of(headers: &HeaderMap, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| owned(headers, name))
}
