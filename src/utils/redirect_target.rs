//! Validation of external redirect targets.

use url::Url;

/// Reasons a URL may not be used as a redirect target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RedirectTargetError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Checks that `input` is an absolute `http`/`https` URL with a host.
///
/// Returns the trimmed input unchanged on success, so the `Location` header
/// carries exactly what the tenant configured.
///
/// # Security
///
/// Rejects `javascript:`, `data:`, `file:` and relative targets.
///
/// # Errors
///
/// See [`RedirectTargetError`].
pub fn validate_redirect_target(input: &str) -> Result<&str, RedirectTargetError> {
    let trimmed = input.trim();
    let url =
        Url::parse(trimmed).map_err(|e| RedirectTargetError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(RedirectTargetError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(RedirectTargetError::MissingHost);
    }

    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert_eq!(
            validate_redirect_target("https://bob-store.example"),
            Ok("https://bob-store.example")
        );
        assert_eq!(
            validate_redirect_target("  http://example.com/a?b=c  "),
            Ok("http://example.com/a?b=c")
        );
    }

    #[test]
    fn test_rejects_dangerous_schemes() {
        assert_eq!(
            validate_redirect_target("javascript:alert(1)"),
            Err(RedirectTargetError::UnsupportedProtocol)
        );
        assert_eq!(
            validate_redirect_target("data:text/html,hi"),
            Err(RedirectTargetError::UnsupportedProtocol)
        );
    }

    #[test]
    fn test_rejects_relative_urls() {
        assert!(matches!(
            validate_redirect_target("/just/a/path"),
            Err(RedirectTargetError::InvalidFormat(_))
        ));
        assert!(matches!(
            validate_redirect_target(""),
            Err(RedirectTargetError::InvalidFormat(_))
        ));
    }
}
