use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Errors that can occur during URL validation.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// Plain http to a host that is not loopback.
    #[error("Insecure URL: https required (except localhost)")]
    Insecure,
    /// The URL points to a private/internal IP address.
    #[error("Private IP address not allowed: {0}")]
    PrivateIp(String),
    /// The URL points to localhost.
    #[error("Localhost not allowed")]
    Localhost,
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
}

fn parse_http(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
    if url.host_str().is_none() {
        return Err(UrlValidationError::MissingHost);
    }
    Ok(url)
}

fn host_ip(url: &Url) -> Option<IpAddr> {
    let host = url.host_str()?;
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host)
        .parse::<IpAddr>()
        .ok()
}

fn is_loopback_host(url: &Url) -> bool {
    url.host_str() == Some("localhost") || host_ip(url).is_some_and(|ip| ip.is_loopback())
}

/// Validates a URL before handing it to the system browser.
///
/// Image links come from the product API, so they are treated as untrusted:
/// only public http(s) hosts are accepted.
///
/// ```
/// use storefront::util::validate_url_for_open;
///
/// assert!(validate_url_for_open("https://cdn.dummyjson.com/products/images/1.png").is_ok());
/// assert!(validate_url_for_open("http://localhost/admin").is_err());
/// assert!(validate_url_for_open("file:///etc/passwd").is_err());
/// ```
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = parse_http(url_str)?;

    if is_loopback_host(&url) {
        return Err(UrlValidationError::Localhost);
    }
    if let Some(ip) = host_ip(&url) {
        if is_private_ip(&ip) {
            return Err(UrlValidationError::PrivateIp(ip.to_string()));
        }
    }

    Ok(url)
}

/// Validates the product API base URL.
///
/// https is required for remote hosts; plain http is accepted only for
/// loopback hosts so a local mock server can stand in for the real API.
///
/// ```
/// use storefront::util::validate_api_base;
///
/// assert!(validate_api_base("https://dummyjson.com").is_ok());
/// assert!(validate_api_base("http://127.0.0.1:8080").is_ok());
/// assert!(validate_api_base("http://dummyjson.com").is_err());
/// ```
pub fn validate_api_base(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = parse_http(url_str)?;
    if url.scheme() == "http" && !is_loopback_host(&url) {
        return Err(UrlValidationError::Insecure);
    }
    Ok(url)
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            ipv4.is_private() || ipv4.is_loopback() || ipv4.is_link_local() || ipv4.is_unspecified()
        }
        IpAddr::V6(ipv6) => {
            if ipv6.is_loopback() || ipv6.is_unspecified() {
                return true;
            }
            let segments = ipv6.segments();
            // fc00::/7 unique local, fe80::/10 link local
            (segments[0] & 0xfe00) == 0xfc00 || (segments[0] & 0xffc0) == 0xfe80
        }
    }
}
