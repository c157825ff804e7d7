use crate::catalog::types::{Product, ProductPage};
use futures::StreamExt;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Public DummyJSON endpoint used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "https://dummyjson.com";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The full catalog is about 200 products (~150KB); 5MB leaves headroom
/// without letting a misbehaving server exhaust memory.
const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024;

/// Errors from catalog requests.
///
/// The UI never shows these to the user; they are logged and the previous
/// state is kept.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Body was not the JSON shape we expected
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    /// The base URL cannot carry a path (e.g. `mailto:`)
    #[error("Invalid API base URL: {0}")]
    InvalidUrl(String),
}

/// Parameters of one listing or search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
    /// Search term; `None` means the plain listing endpoint.
    pub search: Option<String>,
}

impl PageRequest {
    /// Build a request. An empty search term selects the listing endpoint.
    pub fn new(page: u32, limit: u32, search: Option<&str>) -> Self {
        Self {
            page,
            limit,
            search: search.filter(|s| !s.is_empty()).map(str::to_owned),
        }
    }

    /// Offset of the first item: `(page - 1) * limit`.
    pub fn skip(&self) -> u32 {
        self.page.max(1).saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Create a redirect policy with loop detection and limited hops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev == url) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );
        attempt.follow()
    })
}

/// Thin typed client over the product API.
///
/// Cloning is cheap: `reqwest::Client` is reference counted, so each
/// background task gets its own handle.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base: Url,
    timeout: Duration,
}

impl CatalogClient {
    /// Build a client for `base` with connection pooling and the given
    /// per-request timeout.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, CatalogError> {
        if base.cannot_be_a_base() {
            return Err(CatalogError::InvalidUrl(base.to_string()));
        }

        let http = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .user_agent(concat!("storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Append path segments to the base URL, keeping any base path prefix.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.base.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|_| CatalogError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// URL for a listing or search page.
    ///
    /// - search term present: `{base}/products/search?limit=&skip=&q=`
    /// - otherwise: `{base}/products?limit=&skip=`
    pub fn page_url(&self, request: &PageRequest) -> Result<Url, CatalogError> {
        let mut url = match request.search {
            Some(_) => self.endpoint(&["products", "search"])?,
            None => self.endpoint(&["products"])?,
        };
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("limit", &request.limit.to_string())
                .append_pair("skip", &request.skip().to_string());
            if let Some(term) = &request.search {
                query.append_pair("q", term);
            }
        }
        Ok(url)
    }

    /// Fetch one page of the listing or of a search.
    pub async fn fetch_page(&self, request: &PageRequest) -> Result<ProductPage, CatalogError> {
        let url = self.page_url(request)?;
        tracing::debug!(
            page = request.page,
            skip = request.skip(),
            search = ?request.search,
            "Fetching product page"
        );
        self.get_json(url).await
    }

    /// Fetch `/products` with no pagination parameters.
    ///
    /// Used only to discover categories; the server applies its own default
    /// page size.
    pub async fn fetch_all(&self) -> Result<ProductPage, CatalogError> {
        let url = self.endpoint(&["products"])?;
        tracing::debug!("Fetching full product set for category discovery");
        self.get_json(url).await
    }

    /// Fetch a single product by id.
    pub async fn fetch_product(&self, id: u64) -> Result<Product, CatalogError> {
        let url = self.endpoint(&["products", &id.to_string()])?;
        tracing::debug!(product_id = id, "Fetching product");
        self.get_json(url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let response = tokio::time::timeout(self.timeout, self.http.get(url.clone()).send())
            .await
            .map_err(|_| CatalogError::Timeout)??;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Catalog request failed");
            return Err(CatalogError::HttpStatus(status.as_u16()));
        }

        let bytes = tokio::time::timeout(
            self.timeout,
            read_limited_bytes(response, MAX_RESPONSE_SIZE),
        )
        .await
        .map_err(|_| CatalogError::Timeout)??;

        Ok(serde_json::from_slice(&bytes)?)
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, CatalogError> {
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(CatalogError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(CatalogError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client(base: &str) -> CatalogClient {
        CatalogClient::new(Url::parse(base).unwrap(), DEFAULT_TIMEOUT).unwrap()
    }

    #[test]
    fn skip_is_zero_based_offset() {
        assert_eq!(PageRequest::new(1, 12, None).skip(), 0);
        assert_eq!(PageRequest::new(3, 12, None).skip(), 24);
        // Page 0 is treated as page 1
        assert_eq!(PageRequest::new(0, 12, None).skip(), 0);
    }

    #[test]
    fn empty_search_term_selects_listing() {
        assert_eq!(PageRequest::new(1, 12, Some("")).search, None);
        assert_eq!(
            PageRequest::new(1, 12, Some("phone")).search.as_deref(),
            Some("phone")
        );
    }

    #[test]
    fn listing_url_has_limit_and_skip() {
        let url = client(DEFAULT_API_BASE)
            .page_url(&PageRequest::new(2, 12, None))
            .unwrap();
        assert_eq!(url.as_str(), "https://dummyjson.com/products?limit=12&skip=12");
    }

    #[test]
    fn search_url_encodes_term() {
        let url = client(DEFAULT_API_BASE)
            .page_url(&PageRequest::new(3, 12, Some("red lipstick")))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://dummyjson.com/products/search?limit=12&skip=24&q=red+lipstick"
        );
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let c = client("https://api.example.com/v2/");
        let url = c.page_url(&PageRequest::new(1, 12, None)).unwrap();
        assert_eq!(url.path(), "/v2/products");

        let c = client("https://api.example.com/v2");
        let url = c.endpoint(&["products", "5"]).unwrap();
        assert_eq!(url.path(), "/v2/products/5");
    }

    #[test]
    fn non_base_url_rejected() {
        let err = CatalogClient::new(Url::parse("mailto:shop@example.com").unwrap(), DEFAULT_TIMEOUT)
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidUrl(_)));
    }
}
