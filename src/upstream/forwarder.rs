//! Outbound request forwarding.
//!
//! # Responsibilities
//! - Build the upstream URL (base + rewritten path + re-encoded query)
//! - Apply the content-type / credential / override header stack, in order
//! - Dispatch with the original method and a streamed body
//! - Pass the upstream response back verbatim; 101 responses untouched
//!
//! # Design Decisions
//! - Bodies are never buffered; backpressure flows caller ↔ upstream
//! - Later header writes win: overrides beat the credential, which beats the
//!   default content type
//! - Query strings are re-encoded, so ordering and escaping normalize; only
//!   semantic equality is guaranteed
//! - No retries, timeouts, or circuit breaking; a network failure becomes a
//!   502 at the HTTP layer

use std::collections::HashMap;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderName, HeaderValue, Request, Response, StatusCode, Uri},
    response::IntoResponse,
    BoxError,
};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use url::form_urlencoded;

use crate::upstream::credentials::Credential;

/// Errors surfaced while forwarding to an upstream.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("failed to build upstream request: {0}")]
    Build(#[from] axum::http::Error),

    #[error("invalid header `{0}` in outbound header stack")]
    InvalidHeader(String),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response<Body> {
        (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
    }
}

/// Dispatches requests to upstreams and shuttles responses back.
pub struct Forwarder {
    client: Client<HttpsConnector<HttpConnector>, Body>,
}

impl Forwarder {
    pub fn new() -> Self {
        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(https);
        Self { client }
    }

    /// Forward a request to `upstream_base` at `upstream_path`.
    ///
    /// The inbound body is handed to the client as-is and streams through;
    /// the upstream response body streams back the same way.
    pub async fn forward(
        &self,
        request: Request<Body>,
        upstream_base: &str,
        upstream_path: &str,
        credential: Option<Credential>,
        overrides: &HashMap<String, String>,
    ) -> Result<Response<Body>, ForwardError> {
        let (header_credential, query_credential) = match credential {
            Some(Credential::Header { name, value }) => (Some((name, value)), None),
            Some(Credential::Query { name, value }) => (None, Some((name, value))),
            None => (None, None),
        };

        let (parts, body) = request.into_parts();
        let url = build_upstream_url(
            upstream_base,
            upstream_path,
            &parts.uri,
            query_credential.as_ref().map(|(name, value)| (name.as_str(), value.as_str())),
        );

        let mut outbound = Request::builder().method(parts.method).uri(url).body(body)?;
        apply_headers(
            outbound.headers_mut(),
            header_credential.as_ref().map(|(name, value)| (name.as_str(), value.as_str())),
            overrides,
        )?;

        let upstream_response = self.client.request(outbound).await?;
        Ok(passthrough_response(upstream_response))
    }
}

impl Default for Forwarder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the upstream URL from the base, rewritten path, and original query.
///
/// An empty base forwards the original request URI unmodified. The query
/// string is re-encoded with standard form-urlencoding, which normalizes
/// ordering and escaping.
pub fn build_upstream_url(
    base: &str,
    path: &str,
    original: &Uri,
    query_credential: Option<(&str, &str)>,
) -> String {
    if base.is_empty() {
        return original.to_string();
    }

    let mut url = format!("{}{}", base, path);
    let mut pairs: Vec<(String, String)> = original
        .query()
        .map(|query| form_urlencoded::parse(query.as_bytes()).into_owned().collect())
        .unwrap_or_default();
    if let Some((name, value)) = query_credential {
        pairs.push((name.to_string(), value.to_string()));
    }
    if !pairs.is_empty() {
        let encoded =
            form_urlencoded::Serializer::new(String::new()).extend_pairs(pairs).finish();
        url.push('?');
        url.push_str(&encoded);
    }
    url
}

/// Apply the outbound header stack.
///
/// Order is part of the contract: the JSON content type first, then the
/// injected credential, then per-route overrides. Later writes win, so an
/// override can replace either earlier layer.
pub fn apply_headers(
    headers: &mut HeaderMap,
    credential: Option<(&str, &str)>,
    overrides: &HashMap<String, String>,
) -> Result<(), ForwardError> {
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some((name, value)) = credential {
        headers.insert(parse_header_name(name)?, parse_header_value(name, value)?);
    }

    for (name, value) in overrides {
        headers.insert(parse_header_name(name)?, parse_header_value(name, value)?);
    }

    Ok(())
}

fn parse_header_name(name: &str) -> Result<HeaderName, ForwardError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| ForwardError::InvalidHeader(name.to_string()))
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue, ForwardError> {
    HeaderValue::from_str(value).map_err(|_| ForwardError::InvalidHeader(name.to_string()))
}

/// Shuttle the upstream response back with minimal transformation.
///
/// `101 Switching Protocols` responses are returned as-is so the upgrade
/// handshake survives. Everything else is rebuilt from the upstream's
/// status, verbatim header map, and streamed body.
pub fn passthrough_response<B>(upstream: Response<B>) -> Response<Body>
where
    B: hyper::body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    if upstream.status() == StatusCode::SWITCHING_PROTOCOLS {
        return upstream.map(Body::new);
    }

    let (parts, body) = upstream.into_parts();
    let mut response = Response::new(Body::new(body));
    *response.status_mut() = parts.status;
    *response.headers_mut() = parts.headers;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as Map;

    fn parse_query(url: &str) -> Map<String, String> {
        let query = url.split_once('?').map(|(_, q)| q).unwrap_or("");
        form_urlencoded::parse(query.as_bytes()).into_owned().collect()
    }

    #[test]
    fn joins_base_and_rewritten_path() {
        let uri: Uri = "/lifi/v1/quote".parse().unwrap();
        let url = build_upstream_url("https://li.quest", "/v1/quote", &uri, None);
        assert_eq!(url, "https://li.quest/v1/quote");
    }

    #[test]
    fn query_survives_with_semantic_equality() {
        let uri: Uri = "/lifi/v1/quote?x=1&y=2".parse().unwrap();
        let url = build_upstream_url("https://li.quest", "/v1/quote", &uri, None);

        assert!(url.starts_with("https://li.quest/v1/quote?"));
        let params = parse_query(&url);
        assert_eq!(params.get("x").map(String::as_str), Some("1"));
        assert_eq!(params.get("y").map(String::as_str), Some("2"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn empty_base_forwards_the_original_uri() {
        let uri: Uri = "https://original.example/path?a=1".parse().unwrap();
        let url = build_upstream_url("", "/ignored", &uri, None);
        assert_eq!(url, "https://original.example/path?a=1");
    }

    #[test]
    fn query_credential_is_appended() {
        let uri: Uri = "/graph/uniswap?block=5".parse().unwrap();
        let url = build_upstream_url(
            "https://gateway.thegraph.com",
            "/subgraphs/id/abc",
            &uri,
            Some(("api-key", "s3cret")),
        );

        let params = parse_query(&url);
        assert_eq!(params.get("block").map(String::as_str), Some("5"));
        assert_eq!(params.get("api-key").map(String::as_str), Some("s3cret"));
    }

    #[test]
    fn content_type_is_always_json() {
        let mut headers = HeaderMap::new();
        apply_headers(&mut headers, None, &Map::new()).unwrap();
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn credential_header_is_injected_alone() {
        let mut headers = HeaderMap::new();
        apply_headers(&mut headers, Some(("x-lifi-api-key", "secret")), &Map::new()).unwrap();

        assert_eq!(headers.get("x-lifi-api-key").unwrap(), "secret");
        assert!(headers.get("X-API-KEY").is_none());
        assert!(headers.get("API-KEY").is_none());
    }

    #[test]
    fn override_beats_the_injected_credential() {
        let mut headers = HeaderMap::new();
        let mut overrides = Map::new();
        overrides.insert("X-API-KEY".to_string(), "custom".to_string());

        apply_headers(&mut headers, Some(("X-API-KEY", "from-secret")), &overrides).unwrap();

        assert_eq!(headers.get("X-API-KEY").unwrap(), "custom");
    }

    #[test]
    fn override_can_replace_the_content_type() {
        let mut headers = HeaderMap::new();
        let mut overrides = Map::new();
        overrides.insert("Content-Type".to_string(), "text/plain".to_string());

        apply_headers(&mut headers, None, &overrides).unwrap();

        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/plain");
    }

    #[test]
    fn invalid_override_name_is_reported() {
        let mut headers = HeaderMap::new();
        let mut overrides = Map::new();
        overrides.insert("bad header".to_string(), "x".to_string());

        let err = apply_headers(&mut headers, None, &overrides).unwrap_err();
        assert!(matches!(err, ForwardError::InvalidHeader(name) if name == "bad header"));
    }

    #[test]
    fn switching_protocols_passes_through_untouched() {
        let upstream = Response::builder()
            .status(StatusCode::SWITCHING_PROTOCOLS)
            .header("upgrade", "websocket")
            .header("sec-websocket-accept", "s3pPLMBiTxaQ9kYGzzhZRbK+xOo=")
            .extension("marker")
            .body(Body::empty())
            .unwrap();

        let response = passthrough_response(upstream);

        assert_eq!(response.status(), StatusCode::SWITCHING_PROTOCOLS);
        assert_eq!(response.headers().get("upgrade").unwrap(), "websocket");
        assert_eq!(
            response.headers().get("sec-websocket-accept").unwrap(),
            "s3pPLMBiTxaQ9kYGzzhZRbK+xOo="
        );
        // The raw response object is kept, extensions included.
        assert_eq!(response.extensions().get::<&str>(), Some(&"marker"));
    }

    #[tokio::test]
    async fn response_passthrough_keeps_status_headers_and_body() {
        let upstream = Response::builder()
            .status(StatusCode::IM_A_TEAPOT)
            .header("x-foo", "bar")
            .body(Body::from(r#"{"ok":false}"#))
            .unwrap();

        let response = passthrough_response(upstream);

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(response.headers().get("x-foo").unwrap(), "bar");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"ok":false}"#);
    }
}
