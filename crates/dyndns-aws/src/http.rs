//! Shared HTTP plumbing for the AWS clients

use chrono::Utc;
use dyndns_core::{Error, Result};
use std::time::Duration;

use crate::sigv4::{SignableRequest, SigV4Signer};
use crate::xml;

/// Default HTTP timeout for API requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the HTTP client used by every AWS collaborator
pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(DEFAULT_HTTP_TIMEOUT)
        .build()
        .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))
}

/// Host header value for an endpoint URL
///
/// The endpoint must be a bare origin. The signature covers only the request
/// path, so a base path on the endpoint would be sent but never signed.
pub fn endpoint_host(endpoint: &str) -> Result<String> {
    let authority = endpoint
        .strip_prefix("http://")
        .or_else(|| endpoint.strip_prefix("https://"))
        .unwrap_or(endpoint)
        .trim_end_matches('/');

    if authority.is_empty() {
        return Err(Error::config(format!("Invalid endpoint URL: {}", endpoint)));
    }
    if authority.contains(['/', '?', '#']) {
        return Err(Error::config(format!(
            "Endpoint URL must not carry a path or query: {}",
            endpoint
        )));
    }
    Ok(authority.to_string())
}

/// A signed request ready to send
pub struct SignedRequest<'a> {
    pub endpoint: &'a str,
    pub request: SignableRequest<'a>,
}

impl SignedRequest<'_> {
    /// Sign and send the request
    pub async fn send(
        &self,
        client: &reqwest::Client,
        signer: &SigV4Signer,
        service: &'static str,
    ) -> Result<reqwest::Response> {
        let req = &self.request;
        let mut url = format!(
            "{}{}",
            self.endpoint.trim_end_matches('/'),
            crate::sigv4::uri_encode_path(req.path)
        );
        if !req.query.is_empty() {
            url.push('?');
            url.push_str(&crate::sigv4::canonical_query_string(req.query));
        }

        let method = reqwest::Method::from_bytes(req.method.as_bytes())
            .map_err(|e| Error::http(format!("Invalid method {}: {}", req.method, e)))?;

        let mut builder = client.request(method, &url);
        for (name, value) in req.headers {
            builder = builder.header(*name, *value);
        }
        for (name, value) in signer.sign(req, Utc::now()) {
            builder = builder.header(name, value);
        }
        if !req.payload.is_empty() {
            builder = builder.body(req.payload.to_vec());
        }

        builder
            .send()
            .await
            .map_err(|e| Error::provider(service, format!("HTTP request failed: {}", e)))
    }
}

/// Map an unsuccessful response to an error
///
/// `context` names the operation ("list records", "UPSERT A home.example.com.").
/// The AWS error code and message are pulled from the XML body when present.
pub async fn status_error(
    service: &'static str,
    context: &str,
    response: reqwest::Response,
) -> Error {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());

    let code = xml::text(&body, "Code").unwrap_or_default();
    let message = xml::text(&body, "Message").unwrap_or_else(|| body.trim().to_string());

    let message = match (status.as_u16(), code.as_str()) {
        (401 | 403, _) => format!(
            "Authentication failed: invalid credentials or insufficient permissions. Status: {} {}",
            status, code
        ),
        (404, _) => format!("{} failed: not found: {} {}", context, code, message),
        (429, _) | (400, "Throttling") | (400, "PriorRequestNotComplete") => format!(
            "Rate limit exceeded. Please retry later. Status: {} {}",
            status, code
        ),
        (500..=599, _) => format!("Server error (transient): {} - {}", status, message),
        _ => format!("{} failed: {} {} - {}", context, status, code, message),
    };

    Error::provider(service, message)
}
