//! AWS Signature Version 4 request signing
//!
//! Header-based signing for the two services this crate talks to. The
//! signer produces the headers to attach; it does not send anything.
//!
//! ```text
//! canonical request ─sha256─► string to sign ─hmac(k_signing)─► signature
//!                                                   ▲
//!          AWS4<secret> ─► date ─► region ─► service ─► aws4_request
//! ```

use chrono::{DateTime, Utc};
use dyndns_core::{Error, Result};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::Write;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// SHA-256 of the empty string, hex encoded
pub const EMPTY_PAYLOAD_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Static AWS credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    /// ⚠️ NEVER log this value
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

// Custom Debug implementation that hides the secret and token
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<REDACTED>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<REDACTED>"),
            )
            .finish()
    }
}

impl Credentials {
    /// Create credentials without a session token
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Attach a session token (temporary credentials)
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Read `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and the optional
    /// `AWS_SESSION_TOKEN` from the environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build credentials from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let access_key_id = non_empty("AWS_ACCESS_KEY_ID")
            .ok_or_else(|| Error::config("AWS_ACCESS_KEY_ID is required"))?;
        let secret_access_key = non_empty("AWS_SECRET_ACCESS_KEY")
            .ok_or_else(|| Error::config("AWS_SECRET_ACCESS_KEY is required"))?;

        Ok(Self {
            access_key_id,
            secret_access_key,
            session_token: non_empty("AWS_SESSION_TOKEN"),
        })
    }
}

/// The parts of an HTTP request that go into the signature
#[derive(Debug, Clone)]
pub struct SignableRequest<'a> {
    pub method: &'a str,
    /// Host header value, including a non-default port
    pub host: &'a str,
    /// Unencoded absolute path
    pub path: &'a str,
    /// Unencoded query parameters
    pub query: &'a [(&'a str, &'a str)],
    /// Extra headers to sign (e.g. `content-type`)
    pub headers: &'a [(&'a str, &'a str)],
    pub payload: &'a [u8],
}

/// Signs requests for one service in one region
#[derive(Debug, Clone)]
pub struct SigV4Signer {
    credentials: Credentials,
    region: String,
    service: String,
    content_sha256_header: bool,
}

impl SigV4Signer {
    /// Create a signer for `service` in `region`
    pub fn new(credentials: Credentials, region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            credentials,
            region: region.into(),
            service: service.into(),
            content_sha256_header: false,
        }
    }

    /// Also send and sign `x-amz-content-sha256` (required by S3)
    pub fn with_content_sha256_header(mut self) -> Self {
        self.content_sha256_header = true;
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Compute the headers that authenticate `request` at time `now`
    ///
    /// # Returns
    ///
    /// Header name/value pairs to add to the outgoing request, including
    /// `authorization`. The `host` header is signed but not returned; the
    /// HTTP client derives it from the URL.
    pub fn sign(&self, request: &SignableRequest<'_>, now: DateTime<Utc>) -> Vec<(String, String)> {
        let date = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let payload_hash = hex_sha256(request.payload);

        let mut added: Vec<(String, String)> = vec![("x-amz-date".to_string(), amz_date.clone())];
        if self.content_sha256_header {
            added.push(("x-amz-content-sha256".to_string(), payload_hash.clone()));
        }
        if let Some(ref token) = self.credentials.session_token {
            added.push(("x-amz-security-token".to_string(), token.clone()));
        }

        let mut signed: BTreeMap<String, String> = BTreeMap::new();
        signed.insert("host".to_string(), request.host.to_string());
        for (name, value) in request.headers {
            signed.insert(name.to_ascii_lowercase(), canonical_header_value(value));
        }
        for (name, value) in &added {
            signed.insert(name.clone(), value.clone());
        }

        let canonical_headers: String = signed
            .iter()
            .map(|(name, value)| format!("{}:{}\n", name, value))
            .collect();
        let signed_headers = signed.keys().cloned().collect::<Vec<_>>().join(";");

        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            request.method,
            uri_encode_path(request.path),
            canonical_query_string(request.query),
            canonical_headers,
            signed_headers,
            payload_hash
        );

        let credential_scope = format!("{}/{}/{}/aws4_request", date, self.region, self.service);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            credential_scope,
            hex_sha256(canonical_request.as_bytes())
        );

        let signing_key = signing_key(
            &self.credentials.secret_access_key,
            &date,
            &self.region,
            &self.service,
        );
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes()));

        added.push((
            "authorization".to_string(),
            format!(
                "{} Credential={}/{}, SignedHeaders={}, Signature={}",
                ALGORITHM,
                self.credentials.access_key_id,
                credential_scope,
                signed_headers,
                signature
            ),
        ));

        added
    }
}

/// Derive the per-day signing key
pub fn signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{}", secret_key).as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

/// Query string with keys sorted and both sides percent-encoded
pub fn canonical_query_string(params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (uri_encode_value(k), uri_encode_value(v)))
        .collect();
    encoded.sort();
    encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// URI-encode a path, preserving slashes
pub fn uri_encode_path(path: &str) -> String {
    encode(path, true)
}

/// URI-encode a query key or value
pub fn uri_encode_value(value: &str) -> String {
    encode(value, false)
}

fn encode(input: &str, keep_slash: bool) -> String {
    let mut result = String::with_capacity(input.len() * 3);
    for b in input.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(b as char)
            }
            b'/' if keep_slash => result.push('/'),
            _ => {
                let _ = write!(result, "%{:02X}", b);
            }
        }
    }
    result
}

fn canonical_header_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// SHA-256 of `data`, hex encoded
pub fn hex_sha256(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = match Hmac::<Sha256>::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC-SHA256 accepts any key length"),
    };
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
