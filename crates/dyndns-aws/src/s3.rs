//! S3-backed configuration store
//!
//! ## API Reference
//!
//! - GetObject (path style): GET `/{bucket}/{key}`

use async_trait::async_trait;
use dyndns_core::traits::ObjectStore;
use dyndns_core::{Error, Result};
use tracing::debug;

use crate::http::{SignedRequest, build_client, endpoint_host, status_error};
use crate::sigv4::{Credentials, SignableRequest, SigV4Signer};

/// Region the configuration bucket lives in unless told otherwise
pub const DEFAULT_S3_REGION: &str = "eu-west-1";

/// Reads objects from S3 with SigV4-signed GETs
///
/// Requests are path-style so that any S3-compatible endpoint works.
pub struct S3ObjectStore {
    endpoint: String,
    host: String,
    signer: SigV4Signer,
    client: reqwest::Client,
}

impl std::fmt::Debug for S3ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ObjectStore")
            .field("endpoint", &self.endpoint)
            .field("region", &self.signer.region())
            .finish()
    }
}

impl S3ObjectStore {
    /// Create a store for the regional S3 endpoint
    ///
    /// # Parameters
    ///
    /// - `credentials`: AWS credentials with `s3:GetObject` on the bucket
    /// - `region`: Bucket region (e.g. `eu-west-1`)
    pub fn new(credentials: Credentials, region: impl Into<String>) -> Result<Self> {
        let region = region.into();
        let endpoint = format!("https://s3.{}.amazonaws.com", region);
        Self::with_endpoint(credentials, region, endpoint)
    }

    /// Create a store for an explicit endpoint (S3-compatible services, tests)
    pub fn with_endpoint(
        credentials: Credentials,
        region: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self> {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Ok(Self {
            host: endpoint_host(&endpoint)?,
            signer: SigV4Signer::new(credentials, region, "s3").with_content_sha256_header(),
            client: build_client()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        if bucket.is_empty() || key.is_empty() {
            return Err(Error::invalid_input("bucket and key must not be empty"));
        }

        let path = format!("/{}/{}", bucket, key.trim_start_matches('/'));
        debug!("Fetching s3://{}/{}", bucket, key);

        let response = SignedRequest {
            endpoint: &self.endpoint,
            request: SignableRequest {
                method: "GET",
                host: &self.host,
                path: &path,
                query: &[],
                headers: &[],
                payload: b"",
            },
        }
        .send(&self.client, &self.signer, "s3")
        .await?;

        if !response.status().is_success() {
            return Err(status_error("s3", &format!("GetObject {}", path), response).await);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::provider("s3", format!("Failed to read object body: {}", e)))?;

        debug!("Fetched {} byte(s) from s3://{}/{}", body.len(), bucket, key);
        Ok(body.to_vec())
    }

    fn store_name(&self) -> &'static str {
        "s3"
    }
}
