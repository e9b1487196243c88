// # AWS Collaborators
//
// This crate provides the network-backed implementations of the
// dyndns-core collaborator traits:
//
// - **S3ObjectStore**: `ObjectStore` reading the configuration document from S3
// - **Route53Client**: `ZoneApi` listing and changing Route 53 record sets
//
// Both sign requests with AWS Signature Version 4 (see `sigv4`) and share
// one HTTP client configuration with a 30 second timeout.
//
// ## Behavior
//
// - One HTTP request per trait call; no retry, no batching, no caching
// - HTTP status codes are mapped to provider errors (403, 404, 429, 5xx)
// - Route 53 dry-run mode lists normally and only logs changes
//
// ## Security Requirements
//
// - Secret access keys and session tokens NEVER appear in logs or Debug output
// - Credentials are provided via environment variables only

pub mod http;
pub mod route53;
pub mod s3;
pub mod sigv4;
pub mod xml;

pub use route53::{DEFAULT_ROUTE53_REGION, Route53Client};
pub use s3::{DEFAULT_S3_REGION, S3ObjectStore};
pub use sigv4::{Credentials, SigV4Signer};
