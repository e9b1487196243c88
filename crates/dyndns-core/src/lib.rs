// # dyndns-core
//
// Core library for the dynamic DNS update endpoint.
//
// ## Architecture Overview
//
// A caller presents a hostname, a shared secret and its own address. The
// library checks the secret, reads the hostname's zone records and rewrites
// them so the hostname points at the caller:
// - **ObjectStore**: Trait for fetching the configuration document
// - **ZoneApi**: Trait for listing and changing hosted zone records
// - **ConfigResolver**: Maps a hostname to its zone id and shared secret
// - **Reconciler**: Authenticates, lists, deletes PTRs and upserts patched records
// - **RequestHandler**: Dispatches an inbound event to get or set mode
//
// ## Design Principles
//
// 1. **Stateless**: Configuration is re-read on every request
// 2. **Errors as Data**: The handler always returns a ReconciliationResult
// 3. **Library-First**: Network clients live in separate crates behind the traits

pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod record;
pub mod resolver;
pub mod response;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use config::{
    ConfigDocument, ReconcileOptions, RecordErrorPolicy, ResolverSettings, ZoneConfig,
};
pub use engine::{IpSubstitution, ReconcileReport, Reconciler};
pub use error::{Error, Result};
pub use handler::{ExecutionMode, InboundEvent, RequestHandler};
pub use record::{
    AliasTarget, ChangeAction, GeoLocation, RecordSet, RecordType, ResourceRecord, RoutingPolicy,
};
pub use resolver::ConfigResolver;
pub use response::{ReconciliationResult, ReturnStatus};
pub use store::{FileObjectStore, MemoryObjectStore, MemoryZoneApi};
pub use traits::{ObjectStore, ZoneApi};
