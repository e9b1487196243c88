//! Core traits for the dyndns system
//!
//! This module defines the collaborator interfaces the handler is built on.
//!
//! - [`ObjectStore`]: Fetch the configuration document
//! - [`ZoneApi`]: List and change records in a hosted zone

pub mod object_store;
pub mod zone_api;

pub use object_store::ObjectStore;
pub use zone_api::ZoneApi;
