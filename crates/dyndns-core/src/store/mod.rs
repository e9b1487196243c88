// # Collaborator Implementations
//
// Local implementations of the ObjectStore and ZoneApi traits. Network
// backed ones live in the `dyndns-aws` crate.

pub mod file;
pub mod memory;

pub use file::FileObjectStore;
pub use memory::{MemoryObjectStore, MemoryZoneApi};
