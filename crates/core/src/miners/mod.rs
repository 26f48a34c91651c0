//! Miner discovery - registry merging into a per-cycle snapshot.

mod snapshot;

pub use snapshot::{refresh_registries, RegistrySnapshot};
