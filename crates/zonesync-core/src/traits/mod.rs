//! Core traits for zonesync
//!
//! - [`ZoneProvider`]: Read and write zones on a remote DNS service

pub mod zone_provider;

pub use zone_provider::{ApplyReport, ZoneProvider, ZoneProviderFactory};
