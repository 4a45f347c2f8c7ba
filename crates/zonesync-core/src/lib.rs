// # zonesync-core
//
// Provider-neutral core library for zonesync.
//
// ## Architecture Overview
//
// - **Record / Zone**: The neutral record model every provider translates to and from
// - **Plan / Change**: The already-decided change list handed over by a planner
// - **ZoneProvider**: Trait for reading and writing zones on a remote DNS service
// - **ProviderRegistry**: Plugin-based registry for zone providers
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Deciding what changes is the planner's job;
//    providers only read current state and execute changes
// 2. **Plugin-Based**: Providers are registered dynamically, no hard-coded if-else
// 3. **Library-First**: All core functionality can be used as a library

pub mod config;
pub mod error;
pub mod plan;
pub mod record;
pub mod registry;
pub mod traits;
pub mod zone;

// Re-export core types for convenience
pub use config::{ProviderConfig, SyncConfig};
pub use error::{Error, Result};
pub use plan::{Change, Plan, Step, StepKind};
pub use record::{CaaValue, MxValue, Record, RecordData, RecordType};
pub use registry::ProviderRegistry;
pub use traits::{ApplyReport, ZoneProvider, ZoneProviderFactory};
pub use zone::Zone;
