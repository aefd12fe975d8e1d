//! Version discovery and update decisions.
//!
//! ```text
//! Dependency ──▶ resolver ──▶ registries (index.yaml / OCI tags)
//!                   │               │
//!                   │               └──▶ cache (TTL)
//!                   ▼
//!               selector ──▶ VersionUpdate ──▶ grouper
//! ```

pub mod cache;
pub mod error;
pub mod grouper;
pub mod registries;
pub mod registry;
pub mod resolver;
pub mod selector;
pub mod semver;
pub mod types;
