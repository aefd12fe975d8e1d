//! Update decision and application engine for Helm chart references in
//! GitOps manifests.
//!
//! The crate decides, for every tracked chart reference, whether a newer
//! version exists and which one to adopt (strategy, ignore rules, grouping),
//! and applies the chosen version to the manifest file without disturbing
//! any other byte of it.

pub mod config;
pub mod manifest;
pub mod updater;
pub mod version;
