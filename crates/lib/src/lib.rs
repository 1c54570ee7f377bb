//! packhorse-lib: staged, cache-aware provisioning for build workspaces.
//!
//! The crate is organized around four seams:
//! - `pipeline`: ordered, idempotent step execution with halt-on-first-failure
//! - `cache`: first-writer-wins artifact cache between a cache root and the workspace
//! - `report`: progress reporting channel (console, logs, or no-op)
//! - `compile`: concrete provisioning collaborators and plan assembly

pub mod cache;
pub mod compile;
pub mod config;
pub mod paths;
pub mod pipeline;
pub mod report;
pub mod shell;
pub mod util;
