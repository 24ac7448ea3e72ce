//! coursetree-core library.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums for domain errors, `anyhow::Result` at the
//!   I/O edge (config loading).
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod graph;
pub mod keywords;
pub mod model;
pub mod survey;
pub mod validation;

pub use graph::drafts::{DraftForest, draft_subtree_roots, resolve_roots};
pub use model::{Category, ContentNode};
