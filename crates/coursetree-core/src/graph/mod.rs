//! Relationships between course-outline nodes.
//!
//! ## Submodules
//!
//! - [`drafts`]: draft subtree root resolution and per-root grouping.

pub mod drafts;

pub use drafts::{DraftForest, draft_subtree_roots, is_subtree_root, resolve_roots};
