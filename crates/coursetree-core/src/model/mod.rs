//! Plain data types shared across the crate.

pub mod node;

pub use node::{Category, ContentNode};
