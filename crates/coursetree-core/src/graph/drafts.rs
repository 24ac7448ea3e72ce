//! Draft subtree roots in a course outline.
//!
//! # Overview
//!
//! When a course is exported, its unpublished ("draft") blocks arrive as a
//! flat list of [`ContentNode`]s, each naming its immediate parent. Drafts
//! nest (a draft unit may hold draft components), so the exporter needs the
//! topmost draft of every disjoint subtree: writing those roots writes
//! everything beneath them exactly once.
//!
//! # Classification
//!
//! A node is a **root** iff
//!
//! 1. its parent is not another node of the input list (absent, missing, or
//!    the node itself), or
//! 2. container promotion is enabled and its recorded parent category is
//!    [`Category::Sequential`](crate::model::Category::Sequential).
//!
//! Rule 2 exists because a sequential is never a draft: anything above it
//! must not be grouped with the drafts below it, even if a caller passed the
//! sequential's own ancestors in the list.
//!
//! Classification is a local, one-hop predicate. It never follows parent
//! chains, so cyclic input cannot make it loop. [`DraftForest`] does follow
//! chains (to map each node to its root) and guards the walk with a visited
//! set.
//!
//! # Ordering
//!
//! Roots come back in input order and are deduplicated by `id`; the first
//! occurrence of a duplicated id wins.

#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument, trace};

use crate::model::ContentNode;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Decide whether `node` starts a draft subtree.
///
/// `ids` is the set of every id in the input collection.
pub fn is_subtree_root(node: &ContentNode, ids: &HashSet<&str>, use_parent_category: bool) -> bool {
    let structural = match node.parent_id.as_deref() {
        None => true,
        Some(parent) => parent == node.id || !ids.contains(parent),
    };
    if structural {
        return true;
    }
    use_parent_category && node.parent_is_container()
}

/// Return the distinct subtree roots of `nodes`.
///
/// With `use_parent_category` unset only the structural rule applies: a
/// node is a root when its parent is not in `nodes`. With it set, nodes
/// whose parent is a sequential are promoted to roots as well, so the result
/// is always a superset of the structural-only result.
///
/// Never fails. Malformed input (duplicate ids, dangling parents) degrades to
/// "treat as root".
#[instrument(skip(nodes), fields(count = nodes.len()))]
pub fn resolve_roots(nodes: &[ContentNode], use_parent_category: bool) -> Vec<&ContentNode> {
    let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(nodes.len());
    let mut roots = Vec::new();

    for node in nodes {
        if !is_subtree_root(node, &ids, use_parent_category) {
            trace!(id = %node.id, "not a root");
            continue;
        }
        if seen.insert(node.id.as_str()) {
            roots.push(node);
        } else {
            debug!(id = %node.id, "duplicate root id skipped");
        }
    }

    debug!(roots = roots.len(), "resolved draft subtree roots");
    roots
}

/// Roots used by course export: structural roots plus container promotion.
pub fn draft_subtree_roots(nodes: &[ContentNode]) -> Vec<&ContentNode> {
    resolve_roots(nodes, true)
}

// ---------------------------------------------------------------------------
// DraftForest
// ---------------------------------------------------------------------------

/// Every input node grouped under the root that owns it.
///
/// Built once from a node slice; borrows the nodes for its lifetime.
#[derive(Debug)]
pub struct DraftForest<'a> {
    nodes: &'a [ContentNode],
    roots: Vec<&'a ContentNode>,
    /// node id -> owning root id. Nodes on a rootless cycle are absent.
    owner: HashMap<&'a str, &'a str>,
}

impl<'a> DraftForest<'a> {
    /// Classify `nodes` and assign each one to its owning root.
    #[instrument(skip(nodes), fields(count = nodes.len()))]
    pub fn build(nodes: &'a [ContentNode], use_parent_category: bool) -> Self {
        let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let roots = resolve_roots(nodes, use_parent_category);

        // First occurrence wins for duplicate ids, matching resolve_roots.
        let mut by_id: HashMap<&str, &ContentNode> = HashMap::with_capacity(nodes.len());
        for node in nodes {
            by_id.entry(node.id.as_str()).or_insert(node);
        }
        let root_ids: HashSet<&str> = roots.iter().map(|r| r.id.as_str()).collect();

        let mut owner: HashMap<&'a str, &'a str> = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if owner.contains_key(node.id.as_str()) {
                continue;
            }
            if let Some(root) = find_owner(node, &by_id, &root_ids, &ids) {
                owner.insert(node.id.as_str(), root);
            } else {
                debug!(id = %node.id, "node sits on a parent cycle with no root");
            }
        }

        Self {
            nodes,
            roots,
            owner,
        }
    }

    /// The subtree roots, in input order.
    pub fn roots(&self) -> &[&'a ContentNode] {
        &self.roots
    }

    /// Number of subtrees.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// The root that owns `id`. A root owns itself.
    pub fn root_of(&self, id: &str) -> Option<&'a ContentNode> {
        let root_id = self.owner.get(id)?;
        self.roots.iter().copied().find(|r| r.id == *root_id)
    }

    /// The root followed by every node it owns, in input order.
    ///
    /// Returns an empty vec if `root_id` is not a root.
    pub fn subtree(&self, root_id: &str) -> Vec<&'a ContentNode> {
        let Some(root) = self.roots.iter().copied().find(|r| r.id == root_id) else {
            return Vec::new();
        };

        let mut members = vec![root];
        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(root.id.as_str());
        for node in self.nodes {
            if self.owner.get(node.id.as_str()) == Some(&root_id) && seen.insert(node.id.as_str()) {
                members.push(node);
            }
        }
        members
    }

    /// Nodes that no root owns (only possible when parent links form a cycle).
    pub fn orphans(&self) -> Vec<&'a ContentNode> {
        self.nodes
            .iter()
            .filter(|n| !self.owner.contains_key(n.id.as_str()))
            .collect()
    }
}

/// Walk up from `node` until a root is reached.
///
/// Each hop moves to the parent inside the collection; a node that was already
/// visited ends the walk without an owner.
fn find_owner<'a>(
    node: &'a ContentNode,
    by_id: &HashMap<&str, &'a ContentNode>,
    root_ids: &HashSet<&str>,
    ids: &HashSet<&str>,
) -> Option<&'a str> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = node;

    loop {
        if root_ids.contains(current.id.as_str()) {
            return Some(current.id.as_str());
        }
        if !visited.insert(current.id.as_str()) {
            return None; // cycle guard
        }
        let parent_id = current.parent_id.as_deref()?;
        if !ids.contains(parent_id) {
            return None;
        }
        current = by_id.get(parent_id).copied()?;
    }
}
