use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Block type of a course-outline node.
///
/// Only the structural types the outline cares about get their own variant;
/// everything else (`html`, `problem`, `video`, ...) is carried as
/// [`Category::Other`] with its lowercase name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Course,
    Chapter,
    Sequential,
    Vertical,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Course => "course",
            Self::Chapter => "chapter",
            Self::Sequential => "sequential",
            Self::Vertical => "vertical",
            Self::Other(name) => name,
        }
    }

    /// Whether this category is the container marker below which drafts
    /// start a fresh subtree.
    ///
    /// A sequential is never itself a draft, so a draft whose parent is a
    /// sequential is always a subtree root.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Sequential)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Ok(match normalized.as_str() {
            "course" => Self::Course,
            "chapter" => Self::Chapter,
            "sequential" => Self::Sequential,
            "vertical" => Self::Vertical,
            _ => Self::Other(normalized),
        })
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(category) => category,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Other(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

/// A draft node of the course outline, as handed over by the content store.
///
/// `parent_category` is the block type of the node's *parent*, captured when
/// the node was read. It is never re-derived from the node itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, alias = "category", skip_serializing_if = "Option::is_none")]
    pub parent_category: Option<Category>,
}

impl ContentNode {
    /// Create a node under `parent_id` with no recorded parent category.
    pub fn new(id: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: Some(parent_id.into()),
            parent_category: None,
        }
    }

    /// Create a node with no parent at all.
    pub fn orphan(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            parent_category: None,
        }
    }

    /// Attach the block type of this node's parent.
    #[must_use]
    pub fn with_parent_category(mut self, category: impl Into<Category>) -> Self {
        self.parent_category = Some(category.into());
        self
    }

    /// `true` when the recorded parent is a container (sequential).
    pub fn parent_is_container(&self) -> bool {
        self.parent_category
            .as_ref()
            .is_some_and(Category::is_container)
    }
}
