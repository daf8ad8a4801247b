//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Node of a classification forest as supplied by the tree source.
///
/// A node without children is a leaf and must carry a non-empty `label`,
/// which is unique across the forest. Internal nodes may define `label`,
/// `extra_label`, both or neither (pure grouping node).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TreeNode {
    /// Display name (UI only, not used for selection logic)
    #[serde(default)]
    pub name: String,
    /// Tag assigned to this node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Coarser tag reported when any descendant is selected
    #[serde(
        default,
        rename = "extraLabel",
        alias = "extra_label",
        skip_serializing_if = "Option::is_none"
    )]
    pub extra_label: Option<String>,
    /// Ordered children; empty for leaves
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn group(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.into(),
            children,
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_extra_label(mut self, extra_label: impl Into<String>) -> Self {
        self.extra_label = Some(extra_label.into());
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Strategy used to turn a selection into tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingPolicy {
    /// Report the highest labelled ancestor fully covering a selected block.
    Compress,
    /// Report every label along each selected leaf's root path.
    Expand,
}

impl EncodingPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            EncodingPolicy::Compress => "compress",
            EncodingPolicy::Expand => "expand",
        }
    }
}

impl fmt::Display for EncodingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncodingPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compress" => Ok(EncodingPolicy::Compress),
            "expand" => Ok(EncodingPolicy::Expand),
            other => Err(DomainError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Built-in content domains, each bound to an encoding policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Geographic regions
    Location,
    /// Educational-level categories
    Education,
}

impl Domain {
    pub fn policy(self) -> EncodingPolicy {
        match self {
            Domain::Location => EncodingPolicy::Compress,
            Domain::Education => EncodingPolicy::Expand,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Location => "location",
            Domain::Education => "education",
        }
    }
}

impl From<Domain> for EncodingPolicy {
    fn from(domain: Domain) -> Self {
        domain.policy()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "location" => Ok(Domain::Location),
            "education" => Ok(Domain::Education),
            other => Err(DomainError::UnknownDomain(other.to_string())),
        }
    }
}

/// Derived checkbox state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Unselected,
    Partial,
    Full,
}

impl SelectionState {
    pub fn marker(self) -> &'static str {
        match self {
            SelectionState::Unselected => "[ ]",
            SelectionState::Partial => "[-]",
            SelectionState::Full => "[x]",
        }
    }
}
