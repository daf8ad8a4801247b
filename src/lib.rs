//! Hierarchical label selection over classification forests.
//!
//! A [`domain::Forest`] holds an immutable tree of labelled nodes. A
//! [`domain::SelectionManager`] keeps the set of selected leaves, answers
//! whether a group is fully selected, toggles whole subtrees and encodes the
//! selection into a list of tags under the policy of its domain.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
