//! Discourse tree fragments and completed trees
//!
//! Fragments are built during search and shared between branches through
//! `Rc`; they are never mutated after construction. A completed parse is
//! converted into an owned [`DiscourseTree`] with the sentinel removed and
//! partial (`*`) constituents collapsed into their parents.

use super::action::{is_partial, ROOT_LABEL, SHIFT_LABEL};
use serde::{Serialize, Serializer};
use std::fmt;
use std::rc::Rc;

/// Label of the sentinel fragment at the bottom of every stack
pub const LEFTWALL_LABEL: &str = "LEFTWALL";

// ============================================================================
// SHARED FRAGMENTS
// ============================================================================

#[derive(Debug, PartialEq)]
pub enum TreeFragment {
    Constituent {
        label: String,
        children: Vec<Rc<TreeFragment>>,
    },
    Edu(usize),
}

impl TreeFragment {
    /// `(text <index>)`
    pub fn edu(index: usize) -> Rc<Self> {
        Rc::new(TreeFragment::Constituent {
            label: SHIFT_LABEL.to_string(),
            children: vec![Rc::new(TreeFragment::Edu(index))],
        })
    }

    /// `(LEFTWALL)`
    pub fn leftwall() -> Rc<Self> {
        Rc::new(TreeFragment::Constituent {
            label: LEFTWALL_LABEL.to_string(),
            children: Vec::new(),
        })
    }

    pub fn constituent(label: &str, children: Vec<Rc<TreeFragment>>) -> Rc<Self> {
        Rc::new(TreeFragment::Constituent {
            label: label.to_string(),
            children,
        })
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            TreeFragment::Constituent { label, .. } => Some(label),
            TreeFragment::Edu(_) => None,
        }
    }

    /// Owned copy with partial constituents spliced into their parents
    pub fn collapse_binarized(&self) -> DiscourseTree {
        match self {
            TreeFragment::Edu(index) => DiscourseTree::Edu(*index),
            TreeFragment::Constituent { label, children } => {
                let mut collapsed = Vec::with_capacity(children.len());
                for child in children {
                    match child.collapse_binarized() {
                        DiscourseTree::Node {
                            label: child_label,
                            children: grandchildren,
                        } if is_partial(&child_label) => collapsed.extend(grandchildren),
                        other => collapsed.push(other),
                    }
                }
                DiscourseTree::Node {
                    label: label.clone(),
                    children: collapsed,
                }
            }
        }
    }
}

impl fmt::Display for TreeFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeFragment::Edu(index) => write!(f, "{}", index),
            TreeFragment::Constituent { label, children } => {
                write!(f, "({}", label)?;
                for child in children {
                    write!(f, " {}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

// ============================================================================
// COMPLETED TREES
// ============================================================================

/// A completed discourse tree whose leaves are EDU indices
#[derive(Debug, Clone, PartialEq)]
pub enum DiscourseTree {
    Node {
        label: String,
        children: Vec<DiscourseTree>,
    },
    Edu(usize),
}

impl DiscourseTree {
    /// `(ROOT (text 0) ... (text n-1))`
    pub fn flat(edu_count: usize) -> Self {
        DiscourseTree::Node {
            label: ROOT_LABEL.to_string(),
            children: (0..edu_count)
                .map(|index| DiscourseTree::Node {
                    label: SHIFT_LABEL.to_string(),
                    children: vec![DiscourseTree::Edu(index)],
                })
                .collect(),
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            DiscourseTree::Node { label, .. } => Some(label),
            DiscourseTree::Edu(_) => None,
        }
    }

    pub fn children(&self) -> &[DiscourseTree] {
        match self {
            DiscourseTree::Node { children, .. } => children,
            DiscourseTree::Edu(_) => &[],
        }
    }

    /// EDU indices in left-to-right order
    pub fn leaves(&self) -> Vec<usize> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves(&self, leaves: &mut Vec<usize>) {
        match self {
            DiscourseTree::Edu(index) => leaves.push(*index),
            DiscourseTree::Node { children, .. } => {
                for child in children {
                    child.collect_leaves(leaves);
                }
            }
        }
    }

    /// All constituent labels in pre-order
    pub fn labels(&self) -> Vec<&str> {
        let mut labels = Vec::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            if let DiscourseTree::Node { label, children } = node {
                labels.push(label.as_str());
                pending.extend(children.iter().rev());
            }
        }
        labels
    }
}

impl fmt::Display for DiscourseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscourseTree::Edu(index) => write!(f, "{}", index),
            DiscourseTree::Node { label, children } => {
                write!(f, "({}", label)?;
                for child in children {
                    write!(f, " {}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl Serialize for DiscourseTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
