//! Stack items: EDU leaves and constituents built by reduces

use super::tree::{TreeFragment, LEFTWALL_LABEL};
use std::fmt;
use std::rc::Rc;

/// Placeholder for child attributes that have not been set yet
pub const NONE_PLACEHOLDER: &str = "NONE";

/// Head tokens (or POS tags) of a node. Shared because reduces copy them
/// from the head child unchanged.
pub type HeadList = Rc<[String]>;

/// Cached head of a child constituent
#[derive(Debug, Clone, PartialEq)]
pub enum ChildHead {
    /// No child attached yet
    Unset,
    Tokens(HeadList),
}

/// A parser stack item.
///
/// Positions are EDU indices; the `LEFTWALL` sentinel uses `-1` for all
/// three. Child caches describe the children attached below this node and
/// feed the feature extractor one level up.
#[derive(Debug, Clone)]
pub struct Node {
    /// Nonterminal label, possibly ending in `*`
    pub label: String,
    pub head: HeadList,
    pub hpos: HeadList,
    pub tree: Rc<TreeFragment>,

    pub start_idx: i64,
    pub end_idx: i64,
    pub head_idx: i64,

    pub lchnt: String,
    pub rchnt: String,
    pub lchpos: String,
    pub rchpos: String,
    pub lchw: ChildHead,
    pub rchw: ChildHead,

    pub nch: u32,
    pub nlch: u32,
    pub nrch: u32,
}

impl Node {
    /// The sentinel at the bottom of every stack
    pub fn leftwall() -> Self {
        Self {
            label: LEFTWALL_LABEL.to_string(),
            head: Rc::from(vec![LEFTWALL_LABEL.to_string()]),
            hpos: Rc::from(vec!["LW".to_string()]),
            tree: TreeFragment::leftwall(),
            start_idx: -1,
            end_idx: -1,
            head_idx: -1,
            lchnt: NONE_PLACEHOLDER.to_string(),
            rchnt: NONE_PLACEHOLDER.to_string(),
            lchpos: NONE_PLACEHOLDER.to_string(),
            rchpos: NONE_PLACEHOLDER.to_string(),
            lchw: ChildHead::Unset,
            rchw: ChildHead::Unset,
            nch: 0,
            nlch: 0,
            nrch: 0,
        }
    }

    /// Leaf node for the EDU at `index`
    pub fn edu(index: usize, head: Vec<String>, hpos: Vec<String>) -> Self {
        let position = index as i64;
        Self {
            label: super::action::SHIFT_LABEL.to_string(),
            head: Rc::from(head),
            hpos: Rc::from(hpos),
            tree: TreeFragment::edu(index),
            start_idx: position,
            end_idx: position,
            head_idx: position,
            lchnt: NONE_PLACEHOLDER.to_string(),
            rchnt: NONE_PLACEHOLDER.to_string(),
            lchpos: NONE_PLACEHOLDER.to_string(),
            rchpos: NONE_PLACEHOLDER.to_string(),
            lchw: ChildHead::Unset,
            rchw: ChildHead::Unset,
            nch: 0,
            nlch: 0,
            nrch: 0,
        }
    }

    pub fn is_leftwall(&self) -> bool {
        self.label == LEFTWALL_LABEL
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}..{}, head {}] {}",
            self.label, self.start_idx, self.end_idx, self.head_idx, self.tree
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leftwall_sentinel() {
        let wall = Node::leftwall();
        assert!(wall.is_leftwall());
        assert_eq!((wall.start_idx, wall.end_idx, wall.head_idx), (-1, -1, -1));
        assert_eq!(&*wall.head, &["LEFTWALL".to_string()]);
        assert_eq!(&*wall.hpos, &["LW".to_string()]);
        assert_eq!(wall.lchnt, "NONE");
        assert_eq!(wall.tree.to_string(), "(LEFTWALL)");
    }

    #[test]
    fn test_edu_leaf_positions() {
        let leaf = Node::edu(4, vec!["w".into()], vec!["NN".into()]);
        assert_eq!(leaf.label, "text");
        assert_eq!((leaf.start_idx, leaf.end_idx, leaf.head_idx), (4, 4, 4));
        assert_eq!((leaf.nch, leaf.nlch, leaf.nrch), (0, 0, 0));
        assert_eq!(leaf.lchw, ChildHead::Unset);
        assert!(!leaf.is_leftwall());
        assert!(leaf.to_string().starts_with("text [4..4, head 4]"));
    }
}
