//! Legal moves under the discourse grammar

use crate::config::compile_time::search::MAX_CONSECUTIVE_UNARY;
use crate::grammar::action::{is_head_bearing, is_partial, PARTIAL_MARKER};
use crate::grammar::{Action, Node};
use std::collections::VecDeque;
use std::rc::Rc;

/// Decide whether `action` may be taken in the given configuration.
///
/// `ucnt` is the number of unary reduces taken in a row so far.
pub fn is_valid_action(
    action: &Action,
    ucnt: usize,
    queue: &VecDeque<Rc<Node>>,
    stack: &[Rc<Node>],
) -> bool {
    match action {
        Action::Unary(_) => {
            if ucnt > MAX_CONSECUTIVE_UNARY {
                return false;
            }
            match stack.last() {
                None => false,
                Some(top) => !top.is_leftwall() && !is_partial(&top.label),
            }
        }
        Action::Shift => !queue.is_empty(),
        Action::Binary(_) if action.is_root() => stack.len() == 2 && queue.is_empty(),
        Action::Binary(label) => {
            if stack.len() < 3 {
                return false;
            }
            let lc = &stack[stack.len() - 2].label;
            let rc = &stack[stack.len() - 1].label;

            if !is_head_bearing(lc) && !is_head_bearing(rc) {
                return false;
            }
            continues_partial(label, lc) && continues_partial(label, rc)
        }
    }
}

/// A partial child only combines under its own label, open or closed
fn continues_partial(label: &str, child: &str) -> bool {
    if !is_partial(child) {
        return true;
    }
    label == child || Some(label) == child.strip_suffix(PARTIAL_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::TreeFragment;

    fn item(label: &str, index: usize) -> Rc<Node> {
        let mut node = Node::edu(index, vec!["w".into()], vec!["NN".into()]);
        node.label = label.to_string();
        node.tree = TreeFragment::edu(index);
        Rc::new(node)
    }

    fn stack_of(labels: &[&str]) -> Vec<Rc<Node>> {
        let mut stack = vec![Rc::new(Node::leftwall())];
        stack.extend(labels.iter().enumerate().map(|(i, label)| item(label, i)));
        stack
    }

    fn queue_of(count: usize) -> VecDeque<Rc<Node>> {
        (0..count).map(|i| item("text", 10 + i)).collect()
    }

    #[test]
    fn test_shift_needs_queue() {
        let stack = stack_of(&[]);
        assert!(is_valid_action(&Action::Shift, 0, &queue_of(1), &stack));
        assert!(!is_valid_action(&Action::Shift, 0, &queue_of(0), &stack));
    }

    #[test]
    fn test_unary_rules() {
        let queue = queue_of(0);
        let span = Action::unary("nucleus:span");

        assert!(is_valid_action(&span, 0, &queue, &stack_of(&["text"])));
        assert!(is_valid_action(&span, 2, &queue, &stack_of(&["text"])));
        assert!(!is_valid_action(&span, 3, &queue, &stack_of(&["text"])));
        assert!(!is_valid_action(&span, 0, &queue, &stack_of(&[])));
        assert!(!is_valid_action(&span, 0, &queue, &stack_of(&["nucleus:list*"])));
    }

    #[test]
    fn test_binary_requires_head() {
        let queue = queue_of(0);
        let action = Action::binary("nucleus:span");

        assert!(!is_valid_action(&action, 0, &queue, &stack_of(&["text"])));
        assert!(!is_valid_action(&action, 0, &queue, &stack_of(&["text", "text"])));
        assert!(!is_valid_action(
            &action,
            0,
            &queue,
            &stack_of(&["satellite:elaboration", "satellite:attribution"])
        ));
        assert!(is_valid_action(&action, 0, &queue, &stack_of(&["text", "nucleus:span"])));
        assert!(is_valid_action(&action, 0, &queue, &stack_of(&["nucleus:span", "text"])));
    }

    #[test]
    fn test_headless_pairs_always_rejected() {
        let non_heads = ["text", "satellite:elaboration", "nucleus", "span", "LEFTWALL"];
        let actions = [
            Action::binary("nucleus:span"),
            Action::binary("satellite:elaboration"),
            Action::binary("ROOT*"),
        ];
        for left in non_heads {
            for right in non_heads {
                let stack = stack_of(&[left, right]);
                for action in &actions {
                    assert!(
                        !is_valid_action(action, 0, &queue_of(0), &stack),
                        "{} accepted on ({}, {})",
                        action,
                        left,
                        right
                    );
                }
            }
        }
    }

    #[test]
    fn test_partial_children_constrain_label() {
        let queue = queue_of(0);
        let stack = stack_of(&["nucleus:list*", "nucleus:span"]);

        assert!(is_valid_action(&Action::binary("nucleus:list*"), 0, &queue, &stack));
        assert!(is_valid_action(&Action::binary("nucleus:list"), 0, &queue, &stack));
        assert!(!is_valid_action(&Action::binary("nucleus:span"), 0, &queue, &stack));

        let right_partial = stack_of(&["text", "ROOT*"]);
        assert!(is_valid_action(&Action::binary("ROOT*"), 0, &queue, &right_partial));
        assert!(!is_valid_action(&Action::binary("nucleus:span"), 0, &queue, &right_partial));
    }

    #[test]
    fn test_root_only_finishes() {
        let root = Action::root();
        assert!(is_valid_action(&root, 0, &queue_of(0), &stack_of(&["nucleus:span"])));
        assert!(!is_valid_action(&root, 0, &queue_of(1), &stack_of(&["nucleus:span"])));
        assert!(!is_valid_action(
            &root,
            0,
            &queue_of(0),
            &stack_of(&["nucleus:span", "nucleus:span"])
        ));
        assert!(!is_valid_action(&root, 0, &queue_of(0), &stack_of(&[])));
    }
}
