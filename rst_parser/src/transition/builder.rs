//! Action application with head percolation

use super::error::TransitionError;
use crate::grammar::action::is_head_bearing;
use crate::grammar::{Action, ChildHead, Node, TreeFragment};
use std::collections::VecDeque;
use std::rc::Rc;

/// Apply `action` to the stack and queue in place
pub fn apply_action(
    action: &Action,
    queue: &mut VecDeque<Rc<Node>>,
    stack: &mut Vec<Rc<Node>>,
) -> Result<(), TransitionError> {
    match action {
        Action::Shift => {
            let next = queue.pop_front().ok_or(TransitionError::EmptyQueue)?;
            stack.push(next);
        }
        Action::Unary(label) => {
            // the sentinel is never wrapped
            if stack.len() < 2 {
                return Err(underflow(action, stack));
            }
            let child = stack.pop().ok_or_else(|| underflow(action, stack))?;
            stack.push(Rc::new(unary_reduce(label, &child)));
        }
        Action::Binary(label) => {
            // only the finishing reduce may consume the sentinel
            let needed = if action.is_root() { 2 } else { 3 };
            if stack.len() < needed {
                return Err(underflow(action, stack));
            }
            let right = stack.pop().ok_or_else(|| underflow(action, stack))?;
            let left = stack.pop().ok_or_else(|| underflow(action, stack))?;
            let node = binary_reduce(label, action.is_root(), &left, &right)?;
            stack.push(Rc::new(node));
        }
    }
    Ok(())
}

fn underflow(action: &Action, stack: &[Rc<Node>]) -> TransitionError {
    TransitionError::StackUnderflow {
        action: action.to_string(),
        stack_len: stack.len(),
    }
}

fn unary_reduce(label: &str, child: &Node) -> Node {
    Node {
        label: label.to_string(),
        tree: TreeFragment::constituent(label, vec![Rc::clone(&child.tree)]),
        ..child.clone()
    }
}

fn binary_reduce(
    label: &str,
    is_root: bool,
    left: &Node,
    right: &Node,
) -> Result<Node, TransitionError> {
    let tree = TreeFragment::constituent(label, vec![Rc::clone(&left.tree), Rc::clone(&right.tree)]);

    if is_head_bearing(&left.label) || is_root {
        Ok(Node {
            label: label.to_string(),
            head: Rc::clone(&left.head),
            hpos: Rc::clone(&left.hpos),
            tree,
            start_idx: left.start_idx,
            end_idx: right.end_idx,
            head_idx: left.head_idx,
            lchnt: left.lchnt.clone(),
            rchnt: right.label.clone(),
            lchpos: left.lchpos.clone(),
            rchpos: String::new(),
            lchw: left.lchw.clone(),
            rchw: ChildHead::Tokens(Rc::clone(&right.head)),
            nch: left.nch + 1,
            nlch: left.nlch + 1,
            nrch: left.nrch,
        })
    } else if is_head_bearing(&right.label) {
        Ok(Node {
            label: label.to_string(),
            head: Rc::clone(&right.head),
            hpos: Rc::clone(&right.hpos),
            tree,
            start_idx: left.start_idx,
            end_idx: right.end_idx,
            head_idx: right.head_idx,
            lchnt: left.label.clone(),
            rchnt: right.rchnt.clone(),
            lchpos: String::new(),
            rchpos: right.rchpos.clone(),
            lchw: ChildHead::Tokens(Rc::clone(&left.head)),
            rchw: right.rchw.clone(),
            nch: right.nch + 1,
            nlch: right.nlch,
            nrch: right.nrch + 1,
        })
    } else {
        Err(TransitionError::InvalidReduce {
            label: label.to_string(),
            left: left.label.clone(),
            right: right.label.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{initialize_edus, Token};
    use assert_matches::assert_matches;

    fn setup(count: usize) -> (VecDeque<Rc<Node>>, Vec<Rc<Node>>) {
        let edus: Vec<Vec<Token>> = (0..count)
            .map(|i| vec![Token::new(&format!("w{}", i), "NN"), Token::new("x", "VB")])
            .collect();
        let queue = initialize_edus(&edus).unwrap().into_iter().collect();
        (queue, vec![Rc::new(Node::leftwall())])
    }

    fn run(actions: &[Action], queue: &mut VecDeque<Rc<Node>>, stack: &mut Vec<Rc<Node>>) {
        for action in actions {
            apply_action(action, queue, stack).unwrap();
        }
    }

    #[test]
    fn test_shift_moves_queue_front() {
        let (mut queue, mut stack) = setup(2);
        apply_action(&Action::Shift, &mut queue, &mut stack).unwrap();
        assert_eq!(stack.len(), 2);
        assert_eq!(queue.len(), 1);
        assert_eq!(stack[1].start_idx, 0);
    }

    #[test]
    fn test_unary_changes_only_label() {
        let (mut queue, mut stack) = setup(1);
        run(&[Action::Shift], &mut queue, &mut stack);
        let before = Rc::clone(&stack[1]);

        apply_action(&Action::unary("nucleus:span"), &mut queue, &mut stack).unwrap();
        let after = &stack[1];

        assert_eq!(after.label, "nucleus:span");
        assert!(Rc::ptr_eq(&after.head, &before.head));
        assert_eq!((after.start_idx, after.end_idx, after.head_idx), (0, 0, 0));
        assert_eq!(after.lchnt, "NONE");
        assert_eq!(after.tree.to_string(), "(nucleus:span (text 0))");
    }

    #[test]
    fn test_right_head_percolation() {
        let (mut queue, mut stack) = setup(2);
        run(
            &[Action::Shift, Action::Shift, Action::unary("nucleus:span")],
            &mut queue,
            &mut stack,
        );
        apply_action(&Action::binary("nucleus:elaboration"), &mut queue, &mut stack).unwrap();

        let node = &stack[1];
        assert_eq!(stack.len(), 2);
        assert_eq!(node.head_idx, 1);
        assert_eq!((node.start_idx, node.end_idx), (0, 1));
        assert_eq!(node.lchnt, "text");
        assert_eq!(node.rchnt, "NONE");
        assert_eq!(node.lchpos, "");
        assert_eq!(node.rchpos, "NONE");
        assert_eq!((node.nch, node.nlch, node.nrch), (1, 0, 1));
        assert_matches!(&node.lchw, ChildHead::Tokens(head) if head[3] == "w0");
        assert_eq!(node.rchw, ChildHead::Unset);
        assert_eq!(
            node.tree.to_string(),
            "(nucleus:elaboration (text 0) (nucleus:span (text 1)))"
        );
    }

    #[test]
    fn test_left_head_percolation() {
        let (mut queue, mut stack) = setup(2);
        run(
            &[Action::Shift, Action::unary("nucleus:span"), Action::Shift],
            &mut queue,
            &mut stack,
        );
        apply_action(&Action::binary("ROOT*"), &mut queue, &mut stack).unwrap();

        let node = &stack[1];
        assert_eq!(node.head_idx, 0);
        assert_eq!(node.head[3], "w0");
        assert_eq!(node.lchnt, "NONE");
        assert_eq!(node.rchnt, "text");
        assert_eq!(node.lchpos, "NONE");
        assert_eq!(node.rchpos, "");
        assert_eq!((node.nch, node.nlch, node.nrch), (1, 1, 0));
        assert_matches!(&node.rchw, ChildHead::Tokens(head) if head[3] == "w1");
    }

    #[test]
    fn test_root_heads_on_sentinel() {
        let (mut queue, mut stack) = setup(1);
        run(&[Action::Shift, Action::unary("satellite:span")], &mut queue, &mut stack);
        apply_action(&Action::root(), &mut queue, &mut stack).unwrap();

        assert_eq!(stack.len(), 1);
        assert_eq!(stack[0].head_idx, -1);
        assert_eq!(stack[0].tree.to_string(), "(ROOT (LEFTWALL) (satellite:span (text 0)))");
    }

    #[test]
    fn test_headless_reduce_fails_fast() {
        let (mut queue, mut stack) = setup(2);
        run(&[Action::Shift, Action::Shift], &mut queue, &mut stack);
        let result = apply_action(&Action::binary("satellite:list"), &mut queue, &mut stack);
        assert_matches!(result, Err(TransitionError::InvalidReduce { .. }));
    }

    #[test]
    fn test_sentinel_is_protected() {
        let (mut queue, mut stack) = setup(0);
        assert_matches!(
            apply_action(&Action::unary("nucleus:span"), &mut queue, &mut stack),
            Err(TransitionError::StackUnderflow { stack_len: 1, .. })
        );
        assert_matches!(
            apply_action(&Action::Shift, &mut queue, &mut stack),
            Err(TransitionError::EmptyQueue)
        );
        assert_matches!(
            apply_action(&Action::root(), &mut queue, &mut stack),
            Err(TransitionError::StackUnderflow { .. })
        );
        assert_eq!(stack.len(), 1);
    }
}
