//! Parser configurations explored by the search

use super::builder::apply_action;
use super::error::TransitionError;
use super::validity::is_valid_action;
use crate::config::compile_time::logging::MAX_STATE_ITEMS_IN_DIAGNOSTICS;
use crate::document::EduBoundary;
use crate::features::extract_features;
use crate::grammar::tree::LEFTWALL_LABEL;
use crate::grammar::{Action, DiscourseTree, Node, TreeFragment};
use std::collections::VecDeque;
use std::rc::Rc;

/// One configuration of the transition system.
///
/// Cloning copies the stack and queue vectors only; the nodes and tree
/// fragments they point to are shared.
#[derive(Debug, Clone)]
pub struct ParserState {
    pub prev_action: Action,
    /// Consecutive unary reduces leading to this state
    pub ucnt: usize,
    pub score: f64,
    pub steps: usize,
    pub stack: Vec<Rc<Node>>,
    pub queue: VecDeque<Rc<Node>>,
}

impl ParserState {
    /// Sentinel-only stack, every EDU queued, previous action `S:text`
    pub fn initial(edus: Vec<Rc<Node>>) -> Self {
        Self {
            prev_action: Action::Shift,
            ucnt: 0,
            score: 0.0,
            steps: 0,
            stack: vec![Rc::new(Node::leftwall())],
            queue: edus.into(),
        }
    }

    /// Queue exhausted and the root is the only stack item
    pub fn is_terminal(&self) -> bool {
        self.queue.is_empty() && self.stack.len() == 1
    }

    pub fn features(&self, boundaries: &[EduBoundary]) -> Vec<String> {
        extract_features(&self.prev_action, &self.queue, &self.stack, boundaries)
    }

    pub fn allows(&self, action: &Action) -> bool {
        is_valid_action(action, self.ucnt, &self.queue, &self.stack)
    }

    /// Apply `action` to this state, adding `score` to the running total
    pub fn advance(mut self, action: &Action, score: f64) -> Result<Self, TransitionError> {
        apply_action(action, &mut self.queue, &mut self.stack)?;
        self.ucnt = if action.is_unary() { self.ucnt + 1 } else { 0 };
        self.score += score;
        self.steps += 1;
        self.prev_action = action.clone();
        Ok(self)
    }

    /// Like [`advance`](Self::advance) but leaves this state untouched
    pub fn successor(&self, action: &Action, score: f64) -> Result<Self, TransitionError> {
        self.clone().advance(action, score)
    }

    /// Final tree of a terminal state: sentinel removed, partial
    /// constituents collapsed
    pub fn completed_tree(&self) -> Result<DiscourseTree, TransitionError> {
        let root = self.stack.first().map(|node| Rc::clone(&node.tree));
        let missing = || TransitionError::SentinelMissing {
            tree: root
                .as_ref()
                .map(|tree| tree.to_string())
                .unwrap_or_default(),
        };

        match root.as_deref() {
            Some(TreeFragment::Constituent { label, children })
                if children.first().and_then(|c| c.label()) == Some(LEFTWALL_LABEL) =>
            {
                let trimmed = TreeFragment::Constituent {
                    label: label.clone(),
                    children: children[1..].to_vec(),
                };
                Ok(trimmed.collapse_binarized())
            }
            _ => Err(missing()),
        }
    }

    /// Short rendering for error messages and debug logs
    pub fn describe(&self) -> String {
        let shown = |nodes: Vec<&Rc<Node>>| -> String {
            let mut parts: Vec<String> = nodes
                .iter()
                .take(MAX_STATE_ITEMS_IN_DIAGNOSTICS)
                .map(|node| node.tree.to_string())
                .collect();
            if nodes.len() > MAX_STATE_ITEMS_IN_DIAGNOSTICS {
                parts.push(format!("... {} more", nodes.len() - MAX_STATE_ITEMS_IN_DIAGNOSTICS));
            }
            parts.join(" ")
        };

        format!(
            "prev={} ucnt={} score={:.4} steps={} stack=[{}] queue=[{}]",
            self.prev_action,
            self.ucnt,
            self.score,
            self.steps,
            shown(self.stack.iter().rev().collect()),
            shown(self.queue.iter().collect()),
        )
    }
}
