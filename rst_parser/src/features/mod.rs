//! Feature extraction for parser states
//!
//! Features are plain strings (`S0w:the`, `dist:-1`, ...). The extractor
//! returns them in a fixed order; [`FeatureCounts`] is the multiset the
//! scorer consumes.

use crate::document::{sentence_of, EduBoundary};
use crate::grammar::{Action, Node};
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::rc::Rc;

const COMBO_PREFIX: &str = "combo:";

/// Occurrence count per feature string, iterated in sorted order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeatureCounts(BTreeMap<String, u32>);

impl FeatureCounts {
    pub fn from_features<I, S>(features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut counts = BTreeMap::new();
        for feature in features {
            *counts.entry(feature.into()).or_insert(0) += 1;
        }
        Self(counts)
    }

    pub fn get(&self, feature: &str) -> u32 {
        self.0.get(feature).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(feature, count)| (feature.as_str(), *count))
    }

    /// Number of distinct features
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }
}

/// A stack position below S0: either a real item or the `TOP` filler
enum StackSlot<'a> {
    Item(&'a Node),
    Filler,
}

impl<'a> StackSlot<'a> {
    fn at(stack: &'a [Rc<Node>], depth: usize) -> Self {
        stack
            .len()
            .checked_sub(depth + 1)
            .and_then(|index| stack.get(index))
            .map(|node| StackSlot::Item(node.as_ref()))
            .unwrap_or(StackSlot::Filler)
    }

    fn label(&self) -> &str {
        match self {
            StackSlot::Item(node) => &node.label,
            StackSlot::Filler => "TOP",
        }
    }

    /// Fillers carry no child caches; their features render empty
    fn cached(&self, field: impl Fn(&Node) -> String) -> String {
        match self {
            StackSlot::Item(node) => field(node),
            StackSlot::Filler => String::new(),
        }
    }

    fn head_idx(&self) -> i64 {
        match self {
            StackSlot::Item(node) => node.head_idx,
            StackSlot::Filler => 0,
        }
    }

    fn end_idx(&self) -> i64 {
        match self {
            StackSlot::Item(node) => node.end_idx,
            StackSlot::Filler => -1,
        }
    }
}

/// Extract the ordered feature list for a parser configuration.
///
/// The stack top is always present (at worst the `LEFTWALL` sentinel).
pub fn extract_features(
    prev_action: &Action,
    queue: &VecDeque<Rc<Node>>,
    stack: &[Rc<Node>],
    boundaries: &[EduBoundary],
) -> Vec<String> {
    let prev = format!("PREV:{}", prev_action);
    let mut features = vec![prev.clone()];

    if let Some(s0) = stack.last() {
        push_tokens(&mut features, "S0w", &s0.head);
        push_tokens(&mut features, "S0p", &s0.hpos);
        features.push(format!("S0nt:{}", s0.label));
        features.push(format!("S0lnt:{}", s0.lchnt));
        features.push(format!("S0rnt:{}", s0.rchnt));
        features.push(format!("S0nch:{}", s0.nch));
        features.push(format!("S0nlch:{}", s0.nlch));
        features.push(format!("S0nrch:{}", s0.nrch));
    }

    let s1 = StackSlot::at(stack, 1);
    push_slot_tokens(&mut features, "S1w", "S1p", &s1);
    features.push(format!("S1nt:{}", s1.label()));
    features.push(format!("S1lnt:{}", s1.cached(|n| n.lchnt.clone())));
    features.push(format!("S1rnt:{}", s1.cached(|n| n.rchnt.clone())));
    features.push(format!("S1nch:{}", s1.cached(|n| n.nch.to_string())));
    features.push(format!("S1nlch:{}", s1.cached(|n| n.nlch.to_string())));
    features.push(format!("S1nrch:{}", s1.cached(|n| n.nrch.to_string())));

    let s2 = StackSlot::at(stack, 2);
    push_slot_tokens(&mut features, "S2w", "S2p", &s2);
    features.push(format!("S2nt:{}", s2.label()));

    let s3 = StackSlot::at(stack, 3);
    features.push(format!("S3nt:{}", s3.label()));

    push_queue_tokens(&mut features, "nw1", "np1", queue.front());
    push_queue_tokens(&mut features, "nw2", "np2", queue.get(1));

    let s0_head_idx = stack.last().map(|node| node.head_idx).unwrap_or(0);
    features.push(format!("dist:{}", s0_head_idx - s1.head_idx()));

    let s0_start = stack.last().map(|node| node.start_idx).unwrap_or(-1);
    let s1_end = s1.end_idx();
    if s0_start > -1 && s1_end > -1 {
        let s0_sentence = sentence_of(boundaries, s0_start);
        if s0_sentence.is_some() && s0_sentence == sentence_of(boundaries, s1_end) {
            features.push("s0s1_same_sentence".to_string());
        }
    }

    let combos: Vec<String> = features
        .iter()
        .map(|feature| format!("{}{}~{}", COMBO_PREFIX, feature, prev))
        .collect();
    features.extend(combos);
    features
}

fn push_tokens(features: &mut Vec<String>, prefix: &str, tokens: &[String]) {
    features.extend(tokens.iter().map(|token| format!("{}:{}", prefix, token)));
}

fn push_slot_tokens(
    features: &mut Vec<String>,
    word_prefix: &str,
    pos_prefix: &str,
    slot: &StackSlot,
) {
    match slot {
        StackSlot::Item(node) => {
            push_tokens(features, word_prefix, &node.head);
            push_tokens(features, pos_prefix, &node.hpos);
        }
        StackSlot::Filler => {
            features.push(format!("{}:LeftWall", word_prefix));
            features.push(format!("{}:LW", pos_prefix));
        }
    }
}

fn push_queue_tokens(
    features: &mut Vec<String>,
    word_prefix: &str,
    pos_prefix: &str,
    item: Option<&Rc<Node>>,
) {
    match item {
        Some(node) => {
            push_tokens(features, word_prefix, &node.head);
            push_tokens(features, pos_prefix, &node.hpos);
        }
        None => {
            features.push(format!("{}:RightWall", word_prefix));
            features.push(format!("{}:RW", pos_prefix));
        }
    }
}
