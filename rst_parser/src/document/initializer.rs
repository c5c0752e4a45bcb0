//! EDU initializer: tagged EDU tokens to leaf stack items

use super::error::DocumentError;
use super::Token;
use crate::grammar::Node;
use std::rc::Rc;

/// Build one leaf node per EDU, in document order.
///
/// Each head list is the raw token list with three markers inserted at the
/// front, one insertion at a time: `"<second>:::1"` (empty when the EDU has
/// one token), then `"<list[1]>:::0"`, then `"<list[-1]>:::-1"`, where
/// `list` is the list as it stands before that insertion. The resulting
/// prefix is `[last:::-1, first:::0, second:::1]`. POS tags get the same
/// treatment.
pub fn initialize_edus(edus: &[Vec<Token>]) -> Result<Vec<Rc<Node>>, DocumentError> {
    edus.iter()
        .enumerate()
        .map(|(index, edu)| {
            if edu.is_empty() {
                return Err(DocumentError::EmptyEdu { index });
            }
            let words: Vec<&str> = edu.iter().map(|token| token.word.as_str()).collect();
            let tags: Vec<&str> = edu.iter().map(|token| token.pos.as_str()).collect();
            Ok(Rc::new(Node::edu(
                index,
                with_boundary_markers(&words),
                with_boundary_markers(&tags),
            )))
        })
        .collect()
}

fn with_boundary_markers(items: &[&str]) -> Vec<String> {
    let mut list: Vec<String> = items.iter().map(|item| item.to_string()).collect();

    let second = if list.len() > 1 { list[1].clone() } else { String::new() };
    list.insert(0, format!("{}:::1", second));

    // list[1] is now the first raw item
    let first = list[1].clone();
    list.insert(0, format!("{}:::0", first));

    let last = list.last().cloned().unwrap_or_default();
    list.insert(0, format!("{}:::-1", last));

    list
}
