use super::{Param, Params};
use crate::error::RouteError;

/// One level of a method's route tree.
///
/// Static children are kept alongside the (at most one) wild child in the same
/// list; `is_wild` tells them apart.
#[derive(Debug)]
pub(crate) struct TrieNode<T> {
    segment: String,
    children: Vec<TrieNode<T>>,
    is_wild: bool,
    handler: Option<T>,
}

impl<T> TrieNode<T> {
    pub(crate) fn new() -> TrieNode<T> {
        TrieNode::with_segment(String::new())
    }

    fn with_segment(segment: String) -> TrieNode<T> {
        let is_wild = segment.starts_with(':') || segment.starts_with('*');
        TrieNode {
            segment,
            children: Vec::new(),
            is_wild,
            handler: None,
        }
    }

    fn static_child(&self, part: &str) -> Option<&TrieNode<T>> {
        self.children
            .iter()
            .find(|child| !child.is_wild && child.segment == part)
    }

    fn wild_child(&self) -> Option<&TrieNode<T>> {
        self.children.iter().find(|child| child.is_wild)
    }

    /// Descends along `parts`, creating the missing nodes, and stores `handler`
    /// at the last one. Returns the handler it replaced, if any.
    ///
    /// `parts` must already be validated; a conflicting wildcard can only be
    /// met on a path that already exists, so an error leaves the tree as it was.
    pub(crate) fn insert(
        &mut self,
        pattern: &str,
        parts: &[&str],
        handler: T,
    ) -> Result<Option<T>, RouteError> {
        let (part, rest) = match parts.split_first() {
            Some(split) => split,
            None => return Ok(self.handler.replace(handler)),
        };

        let wild = part.starts_with(':') || part.starts_with('*');
        let position = if wild {
            match self.children.iter().position(|child| child.is_wild) {
                Some(i) if self.children[i].segment != *part => {
                    return Err(RouteError::ConflictingWildcard {
                        segment: part.to_string(),
                        existing: self.children[i].segment.clone(),
                        path: pattern.to_string(),
                    });
                }
                found => found,
            }
        } else {
            self.children
                .iter()
                .position(|child| !child.is_wild && child.segment == *part)
        };

        let index = match position {
            Some(i) => i,
            None => {
                self.children.push(TrieNode::with_segment(part.to_string()));
                self.children.len() - 1
            }
        };
        self.children[index].insert(pattern, rest, handler)
    }

    /// Walks the tree for `parts`. A static child always beats the wild child
    /// and a choice made at one level is never revisited.
    pub(crate) fn search<'a>(&'a self, parts: &[&str], params: &mut Params) -> Option<&'a T> {
        let (part, rest) = match parts.split_first() {
            Some(split) => split,
            None => return self.handler.as_ref(),
        };

        if let Some(child) = self.static_child(part) {
            return child.search(rest, params);
        }

        let child = self.wild_child()?;
        let name = &child.segment[1..];
        if child.segment.starts_with('*') {
            params.push(Param::new(name, &parts.join("/")));
            return child.handler.as_ref();
        }
        params.push(Param::new(name, part));
        child.search(rest, params)
    }
}
