//! Layout history (undo/redo) as whole-tree snapshots

use std::collections::VecDeque;

use super::panel_tree::Container;

/// Bounded undo/redo stacks of previous roots
#[derive(Debug, Clone)]
pub struct LayoutHistory {
    undo_stack: VecDeque<Container>,
    redo_stack: Vec<Container>,
    limit: usize,
}

impl LayoutHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit,
        }
    }

    /// Remember the tree that was current before a change.
    /// Any redo entries are discarded.
    pub fn record(&mut self, previous: Container) {
        self.redo_stack.clear();
        if self.limit == 0 {
            return;
        }
        if self.undo_stack.len() == self.limit {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(previous);
    }

    /// Swap `current` for the most recent snapshot
    pub fn undo(&mut self, current: Container) -> Result<Container, Container> {
        match self.undo_stack.pop_back() {
            Some(previous) => {
                self.redo_stack.push(current);
                Ok(previous)
            }
            None => Err(current),
        }
    }

    /// Swap `current` for the most recently undone tree
    pub fn redo(&mut self, current: Container) -> Result<Container, Container> {
        match self.redo_stack.pop() {
            Some(next) => {
                self.undo_stack.push_back(current);
                Ok(next)
            }
            None => Err(current),
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for LayoutHistory {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Axis, Panel};

    fn tree(n: usize) -> Container {
        let children = (0..n)
            .map(|i| Panel::leaf(format!("p{}", i), "feed", 10.0, 5.0, 100.0))
            .collect();
        Container::new(Axis::Horizontal, children)
    }

    #[test]
    fn test_undo_then_redo() {
        let mut history = LayoutHistory::new(10);
        history.record(tree(1));
        let restored = history.undo(tree(2)).unwrap();
        assert_eq!(restored, tree(1));
        assert!(history.can_redo());
        let again = history.redo(restored).unwrap();
        assert_eq!(again, tree(2));
    }

    #[test]
    fn test_undo_empty_hands_back_current() {
        let mut history = LayoutHistory::new(10);
        assert_eq!(history.undo(tree(3)), Err(tree(3)));
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = LayoutHistory::new(2);
        history.record(tree(1));
        history.record(tree(2));
        history.record(tree(3));
        assert_eq!(history.undo_depth(), 2);
        assert_eq!(history.undo(tree(4)).unwrap(), tree(3));
        assert_eq!(history.undo(tree(3)).unwrap(), tree(2));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = LayoutHistory::new(10);
        history.record(tree(1));
        let _ = history.undo(tree(2));
        history.record(tree(5));
        assert!(!history.can_redo());
    }
}
