//! One board position and its ordered marker stack.

use crate::error::UndoError;
use crate::marker::Marker;
use crate::{Player, SizeTier};

/// A single cell. The stack records markers placed over time; the
/// topmost marker is the currently visible occupant. Append-only except
/// for the single most recent pop on undo and the removal of an
/// overruled top.
#[derive(Clone, Debug, Default)]
pub struct Cell {
    stack: Vec<Marker>,
}

impl Cell {
    /// Create an empty cell.
    pub fn new() -> Cell {
        Cell { stack: Vec::new() }
    }

    /// Owner and size of the topmost marker, or `None` if empty.
    pub fn top_occupant(&self) -> Option<(Player, SizeTier)> {
        self.stack.last().map(|m| (m.owner(), m.size()))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    #[inline]
    pub fn stack_height(&self) -> usize {
        self.stack.len()
    }

    /// Push `marker` onto the stack, returning whatever was on top
    /// before — the caller decides whether to discard it (overrule).
    /// Does not validate legality; that is the rule engine's job.
    pub fn accept(&mut self, marker: Marker) -> Option<Marker> {
        let previous = self.stack.pop();
        self.stack.push(marker);
        previous
    }

    /// Pop and return the most recently pushed marker.
    /// Fails with `EmptyCell` if the stack is empty.
    pub fn undo(&mut self) -> Result<Marker, UndoError> {
        self.stack.pop().ok_or(UndoError::EmptyCell)
    }
}

/// Row-major grid of cells, sized at construction.
pub(crate) fn make_grid(rows: u8) -> Vec<Cell> {
    (0..rows as usize * rows as usize).map(|_| Cell::new()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::MarkerPool;

    fn marker(owner: Player, size: SizeTier) -> Marker {
        let mut counts = vec![0u8; size.index() as usize + 1];
        counts[size.index() as usize] = 1;
        MarkerPool::new(owner, &counts).take(size).unwrap()
    }

    #[test]
    fn test_empty_cell() {
        let cell = Cell::new();
        assert!(cell.is_empty());
        assert_eq!(cell.top_occupant(), None);
    }

    #[test]
    fn test_accept_returns_previous_top() {
        let mut cell = Cell::new();
        assert_eq!(cell.accept(marker(Player::First, SizeTier(0))), None);
        assert_eq!(cell.top_occupant(), Some((Player::First, SizeTier(0))));

        let replaced = cell.accept(marker(Player::Second, SizeTier(1)));
        assert_eq!(
            replaced.map(|m| (m.owner(), m.size())),
            Some((Player::First, SizeTier(0)))
        );
        assert_eq!(cell.top_occupant(), Some((Player::Second, SizeTier(1))));
        // The overruled marker left the stack entirely
        assert_eq!(cell.stack_height(), 1);
    }

    #[test]
    fn test_undo_pops_most_recent() {
        let mut cell = Cell::new();
        cell.accept(marker(Player::First, SizeTier(0)));
        let popped = cell.undo().unwrap();
        assert_eq!(popped.owner(), Player::First);
        assert!(cell.is_empty());
    }

    #[test]
    fn test_undo_empty_fails() {
        let mut cell = Cell::new();
        assert_eq!(cell.undo().err(), Some(UndoError::EmptyCell));
    }
}
