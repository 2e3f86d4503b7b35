//! The grid of cells plus derived game state.
//!
//! The board owns occupancy only; legality checks and state transitions
//! live in the rule engine. `turn_count` strictly increases by 1 per
//! accepted move, and `ended` is monotone (false→true) except for an
//! explicit reset or a symmetric undo of the ending move.

use crate::cell::{make_grid, Cell};
use crate::protocol::{BoardSnapshot, CellSnapshot};
use crate::{Player, Pos};

/// Board state for one game session.
#[derive(Clone, Debug)]
pub struct Board {
    rows: u8,
    match_length: u8,
    cells: Vec<Cell>,
    pub(crate) turn_count: u32,
    pub(crate) ended: bool,
    pub(crate) winning_pattern: Option<Vec<Pos>>,
}

impl Board {
    /// Create an empty board.
    pub fn new(rows: u8, match_length: u8) -> Board {
        Board {
            rows,
            match_length,
            cells: make_grid(rows),
            turn_count: 0,
            ended: false,
            winning_pattern: None,
        }
    }

    #[inline]
    pub fn rows(&self) -> u8 {
        self.rows
    }

    #[inline]
    pub fn match_length(&self) -> u8 {
        self.match_length
    }

    /// Number of accepted moves so far.
    #[inline]
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Whether the game has been won or drawn.
    #[inline]
    pub fn ended(&self) -> bool {
        self.ended
    }

    /// Positions of the winning pattern, if the game was won.
    pub fn winning_pattern(&self) -> Option<&[Pos]> {
        self.winning_pattern.as_deref()
    }

    /// The player holding the current turn (`turn_count % 2`).
    #[inline]
    pub fn current_turn(&self) -> Player {
        if self.turn_count % 2 == 0 {
            Player::First
        } else {
            Player::Second
        }
    }

    /// Whether (`row`, `col`) lies on the grid.
    #[inline]
    pub fn in_bounds(&self, row: u8, col: u8) -> bool {
        row < self.rows && col < self.rows
    }

    pub fn cell(&self, pos: Pos) -> &Cell {
        &self.cells[pos.cell_index(self.rows)]
    }

    pub(crate) fn cell_mut(&mut self, pos: Pos) -> &mut Cell {
        let idx = pos.cell_index(self.rows);
        &mut self.cells[idx]
    }

    /// Owner of the topmost marker at `pos`, or `None` if the cell
    /// is empty.
    pub fn occupant_type(&self, pos: Pos) -> Option<Player> {
        self.cell(pos).top_occupant().map(|(owner, _)| owner)
    }

    /// Whether every cell holds at least one marker.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Total markers currently placed on the board (all stack levels).
    pub fn markers_placed(&self) -> usize {
        self.cells.iter().map(|c| c.stack_height()).sum()
    }

    /// Row-major snapshot of occupant types and top sizes, the export
    /// consumed by external renderers and by the AI.
    pub fn snapshot(&self) -> BoardSnapshot {
        let mut grid = Vec::with_capacity(self.rows as usize);
        for row in 0..self.rows {
            let mut cells = Vec::with_capacity(self.rows as usize);
            for col in 0..self.rows {
                let snap = match self.cell(Pos::new(row, col)).top_occupant() {
                    Some((owner, size)) => CellSnapshot {
                        owner: owner.index() as i8,
                        size: size.index() as i8,
                    },
                    None => CellSnapshot::empty(),
                };
                cells.push(snap);
            }
            grid.push(cells);
        }
        BoardSnapshot { board: grid }
    }

    /// Clear all cells and derived state, keeping the dimensions.
    pub(crate) fn clear(&mut self) {
        self.cells = make_grid(self.rows);
        self.turn_count = 0;
        self.ended = false;
        self.winning_pattern = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::MarkerPool;
    use crate::SizeTier;

    #[test]
    fn test_new_board_state() {
        let board = Board::new(3, 3);
        assert_eq!(board.turn_count(), 0);
        assert!(!board.ended());
        assert_eq!(board.winning_pattern(), None);
        assert_eq!(board.current_turn(), Player::First);
        assert!(!board.is_full());
        for pos in Pos::all(3) {
            assert_eq!(board.occupant_type(pos), None);
        }
    }

    #[test]
    fn test_turn_alternation() {
        let mut board = Board::new(3, 3);
        assert_eq!(board.current_turn(), Player::First);
        board.turn_count += 1;
        assert_eq!(board.current_turn(), Player::Second);
        board.turn_count += 1;
        assert_eq!(board.current_turn(), Player::First);
    }

    #[test]
    fn test_bounds() {
        let board = Board::new(3, 3);
        assert!(board.in_bounds(0, 0));
        assert!(board.in_bounds(2, 2));
        assert!(!board.in_bounds(3, 0));
        assert!(!board.in_bounds(0, 3));
    }

    #[test]
    fn test_snapshot_reports_top_marker() {
        let mut board = Board::new(3, 3);
        let mut pool = MarkerPool::new(Player::Second, &[0, 2]);
        let marker = pool.take(SizeTier(1)).unwrap();
        board.cell_mut(Pos::new(1, 2)).accept(marker);

        let snapshot = board.snapshot();
        assert_eq!(snapshot.board[1][2].owner, 1);
        assert_eq!(snapshot.board[1][2].size, 1);
        assert_eq!(snapshot.board[0][0], CellSnapshot::empty());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut board = Board::new(3, 3);
        let mut pool = MarkerPool::new(Player::First, &[1]);
        board
            .cell_mut(Pos::new(0, 0))
            .accept(pool.take(SizeTier(0)).unwrap());
        board.turn_count = 1;
        board.ended = true;
        board.winning_pattern = Some(vec![Pos::new(0, 0)]);

        board.clear();
        assert_eq!(board.turn_count(), 0);
        assert!(!board.ended());
        assert_eq!(board.winning_pattern(), None);
        assert_eq!(board.markers_placed(), 0);
    }
}
