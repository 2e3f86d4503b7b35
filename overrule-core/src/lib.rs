//! Rule engine for a size-tiered, stackable tic-tac-toe variant.
//!
//! Players hold a finite pool of markers in several size tiers. A larger
//! marker may *overrule* (replace) a smaller marker of the opposing player
//! already occupying a cell; the replaced marker is permanently removed
//! from play. The engine tracks board occupancy, enforces move legality
//! (turn order, pool scarcity, overrule rules), detects winning patterns,
//! and supplies a minimax AI opponent.
//!
//! Module layout:
//! - [`marker`] — markers and per-player marker pools
//! - [`cell`] — one board position and its marker stack
//! - [`board`] — the grid plus turn counter and end-of-game state
//! - [`pattern`] — winning-pattern scanner
//! - [`engine`] — move validation, state machine, observer notifications
//! - [`protocol`] — JSON wire format for move commands and board snapshots
//! - [`ai`] — minimax position search and random size sampling
//! - [`config`] — session configuration (grid, match length, pool counts)
//!
//! All mutation flows through [`engine::RuleEngine::submit`] as a
//! [`MoveCommand`]; the AI is an ordinary actor using the same entry point.

use serde::{Deserialize, Serialize};

pub mod ai;
pub mod board;
pub mod cell;
pub mod config;
pub mod engine;
pub mod error;
pub mod marker;
pub mod pattern;
pub mod protocol;

pub use ai::AiPlayer;
pub use board::Board;
pub use cell::Cell;
pub use config::SessionConfig;
pub use engine::{GameObserver, GameState, MoveOutcome, RuleEngine};
pub use error::{AiError, MoveError, UndoError};
pub use marker::{Marker, MarkerPool};
pub use protocol::{BoardSnapshot, CellSnapshot};

/// Player identifier.
///
/// `First` moves on even turns, `Second` on odd turns
/// (`current_turn = turn_count % 2`).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Player {
    First = 0,
    Second = 1,
}

impl Player {
    /// Get the opponent player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// Wire index of this player (0 = First, 1 = Second).
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Convert from a wire index (0 or 1) to a Player.
    #[inline]
    pub fn from_index(idx: u8) -> Option<Player> {
        match idx {
            0 => Some(Player::First),
            1 => Some(Player::Second),
            _ => None,
        }
    }
}

/// Ordered marker size rank.
///
/// A newtype over the tier index (0 = smallest) rather than a fixed enum:
/// the set of tiers and per-tier marker counts are supplied by the session
/// configuration, not hardcoded. Ordering adjudicates overrule legality.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeTier(pub u8);

impl SizeTier {
    /// Tier index (0-based).
    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    /// Whether a marker of this size may overrule one of `other`.
    /// Requires strictly greater size.
    #[inline]
    pub fn can_overrule(self, other: SizeTier) -> bool {
        self.0 > other.0
    }
}

/// Position on the board.
///
/// Layout for the standard 3×3 grid (row, column):
/// ```text
///   (0,0) (0,1) (0,2)
///   (1,0) (1,1) (1,2)
///   (2,0) (2,1) (2,2)
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    /// Create a position from row and column.
    #[inline]
    pub fn new(row: u8, col: u8) -> Pos {
        Pos { row, col }
    }

    /// Row-major cell index for a board with `rows` columns per row.
    #[inline]
    pub fn cell_index(self, rows: u8) -> usize {
        self.row as usize * rows as usize + self.col as usize
    }

    /// Iterate over all positions of a `rows`×`rows` grid in row-major order.
    pub fn all(rows: u8) -> impl Iterator<Item = Pos> {
        (0..rows).flat_map(move |r| (0..rows).map(move |c| Pos::new(r, c)))
    }
}

/// A validated move request: place a marker of `size` owned by `owner`
/// at (`row`, `column`). Immutable once constructed; the sole unit of
/// mutation accepted by [`engine::RuleEngine::submit`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MoveCommand {
    pub row: u8,
    pub column: u8,
    pub owner: Player,
    pub size: SizeTier,
}

impl MoveCommand {
    /// Target position of this command.
    #[inline]
    pub fn pos(&self) -> Pos {
        Pos::new(self.row, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_opponent() {
        assert_eq!(Player::First.opponent(), Player::Second);
        assert_eq!(Player::Second.opponent(), Player::First);
    }

    #[test]
    fn test_player_index_roundtrip() {
        assert_eq!(Player::from_index(0), Some(Player::First));
        assert_eq!(Player::from_index(1), Some(Player::Second));
        assert_eq!(Player::from_index(2), None);
        assert_eq!(Player::from_index(Player::Second.index()), Some(Player::Second));
    }

    #[test]
    fn test_size_can_overrule() {
        assert!(!SizeTier(0).can_overrule(SizeTier(0)));
        assert!(!SizeTier(0).can_overrule(SizeTier(1)));
        assert!(SizeTier(1).can_overrule(SizeTier(0)));
        assert!(SizeTier(2).can_overrule(SizeTier(1)));
        assert!(!SizeTier(2).can_overrule(SizeTier(2)));
    }

    #[test]
    fn test_pos_cell_index() {
        assert_eq!(Pos::new(0, 0).cell_index(3), 0);
        assert_eq!(Pos::new(0, 2).cell_index(3), 2);
        assert_eq!(Pos::new(1, 0).cell_index(3), 3);
        assert_eq!(Pos::new(2, 2).cell_index(3), 8);
    }

    #[test]
    fn test_pos_all_row_major() {
        let positions: Vec<Pos> = Pos::all(3).collect();
        assert_eq!(positions.len(), 9);
        assert_eq!(positions[0], Pos::new(0, 0));
        assert_eq!(positions[1], Pos::new(0, 1));
        assert_eq!(positions[3], Pos::new(1, 0));
        assert_eq!(positions[8], Pos::new(2, 2));
    }
}
