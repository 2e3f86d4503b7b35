//! Session configuration.
//!
//! Supplied by the collaborator that starts a game session. Replaces the
//! original's scene-name branching: draw detection is an explicit flag
//! here, set by whoever knows which mode is active.

use serde::{Deserialize, Serialize};

/// Configuration for one game session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Grid side length. Fixed at 3 for the supported modes.
    pub rows: u8,
    /// Number of same-owner cells in a line required to win.
    pub match_length: u8,
    /// Markers allocated per size tier per player (index = tier).
    pub pool_counts: Vec<u8>,
    /// Whether a full board with no winner ends the game as a draw.
    /// The flat mode enables this; the tiered mode does not, since
    /// overrules keep a full board playable.
    pub draw_on_board_full: bool,
}

impl SessionConfig {
    /// Flat mode: six single-tier markers per player, draws enabled.
    pub fn flat() -> SessionConfig {
        SessionConfig {
            rows: 3,
            match_length: 3,
            pool_counts: vec![6],
            draw_on_board_full: true,
        }
    }

    /// Tiered mode: three markers in each of three size tiers per
    /// player, draws disabled.
    pub fn tiered() -> SessionConfig {
        SessionConfig {
            rows: 3,
            match_length: 3,
            pool_counts: vec![3, 3, 3],
            draw_on_board_full: false,
        }
    }

    /// Maximum accepted moves before the board-full draw check fires.
    #[inline]
    pub fn max_moves(&self) -> u32 {
        self.rows as u32 * self.rows as u32
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::tiered()
    }
}
