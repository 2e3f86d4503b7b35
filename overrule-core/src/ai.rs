//! AI opponent: minimax position search plus random size sampling.
//!
//! The AI reasons over occupant *types* only — sizes and stack depth are
//! discarded — on the fixed 3×3 grid. Position and size are chosen
//! independently: the search never considers which size will be placed.
//! That is the original product behavior, preserved as a documented
//! limitation rather than silently strengthened.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::error::AiError;
use crate::marker::MarkerPool;
use crate::protocol::BoardSnapshot;
use crate::{MoveCommand, Player, SizeTier};

/// Empty-cell marker in the type grid.
const EMPTY: i8 = -1;

type TypeGrid = [[i8; 3]; 3];

/// An automated player. Reads the board through a read-only snapshot
/// and submits commands through the same `RuleEngine::submit` entry
/// point as any other actor.
#[derive(Clone, Copy, Debug)]
pub struct AiPlayer {
    player: Player,
}

impl AiPlayer {
    pub fn new(player: Player) -> AiPlayer {
        AiPlayer { player }
    }

    #[inline]
    pub fn player(&self) -> Player {
        self.player
    }

    /// Pick a target cell by full-depth minimax (no pruning; the search
    /// space is at most 9! states). The search always roots on Second
    /// as the maximizer with terminal values +1 (Second wins), -1
    /// (First wins), 0 (draw). Ties break toward the first candidate in
    /// row-major scan order.
    ///
    /// Returns `None` when no empty cell exists or the snapshot is not
    /// a 3×3 grid.
    pub fn choose_move(&self, snapshot: &BoardSnapshot) -> Option<(u8, u8)> {
        let mut grid = grid_from_snapshot(snapshot)?;

        let mut best: Option<((u8, u8), i32)> = None;
        for row in 0..3 {
            for col in 0..3 {
                if grid[row][col] != EMPTY {
                    continue;
                }
                grid[row][col] = Player::Second.index() as i8;
                let score = minimax(&mut grid, false);
                grid[row][col] = EMPTY;
                // Strict improvement keeps the first candidate on ties
                if best.map_or(true, |(_, s)| score > s) {
                    best = Some(((row as u8, col as u8), score));
                }
            }
        }
        best.map(|(pos, _)| pos)
    }

    /// Sample a size uniformly at random among the player's remaining
    /// unplaced markers — a tier with more markers left is
    /// proportionally more likely. Independent of `choose_move`.
    pub fn choose_size<R: Rng + ?Sized>(
        &self,
        pool: &MarkerPool,
        rng: &mut R,
    ) -> Option<SizeTier> {
        pool.remaining_sizes().choose(rng).copied()
    }

    /// Produce a move command for the current snapshot and pool.
    /// Failures are surfaced to the caller, never swallowed.
    pub fn make_command<R: Rng + ?Sized>(
        &self,
        snapshot: &BoardSnapshot,
        pool: &MarkerPool,
        rng: &mut R,
    ) -> Result<MoveCommand, AiError> {
        let (row, column) = self.choose_move(snapshot).ok_or(AiError::BoardFull)?;
        let size = self.choose_size(pool, rng).ok_or(AiError::PoolExhausted)?;
        Ok(MoveCommand {
            row,
            column,
            owner: self.player,
            size,
        })
    }
}

fn grid_from_snapshot(snapshot: &BoardSnapshot) -> Option<TypeGrid> {
    if snapshot.rows() != 3 || snapshot.board.iter().any(|row| row.len() != 3) {
        return None;
    }
    let mut grid = [[EMPTY; 3]; 3];
    for (r, row) in snapshot.board.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            grid[r][c] = cell.owner;
        }
    }
    Some(grid)
}

fn wins(grid: &TypeGrid, player: Player) -> bool {
    let p = player.index() as i8;
    for i in 0..3 {
        if (grid[i][0] == p && grid[i][1] == p && grid[i][2] == p)
            || (grid[0][i] == p && grid[1][i] == p && grid[2][i] == p)
        {
            return true;
        }
    }
    (grid[0][0] == p && grid[1][1] == p && grid[2][2] == p)
        || (grid[0][2] == p && grid[1][1] == p && grid[2][0] == p)
}

fn is_full(grid: &TypeGrid) -> bool {
    grid.iter().flatten().all(|&cell| cell != EMPTY)
}

/// Terminal evaluation: +1 Second wins, -1 First wins, 0 otherwise.
fn evaluate(grid: &TypeGrid) -> i32 {
    if wins(grid, Player::First) {
        -1
    } else if wins(grid, Player::Second) {
        1
    } else {
        0
    }
}

fn minimax(grid: &mut TypeGrid, maximizing: bool) -> i32 {
    let score = evaluate(grid);
    if score != 0 {
        return score;
    }
    if is_full(grid) {
        return 0;
    }

    let (mover, mut best) = if maximizing {
        (Player::Second.index() as i8, i32::MIN)
    } else {
        (Player::First.index() as i8, i32::MAX)
    };

    for row in 0..3 {
        for col in 0..3 {
            if grid[row][col] != EMPTY {
                continue;
            }
            grid[row][col] = mover;
            let score = minimax(grid, !maximizing);
            grid[row][col] = EMPTY;
            best = if maximizing {
                best.max(score)
            } else {
                best.min(score)
            };
        }
    }
    best
}
