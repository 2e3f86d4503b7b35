//! Error taxonomy for the move protocol.
//!
//! Every rejected command surfaces a specific error kind to its caller;
//! there is no silent failure path. All [`MoveError`] variants from
//! `submit` are recoverable: they reject the command and leave engine
//! state unchanged (validation fully precedes mutation).

use thiserror::Error;

use crate::{Player, SizeTier};

/// Why a move command was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The game has already been won or drawn; only a reset leaves
    /// a terminal state.
    #[error("game already ended")]
    GameAlreadyEnded,

    /// The command's owner does not hold the current turn.
    #[error("not this player's turn: {current:?} to move")]
    WrongTurn {
        /// The player who actually holds the turn.
        current: Player,
    },

    /// The owner's pool has no unplaced marker of the requested size.
    #[error("no marker of size tier {} left in pool", .0.index())]
    OutOfStock(SizeTier),

    /// A player may never replace their own piece, regardless of size.
    #[error("cannot overrule own marker")]
    CannotOverruleOwnMarker,

    /// Overrule requires strictly greater size than the occupant.
    #[error("size tier {} cannot overrule occupant of tier {}", placed.index(), occupant.index())]
    InsufficientSize {
        placed: SizeTier,
        occupant: SizeTier,
    },

    /// The wire command was syntactically invalid or had missing,
    /// unknown, or out-of-range fields. Rejected before any engine call.
    #[error("malformed command: {0}")]
    MalformedCommand(String),

    /// The target position lies outside the grid.
    #[error("position ({row}, {column}) out of bounds")]
    PositionOutOfBounds { row: i64, column: i64 },
}

/// Why an undo request failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UndoError {
    /// No move has been accepted since the last undo or reset
    /// (undo is single-level).
    #[error("nothing to undo")]
    NothingToUndo,

    /// Undo targeted a cell with an empty stack. Unreachable via the
    /// public protocol; indicates internal inconsistency.
    #[error("undo on empty cell")]
    EmptyCell,

    /// A marker was returned to a pool it was never drawn from, or the
    /// return would exceed the pool's initial allocation. Pool
    /// bookkeeping violation; unreachable via the public protocol.
    #[error("invalid marker return to pool")]
    InvalidReturn,
}

/// Why the AI could not produce a move command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AiError {
    /// No empty cell remains in the snapshot.
    #[error("no empty cell available")]
    BoardFull,

    /// The acting player's pool has no markers left to place.
    #[error("marker pool exhausted")]
    PoolExhausted,
}
