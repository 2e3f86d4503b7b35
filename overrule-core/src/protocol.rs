//! JSON wire format for move commands and board snapshots.
//!
//! A move command is a flat object with four required integer fields —
//! `row`, `column`, `type` (0 = First, 1 = Second), `size` (tier index).
//! Unknown or missing fields are rejected with `MalformedCommand` before
//! any engine call; out-of-grid coordinates with `PositionOutOfBounds`.
//!
//! The board snapshot is a row-major grid of `{ "type", "size" }` cells
//! with `-1` as the empty sentinel, wrapped as `{ "board": [...] }`.
//! External renderers and the AI both consume this export.

use serde::{Deserialize, Serialize};

use crate::error::MoveError;
use crate::{MoveCommand, Player, SizeTier};

/// Prefix accepted on command-line style input (`Command:{...}`).
pub const COMMAND_PREFIX: &str = "Command:";

/// Wire shape of a move command. Strict: extra fields are an error.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCommand {
    row: i64,
    column: i64,
    #[serde(rename = "type")]
    owner: i64,
    size: i64,
}

/// Parse a JSON move command against a `rows`×`rows` grid.
pub fn parse_command(input: &str, rows: u8) -> Result<MoveCommand, MoveError> {
    let raw: RawCommand = serde_json::from_str(input)
        .map_err(|e| MoveError::MalformedCommand(e.to_string()))?;

    let owner = u8::try_from(raw.owner)
        .ok()
        .and_then(Player::from_index)
        .ok_or_else(|| MoveError::MalformedCommand(format!("invalid player type {}", raw.owner)))?;

    let size = u8::try_from(raw.size)
        .map(SizeTier)
        .map_err(|_| MoveError::MalformedCommand(format!("invalid size tier {}", raw.size)))?;

    let in_grid = |v: i64| (0..rows as i64).contains(&v);
    if !in_grid(raw.row) || !in_grid(raw.column) {
        return Err(MoveError::PositionOutOfBounds {
            row: raw.row,
            column: raw.column,
        });
    }

    Ok(MoveCommand {
        row: raw.row as u8,
        column: raw.column as u8,
        owner,
        size,
    })
}

/// Parse input that may carry the `Command:` prefix used by text entry.
pub fn parse_command_line(input: &str, rows: u8) -> Result<MoveCommand, MoveError> {
    let body = input.strip_prefix(COMMAND_PREFIX).unwrap_or(input);
    parse_command(body.trim(), rows)
}

/// Serialize a command to its wire form (produced by the AI and by
/// network peers).
pub fn serialize_command(command: &MoveCommand) -> String {
    let raw = RawCommand {
        row: command.row as i64,
        column: command.column as i64,
        owner: command.owner.index() as i64,
        size: command.size.index() as i64,
    };
    // A flat struct of integers cannot fail to serialize
    serde_json::to_string(&raw).unwrap_or_default()
}

/// One cell of the board export: owner of the topmost marker and its
/// size, or `-1`/`-1` when empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    #[serde(rename = "type")]
    pub owner: i8,
    pub size: i8,
}

impl CellSnapshot {
    pub const EMPTY_SENTINEL: i8 = -1;

    /// Snapshot of an unoccupied cell.
    pub fn empty() -> CellSnapshot {
        CellSnapshot {
            owner: Self::EMPTY_SENTINEL,
            size: Self::EMPTY_SENTINEL,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.owner == Self::EMPTY_SENTINEL
    }
}

/// Read-only, row-major export of occupant types and top sizes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub board: Vec<Vec<CellSnapshot>>,
}

impl BoardSnapshot {
    /// Grid side length.
    pub fn rows(&self) -> u8 {
        self.board.len() as u8
    }

    /// Occupant type at (`row`, `col`): 0, 1, or `-1` for empty.
    pub fn occupant(&self, row: u8, col: u8) -> i8 {
        self.board[row as usize][col as usize].owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_command() {
        let cmd = parse_command(r#"{"row":1,"column":2,"type":0,"size":1}"#, 3).unwrap();
        assert_eq!(cmd.row, 1);
        assert_eq!(cmd.column, 2);
        assert_eq!(cmd.owner, Player::First);
        assert_eq!(cmd.size, SizeTier(1));
    }

    #[test]
    fn test_parse_missing_field() {
        let err = parse_command(r#"{"row":1,"column":2,"type":0}"#, 3).unwrap_err();
        assert!(matches!(err, MoveError::MalformedCommand(_)));
    }

    #[test]
    fn test_parse_unknown_field() {
        let err =
            parse_command(r#"{"row":1,"column":2,"type":0,"size":1,"extra":9}"#, 3).unwrap_err();
        assert!(matches!(err, MoveError::MalformedCommand(_)));
    }

    #[test]
    fn test_parse_not_json() {
        assert!(matches!(
            parse_command("place at 0,0", 3),
            Err(MoveError::MalformedCommand(_))
        ));
    }

    #[test]
    fn test_parse_bad_player_type() {
        let err = parse_command(r#"{"row":0,"column":0,"type":2,"size":0}"#, 3).unwrap_err();
        assert!(matches!(err, MoveError::MalformedCommand(_)));
    }

    #[test]
    fn test_parse_negative_size() {
        let err = parse_command(r#"{"row":0,"column":0,"type":0,"size":-1}"#, 3).unwrap_err();
        assert!(matches!(err, MoveError::MalformedCommand(_)));
    }

    #[test]
    fn test_parse_out_of_bounds() {
        let err = parse_command(r#"{"row":3,"column":0,"type":0,"size":0}"#, 3).unwrap_err();
        assert_eq!(err, MoveError::PositionOutOfBounds { row: 3, column: 0 });

        let err = parse_command(r#"{"row":0,"column":-1,"type":0,"size":0}"#, 3).unwrap_err();
        assert_eq!(err, MoveError::PositionOutOfBounds { row: 0, column: -1 });
    }

    #[test]
    fn test_parse_command_line_prefix() {
        let cmd = parse_command_line(r#"Command:{"row":0,"column":0,"type":0,"size":0}"#, 3);
        assert!(cmd.is_ok());
        // Bare JSON also accepted
        let cmd = parse_command_line(r#"{"row":0,"column":0,"type":1,"size":0}"#, 3);
        assert!(cmd.is_ok());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let cmd = MoveCommand {
            row: 2,
            column: 0,
            owner: Player::Second,
            size: SizeTier(2),
        };
        let wire = serialize_command(&cmd);
        assert_eq!(parse_command(&wire, 3).unwrap(), cmd);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = BoardSnapshot {
            board: vec![vec![
                CellSnapshot { owner: 0, size: 2 },
                CellSnapshot::empty(),
            ]],
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(
            json,
            r#"{"board":[[{"type":0,"size":2},{"type":-1,"size":-1}]]}"#
        );
        let back: BoardSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
