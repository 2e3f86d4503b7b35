//! Winning-pattern scanner.
//!
//! Stateless and pure: scans top occupants only, never mutates the
//! board, safe to call after every move. Fixed scan order — rows
//! top-to-bottom, then columns left-to-right, then down-right diagonals,
//! then down-left diagonals — so the first pattern found is
//! deterministic. A valid board holds at most one winner at a time
//! (moves are applied one at a time), so the tie-break never matters
//! in practice.

use crate::{Board, Player, Pos};

/// Find a run of `match_length` consecutive same-owner cells along a
/// row, column, or diagonal. Returns the positions of the first run
/// found, or `None`.
pub fn find_winning_pattern(board: &Board) -> Option<Vec<Pos>> {
    let rows = board.rows();
    let m = board.match_length();
    if m == 0 || m > rows {
        return None;
    }

    // Rows, top to bottom
    for r in 0..rows {
        let line: Vec<Pos> = (0..rows).map(|c| Pos::new(r, c)).collect();
        if let Some(run) = scan_line(board, &line, m) {
            return Some(run);
        }
    }

    // Columns, left to right
    for c in 0..rows {
        let line: Vec<Pos> = (0..rows).map(|r| Pos::new(r, c)).collect();
        if let Some(run) = scan_line(board, &line, m) {
            return Some(run);
        }
    }

    // Down-right diagonals long enough to hold a run. On a 3×3 grid
    // with match length 3 this is exactly the main diagonal.
    for start in diagonal_starts(rows, m, true) {
        let line = walk(rows, start, 1);
        if let Some(run) = scan_line(board, &line, m) {
            return Some(run);
        }
    }

    // Down-left diagonals; on 3×3 exactly the anti-diagonal.
    for start in diagonal_starts(rows, m, false) {
        let line = walk(rows, start, -1);
        if let Some(run) = scan_line(board, &line, m) {
            return Some(run);
        }
    }

    None
}

/// Scan one line of positions for `m` consecutive cells topped by the
/// same owner.
fn scan_line(board: &Board, line: &[Pos], m: u8) -> Option<Vec<Pos>> {
    let m = m as usize;
    if line.len() < m {
        return None;
    }
    for window in line.windows(m) {
        let first: Option<Player> = board.occupant_type(window[0]);
        if first.is_some() && window.iter().all(|&p| board.occupant_type(p) == first) {
            return Some(window.to_vec());
        }
    }
    None
}

/// Starting positions of all diagonals with at least `m` cells.
/// `down_right` selects direction: column step +1 or -1.
fn diagonal_starts(rows: u8, m: u8, down_right: bool) -> Vec<Pos> {
    let mut starts = Vec::new();
    for r in 0..rows {
        for c in 0..rows {
            let on_edge = if down_right {
                r == 0 || c == 0
            } else {
                r == 0 || c == rows - 1
            };
            if !on_edge {
                continue;
            }
            let len = if down_right {
                (rows - r).min(rows - c)
            } else {
                (rows - r).min(c + 1)
            };
            if len >= m {
                starts.push(Pos::new(r, c));
            }
        }
    }
    starts
}

/// Walk a diagonal from `start` to the board edge. `col_step` is +1 for
/// down-right, -1 for down-left.
fn walk(rows: u8, start: Pos, col_step: i8) -> Vec<Pos> {
    let mut line = Vec::new();
    let mut r = start.row as i16;
    let mut c = start.col as i16;
    while r < rows as i16 && (0..rows as i16).contains(&c) {
        line.push(Pos::new(r as u8, c as u8));
        r += 1;
        c += col_step as i16;
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::MarkerPool;
    use crate::SizeTier;

    fn place(board: &mut Board, pos: Pos, owner: Player) {
        let mut pool = MarkerPool::new(owner, &[1]);
        board.cell_mut(pos).accept(pool.take(SizeTier(0)).unwrap());
    }

    #[test]
    fn test_empty_board_no_pattern() {
        let board = Board::new(3, 3);
        assert_eq!(find_winning_pattern(&board), None);
    }

    #[test]
    fn test_top_row_win() {
        let mut board = Board::new(3, 3);
        for c in 0..3 {
            place(&mut board, Pos::new(0, c), Player::First);
        }
        assert_eq!(
            find_winning_pattern(&board),
            Some(vec![Pos::new(0, 0), Pos::new(0, 1), Pos::new(0, 2)])
        );
    }

    #[test]
    fn test_column_win() {
        let mut board = Board::new(3, 3);
        for r in 0..3 {
            place(&mut board, Pos::new(r, 1), Player::Second);
        }
        assert_eq!(
            find_winning_pattern(&board),
            Some(vec![Pos::new(0, 1), Pos::new(1, 1), Pos::new(2, 1)])
        );
    }

    #[test]
    fn test_main_diagonal_win() {
        let mut board = Board::new(3, 3);
        for i in 0..3 {
            place(&mut board, Pos::new(i, i), Player::First);
        }
        assert_eq!(
            find_winning_pattern(&board),
            Some(vec![Pos::new(0, 0), Pos::new(1, 1), Pos::new(2, 2)])
        );
    }

    #[test]
    fn test_anti_diagonal_win() {
        let mut board = Board::new(3, 3);
        for i in 0..3u8 {
            place(&mut board, Pos::new(i, 2 - i), Player::Second);
        }
        assert_eq!(
            find_winning_pattern(&board),
            Some(vec![Pos::new(0, 2), Pos::new(1, 1), Pos::new(2, 0)])
        );
    }

    #[test]
    fn test_mixed_owners_no_pattern() {
        let mut board = Board::new(3, 3);
        place(&mut board, Pos::new(0, 0), Player::First);
        place(&mut board, Pos::new(0, 1), Player::Second);
        place(&mut board, Pos::new(0, 2), Player::First);
        assert_eq!(find_winning_pattern(&board), None);
    }

    #[test]
    fn test_row_beats_column_in_scan_order() {
        let mut board = Board::new(3, 3);
        // First holds both row 0 and column 0
        for c in 0..3 {
            place(&mut board, Pos::new(0, c), Player::First);
        }
        for r in 1..3 {
            place(&mut board, Pos::new(r, 0), Player::First);
        }
        let run = find_winning_pattern(&board).unwrap();
        assert_eq!(run, vec![Pos::new(0, 0), Pos::new(0, 1), Pos::new(0, 2)]);
    }

    #[test]
    fn test_larger_board_window() {
        // match length 3 on a 4×4 grid: run not anchored at a corner
        let mut board = Board::new(4, 3);
        for c in 1..4 {
            place(&mut board, Pos::new(2, c), Player::Second);
        }
        assert_eq!(
            find_winning_pattern(&board),
            Some(vec![Pos::new(2, 1), Pos::new(2, 2), Pos::new(2, 3)])
        );
    }

    #[test]
    fn test_larger_board_off_diagonal() {
        let mut board = Board::new(4, 3);
        for i in 0..3u8 {
            place(&mut board, Pos::new(i + 1, i), Player::First);
        }
        assert_eq!(
            find_winning_pattern(&board),
            Some(vec![Pos::new(1, 0), Pos::new(2, 1), Pos::new(3, 2)])
        );
    }
}
