//! Move validation, state transitions, and observer notifications.
//!
//! The engine processes one command fully (validate → mutate →
//! win-check → notify) before accepting the next; callers must
//! serialize access. Validation fully precedes mutation: a rejected
//! command leaves every piece of state untouched.

use crate::board::Board;
use crate::config::SessionConfig;
use crate::error::{MoveError, UndoError};
use crate::marker::MarkerPool;
use crate::pattern;
use crate::protocol::{self, BoardSnapshot};
use crate::{MoveCommand, Player, Pos};

/// Game state machine. `Won` and `Drawn` are terminal; only an explicit
/// reset (or a symmetric undo of the ending move) leaves them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    InProgress,
    Won(Player),
    Drawn,
}

impl GameState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != GameState::InProgress
    }

    /// The winning player, if any.
    #[inline]
    pub fn winner(self) -> Option<Player> {
        match self {
            GameState::Won(player) => Some(player),
            _ => None,
        }
    }
}

/// Result of an accepted move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub command: MoveCommand,
    pub state: GameState,
    pub winning_pattern: Option<Vec<Pos>>,
}

/// Engine → collaborator notifications. Keeps the core free of direct
/// references to renderers; delivery is at-least-once per event.
pub trait GameObserver: Send {
    /// An accepted move was applied.
    fn on_move_applied(&mut self, _outcome: &MoveOutcome) {}

    /// The ended flag changed. `ended == false` with no winner is sent
    /// on reset (and on undo of an ending move) so the UI layer can
    /// clear end-of-game presentation.
    fn on_game_ended(&mut self, _ended: bool, _winner: Option<Player>) {}
}

/// Bookkeeping for single-level undo.
struct LastMove {
    pos: Pos,
    owner: Player,
    ended_game: bool,
}

/// Validates and applies move commands against the board and marker
/// pools, owns turn and ended state transitions, and emits end-of-game
/// notifications.
pub struct RuleEngine {
    config: SessionConfig,
    board: Board,
    pools: [MarkerPool; 2],
    state: GameState,
    last_move: Option<LastMove>,
    observers: Vec<Box<dyn GameObserver>>,
}

impl RuleEngine {
    /// Create an engine with a fresh board and full pools.
    pub fn new(config: SessionConfig) -> RuleEngine {
        let board = Board::new(config.rows, config.match_length);
        let pools = Self::make_pools(&config);
        RuleEngine {
            config,
            board,
            pools,
            state: GameState::InProgress,
            last_move: None,
            observers: Vec::new(),
        }
    }

    fn make_pools(config: &SessionConfig) -> [MarkerPool; 2] {
        [
            MarkerPool::new(Player::First, &config.pool_counts),
            MarkerPool::new(Player::Second, &config.pool_counts),
        ]
    }

    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// The player holding the current turn.
    #[inline]
    pub fn current_turn(&self) -> Player {
        self.board.current_turn()
    }

    pub fn pool(&self, player: Player) -> &MarkerPool {
        &self.pools[player.index() as usize]
    }

    /// Row-major snapshot of the board for renderers and the AI.
    pub fn snapshot(&self) -> BoardSnapshot {
        self.board.snapshot()
    }

    /// Register an observer for move and end-of-game notifications.
    pub fn add_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    /// Validate and apply one move command.
    ///
    /// Rejections leave all state unchanged. On success the marker is
    /// drawn from its pool and pushed onto the cell (permanently
    /// discarding an overruled occupant), the turn advances, and the
    /// pattern finder decides whether the game ends.
    pub fn submit(&mut self, command: MoveCommand) -> Result<MoveOutcome, MoveError> {
        if self.state.is_terminal() {
            return Err(MoveError::GameAlreadyEnded);
        }
        if !self.board.in_bounds(command.row, command.column) {
            return Err(MoveError::PositionOutOfBounds {
                row: command.row as i64,
                column: command.column as i64,
            });
        }
        let current = self.board.current_turn();
        if command.owner != current {
            return Err(MoveError::WrongTurn { current });
        }
        // Availability pre-check: nothing is mutated on failure.
        if !self.pool(command.owner).has(command.size) {
            return Err(MoveError::OutOfStock(command.size));
        }
        let pos = command.pos();
        if let Some((occupant_owner, occupant_size)) = self.board.cell(pos).top_occupant() {
            if occupant_owner == command.owner {
                return Err(MoveError::CannotOverruleOwnMarker);
            }
            if !command.size.can_overrule(occupant_size) {
                return Err(MoveError::InsufficientSize {
                    placed: command.size,
                    occupant: occupant_size,
                });
            }
        }

        // Legal: mutate. The pool was pre-checked, so take cannot fail.
        let marker = self.pools[command.owner.index() as usize].take(command.size)?;
        // An overruled occupant is removed from play, not returned to
        // any pool. Deliberate scarcity rule.
        let _overruled = self.board.cell_mut(pos).accept(marker);
        self.board.turn_count += 1;

        if let Some(run) = pattern::find_winning_pattern(&self.board) {
            self.state = GameState::Won(command.owner);
            self.board.ended = true;
            self.board.winning_pattern = Some(run);
        } else if self.config.draw_on_board_full
            && self.board.turn_count >= self.config.max_moves()
        {
            self.state = GameState::Drawn;
            self.board.ended = true;
        }

        let ended = self.board.ended;
        self.last_move = Some(LastMove {
            pos,
            owner: command.owner,
            ended_game: ended,
        });

        let outcome = MoveOutcome {
            command,
            state: self.state,
            winning_pattern: self.board.winning_pattern.clone(),
        };
        for observer in &mut self.observers {
            observer.on_move_applied(&outcome);
        }
        if ended {
            let winner = self.state.winner();
            for observer in &mut self.observers {
                observer.on_game_ended(true, winner);
            }
        }
        Ok(outcome)
    }

    /// Parse and submit a wire-format command (optionally carrying the
    /// `Command:` prefix). Malformed input is rejected before any
    /// engine state is consulted.
    pub fn submit_wire(&mut self, input: &str) -> Result<MoveOutcome, MoveError> {
        let command = protocol::parse_command_line(input, self.config.rows)?;
        self.submit(command)
    }

    /// Reverse the most recent accepted move. Single-level: no redo,
    /// no history beyond depth 1.
    ///
    /// Fully symmetric: the marker returns to its owner's pool, the
    /// turn counter decrements, and if the undone move had ended the
    /// game the ended flag and winning pattern are cleared. A marker
    /// that was overruled by the undone move stays removed from play.
    pub fn undo(&mut self) -> Result<(), UndoError> {
        let last = self.last_move.take().ok_or(UndoError::NothingToUndo)?;
        let marker = self.board.cell_mut(last.pos).undo()?;
        self.pools[last.owner.index() as usize].give_back(marker)?;
        self.board.turn_count -= 1;
        if last.ended_game {
            self.board.ended = false;
            self.board.winning_pattern = None;
            self.state = GameState::InProgress;
            for observer in &mut self.observers {
                observer.on_game_ended(false, None);
            }
        }
        Ok(())
    }

    /// Reinitialize the board and both pools from the session
    /// configuration, keeping engine wiring (observers) intact.
    /// Notifies observers that the game is no longer ended.
    pub fn reset(&mut self) {
        self.board.clear();
        self.pools = Self::make_pools(&self.config);
        self.state = GameState::InProgress;
        self.last_move = None;
        for observer in &mut self.observers {
            observer.on_game_ended(false, None);
        }
    }
}
