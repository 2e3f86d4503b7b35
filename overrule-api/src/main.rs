//! Web API for the overrule game engine.
//!
//! Carries move commands from external actors (human input, network
//! peers) to the rule engine and schedules AI moves. The engine is
//! behind a mutex: one command is processed fully before the next.
//! AI moves run as cancellable one-shot timers — a 1 second thinking
//! delay, one pending timer per automated actor, aborted on reset,
//! mode change, or game end so a stale move never lands on a
//! reinitialized board.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::task::AbortHandle;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use overrule_core::engine::{GameObserver, GameState, MoveOutcome, RuleEngine};
use overrule_core::protocol::BoardSnapshot;
use overrule_core::{AiPlayer, Player, SessionConfig, SizeTier};

/// Thinking delay before an automated move is applied.
const THINK_DELAY: Duration = Duration::from_secs(1);

// =============================================================================
// Session State
// =============================================================================

/// One game session plus AI scheduling state.
struct ApiSession {
    engine: RuleEngine,
    ai_enabled: bool,
    ai_vs_ai: bool,
    /// Pending move timer per automated actor (index = player).
    pending: [Option<AbortHandle>; 2],
    /// Bumped whenever timers are cancelled; a stale timer that
    /// already fired checks this before touching the engine.
    generation: u64,
}

impl ApiSession {
    fn new(config: SessionConfig) -> ApiSession {
        let mut engine = RuleEngine::new(config);
        engine.add_observer(Box::new(TracingObserver));
        ApiSession {
            engine,
            ai_enabled: false,
            ai_vs_ai: false,
            pending: [None, None],
            generation: 0,
        }
    }

    /// Whether moves for `player` are produced by the AI.
    fn automated(&self, player: Player) -> bool {
        match player {
            Player::First => self.ai_vs_ai,
            Player::Second => self.ai_vs_ai || self.ai_enabled,
        }
    }

    /// Abort all pending move timers and invalidate in-flight ones.
    fn cancel_timers(&mut self) {
        for slot in self.pending.iter_mut() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
        self.generation = self.generation.wrapping_add(1);
    }
}

/// Logs engine notifications; stands in for the UI-facing observer.
struct TracingObserver;

impl GameObserver for TracingObserver {
    fn on_move_applied(&mut self, outcome: &MoveOutcome) {
        info!(
            row = outcome.command.row,
            column = outcome.command.column,
            player = outcome.command.owner.index(),
            size = outcome.command.size.index(),
            "move applied"
        );
    }

    fn on_game_ended(&mut self, ended: bool, winner: Option<Player>) {
        info!(ended, winner = winner.map(|p| p.index()), "game end state changed");
    }
}

struct AppStateInner {
    session: Mutex<ApiSession>,
}

type AppState = Arc<AppStateInner>;

// =============================================================================
// AI Scheduling
// =============================================================================

/// Schedule a one-shot AI move timer if the current turn belongs to an
/// automated actor and no timer is already pending for it.
fn schedule_ai(state: &AppState) {
    let mut session = state.session.lock().unwrap();
    if session.engine.state().is_terminal() {
        return;
    }
    let player = session.engine.current_turn();
    if !session.automated(player) {
        return;
    }
    let slot = player.index() as usize;
    if session.pending[slot].is_some() {
        // Debounce: one in-flight decision per actor
        return;
    }

    let generation = session.generation;
    let task_state = state.clone();
    let handle = tokio::spawn(async move {
        tokio::time::sleep(THINK_DELAY).await;
        apply_ai_move(task_state, player, generation);
    });
    session.pending[slot] = Some(handle.abort_handle());
    info!(player = player.index(), "AI move scheduled");
}

/// Timer body: compute and submit the AI move, then chain the next
/// timer (AI vs AI alternates through here).
fn apply_ai_move(state: AppState, player: Player, generation: u64) {
    {
        let mut session = state.session.lock().unwrap();
        session.pending[player.index() as usize] = None;
        if session.generation != generation {
            // Session was reset or reconfigured after this timer fired
            warn!(player = player.index(), "stale AI timer ignored");
            return;
        }
        if session.engine.state().is_terminal() || session.engine.current_turn() != player {
            return;
        }

        let ai = AiPlayer::new(player);
        let mut rng = rand::rng();
        let command =
            match ai.make_command(&session.engine.snapshot(), session.engine.pool(player), &mut rng)
            {
                Ok(command) => command,
                Err(e) => {
                    warn!(player = player.index(), error = %e, "AI could not produce a move");
                    return;
                }
            };
        if let Err(e) = session.engine.submit(command) {
            warn!(player = player.index(), error = %e, "AI move rejected");
        }
    }
    schedule_ai(&state);
}

// =============================================================================
// JSON Models
// =============================================================================

#[derive(Serialize)]
struct ReservesModel {
    /// Remaining unplaced markers per size tier (index = tier).
    tiers: Vec<u8>,
}

#[derive(Serialize)]
struct StateModel {
    board: BoardSnapshot,
    result: String,
    winner: Option<u8>,
    current_player: u8,
    turn_count: u32,
    reserves: HashMap<String, ReservesModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    winning_pattern: Option<Vec<(u8, u8)>>,
    ai_enabled: bool,
    ai_vs_ai: bool,
}

#[derive(Deserialize)]
struct AiToggleRequest {
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    versus: bool,
}

#[derive(Serialize)]
struct HealthModel {
    status: String,
}

#[derive(Serialize)]
struct ErrorModel {
    detail: String,
}

fn session_to_model(session: &ApiSession) -> StateModel {
    let engine = &session.engine;
    let result = match engine.state() {
        GameState::InProgress => "in_progress",
        GameState::Won(_) => "won",
        GameState::Drawn => "drawn",
    };

    let tier_count = engine.config().pool_counts.len();
    let mut reserves = HashMap::new();
    for player in [Player::First, Player::Second] {
        let pool = engine.pool(player);
        let tiers = (0..tier_count)
            .map(|t| pool.remaining(SizeTier(t as u8)) as u8)
            .collect();
        reserves.insert(player.index().to_string(), ReservesModel { tiers });
    }

    StateModel {
        board: engine.snapshot(),
        result: result.to_string(),
        winner: engine.state().winner().map(|p| p.index()),
        current_player: engine.current_turn().index(),
        turn_count: engine.board().turn_count(),
        reserves,
        winning_pattern: engine
            .board()
            .winning_pattern()
            .map(|run| run.iter().map(|p| (p.row, p.col)).collect()),
        ai_enabled: session.ai_enabled,
        ai_vs_ai: session.ai_vs_ai,
    }
}

fn bad_request(detail: String) -> (StatusCode, Json<ErrorModel>) {
    (StatusCode::BAD_REQUEST, Json(ErrorModel { detail }))
}

// =============================================================================
// API Endpoints
// =============================================================================

async fn get_state(State(state): State<AppState>) -> Json<StateModel> {
    let session = state.session.lock().unwrap();
    Json(session_to_model(&session))
}

/// Submit a raw wire command. Accepts the bare JSON object or a
/// `Command:`-prefixed line.
async fn submit_command(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<StateModel>, (StatusCode, Json<ErrorModel>)> {
    let model = {
        let mut session = state.session.lock().unwrap();
        let outcome = session
            .engine
            .submit_wire(body.trim())
            .map_err(|e| bad_request(e.to_string()))?;
        if outcome.state.is_terminal() {
            session.cancel_timers();
        }
        session_to_model(&session)
    };
    schedule_ai(&state);
    Ok(Json(model))
}

async fn reset_game(State(state): State<AppState>) -> Json<StateModel> {
    let model = {
        let mut session = state.session.lock().unwrap();
        session.cancel_timers();
        session.engine.reset();
        session_to_model(&session)
    };
    schedule_ai(&state);
    Json(model)
}

async fn undo_move(
    State(state): State<AppState>,
) -> Result<Json<StateModel>, (StatusCode, Json<ErrorModel>)> {
    let model = {
        let mut session = state.session.lock().unwrap();
        session.cancel_timers();
        session
            .engine
            .undo()
            .map_err(|e| bad_request(e.to_string()))?;
        session_to_model(&session)
    };
    schedule_ai(&state);
    Ok(Json(model))
}

/// Toggle AI modes. Cancels pending timers so a mode switch never lets
/// a stale decision through.
async fn toggle_ai(
    State(state): State<AppState>,
    Json(req): Json<AiToggleRequest>,
) -> Json<StateModel> {
    let model = {
        let mut session = state.session.lock().unwrap();
        session.cancel_timers();
        session.ai_enabled = req.enabled;
        session.ai_vs_ai = req.versus;
        session_to_model(&session)
    };
    schedule_ai(&state);
    Json(model)
}

async fn health() -> Json<HealthModel> {
    Json(HealthModel {
        status: "ok".to_string(),
    })
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "overrule_api=info,overrule_core=info".into()),
        )
        .init();

    // Flat mode (single tier, draws enabled) behind a flag; tiered is
    // the default session
    let config = if std::env::args().any(|arg| arg == "--flat") {
        SessionConfig::flat()
    } else {
        SessionConfig::tiered()
    };
    info!(?config, "starting session");

    let state: AppState = Arc::new(AppStateInner {
        session: Mutex::new(ApiSession::new(config)),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/state", get(get_state))
        .route("/command", post(submit_command))
        .route("/reset", post(reset_game))
        .route("/undo", post(undo_move))
        .route("/ai", post(toggle_ai))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await.unwrap();
    info!("overrule API running on http://localhost:8000");
    axum::serve(listener, app).await.unwrap();
}
