// Round server: runs the snake round loop on a dedicated thread at a
// fixed cadence and broadcasts per-tick state to WebSocket clients.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::broadcast;

use crate::metrics;

use super::chain::Heading;
use super::game::{Game, RoundSnapshot};

/// Result of a completed round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundResult {
    pub score: u32,
    pub tick_count: u64,
    /// True if the round ended because the chain ran into itself,
    /// false if it hit the tick limit or was stopped.
    pub ended_by_collision: bool,
}

/// Errors from round lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum RoundError {
    #[error("a round is already running")]
    AlreadyRunning,
    #[error("no round is running")]
    NotRunning,
}

/// Messages sent from the round loop to WebSocket clients.
#[derive(Clone, Serialize, Debug)]
#[serde(tag = "type")]
pub enum RoundMessage {
    /// Per-tick round state.
    #[serde(rename = "snapshot")]
    Snapshot(RoundSnapshot),
    /// Round has ended.
    #[serde(rename = "round_end")]
    RoundEnd {
        score: u32,
        tick_count: u64,
        ended_by_collision: bool,
    },
}

/// Metadata about the currently running round.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveRoundInfo {
    pub round_id: String,
    pub start_time: String,
    pub tick_ms: u64,
    pub current_tick: i64,
    pub score: i64,
    pub spectator_count: usize,
}

/// Internal metadata stored when a round starts.
#[derive(Debug, Clone)]
struct RoundMeta {
    round_id: String,
    start_time: String,
    tick_ms: u64,
}

/// Run a round headless (no broadcast, no per-tick sleep).
///
/// The driver closure is asked for a steering request before every
/// tick, playing the role the keyboard poller plays in the interactive
/// game. Runs synchronously on the calling thread.
pub fn run_round_headless(
    mut game: Game,
    mut driver: impl FnMut(&Game) -> Heading,
    max_ticks: u64,
) -> RoundResult {
    metrics::ROUNDS_STARTED_TOTAL.inc();

    while game.tick_count < max_ticks && !game.round_over {
        let requested = driver(&game);
        let tick_start = Instant::now();
        let consumed = game.tick(requested);
        metrics::TICK_DURATION_MS.observe(tick_start.elapsed().as_secs_f64() * 1000.0);
        metrics::TICKS_TOTAL.inc();
        if consumed {
            metrics::TARGETS_CONSUMED_TOTAL.inc();
        }
    }

    metrics::ROUNDS_COMPLETED_TOTAL.inc();
    metrics::ROUND_FINAL_SCORE.observe(game.score as f64);

    RoundResult {
        score: game.score,
        tick_count: game.tick_count,
        ended_by_collision: game.round_over,
    }
}

/// Manages a single round, running the tick loop on a dedicated OS
/// thread and broadcasting snapshots to WebSocket subscribers via a
/// broadcast channel. Steering arrives asynchronously through a
/// latest-wins slot read once per tick.
pub struct RoundServer {
    broadcast_tx: broadcast::Sender<String>,
    running: Arc<AtomicBool>,
    /// Latest steering request as a `Heading` discriminant.
    steer_slot: Arc<AtomicU8>,
    /// Tick counter updated by the round loop thread.
    current_tick: Arc<AtomicI64>,
    /// Score mirror updated by the round loop thread.
    current_score: Arc<AtomicI64>,
    round_meta: Arc<Mutex<Option<RoundMeta>>>,
}

impl RoundServer {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self {
            broadcast_tx: tx,
            running: Arc::new(AtomicBool::new(false)),
            steer_slot: Arc::new(AtomicU8::new(Heading::Right as u8)),
            current_tick: Arc::new(AtomicI64::new(0)),
            current_score: Arc::new(AtomicI64::new(0)),
            round_meta: Arc::new(Mutex::new(None)),
        }
    }

    /// Subscribe to round messages. Returns a receiver that yields JSON
    /// strings.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.broadcast_tx.subscribe()
    }

    /// Whether a round is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Stop the currently running round (if any). The loop notices the
    /// flag on its next tick.
    pub fn stop_round(&self) -> Result<(), RoundError> {
        if !self.is_running() {
            return Err(RoundError::NotRunning);
        }
        self.running.store(false, Ordering::Relaxed);
        Ok(())
    }

    /// Record a steering request. Only the most recent request before a
    /// tick is applied; the core still ignores 180° reversals.
    pub fn steer(&self, heading: Heading) {
        self.steer_slot.store(heading as u8, Ordering::Relaxed);
    }

    /// Number of current WebSocket subscribers.
    pub fn spectator_count(&self) -> usize {
        self.broadcast_tx.receiver_count()
    }

    /// Information about the currently running round, if any.
    pub fn active_round_info(&self) -> Option<ActiveRoundInfo> {
        if !self.is_running() {
            return None;
        }
        let meta = self.round_meta.lock().unwrap().clone()?;
        Some(ActiveRoundInfo {
            round_id: meta.round_id,
            start_time: meta.start_time,
            tick_ms: meta.tick_ms,
            current_tick: self.current_tick.load(Ordering::Relaxed),
            score: self.current_score.load(Ordering::Relaxed),
            spectator_count: self.spectator_count(),
        })
    }

    /// Start a round. The loop runs on a dedicated OS thread: read the
    /// steering slot, tick the game, broadcast a snapshot, sleep
    /// `tick_ms`. The round ends on self-collision, the tick limit, or
    /// `stop_round`, after which a `RoundEnd` message is broadcast.
    pub fn start_round(&self, tick_ms: u64, max_ticks: u64) -> Result<(), RoundError> {
        if self.is_running() {
            return Err(RoundError::AlreadyRunning);
        }

        let round_id = uuid::Uuid::new_v4().to_string();
        *self.round_meta.lock().unwrap() = Some(RoundMeta {
            round_id: round_id.clone(),
            start_time: chrono::Utc::now().to_rfc3339(),
            tick_ms,
        });

        let tx = self.broadcast_tx.clone();
        let running = self.running.clone();
        let steer_slot = self.steer_slot.clone();
        let current_tick = self.current_tick.clone();
        let current_score = self.current_score.clone();

        current_tick.store(0, Ordering::Relaxed);
        current_score.store(0, Ordering::Relaxed);
        steer_slot.store(Heading::Right as u8, Ordering::Relaxed);
        running.store(true, Ordering::Relaxed);

        metrics::ROUNDS_STARTED_TOTAL.inc();
        metrics::ACTIVE_ROUNDS.set(1);
        tracing::info!(round_id = %round_id, tick_ms, max_ticks, "Round started");

        std::thread::spawn(move || {
            let mut game = Game::new();

            while running.load(Ordering::Relaxed) && game.tick_count < max_ticks {
                let requested = Heading::from_u8(steer_slot.load(Ordering::Relaxed))
                    .unwrap_or(Heading::Right);

                let tick_start = Instant::now();
                let consumed = game.tick(requested);
                let tick_elapsed_ms = tick_start.elapsed().as_secs_f64() * 1000.0;
                metrics::TICK_DURATION_MS.observe(tick_elapsed_ms);
                metrics::TICKS_TOTAL.inc();
                if consumed {
                    metrics::TARGETS_CONSUMED_TOTAL.inc();
                }
                if tick_elapsed_ms > tick_ms as f64 {
                    tracing::warn!(
                        tick = game.tick_count,
                        tick_elapsed_ms,
                        "Tick exceeded its cadence budget"
                    );
                }

                current_tick.store(game.tick_count as i64, Ordering::Relaxed);
                current_score.store(game.score as i64, Ordering::Relaxed);

                let msg = RoundMessage::Snapshot(game.snapshot());
                if let Ok(json) = serde_json::to_string(&msg) {
                    // No subscribers is fine; the round runs regardless
                    let _ = tx.send(json);
                }

                if game.round_over {
                    break;
                }

                std::thread::sleep(Duration::from_millis(tick_ms));
            }

            let end_msg = RoundMessage::RoundEnd {
                score: game.score,
                tick_count: game.tick_count,
                ended_by_collision: game.round_over,
            };
            if let Ok(json) = serde_json::to_string(&end_msg) {
                let _ = tx.send(json);
            }

            metrics::ROUNDS_COMPLETED_TOTAL.inc();
            metrics::ROUND_FINAL_SCORE.observe(game.score as f64);
            metrics::ACTIVE_ROUNDS.set(0);
            running.store(false, Ordering::Relaxed);
            tracing::info!(
                round_id = %round_id,
                score = game.score,
                tick_count = game.tick_count,
                ended_by_collision = game.round_over,
                "Round ended"
            );
        });

        Ok(())
    }
}

impl Default for RoundServer {
    fn default() -> Self {
        RoundServer::new()
    }
}
