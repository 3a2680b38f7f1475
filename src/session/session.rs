use super::config::SessionConfig;
use super::events::SessionEvent;
use super::snapshot::{SessionSnapshot, TimerSnapshot};
use super::timer::{CountdownTimer, TickOutcome};
use crate::token::{RoomToken, RoomTokenProvider};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// Event channel capacity. A subscriber that falls this far behind misses
/// old events rather than blocking state transitions.
const EVENT_CAPACITY: usize = 64;

/// Lifecycle phase of the video call.
///
/// Transitions only move forward (Idle → Connecting → Connected, or
/// Connecting → Failed); the only way back to Idle is an explicit leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallPhase {
    /// Not in a call
    Idle,
    /// Token acquisition in flight
    Connecting,
    /// In the call, holding a room token
    Connected,
    /// Token acquisition failed; a new join may be attempted
    Failed { reason: String },
}

/// Call-side state. One struct behind one lock so the phase and the media
/// flags cannot disagree (no "connecting and connected at once").
#[derive(Debug)]
struct CallState {
    phase: CallPhase,
    video_enabled: bool,
    audio_enabled: bool,
    /// Held while connected; dropped on leave or failure
    token: Option<RoomToken>,
    connected_at: Option<DateTime<Utc>>,
}

/// A room session: the call-state machine plus the countdown clock for one
/// interview room.
///
/// All methods take `&self`; the session is shared between the HTTP layer
/// and its own background tasks. Two tasks may be live at a time: the join
/// task (acquiring a token while `Connecting`) and the tick task (driving
/// the countdown while it runs). Both handles are owned here and aborted
/// before any transition that invalidates them, so a torn-down session can
/// never receive a stale tick or a stale `Connected` transition.
pub struct RoomSession {
    config: SessionConfig,

    /// Token service used to join the room
    token_provider: Arc<dyn RoomTokenProvider>,

    /// Call phase and media flags
    call: Arc<Mutex<CallState>>,

    /// Countdown clock state, shared with the tick task
    timer: Arc<Mutex<CountdownTimer>>,

    /// In-flight token acquisition, while `Connecting`
    join_task: Mutex<Option<JoinHandle<()>>>,

    /// Live one-second tick task, while the clock runs
    tick_task: Mutex<Option<JoinHandle<()>>>,

    /// Fan-out of state changes to the presentation layer
    events: broadcast::Sender<SessionEvent>,
}

impl RoomSession {
    pub fn new(config: SessionConfig, token_provider: Arc<dyn RoomTokenProvider>) -> Self {
        info!(
            "Creating session for room {} ({})",
            config.room_id, config.display_name
        );

        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            timer: Arc::new(Mutex::new(CountdownTimer::new(config.countdown_secs))),
            config,
            token_provider,
            call: Arc::new(Mutex::new(CallState {
                phase: CallPhase::Idle,
                video_enabled: false,
                audio_enabled: false,
                token: None,
                connected_at: None,
            })),
            join_task: Mutex::new(None),
            tick_task: Mutex::new(None),
            events,
        }
    }

    pub fn room_id(&self) -> &str {
        &self.config.room_id
    }

    pub fn display_name(&self) -> &str {
        &self.config.display_name
    }

    /// Subscribe to state-change events for re-rendering.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    // ========================================================================
    // Call lifecycle
    // ========================================================================

    /// Join the call: transition to `Connecting` and acquire a room token in
    /// the background. Valid from `Idle` or `Failed`; while a join is already
    /// in flight (or the call is connected) this is a no-op, so a double
    /// click can never issue two token requests.
    ///
    /// Success and failure both surface through the phase and the event
    /// stream, not through a return value.
    pub async fn join(&self) {
        {
            let mut call = self.call.lock().await;
            match call.phase {
                CallPhase::Connecting => {
                    warn!("Join already in flight for room {}", self.config.room_id);
                    return;
                }
                CallPhase::Connected => {
                    warn!("Already connected to room {}", self.config.room_id);
                    return;
                }
                CallPhase::Idle | CallPhase::Failed { .. } => {
                    call.phase = CallPhase::Connecting;
                }
            }
        }

        info!(
            "Joining room {} as {}",
            self.config.room_id, self.config.display_name
        );
        self.emit(SessionEvent::PhaseChanged {
            phase: CallPhase::Connecting,
        });

        let provider = Arc::clone(&self.token_provider);
        let call = Arc::clone(&self.call);
        let events = self.events.clone();
        let room_id = self.config.room_id.clone();
        let display_name = self.config.display_name.clone();
        let connect_timeout = self.config.connect_timeout;

        let task = tokio::spawn(async move {
            let acquired = tokio::time::timeout(
                connect_timeout,
                provider.acquire_token(&room_id, &display_name),
            )
            .await;

            let mut call = call.lock().await;

            // The session may have been torn down while the token was in
            // flight; a resolution arriving after leave() is dropped here.
            if call.phase != CallPhase::Connecting {
                return;
            }

            let phase = match acquired {
                Ok(Ok(token)) => {
                    info!("Connected to room {}", room_id);
                    call.token = Some(token);
                    call.connected_at = Some(Utc::now());
                    call.video_enabled = true;
                    call.audio_enabled = true;
                    CallPhase::Connected
                }
                Ok(Err(err)) => {
                    error!("Token acquisition failed for room {}: {:#}", room_id, err);
                    CallPhase::Failed {
                        reason: format!("{:#}", err),
                    }
                }
                Err(_) => {
                    error!(
                        "Handshake timed out for room {} after {:?}",
                        room_id, connect_timeout
                    );
                    CallPhase::Failed {
                        reason: format!("handshake timed out after {:?}", connect_timeout),
                    }
                }
            };

            call.phase = phase.clone();
            drop(call);

            let _ = events.send(SessionEvent::PhaseChanged { phase });
        });

        let mut join_task = self.join_task.lock().await;
        if let Some(old) = join_task.replace(task) {
            // Only a finished handle from a previous attempt can be here;
            // the Connecting guard above keeps two joins from being live.
            old.abort();
        }
    }

    /// Leave the call: cancel any in-flight join, release the held token and
    /// return to `Idle`. Idempotent; valid from any phase.
    pub async fn leave(&self) {
        if let Some(task) = self.join_task.lock().await.take() {
            task.abort();
        }

        let previous = {
            let mut call = self.call.lock().await;
            call.token = None;
            call.connected_at = None;
            call.video_enabled = false;
            call.audio_enabled = false;
            std::mem::replace(&mut call.phase, CallPhase::Idle)
        };

        if previous != CallPhase::Idle {
            info!("Left room {}", self.config.room_id);
            self.emit(SessionEvent::PhaseChanged {
                phase: CallPhase::Idle,
            });
        }
    }

    /// Turn the camera on or off. Only meaningful while connected; in any
    /// other phase this is a no-op, so a stale UI event arriving after
    /// teardown changes nothing.
    pub async fn toggle_video(&self) {
        self.toggle_media(true).await;
    }

    /// Turn the microphone on or off. Same guard as `toggle_video`.
    pub async fn toggle_audio(&self) {
        self.toggle_media(false).await;
    }

    async fn toggle_media(&self, video: bool) {
        let flags = {
            let mut call = self.call.lock().await;
            if call.phase != CallPhase::Connected {
                return;
            }
            if video {
                call.video_enabled = !call.video_enabled;
            } else {
                call.audio_enabled = !call.audio_enabled;
            }
            (call.video_enabled, call.audio_enabled)
        };

        self.emit(SessionEvent::MediaChanged {
            video_enabled: flags.0,
            audio_enabled: flags.1,
        });
    }

    // ========================================================================
    // Countdown clock
    // ========================================================================

    /// Start the countdown and spawn the one-second tick task. No-op if the
    /// clock is already running or exhausted, so at most one tick task is
    /// ever live per session.
    pub async fn start_timer(&self) {
        let remaining = {
            let mut timer = self.timer.lock().await;
            if !timer.start() {
                warn!(
                    "Timer start ignored for room {} (already running or expired)",
                    self.config.room_id
                );
                return;
            }
            timer.remaining_secs()
        };

        info!(
            "Timer started for room {} ({}s remaining)",
            self.config.room_id, remaining
        );

        let timer = Arc::clone(&self.timer);
        let events = self.events.clone();
        let room_id = self.config.room_id.clone();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; consume it so the clock
            // only decrements after a full second.
            interval.tick().await;

            loop {
                interval.tick().await;

                let outcome = { timer.lock().await.tick() };
                match outcome {
                    Some(TickOutcome::Ticked { remaining_secs }) => {
                        let _ = events.send(SessionEvent::TimerTick { remaining_secs });
                    }
                    Some(TickOutcome::Expired) => {
                        info!("Timer expired for room {}", room_id);
                        let _ = events.send(SessionEvent::TimerExpired);
                        break;
                    }
                    // Paused under our feet; the task is being torn down
                    None => break,
                }
            }
        });

        if let Some(old) = self.tick_task.lock().await.replace(task) {
            // A finished handle from an expired countdown may still be
            // stored; a live one cannot (start() just returned true).
            old.abort();
        }

        self.emit(SessionEvent::TimerStarted {
            remaining_secs: remaining,
        });
    }

    /// Pause the countdown. The tick task is cancelled before the clock
    /// transitions, so no tick can land on a paused timer. Idempotent.
    pub async fn pause_timer(&self) {
        if let Some(task) = self.tick_task.lock().await.take() {
            task.abort();
        }

        let remaining = {
            let mut timer = self.timer.lock().await;
            if !timer.pause() {
                return;
            }
            timer.remaining_secs()
        };

        info!(
            "Timer paused for room {} ({}s remaining)",
            self.config.room_id, remaining
        );
        self.emit(SessionEvent::TimerPaused {
            remaining_secs: remaining,
        });
    }

    /// Put `to_secs` back on the clock, stopped. Cancels the tick task first.
    pub async fn reset_timer(&self, to_secs: u64) {
        if let Some(task) = self.tick_task.lock().await.take() {
            task.abort();
        }

        {
            self.timer.lock().await.reset(to_secs);
        }

        info!("Timer reset for room {} to {}s", self.config.room_id, to_secs);
        self.emit(SessionEvent::TimerReset {
            remaining_secs: to_secs,
        });
    }

    // ========================================================================
    // Teardown & inspection
    // ========================================================================

    /// Tear the session down: cancel the tick task, stop the clock and leave
    /// the call. Used when the room view closes.
    pub async fn shutdown(&self) {
        if let Some(task) = self.tick_task.lock().await.take() {
            task.abort();
        }
        {
            self.timer.lock().await.pause();
        }

        self.leave().await;

        info!("Session for room {} shut down", self.config.room_id);
    }

    /// Current phase of the call.
    pub async fn phase(&self) -> CallPhase {
        self.call.lock().await.phase.clone()
    }

    /// The held room token, for the transport adapter. Present exactly
    /// while connected.
    pub async fn room_token(&self) -> Option<RoomToken> {
        self.call.lock().await.token.clone()
    }

    /// Point-in-time view for the presentation layer.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let call = self.call.lock().await;
        let timer = self.timer.lock().await;

        let connected_secs = call.connected_at.map(|t| {
            let elapsed = Utc::now().signed_duration_since(t);
            elapsed.num_milliseconds() as f64 / 1000.0
        });

        SessionSnapshot {
            room_id: self.config.room_id.clone(),
            room_url: self.config.room_url.clone(),
            display_name: self.config.display_name.clone(),
            phase: call.phase.clone(),
            video_enabled: call.video_enabled,
            audio_enabled: call.audio_enabled,
            connected_secs,
            timer: TimerSnapshot {
                running: timer.running(),
                remaining_secs: timer.remaining_secs(),
            },
        }
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine; events are best-effort notifications
        let _ = self.events.send(event);
    }
}
