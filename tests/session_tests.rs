// Integration tests for the room session: call-state machine, join
// cancellation and the countdown tick task.
//
// All tests run on a paused tokio clock, so simulated token latency and
// interval ticks advance deterministically.

use anyhow::Result;
use interview_rooms::{
    CallPhase, RoomSession, RoomToken, RoomTokenProvider, SessionConfig, SessionEvent,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::sleep;

/// Token provider that counts invocations and can be flipped into a failure
/// mode, standing in for the external token service.
struct CountingProvider {
    calls: AtomicUsize,
    latency: Duration,
    fail: AtomicBool,
}

impl CountingProvider {
    fn new(latency: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            latency,
            fail: AtomicBool::new(false),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RoomTokenProvider for CountingProvider {
    async fn create_room(&self, room_id: &str) -> Result<String> {
        Ok(format!("https://rooms.test/{}", room_id))
    }

    async fn acquire_token(&self, room_id: &str, display_name: &str) -> Result<RoomToken> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        sleep(self.latency).await;

        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("token service unavailable");
        }

        Ok(RoomToken::new(format!("tok-{}-{}", room_id, display_name)))
    }

    fn name(&self) -> &str {
        "counting"
    }
}

fn test_config(room_id: &str) -> SessionConfig {
    SessionConfig {
        room_id: room_id.to_string(),
        room_url: format!("https://rooms.test/{}", room_id),
        display_name: "Jane Candidate".to_string(),
        connect_timeout: Duration::from_secs(5),
        countdown_secs: 2700,
    }
}

fn session_with_latency(room_id: &str, latency: Duration) -> (Arc<CountingProvider>, RoomSession) {
    let provider = Arc::new(CountingProvider::new(latency));
    let session = RoomSession::new(test_config(room_id), provider.clone());
    (provider, session)
}

// ============================================================================
// Call lifecycle
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_join_connects_and_enables_media() {
    let (provider, session) = session_with_latency("room1", Duration::from_millis(100));

    assert_eq!(session.phase().await, CallPhase::Idle);

    session.join().await;
    assert_eq!(session.phase().await, CallPhase::Connecting);

    sleep(Duration::from_millis(200)).await;

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.phase, CallPhase::Connected);
    assert!(snapshot.video_enabled, "Camera should default on");
    assert!(snapshot.audio_enabled, "Microphone should default on");
    assert!(snapshot.connected_secs.is_some());
    assert_eq!(provider.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_double_join_issues_one_token_request() {
    let (provider, session) = session_with_latency("room1", Duration::from_millis(100));

    // Rapid double click on "Join Video Call"
    session.join().await;
    session.join().await;

    sleep(Duration::from_millis(300)).await;

    assert_eq!(provider.calls(), 1, "Second join must not hit the provider");
    assert_eq!(session.phase().await, CallPhase::Connected);
}

#[tokio::test(start_paused = true)]
async fn test_join_while_connected_is_noop() {
    let (provider, session) = session_with_latency("room1", Duration::from_millis(10));

    session.join().await;
    sleep(Duration::from_millis(50)).await;
    assert_eq!(session.phase().await, CallPhase::Connected);

    session.join().await;
    sleep(Duration::from_millis(50)).await;

    assert_eq!(provider.calls(), 1);
    assert_eq!(session.phase().await, CallPhase::Connected);
}

#[tokio::test(start_paused = true)]
async fn test_failed_acquisition_then_retry_succeeds() {
    let (provider, session) = session_with_latency("room1", Duration::from_millis(50));
    provider.fail.store(true, Ordering::SeqCst);

    session.join().await;
    sleep(Duration::from_millis(100)).await;

    match session.phase().await {
        CallPhase::Failed { reason } => {
            assert!(
                reason.contains("token service unavailable"),
                "Failure should carry the underlying cause, got: {}",
                reason
            );
        }
        other => panic!("Expected Failed, got {:?}", other),
    }

    // Manual retry from Failed reaches Connected once the service recovers
    provider.fail.store(false, Ordering::SeqCst);
    session.join().await;
    sleep(Duration::from_millis(100)).await;

    assert_eq!(session.phase().await, CallPhase::Connected);
    assert_eq!(provider.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_slow_handshake_times_out() {
    // Provider slower than the 5s connect timeout
    let (provider, session) = session_with_latency("room1", Duration::from_secs(30));

    session.join().await;
    sleep(Duration::from_secs(6)).await;

    match session.phase().await {
        CallPhase::Failed { reason } => assert!(reason.contains("timed out")),
        other => panic!("Expected Failed, got {:?}", other),
    }
    assert_eq!(provider.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_leave_during_connecting_cancels_join() {
    let (provider, session) = session_with_latency("room1", Duration::from_secs(5));

    session.join().await;
    sleep(Duration::from_millis(100)).await;
    assert_eq!(session.phase().await, CallPhase::Connecting);
    assert_eq!(provider.calls(), 1);

    session.leave().await;
    assert_eq!(session.phase().await, CallPhase::Idle);

    // The abandoned acquisition must never apply a stale Connected
    sleep(Duration::from_secs(10)).await;
    assert_eq!(session.phase().await, CallPhase::Idle);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_leave_is_idempotent_and_releases_token() {
    let (_provider, session) = session_with_latency("room1", Duration::from_millis(10));

    session.join().await;
    sleep(Duration::from_millis(50)).await;
    assert_eq!(session.phase().await, CallPhase::Connected);
    assert!(session.room_token().await.is_some());

    session.leave().await;
    assert!(
        session.room_token().await.is_none(),
        "Leaving must release the held token"
    );
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.phase, CallPhase::Idle);
    assert!(snapshot.connected_secs.is_none());
    assert!(!snapshot.video_enabled);
    assert!(!snapshot.audio_enabled);

    // Second leave changes nothing
    session.leave().await;
    assert_eq!(session.phase().await, CallPhase::Idle);
}

// ============================================================================
// Media toggles
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_toggle_video_while_idle_is_noop() {
    let (_provider, session) = session_with_latency("room1", Duration::from_millis(10));

    session.toggle_video().await;
    session.toggle_audio().await;

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.phase, CallPhase::Idle);
    assert!(!snapshot.video_enabled, "Idle toggle must leave state unchanged");
    assert!(!snapshot.audio_enabled);
}

#[tokio::test(start_paused = true)]
async fn test_toggles_flip_flags_while_connected() {
    let (_provider, session) = session_with_latency("room1", Duration::from_millis(10));

    session.join().await;
    sleep(Duration::from_millis(50)).await;

    session.toggle_video().await;
    let snapshot = session.snapshot().await;
    assert!(!snapshot.video_enabled);
    assert!(snapshot.audio_enabled, "Audio must be untouched by a video toggle");

    session.toggle_video().await;
    session.toggle_audio().await;
    let snapshot = session.snapshot().await;
    assert!(snapshot.video_enabled);
    assert!(!snapshot.audio_enabled);
}

// ============================================================================
// Countdown clock wiring
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_countdown_ticks_and_expires_exactly_once() {
    let (_provider, session) = session_with_latency("room1", Duration::from_millis(10));

    session.reset_timer(3).await;
    let mut events = session.subscribe();
    session.start_timer().await;

    sleep(Duration::from_secs(5)).await;

    let mut ticks = Vec::new();
    let mut expirations = 0;
    while let Ok(event) = events.try_recv() {
        match event {
            SessionEvent::TimerTick { remaining_secs } => ticks.push(remaining_secs),
            SessionEvent::TimerExpired => expirations += 1,
            _ => {}
        }
    }

    assert_eq!(ticks, vec![2, 1], "3-second countdown ticks through 2 and 1");
    assert_eq!(expirations, 1, "Expiry must be emitted exactly once");

    let snapshot = session.snapshot().await;
    assert!(!snapshot.timer.running);
    assert_eq!(snapshot.timer.remaining_secs, 0);

    // The tick task exited; nothing more may arrive
    sleep(Duration::from_secs(3)).await;
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn test_pause_stops_ticking() {
    let (_provider, session) = session_with_latency("room1", Duration::from_millis(10));

    session.reset_timer(10).await;
    session.start_timer().await;
    sleep(Duration::from_millis(2500)).await;

    session.pause_timer().await;
    let snapshot = session.snapshot().await;
    assert!(!snapshot.timer.running);
    assert_eq!(snapshot.timer.remaining_secs, 8);

    // A cancelled tick task must not keep firing into the paused clock
    sleep(Duration::from_secs(5)).await;
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.timer.remaining_secs, 8);
}

#[tokio::test(start_paused = true)]
async fn test_repeated_start_pause_cycles_leave_one_tick_task() {
    let (_provider, session) = session_with_latency("room1", Duration::from_millis(10));

    session.reset_timer(100).await;

    // The naive interval implementation leaks a timer per cycle; after five
    // cycles the clock would then lose several seconds per wall second.
    for _ in 0..5 {
        session.start_timer().await;
        session.pause_timer().await;
    }
    session.start_timer().await;

    sleep(Duration::from_secs(3)).await;

    let snapshot = session.snapshot().await;
    assert_eq!(
        snapshot.timer.remaining_secs, 97,
        "Exactly one tick task may drive the clock"
    );
}

#[tokio::test(start_paused = true)]
async fn test_reset_cancels_running_countdown() {
    let (_provider, session) = session_with_latency("room1", Duration::from_millis(10));

    session.reset_timer(30).await;
    session.start_timer().await;
    sleep(Duration::from_millis(2100)).await;

    session.reset_timer(45).await;
    let snapshot = session.snapshot().await;
    assert!(!snapshot.timer.running);
    assert_eq!(snapshot.timer.remaining_secs, 45);

    sleep(Duration::from_secs(3)).await;
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.timer.remaining_secs, 45, "Stopped clock must not tick");
}

#[tokio::test(start_paused = true)]
async fn test_start_timer_is_idempotent_while_running() {
    let (_provider, session) = session_with_latency("room1", Duration::from_millis(10));

    session.reset_timer(10).await;
    session.start_timer().await;
    sleep(Duration::from_millis(1100)).await;

    // Second start while running must not respawn the tick task
    session.start_timer().await;
    sleep(Duration::from_millis(1000)).await;

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.timer.remaining_secs, 8);
}

// ============================================================================
// Teardown
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_call_and_clock() {
    let (provider, session) = session_with_latency("room1", Duration::from_secs(5));

    session.reset_timer(60).await;
    session.start_timer().await;
    session.join().await;
    sleep(Duration::from_millis(1500)).await;

    session.shutdown().await;

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.phase, CallPhase::Idle);
    assert!(!snapshot.timer.running);

    // Neither the abandoned join nor a leaked tick may fire afterwards
    let frozen = snapshot.timer.remaining_secs;
    sleep(Duration::from_secs(10)).await;
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.phase, CallPhase::Idle);
    assert_eq!(snapshot.timer.remaining_secs, frozen);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_events_follow_phase_changes() {
    let (_provider, session) = session_with_latency("room1", Duration::from_millis(50));
    let mut events = session.subscribe();

    session.join().await;
    sleep(Duration::from_millis(100)).await;
    session.leave().await;

    let mut phases = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let SessionEvent::PhaseChanged { phase } = event {
            phases.push(phase);
        }
    }

    assert_eq!(
        phases,
        vec![CallPhase::Connecting, CallPhase::Connected, CallPhase::Idle]
    );
}
