//! Cursor governor: owns the lock state and runs the clamp loop.
//!
//! While locked, the governor's loop reads the cursor position every poll
//! interval, clamps it into the [`ClampRegion`], and writes it back if it
//! moved. The loop is the only code in the process that writes the cursor
//! position.
//!
//! # Shared state
//!
//! The loop runs on its own thread while key presses arrive on the key
//! source's delivery thread, so `enabled` and `running` are atomics. Reads in
//! the loop only need to observe a toggle eventually. Stopping clears
//! `running` before `enabled`, and a toggle re-checks `running` after
//! flipping, so a stopped governor never reports a lock.
//!
//! # Lifecycle
//!
//! ```text
//! new() ── running, unlocked
//!   toggle_lock() ⇄ locked / unlocked
//!   request_exit() or interrupt() ── stopped, unlocked (terminal)
//! ```
//!
//! Once stopped the governor stays stopped. Toggling after that is ignored,
//! so a late key press can never re-lock a cursor nobody is clamping.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use mouse_controls_core::{ClampRegion, Key};
use thiserror::Error;
use tracing::{debug, info};

use crate::application::dispatcher::KeySource;

/// Error type for cursor accessor operations.
#[derive(Debug, Error)]
pub enum CursorError {
    /// The cursor backend could not be initialised.
    #[error("cursor backend unavailable: {0}")]
    Unavailable(String),
    /// Reading the cursor position failed.
    #[error("failed to read cursor position: {0}")]
    Read(String),
    /// Moving the cursor failed.
    #[error("failed to set cursor position: {0}")]
    Write(String),
}

/// Read/write access to the absolute cursor position.
///
/// Each supported OS provides an implementation in the infrastructure layer;
/// tests use [`crate::infrastructure::cursor::mock::MockCursor`].
pub trait CursorAccessor: Send + Sync {
    /// Returns the current cursor position in screen pixels.
    fn position(&self) -> Result<(i32, i32), CursorError>;

    /// Moves the cursor to an absolute position in screen pixels.
    fn set_position(&self, x: i32, y: i32) -> Result<(), CursorError>;
}

/// The two hotkeys the governor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerKeys {
    /// Flips the cursor lock.
    pub toggle: Key,
    /// Unlocks the cursor and shuts down.
    pub exit: Key,
}

impl Default for TriggerKeys {
    fn default() -> Self {
        Self {
            toggle: Key::CtrlRight,
            exit: Key::End,
        }
    }
}

/// Why the clamp loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The exit key was pressed or [`Governor::request_exit`] was called.
    ExitRequested,
    /// The process was interrupted (Ctrl-C / SIGTERM).
    Interrupted,
}

#[derive(Debug)]
struct LockState {
    enabled: AtomicBool,
    running: AtomicBool,
    interrupted: AtomicBool,
}

/// Owns the cursor lock state and the clamp loop.
pub struct Governor {
    cursor: Arc<dyn CursorAccessor>,
    region: ClampRegion,
    poll_interval: Duration,
    keys: TriggerKeys,
    state: LockState,
}

impl Governor {
    /// Creates a governor that starts running and unlocked.
    ///
    /// `region` is the margin-shrunk clamp rectangle. The cursor accessor is
    /// created by the caller, so a missing display backend is reported
    /// before a governor ever exists.
    pub fn new(
        region: ClampRegion,
        poll_interval: Duration,
        keys: TriggerKeys,
        cursor: Arc<dyn CursorAccessor>,
    ) -> Self {
        Self {
            cursor,
            region,
            poll_interval,
            keys,
            state: LockState {
                enabled: AtomicBool::new(false),
                running: AtomicBool::new(true),
                interrupted: AtomicBool::new(false),
            },
        }
    }

    /// The margin-shrunk rectangle the cursor is held inside.
    pub fn region(&self) -> ClampRegion {
        self.region
    }

    /// Time slept between clamp checks.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// The toggle and exit keys this governor reacts to.
    pub fn keys(&self) -> TriggerKeys {
        self.keys
    }

    /// Returns `true` while the cursor is being clamped.
    pub fn is_locked(&self) -> bool {
        self.state.enabled.load(Ordering::SeqCst)
    }

    /// Returns `true` until the governor has been told to stop.
    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::SeqCst)
    }

    /// Flips the cursor lock and returns the new state.
    ///
    /// Ignored once the governor has stopped.
    pub fn toggle_lock(&self) -> bool {
        if !self.is_running() {
            debug!("lock toggle ignored: mouse control has stopped");
            return false;
        }
        let locked = !self.state.enabled.fetch_xor(true, Ordering::SeqCst);
        // request_exit clears `running` before `enabled`, so a stop that
        // raced the flip above is visible here.
        if locked && !self.is_running() {
            self.state.enabled.store(false, Ordering::SeqCst);
            debug!("lock toggle ignored: mouse control has stopped");
            return false;
        }
        info!(
            "Mouse lock toggled. Current state: {}",
            if locked { "Locked" } else { "Unlocked" }
        );
        locked
    }

    /// Unlocks the cursor and stops the clamp loop.
    ///
    /// Idempotent. The stopping message is logged on every call.
    pub fn request_exit(&self) {
        info!("Mouse control thread stopping...");
        self.state.running.store(false, Ordering::SeqCst);
        self.state.enabled.store(false, Ordering::SeqCst);
    }

    /// Same as [`request_exit`](Self::request_exit), but records that the
    /// stop came from a process interrupt so [`run`](Self::run) reports
    /// [`StopReason::Interrupted`].
    pub fn interrupt(&self) {
        self.state.interrupted.store(true, Ordering::SeqCst);
        self.request_exit();
    }

    /// Reacts to a key press.
    ///
    /// The toggle key flips the lock. The exit key stops the governor and
    /// tells `source` to end its subscription. Other keys are ignored.
    pub fn handle_key_event(&self, key: Key, source: &dyn KeySource) {
        if key == self.keys.toggle {
            self.toggle_lock();
        } else if key == self.keys.exit {
            self.request_exit();
            source.stop();
        }
    }

    /// Performs one clamp step: reads the cursor and writes back the clamped
    /// position if it lies outside the region.
    ///
    /// Returns the new position when the cursor was moved, `None` when it was
    /// already inside. Does not look at the lock state.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError`] if the position cannot be read or written.
    pub fn clamp_cursor(&self) -> Result<Option<(i32, i32)>, CursorError> {
        let (x, y) = self.cursor.position()?;
        let clamped = self.region.clamp(x, y);
        if clamped == (x, y) {
            return Ok(None);
        }
        self.cursor.set_position(clamped.0, clamped.1)?;
        Ok(Some(clamped))
    }

    /// Runs the clamp loop on the calling thread until the governor stops.
    ///
    /// Cursor errors are not retried explicitly; the next tick simply tries
    /// again.
    pub fn run(&self) -> StopReason {
        info!("Mouse control thread started.");
        while self.is_running() {
            if self.is_locked() {
                match self.clamp_cursor() {
                    Ok(Some((x, y))) => debug!(x, y, "cursor clamped"),
                    Ok(None) => {}
                    Err(e) => debug!("clamp tick skipped: {e}"),
                }
            }
            thread::sleep(self.poll_interval);
        }
        self.state.enabled.store(false, Ordering::SeqCst);

        let reason = if self.state.interrupted.load(Ordering::SeqCst) {
            StopReason::Interrupted
        } else {
            StopReason::ExitRequested
        };
        info!(?reason, "Mouse control thread stopped.");
        reason
    }

    /// Starts [`run`](Self::run) on a dedicated `cursor-governor` thread.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn(self: &Arc<Self>) -> std::io::Result<JoinHandle<StopReason>> {
        let governor = Arc::clone(self);
        thread::Builder::new()
            .name("cursor-governor".to_string())
            .spawn(move || governor.run())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cursor::mock::MockCursor;
    use crate::infrastructure::key_capture::mock::MockKeySource;
    use crate::test_log;
    use mouse_controls_core::{BoundingRegion, Interval};
    use std::sync::Barrier;
    use std::time::Instant;

    const POLL: Duration = Duration::from_millis(1);

    fn full_hd_region() -> ClampRegion {
        let bounds = BoundingRegion::new(
            Interval::new(0, 1920).unwrap(),
            Interval::new(0, 1080).unwrap(),
        );
        ClampRegion::new(bounds, 10).unwrap()
    }

    fn governor_at(x: i32, y: i32) -> (Arc<Governor>, Arc<MockCursor>) {
        let cursor = Arc::new(MockCursor::at(x, y));
        let governor = Arc::new(Governor::new(
            full_hd_region(),
            POLL,
            TriggerKeys::default(),
            Arc::clone(&cursor) as Arc<dyn CursorAccessor>,
        ));
        (governor, cursor)
    }

    fn wait_until(what: &str, cond: impl Fn() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !cond() {
            assert!(Instant::now() < deadline, "timed out waiting for {what}");
            thread::sleep(Duration::from_millis(1));
        }
    }

    // ── Construction ──────────────────────────────────────────────────────────

    #[test]
    fn test_new_governor_is_running_and_unlocked() {
        let (governor, _) = governor_at(0, 0);
        assert!(governor.is_running());
        assert!(!governor.is_locked());
        assert_eq!(governor.poll_interval(), POLL);
        assert_eq!(governor.keys(), TriggerKeys::default());
    }

    // ── toggle_lock ───────────────────────────────────────────────────────────

    #[test]
    fn test_toggle_lock_logs_locked_then_unlocked() {
        // Arrange
        let (governor, _) = governor_at(0, 0);

        // Act
        let (first, logs) = test_log::capture(|| governor.toggle_lock());

        // Assert
        assert!(first);
        assert!(governor.is_locked());
        assert!(logs.contains("Mouse lock toggled. Current state: Locked"), "{logs}");

        let (second, logs) = test_log::capture(|| governor.toggle_lock());
        assert!(!second);
        assert!(!governor.is_locked());
        assert!(logs.contains("Mouse lock toggled. Current state: Unlocked"), "{logs}");
    }

    #[test]
    fn test_toggle_twice_restores_original_state() {
        let (governor, _) = governor_at(0, 0);
        let initial = governor.is_locked();
        governor.toggle_lock();
        governor.toggle_lock();
        assert_eq!(governor.is_locked(), initial);
    }

    #[test]
    fn test_toggle_after_exit_does_not_relock() {
        let (governor, _) = governor_at(0, 0);
        governor.request_exit();

        let locked = governor.toggle_lock();

        assert!(!locked);
        assert!(!governor.is_locked());
        assert!(!governor.is_running());
    }

    // ── request_exit / interrupt ──────────────────────────────────────────────

    #[test]
    fn test_request_exit_unlocks_and_stops() {
        // Arrange
        let (governor, _) = governor_at(0, 0);
        governor.toggle_lock();

        // Act
        let ((), logs) = test_log::capture(|| governor.request_exit());

        // Assert
        assert!(logs.contains("Mouse control thread stopping..."), "{logs}");
        assert!(!governor.is_locked());
        assert!(!governor.is_running());
    }

    #[test]
    fn test_request_exit_when_already_stopped_still_logs() {
        let (governor, _) = governor_at(0, 0);
        governor.request_exit();

        let ((), logs) = test_log::capture(|| governor.request_exit());

        assert!(logs.contains("Mouse control thread stopping..."), "{logs}");
        assert!(!governor.is_running());
    }

    #[test]
    fn test_toggle_racing_interrupt_never_leaves_cursor_locked() {
        for _ in 0..500 {
            // Arrange
            let (governor, _) = governor_at(0, 0);
            let barrier = Arc::new(Barrier::new(2));

            // Act
            let toggler = {
                let governor = Arc::clone(&governor);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    governor.toggle_lock();
                })
            };
            barrier.wait();
            governor.interrupt();
            toggler.join().expect("toggle thread");

            // Assert
            assert!(!governor.is_running());
            assert!(!governor.is_locked(), "stopped governor reports a lock");
        }
    }

    #[test]
    fn test_run_leaves_lock_cleared_on_exit() {
        let (governor, _) = governor_at(960, 540);
        governor.toggle_lock();
        let handle = governor.spawn().expect("spawn governor");

        governor.request_exit();
        handle.join().expect("governor thread");

        assert!(!governor.is_locked());
    }

    #[test]
    fn test_interrupt_unlocks_and_stops() {
        let (governor, _) = governor_at(0, 0);
        governor.toggle_lock();

        governor.interrupt();

        assert!(!governor.is_locked());
        assert!(!governor.is_running());
    }

    // ── handle_key_event ──────────────────────────────────────────────────────

    #[test]
    fn test_toggle_key_flips_lock_without_stopping_source() {
        // Arrange
        let (governor, _) = governor_at(0, 0);
        let source = MockKeySource::new();

        // Act
        governor.handle_key_event(Key::CtrlRight, &source);

        // Assert
        assert!(governor.is_locked());
        assert_eq!(source.stop_count(), 0);

        governor.handle_key_event(Key::CtrlRight, &source);
        assert!(!governor.is_locked());
    }

    #[test]
    fn test_exit_key_while_locked_stops_everything() {
        // Arrange
        let (governor, _) = governor_at(0, 0);
        let source = MockKeySource::new();
        governor.toggle_lock();

        // Act
        let ((), logs) = test_log::capture(|| governor.handle_key_event(Key::End, &source));

        // Assert
        assert!(!governor.is_locked());
        assert!(!governor.is_running());
        assert_eq!(source.stop_count(), 1);
        assert!(logs.contains("Mouse control thread stopping..."), "{logs}");
    }

    #[test]
    fn test_other_keys_are_ignored() {
        let (governor, _) = governor_at(0, 0);
        let source = MockKeySource::new();

        for key in [Key::A, Key::CtrlLeft, Key::Home, Key::F12] {
            governor.handle_key_event(key, &source);
        }

        assert!(!governor.is_locked());
        assert!(governor.is_running());
        assert_eq!(source.stop_count(), 0);
    }

    // ── clamp_cursor ──────────────────────────────────────────────────────────

    #[test]
    fn test_clamp_cursor_moves_top_left_corner_inside() {
        let (governor, cursor) = governor_at(0, 0);

        let moved = governor.clamp_cursor().expect("clamp");

        assert_eq!(moved, Some((10, 10)));
        assert_eq!(cursor.current(), (10, 10));
    }

    #[test]
    fn test_clamp_cursor_moves_bottom_right_corner_inside() {
        let (governor, cursor) = governor_at(1920, 1080);

        let moved = governor.clamp_cursor().expect("clamp");

        assert_eq!(moved, Some((1910, 1070)));
        assert_eq!(cursor.current(), (1910, 1070));
    }

    #[test]
    fn test_clamp_cursor_does_not_write_interior_position() {
        let (governor, cursor) = governor_at(960, 540);

        let moved = governor.clamp_cursor().expect("clamp");

        assert_eq!(moved, None);
        assert!(cursor.writes().is_empty());
    }

    #[test]
    fn test_clamp_cursor_propagates_read_failure() {
        let (governor, cursor) = governor_at(0, 0);
        cursor.fail_reads(true);

        let result = governor.clamp_cursor();

        assert!(matches!(result, Err(CursorError::Read(_))));
        assert!(cursor.writes().is_empty());
    }

    // ── run ───────────────────────────────────────────────────────────────────

    #[test]
    fn test_run_when_locked_clamps_cursor_then_stops_on_exit() {
        // Arrange
        let (governor, cursor) = governor_at(0, 0);
        governor.toggle_lock();

        // Act
        let handle = governor.spawn().expect("spawn governor");
        wait_until("first clamp", || !cursor.writes().is_empty());
        governor.request_exit();
        let reason = handle.join().expect("governor thread");

        // Assert
        assert_eq!(reason, StopReason::ExitRequested);
        assert_eq!(cursor.current(), (10, 10));
        assert_eq!(cursor.writes()[0], (10, 10));
    }

    #[test]
    fn test_run_when_unlocked_leaves_cursor_alone() {
        // Arrange
        let (governor, cursor) = governor_at(5, 5);

        // Act
        let handle = governor.spawn().expect("spawn governor");
        thread::sleep(Duration::from_millis(20));
        governor.request_exit();
        handle.join().expect("governor thread");

        // Assert
        assert_eq!(cursor.current(), (5, 5));
        assert!(cursor.writes().is_empty());
        assert_eq!(cursor.reads(), 0, "an unlocked governor must not poll the cursor");
    }

    #[test]
    fn test_run_follows_cursor_that_escapes_again() {
        let (governor, cursor) = governor_at(0, 0);
        governor.toggle_lock();
        let handle = governor.spawn().expect("spawn governor");
        wait_until("first clamp", || cursor.current() == (10, 10));

        // The user drags the mouse out again.
        cursor.move_to(3000, -40);
        wait_until("second clamp", || cursor.current() == (1910, 10));

        governor.request_exit();
        handle.join().expect("governor thread");
    }

    #[test]
    fn test_run_survives_transient_read_failures() {
        let (governor, cursor) = governor_at(0, 0);
        cursor.fail_reads(true);
        governor.toggle_lock();
        let handle = governor.spawn().expect("spawn governor");

        wait_until("failed reads", || cursor.reads() >= 3);
        assert!(cursor.writes().is_empty());
        cursor.fail_reads(false);
        wait_until("clamp after recovery", || cursor.current() == (10, 10));

        governor.request_exit();
        handle.join().expect("governor thread");
    }

    #[test]
    fn test_run_reports_interrupt() {
        let (governor, _) = governor_at(0, 0);
        governor.toggle_lock();
        let handle = governor.spawn().expect("spawn governor");

        governor.interrupt();

        assert_eq!(handle.join().expect("governor thread"), StopReason::Interrupted);
        assert!(!governor.is_locked());
    }

    #[test]
    fn test_run_returns_immediately_after_exit() {
        let (governor, cursor) = governor_at(0, 0);
        governor.request_exit();

        let reason = governor.run();

        assert_eq!(reason, StopReason::ExitRequested);
        assert_eq!(cursor.reads(), 0);
    }
}
