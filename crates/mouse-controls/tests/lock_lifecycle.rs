//! Integration tests for a full lock session.
//!
//! These tests go from configuration text to a finished session:
//! `parse_config` + `AppConfig::settings` + `Governor` + `Dispatcher`, with
//! the mock cursor and key source standing in for the OS.

use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use mouse_controls::application::dispatcher::{ControlState, Dispatcher, KeySource};
use mouse_controls::application::governor::{CursorAccessor, Governor, StopReason};
use mouse_controls::infrastructure::cursor::mock::MockCursor;
use mouse_controls::infrastructure::key_capture::mock::MockKeySource;
use mouse_controls::infrastructure::storage::config::parse_config;
use mouse_controls::MouseControlError;
use mouse_controls_core::Key;

const CONFIG: &str = r#"
[region]
x = [0, 1920]
y = [0, 1080]
buffer = 10
poll_interval_secs = 0.001

[keys]
toggle = "f8"
exit = "f9"
"#;

struct Session {
    dispatcher: Arc<Dispatcher>,
    cursor: Arc<MockCursor>,
    source: Arc<MockKeySource>,
}

fn session_from(config: &str, x: i32, y: i32) -> Session {
    let settings = parse_config(Path::new("config.toml"), config)
        .expect("config parses")
        .settings()
        .expect("config is valid");
    let cursor = Arc::new(MockCursor::at(x, y));
    let source = Arc::new(MockKeySource::new());
    let governor = Arc::new(Governor::new(
        settings.region,
        settings.poll_interval,
        settings.keys,
        Arc::clone(&cursor) as Arc<dyn CursorAccessor>,
    ));
    let dispatcher = Arc::new(Dispatcher::new(
        governor,
        Arc::clone(&source) as Arc<dyn KeySource>,
    ));
    Session {
        dispatcher,
        cursor,
        source,
    }
}

fn wait_until(what: &str, cond: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(1));
    }
}

fn start(s: &Session) -> thread::JoinHandle<Result<StopReason, MouseControlError>> {
    let dispatcher = Arc::clone(&s.dispatcher);
    let handle = thread::spawn(move || dispatcher.start());
    wait_until("subscription", || s.source.is_started());
    handle
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_locked_session_holds_cursor_inside_margin() {
    let s = session_from(CONFIG, 0, 0);
    let session = start(&s);

    s.source.inject_key(Key::F8);
    wait_until("top-left clamp", || s.cursor.current() == (10, 10));

    s.cursor.move_to(1920, 1080);
    wait_until("bottom-right clamp", || s.cursor.current() == (1910, 1070));

    s.source.inject_key(Key::F9);
    assert_eq!(session.join().unwrap().unwrap(), StopReason::ExitRequested);
}

#[test]
fn test_unlocking_releases_cursor() {
    let s = session_from(CONFIG, 0, 0);
    let session = start(&s);

    s.source.inject_key(Key::F8);
    wait_until("clamp", || s.cursor.current() == (10, 10));
    s.source.inject_key(Key::F8);
    wait_until("unlocked", || !s.dispatcher.governor().is_locked());
    // Let a clamp tick that began before the toggle finish.
    thread::sleep(Duration::from_millis(10));

    s.cursor.move_to(0, 0);
    thread::sleep(Duration::from_millis(20));
    assert_eq!(s.cursor.current(), (0, 0), "an unlocked cursor must move freely");

    s.source.inject_key(Key::F9);
    session.join().unwrap().unwrap();
}

#[test]
fn test_exit_key_while_locked_leaves_everything_stopped() {
    // Arrange
    let s = session_from(CONFIG, 0, 0);
    let session = start(&s);
    s.source.inject_key(Key::F8);
    wait_until("locked", || s.dispatcher.state() == ControlState::ListeningLocked);

    // Act
    s.source.inject_key(Key::F9);
    let reason = session.join().unwrap().unwrap();

    // Assert
    assert_eq!(reason, StopReason::ExitRequested);
    let governor = s.dispatcher.governor();
    assert!(!governor.is_locked());
    assert!(!governor.is_running());
    assert!(!s.source.is_started());
    assert_eq!(s.dispatcher.state(), ControlState::Stopped);

    // A late toggle cannot re-lock the cursor.
    governor.toggle_lock();
    assert!(!governor.is_locked());
}

#[test]
fn test_default_hotkeys_are_inert_when_rebound() {
    let s = session_from(CONFIG, 0, 0);
    let session = start(&s);

    s.source.inject_key(Key::CtrlRight);
    s.source.inject_key(Key::End);
    thread::sleep(Duration::from_millis(20));

    assert_eq!(s.dispatcher.state(), ControlState::ListeningUnlocked);
    assert!(s.cursor.writes().is_empty());

    s.dispatcher.cancel();
    assert_eq!(session.join().unwrap().unwrap(), StopReason::Interrupted);
}

#[test]
fn test_hook_failure_is_an_error_with_cursor_unlocked() {
    let s = session_from(CONFIG, 0, 0);
    s.source.fail_start(true);

    let result = s.dispatcher.start();

    assert!(matches!(result, Err(MouseControlError::DeviceUnavailable(_))));
    assert!(!s.dispatcher.governor().is_locked());
    assert!(s.cursor.writes().is_empty());
}

#[test]
fn test_legacy_json_config_drives_a_session() {
    let settings = parse_config(
        Path::new("config.json"),
        r#"{"pos_lims": [[100, 200], [100, 200]], "pos_buffer": 5, "delay": 0.001}"#,
    )
    .unwrap()
    .settings()
    .unwrap();

    assert_eq!(settings.region.clamp(0, 1000), (105, 195));
    assert_eq!(settings.keys.toggle, Key::CtrlRight);
    assert_eq!(settings.keys.exit, Key::End);
}

#[test]
fn test_default_key_names_load_and_drive_a_session() {
    let config = r#"
[region]
x = [0, 1920]
y = [0, 1080]
buffer = 10
poll_interval_secs = 0.001

[keys]
toggle = "ctrl_r"
exit = "end"
"#;
    let s = session_from(config, 0, 0);
    let session = start(&s);

    s.source.inject_key(Key::CtrlRight);
    wait_until("clamp", || s.cursor.current() == (10, 10));
    s.source.inject_key(Key::End);

    assert_eq!(session.join().unwrap().unwrap(), StopReason::ExitRequested);
    assert!(!s.dispatcher.governor().is_locked());
}
