//! X11 global key capture via passive key grabs.
//!
//! X11 does not let ordinary clients observe every key press. Instead, the
//! capture thread asks the server to deliver presses of the trigger keys to
//! the root window (`XGrabKey` with `AnyModifier`) and drains the event
//! queue with `XPending`/`XNextEvent`.
//!
//! A grabbed key is consumed: while mouse-controls runs, the trigger keys no
//! longer reach other applications. Pick keys you do not otherwise use.
//!
//! # Shutdown
//!
//! Xlib has no way to interrupt a blocking `XNextEvent` from another thread,
//! so the capture thread polls the queue and sleeps [`POLL_INTERVAL`]
//! between checks of the stop flag.

#![cfg(all(target_os = "linux", feature = "x11"))]

use std::os::raw::c_int;
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use mouse_controls_core::keymap::linux_x11;
use mouse_controls_core::Key;
use tracing::{debug, warn};
use x11::xlib;

use super::{CaptureError, KeySource};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Set by [`record_x_error`] when the server rejects a request.
static X_ERROR: AtomicBool = AtomicBool::new(false);

/// Xlib error handler that records the failure instead of exiting.
///
/// The default handler terminates the process, which is what happens on a
/// `BadAccess` when another client already grabbed one of our keys.
unsafe extern "C" fn record_x_error(
    _display: *mut xlib::Display,
    _event: *mut xlib::XErrorEvent,
) -> c_int {
    X_ERROR.store(true, Ordering::SeqCst);
    0
}

/// X11 implementation of [`KeySource`].
pub struct X11KeySource {
    keys: Vec<Key>,
    stopped: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl X11KeySource {
    /// Creates an unstarted source that will grab `keys`.
    pub fn new(keys: Vec<Key>) -> Self {
        Self {
            keys,
            stopped: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        }
    }
}

impl KeySource for X11KeySource {
    fn start(&self) -> Result<mpsc::Receiver<Key>, CaptureError> {
        let mut worker = self
            .worker
            .lock()
            .map_err(|_| CaptureError::HookInstallFailed("worker lock poisoned".to_string()))?;
        if worker.is_some() {
            return Err(CaptureError::AlreadyRunning);
        }

        self.stopped.store(false, Ordering::SeqCst);
        let (tx, rx) = mpsc::channel::<Key>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();
        let keys = self.keys.clone();
        let stopped = Arc::clone(&self.stopped);

        let handle = thread::Builder::new()
            .name("mouse-controls-x11-keys".to_string())
            .spawn(move || run_grab_loop(keys, tx, ready_tx, stopped))
            .map_err(|e| CaptureError::HookInstallFailed(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                *worker = Some(handle);
                Ok(rx)
            }
            Ok(Err(reason)) => {
                let _ = handle.join();
                Err(CaptureError::HookInstallFailed(reason))
            }
            Err(_) => {
                let _ = handle.join();
                Err(CaptureError::HookInstallFailed(
                    "key grab thread exited during start-up".to_string(),
                ))
            }
        }
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        let handle = self.worker.lock().ok().and_then(|mut w| w.take());
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("key grab thread panicked");
            }
        }
    }
}

/// Body of the capture thread. Owns the Xlib connection for its lifetime.
fn run_grab_loop(
    keys: Vec<Key>,
    tx: Sender<Key>,
    ready: Sender<Result<(), String>>,
    stopped: Arc<AtomicBool>,
) {
    // SAFETY: a null name makes Xlib use $DISPLAY.
    let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
    if display.is_null() {
        let _ = ready.send(Err("cannot open X display (is $DISPLAY set?)".to_string()));
        return;
    }

    // SAFETY: display is a live connection owned by this thread for the rest
    // of the function; every Xlib call below uses it from this thread only.
    unsafe {
        let root = xlib::XDefaultRootWindow(display);

        X_ERROR.store(false, Ordering::SeqCst);
        let previous_handler = xlib::XSetErrorHandler(Some(record_x_error));

        let mut grabbed: Vec<c_int> = Vec::with_capacity(keys.len());
        for key in &keys {
            let keysym = linux_x11::key_to_keysym(*key);
            let keycode = xlib::XKeysymToKeycode(display, xlib::KeySym::from(keysym));
            if keycode == 0 {
                warn!(%key, "key has no keycode in the current keyboard map; it cannot be used");
                continue;
            }
            xlib::XGrabKey(
                display,
                c_int::from(keycode),
                xlib::AnyModifier,
                root,
                xlib::False,
                xlib::GrabModeAsync,
                xlib::GrabModeAsync,
            );
            grabbed.push(c_int::from(keycode));
        }
        // Round-trip so any BadAccess from the grabs arrives now.
        xlib::XSync(display, xlib::False);

        if X_ERROR.load(Ordering::SeqCst) || grabbed.is_empty() {
            for &keycode in &grabbed {
                xlib::XUngrabKey(display, keycode, xlib::AnyModifier, root);
            }
            xlib::XSetErrorHandler(previous_handler);
            xlib::XCloseDisplay(display);
            let _ = ready.send(Err(
                "could not grab the trigger keys (another application may own them)".to_string(),
            ));
            return;
        }
        let _ = ready.send(Ok(()));
        debug!(keys = grabbed.len(), "X11 key grabs installed");

        let mut event: xlib::XEvent = std::mem::zeroed();
        'outer: while !stopped.load(Ordering::SeqCst) {
            while xlib::XPending(display) > 0 {
                xlib::XNextEvent(display, &mut event);
                if event.get_type() != xlib::KeyPress {
                    continue;
                }
                let key_event = xlib::XKeyEvent::from(event);
                let keysym = xlib::XKeycodeToKeysym(display, key_event.keycode as xlib::KeyCode, 0);
                if let Some(key) = linux_x11::keysym_to_key(keysym as u32) {
                    if tx.send(key).is_err() {
                        // Nobody is listening any more.
                        break 'outer;
                    }
                }
            }
            thread::sleep(POLL_INTERVAL);
        }

        for &keycode in &grabbed {
            xlib::XUngrabKey(display, keycode, xlib::AnyModifier, root);
        }
        xlib::XSync(display, xlib::False);
        xlib::XSetErrorHandler(previous_handler);
        xlib::XCloseDisplay(display);
    }
    debug!("X11 key grabs released");
    // Dropping `tx` here closes the channel.
}
