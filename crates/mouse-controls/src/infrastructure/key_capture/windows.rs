//! Windows low-level keyboard hook implementation.
//!
//! Installs a `WH_KEYBOARD_LL` hook on a dedicated Win32 message-loop thread.
//! The hook is listen-only: every event is passed on with `CallNextHookEx`,
//! so the trigger keys keep working in other applications.
//!
//! # Windows-Specific Implementation
//!
//! The hook callback must complete within ~300ms or Windows will remove the
//! hook, so it only translates the virtual-key code and pushes it into the
//! channel. Stopping posts `WM_QUIT` to the hook thread, which unhooks and
//! drops the sender.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::sync::mpsc::{self, Sender};
use std::sync::Mutex;
use std::thread;

use mouse_controls_core::keymap::windows_vk;
use mouse_controls_core::Key;
use tracing::{debug, warn};
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PeekMessageW, PostThreadMessageW,
    SetWindowsHookExW, UnhookWindowsHookEx, HC_ACTION, KBDLLHOOKSTRUCT, MSG, PM_NOREMOVE,
    WH_KEYBOARD_LL, WM_KEYDOWN, WM_QUIT, WM_SYSKEYDOWN, WM_USER,
};

use super::{CaptureError, KeySource};

/// Sender used by the hook callback to deliver presses to the dispatcher.
///
/// The callback is a plain `extern "system"` function with no user data, so
/// the sender has to live in a static. Only one subscription may be active.
static EVENT_SENDER: Mutex<Option<Sender<Key>>> = Mutex::new(None);

/// Windows low-level keyboard capture service.
pub struct WindowsKeySource {
    /// Thread id of the running hook message loop, if any.
    hook_thread_id: Mutex<Option<u32>>,
}

impl WindowsKeySource {
    /// Creates a new (unstarted) key source.
    pub fn new() -> Self {
        Self {
            hook_thread_id: Mutex::new(None),
        }
    }
}

impl Default for WindowsKeySource {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for WindowsKeySource {
    fn start(&self) -> Result<mpsc::Receiver<Key>, CaptureError> {
        let (tx, rx) = mpsc::channel::<Key>();
        {
            let mut sender = EVENT_SENDER.lock().map_err(|_| {
                CaptureError::HookInstallFailed("event sender lock poisoned".to_string())
            })?;
            if sender.is_some() {
                return Err(CaptureError::AlreadyRunning);
            }
            *sender = Some(tx);
        }

        // The hook thread reports its id once the hook is installed, or the
        // reason it could not be.
        let (ready_tx, ready_rx) = mpsc::channel::<Result<u32, String>>();
        let spawned = thread::Builder::new()
            .name("mouse-controls-hook".to_string())
            .spawn(move || run_hook_message_loop(ready_tx));
        if let Err(e) = spawned {
            clear_sender();
            return Err(CaptureError::HookInstallFailed(e.to_string()));
        }

        match ready_rx.recv() {
            Ok(Ok(thread_id)) => {
                if let Ok(mut id) = self.hook_thread_id.lock() {
                    *id = Some(thread_id);
                }
                Ok(rx)
            }
            Ok(Err(reason)) => {
                clear_sender();
                Err(CaptureError::HookInstallFailed(reason))
            }
            Err(_) => {
                clear_sender();
                Err(CaptureError::HookInstallFailed(
                    "hook thread exited during start-up".to_string(),
                ))
            }
        }
    }

    fn stop(&self) {
        let thread_id = self.hook_thread_id.lock().ok().and_then(|mut id| id.take());
        if let Some(thread_id) = thread_id {
            // SAFETY: posting a message to a thread id has no memory-safety
            // requirements; a stale id simply fails.
            if let Err(e) = unsafe { PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) } {
                warn!("failed to signal hook thread: {e}");
            }
        }
        // Closing the channel here wakes the consumer even if the hook thread
        // is slow to notice WM_QUIT.
        clear_sender();
    }
}

fn clear_sender() {
    if let Ok(mut sender) = EVENT_SENDER.lock() {
        *sender = None;
    }
}

/// Entry point for the dedicated Win32 message loop thread.
fn run_hook_message_loop(ready: Sender<Result<u32, String>>) {
    let mut msg = MSG::default();

    // SAFETY: PeekMessageW with PM_NOREMOVE forces creation of this thread's
    // message queue, so a WM_QUIT posted right after start() is not lost.
    unsafe {
        let _ = PeekMessageW(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE);
    }
    // SAFETY: GetCurrentThreadId has no preconditions.
    let thread_id = unsafe { GetCurrentThreadId() };

    // SAFETY: SetWindowsHookExW requires the calling thread to run a message
    // loop, which it does below.
    let hook = match unsafe { SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_hook_proc), None, 0) } {
        Ok(hook) => hook,
        Err(e) => {
            let _ = ready.send(Err(e.to_string()));
            return;
        }
    };
    let _ = ready.send(Ok(thread_id));
    debug!(thread_id, "keyboard hook installed");

    // Win32 message loop – blocks until WM_QUIT is posted
    // SAFETY: Standard Win32 GetMessage/DispatchMessage loop pattern.
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            DispatchMessageW(&msg);
        }
        UnhookWindowsHookEx(hook).ok();
    }
    debug!("keyboard hook removed");
    clear_sender();
}

/// Low-level keyboard hook callback.
///
/// # Safety
///
/// This function is called by Windows from the hook message loop thread.
/// It must return quickly (< ~300ms) to avoid hook removal by the OS.
unsafe extern "system" fn keyboard_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code == HC_ACTION as i32 && matches!(w_param.0 as u32, WM_KEYDOWN | WM_SYSKEYDOWN) {
        // SAFETY: l_param points to a KBDLLHOOKSTRUCT when n_code == HC_ACTION.
        let kbs = &*(l_param.0 as *const KBDLLHOOKSTRUCT);
        if let Some(key) = windows_vk::vk_to_key(kbs.vkCode as u8) {
            if let Ok(sender) = EVENT_SENDER.try_lock() {
                if let Some(sender) = sender.as_ref() {
                    // Ignore send errors (channel closed during shutdown).
                    let _ = sender.send(key);
                }
            }
        }
    }

    // SAFETY: Forward the event to the next hook in the chain.
    CallNextHookEx(None, n_code, w_param, l_param)
}
