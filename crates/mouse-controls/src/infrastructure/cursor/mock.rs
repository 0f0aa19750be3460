//! Mock cursor accessor for unit testing.
//!
//! The real accessors move the pointer on the test machine and need a live
//! desktop session. `MockCursor` keeps the position in memory instead and
//! records every write the governor makes, so tests can assert on exactly
//! what was written and in what order.
//!
//! [`MockCursor::move_to`] stands in for the user dragging the mouse: it
//! changes the position without being recorded as a governor write.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::application::governor::{CursorAccessor, CursorError};

/// An in-memory cursor that records governor writes.
#[derive(Default)]
pub struct MockCursor {
    position: Mutex<(i32, i32)>,
    writes: Mutex<Vec<(i32, i32)>>,
    reads: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MockCursor {
    /// Creates a mock cursor resting at `(x, y)`.
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            position: Mutex::new((x, y)),
            ..Self::default()
        }
    }

    /// Current position.
    pub fn current(&self) -> (i32, i32) {
        *self.position.lock().expect("lock poisoned")
    }

    /// Simulates the user moving the mouse.
    pub fn move_to(&self, x: i32, y: i32) {
        *self.position.lock().expect("lock poisoned") = (x, y);
    }

    /// Every position passed to `set_position`, oldest first.
    pub fn writes(&self) -> Vec<(i32, i32)> {
        self.writes.lock().expect("lock poisoned").clone()
    }

    /// Number of `position` calls, failed ones included.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Makes `position` fail until switched off again.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes `set_position` fail until switched off again.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl CursorAccessor for MockCursor {
    fn position(&self) -> Result<(i32, i32), CursorError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CursorError::Read("mock failure".into()));
        }
        Ok(self.current())
    }

    fn set_position(&self, x: i32, y: i32) -> Result<(), CursorError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CursorError::Write("mock failure".into()));
        }
        self.move_to(x, y);
        self.writes.lock().expect("lock poisoned").push((x, y));
        Ok(())
    }
}
