//! Application layer: the cursor lock itself.
//!
//! - **`governor`**   – Owns the lock state and runs the clamp loop against a
//!   [`governor::CursorAccessor`].
//! - **`dispatcher`** – Subscribes to global key presses and forwards them to
//!   the governor until the session ends.
//!
//! Neither module makes OS calls; both depend only on the traits the
//! infrastructure layer implements.

pub mod dispatcher;
pub mod governor;
