//! Domain entities for mouse-controls.
//!
//! Pure geometry with no infrastructure dependencies: the configured
//! bounding rectangle, the margin-shrunk clamp rectangle derived from it,
//! and the per-axis clamp rule the cursor governor applies every tick.

/// Bounding and clamp regions.
///
/// See [`region::ClampRegion`] for the type the governor works with.
pub mod region;
