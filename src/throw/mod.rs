//! Throw module: pointer input, the drag state machine, and launch laws.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | `PointerState` / `DragState` resources and the `DragSession` data carried while a ball is held |
//! | [`control`] | Input normalisation systems, drag begin/update/release systems, and the pure launch-velocity laws |
//!
//! All public items are re-exported at this level so that the rest of the
//! crate can use flat `crate::throw::*` imports without knowing the
//! sub-module layout.

pub mod control;
pub mod state;

// ── Flat re-exports ───────────────────────────────────────────────────────────

pub use control::{
    abort_drag_system, drag_begin_system, drag_release_system, drag_update_system,
    launch_velocity, mouse_to_pointer_system, pointer_clear_system, touch_to_pointer_system,
};
pub use state::{DragSession, DragState, PointerState, VelocitySample};
