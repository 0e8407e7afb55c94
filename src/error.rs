//! Game-specific error types.
//!
//! Systems should propagate errors through these types rather than panicking
//! where practical, enabling graceful degradation instead of hard crashes.
//! Every per-frame failure path in the throw/scoring/audio loop degrades to
//! "skip this frame's effect" — these types cover the setup-time failures
//! that deserve a named reason.

// This module provides infrastructure types for future error propagation.
// Items are public API; dead_code lint is suppressed to avoid forcing premature wiring.
#![allow(dead_code)]
use std::fmt;

/// Top-level error enum for the skeelane game.
#[derive(Debug)]
pub enum GameError {
    /// Board plate tessellation produced too little geometry to form a valid
    /// trimesh collider, usually because the cell size exceeds the plate.
    BoardMesh {
        /// Number of vertices generated.
        vertex_count: usize,
        /// Number of triangles generated.
        triangle_count: usize,
    },

    /// A pointer ray failed to intersect the drag plane (camera parallel to
    /// the plane, or cursor outside the viewport).  Callers skip the frame.
    PlaneProjection {
        /// Human-readable description of where the projection was attempted.
        context: &'static str,
    },

    /// Gameplay constant is outside its safe operating range.
    /// Returned by validation helpers; not triggered at runtime by default.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::BoardMesh {
                vertex_count,
                triangle_count,
            } => write!(
                f,
                "board tessellation produced degenerate geometry: {} vertices, {} triangles",
                vertex_count, triangle_count
            ),
            GameError::PlaneProjection { context } => {
                write!(f, "pointer ray missed the drag plane during '{}'", context)
            }
            GameError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for GameError {}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if `min_forward_speed` would launch balls beyond the
/// forward clamp — the substitution floor must stay inside the clamp range.
pub fn validate_min_forward_speed(value: f32) -> GameResult<()> {
    if value <= 0.0 || value > crate::constants::MAX_FORWARD_SPEED {
        Err(GameError::UnsafeConstant {
            name: "MIN_FORWARD_SPEED",
            value,
            safe_range: "(0.0, MAX_FORWARD_SPEED]",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if the board tessellation cell is not strictly positive
/// or is too coarse to carve the smallest hole.
pub fn validate_board_mesh_cell(value: f32) -> GameResult<()> {
    if value <= 0.0 || value >= crate::constants::HOLE_RADIUS {
        Err(GameError::UnsafeConstant {
            name: "BOARD_MESH_CELL",
            value,
            safe_range: "(0.0, HOLE_RADIUS)",
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_constants_pass_validation() {
        assert!(validate_min_forward_speed(crate::constants::MIN_FORWARD_SPEED).is_ok());
        assert!(validate_board_mesh_cell(crate::constants::BOARD_MESH_CELL).is_ok());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(validate_min_forward_speed(0.0).is_err());
        assert!(validate_min_forward_speed(crate::constants::MAX_FORWARD_SPEED + 1.0).is_err());
        assert!(validate_board_mesh_cell(crate::constants::HOLE_RADIUS).is_err());
    }
}
