//! El Duel - a minimal real-time 2D simulation core
//!
//! Core modules:
//! - `math`: Vector helpers and the 3×3 affine transform
//! - `sim`: Deterministic simulation (poses, camera, meshes, SAT collision, world step)
//! - `scheduler`: Fixed-timestep accumulator loop with render interpolation
//! - `renderer`: Render boundary (frame description, vertex packing)
//! - `input`: Read-only keyboard/mouse snapshots
//! - `state`: Scenario lifecycle (load/update/render/unload)
//! - `settings`: Data-driven configuration
//! - `game`: Driver the scheduler steps and renders
//! - `demo`: The "duel" scenario

pub mod demo;
pub mod error;
pub mod game;
pub mod input;
pub mod math;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;
pub mod state;

pub use error::{GeometryError, SchedulerError, SettingsError, StateError, TransformError};
pub use game::Game;
pub use scheduler::{
    Clock, FixedStepScheduler, FixedStepTarget, FrameLatch, FrameRequester, TickReport,
};
pub use settings::Settings;

/// Engine configuration constants
pub mod consts {
    /// Fixed simulation timestep in seconds (60 Hz)
    pub const FIXED_STEP_SECONDS: f64 = 1.0 / 60.0;
    /// Accumulator ceiling in milliseconds ("spiral of death" guard)
    pub const MAX_ACCUMULATOR_MS: f64 = 200.0;

    /// Default viewport dimensions (pixels)
    pub const VIEWPORT_WIDTH: f32 = 960.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;

    /// Size of the keyboard state table
    pub const MAX_KEYS: usize = 256;
}

/// Normalized angle to [-π, π]
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}

/// Interpolate between two angles along the shortest arc
#[inline]
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    from + normalize_angle(to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_angle_huge_input() {
        for angle in [1.0e10_f32, -1.0e10, 3.0e38] {
            let wrapped = normalize_angle(angle);
            assert!(wrapped.is_finite());
            assert!(wrapped.abs() <= PI + 1e-6);
        }
        let mid = lerp_angle(0.0, 1.0e10, 0.5);
        assert!(mid.is_finite());
    }

    #[test]
    fn test_lerp_angle_takes_short_way() {
        // 170° to -170° should pass through 180°, not 0°
        let a = 170.0_f32.to_radians();
        let b = -170.0_f32.to_radians();
        let mid = normalize_angle(lerp_angle(a, b, 0.5));
        assert!((mid.abs() - PI).abs() < 1e-4);
    }
}
