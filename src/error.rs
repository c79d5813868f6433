//! Error types
//!
//! None of these abort the simulation loop. Geometry and transform failures are
//! recovered where they happen; scheduler misuse is reported and ignored.

use thiserror::Error;

/// Triangulation could not produce a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// Fewer than three vertices
    #[error("polygon has {vertices} vertices, need at least 3")]
    Degenerate { vertices: usize },
    /// Both winding assumptions failed to find an ear
    #[error("polygon is too complex or self-intersecting to triangulate")]
    TooComplex,
}

/// Matrix could not be inverted
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TransformError {
    #[error("matrix is singular (determinant {determinant})")]
    Singular { determinant: f32 },
}

/// Scheduler called in the wrong state (the call had no effect), or built with unusable timing
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SchedulerError {
    #[error("scheduler is not running")]
    NotRunning,
    #[error("scheduler is already running")]
    AlreadyRunning,
    #[error("invalid timing: step {step_ms} ms, clamp {max_accumulator_ms} ms")]
    InvalidTiming { step_ms: f64, max_accumulator_ms: f64 },
}

/// Scenario registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("no scenario registered as `{0}`")]
    UnknownScenario(String),
}

/// Settings load/validation errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}
