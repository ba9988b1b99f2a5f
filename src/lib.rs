//! # swirl
//!
//! GPU strange-attractor particle visualizer.
//!
//! A fixed catalog of chaotic vector fields (Lorenz, Thomas, Aizawa, ...)
//! and parametric surfaces drives a position texture that lives entirely
//! on the GPU: every tick, a fullscreen fragment pass integrates each
//! particle one step and writes the result into the scratch half of a
//! ping-pong texture pair. An instanced point renderer then draws the
//! population from the freshly published front texture, color-graded by
//! radial distance.
//!
//! ## Architecture
//!
//! - [`attractor`] / [`surface`] - the closed function catalogs with their
//!   tuned coefficient and color tables
//! - [`params`] - name -> value store with clamping and change logging;
//!   the seam the control panel writes through
//! - [`engine`] - drains parameter changes at tick boundaries and plans
//!   each tick (step, re-prime, shader rebuild)
//! - [`gpu`] - wgpu device state, the double-buffered position field, the
//!   stepper pass and the point renderer
//! - [`window`] - winit shell and the optional egui control panel
//!
//! ## Running
//!
//! ```ignore
//! cargo run --release --features egui
//! ```
//!
//! Drag to orbit, scroll to zoom. Without the `egui` feature the window
//! runs the default Lorenz field with no panel.
//!
//! ## Simulation loop invariants
//!
//! - Exactly one position texture is readable ("front") at any tick
//!   boundary; the stepper never reads and writes the same texture.
//! - Selection or grid changes re-seed both textures and dispose the old
//!   pair first; the live-texture count stays at exactly two.
//! - Parameter writes land at tick boundaries only; a paused tick leaves
//!   buffers, parameters, and the time accumulator untouched.

pub mod attractor;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod params;
pub mod shader;
pub mod shader_utils;
pub mod spawn;
pub mod surface;
pub mod time;
pub mod visuals;
pub mod window;

pub use glam::{Vec2, Vec3, Vec4};

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::attractor::AttractorKind;
    pub use crate::engine::{Engine, Selection, SimulationParameters, TickPlan};
    pub use crate::error::{GpuError, VisualizerError};
    pub use crate::gpu::ping_pong::{PositionFields, SchedulerState};
    pub use crate::params::{ParamSpec, ParamStore, ParamValue};
    pub use crate::surface::SurfaceKind;
    pub use crate::time::Clock;
    pub use crate::visuals::RenderMode;
    pub use crate::window::run;
    pub use crate::{Vec2, Vec3, Vec4};
}
