//! Simulation orchestration.
//!
//! The engine owns the parameter store and the authoritative
//! [`SimulationParameters`] snapshot. Widgets write to the store at any
//! point during a frame; the engine drains those writes exactly once at
//! the start of each tick, so the GPU passes never observe a selection
//! changing mid-tick.
//!
//! Single-threaded by design: one tick runs to completion before the next
//! begins. A multi-threaded port would need the re-prime path (buffer
//! disposal + reallocation) to be mutually exclusive with an in-flight
//! tick.

use crate::attractor::AttractorKind;
use crate::params::ParamStore;
use crate::shader::{PointUniforms, SimUniforms};
use crate::spawn;
use crate::surface::SurfaceKind;
use crate::time::Clock;
use crate::visuals::{random_color_pair, RenderMode};
use glam::{Mat4, Vec3};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Default grid edge: 1408 x 1408 logical particles.
pub const DEFAULT_GRID_SIZE: u32 = 1408;

/// Fixed screen-proportional point size for the lit (depth-tested) mode.
const LIT_POINT_SIZE: f32 = 0.0035;

/// What is currently being visualized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// An attractor vector field, integrated every tick.
    Field(AttractorKind),
    /// A parametric surface, sampled once at spawn and drifted by curl
    /// noise only.
    Shape(SurfaceKind),
}

impl Selection {
    /// The field the stepper integrates. Shapes rest on their spawn
    /// positions, so they step through the identity field.
    pub fn stepper_kind(self) -> AttractorKind {
        match self {
            Selection::Field(kind) => kind,
            Selection::Shape(_) => AttractorKind::Identity,
        }
    }

    /// Numeric id of the selected catalog entry.
    pub fn id(self) -> i32 {
        match self {
            Selection::Field(kind) => kind.id(),
            Selection::Shape(kind) => kind.id(),
        }
    }

    /// Tuned distance-color multiplier for the selected entry.
    pub fn distance_color_scale(self) -> f32 {
        match self {
            Selection::Field(kind) => kind.distance_color_scale(),
            Selection::Shape(kind) => kind.distance_color_scale(),
        }
    }
}

/// Snapshot of every tunable the GPU passes consume this tick.
#[derive(Debug, Clone)]
pub struct SimulationParameters {
    pub selection: Selection,
    pub coefficients: Vec<f32>,
    pub curl_intensity: f32,
    pub curl_amplitude: f32,
    pub paused: bool,
    pub grid_size: u32,
    pub inner_color: Vec3,
    pub outer_color: Vec3,
    pub render_mode: RenderMode,
    pub point_size: f32,
}

/// Directives for the GPU side, produced once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickPlan {
    /// Selection changed: regenerate the simulation pipeline.
    pub rebuild_shader: bool,
    /// Selection, grid size, or restart: dispose and re-seed both buffers.
    pub reprime: bool,
    /// Run the stepper this tick (false while paused).
    pub step: bool,
}

/// The simulation core's control seam.
pub struct Engine {
    store: ParamStore,
    params: SimulationParameters,
    clock: Clock,
    rng: SmallRng,
    restart_seen: u64,
}

impl Engine {
    pub fn new() -> Self {
        let mut rng = SmallRng::from_entropy();
        let (inner, outer) = random_color_pair(&mut rng);
        let selection = Selection::Field(AttractorKind::Lorenz);

        let mut store = ParamStore::new();
        store.register_select(
            "mode",
            vec![("Attractor".to_string(), 0), ("Shape".to_string(), 1)],
            0,
        );
        store.register_select(
            "attractor",
            AttractorKind::ALL
                .iter()
                .map(|k| (k.name().to_string(), k.id()))
                .collect(),
            AttractorKind::Lorenz.id(),
        );
        store.register_select(
            "shape",
            SurfaceKind::ALL
                .iter()
                .map(|k| (k.name().to_string(), k.id()))
                .collect(),
            SurfaceKind::Sphere.id(),
        );
        store.register_float("curl_intensity", 0.0, 0.0, 0.2, 0.0001);
        store.register_float("curl_amplitude", 0.0, 0.0, 0.2, 0.0001);
        store.register_color("inner_color", inner.to_array());
        store.register_color("outer_color", outer.to_array());
        store.register_toggle("pause", false);
        store.register_float(
            "grid_size",
            DEFAULT_GRID_SIZE as f32,
            8.0,
            2048.0,
            8.0,
        );
        store.register_float("point_size", 0.02, 0.002, 0.1, 0.001);
        store.register_select(
            "render_mode",
            vec![
                (RenderMode::Glow.name().to_string(), RenderMode::Glow.id()),
                (RenderMode::Lit.name().to_string(), RenderMode::Lit.id()),
            ],
            RenderMode::Glow.id(),
        );

        let kind = selection.stepper_kind();
        store.load_coefficients(selection.id(), kind.coefficient_defaults());

        let params = SimulationParameters {
            selection,
            coefficients: kind.default_values(),
            curl_intensity: 0.0,
            curl_amplitude: 0.0,
            paused: false,
            grid_size: DEFAULT_GRID_SIZE,
            inner_color: inner,
            outer_color: outer,
            render_mode: RenderMode::Glow,
            point_size: 0.02,
        };

        Self {
            store,
            params,
            clock: Clock::new(),
            rng,
            restart_seen: 0,
        }
    }

    fn selection_from_store(&self) -> Selection {
        let mode = self.store.select("mode").unwrap_or(0);
        if mode == 1 {
            Selection::Shape(SurfaceKind::from_id(
                self.store.select("shape").unwrap_or(SurfaceKind::Sphere.id()),
            ))
        } else {
            Selection::Field(AttractorKind::from_id(
                self.store.select("attractor").unwrap_or(0),
            ))
        }
    }

    /// Apply every parameter write since the last tick and plan this one.
    ///
    /// This is the tick boundary: selection changes, restarts, and grid
    /// resizes requested mid-frame all land here, never mid-tick.
    pub fn begin_tick(&mut self) -> TickPlan {
        let mut plan = TickPlan::default();
        let changes = self.store.drain_changes();

        let selection = self.selection_from_store();
        if selection != self.params.selection {
            self.params.selection = selection;
            // New selection gets a fresh coefficient group, replacing any
            // overrides from the previous one.
            let kind = selection.stepper_kind();
            self.store
                .load_coefficients(selection.id(), kind.coefficient_defaults());
            plan.rebuild_shader = true;
            plan.reprime = true;
        }

        for name in &changes {
            match name.as_str() {
                "grid_size" => {
                    let edge = self.store.float("grid_size").unwrap_or(DEFAULT_GRID_SIZE as f32);
                    let edge = edge.round() as u32;
                    if edge != self.params.grid_size {
                        self.params.grid_size = edge;
                        plan.reprime = true;
                    }
                }
                "pause" => {
                    self.params.paused = self.store.toggle("pause").unwrap_or(false);
                    self.clock.set_paused(self.params.paused);
                }
                _ => {}
            }
        }

        if self.store.restart_count() != self.restart_seen {
            self.restart_seen = self.store.restart_count();
            plan.reprime = true;
        }

        // The remaining snapshot fields are cheap enough to refresh
        // unconditionally every tick.
        self.params.coefficients = self.store.coefficient_values().to_vec();
        self.params.curl_intensity = self.store.float("curl_intensity").unwrap_or(0.0);
        self.params.curl_amplitude = self.store.float("curl_amplitude").unwrap_or(0.0);
        self.params.inner_color = Vec3::from_array(
            self.store.color("inner_color").unwrap_or([1.0, 1.0, 1.0]),
        );
        self.params.outer_color = Vec3::from_array(
            self.store.color("outer_color").unwrap_or([1.0, 1.0, 1.0]),
        );
        self.params.point_size = self.store.float("point_size").unwrap_or(0.02);
        self.params.render_mode =
            RenderMode::from_id(self.store.select("render_mode").unwrap_or(0));

        self.clock.update();
        plan.step = !self.params.paused;
        plan
    }

    /// Seed texel data for (re)priming both position buffers.
    pub fn seed(&mut self) -> Vec<f32> {
        match self.params.selection {
            Selection::Field(_) => spawn::shell_seed(self.params.grid_size, &mut self.rng),
            Selection::Shape(kind) => {
                spawn::surface_seed(kind, self.params.grid_size, &mut self.rng)
            }
        }
    }

    /// Uniforms for the simulation pass.
    pub fn sim_uniforms(&self) -> SimUniforms {
        SimUniforms {
            time: self.clock.elapsed(),
            curl_intensity: self.params.curl_intensity,
            curl_amplitude: self.params.curl_amplitude,
            _pad: 0.0,
            coeffs: SimUniforms::pack_coeffs(&self.params.coefficients),
        }
    }

    /// Uniforms for the point-render pass.
    pub fn point_uniforms(&self, view: Mat4, proj: Mat4) -> PointUniforms {
        let attenuated = self.params.render_mode == RenderMode::Glow;
        PointUniforms {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            inner_color: self.params.inner_color.to_array(),
            distance_scale: self.params.selection.distance_color_scale(),
            outer_color: self.params.outer_color.to_array(),
            point_size: if attenuated {
                self.params.point_size
            } else {
                LIT_POINT_SIZE
            },
            grid_size: self.params.grid_size,
            size_attenuation: attenuated as u32,
            _pad: [0.0; 2],
        }
    }

    // ========== Presentation-layer queries ==========

    /// Numeric id of the active catalog entry (field or shape).
    pub fn selected_id(&self) -> i32 {
        self.params.selection.id()
    }

    pub fn is_paused(&self) -> bool {
        self.params.paused
    }

    /// Elapsed simulation time in seconds.
    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn store(&self) -> &ParamStore {
        &self.store
    }

    /// Mutable store access for the control surface.
    pub fn store_mut(&mut self) -> &mut ParamStore {
        &mut self.store
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;

    #[test]
    fn test_initial_snapshot() {
        let engine = Engine::new();
        assert_eq!(engine.params().selection, Selection::Field(AttractorKind::Lorenz));
        assert_eq!(engine.params().grid_size, DEFAULT_GRID_SIZE);
        assert!(!engine.is_paused());
        assert_eq!(engine.selected_id(), 0);
    }

    #[test]
    fn test_first_tick_is_quiet() {
        let mut engine = Engine::new();
        engine.store_mut().drain_changes();
        let plan = engine.begin_tick();
        assert!(!plan.rebuild_shader);
        assert!(!plan.reprime);
        assert!(plan.step);
    }

    #[test]
    fn test_selection_change_replaces_coefficients_and_reprimes() {
        let mut engine = Engine::new();
        engine.begin_tick();

        // Override a Lorenz coefficient, then switch fields
        engine.store_mut().set_coefficient(0, 99.0);
        engine.begin_tick();
        assert_eq!(engine.params().coefficients[0], 99.0);

        engine
            .store_mut()
            .set("attractor", ParamValue::Select(AttractorKind::Thomas.id()));
        let plan = engine.begin_tick();

        assert!(plan.rebuild_shader);
        assert!(plan.reprime);
        assert_eq!(engine.params().selection, Selection::Field(AttractorKind::Thomas));
        // Wholesale replacement: Thomas defaults, not the stale override
        assert_eq!(engine.params().coefficients, AttractorKind::Thomas.default_values());
    }

    #[test]
    fn test_reset_restores_catalog_default_outputs() {
        let mut engine = Engine::new();
        engine.begin_tick();
        let state = Vec3::new(1.0, 2.0, 3.0);
        let fresh = AttractorKind::Lorenz.integrate(state, &engine.params().coefficients);

        engine.store_mut().set_coefficient(1, 50.0);
        engine.begin_tick();
        let overridden =
            AttractorKind::Lorenz.integrate(state, &engine.params().coefficients);
        assert_ne!(fresh, overridden);

        engine.store_mut().reset_coefficients();
        engine.begin_tick();
        let reset = AttractorKind::Lorenz.integrate(state, &engine.params().coefficients);
        assert_eq!(fresh, reset);
    }

    #[test]
    fn test_restart_reprimes_without_selection_change() {
        let mut engine = Engine::new();
        engine.begin_tick();

        engine.store_mut().trigger_restart();
        let plan = engine.begin_tick();
        assert!(plan.reprime);
        assert!(!plan.rebuild_shader);

        // One restart only fires once
        let plan = engine.begin_tick();
        assert!(!plan.reprime);
    }

    #[test]
    fn test_pause_skips_stepping_and_freezes_time() {
        let mut engine = Engine::new();
        engine.begin_tick();

        engine.store_mut().set("pause", ParamValue::Bool(true));
        let plan = engine.begin_tick();
        assert!(!plan.step);

        let frozen = engine.elapsed();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let plan = engine.begin_tick();
        assert!(!plan.step);
        assert_eq!(engine.elapsed(), frozen);
    }

    #[test]
    fn test_shape_mode_steps_through_identity() {
        let mut engine = Engine::new();
        engine.begin_tick();

        engine.store_mut().set("mode", ParamValue::Select(1));
        let plan = engine.begin_tick();
        assert!(plan.rebuild_shader && plan.reprime);
        assert_eq!(
            engine.params().selection.stepper_kind(),
            AttractorKind::Identity
        );
        assert!(engine.params().coefficients.is_empty());
    }

    #[test]
    fn test_grid_resize_reprimes() {
        let mut engine = Engine::new();
        engine.begin_tick();

        engine.store_mut().set("grid_size", ParamValue::Float(64.0));
        let plan = engine.begin_tick();
        assert!(plan.reprime);
        assert!(!plan.rebuild_shader);
        assert_eq!(engine.params().grid_size, 64);

        let seed = engine.seed();
        assert_eq!(seed.len(), 64 * 64 * 4);
    }

    #[test]
    fn test_curl_writes_are_clamped() {
        let mut engine = Engine::new();
        engine.begin_tick();
        engine
            .store_mut()
            .set("curl_intensity", ParamValue::Float(7.0));
        engine.begin_tick();
        assert_eq!(engine.params().curl_intensity, 0.2);
    }

    #[test]
    fn test_sim_uniform_packing() {
        let mut engine = Engine::new();
        engine.begin_tick();
        let uniforms = engine.sim_uniforms();
        assert_eq!(uniforms.coeffs[0][0], 5.0); // Lorenz a
        assert_eq!(uniforms.coeffs[0][1], 14.0); // Lorenz b
    }

    #[test]
    fn test_point_uniforms_use_selection_scale() {
        let mut engine = Engine::new();
        engine.begin_tick();
        let uniforms = engine.point_uniforms(Mat4::IDENTITY, Mat4::IDENTITY);
        assert_eq!(uniforms.distance_scale, 0.025);
        assert_eq!(uniforms.size_attenuation, 1);
    }
}
