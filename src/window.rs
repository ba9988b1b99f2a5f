//! Application shell: window, event loop, orbit controls, and the
//! feature-gated egui control panel.
//!
//! The panel is deliberately thin: it renders one widget per registered
//! parameter kind and writes back through the store. All simulation
//! consequences (re-prime, shader rebuild, pause) are decided by the
//! engine at the next tick boundary, never here.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::engine::Engine;
use crate::error::VisualizerError;
use crate::gpu::GpuState;

/// Run the visualizer until the window closes.
///
/// Initialization failures (no window, no GPU device) are fatal and
/// returned to the caller; there is no degraded mode without a device.
pub fn run() -> Result<(), VisualizerError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    match app.init_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    engine: Engine,
    init_error: Option<VisualizerError>,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    #[cfg(feature = "egui")]
    panel: Option<panel::ControlPanel>,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            gpu: None,
            engine: Engine::new(),
            init_error: None,
            mouse_pressed: false,
            last_mouse_pos: None,
            #[cfg(feature = "egui")]
            panel: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("swirl - strange attractor visualizer")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.init_error = Some(VisualizerError::Window(e));
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        #[cfg(feature = "egui")]
        {
            self.panel = Some(panel::ControlPanel::new(&window));
        }

        match pollster::block_on(GpuState::new(window, &self.engine)) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                self.init_error = Some(VisualizerError::Gpu(e));
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(feature = "egui")]
        if let (Some(panel), Some(window)) = (self.panel.as_mut(), self.window.as_ref()) {
            if panel.on_window_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        let dx = position.x - last_x;
                        let dy = position.y - last_y;

                        if let Some(gpu) = &mut self.gpu {
                            gpu.camera.yaw -= dx as f32 * 0.005;
                            gpu.camera.pitch += dy as f32 * 0.005;
                            gpu.camera.pitch = gpu.camera.pitch.clamp(-1.5, 1.5);
                        }
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                if let Some(gpu) = &mut self.gpu {
                    gpu.camera.distance -= scroll * 1.5;
                    gpu.camera.distance = gpu.camera.distance.clamp(2.0, 150.0);
                }
            }
            WindowEvent::RedrawRequested => {
                #[cfg(feature = "egui")]
                let ui_frame = match (self.panel.as_mut(), self.window.as_ref()) {
                    (Some(panel), Some(window)) => {
                        Some(panel.run(window, &mut self.engine))
                    }
                    _ => None,
                };

                if let Some(gpu) = &mut self.gpu {
                    let result = gpu.render(
                        &mut self.engine,
                        #[cfg(feature = "egui")]
                        ui_frame,
                    );
                    match result {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => gpu.resize(winit::dpi::PhysicalSize {
                            width: gpu.config.width,
                            height: gpu.config.height,
                        }),
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => eprintln!("Render error: {:?}", e),
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

#[cfg(feature = "egui")]
mod panel {
    //! The egui control panel: one widget per registered parameter kind,
    //! plus the coefficient group, reset, and restart actions.

    use std::sync::Arc;
    use winit::window::Window;

    use crate::engine::Engine;
    use crate::gpu::UiFrame;
    use crate::params::{ParamSpec, ParamValue};

    pub struct ControlPanel {
        ctx: egui::Context,
        state: egui_winit::State,
    }

    impl ControlPanel {
        pub fn new(window: &Arc<Window>) -> Self {
            let ctx = egui::Context::default();

            let mut style = egui::Style::default();
            style.visuals = egui::Visuals::dark();
            style.visuals.window_shadow = egui::Shadow::NONE;
            style.visuals.popup_shadow = egui::Shadow::NONE;
            ctx.set_style(style);

            let state = egui_winit::State::new(
                ctx.clone(),
                egui::ViewportId::ROOT,
                window.as_ref(),
                Some(window.scale_factor() as f32),
                None,
                None,
            );

            Self { ctx, state }
        }

        /// Returns true if egui consumed the event (keep it away from the
        /// camera controls).
        pub fn on_window_event(
            &mut self,
            window: &Arc<Window>,
            event: &winit::event::WindowEvent,
        ) -> bool {
            self.state.on_window_event(window.as_ref(), event).consumed
        }

        /// Build this frame's UI and tessellate it for the GPU layer.
        pub fn run(&mut self, window: &Arc<Window>, engine: &mut Engine) -> UiFrame {
            let raw_input = self.state.take_egui_input(window.as_ref());
            self.ctx.begin_frame(raw_input);

            build_ui(&self.ctx, engine);

            let full_output = self.ctx.end_frame();
            self.state
                .handle_platform_output(window.as_ref(), full_output.platform_output);
            let paint_jobs = self
                .ctx
                .tessellate(full_output.shapes, full_output.pixels_per_point);

            UiFrame {
                paint_jobs,
                textures_delta: full_output.textures_delta,
                pixels_per_point: full_output.pixels_per_point,
            }
        }
    }

    fn build_ui(ctx: &egui::Context, engine: &mut Engine) {
        egui::Window::new("Controls")
            .default_pos([10.0, 10.0])
            .resizable(false)
            .show(ctx, |ui| {
                let store = engine.store_mut();
                let shape_mode = store.select("mode").unwrap_or(0) == 1;

                // One widget per registered parameter; writes are queued
                // so the store borrow stays clean.
                let mut writes: Vec<(String, ParamValue)> = Vec::new();
                for (name, value, spec) in store.iter() {
                    // The two selection dropdowns are mutually exclusive
                    if (name == "shape" && !shape_mode) || (name == "attractor" && shape_mode) {
                        continue;
                    }
                    if name == "grid_size" && !shape_mode {
                        continue;
                    }

                    match (value, spec) {
                        (ParamValue::Float(v), ParamSpec::Float { min, max, step }) => {
                            let mut x = *v;
                            let slider = egui::Slider::new(&mut x, *min..=*max)
                                .text(name)
                                .step_by(*step as f64);
                            if ui.add(slider).changed() {
                                writes.push((name.to_string(), ParamValue::Float(x)));
                            }
                        }
                        (ParamValue::Bool(v), ParamSpec::Toggle) => {
                            let mut b = *v;
                            if ui.checkbox(&mut b, name).changed() {
                                writes.push((name.to_string(), ParamValue::Bool(b)));
                            }
                        }
                        (ParamValue::Select(v), ParamSpec::Select { options }) => {
                            let mut selected = *v;
                            let current = options
                                .iter()
                                .find(|(_, id)| *id == selected)
                                .map(|(label, _)| label.as_str())
                                .unwrap_or("?");
                            egui::ComboBox::from_label(name)
                                .selected_text(current)
                                .show_ui(ui, |ui| {
                                    for (label, id) in options {
                                        ui.selectable_value(&mut selected, *id, label);
                                    }
                                });
                            if selected != *v {
                                writes.push((name.to_string(), ParamValue::Select(selected)));
                            }
                        }
                        (ParamValue::Color(v), ParamSpec::Color) => {
                            let mut rgb = *v;
                            ui.horizontal(|ui| {
                                if ui.color_edit_button_rgb(&mut rgb).changed() {
                                    writes.push((name.to_string(), ParamValue::Color(rgb)));
                                }
                                ui.label(name);
                            });
                        }
                        _ => {}
                    }
                }
                for (name, value) in writes {
                    store.set(&name, value);
                }

                // Coefficient group for the current selection
                if !store.coefficient_names().is_empty() {
                    ui.separator();
                    ui.heading("Coefficients");

                    let names: Vec<&str> = store.coefficient_names().to_vec();
                    let values: Vec<f32> = store.coefficient_values().to_vec();
                    for (i, (name, value)) in names.iter().zip(values.iter()).enumerate() {
                        let mut x = *value;
                        ui.horizontal(|ui| {
                            if ui
                                .add(egui::DragValue::new(&mut x).speed(0.01))
                                .changed()
                            {
                                store.set_coefficient(i, x);
                            }
                            ui.label(*name);
                        });
                    }

                    if ui.button("Reset to defaults").clicked() {
                        store.reset_coefficients();
                    }
                }

                ui.separator();
                if ui.button("Restart").clicked() {
                    store.trigger_restart();
                }
            });
    }
}
