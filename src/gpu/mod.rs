//! GPU state: device, surface, camera, and the per-frame pass schedule.
//!
//! Frame order is fixed: apply parameter changes (tick boundary), re-prime
//! or rebuild if the plan says so, step the position field, then draw the
//! point cloud from the freshly published front texture.

pub mod ping_pong;
pub mod points;
pub mod stepper;

use std::sync::Arc;

use glam::{Mat4, Vec3};
use winit::window::Window;

use crate::engine::Engine;
use crate::error::GpuError;
use ping_pong::{PositionFields, SchedulerState};
use points::PointRenderer;
use stepper::StepperPipeline;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Orbit camera: yaw/pitch around a target point.
pub struct Camera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub target: Vec3,
}

impl Camera {
    fn new() -> Self {
        Self {
            yaw: 0.7,
            pitch: 0.6,
            distance: 30.0,
            target: Vec3::ZERO,
        }
    }

    fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }
}

/// Tessellated egui output for one frame, handed over by the window layer.
#[cfg(feature = "egui")]
pub struct UiFrame {
    pub paint_jobs: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    depth_texture: wgpu::TextureView,
    pub camera: Camera,
    stepper: StepperPipeline,
    points: PointRenderer,
    fields: PositionFields,
    #[cfg(feature = "egui")]
    egui_renderer: egui_wgpu::Renderer,
}

impl GpuState {
    /// Initialize the GPU stack. Allocation failure here is fatal: there
    /// is no degraded mode without a device.
    pub async fn new(window: Arc<Window>, engine: &Engine) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        let stepper = StepperPipeline::new(&device, engine.params().selection.stepper_kind());
        let points = PointRenderer::new(&device, surface_format);
        let fields = PositionFields::new(engine.params().grid_size);

        #[cfg(feature = "egui")]
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            camera: Camera::new(),
            stepper,
            points,
            fields,
            #[cfg(feature = "egui")]
            egui_renderer,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, &self.config);
        }
    }

    /// The published position texture, if primed. Presentation-layer
    /// consumers must re-acquire this every frame.
    pub fn position_texture(&self) -> Option<&wgpu::TextureView> {
        self.fields.front_view()
    }

    /// Current live position-texture count (2 after any prime).
    pub fn live_position_textures(&self) -> u32 {
        self.fields.live_texture_count()
    }

    /// Run one frame: tick boundary, optional step, then draw.
    pub fn render(
        &mut self,
        engine: &mut Engine,
        #[cfg(feature = "egui")] ui: Option<UiFrame>,
    ) -> Result<(), wgpu::SurfaceError> {
        let plan = engine.begin_tick();

        if plan.rebuild_shader {
            self.stepper
                .rebuild(&self.device, engine.params().selection.stepper_kind());
        }

        if plan.reprime || self.fields.state() == SchedulerState::Uninitialized {
            let grid_size = engine.params().grid_size;
            let seed = engine.seed();
            self.fields.prime(&self.device, &self.queue, grid_size, &seed);
        }

        self.stepper.write_uniforms(&self.queue, &engine.sim_uniforms());

        let aspect = self.config.width as f32 / self.config.height as f32;
        let view = self.camera.view_matrix();
        let proj = Mat4::perspective_rh(45.0_f32.to_radians(), aspect, 0.1, 1000.0);
        self.points
            .write_uniforms(&self.queue, &engine.point_uniforms(view, proj));

        let output = self.surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        // Simulation pass: front -> scratch, then publish the swap. While
        // paused the pair and its roles stay exactly as they were.
        if plan.step {
            if let (Some(front), Some(scratch)) =
                (self.fields.front_view(), self.fields.scratch_view())
            {
                let bind_group = self.stepper.bind_group(&self.device, front);
                self.stepper.encode(&mut encoder, scratch, &bind_group);
            }
            self.fields.swap();
        }

        // Point pass from the current front texture, resolved fresh.
        if let Some(front) = self.fields.front_view() {
            let bind_group = self.points.bind_group(&self.device, front);
            let grid_size = self.fields.grid_size();

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Points Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.12,
                            g: 0.12,
                            b: 0.12,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.points.draw(
                &mut pass,
                &bind_group,
                engine.params().render_mode,
                grid_size * grid_size,
            );
        }

        #[cfg(feature = "egui")]
        if let Some(ui) = ui {
            let screen = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.config.width, self.config.height],
                pixels_per_point: ui.pixels_per_point,
            };

            for (id, delta) in &ui.textures_delta.set {
                self.egui_renderer
                    .update_texture(&self.device, &self.queue, *id, delta);
            }
            let callback_buffers = self.egui_renderer.update_buffers(
                &self.device,
                &self.queue,
                &mut encoder,
                &ui.paint_jobs,
                &screen,
            );
            self.queue.submit(callback_buffers);

            {
                let mut pass = encoder
                    .begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Ui Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &surface_view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        timestamp_writes: None,
                        occlusion_query_set: None,
                    })
                    .forget_lifetime();
                self.egui_renderer.render(&mut pass, &ui.paint_jobs, &screen);
            }

            for id in &ui.textures_delta.free {
                self.egui_renderer.free_texture(id);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
