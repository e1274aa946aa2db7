use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec3;
use headrig_common::{ConfigOverrides, RigConfig};
use headrig_render::{PlotLabels, RenderView, SceneBounds};
use headrig_render_wgpu::{OrbitCamera, WgpuRenderer};
use headrig_rig::Rig;
use headrig_tools::{CameraInfo, RigInspector, RigSummary};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{
    DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent,
};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const WINDOW_SIZE: u32 = 900;
/// Pixels of trackpad scroll per zoom step.
const PIXELS_PER_SCROLL_STEP: f32 = 50.0;

#[derive(Parser)]
#[command(name = "headrig-viewer", about = "3D view of a camera ring around a head")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Rig config file (.yaml, .yml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of cameras on the ring
    #[arg(long)]
    cameras: Option<usize>,

    /// Ring radius in meters
    #[arg(long)]
    radius: Option<f32>,

    /// Ring elevation in degrees
    #[arg(long, allow_negative_numbers = true)]
    elevation: Option<f32>,
}

/// Application state.
struct AppState {
    rig: Rig,
    bounds: SceneBounds,
    labels: PlotLabels,
    summary: RigSummary,
    cameras: Vec<CameraInfo>,
    camera: OrbitCamera,
    home: OrbitCamera,
    show_panel: bool,
    show_camera_labels: bool,
    mouse_captured: bool,
}

impl AppState {
    fn new(rig: Rig) -> Self {
        // An empty head and ring still needs a box to look at.
        let bounds = SceneBounds::of_rig(&rig).unwrap_or(SceneBounds {
            center: Vec3::ZERO,
            half_edge: rig.config().radius,
        });
        let view = RenderView::framing(&bounds, RenderView::default().fov_degrees);
        let camera = OrbitCamera::from_view(&view);
        let summary = RigInspector::summary(&rig);
        let cameras = RigInspector::list_cameras(&rig);

        Self {
            rig,
            bounds,
            labels: PlotLabels::default(),
            summary,
            cameras,
            camera,
            home: camera,
            show_panel: true,
            show_camera_labels: true,
            mouse_captured: false,
        }
    }

    /// Apply a key binding. Returns `true` when the viewer should close.
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::KeyR => {
                let aspect = self.camera.aspect;
                self.camera = self.home;
                self.camera.aspect = aspect;
                tracing::debug!("view reset");
            }
            KeyCode::KeyL => {
                self.show_camera_labels = !self.show_camera_labels;
            }
            KeyCode::F1 => {
                self.show_panel = !self.show_panel;
            }
            KeyCode::Escape => return true,
            _ => {}
        }
        false
    }

    fn draw_ui(&self, ctx: &EguiContext, size_in_points: egui::Vec2) {
        egui::TopBottomPanel::top("title").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(&self.labels.title);
            });
        });

        if self.show_panel {
            egui::SidePanel::left("rig")
                .default_width(260.0)
                .show(ctx, |ui| {
                    let s = &self.summary;
                    ui.heading("Rig");
                    ui.label(format!("Cameras: {}", s.camera_count));
                    ui.label(format!("Radius: {:.3} m", s.radius));
                    ui.label(format!("Elevation: {:.1} deg", s.elevation_deg));
                    ui.label(format!(
                        "Spacing: {:.1} deg ({:.3} m)",
                        s.angular_spacing_deg, s.neighbour_spacing
                    ));
                    ui.label(format!("Head clearance: {:.3} m", s.head_clearance));
                    ui.separator();

                    ui.heading("Cameras");
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        for info in &self.cameras {
                            ui.monospace(format!(
                                "[{:02}] {:6.1}° ({:+.3}, {:+.3}, {:+.3})",
                                info.index,
                                info.azimuth_deg,
                                info.position[0],
                                info.position[1],
                                info.position[2]
                            ));
                        }
                    });

                    ui.separator();
                    ui.small("F1: Panel | L: Labels | R: Reset | RMB: Orbit | Wheel: Zoom");
                });
        }

        self.draw_axis_labels(ctx, size_in_points);
    }

    /// Axis and camera labels, projected from rig space onto the viewport.
    fn draw_axis_labels(&self, ctx: &EguiContext, size: egui::Vec2) {
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Background,
            egui::Id::new("plot_labels"),
        ));
        let font = egui::FontId::proportional(14.0);
        let color = egui::Color32::from_gray(220);

        let (lo, c) = (self.bounds.min(), self.bounds.center);
        let pad = self.bounds.edge() * 0.12;
        let axis_anchors = [
            (Vec3::new(c.x, lo.y - pad, lo.z), &self.labels.x),
            (Vec3::new(lo.x - pad, c.y, lo.z), &self.labels.y),
            (Vec3::new(lo.x - pad, lo.y - pad, c.z), &self.labels.z),
        ];
        for (anchor, text) in axis_anchors {
            if let Some(p) = self.camera.project_to_screen(anchor, size.x, size.y) {
                painter.text(
                    egui::pos2(p.x, p.y),
                    egui::Align2::CENTER_CENTER,
                    text,
                    font.clone(),
                    color,
                );
            }
        }

        if !self.show_camera_labels {
            return;
        }
        let small = egui::FontId::monospace(11.0);
        for cam in self.rig.cameras() {
            // Push the label just outside the ring.
            let anchor = cam.position * 1.12;
            if let Some(p) = self.camera.project_to_screen(anchor, size.x, size.y) {
                painter.text(
                    egui::pos2(p.x, p.y),
                    egui::Align2::CENTER_CENTER,
                    cam.index.to_string(),
                    small.clone(),
                    egui::Color32::from_rgb(140, 190, 240),
                );
            }
        }
    }
}

/// Everything that exists once the window is up.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn init(
        event_loop: &ActiveEventLoop,
        state: &AppState,
        egui_ctx: &EguiContext,
    ) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(state.labels.title.clone())
            .with_inner_size(PhysicalSize::new(WINDOW_SIZE, WINDOW_SIZE));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("find adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("headrig_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(
            &device,
            surface_format,
            config.width,
            config.height,
            &state.rig,
            &state.bounds,
        );

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn frame(&mut self, state: &AppState, egui_ctx: &EguiContext) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer
            .render(&self.device, &self.queue, &view, &state.camera);

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| {
            let ppp = ctx.pixels_per_point();
            let size = egui::vec2(
                self.config.width as f32 / ppp,
                self.config.height as f32 / ppp,
            );
            state.draw_ui(ctx, size);
        });

        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

struct ViewerApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl ViewerApp {
    fn new(rig: Rig) -> Self {
        Self {
            state: AppState::new(rig),
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::init(event_loop, &self.state, &self.egui_ctx) {
            Ok(gpu) => {
                self.state.camera.aspect = gpu.aspect();
                gpu.window.request_redraw();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to initialise GPU: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
        if response.repaint {
            gpu.window.request_redraw();
        }
        if response.consumed {
            return;
        }
        // The scene is static; only input changes what is on screen.
        let is_redraw = matches!(event, WindowEvent::RedrawRequested);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gpu.resize(new_size.width, new_size.height);
                self.state.camera.aspect = gpu.aspect();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if self.state.handle_key(key) {
                    event_loop.exit();
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state: btn_state,
                ..
            } => {
                self.state.mouse_captured = btn_state == ElementState::Pressed;
                gpu.window.set_cursor_visible(!self.state.mouse_captured);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_SCROLL_STEP,
                };
                self.state.camera.zoom(steps);
            }
            WindowEvent::RedrawRequested => {
                gpu.frame(&self.state, &self.egui_ctx);
            }
            _ => {}
        }
        if !is_redraw {
            gpu.window.request_redraw();
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.mouse_captured {
                self.state.camera.rotate(delta.0 as f32, delta.1 as f32);
                if let Some(gpu) = &self.gpu {
                    gpu.window.request_redraw();
                }
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let overrides = ConfigOverrides {
        camera_count: cli.cameras,
        radius: cli.radius,
        elevation_deg: cli.elevation,
    };
    let config = RigConfig::resolve(cli.config.as_deref(), overrides)?;
    let rig = Rig::build(config)?;
    tracing::info!(
        cameras = rig.camera_count(),
        radius = config.radius,
        elevation_deg = config.elevation_deg,
        "headrig-viewer starting"
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = ViewerApp::new(rig);
    event_loop.run_app(&mut app)?;

    Ok(())
}
