mod game;

use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use game::{Click, GameApp};
use gallery_kernel::{GameConfig, GameSession};
use gallery_render_wgpu::{FpsCamera, WgpuRenderer};
use gallery_report::{HttpScoreReporter, RecordingSink, ScoreSink};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "gallery-desktop", about = "First-person shooting gallery")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Score server base URL
    #[arg(long, env = "GALLERY_SERVER_URL", default_value = "http://127.0.0.1:5000")]
    server_url: String,

    /// Seed for target placement (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,

    /// Keep scores in memory instead of posting them
    #[arg(long)]
    offline: bool,
}

/// Everything that exists only once a window is up.
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
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Shooting Gallery")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow::anyhow!("no compatible GPU adapter"))?;
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("gallery_device"),
                ..Default::default()
            },
            None,
        ))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let size = window.inner_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, format, config.width, config.height);
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend, {}x{}",
            adapter.get_info().backend.to_str(),
            config.width,
            config.height
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

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    /// Locked: cursor grabbed and hidden. Falls back to confinement where the
    /// platform cannot lock the pointer in place.
    fn grab_cursor(&self, locked: bool) {
        let grab = if locked {
            self.window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined))
        } else {
            self.window.set_cursor_grab(CursorGrabMode::None)
        };
        if let Err(e) = grab {
            tracing::warn!("cursor grab change failed: {e}");
        }
        self.window.set_cursor_visible(!locked);
    }

    fn draw(&mut self, game: &mut GameApp, camera: &FpsCamera, egui_ctx: &EguiContext) {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.render(
            &self.device,
            &self.queue,
            &view,
            camera,
            game.session.targets(),
        );
        self.draw_overlay(&view, game, egui_ctx);

        frame.present();
    }

    /// HUD, crosshair, and the round-over dialog on top of the scene.
    fn draw_overlay(&mut self, view: &wgpu::TextureView, game: &mut GameApp, egui_ctx: &EguiContext) {
        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let output = egui_ctx.run(raw_input, |ctx| game.draw_ui(ctx));
        self.egui_winit
            .handle_platform_output(&self.window, output.platform_output);

        let jobs = egui_ctx.tessellate(output.shapes, output.pixels_per_point);
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: output.pixels_per_point,
        };
        for (id, delta) in &output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, delta);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("overlay_encoder"),
            });
        self.egui_renderer
            .update_buffers(&self.device, &self.queue, &mut encoder, &jobs, &screen);
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("overlay_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer.render(&mut pass, &jobs, &screen);
        }
        self.queue.submit(std::iter::once(encoder.finish()));

        for id in &output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

struct GpuApp {
    game: GameApp,
    camera: FpsCamera,
    egui_ctx: EguiContext,
    gpu: Option<Gpu>,
}

impl GpuApp {
    fn new(game: GameApp) -> Self {
        Self {
            game,
            camera: FpsCamera::default(),
            egui_ctx: EguiContext::default(),
            gpu: None,
        }
    }

    fn lock_view(&mut self) {
        if let Some(gpu) = &self.gpu {
            gpu.grab_cursor(true);
        }
        if !self.game.lock_acquired() {
            self.unlock_view();
        }
    }

    fn unlock_view(&mut self) {
        if let Some(gpu) = &self.gpu {
            gpu.grab_cursor(false);
        }
        self.game.lock_lost();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx) {
            Ok(gpu) => {
                self.camera.set_viewport(gpu.config.width, gpu.config.height);
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to initialize graphics: {e:#}");
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
        // While the view is locked every click is a shot, so egui only sees
        // input when the cursor is free.
        if !self.game.is_locked() {
            if let Some(gpu) = &mut self.gpu {
                if gpu.egui_winit.on_window_event(&gpu.window, &event).consumed {
                    return;
                }
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size.width, size.height);
                    self.camera.set_viewport(gpu.config.width, gpu.config.height);
                }
            }
            WindowEvent::Focused(false) => {
                self.game.input.clear();
                if self.game.is_locked() {
                    self.unlock_view();
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if self.game.key(key, state == ElementState::Pressed) {
                    self.unlock_view();
                }
            }
            WindowEvent::MouseInput {
                button,
                state: ElementState::Pressed,
                ..
            } => match self.game.button(button) {
                Some(Click::RequestLock) => self.lock_view(),
                Some(Click::Fired(None)) => tracing::trace!("shot missed"),
                Some(Click::Fired(Some(_)) | Click::Ignored) | None => {}
            },
            WindowEvent::RedrawRequested => {
                self.game.frame(Instant::now());
                self.camera.follow(self.game.session.player());
                if let Some(gpu) = &mut self.gpu {
                    gpu.draw(&mut self.game, &self.camera, &self.egui_ctx);
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.game.mouse_motion(dx, dy);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(summary) = self.game.poll_timer(Instant::now()) {
            tracing::info!("round finished: {} points from {} hits", summary.score, summary.hits);
            self.unlock_view();
        }
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn default_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let seed = cli.seed.unwrap_or_else(default_seed);
    tracing::info!("gallery-desktop starting (seed {seed})");

    let reporter: Box<dyn ScoreSink> = if cli.offline {
        Box::new(RecordingSink::new())
    } else {
        tracing::info!("scores go to {}", cli.server_url);
        Box::new(HttpScoreReporter::new(&cli.server_url))
    };

    let session = GameSession::new(GameConfig::default(), seed)?;
    let game = GameApp::new(session, reporter, Instant::now());

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(game);
    event_loop.run_app(&mut app)?;

    Ok(())
}
