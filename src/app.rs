//! Application shell and event loop.
//!
//! [`run`] owns the winit event loop: it creates the window, initializes the
//! GPU [`Context`] and [`GraphicsEngine`], and then drives the frame cycle on
//! every redraw. Exit requests (window close or Escape) are latched and
//! polled at the next frame boundary, so a frame that already started always
//! completes. Resizes are coalesced through a [`FrameSlot`] and applied at
//! the same boundary.

use std::sync::Arc;

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    context::Context,
    engine::{AssetBundle, GraphicsEngine},
    resources::texture::Texture,
    scene::Scene,
    slot::FrameSlot,
};

/// Frames between frame-rate log lines.
const FPS_LOG_INTERVAL: u32 = 10;

/// GPU context and engine, live from window creation until exit.
#[derive(Debug)]
struct AppState {
    ctx: Context,
    engine: GraphicsEngine,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, assets: AssetBundle) -> Self {
        let ctx = match Context::new(window).await {
            Ok(ctx) => ctx,
            Err(e) => panic!(
                "App initialization failed. Cannot create the main context: {}",
                e
            ),
        };
        let engine = match GraphicsEngine::new(&ctx, assets).await {
            Ok(engine) => engine,
            Err(e) => panic!(
                "App initialization failed. Cannot create the graphics engine: {}",
                e
            ),
        };
        Self {
            ctx,
            engine,
            is_surface_configured: false,
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
            if let Err(e) = self.engine.write_projection(&self.ctx.projection) {
                log::error!("Unable to update the projection: {}", e);
            }
        }
    }
}

pub struct App {
    scene: Scene,
    assets: Option<AssetBundle>,
    state: Option<AppState>,
    exit_requested: bool,
    pending_resize: FrameSlot<(u32, u32)>,
    last_time: Instant,
    frame_count: u32,
    fps_window_start: Instant,
}

impl App {
    fn new(scene: Scene, assets: AssetBundle) -> Self {
        Self {
            scene,
            assets: Some(assets),
            state: None,
            exit_requested: false,
            pending_resize: FrameSlot::new(),
            last_time: Instant::now(),
            frame_count: 0,
            fps_window_start: Instant::now(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window_attributes = Window::default_attributes().with_title("parallax");
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => panic!("App initialization failed. Cannot create a window: {}", e),
        };
        let Some(assets) = self.assets.take() else {
            return;
        };
        let mut state = pollster::block_on(AppState::new(window, assets));
        let size = state.ctx.window.inner_size();
        state.resize(size.width, size.height);
        state.ctx.window.request_redraw();
        self.state = Some(state);
        self.last_time = Instant::now();
        self.fps_window_start = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => self.exit_requested = true,
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.exit_requested = true,
            WindowEvent::Resized(size) => {
                // Coalesced; only the most recent size matters at the frame
                // boundary.
                self.pending_resize.put((size.width, size.height));
            }
            WindowEvent::RedrawRequested => {
                if self.exit_requested {
                    event_loop.exit();
                    return;
                }
                if let Some((width, height)) = self.pending_resize.take() {
                    state.resize(width, height);
                }

                state.ctx.window.request_redraw();
                if !state.is_surface_configured {
                    return;
                }

                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                self.scene.update(dt.as_secs_f32());

                match state
                    .engine
                    .render(&state.ctx, self.scene.rig(), self.scene.entities())
                {
                    Ok(()) => {
                        self.frame_count += 1;
                        if self.frame_count >= FPS_LOG_INTERVAL {
                            let elapsed = self.fps_window_start.elapsed().as_secs_f32();
                            if elapsed > 0.0 {
                                log::info!("fps: {:.1}", self.frame_count as f32 / elapsed);
                            }
                            self.frame_count = 0;
                            self.fps_window_start = Instant::now();
                        }
                    }
                    // Reconfigure the surface if it's lost or outdated
                    Err(crate::error::EngineError::Surface(
                        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated,
                    )) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.take() {
            state.engine.destroy();
        }
    }
}

/// Run the scene until the window is closed or Escape is pressed.
pub fn run(scene: Scene, assets: AssetBundle) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(scene, assets);
    event_loop.run_app(&mut app)?;

    Ok(())
}
