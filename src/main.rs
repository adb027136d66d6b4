use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowId};

use gridcaster::config::CONFIG_ENV;
use gridcaster::input::{AppCommand, InputQueue, KeyBindings};
use gridcaster::renderer::{self, Canvas, MapView};
use gridcaster::scaler::{ScaleLut, blit_nearest_stretch, build_scale_lut};
use gridcaster::{Config, Frame, Grid, Viewpoint};

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    config: Config,
    grid: Grid,
    viewpoint: Viewpoint,
    rng: StdRng,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,
    show_map: bool,

    // Internal buffer at the configured screen size, one column per ray
    fb: Vec<u32>,
    fb_w: usize,
    fb_h: usize,

    scale_lut: ScaleLut,

    // Input
    bindings: KeyBindings,
    input: InputQueue,

    failure: Option<anyhow::Error>,
}

impl App {
    fn new(config: Config) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut grid = Grid::new(config.grid_size)?;
        grid.randomize_with(&mut rng, config.wall_probability);
        tracing::info!(
            "Generated {}x{} grid with {} walls",
            grid.size(),
            grid.size(),
            grid.wall_count()
        );

        let [x, y, angle] = config.start_pose();
        let fb_w = config.screen_width as usize;
        let fb_h = config.screen_height as usize;

        Ok(Self {
            window: None,
            surface: None,
            grid,
            viewpoint: Viewpoint::new(x, y, angle),
            rng,

            frame_counter: 0,
            last_fps_print: Instant::now(),
            show_map: true,

            fb: vec![0; fb_w * fb_h],
            fb_w,
            fb_h,

            scale_lut: ScaleLut::empty(),

            bindings: KeyBindings::from_config(&config),
            input: InputQueue::default(),
            config,

            failure: None,
        })
    }

    fn init_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title("gridcaster")
            .with_inner_size(LogicalSize::new(self.fb_w as f64, self.fb_h as f64));

        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .context("failed to create window")?,
        );
        // SoftBufferError is not Send + Sync, so it is flattened into the message
        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| anyhow!("failed to create softbuffer context: {e}"))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| anyhow!("failed to create softbuffer surface: {e}"))?;

        let size = window.inner_size();
        self.scale_lut =
            build_scale_lut(size.width as usize, size.height as usize, self.fb_w, self.fb_h);

        window.request_redraw();
        self.surface = Some(surface);
        self.window = Some(window);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.failure = Some(err);
        event_loop.exit();
    }

    fn tick(&mut self) {
        self.viewpoint.advance(self.input.drain());
    }

    fn command(&mut self, event_loop: &ActiveEventLoop, command: AppCommand) {
        match command {
            AppCommand::RegenerateGrid => {
                // Between frames: no cast is in flight here.
                self.grid
                    .randomize_with(&mut self.rng, self.config.wall_probability);
                tracing::info!("Regenerated grid, {} walls", self.grid.wall_count());
            }
            AppCommand::ToggleMap => {
                self.show_map = !self.show_map;
                tracing::debug!("Overhead map {}", if self.show_map { "on" } else { "off" });
            }
            AppCommand::Exit => event_loop.exit(),
        }
    }

    fn lock_pointer(&self) {
        let Some(window) = &self.window else {
            return;
        };
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        match grabbed {
            Ok(()) => window.set_cursor_visible(false),
            Err(e) => tracing::warn!("Pointer lock unavailable: {e}"),
        }
    }

    fn redraw(&mut self, id: WindowId) -> Result<()> {
        self.tick();

        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return Ok(()),
        };

        let size = window.inner_size();
        let (Some(dw), Some(dh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            tracing::debug!("Minimized window, skipping frame");
            return Ok(());
        };
        if self.scale_lut.dst_size() != (dw.get() as usize, dh.get() as usize) {
            tracing::warn!("Surface size changed without a resize event, rebuilding scale table");
            self.scale_lut = build_scale_lut(dw.get() as usize, dh.get() as usize, self.fb_w, self.fb_h);
        }

        surface
            .resize(dw, dh)
            .map_err(|e| anyhow!("failed to resize surface: {e}"))?;

        let frame = Frame::compute(&self.grid, &self.viewpoint, &self.config);
        let map = self.show_map.then(|| MapView {
            grid: &self.grid,
            viewpoint: &self.viewpoint,
            config: &self.config,
        });
        renderer::render_frame(
            &mut Canvas::new(&mut self.fb, self.fb_w, self.fb_h),
            &frame,
            map,
        );

        let mut buf = surface
            .buffer_mut()
            .map_err(|e| anyhow!("failed to map surface buffer: {e}"))?;
        blit_nearest_stretch(&mut buf, dw.get() as usize, &self.fb, &self.scale_lut);
        buf.present()
            .map_err(|e| anyhow!("failed to present frame: {e}"))?;

        // Print FPS
        self.frame_counter += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
        if elapsed >= 1.0 {
            tracing::info!("FPS: {:.1}", self.frame_counter as f32 / elapsed);
            self.frame_counter = 0;
            self.last_fps_print = now;
        }

        window.request_redraw();
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init_surface(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(control) = self.bindings.control(code, state) {
                    self.input.push(control);
                }
                if let Some(command) = self.bindings.command(code, state) {
                    self.command(event_loop, command);
                }
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.lock_pointer(),

            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw(id) {
                    self.fail(event_loop, err);
                }
            }

            WindowEvent::Resized(new_size) => {
                self.scale_lut = build_scale_lut(
                    new_size.width as usize,
                    new_size.height as usize,
                    self.fb_w,
                    self.fb_h,
                );
            }
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, _) } = event {
            self.input.push(self.bindings.pointer(dx));
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// First CLI argument, then `GRIDCASTER_CONFIG`, then built-in defaults.
fn load_config() -> Result<Config> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    match path {
        Some(path) => {
            tracing::info!("Loading config from {}", path.display());
            Ok(Config::load(&path)?)
        }
        None => {
            tracing::info!("No config given, using defaults");
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config()?;
    let mut app = App::new(config)?;

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    // Redraws are requested continuously, one tick per frame.
    event_loop.set_control_flow(ControlFlow::Wait);
    event_loop.run_app(&mut app).context("event loop failed")?;

    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
