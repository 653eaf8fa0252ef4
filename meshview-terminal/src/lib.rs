/// Terminal front end: frame loop, input and ASCII rendering
use crossterm::{
    cursor,
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute, terminal,
};
use log::{debug, info, warn};
use meshview_core::{
    ControlSignal, FrameClock, Lighting, Mesh, MeshParser, OrbitController, ParseOptions,
    RenderPipeline,
};
use std::io::{self, stdout, Stdout};
use std::time::{Duration, Instant};

pub mod config;
pub mod error;
pub mod input;
pub mod renderer;

pub use config::Config;
pub use error::{AppError, ConfigError, RenderError};
pub use input::HeldKeys;
pub use renderer::{AsciiRenderer, TerminalPipeline};

const CONTROLS_HELP: &str = "A/D=Rotate W/S=Tilt Z/E=Zoom Q=Quit";

/// Load the configured mesh and run the viewer until the user exits
pub fn run(config: &Config) -> Result<(), AppError> {
    let mesh = MeshParser::new()
        .options(ParseOptions {
            collect_edges: config.outline,
        })
        .load(&config.mesh)?;
    if let Some((min, max)) = mesh.bounds() {
        debug!("Mesh bounds: {:?} .. {:?}", min, max);
    }

    let mut app = TerminalApp::new(mesh, config)?;
    app.run()
}

/// Raw mode and alternate screen for as long as the value lives
struct TerminalSession {
    enhanced_keyboard: bool,
}

impl TerminalSession {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        execute!(out, terminal::EnterAlternateScreen, cursor::Hide)?;

        let enhanced_keyboard = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced_keyboard {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        } else {
            warn!("Terminal does not report key releases; falling back to hold timeout");
        }
        Ok(Self { enhanced_keyboard })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let mut out = stdout();
        if self.enhanced_keyboard {
            let _ = execute!(out, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(out, terminal::LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

/// Main application struct for terminal mesh viewing
pub struct TerminalApp {
    mesh: Mesh,
    controller: OrbitController,
    lighting: Lighting,
    pipeline: TerminalPipeline<Stdout>,
    keys: HeldKeys,
    clock: FrameClock,
    target_frame_time: Duration,
    running: bool,
    last_fps_update: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, config: &Config) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        info!("Terminal size {}x{}", width, height);

        Ok(Self {
            mesh,
            controller: OrbitController::new(&config.camera),
            lighting: config.lighting.to_lighting(),
            pipeline: TerminalPipeline::new(stdout(), width as usize, height as usize),
            keys: HeldKeys::new(config.key_hold()),
            clock: FrameClock::new(),
            target_frame_time: config.frame_time(),
            running: true,
            last_fps_update: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> Result<(), AppError> {
        let session = TerminalSession::enter()?;
        self.keys.set_release_events(session.enhanced_keyboard);

        let result = self.main_loop();

        drop(session);
        result
    }

    fn main_loop(&mut self) -> Result<(), AppError> {
        while self.running {
            let frame_start = Instant::now();

            // Input
            self.drain_events(frame_start)?;
            let controls = self.keys.controls(frame_start);
            if controls.contains(ControlSignal::Exit) {
                info!("Exit requested");
                self.running = false;
                break;
            }

            // Update
            let delta = self.clock.tick(frame_start);
            self.controller.update(&controls, delta);

            // Render
            let uniforms = self.controller.frame_uniforms(self.lighting);
            let status = self.status_line();
            self.pipeline.set_status(status);
            self.pipeline.draw_frame(&self.mesh, &uniforms)?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_fps_update).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_update).as_secs_f32();
                debug!("FPS: {:.1}", self.fps);
                self.frame_count = 0;
                self.last_fps_update = now;
            }
        }

        Ok(())
    }

    fn drain_events(&mut self, now: Instant) -> io::Result<()> {
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => self.keys.handle(key, now),
                Event::Resize(width, height) => {
                    info!("Terminal resized to {}x{}", width, height);
                    self.pipeline.resize(width as usize, height as usize);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn status_line(&self) -> String {
        format!(
            "meshview | FPS: {:.1} | dist {:.2} | yaw {:.2} roll {:.2} | {}",
            self.fps,
            self.controller.distance(),
            self.controller.angles.vertical,
            self.controller.angles.depth,
            CONTROLS_HELP
        )
    }
}
