/// meshview - Terminal OBJ viewer
///
/// Loads a triangulated OBJ mesh and renders it with directional lighting.
/// Controls:
///   - A/D or Left/Right: Rotate about the vertical axis
///   - W/S or Up/Down: Tilt about the depth axis
///   - Z/E: Zoom in/out
///   - Q/ESC: Quit
use clap::Parser;
use log::error;
use meshview_terminal::Config;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "meshview", version, about = "Interactive terminal viewer for OBJ meshes")]
struct Cli {
    /// OBJ file to display (overrides `mesh` in the config file)
    mesh: Option<PathBuf>,

    /// Path to the TOML config file
    #[arg(long, default_value = "meshview.toml")]
    config: PathBuf,

    /// Draw polygon outlines over the shaded surface
    #[arg(long)]
    outline: bool,

    /// Write log output to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Where log records go, and the filter used when `RUST_LOG` is unset
struct LogSink {
    file: Option<File>,
    default_filter: &'static str,
}

impl LogSink {
    /// Stderr shares the screen with the ASCII frame, so it stays at `warn`
    /// unless the log file actually opened
    fn open(log_file: Option<&Path>) -> (Self, Option<io::Error>) {
        let (file, open_error) = match log_file.map(File::create).transpose() {
            Ok(file) => (file, None),
            Err(e) => (None, Some(e)),
        };
        let default_filter = if file.is_some() { "info" } else { "warn" };
        (
            Self {
                file,
                default_filter,
            },
            open_error,
        )
    }
}

fn init_logging(log_file: Option<&Path>) {
    use env_logger::{Builder, Env, Target};

    let (sink, open_error) = LogSink::open(log_file);
    let mut builder = Builder::from_env(Env::default().default_filter_or(sink.default_filter));
    if let Some(file) = sink.file {
        builder.target(Target::Pipe(Box::new(file)));
    }
    builder.init();

    if let (Some(path), Some(e)) = (log_file, open_error) {
        error!("Failed to open log file {}: {}", path.display(), e);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = Config::load_or_default(&cli.config);
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.as_ref().ok().and_then(|c| c.log_file.clone()));
    init_logging(log_file.as_deref());

    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("meshview: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(mesh) = cli.mesh {
        config.mesh = mesh;
    }
    config.outline |= cli.outline;

    match meshview_terminal::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("meshview: {}", e);
            ExitCode::FAILURE
        }
    }
}
