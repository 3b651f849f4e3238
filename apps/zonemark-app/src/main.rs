use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};

use zonemark_app::{check_result_json, load_config, open_snapshot, replay, AppError, GestureScript};
use zonemark_check::{has_errors, Severity};
use zonemark_core::CanvasSize;

#[derive(Parser)]
#[command(name = "zonemark", version, about = "Line and zone annotation over camera snapshots")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a gesture script and print the emitted geometry as JSON
    Replay {
        script: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Load this camera's snapshot as the backdrop
        #[arg(long)]
        camera: Option<String>,
        #[arg(long)]
        snapshot_dir: Option<PathBuf>,
        /// Write every rendered frame to this file
        #[arg(long)]
        frames: Option<PathBuf>,
    },
    /// Validate a confirmed line or zone result
    Check {
        result: PathBuf,
        #[arg(long)]
        require_entrance: bool,
        #[arg(long, default_value_t = 640.0)]
        width: f64,
        #[arg(long, default_value_t = 480.0)]
        height: f64,
    },
    /// Fetch a camera snapshot and save it as an image
    Snapshot {
        #[arg(long)]
        camera: String,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        snapshot_dir: Option<PathBuf>,
    },
}

fn read_file(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), AppError> {
    std::fs::write(path, contents).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn run_replay(
    script: &Path,
    config: Option<&Path>,
    camera: Option<String>,
    snapshot_dir: Option<PathBuf>,
    frames: Option<&Path>,
) -> Result<ExitCode, AppError> {
    let config = load_config(config, snapshot_dir)?;
    let script = GestureScript::load(script)?;
    let loader = camera.map(|camera| open_snapshot(&config, &camera));

    let output = replay(&script, &config, loader, frames.is_some())?;
    if let Some(message) = &output.snapshot_error {
        eprintln!("warning: {}", message);
    }
    if let Some(path) = frames {
        write_file(path, &serde_json::to_string_pretty(&output.frames)?)?;
        eprintln!("Wrote {} frame(s) to {}", output.frames.len(), path.display());
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(ExitCode::SUCCESS)
}

fn run_check(
    result: &Path,
    require_entrance: bool,
    canvas: CanvasSize,
) -> Result<ExitCode, AppError> {
    let json = read_file(result)?;
    let violations =
        check_result_json(&json, canvas, require_entrance).map_err(|source| AppError::Json {
            path: result.to_path_buf(),
            source,
        })?;

    if violations.is_empty() {
        println!("OK: no violations");
        return Ok(ExitCode::SUCCESS);
    }
    for v in &violations {
        let level = match v.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        println!("{}: {:?}: {}", level, v.violation_type, v.message);
    }
    if has_errors(&violations) {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn run_snapshot(
    camera: &str,
    out: &Path,
    config: Option<&Path>,
    snapshot_dir: Option<PathBuf>,
) -> Result<ExitCode, AppError> {
    let config = load_config(config, snapshot_dir)?;
    let mut loader = open_snapshot(&config, camera);
    loader.request();
    if !loader.wait(config.request_timeout() + Duration::from_secs(1)) {
        return Err(AppError::Snapshot("Timed out waiting for snapshot".to_string()));
    }
    if let Some(message) = loader.error_message() {
        return Err(AppError::Snapshot(message.to_string()));
    }
    let Some(decoded) = loader.decoded() else {
        return Err(AppError::Snapshot("Snapshot was not retained".to_string()));
    };

    decoded
        .pixels
        .save_with_format(out, image::ImageFormat::Png)
        .map_err(|e| AppError::ImageWrite {
            path: out.to_path_buf(),
            message: e.to_string(),
        })?;
    println!(
        "Saved {}x{} snapshot of {} to {}",
        decoded.width(),
        decoded.height(),
        camera,
        out.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Replay {
            script,
            config,
            camera,
            snapshot_dir,
            frames,
        } => run_replay(
            &script,
            config.as_deref(),
            camera,
            snapshot_dir,
            frames.as_deref(),
        ),
        Commands::Check {
            result,
            require_entrance,
            width,
            height,
        } => run_check(&result, require_entrance, CanvasSize::new(width, height)),
        Commands::Snapshot {
            camera,
            out,
            config,
            snapshot_dir,
        } => run_snapshot(&camera, &out, config.as_deref(), snapshot_dir),
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
