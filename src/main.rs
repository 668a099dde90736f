//! Gesture Media Control
//!
//! Watches a webcam for hand gestures and turns them into media keys.

use gesture_media_control::app::cli::{Cli, Commands, ConfigAction};
use gesture_media_control::app::config::Config;
use gesture_media_control::capture::{DetectorProcess, ReplaySource};
use gesture_media_control::sink::{platform_sink, InputEventSink, LogOnlySink};
use gesture_media_control::time::Timebase;
use gesture_media_control::workflow::{run_live, run_replay, LiveOptions, SessionEnd};
use gesture_media_control::{Dispatcher, GestureClassifier, GesturePipeline, SessionStats};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so we can use --verbose to set log level
    let cli = Cli::parse_args();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    Timebase::init();

    match cli.command {
        Commands::Run {
            camera,
            detector,
            dry_run,
        } => {
            let config = load_config(cli.config.as_ref())?;
            run_camera(camera, detector, dry_run, &config)?;
        }
        Commands::Replay { input, dry_run } => {
            let config = load_config(cli.config.as_ref())?;
            run_recorded(&input, dry_run, &config)?;
        }
        Commands::Config { action } => {
            run_config(action, cli.config)?;
        }
    }

    Ok(())
}

/// An explicit path must exist; the default path falls back to defaults.
fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    Ok(config)
}

fn select_sink(dry_run: bool) -> Box<dyn InputEventSink> {
    let sink: Box<dyn InputEventSink> = if dry_run {
        Box::new(LogOnlySink::new())
    } else {
        platform_sink()
    };
    info!("Sending actions to {} sink", sink.name());
    sink
}

fn build_pipeline(dry_run: bool, config: &Config) -> GesturePipeline {
    let dispatcher = Dispatcher::with_cooldown(select_sink(dry_run), config.cooldown());
    GesturePipeline::new(GestureClassifier::new(config.gesture), dispatcher)
}

fn install_stop_flag() -> anyhow::Result<Arc<AtomicBool>> {
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_handler = stop_flag.clone();

    ctrlc::set_handler(move || {
        stop_flag_handler.store(true, std::sync::atomic::Ordering::SeqCst);
    })?;

    Ok(stop_flag)
}

fn run_camera(
    camera: Option<u32>,
    detector: Option<String>,
    dry_run: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let mut command = config.detector_command();
    if let Some(index) = camera {
        command.camera_index = index;
    }
    if let Some(program) = detector {
        command.program = program;
        command.args.clear();
    }

    // Camera failures end the process before the loop starts
    let source = match DetectorProcess::spawn(&command) {
        Ok(source) => source,
        Err(e) => {
            error!("{}", e);
            eprintln!("Could not open camera {}. Check that it is connected and not in use.", command.camera_index);
            std::process::exit(1);
        }
    };

    let mut pipeline = build_pipeline(dry_run, config);
    let stop_flag = install_stop_flag()?;

    println!("Gesture music control started. Press Ctrl+C or ESC in the camera window to quit.");

    let options = LiveOptions {
        ring_buffer_size: config.capture.ring_buffer_size,
        ..LiveOptions::default()
    };
    let end = run_live(Box::new(source), &mut pipeline, &stop_flag, options)?;

    finish(end, pipeline.into_stats(), true);
    Ok(())
}

fn run_recorded(input: &std::path::Path, dry_run: bool, config: &Config) -> anyhow::Result<()> {
    let mut source = match ReplaySource::open(input) {
        Ok(source) => source,
        Err(e) => {
            error!("{}", e);
            eprintln!("Could not open recording {}", input.display());
            std::process::exit(1);
        }
    };

    let mut pipeline = build_pipeline(dry_run, config);
    let stop_flag = install_stop_flag()?;

    let end = run_replay(
        &mut source,
        &mut pipeline,
        &stop_flag,
        config.replay_frame_interval(),
    )?;

    finish(end, pipeline.into_stats(), false);
    Ok(())
}

fn finish(end: SessionEnd, stats: SessionStats, live: bool) {
    if let Some(notice) = end.read_failure_notice(live) {
        println!("{}", notice);
    }
    stats.log_summary();
    println!(
        "Gesture control stopped: {} ({} actions fired)",
        end.describe(),
        stats.actions_fired()
    );
}

fn run_config(action: ConfigAction, path: Option<PathBuf>) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(path.as_ref())?;
            println!("{}", config.to_toml()?);
        }
        ConfigAction::Init { force } => {
            let config_path = path.unwrap_or_else(Config::default_path);
            if config_path.exists() && !force {
                anyhow::bail!(
                    "Config already exists at {:?}. Use --force to overwrite.",
                    config_path
                );
            }
            Config::default().save(&config_path)?;
            println!("Created config at {:?}", config_path);
        }
        ConfigAction::Path => {
            let config_path = path.unwrap_or_else(Config::default_path);
            println!("{}", config_path.display());
        }
    }

    Ok(())
}
