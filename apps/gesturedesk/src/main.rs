use std::{future::Future, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use gesture_core::{process_frame_pair, InjectionPort, ViewportController};
use injection::{GuardedPort, RecordingPort, XdotoolPort};
use shared::domain::{Dimensions, FramePair};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod frames;

use config::{load_settings, Settings};
use frames::FrameSource;

#[derive(Parser, Debug)]
#[command(about = "Drive a four-quadrant desktop layout from hand-tracking frames")]
struct Args {
    /// Settings file; defaults to ./gesturedesk.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Newline-delimited JSON frames; stdin when omitted.
    #[arg(long)]
    frames: Option<PathBuf>,
    /// Window to drive: `select`, `display`, or an X11 window id. Overrides
    /// the settings file.
    #[arg(long)]
    window: Option<String>,
    /// Record injections in memory instead of driving the display.
    #[arg(long)]
    dry_run: bool,
    #[arg(long, default_value_t = 1920.0)]
    width: f64,
    #[arg(long, default_value_t = 1080.0)]
    height: f64,
    /// Used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(window) = args.window {
        settings.window = Some(window);
    }
    let frames = FrameSource::open(args.frames.as_deref()).await?;

    if args.dry_run {
        let port = RecordingPort::new(Dimensions::new(args.width, args.height));
        info!(width = args.width, height = args.height, "dry run");
        let port = run(GuardedPort::new(port), &settings, frames).await?;
        let calls = port.inner().calls().await;
        info!(injections = calls.len(), "dry run finished");
        return Ok(());
    }

    let target = settings.window_target()?;
    let port = XdotoolPort::connect(settings.xdotool_program.clone(), target)
        .await
        .context("cannot query target surface geometry")?;
    run(GuardedPort::new(port), &settings, frames).await?;
    Ok(())
}

/// Feeds frame pairs to the controller until input ends or Ctrl-C, then
/// lets pending drags finish and releases anything still held.
async fn run<P: InjectionPort + 'static>(
    port: GuardedPort<P>,
    settings: &Settings,
    mut frames: FrameSource,
) -> Result<Arc<GuardedPort<P>>> {
    let port = Arc::new(port);
    let dyn_port: Arc<dyn InjectionPort> = port.clone();
    let mut controller = ViewportController::new(dyn_port, settings.tuning()?, &settings.layout()?)
        .await
        .context("failed to initialise viewport controller")?;
    info!(viewport = %controller.current_viewport(), "ready for frames");

    let interrupt = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    let outcome = dispatch_frames(&mut controller, &mut frames, interrupt).await;
    let dispatched = *outcome.as_ref().unwrap_or(&0);

    controller.settle().await;
    let released = port.release_all().await;
    info!(dispatched, released, "stopped");
    if let Err(error) = &outcome {
        error!(%error, "frame input failed");
    }
    outcome.map(|_| port)
}

/// Dispatches frame pairs until input ends or `shutdown` resolves. The
/// shutdown future lives across iterations, so a signal that arrives while
/// a pair is being dispatched still stops the loop at the next frame.
/// Returns how many gestures fired.
async fn dispatch_frames(
    controller: &mut ViewportController,
    frames: &mut FrameSource,
    shutdown: impl Future<Output = ()>,
) -> Result<usize> {
    tokio::pin!(shutdown);

    let mut dispatched = 0usize;
    loop {
        let next = tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("interrupted");
                return Ok(dispatched);
            }
            next = frames.next_pair() => next?,
        };
        let Some((previous, current)) = next else {
            return Ok(dispatched);
        };

        match process_frame_pair(controller, FramePair::new(&previous, &current)).await {
            Ok(Some(kind)) => {
                dispatched += 1;
                debug!(gesture = kind.as_str(), frame = ?current.id, "gesture dispatched");
            }
            Ok(None) => {}
            Err(error) => warn!(%error, frame = ?current.id, "gesture dispatch failed"),
        }
    }
}
