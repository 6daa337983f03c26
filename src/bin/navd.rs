//! navd - depth navigation daemon
//!
//! This daemon:
//! 1. Loads settings (file named by NAV_CONFIG, then NAV_* overrides)
//! 2. Captures depth frames on a dedicated thread into a latest-frame slot
//! 3. Evaluates the newest frame once per tick, optionally smoothed
//! 4. Dispatches each command to the motion sink
//! 5. Logs source health every few seconds
//! 6. Stops when the capture thread exits, surfacing its error

use anyhow::{anyhow, Result};
use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use depth_navigator::{
    open_source, spawn_capture, DepthFrame, DepthSource, LatestFrame, LogSink, MotionSink,
    NavdConfig, NavigationCommand, NavigationEngine, Narrator, NullDetector, RandomTurns,
    ScoreNarrator, ScoreSmoother, SmoothedNavigator, TurnSource,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Stop after this many decisions (default: run until Ctrl-C).
    #[arg(long)]
    cycles: Option<u64>,
    /// Seed for exploratory turns (default: from entropy).
    #[arg(long, env = "NAV_SEED")]
    seed: Option<u64>,
}

enum Navigator {
    Direct(NavigationEngine),
    Smoothed(SmoothedNavigator),
}

impl Navigator {
    fn new(engine: NavigationEngine, alpha: f32) -> Result<Self> {
        if alpha < 1.0 {
            log::info!("score smoothing enabled (alpha={:.2})", alpha);
            Ok(Navigator::Smoothed(SmoothedNavigator::new(
                engine,
                ScoreSmoother::new(alpha)?,
            )))
        } else {
            Ok(Navigator::Direct(engine))
        }
    }

    fn evaluate(&mut self, frame: &DepthFrame, turns: &mut dyn TurnSource) -> NavigationCommand {
        match self {
            Navigator::Direct(engine) => engine.evaluate(frame, turns),
            Navigator::Smoothed(navigator) => navigator.evaluate(frame, turns),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = NavdConfig::load()?;

    let engine = NavigationEngine::new(cfg.navigation.clone())?;
    let mut navigator = Navigator::new(engine, cfg.smoothing_alpha)?;
    let mut turns = match args.seed {
        Some(seed) => RandomTurns::seeded(seed),
        None => RandomTurns::from_entropy(),
    };
    let mut sink = LogSink::new();
    let narrator = ScoreNarrator;

    let mut source = open_source(&cfg.source.url, cfg.source.width, cfg.source.height)?;
    source.connect()?;

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
        })
        .map_err(|e| anyhow!("error setting Ctrl-C handler: {}", e))?;
    }

    let tick = Duration::from_secs_f64(1.0 / f64::from(cfg.source.target_fps));
    let latest = LatestFrame::new();
    let capture = spawn_capture(
        source,
        Box::new(NullDetector::new()),
        latest.clone(),
        running.clone(),
        tick,
    )?;

    log::info!(
        "navd running. source={} fps={} frame={}x{}",
        cfg.source.url,
        cfg.source.target_fps,
        cfg.source.width,
        cfg.source.height
    );

    let mut decisions = 0u64;
    while running.load(Ordering::SeqCst) {
        if capture.is_finished() {
            log::error!("capture thread exited, stopping");
            break;
        }
        match latest.take()? {
            Some(frame) => {
                let command = navigator.evaluate(&frame, &mut turns);
                log::debug!("{}", narrator.describe(&command));
                if let Err(e) = sink.dispatch(&command) {
                    log::error!("command dispatch failed: {}", e);
                }
                decisions += 1;
                if args.cycles.is_some_and(|limit| decisions >= limit) {
                    log::info!("reached {} decisions, stopping", decisions);
                    break;
                }
            }
            None => log::debug!("no fresh depth frame this tick"),
        }
        thread::sleep(tick);
    }

    running.store(false, Ordering::SeqCst);
    let stats = capture
        .join()
        .map_err(|_| anyhow!("capture thread panicked"))??;
    log::info!(
        "navd stopped after {} decisions ({} frames captured from {})",
        decisions,
        stats.frames_captured,
        stats.url
    );
    Ok(())
}
