//! nav_demo - run synthetic depth scenes through the navigation engine

use anyhow::{anyhow, Result};
use clap::Parser;
use std::collections::BTreeMap;

use depth_navigator::ingest::Scene;
use depth_navigator::ui::{Console, UiMode};
use depth_navigator::{
    DepthSource, NavigationCommand, NavigationConfig, NavigationEngine, Narrator, RandomTurns,
    ScoreNarrator, SyntheticDepthSource, TieBreak,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Scene to run (repeatable). Defaults to every built-in scene.
    #[arg(long = "scene")]
    scenes: Vec<String>,
    /// Seed for exploratory turns.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Print each command as a JSON line.
    #[arg(long)]
    json: bool,
    /// Console output: auto, plain or pretty.
    #[arg(long, default_value = "auto")]
    ui: String,
    /// Side chosen on an exact left/right tie.
    #[arg(long, default_value = "right")]
    tie_break: String,
    #[arg(long, default_value_t = 640)]
    width: u32,
    #[arg(long, default_value_t = 400)]
    height: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    if args.width == 0 || args.height == 0 {
        return Err(anyhow!("width and height must be >= 1"));
    }
    let console = Console::stderr(args.ui.parse::<UiMode>()?);
    let scenes = if args.scenes.is_empty() {
        Scene::ALL.to_vec()
    } else {
        args.scenes
            .iter()
            .map(|name| name.parse::<Scene>())
            .collect::<Result<Vec<Scene>>>()?
    };

    let config = NavigationConfig {
        tie_break: args.tie_break.parse::<TieBreak>()?,
        ..NavigationConfig::default()
    };
    let engine = NavigationEngine::new(config)?;
    let mut turns = RandomTurns::seeded(args.seed);
    let narrator = ScoreNarrator;

    for scene in scenes {
        let stage = console.stage(&format!("scene {}", scene));
        let mut source = SyntheticDepthSource::new(scene, args.width, args.height);
        source.connect()?;

        let frames = if scene == Scene::Cycle { 100 } else { 1 };
        let mut tally: BTreeMap<&'static str, u32> = BTreeMap::new();
        let mut last: Option<NavigationCommand> = None;
        for _ in 0..frames {
            let frame = source.next_frame()?;
            let command = engine.evaluate(&frame, &mut turns);
            *tally.entry(command.action.as_str()).or_default() += 1;
            if args.json {
                println!("{}", serde_json::to_string(&command)?);
            }
            last = Some(command);
        }

        let Some(command) = last else {
            continue;
        };
        if frames == 1 {
            if !args.json {
                println!(
                    "{:<15} {:<8} {:.2}m  {}",
                    scene,
                    command.action,
                    command.distance,
                    command.reasoning
                );
                println!("{:<15} {}", "", narrator.describe(&command));
            }
            stage.finish_with(format!("{} {:.2}m", command.action, command.distance));
        } else {
            let summary = tally
                .iter()
                .map(|(action, count)| format!("{}={}", action, count))
                .collect::<Vec<_>>()
                .join(" ");
            if !args.json {
                println!("{:<15} {} frames: {}", scene, frames, summary);
            }
            stage.finish_with(summary);
        }
    }

    Ok(())
}
