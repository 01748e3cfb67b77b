//! Gettysburg Engine - headless game driver
//!
//! Plays a scripted sequence of commands (or simply runs the clock, resolving
//! every battle as it comes up) and prints a summary of the final position.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use gettysburg_engine::combat::{CombatResult, DieFace, Resolution};
use gettysburg_engine::core::error::Result;
use gettysburg_engine::{
    ArmyId, Coordinate, Direction, Game, GameConfig, GameStatus, GameStep, ReinforcementSchedule,
    Unit, UnitKey,
};

/// Headless Gettysburg game driver
#[derive(Parser, Debug)]
#[command(name = "gettysburg")]
#[command(about = "Play the Gettysburg scenario from a command script and report the result")]
struct Args {
    /// Reinforcement schedule (TOML); defaults to the built-in order of battle
    #[arg(long)]
    schedule: Option<PathBuf>,

    /// Game configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Command script (TOML list of [[command]] tables)
    #[arg(long)]
    script: Option<PathBuf>,

    /// Seed for the combat die; overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Without a script: number of steps to run
    #[arg(long, default_value_t = 8)]
    steps: u32,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// One scripted action
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum Command {
    Move {
        army: ArmyId,
        leader: String,
        from: Coordinate,
        to: Coordinate,
    },
    Face {
        army: ArmyId,
        leader: String,
        facing: Direction,
    },
    EndStep,
    /// Resolve every outstanding battle
    Resolve,
}

#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default)]
    command: Vec<Command>,
}

#[derive(Serialize)]
struct UnitReport {
    leader: String,
    position: Coordinate,
    facing: Direction,
    combat_factor: u32,
}

#[derive(Serialize)]
struct BattleReport {
    turn: u32,
    step: GameStep,
    result: CombatResult,
    face: Option<DieFace>,
    attackers: Vec<String>,
    defenders: Vec<String>,
    lost: Vec<String>,
}

/// JSON output structure
#[derive(Serialize)]
struct Summary {
    turn: u32,
    step: GameStep,
    status: GameStatus,
    union: Vec<UnitReport>,
    confederate: Vec<UnitReport>,
    battles: Vec<BattleReport>,
    rejected: Vec<String>,
}

#[derive(Default)]
struct SessionLog {
    battles: Vec<BattleReport>,
    rejected: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gettysburg_engine=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    let schedule = match &args.schedule {
        Some(path) => ReinforcementSchedule::from_file(path)?,
        None => ReinforcementSchedule::gettysburg()?,
    };
    tracing::info!("Loaded {} scheduled arrivals", schedule.len());

    let mut game = Game::new(config, schedule)?;
    let mut log = SessionLog::default();

    match &args.script {
        Some(path) => run_script(&mut game, path, &mut log)?,
        None => run_clock(&mut game, args.steps, &mut log)?,
    }

    let summary = summarize(&game, log);
    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        "text" => print_text(&summary),
        _ => {
            eprintln!("Unknown format '{}', defaulting to json", args.format);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}

fn run_script(game: &mut Game, path: &Path, log: &mut SessionLog) -> Result<()> {
    let content = std::fs::read_to_string(path)?;
    let script: Script = toml::from_str(&content)?;
    tracing::info!("Running {} scripted commands", script.command.len());

    for command in script.command {
        if game.status().is_over() {
            break;
        }
        let outcome = match &command {
            Command::Move {
                army,
                leader,
                from,
                to,
            } => game.move_unit(&UnitKey::new(*army, leader.as_str()), *from, *to),
            Command::Face {
                army,
                leader,
                facing,
            } => game.set_unit_facing(&UnitKey::new(*army, leader.as_str()), *facing),
            Command::EndStep => game.end_step().map(|_| ()),
            Command::Resolve => resolve_all(game, log),
        };
        if let Err(e) = outcome {
            tracing::warn!("Rejected {:?}: {}", command, e);
            log.rejected.push(format!("{command:?}: {e}"));
        }
    }
    Ok(())
}

/// End steps one after another, fighting every battle that comes up
fn run_clock(game: &mut Game, steps: u32, log: &mut SessionLog) -> Result<()> {
    for _ in 0..steps {
        if game.status().is_over() {
            break;
        }
        if game.current_step().is_battle() {
            resolve_all(game, log)?;
        }
        game.end_step()?;
    }
    Ok(())
}

fn resolve_all(game: &mut Game, log: &mut SessionLog) -> Result<()> {
    while let Some(battle) = game.battles_to_resolve() {
        let resolution = game.resolve_battle(&battle)?;
        log.battles.push(report_battle(game, &resolution));
    }
    Ok(())
}

fn report_battle(game: &Game, resolution: &Resolution) -> BattleReport {
    let names = |units: &[Unit]| -> Vec<String> {
        units.iter().map(|u| u.leader().to_string()).collect()
    };
    let mut attackers = names(&resolution.attackers.active);
    attackers.extend(names(&resolution.attackers.eliminated));
    let mut defenders = names(&resolution.defenders.active);
    defenders.extend(names(&resolution.defenders.eliminated));

    let lost = resolution
        .eliminated()
        .map(|u| u.key.leader.clone())
        .collect();

    BattleReport {
        turn: game.turn(),
        step: game.current_step(),
        result: resolution.result,
        face: resolution.face,
        attackers,
        defenders,
        lost,
    }
}

fn summarize(game: &Game, log: SessionLog) -> Summary {
    let report = |army: ArmyId| -> Vec<UnitReport> {
        game.board()
            .iter()
            .filter(|(key, _)| key.army == army)
            .map(|(key, placement)| UnitReport {
                leader: key.leader.clone(),
                position: placement.at,
                facing: placement.facing,
                combat_factor: placement.profile.combat_factor,
            })
            .collect()
    };

    Summary {
        turn: game.turn(),
        step: game.current_step(),
        status: game.status(),
        union: report(ArmyId::Union),
        confederate: report(ArmyId::Confederate),
        battles: log.battles,
        rejected: log.rejected,
    }
}

fn print_text(summary: &Summary) {
    println!("Gettysburg");
    println!("==========");
    println!("Turn: {}  Step: {}", summary.turn, summary.step);
    match summary.status {
        GameStatus::InProgress => println!("Status: in progress"),
        GameStatus::Won { winner } => println!("Status: {} wins", winner),
    }
    println!();

    for (army, units) in [("Union", &summary.union), ("Confederate", &summary.confederate)] {
        println!("{} ({} units)", army, units.len());
        for unit in units {
            println!(
                "  {:<16} at {:<9} facing {:?}, cf {}",
                unit.leader,
                unit.position.to_string(),
                unit.facing,
                unit.combat_factor
            );
        }
    }
    println!();

    println!("Battles: {}", summary.battles.len());
    for battle in &summary.battles {
        let face = battle
            .face
            .map(|f| f.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  turn {} {}: [{}] vs [{}] die {} -> {}, lost: {}",
            battle.turn,
            battle.step,
            battle.attackers.join(", "),
            battle.defenders.join(", "),
            face,
            battle.result,
            battle.lost.join(", ")
        );
    }

    if !summary.rejected.is_empty() {
        println!();
        println!("Rejected commands:");
        for line in &summary.rejected {
            println!("  {}", line);
        }
    }
}
