use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use levelgen::{
    ArchetypeId, Descent, GenRng, GeneratorConfig, LevelExport, LevelGenerator, check_arena,
    check_level, generate_runtime_seed,
};
use tools::logger;

#[derive(Parser)]
#[command(author, version, about = "Generate dungeon levels and boss arenas", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML file with generator settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a single level
    Level {
        #[command(flatten)]
        shape: Shape,
        /// Archetype name (cave, ruins, crypt, forest, tech, boss_arena)
        #[arg(short, long)]
        archetype: Option<String>,
        /// Promote the door to a boss door for a player of this level
        #[arg(short, long)]
        player_level: Option<u32>,
    },
    /// Generate a boss arena
    Arena {
        #[command(flatten)]
        shape: Shape,
    },
    /// Generate consecutive levels of one run
    Descend {
        #[command(flatten)]
        shape: Shape,
        #[arg(short, long, default_value_t = 3)]
        levels: u32,
        #[arg(short, long, default_value_t = 1)]
        player_level: u32,
    },
}

#[derive(Args)]
struct Shape {
    /// Seed; a fresh one is drawn when omitted
    #[arg(short, long)]
    seed: Option<u64>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    /// Print JSON instead of the text dump
    #[arg(long)]
    json: bool,
}

impl Shape {
    fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(generate_runtime_seed)
    }

    fn dimensions(&self, config: &GeneratorConfig) -> (usize, usize) {
        (self.width.unwrap_or(config.width), self.height.unwrap_or(config.height))
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(GeneratorConfig::default()),
    }
}

fn emit(export: &LevelExport, ascii: String, json: bool) -> Result<()> {
    if json {
        println!("{}", export.to_json().context("Failed to serialize level")?);
    } else {
        println!("{ascii}");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose).context("Failed to install logger")?;
    let config = load_config(cli.config.as_ref())?;
    let generator = LevelGenerator::new(config.clone()).context("Invalid generator config")?;

    match cli.command {
        Command::Level { shape, archetype, player_level } => {
            let archetype = archetype
                .map(|name| name.parse::<ArchetypeId>())
                .transpose()
                .context("Invalid archetype")?;
            let seed = shape.seed();
            let (width, height) = shape.dimensions(&config);
            let mut rng = GenRng::seed_from_u64(seed);
            let mut level = generator.generate(width, height, archetype, &mut rng)?;
            if let Some(player_level) = player_level {
                level.promote_boss_door(player_level, &config);
            }

            let violations = check_level(&level, &config);
            for violation in &violations {
                log::warn!("{violation}");
            }
            if !shape.json {
                println!(
                    "seed {seed}, {} level, spawn {:?}, door {:?}",
                    level.archetype, level.spawn, level.door
                );
            }
            let ascii = level.grid.to_ascii(Some(level.spawn));
            emit(&LevelExport::from_level(&level), ascii, shape.json)?;
            if !violations.is_empty() {
                bail!("{} invariant violations", violations.len());
            }
        }
        Command::Arena { shape } => {
            let seed = shape.seed();
            let (width, height) = shape.dimensions(&config);
            let mut rng = GenRng::seed_from_u64(seed);
            let arena = generator.generate_boss_arena(width, height, &mut rng)?;
            let violations = check_arena(&arena);
            if !shape.json {
                println!("seed {seed}, boss at {:?}, entrance {:?}", arena.center, arena.entrance);
            }
            let ascii = arena.grid.to_ascii(Some(arena.entrance));
            emit(&LevelExport::from_arena(&arena), ascii, shape.json)?;
            if !violations.is_empty() {
                bail!("{} invariant violations", violations.len());
            }
        }
        Command::Descend { shape, levels, player_level } => {
            let seed = shape.seed();
            let (width, height) = shape.dimensions(&config);
            let mut descent = Descent::new(seed, generator);
            descent.set_player_level(player_level);
            for _ in 0..levels {
                let level = descent.next_level(width, height)?;
                if !shape.json {
                    println!(
                        "depth {}: {} level, fingerprint {:016x}, boss door: {}",
                        descent.depth(),
                        level.archetype,
                        level.fingerprint(),
                        level.has_boss_door()
                    );
                }
                let ascii = format!("{}\n", level.grid.to_ascii(Some(level.spawn)));
                emit(&LevelExport::from_level(&level), ascii, shape.json)?;
            }
        }
    }

    Ok(())
}
