use anyhow::{Result, bail};
use clap::{ArgAction, Parser};
use levelgen::{GenRng, GeneratorConfig, LevelGenerator, check_arena, check_level};
use log::{info, warn};
use tools::logger;

#[derive(Parser)]
#[command(author, version, about = "Sweep seeds and check every generated map", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of consecutive seeds to check
    #[arg(short, long, default_value_t = 500)]
    count: u64,
    #[arg(long, default_value_t = 40)]
    width: usize,
    #[arg(long, default_value_t = 20)]
    height: usize,
    /// Player level used for the boss door promotion pass
    #[arg(short, long, default_value_t = 5)]
    player_level: u32,
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.verbose)?;

    let config = GeneratorConfig::default();
    let generator = LevelGenerator::new(config.clone())?;
    println!(
        "Fuzzing {} seeds from {} at {}x{}...",
        args.count, args.seed, args.width, args.height
    );

    let mut failures = 0_u64;
    let mut promoted = 0_u64;
    for seed in args.seed..args.seed.saturating_add(args.count) {
        let mut rng = GenRng::seed_from_u64(seed);
        let mut level = generator.generate(args.width, args.height, None, &mut rng)?;
        let mut violations = check_level(&level, &config);
        if violations.is_empty() && level.promote_boss_door(args.player_level, &config).is_some() {
            promoted += 1;
            violations = check_level(&level, &config);
        }

        let arena = generator.generate_boss_arena(args.width, args.height, &mut rng)?;
        violations.extend(check_arena(&arena));

        if violations.is_empty() {
            let fingerprint = level.fingerprint();
            info!("seed {seed}: {} level ok, fingerprint {fingerprint:016x}", level.archetype);
            continue;
        }
        failures += 1;
        for violation in &violations {
            warn!("seed {seed}: {violation}");
        }
        println!("{}", level.grid.to_ascii(Some(level.spawn)));
    }

    println!("Checked {} seeds, {promoted} boss doors, {failures} failures", args.count);
    if failures > 0 {
        bail!("{failures} seeds produced invalid maps");
    }
    Ok(())
}
