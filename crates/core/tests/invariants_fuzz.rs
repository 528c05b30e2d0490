use levelgen::{GenRng, GeneratorConfig, LevelGenerator, check_arena, check_level};
use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};

fn check_seed(seed: u64, width: usize, height: usize, player_level: u32) -> Result<(), String> {
    let config = GeneratorConfig::default();
    let generator = LevelGenerator::new(config.clone()).map_err(|err| err.to_string())?;
    let mut rng = GenRng::seed_from_u64(seed);

    let mut level = generator.generate(width, height, None, &mut rng).map_err(|e| e.to_string())?;
    let violations = check_level(&level, &config);
    if !violations.is_empty() {
        return Err(format!("fresh level: {violations:?}\n{}", level.grid.to_ascii(None)));
    }
    level.promote_boss_door(player_level, &config);
    let violations = check_level(&level, &config);
    if !violations.is_empty() {
        return Err(format!("promoted level: {violations:?}\n{}", level.grid.to_ascii(None)));
    }

    let arena = generator.generate_boss_arena(width, height, &mut rng).map_err(|e| e.to_string())?;
    let violations = check_arena(&arena);
    if !violations.is_empty() {
        return Err(format!("arena: {violations:?}\n{}", arena.grid.to_ascii(None)));
    }
    Ok(())
}

#[test]
fn generated_maps_always_pass_their_checks() {
    let mut runner = TestRunner::new(ProptestConfig { cases: 96, ..ProptestConfig::default() });
    let strategy = (any::<u64>(), 8_usize..72, 8_usize..44, 1_u32..8);
    runner
        .run(&strategy, |(seed, width, height, player_level)| {
            check_seed(seed, width, height, player_level).map_err(TestCaseError::fail)
        })
        .expect("invariant checks failed");
}

#[test]
fn common_sizes_pass_for_a_seed_sweep() {
    for seed in 0..40 {
        for (width, height) in [(40, 20), (30, 22), (64, 32)] {
            if let Err(failure) = check_seed(seed, width, height, 4) {
                panic!("seed {seed} at {width}x{height}: {failure}");
            }
        }
    }
}
