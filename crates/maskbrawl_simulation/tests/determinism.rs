//! Тесты детерминизма
//!
//! Проверяем что матч с одинаковым seed даёт идентичные snapshots

use maskbrawl_simulation::*;

/// Запускает матч на `tick_count` тиков и возвращает JSON snapshot
fn run_match(seed: u64, tick_count: u32) -> String {
    let config = MatchConfig {
        seed,
        ..MatchConfig::default()
    };

    let mut app = create_headless_app(seed);
    config.install(app.world_mut());
    app.add_plugins((ArenaPlugin::default(), HeadlessPresentationPlugin::default()));

    let arena_match = spawn_match(app.world_mut(), &config);
    app.world_mut()
        .entity_mut(arena_match.player)
        .insert(PlayerAutopilot::default());

    for _ in 0..tick_count {
        app.update();
    }

    match_snapshot(app.world_mut()).expect("snapshot serializes")
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;
    const TICK_COUNT: u32 = 64 * 20;

    let snapshot1 = run_match(SEED, TICK_COUNT);
    let snapshot2 = run_match(SEED, TICK_COUNT);

    assert_eq!(
        snapshot1, snapshot2,
        "Матч с одинаковым seed ({}) дал разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;
    const TICK_COUNT: u32 = 64 * 10;

    // 3 прогона — все должны быть идентичны
    let snapshots: Vec<_> = (0..3).map(|_| run_match(SEED, TICK_COUNT)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(
            snapshots[0], *snapshot,
            "Прогон {} дал результат отличный от прогона 0",
            i
        );
    }
}

#[test]
fn test_different_seeds_deal_different_masks() {
    let snapshot1 = run_match(1, 1);
    let snapshot2 = run_match(2, 1);

    assert_ne!(snapshot1, snapshot2);
}
