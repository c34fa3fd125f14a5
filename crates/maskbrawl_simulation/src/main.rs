//! Headless симуляция MASKBRAWL
//!
//! Игрок на autopilot против AI, до конца матча или лимита тиков.
//! Usage: maskbrawl_simulation [config.json]

use maskbrawl_simulation::{
    create_headless_app, init_logger, log_error, log_info, match_snapshot, spawn_match, ArenaPlugin, HeadlessPresentationPlugin,
    MatchConfig, MatchOutcome, MatchSnapshot, PlayerAutopilot, SIMULATION_HZ,
};

fn main() {
    init_logger();

    let config = match std::env::args().nth(1) {
        Some(path) => match MatchConfig::load_from_path(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{path}: {err}");
                log_error(&format!("Config {path} rejected: {err}"));
                std::process::exit(1);
            }
        },
        None => MatchConfig::default(),
    };

    println!("Starting MASKBRAWL headless match (seed: {})", config.seed);

    let mut app = create_headless_app(config.seed);
    config.install(app.world_mut());
    app.add_plugins((ArenaPlugin::default(), HeadlessPresentationPlugin::default()));

    let arena_match = spawn_match(app.world_mut(), &config);
    app.world_mut()
        .entity_mut(arena_match.player)
        .insert(PlayerAutopilot::default());

    let ticks_per_report = (SIMULATION_HZ as u32) * 10;
    let mut ticks = 0;
    while ticks < config.max_ticks {
        app.update();
        ticks += 1;

        if app.world().contains_resource::<MatchOutcome>() {
            break;
        }

        if ticks % ticks_per_report == 0 {
            let snapshot = MatchSnapshot::capture(app.world_mut());
            let counts: Vec<String> = snapshot
                .combatants
                .iter()
                .map(|combatant| format!("{} {}", combatant.name, combatant.mask_count))
                .collect();
            log_info(&format!("Tick {}: masks {}", ticks, counts.join(" / ")));
        }
    }

    match app.world().get_resource::<MatchOutcome>().copied() {
        Some(outcome) => println!(
            "Match over after {:.1}s ({} ticks): {} wins",
            outcome.duration,
            ticks,
            if outcome.player_wins { config.player_name.as_str() } else { config.ai_name.as_str() }
        ),
        None => println!("Tick limit reached ({} ticks), no winner", ticks),
    }

    match match_snapshot(app.world_mut()) {
        Ok(json) => println!("{json}"),
        Err(err) => log_error(&format!("Snapshot failed: {err}")),
    }
}
