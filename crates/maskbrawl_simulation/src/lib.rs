//! MASKBRAWL Simulation Core
//!
//! ECS-симуляция арены на Bevy 0.16: два бойца, стеки масок как health pool.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = правила боя, маски, AI, исход матча
//! - Презентация = анимации, hitbox геометрия, звук, UI (через события)
//!
//! Headless режим: `HeadlessPresentationPlugin` подменяет презентацию
//! детерминированными таймингами клипов.

use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod arena;
pub mod combat;
pub mod components;
pub mod config;
pub mod effects;
pub mod headless;
pub mod logger;
pub mod masks;
pub mod movement;
pub mod player;
pub mod snapshot;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, AiBrain, AiConfig, AiState};
pub use arena::{spawn_match, ArenaBounds, ArenaSettings, Match, MatchEnded, MatchOutcome, MatchPlugin, SidesSwapped};
pub use combat::{AttackKind, CombatPlugin, CombatState, CombatTuning, CombatantDefeated, HitDirection};
pub use components::*;
pub use config::{ConfigError, MatchConfig};
pub use effects::EffectsPlugin;
pub use headless::HeadlessPresentationPlugin;
pub use logger::*;
pub use masks::{MaskCatalog, MaskPlugin, MaskStack};
pub use movement::MovementPlugin;
pub use player::{PlayerAutopilot, PlayerInput, PlayerPlugin};
pub use snapshot::{match_snapshot, CombatantSnapshot, MatchSnapshot};

/// Частота симуляции (FixedUpdate)
pub const SIMULATION_HZ: f64 = 64.0;

/// Фазы одного тика арены (всегда выполняются по порядку)
///
/// Timers → Decide → Resolve → Effects → Outcome → Movement → Facing → Presentation
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArenaSet {
    /// Cooldown таймеры, territory флаги, side swap
    Timers,
    /// Player input / AI решения (TryAttack, TryDash, Move)
    Decide,
    /// Animation callbacks + hitbox overlaps → ApplyHit
    Resolve,
    /// Отложенные эффекты: перелёт масок, фразы, cinematics
    Effects,
    /// Defeat → конец матча
    Outcome,
    /// Применение MovementIntent + clamp в арену
    Movement,
    /// Поворот к оппоненту
    Facing,
    /// Headless презентация (клипы → AnimationEvent на следующий тик)
    Presentation,
}

impl ArenaSet {
    pub fn configure(app: &mut App, schedule: InternedScheduleLabel) {
        app.configure_sets(
            schedule,
            (
                ArenaSet::Timers,
                ArenaSet::Decide,
                ArenaSet::Resolve,
                ArenaSet::Effects,
                ArenaSet::Outcome,
                ArenaSet::Movement,
                ArenaSet::Facing,
                ArenaSet::Presentation,
            )
                .chain(),
        );
    }
}

/// Главный plugin арены (объединяет все подсистемы)
///
/// По умолчанию работает в FixedUpdate (64Hz). Тесты используют `Update`
/// с вручную продвигаемым `Time`.
pub struct ArenaPlugin {
    pub schedule: InternedScheduleLabel,
}

impl Default for ArenaPlugin {
    fn default() -> Self {
        Self::new(FixedUpdate)
    }
}

impl ArenaPlugin {
    pub fn new(schedule: impl ScheduleLabel) -> Self {
        Self {
            schedule: schedule.intern(),
        }
    }
}

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        let schedule = self.schedule;

        if schedule == FixedUpdate.intern() {
            app.insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ));
        }
        if !app.world().contains_resource::<DeterministicRng>() {
            // Детерминистичный RNG (seed по умолчанию)
            app.insert_resource(DeterministicRng::new(42));
        }

        ArenaSet::configure(app, schedule);

        app.add_plugins((
            CombatPlugin { schedule },
            MaskPlugin { schedule },
            AIPlugin { schedule },
            PlayerPlugin { schedule },
            MatchPlugin { schedule },
            EffectsPlugin { schedule },
            MovementPlugin { schedule },
        ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Каждый `app.update()` = ровно один FixedUpdate тик (1/64 сек),
/// независимо от реального времени.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / SIMULATION_HZ,
        )));

    app
}
