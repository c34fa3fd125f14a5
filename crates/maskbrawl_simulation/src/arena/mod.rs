//! Match coordinator: два бойца, арена, территории, исход матча
//!
//! ECS ответственность:
//! - spawn_match: бойцы + взаимные Opponent + стартовые маски
//! - update_territory: territory флаги + side swap (ArenaSet::Timers)
//! - end_match_on_defeat: первый CombatantDefeated завершает матч (ArenaSet::Outcome)

use bevy::ecs::schedule::InternedScheduleLabel;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod bounds;
pub mod sides;
pub mod spawn;

pub use bounds::ArenaBounds;
pub use sides::{ArenaSides, SideReport};
pub use spawn::spawn_match;

use crate::combat::CombatantDefeated;
use crate::components::{Defeated, Territory};
use crate::ArenaSet;

/// Параметры арены
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    pub center: [f32; 3],
    pub radius: f32,
    /// Оба на чужой половине дольше этого → смена сторон
    pub change_side_time: f32,
    pub player_spawn: [f32; 3],
    pub ai_spawn: [f32; 3],
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0, 0.0],
            radius: 8.0,
            change_side_time: 1.0,
            player_spawn: [0.0, 0.0, -3.0],
            ai_spawn: [0.0, 0.0, 3.0],
        }
    }
}

impl ArenaSettings {
    pub fn bounds(&self) -> ArenaBounds {
        ArenaBounds::new(Vec3::from_array(self.center), self.radius)
    }
}

/// Resource: текущий матч
#[derive(Resource, Debug, Clone)]
pub struct Match {
    pub player: Entity,
    pub ai: Entity,
    pub sides: ArenaSides,
    pub elapsed: f32,
    pub finished: bool,
}

impl Match {
    /// Игрок стартует на нижней половине
    pub fn new(player: Entity, ai: Entity) -> Self {
        Self {
            player,
            ai,
            sides: ArenaSides::new(player, ai),
            elapsed: 0.0,
            finished: false,
        }
    }

    pub fn opponent_of(&self, entity: Entity) -> Option<Entity> {
        if entity == self.player {
            Some(self.ai)
        } else if entity == self.ai {
            Some(self.player)
        } else {
            None
        }
    }
}

/// Стороны поменялись → презентация перекрашивает половины
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidesSwapped {
    pub bottom: Entity,
    pub top: Entity,
    pub bottom_is_player_color: bool,
}

/// Матч закончен
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchEnded {
    pub winner: Entity,
    pub loser: Entity,
    pub player_wins: bool,
}

/// Resource: итог матча (переживает сцену)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchOutcome {
    pub player_wins: bool,
    pub duration: f32,
}

/// Система: territory флаги + side swap
pub fn update_territory(
    current: Option<ResMut<Match>>,
    bounds: Option<Res<ArenaBounds>>,
    settings: Res<ArenaSettings>,
    mut fighters: Query<(&Transform, &mut Territory)>,
    mut swaps: EventWriter<SidesSwapped>,
    time: Res<Time>,
) {
    let (Some(mut current), Some(bounds)) = (current, bounds) else {
        return;
    };
    if current.finished {
        return;
    }

    let delta = time.delta_secs();
    current.elapsed += delta;

    let (bottom, top) = (current.sides.bottom, current.sides.top);
    let Ok([(bottom_transform, mut bottom_territory), (top_transform, mut top_territory)]) =
        fighters.get_many_mut([bottom, top])
    else {
        return;
    };

    let report = current.sides.update(
        &bounds,
        bottom_transform.translation,
        top_transform.translation,
        settings.change_side_time,
        delta,
    );

    bottom_territory.at_enemy_area = report.bottom_at_enemy;
    top_territory.at_enemy_area = report.top_at_enemy;

    if report.swapped {
        swaps.write(SidesSwapped {
            bottom: current.sides.bottom,
            top: current.sides.top,
            bottom_is_player_color: current.sides.bottom_is_player_color,
        });
        crate::logger::log_info(&format!(
            "🔄 Sides swapped: bottom {:?}, top {:?}",
            current.sides.bottom, current.sides.top
        ));
    }
}

/// Система: defeat → Defeated marker, первый defeat заканчивает матч
pub fn end_match_on_defeat(
    mut commands: Commands,
    mut defeats: EventReader<CombatantDefeated>,
    mut current: Option<ResMut<Match>>,
    mut ended: EventWriter<MatchEnded>,
) {
    for defeat in defeats.read() {
        commands.entity(defeat.entity).insert(Defeated);

        let Some(arena_match) = current.as_mut() else {
            continue;
        };
        if arena_match.finished {
            continue;
        }
        let Some(winner) = arena_match.opponent_of(defeat.entity) else {
            continue;
        };

        arena_match.finished = true;
        let player_wins = winner == arena_match.player;

        ended.write(MatchEnded {
            winner,
            loser: defeat.entity,
            player_wins,
        });
        commands.insert_resource(MatchOutcome {
            player_wins,
            duration: arena_match.elapsed,
        });

        crate::logger::log_info(&format!(
            "🏆 Match over after {:.1}s: {} wins",
            arena_match.elapsed,
            if player_wins { "player" } else { "AI" }
        ));
    }
}

/// Run condition: решения (input / AI) только пока матч идёт
pub fn match_in_progress(current: Option<Res<Match>>) -> bool {
    current.is_none_or(|current| !current.finished)
}

/// Match Plugin
pub struct MatchPlugin {
    pub schedule: InternedScheduleLabel,
}

impl Plugin for MatchPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SidesSwapped>()
            .add_event::<MatchEnded>()
            .init_resource::<ArenaSettings>()
            .configure_sets(self.schedule, ArenaSet::Decide.run_if(match_in_progress))
            .add_systems(self.schedule, update_territory.in_set(ArenaSet::Timers))
            .add_systems(self.schedule, end_match_on_defeat.in_set(ArenaSet::Outcome));
    }
}
