//! AI decision-making module
//!
//! Simple FSM для AI бойца: Idle → Offensive → Defensive → Idle.
//! Решения идут через тот же CombatState guard, что и у игрока.

use bevy::ecs::schedule::InternedScheduleLabel;
use bevy::prelude::*;

pub mod fsm;
pub mod systems;


// Re-export основных типов
pub use fsm::{choose_attack, random_planar_direction, AiBrain, AiConfig, AiPerception, AiState, AiTickReport};
pub use systems::ai_decision;

use crate::ArenaSet;

/// AI Plugin
///
/// ai_decision в ArenaSet::Decide: FSM tick → TryAttack / TryDash / Move.
/// Побеждённые бойцы (Defeated) пропускаются.
pub struct AIPlugin {
    pub schedule: InternedScheduleLabel,
}

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<AiBrain>()
            .register_type::<AiConfig>()
            .add_systems(
                self.schedule,
                // Фиксированный порядок с игроком: детерминизм событий
                ai_decision
                    .after(crate::player::player_input)
                    .in_set(ArenaSet::Decide),
            );
    }
}
