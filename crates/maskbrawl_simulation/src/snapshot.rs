//! Snapshot состояния матча (serde_json)
//!
//! Используется для проверки детерминизма: одинаковый seed → одинаковый JSON.

use bevy::prelude::*;
use serde::Serialize;

use crate::ai::{AiBrain, AiState};
use crate::arena::{Match, MatchOutcome};
use crate::combat::CombatState;
use crate::components::{Combatant, Territory};
use crate::masks::MaskStack;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatantSnapshot {
    pub name: String,
    pub position: [f32; 3],
    pub mask_count: usize,
    /// Снизу вверх (последний = верхняя маска)
    pub masks: Vec<String>,
    pub mask_ids: Vec<u64>,
    pub is_attacking: bool,
    pub is_hurt: bool,
    pub is_dashing: bool,
    pub defeated: bool,
    pub at_enemy_area: bool,
    pub ai_state: Option<AiState>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSnapshot {
    pub elapsed: f32,
    pub finished: bool,
    pub outcome: Option<MatchOutcome>,
    /// Игрок первым, затем AI; без Match — по порядку Entity
    pub combatants: Vec<CombatantSnapshot>,
}

impl MatchSnapshot {
    pub fn capture(world: &mut World) -> Self {
        let mut query = world.query::<(
            Entity,
            &Combatant,
            &Transform,
            &CombatState,
            &MaskStack,
            Option<&Territory>,
            Option<&AiBrain>,
        )>();

        let mut rows: Vec<(Entity, CombatantSnapshot)> = query
            .iter(world)
            .map(|(entity, combatant, transform, state, masks, territory, brain)| {
                let snapshot = CombatantSnapshot {
                    name: combatant.name.clone(),
                    position: transform.translation.to_array(),
                    mask_count: masks.count(),
                    masks: masks.iter().map(|mask| mask.definition.name.clone()).collect(),
                    mask_ids: masks.iter().map(|mask| mask.id.0).collect(),
                    is_attacking: state.is_attacking,
                    is_hurt: state.is_hurt,
                    is_dashing: state.is_dashing,
                    defeated: state.is_defeated(),
                    at_enemy_area: territory.is_some_and(|territory| territory.at_enemy_area),
                    ai_state: brain.map(|brain| brain.state),
                };
                (entity, snapshot)
            })
            .collect();

        let current = world.get_resource::<Match>();
        let order = |entity: Entity| match current {
            Some(current) if entity == current.player => (0, entity),
            Some(current) if entity == current.ai => (1, entity),
            _ => (2, entity),
        };
        rows.sort_by_key(|(entity, _)| order(*entity));

        Self {
            elapsed: current.map_or(0.0, |current| current.elapsed),
            finished: current.is_some_and(|current| current.finished),
            outcome: world.get_resource::<MatchOutcome>().copied(),
            combatants: rows.into_iter().map(|(_, snapshot)| snapshot).collect(),
        }
    }
}

/// Snapshot матча в JSON
pub fn match_snapshot(world: &mut World) -> serde_json::Result<String> {
    serde_json::to_string(&MatchSnapshot::capture(world))
}
