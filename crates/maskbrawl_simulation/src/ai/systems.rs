//! AI systems: восприятие оппонента → AiBrain tick → TryAttack / TryDash / Move.

use bevy::prelude::*;
use std::collections::HashMap;

use super::fsm::{AiBrain, AiConfig, AiPerception};
use crate::combat::{CombatSignals, CombatState, SignalledActor};
use crate::components::{Defeated, MovementIntent, Opponent};
use crate::DeterministicRng;

/// Система: AI FSM tick для всех AI бойцов
///
/// Снимок позиций/hurt флагов собирается до мутаций: оппонент может
/// быть в том же query (AI против AI в тестах).
pub fn ai_decision(
    mut fighters: ParamSet<(
        Query<(Entity, &Transform, &CombatState)>,
        Query<
            (
                Entity,
                &mut AiBrain,
                &AiConfig,
                &mut CombatState,
                &Transform,
                &Opponent,
                &mut MovementIntent,
            ),
            Without<Defeated>,
        >,
    )>,
    mut signals: CombatSignals,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    let snapshot: HashMap<Entity, (Vec3, bool)> = fighters
        .p0()
        .iter()
        .map(|(entity, transform, state)| (entity, (transform.translation, state.is_hurt)))
        .collect();

    for (entity, mut brain, config, mut state, transform, opponent, mut intent) in fighters.p1().iter_mut() {
        let Some(&(opponent_position, opponent_hurt)) = snapshot.get(&opponent.0) else {
            continue;
        };

        let perception = AiPerception {
            position: transform.translation,
            opponent_position,
            opponent_hurt,
            dash_direction: intent.dash_direction(),
        };

        let mut actor = SignalledActor::new(entity, &mut *state, &mut signals);
        let report = brain.tick(config, &perception, &mut actor, &mut rng.rng, delta);

        intent.direction = brain.direction;

        if report.transitioned() {
            crate::logger::log(&format!(
                "🤖 AI {:?}: {:?} → {:?} (distance {:.2}m)",
                entity,
                report.previous,
                report.state,
                perception.distance()
            ));
        }
    }
}
