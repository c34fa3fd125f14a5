//! CombatActor — seam между контроллерами (AI / player) и боевым ядром
//!
//! Контроллер видит CombatState и может пытаться атаковать/рвануть.
//! В ECS попытки идут через CombatSignals (события для презентации),
//! в unit-тестах — напрямую в CombatState.

use bevy::prelude::*;

use super::state::{AttackKind, CombatState};
use super::systems::CombatSignals;

pub trait CombatActor {
    fn combat(&self) -> &CombatState;
    fn try_attack(&mut self, kind: AttackKind) -> bool;
    fn try_dash(&mut self, direction: Vec3) -> bool;
}

impl CombatActor for CombatState {
    fn combat(&self) -> &CombatState {
        self
    }

    fn try_attack(&mut self, kind: AttackKind) -> bool {
        CombatState::try_attack(self, kind)
    }

    fn try_dash(&mut self, _direction: Vec3) -> bool {
        CombatState::try_dash(self)
    }
}

/// Боец в ECS: успешные попытки сразу уходят событиями
pub struct SignalledActor<'a, 'w> {
    entity: Entity,
    state: &'a mut CombatState,
    signals: &'a mut CombatSignals<'w>,
}

impl<'a, 'w> SignalledActor<'a, 'w> {
    pub fn new(entity: Entity, state: &'a mut CombatState, signals: &'a mut CombatSignals<'w>) -> Self {
        Self {
            entity,
            state,
            signals,
        }
    }
}

impl CombatActor for SignalledActor<'_, '_> {
    fn combat(&self) -> &CombatState {
        self.state
    }

    fn try_attack(&mut self, kind: AttackKind) -> bool {
        self.signals.try_attack(self.entity, self.state, kind)
    }

    fn try_dash(&mut self, direction: Vec3) -> bool {
        self.signals.try_dash(self.entity, self.state, direction)
    }
}
