//! Scripted input для headless прогонов
//!
//! Заменяет клавиатуру: идём к оппоненту, в радиусе — жмём удары по шаблону.
//! Пишет только PlayerInput, дальше работает обычная player_input система.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{PlayerInput, PlayerSettings};
use crate::combat::{AttackKind, CombatState};
use crate::components::{Defeated, Opponent, Territory};

/// Компонент: боец под управлением autopilot
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAutopilot {
    pub attack_range: f32,
    /// Шаблон ударов по кругу (по умолчанию Haymaker)
    pub pattern: Vec<AttackKind>,
    #[serde(skip)]
    next: usize,
}

impl Default for PlayerAutopilot {
    fn default() -> Self {
        Self::new(1.2, vec![AttackKind::Left, AttackKind::Left, AttackKind::Right])
    }
}

impl PlayerAutopilot {
    pub fn new(attack_range: f32, pattern: Vec<AttackKind>) -> Self {
        Self {
            attack_range,
            pattern,
            next: 0,
        }
    }

    pub fn next_attack(&self) -> Option<AttackKind> {
        self.pattern.get(self.next % self.pattern.len().max(1)).copied()
    }

    /// Решение одного тика: оси движения + кнопка удара
    pub fn drive(
        &mut self,
        to_opponent: Vec3,
        state: &CombatState,
        settings: &PlayerSettings,
        at_enemy_area: bool,
    ) -> PlayerInput {
        let mut input = PlayerInput::default();
        let planar = Vec2::new(to_opponent.x, to_opponent.z);

        if planar.length() > self.attack_range {
            input.move_axes = planar.normalize_or_zero();
            return input;
        }

        let Some(kind) = self.next_attack() else {
            return input;
        };
        if !state.can_attack(settings.resolve_attack(kind, at_enemy_area)) {
            return input;
        }

        match kind {
            AttackKind::Left => input.left = true,
            AttackKind::Right => input.right = true,
            AttackKind::Uppercut => input.uppercut = true,
        }
        self.next += 1;
        input
    }
}

/// Система: autopilot → PlayerInput (перед player_input)
pub fn drive_player_autopilot(
    mut pilots: Query<
        (
            &mut PlayerAutopilot,
            &mut PlayerInput,
            &Transform,
            &CombatState,
            &Opponent,
            Option<&Territory>,
        ),
        Without<Defeated>,
    >,
    positions: Query<&Transform>,
    settings: Res<PlayerSettings>,
) {
    for (mut pilot, mut input, transform, state, opponent, territory) in pilots.iter_mut() {
        let Ok(opponent_transform) = positions.get(opponent.0) else {
            *input = PlayerInput::default();
            continue;
        };

        let at_enemy_area = territory.is_some_and(|territory| territory.at_enemy_area);
        *input = pilot.drive(
            opponent_transform.translation - transform.translation,
            state,
            &settings,
            at_enemy_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_state() -> CombatState {
        let mut state = CombatState::default();
        state.tick(0.1);
        state
    }

    #[test]
    fn test_walks_towards_distant_opponent() {
        let mut pilot = PlayerAutopilot::default();

        let input = pilot.drive(Vec3::new(0.0, 0.0, 4.0), &ready_state(), &PlayerSettings::default(), false);

        assert_eq!(input.move_axes, Vec2::Y);
        assert!(input.pressed_attacks().next().is_none());
    }

    #[test]
    fn test_cycles_pattern_in_range() {
        let mut pilot = PlayerAutopilot::default();
        let settings = PlayerSettings::default();
        let state = ready_state();

        let first = pilot.drive(Vec3::new(0.0, 0.0, 1.0), &state, &settings, false);
        assert!(first.left);
        assert_eq!(first.move_axes, Vec2::ZERO);

        pilot.drive(Vec3::new(0.0, 0.0, 1.0), &state, &settings, false);
        let third = pilot.drive(Vec3::new(0.0, 0.0, 1.0), &state, &settings, false);
        assert!(third.right);
        assert_eq!(pilot.next_attack(), Some(AttackKind::Left));
    }

    #[test]
    fn test_waits_for_cooldown() {
        let mut pilot = PlayerAutopilot::default();
        let mut state = ready_state();
        state.is_attacking = true;

        let input = pilot.drive(Vec3::new(0.0, 0.0, 1.0), &state, &PlayerSettings::default(), false);

        assert!(input.pressed_attacks().next().is_none());
        assert_eq!(pilot.next_attack(), Some(AttackKind::Left));
    }

    #[test]
    fn test_enemy_territory_waits_for_uppercut() {
        let mut pilot = PlayerAutopilot::default();
        // Left готов, апперкот ещё нет (3s cooldown)
        let state = ready_state();

        let input = pilot.drive(Vec3::new(0.0, 0.0, 1.0), &state, &PlayerSettings::default(), true);

        assert!(!input.left);
    }
}
