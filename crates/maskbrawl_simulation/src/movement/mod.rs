//! Movement system module
//!
//! MovementIntent (от player input / AI) → Transform.
//! Move() применяется только у свободного бойца, позиция всегда остаётся в арене.

use bevy::ecs::schedule::InternedScheduleLabel;
use bevy::prelude::*;

use crate::arena::{ArenaBounds, Match};
use crate::combat::CombatState;
use crate::components::{Defeated, MovementIntent};
use crate::ArenaSet;

/// Система: blend + перемещение + clamp в арену
pub fn apply_movement_intents(
    mut fighters: Query<(&mut Transform, &mut MovementIntent, &CombatState), Without<Defeated>>,
    bounds: Option<Res<ArenaBounds>>,
    current: Option<Res<Match>>,
    time: Res<Time>,
) {
    // Матч окончен — все замирают
    if current.is_some_and(|current| current.finished) {
        return;
    }

    let delta = time.delta_secs();

    for (mut transform, mut intent, state) in fighters.iter_mut() {
        if !state.can_move() {
            continue;
        }

        intent.smooth_blend(state.tuning.walk_blend_speed, delta);

        let step = intent.planar_direction() * state.tuning.move_speed * delta;
        if step != Vec3::ZERO {
            transform.translation += step;
        }

        if let Some(bounds) = bounds.as_deref() {
            if bounds.is_out_of_bounds(transform.translation) {
                transform.translation = bounds.clamp_position_in_bounds(transform.translation);
            }
        }
    }
}

/// Система: поверженный боец замирает
pub fn halt_defeated_combatants(mut fighters: Query<&mut MovementIntent, Added<Defeated>>) {
    for mut intent in fighters.iter_mut() {
        intent.direction = Vec3::ZERO;
        intent.reset_blend();
    }
}

/// Movement Plugin (ArenaSet::Movement)
pub struct MovementPlugin {
    pub schedule: InternedScheduleLabel,
}

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            self.schedule,
            (halt_defeated_combatants, apply_movement_intents)
                .chain()
                .in_set(ArenaSet::Movement),
        );
    }
}
