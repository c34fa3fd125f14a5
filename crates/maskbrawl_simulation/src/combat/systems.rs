//! Combat systems: таймеры, animation callbacks, hit resolution, facing.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use std::collections::HashMap;

use super::events::*;
use super::hit::resolve_hit;
use super::state::{AttackKind, CombatState, MaskRemoval};
use crate::components::{MovementIntent, Opponent};
use crate::masks::{MaskPopped, MaskStack, MaskStolen};

/// Сигналы презентации для TryAttack / TryDash
///
/// Player и AI системы вызывают попытки через этот param, чтобы успешная
/// попытка всегда сопровождалась animation/impulse событием.
#[derive(SystemParam)]
pub struct CombatSignals<'w> {
    attacks: EventWriter<'w, AttackStarted>,
    dashes: EventWriter<'w, DashStarted>,
    sounds: EventWriter<'w, SoundCue>,
}

impl CombatSignals<'_> {
    /// TryAttack(kind) + "play attack animation" при успехе
    pub fn try_attack(&mut self, entity: Entity, state: &mut CombatState, kind: AttackKind) -> bool {
        if !state.try_attack(kind) {
            return false;
        }

        self.attacks.write(AttackStarted {
            entity,
            kind,
            trigger: kind.animation_trigger(),
        });
        crate::logger::log(&format!("⚔️ {:?} started {:?} attack", entity, kind));
        true
    }

    /// TryDash() + "apply dash impulse" при успехе
    pub fn try_dash(&mut self, entity: Entity, state: &mut CombatState, direction: Vec3) -> bool {
        if !state.try_dash() {
            return false;
        }

        self.dashes.write(DashStarted {
            entity,
            impulse: direction * state.tuning.dash_impulse,
        });
        self.sounds.write(SoundCue {
            entity,
            sound: SoundKind::PunchSwing,
        });
        crate::logger::log(&format!("💨 {:?} dashed", entity));
        true
    }
}

/// Исходящие события hit resolution
#[derive(SystemParam)]
pub struct HitSignals<'w> {
    hits: EventWriter<'w, HitReceived>,
    landed: EventWriter<'w, HitLanded>,
    defeated: EventWriter<'w, CombatantDefeated>,
    popped: EventWriter<'w, MaskPopped>,
    stolen: EventWriter<'w, MaskStolen>,
    hitboxes: EventWriter<'w, HitboxToggled>,
    sounds: EventWriter<'w, SoundCue>,
}

/// System: per-tick advance cooldown таймеров (без потолка)
pub fn tick_combat_timers(mut query: Query<&mut CombatState>, time: Res<Time>) {
    let delta = time.delta_secs();

    for mut state in query.iter_mut() {
        state.tick(delta);
    }
}

/// System: animation callbacks от презентации (EndAttack / EndHurt / EndDash / hitbox)
pub fn handle_animation_events(
    mut animation_events: EventReader<AnimationEvent>,
    mut fighters: Query<&mut CombatState>,
    mut hitboxes: EventWriter<HitboxToggled>,
    mut sounds: EventWriter<SoundCue>,
) {
    for event in animation_events.read() {
        let Ok(mut state) = fighters.get_mut(event.entity) else {
            continue;
        };

        match event.kind {
            AnimationEventKind::EnableHitbox => {
                // Hurt прерывает удар — поздний callback прерванного клипа игнорируем
                if !state.is_attacking {
                    continue;
                }
                state.enable_hitbox();
                hitboxes.write(HitboxToggled {
                    entity: event.entity,
                    active: true,
                });
                sounds.write(SoundCue {
                    entity: event.entity,
                    sound: SoundKind::PunchSwing,
                });
            }
            AnimationEventKind::DisableHitbox => {
                if state.disable_hitbox() {
                    hitboxes.write(HitboxToggled {
                        entity: event.entity,
                        active: false,
                    });
                }
            }
            AnimationEventKind::EndAttack => state.end_attack(),
            AnimationEventKind::EndHurt => {
                let had_hitbox = state.hitbox_active;
                state.end_hurt();
                if had_hitbox {
                    hitboxes.write(HitboxToggled {
                        entity: event.entity,
                        active: false,
                    });
                }
            }
            AnimationEventKind::EndDash => state.end_dash(),
            AnimationEventKind::Footstep => {
                sounds.write(SoundCue {
                    entity: event.entity,
                    sound: SoundKind::FootStep,
                });
            }
        }
    }
}

/// System: HitboxOverlap → ApplyHit на защитнике
///
/// Направление удара = pending attack атакующего.
/// Игнорируем: self-overlap, цель не оппонент атакующего, атакующий без открытого hitbox.
pub fn process_hitbox_overlaps(
    mut overlaps: EventReader<HitboxOverlap>,
    mut fighters: Query<(
        &mut CombatState,
        &mut MaskStack,
        &Opponent,
        &Transform,
        Option<&mut MovementIntent>,
    )>,
    mut signals: HitSignals,
) {
    for overlap in overlaps.read() {
        let HitboxOverlap { attacker, target } = *overlap;

        if attacker == target {
            continue;
        }

        let Ok(
            [(mut target_state, mut target_masks, target_opponent, target_transform, target_intent), (attacker_state, mut attacker_masks, _, _, _)],
        ) = fighters.get_many_mut([target, attacker])
        else {
            crate::logger::log_warning(&format!(
                "HitboxOverlap ignored: {:?} → {:?} are not both combatants",
                attacker, target
            ));
            continue;
        };

        if target_opponent.0 != attacker {
            crate::logger::log_warning(&format!(
                "HitboxOverlap ignored: {:?} is not the opponent of {:?}",
                attacker, target
            ));
            continue;
        }

        // Удар наносит только открытый hitbox текущей атаки
        let Some(kind) = attacker_state.strike() else {
            continue;
        };
        let direction = kind.hit_direction();
        let had_hitbox = target_state.hitbox_active;

        let Some(outcome) = resolve_hit(
            &mut *target_state,
            &mut *target_masks,
            &mut *attacker_masks,
            direction,
        ) else {
            // Неуязвим (hurt / dash) — удары не стакаются
            continue;
        };

        if let Some(mut intent) = target_intent {
            intent.reset_blend();
        }
        if had_hitbox {
            signals.hitboxes.write(HitboxToggled {
                entity: target,
                active: false,
            });
        }

        signals.sounds.write(SoundCue {
            entity: target,
            sound: SoundKind::PunchHit,
        });
        signals.hits.write(HitReceived {
            entity: target,
            attacker,
            direction,
            trigger: direction.hurt_trigger(),
            knockback: target_state
                .tuning
                .knockback(direction, target_transform.back().as_vec3()),
        });

        if let Some(mask) = &outcome.removed {
            match outcome.removal {
                MaskRemoval::Pop => {
                    signals.popped.write(MaskPopped {
                        from: target,
                        mask: mask.id,
                        definition: mask.definition.clone(),
                        remaining: target_masks.count(),
                    });
                }
                MaskRemoval::Steal => {
                    signals.stolen.write(MaskStolen {
                        from: target,
                        to: attacker,
                        mask: mask.id,
                        definition: mask.definition.clone(),
                    });
                }
            }
        }

        crate::logger::log(&format!(
            "💥 {:?} hit {:?} ({:?}) — masks left: {}, attacker masks: {}",
            attacker,
            target,
            direction,
            target_masks.count(),
            attacker_masks.count()
        ));

        if outcome.defeated {
            signals.defeated.write(CombatantDefeated {
                entity: target,
                by: attacker,
            });
            crate::logger::log_info(&format!("☠️ {:?} has been defeated by {:?}", target, attacker));
        }

        signals.landed.write(HitLanded {
            attacker,
            target,
            direction,
            phrase: outcome.phrase,
        });
    }
}

/// System: поворот к оппоненту с ограниченной скоростью (не во время hurt)
pub fn face_opponent(
    mut fighters: Query<(Entity, &mut Transform, &CombatState, &Opponent)>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    // Снимок позиций до мутаций (оппонент тоже в этом query)
    let positions: HashMap<Entity, Vec3> = fighters
        .iter()
        .map(|(entity, transform, _, _)| (entity, transform.translation))
        .collect();

    for (_, mut transform, state, opponent) in fighters.iter_mut() {
        if state.is_hurt {
            continue;
        }
        let Some(opponent_position) = positions.get(&opponent.0) else {
            continue;
        };

        let Some(desired) = facing_rotation(*opponent_position - transform.translation) else {
            continue;
        };

        let max_step = state.tuning.turn_rate_degrees.to_radians() * delta;
        transform.rotation = rotate_towards(transform.rotation, desired, max_step);
    }
}

/// Yaw-поворот, при котором forward (-Z) смотрит вдоль `direction` (XZ)
pub fn facing_rotation(direction: Vec3) -> Option<Quat> {
    let planar = Vec3::new(direction.x, 0.0, direction.z);
    if planar.length_squared() < 1e-6 {
        return None;
    }
    let planar = planar.normalize();
    Some(Quat::from_rotation_y(f32::atan2(-planar.x, -planar.z)))
}

/// RotateTowards: не больше `max_radians` за шаг
pub fn rotate_towards(current: Quat, target: Quat, max_radians: f32) -> Quat {
    let angle = current.angle_between(target);
    if angle <= max_radians || angle <= f32::EPSILON {
        target
    } else {
        current.slerp(target, max_radians / angle)
    }
}
