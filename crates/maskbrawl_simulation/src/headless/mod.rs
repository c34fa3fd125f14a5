//! Headless presentation stand-in
//!
//! Заменяет движок в headless прогонах и тестах:
//! - AttackStarted / HitReceived / DashStarted → "клип" с фиксированными таймингами
//! - клип шлёт AnimationEvent (EnableHitbox, DisableHitbox, EndAttack, EndHurt, EndDash)
//! - открытый hitbox рядом с оппонентом → один HitboxOverlap на клип
//! - импульсы рывка и отбрасывания интегрируются в Transform с затуханием
//!
//! События уходят в ArenaSet::Presentation и читаются ECS на следующем тике.

use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::arena::ArenaBounds;
use crate::combat::{
    AnimationEvent, AnimationEventKind, AttackStarted, CombatState, DashStarted, HitReceived, HitboxOverlap,
};
use crate::components::{MovementIntent, Opponent};
use crate::config::ConfigError;
use crate::ArenaSet;

/// Тайминги клипов (секунды) и геометрия hitbox
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessClipTimings {
    pub attack_duration: f32,
    pub hitbox_open_at: f32,
    pub hitbox_close_at: f32,
    pub hurt_duration: f32,
    pub dash_duration: f32,
    /// Дистанция, на которой открытый hitbox задевает оппонента
    pub hitbox_reach: f32,
    /// Затухание импульсов (1/сек)
    pub impulse_damping: f32,
    /// Шаг в walk-цикле
    pub footstep_interval: f32,
}

impl Default for HeadlessClipTimings {
    fn default() -> Self {
        Self {
            attack_duration: 0.5,
            hitbox_open_at: 0.15,
            hitbox_close_at: 0.35,
            hurt_duration: 0.6,
            dash_duration: 0.4,
            hitbox_reach: 1.5,
            impulse_damping: 6.0,
            footstep_interval: 0.35,
        }
    }
}

impl HeadlessClipTimings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let window_ok = 0.0 <= self.hitbox_open_at
            && self.hitbox_open_at <= self.hitbox_close_at
            && self.hitbox_close_at <= self.attack_duration;
        if !window_ok {
            return Err(ConfigError::Invalid(format!(
                "presentation hitbox window {}..{} must fit inside attack clip {}",
                self.hitbox_open_at, self.hitbox_close_at, self.attack_duration
            )));
        }
        if !(self.hurt_duration > 0.0 && self.dash_duration > 0.0) {
            return Err(ConfigError::Invalid(
                "presentation hurt/dash clips must be longer than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipKind {
    Attack,
    Hurt,
    Dash,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Clip {
    kind: ClipKind,
    elapsed: f32,
    hitbox_open: bool,
    overlap_sent: bool,
}

/// Состояние "анимации" бойца
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct HeadlessAnimator {
    clip: Option<Clip>,
    velocity: Vec3,
    footstep_timer: f32,
}

impl HeadlessAnimator {
    /// Новый клип заменяет текущий (hurt прерывает атаку)
    pub fn play(&mut self, kind: ClipKind) {
        self.clip = Some(Clip {
            kind,
            elapsed: 0.0,
            hitbox_open: false,
            overlap_sent: false,
        });
    }

    pub fn playing(&self) -> Option<ClipKind> {
        self.clip.map(|clip| clip.kind)
    }

    pub fn add_impulse(&mut self, impulse: Vec3) {
        self.velocity += Vec3::new(impulse.x, 0.0, impulse.z);
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }
}

/// Система: каждый боец получает HeadlessAnimator
pub fn attach_headless_animators(
    mut commands: Commands,
    fighters: Query<Entity, (With<CombatState>, Without<HeadlessAnimator>)>,
) {
    for entity in fighters.iter() {
        commands.entity(entity).insert(HeadlessAnimator::default());
    }
}

/// Система: animation triggers от ECS → клипы + импульсы
pub fn start_clips(
    mut attacks: EventReader<AttackStarted>,
    mut hits: EventReader<HitReceived>,
    mut dashes: EventReader<DashStarted>,
    mut animators: Query<&mut HeadlessAnimator>,
) {
    for attack in attacks.read() {
        if let Ok(mut animator) = animators.get_mut(attack.entity) {
            animator.play(ClipKind::Attack);
        }
    }

    for dash in dashes.read() {
        if let Ok(mut animator) = animators.get_mut(dash.entity) {
            animator.play(ClipKind::Dash);
            animator.add_impulse(dash.impulse);
        }
    }

    // Hurt последним: прерывает атаку/рывок того же тика
    for hit in hits.read() {
        if let Ok(mut animator) = animators.get_mut(hit.entity) {
            animator.play(ClipKind::Hurt);
            animator.add_impulse(hit.knockback);
        }
    }
}

/// Система: проигрывание клипов, hitbox overlap, интеграция импульсов
pub fn advance_clips(
    mut fighters: Query<(
        Entity,
        &mut HeadlessAnimator,
        &mut Transform,
        &Opponent,
        &CombatState,
        Option<&MovementIntent>,
    )>,
    mut animation_events: EventWriter<AnimationEvent>,
    mut overlaps: EventWriter<HitboxOverlap>,
    timings: Res<HeadlessClipTimings>,
    bounds: Option<Res<ArenaBounds>>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    let positions: HashMap<Entity, Vec3> = fighters
        .iter()
        .map(|(entity, _, transform, _, _, _)| (entity, transform.translation))
        .collect();

    for (entity, mut animator, mut transform, opponent, state, intent) in fighters.iter_mut() {
        // Импульсы (рывок, отбрасывание)
        if animator.velocity.length_squared() > 1e-6 {
            transform.translation += animator.velocity * delta;
            animator.velocity *= (-timings.impulse_damping * delta).exp();
            if let Some(bounds) = bounds.as_deref() {
                transform.translation = bounds.clamp_position_in_bounds(transform.translation);
            }
        } else {
            animator.velocity = Vec3::ZERO;
        }

        // Шаги только у свободно идущего бойца
        let walking = state.can_move() && intent.is_some_and(|intent| intent.planar_direction() != Vec3::ZERO);
        if walking {
            animator.footstep_timer += delta;
            if animator.footstep_timer >= timings.footstep_interval {
                animator.footstep_timer = 0.0;
                animation_events.write(AnimationEvent {
                    entity,
                    kind: AnimationEventKind::Footstep,
                });
            }
        } else {
            animator.footstep_timer = 0.0;
        }

        let Some(mut clip) = animator.clip else {
            continue;
        };
        clip.elapsed += delta;

        let mut send = |kind| {
            animation_events.write(AnimationEvent { entity, kind });
        };

        let finished = match clip.kind {
            ClipKind::Attack => {
                if !clip.hitbox_open && clip.elapsed >= timings.hitbox_open_at && clip.elapsed < timings.hitbox_close_at {
                    clip.hitbox_open = true;
                    send(AnimationEventKind::EnableHitbox);
                }

                // Закрытие раньше overlap: после DisableHitbox overlap уже не засчитается
                if clip.hitbox_open && clip.elapsed >= timings.hitbox_close_at {
                    clip.hitbox_open = false;
                    send(AnimationEventKind::DisableHitbox);
                }

                if clip.hitbox_open && !clip.overlap_sent {
                    let in_reach = positions
                        .get(&opponent.0)
                        .is_some_and(|target| target.distance(transform.translation) <= timings.hitbox_reach);
                    if in_reach {
                        clip.overlap_sent = true;
                        overlaps.write(HitboxOverlap {
                            attacker: entity,
                            target: opponent.0,
                        });
                    }
                }

                if clip.elapsed >= timings.attack_duration {
                    send(AnimationEventKind::EndAttack);
                    true
                } else {
                    false
                }
            }
            ClipKind::Hurt => {
                let done = clip.elapsed >= timings.hurt_duration;
                if done {
                    send(AnimationEventKind::EndHurt);
                }
                done
            }
            ClipKind::Dash => {
                let done = clip.elapsed >= timings.dash_duration;
                if done {
                    send(AnimationEventKind::EndDash);
                }
                done
            }
        };

        animator.clip = if finished { None } else { Some(clip) };
    }
}

/// Headless Presentation Plugin
///
/// Порядок (ArenaSet::Presentation): attach → start_clips → advance_clips
pub struct HeadlessPresentationPlugin {
    pub schedule: InternedScheduleLabel,
}

impl Default for HeadlessPresentationPlugin {
    fn default() -> Self {
        Self {
            schedule: FixedUpdate.intern(),
        }
    }
}

impl Plugin for HeadlessPresentationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HeadlessClipTimings>().add_systems(
            self.schedule,
            (attach_headless_animators, start_clips, advance_clips)
                .chain()
                .in_set(ArenaSet::Presentation),
        );
    }
}
