//! Combat events
//!
//! Входящие (презентация → ECS): AnimationEvent, HitboxOverlap
//! Исходящие (ECS → презентация): всё остальное

use bevy::prelude::*;

use super::state::{AttackKind, HitDirection};

/// Animation callback от презентации (animation events на клипах)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationEvent {
    pub entity: Entity,
    pub kind: AnimationEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEventKind {
    EnableHitbox,
    DisableHitbox,
    EndAttack,
    EndHurt,
    EndDash,
    /// Шаг в walk-цикле (только звук)
    Footstep,
}

/// Hitbox атакующего пересёкся с телом цели (overlap геометрия — у презентации)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitboxOverlap {
    pub attacker: Entity,
    pub target: Entity,
}

/// Атака началась → проиграть animation trigger
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AttackStarted {
    pub entity: Entity,
    pub kind: AttackKind,
    pub trigger: &'static str,
}

/// Рывок начался → применить импульс
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DashStarted {
    pub entity: Entity,
    pub impulse: Vec3,
}

/// Боец получил удар → hurt анимация + отбрасывание
#[derive(Event, Debug, Clone, PartialEq)]
pub struct HitReceived {
    pub entity: Entity,
    pub attacker: Entity,
    pub direction: HitDirection,
    pub trigger: &'static str,
    pub knockback: Vec3,
}

/// Hitbox включён/выключен
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitboxToggled {
    pub entity: Entity,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKind {
    PunchSwing,
    PunchHit,
    FootStep,
}

/// Звуковой cue для аудио презентации
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundCue {
    pub entity: Entity,
    pub sound: SoundKind,
}

/// OnHitLanded hook атакующего
///
/// `phrase` — фраза снятой маски (пусто если маски не было или фразы нет).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct HitLanded {
    pub attacker: Entity,
    pub target: Entity,
    pub direction: HitDirection,
    pub phrase: String,
}

/// Боец потерял последнюю маску (ровно один раз)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatantDefeated {
    pub entity: Entity,
    pub by: Entity,
}
