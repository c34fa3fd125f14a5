//! Combat system module (presentation-driven hits)
//!
//! ECS ответственность:
//! - CombatState: cooldowns, attack/hurt/dash флаги, defeat latch
//! - Hit resolution: pop / steal верхней маски, defeat detection
//! - Events: AttackStarted, HitReceived, HitLanded, CombatantDefeated
//!
//! Ответственность презентации:
//! - Animation clips: когда открыть hitbox, когда закончить атаку/hurt/dash
//! - Hitbox overlap: HitboxOverlap { attacker, target } → ECS
//!
//! Поток атаки:
//!
//! ```text
//! Player/AI → CombatSignals::try_attack → AttackStarted (animation)
//!   ↓
//! AnimationEvent::EnableHitbox → hitbox открыт
//!   ↓
//! HitboxOverlap → resolve_hit на защитнике → HitReceived / MaskPopped / MaskStolen / HitLanded
//!   ↓
//! AnimationEvent::EndAttack / EndHurt → флаги сброшены
//! ```

use bevy::ecs::schedule::InternedScheduleLabel;
use bevy::prelude::*;

pub mod actor;
pub mod events;
pub mod hit;
pub mod state;
pub mod systems;

#[cfg(test)]
mod systems_tests;

pub use actor::{CombatActor, SignalledActor};
pub use events::*;
pub use hit::{resolve_hit, HitOutcome};
pub use state::{AttackKind, CombatState, CombatTuning, CooldownTimers, HitDirection, MaskRemoval};
pub use systems::{
    face_opponent, facing_rotation, handle_animation_events, process_hitbox_overlaps, rotate_towards,
    tick_combat_timers, CombatSignals, HitSignals,
};

use crate::masks::{MaskPopped, MaskStolen};
use crate::ArenaSet;

/// Combat Plugin
///
/// Порядок выполнения:
/// 1. tick_combat_timers (ArenaSet::Timers)
/// 2. handle_animation_events → process_hitbox_overlaps (ArenaSet::Resolve)
/// 3. face_opponent (ArenaSet::Facing, после движения)
pub struct CombatPlugin {
    pub schedule: InternedScheduleLabel,
}

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Входящие события от презентации
        app.add_event::<AnimationEvent>()
            .add_event::<HitboxOverlap>();

        // Исходящие события
        app.add_event::<AttackStarted>()
            .add_event::<DashStarted>()
            .add_event::<HitReceived>()
            .add_event::<HitboxToggled>()
            .add_event::<SoundCue>()
            .add_event::<HitLanded>()
            .add_event::<CombatantDefeated>()
            // HitSignals пишет их сам, MaskPlugin может быть не подключён
            .add_event::<MaskPopped>()
            .add_event::<MaskStolen>();

        app.add_systems(self.schedule, tick_combat_timers.in_set(ArenaSet::Timers))
            .add_systems(
                self.schedule,
                (handle_animation_events, process_hitbox_overlaps)
                    .chain()
                    .in_set(ArenaSet::Resolve),
            )
            .add_systems(self.schedule, face_opponent.in_set(ArenaSet::Facing));
    }
}
