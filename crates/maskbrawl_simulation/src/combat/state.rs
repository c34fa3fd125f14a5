//! CombatState — боевое ядро бойца
//!
//! Cooldown таймеры растут вверх (без потолка), атака разрешена только
//! когда таймер СТРОГО больше cooldown константы.
//! Флаги attacking/hurt/dashing сбрасываются callback'ами анимаций.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Вид атаки (кнопка / решение AI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum AttackKind {
    Left,
    Right,
    Uppercut,
}

impl AttackKind {
    pub const ALL: [AttackKind; 3] = [AttackKind::Left, AttackKind::Right, AttackKind::Uppercut];

    /// Направление удара, которое получит защитник
    pub fn hit_direction(self) -> HitDirection {
        match self {
            AttackKind::Left => HitDirection::Left,
            AttackKind::Right => HitDirection::Right,
            AttackKind::Uppercut => HitDirection::Up,
        }
    }

    /// Animation trigger атакующего
    pub fn animation_trigger(self) -> &'static str {
        match self {
            AttackKind::Left => "PunchL",
            AttackKind::Right => "PunchR",
            AttackKind::Uppercut => "Uppercut",
        }
    }
}

/// Направление входящего удара
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum HitDirection {
    Left,
    Right,
    Up,
}

/// Что происходит с верхней маской при ударе
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskRemoval {
    /// Маска сбита и выброшена
    Pop,
    /// Маска перелетает к атакующему
    Steal,
}

impl HitDirection {
    pub fn mask_removal(self) -> MaskRemoval {
        match self {
            HitDirection::Left | HitDirection::Right => MaskRemoval::Pop,
            HitDirection::Up => MaskRemoval::Steal,
        }
    }

    /// Animation trigger защитника (hurt reaction)
    pub fn hurt_trigger(self) -> &'static str {
        match self {
            HitDirection::Left => "HitLeft",
            HitDirection::Right => "HitRight",
            HitDirection::Up => "HitUp",
        }
    }
}

/// Настройки бойца (cooldowns, скорость, импульсы)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Cooldown левого/правого удара (секунды)
    pub attack_cooldown: f32,
    /// Cooldown апперкота (секунды)
    pub uppercut_cooldown: f32,
    /// Cooldown рывка (секунды)
    pub dash_cooldown: f32,
    /// Скорость ходьбы (m/s)
    pub move_speed: f32,
    /// Скорость поворота к оппоненту (градусы/сек)
    pub turn_rate_degrees: f32,
    /// Скорость сглаживания MoveX/MoveY blend
    pub walk_blend_speed: f32,
    /// Импульс рывка
    pub dash_impulse: f32,
    /// Базовый импульс отбрасывания при попадании
    pub knockback_impulse: f32,
    /// Множитель отбрасывания для апперкота
    pub uppercut_knockback_multiplier: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            attack_cooldown: 1.0,
            uppercut_cooldown: 3.0,
            dash_cooldown: 1.5,
            move_speed: 10.0,
            turn_rate_degrees: 100.0,
            walk_blend_speed: 10.0,
            dash_impulse: 8.0,
            knockback_impulse: 3.0,
            uppercut_knockback_multiplier: 3.0,
        }
    }
}

impl CombatTuning {
    pub fn cooldown(&self, kind: AttackKind) -> f32 {
        match kind {
            AttackKind::Left | AttackKind::Right => self.attack_cooldown,
            AttackKind::Uppercut => self.uppercut_cooldown,
        }
    }

    /// Импульс отбрасывания (по направлению "назад" защитника)
    pub fn knockback(&self, direction: HitDirection, back: Vec3) -> Vec3 {
        let multiplier = match direction {
            HitDirection::Up => self.uppercut_knockback_multiplier,
            _ => 1.0,
        };
        back.normalize_or_zero() * self.knockback_impulse * multiplier
    }
}

/// Cooldown таймеры (время с последнего использования)
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect, Serialize)]
pub struct CooldownTimers {
    pub left: f32,
    pub right: f32,
    pub uppercut: f32,
    pub dash: f32,
}

impl CooldownTimers {
    pub fn get(&self, kind: AttackKind) -> f32 {
        match kind {
            AttackKind::Left => self.left,
            AttackKind::Right => self.right,
            AttackKind::Uppercut => self.uppercut,
        }
    }

    fn reset(&mut self, kind: AttackKind) {
        match kind {
            AttackKind::Left => self.left = 0.0,
            AttackKind::Right => self.right = 0.0,
            AttackKind::Uppercut => self.uppercut = 0.0,
        }
    }

    /// Все таймеры растут монотонно, потолка нет
    pub fn advance(&mut self, delta: f32) {
        self.left += delta;
        self.right += delta;
        self.uppercut += delta;
        self.dash += delta;
    }
}

/// Боевое состояние бойца
///
/// Инварианты:
/// - атака невозможна во время hurt / dash / другой атаки
/// - атака `kind` возможна только при `timers.get(kind) > cooldown(kind)`
/// - defeat latch выставляется ровно один раз
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CombatState {
    pub tuning: CombatTuning,
    pub timers: CooldownTimers,
    pub is_attacking: bool,
    pub is_hurt: bool,
    pub is_dashing: bool,
    /// Направление последней начатой атаки (для hitbox overlap)
    pub pending_attack: Option<AttackKind>,
    pub hitbox_active: bool,
    defeated: bool,
}

impl Default for CombatState {
    fn default() -> Self {
        Self::new(CombatTuning::default())
    }
}

impl CombatState {
    /// Таймеры стартуют на уровне cooldown: готовы через один тик
    pub fn new(tuning: CombatTuning) -> Self {
        Self {
            tuning,
            timers: CooldownTimers {
                left: tuning.attack_cooldown,
                right: tuning.attack_cooldown,
                uppercut: tuning.attack_cooldown,
                dash: tuning.dash_cooldown,
            },
            is_attacking: false,
            is_hurt: false,
            is_dashing: false,
            pending_attack: None,
            hitbox_active: false,
            defeated: false,
        }
    }

    /// Свободен ли боец (не бьёт, не в hurt reaction, не в рывке)
    pub fn is_free(&self) -> bool {
        !self.is_attacking && !self.is_hurt && !self.is_dashing
    }

    /// Move() применяется только у свободного бойца
    pub fn can_move(&self) -> bool {
        self.is_free()
    }

    /// Удары не стакаются: hurt или dash = неуязвимость
    pub fn is_vulnerable(&self) -> bool {
        !self.is_hurt && !self.is_dashing
    }

    pub fn can_attack(&self, kind: AttackKind) -> bool {
        self.is_free() && self.timers.get(kind) > self.tuning.cooldown(kind)
    }

    pub fn try_attack(&mut self, kind: AttackKind) -> bool {
        if !self.can_attack(kind) {
            return false;
        }

        self.timers.reset(kind);
        self.is_attacking = true;
        self.pending_attack = Some(kind);
        true
    }

    pub fn can_dash(&self) -> bool {
        self.is_free() && self.timers.dash > self.tuning.dash_cooldown
    }

    pub fn try_dash(&mut self) -> bool {
        if !self.can_dash() {
            return false;
        }

        self.is_dashing = true;
        self.timers.dash = 0.0;
        true
    }

    pub fn end_attack(&mut self) {
        self.is_attacking = false;
        self.pending_attack = None;
    }

    pub fn end_hurt(&mut self) {
        self.is_hurt = false;
        self.is_attacking = false;
        self.hitbox_active = false;
        self.pending_attack = None;
    }

    /// Открытый hitbox атакующей стороны: только он может нанести удар
    pub fn strike(&self) -> Option<AttackKind> {
        if self.is_attacking && self.hitbox_active {
            self.pending_attack
        } else {
            None
        }
    }

    pub fn end_dash(&mut self) {
        self.is_dashing = false;
    }

    pub fn enable_hitbox(&mut self) {
        self.hitbox_active = true;
    }

    /// Возвращает true если hitbox был открыт
    pub fn disable_hitbox(&mut self) -> bool {
        std::mem::replace(&mut self.hitbox_active, false)
    }

    /// Начать hurt reaction. false — боец неуязвим, удар игнорируется.
    pub fn begin_hurt(&mut self) -> bool {
        if !self.is_vulnerable() {
            return false;
        }

        self.is_hurt = true;
        self.is_attacking = false;
        self.hitbox_active = false;
        self.pending_attack = None;
        true
    }

    /// Per-tick advance cooldown таймеров
    pub fn tick(&mut self, delta: f32) {
        self.timers.advance(delta);
    }

    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    /// Defeat latch: true только при первом вызове
    pub fn mark_defeated(&mut self) -> bool {
        !std::mem::replace(&mut self.defeated, true)
    }
}
