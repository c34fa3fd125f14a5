//! Territory + side swap
//!
//! Арена делится по center.z. "Нижний" боец на чужой половине при z > center.z,
//! "верхний" — при z <= center.z. Если оба на чужой половине дольше
//! change_side_time — стороны меняются.

use bevy::prelude::*;

use super::bounds::ArenaBounds;

/// Territory флаги после одного тика
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideReport {
    pub bottom_at_enemy: bool,
    pub top_at_enemy: bool,
    pub swapped: bool,
}

/// Кто какую половину защищает
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaSides {
    pub bottom: Entity,
    pub top: Entity,
    /// Сколько секунд оба бойца подряд на чужой половине
    pub swap_timer: f32,
    /// Цвет нижней половины (для презентации): true — "своя" игрока
    pub bottom_is_player_color: bool,
}

impl ArenaSides {
    pub fn new(bottom: Entity, top: Entity) -> Self {
        Self {
            bottom,
            top,
            swap_timer: 0.0,
            bottom_is_player_color: true,
        }
    }

    pub fn update(
        &mut self,
        bounds: &ArenaBounds,
        bottom_position: Vec3,
        top_position: Vec3,
        change_side_time: f32,
        delta: f32,
    ) -> SideReport {
        let bottom_at_enemy = bounds.is_on_top_side(bottom_position);
        let top_at_enemy = !bounds.is_on_top_side(top_position);

        if bottom_at_enemy && top_at_enemy {
            self.swap_timer += delta;
        } else {
            self.swap_timer = 0.0;
        }

        if self.swap_timer > change_side_time {
            std::mem::swap(&mut self.bottom, &mut self.top);
            self.swap_timer = 0.0;
            self.bottom_is_player_color = !self.bottom_is_player_color;

            // После смены оба снова "дома"
            return SideReport {
                bottom_at_enemy: false,
                top_at_enemy: false,
                swapped: true,
            };
        }

        SideReport {
            bottom_at_enemy,
            top_at_enemy,
            swapped: false,
        }
    }
}
