//! Базовые компоненты бойца: Combatant, Opponent, Territory, Defeated

use bevy::prelude::*;

/// Боец арены (игрок или AI)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Combatant {
    /// Имя для логов и UI
    pub name: String,
}

impl Combatant {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Оппонент бойца (non-owning handle)
///
/// Инвариант: связь симметрична и выставляется один раз при старте матча.
/// Обоими бойцами владеет матч, поэтому здесь только Entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opponent(pub Entity);

/// Territory флаг: боец на половине арены оппонента
///
/// Вычисляется MatchCoordinator'ом, боевое ядро только читает.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Territory {
    pub at_enemy_area: bool,
}

/// Компонент-маркер: боец побеждён (масок не осталось)
///
/// AI и input системы пропускают таких бойцов.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Defeated;
