//! Player control marker component

use bevy::prelude::Component;

/// Marker component для player-controlled бойца
///
/// - AI systems работают только с бойцами, у которых есть AiBrain
/// - Input systems используют `With<Player>` filter
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;
