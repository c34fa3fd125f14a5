//! Mask events (ECS → презентация)

use bevy::prelude::*;
use std::sync::Arc;

use super::catalog::{MaskDefinition, MaskInstanceId};

/// Маска сбита (выброшена, владельца нет)
#[derive(Event, Debug, Clone)]
pub struct MaskPopped {
    pub from: Entity,
    pub mask: MaskInstanceId,
    pub definition: Arc<MaskDefinition>,
    pub remaining: usize,
}

/// Маска украдена: логически уже у `to`, визуально ещё летит
#[derive(Event, Debug, Clone)]
pub struct MaskStolen {
    pub from: Entity,
    pub to: Entity,
    pub mask: MaskInstanceId,
    pub definition: Arc<MaskDefinition>,
}

/// Косметический перелёт завершён — маска надета на `owner`
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskAttached {
    pub owner: Entity,
    pub mask: MaskInstanceId,
}
