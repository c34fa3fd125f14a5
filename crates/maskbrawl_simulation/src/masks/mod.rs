//! Mask system: каталог, стек масок бойца, перенос украденных масок
//!
//! ECS ответственность:
//! - MaskCatalog resource: определения + генерация экземпляров
//! - MaskStack component: маски = health pool бойца
//! - MaskTransfers resource: косметическая задержка перелёта маски
//!
//! Презентация: текстуры, физика сбитой маски, lerp к голове вора.

use bevy::prelude::*;
use bevy::ecs::schedule::InternedScheduleLabel;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod events;
pub mod stack;
pub mod transfer;

pub use catalog::{builtin_definitions, MaskCatalog, MaskDefinition, MaskInstance, MaskInstanceId};
pub use events::{MaskAttached, MaskPopped, MaskStolen};
pub use stack::MaskStack;
pub use transfer::{advance_mask_transfers, MaskTransfers};

use crate::ArenaSet;

/// Параметры масок матча
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskSettings {
    /// Сколько масок у бойца на старте
    pub initial_mask_count: usize,
    /// Маска отлетает (физика презентации) перед притягиванием к вору
    pub fly_off_duration: f32,
    /// Время притягивания маски к голове вора
    pub glide_duration: f32,
}

impl Default for MaskSettings {
    fn default() -> Self {
        Self {
            initial_mask_count: 5,
            fly_off_duration: 1.5,
            glide_duration: 3.0,
        }
    }
}

impl MaskSettings {
    pub fn transfer_delay(&self) -> f32 {
        self.fly_off_duration + self.glide_duration
    }
}

/// Раздать бойцу `count` случайных масок из каталога
pub fn deal_masks<R: Rng + ?Sized>(
    owner: Entity,
    count: usize,
    catalog: &mut MaskCatalog,
    rng: &mut R,
) -> MaskStack {
    let masks: Vec<MaskInstance> = (0..count)
        .filter_map(|_| catalog.create_random(rng))
        .collect();

    if masks.len() < count {
        crate::logger::log_warning(&format!(
            "Mask catalog is empty: {:?} starts with {} of {} masks",
            owner,
            masks.len(),
            count
        ));
    }

    MaskStack::with_masks(owner, masks)
}

/// Mask Plugin
///
/// Порядок: advance_mask_transfers в ArenaSet::Effects
/// (после resolve hits, где генерируется MaskStolen).
pub struct MaskPlugin {
    pub schedule: InternedScheduleLabel,
}

impl Plugin for MaskPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MaskPopped>()
            .add_event::<MaskStolen>()
            .add_event::<MaskAttached>()
            .init_resource::<MaskSettings>()
            .init_resource::<MaskTransfers>();

        if !app.world().contains_resource::<MaskCatalog>() {
            app.insert_resource(MaskCatalog::builtin());
        }

        app.add_systems(self.schedule, advance_mask_transfers.in_set(ArenaSet::Effects));
    }
}
