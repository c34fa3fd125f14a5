//! Косметический перенос украденной маски
//!
//! Владение меняется в момент кражи (count обоих стеков обновлён сразу),
//! здесь только таймер "маска долетела до головы вора".
//! Повторная кража той же маски заменяет ожидающий перенос,
//! сбитая в полёте маска уже никуда не прилетает.

use bevy::prelude::*;
use std::collections::BTreeMap;

use super::catalog::MaskInstanceId;
use super::events::{MaskAttached, MaskPopped, MaskStolen};
use super::MaskSettings;
use crate::effects::PendingTimer;

/// Resource: ожидающие перелёты масок (BTreeMap — детерминированный порядок)
#[derive(Resource, Debug, Default)]
pub struct MaskTransfers {
    pending: BTreeMap<MaskInstanceId, PendingTimer<Entity>>,
}

impl MaskTransfers {
    /// Запланировать attach к `to`. Возвращает прежнего получателя, если перенос был вытеснен.
    pub fn schedule(&mut self, mask: MaskInstanceId, to: Entity, delay: f32) -> Option<Entity> {
        self.pending.entry(mask).or_default().schedule(to, delay)
    }

    /// Отменить перенос. Возвращает получателя, если маска была в полёте.
    pub fn cancel(&mut self, mask: MaskInstanceId) -> Option<Entity> {
        self.pending.remove(&mask).and_then(|mut timer| timer.cancel())
    }

    pub fn is_in_flight(&self, mask: MaskInstanceId) -> bool {
        self.pending
            .get(&mask)
            .is_some_and(|timer| timer.is_pending())
    }

    pub fn in_flight_count(&self) -> usize {
        self.pending.len()
    }

    /// Продвинуть все таймеры, вернуть завершённые переносы
    pub fn tick(&mut self, delta: f32) -> Vec<(MaskInstanceId, Entity)> {
        let mut attached = Vec::new();

        for (mask, timer) in self.pending.iter_mut() {
            if let Some(owner) = timer.tick(delta) {
                attached.push((*mask, owner));
            }
        }

        self.pending.retain(|_, timer| timer.is_pending());
        attached
    }
}

/// System: MaskStolen → планирование, MaskPopped → отмена, тик таймеров → MaskAttached
///
/// Кража обрабатывается раньше pop: маску можно украсть и сбить с вора в одном тике.
pub fn advance_mask_transfers(
    mut stolen_events: EventReader<MaskStolen>,
    mut popped_events: EventReader<MaskPopped>,
    mut attached_events: EventWriter<MaskAttached>,
    mut transfers: ResMut<MaskTransfers>,
    settings: Res<MaskSettings>,
    time: Res<Time>,
) {
    for stolen in stolen_events.read() {
        if let Some(previous) = transfers.schedule(stolen.mask, stolen.to, settings.transfer_delay()) {
            crate::logger::log(&format!(
                "🎭 Mask {:?} re-stolen mid-flight ({:?} → {:?})",
                stolen.mask, previous, stolen.to
            ));
        }
    }

    for popped in popped_events.read() {
        if let Some(owner) = transfers.cancel(popped.mask) {
            crate::logger::log(&format!(
                "🎭 Mask {:?} knocked off {:?} mid-flight, transfer to {:?} cancelled",
                popped.mask, popped.from, owner
            ));
        }
    }

    for (mask, owner) in transfers.tick(time.delta_secs()) {
        attached_events.write(MaskAttached { owner, mask });
        crate::logger::log(&format!("🎭 Mask {:?} attached to {:?}", mask, owner));
    }
}
